//! Handler implementations, one per domain.

mod api;
mod chart;
mod flow;
mod model;
mod plugin;
mod table;

pub use api::ApiHandler;
pub use chart::ChartHandler;
pub use flow::FlowHandler;
pub use model::ModelHandler;
pub use plugin::PluginHandler;
pub use table::TableHandler;
