//! Registry stores for loaded resources.
//!
//! One [`Registry`] per domain, bundled in [`Registries`] and shared by
//! reference with every reload handler and the HTTP server.

mod error;
mod registry;
mod specs;

pub use error::LoadError;
pub use registry::Registry;
pub use specs::{Api, Chart, Flow, Model, Plugin, Spec, Table};

/// All domain registries.
#[derive(Debug, Default)]
pub struct Registries {
    pub models: Registry<Model>,
    pub apis: Registry<Api>,
    pub flows: Registry<Flow>,
    pub plugins: Registry<Plugin>,
    pub tables: Registry<Table>,
    pub charts: Registry<Chart>,
}

impl Registries {
    pub fn new() -> Self {
        Self::default()
    }
}
