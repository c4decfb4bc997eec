pub mod cli;
pub mod config;
pub mod logging;
pub mod paths;
pub mod reload;
pub mod server;
pub mod store;

pub use config::Settings;
pub use reload::{Domain, DomainReloader, FileOp, Outcome, RestartCoordinator, Supervisor};
pub use server::{Server, ServerError};
pub use store::{Registries, Registry};
