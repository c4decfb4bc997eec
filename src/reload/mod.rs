//! Hot reload of application specs.
//!
//! Every watched root gets its own watcher task that feeds a
//! [`DomainReloader`]. The reloader filters by extension, derives the
//! resource name, and applies the change to the domain registry. Domains
//! that shape the API surface also request a server restart.
//!
//! # Architecture
//!
//! ```text
//! Supervisor
//!   - discovers engine + user roots
//!   - one watch_directory task per existing root
//!         |
//!   DomainReloader (root, prefix)
//!     - extension filter / script -> spec rewrite
//!     - name = prefix + derive_name(root, path)
//!     - load (replace) or remove
//!         |                         |
//!   ReloadHandler (per domain)   RestartCoordinator
//!     -> Registries                 (api, table, chart only)
//! ```

mod debouncer;
mod domain;
mod error;
mod event;
mod handler;
pub mod handlers;
mod restart;
mod supervisor;
mod watcher;

pub use debouncer::Debouncer;
pub use domain::Domain;
pub use error::ReloadError;
pub use event::{FileOp, file_ops};
pub use handler::{DomainReloader, Outcome, ReloadHandler};
pub use restart::RestartCoordinator;
pub use supervisor::{PreloadReport, Supervisor, WatchRoot, discover_roots};
pub use watcher::{EventSink, watch_directory};
