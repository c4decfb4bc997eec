//! Application server lifecycle.
//!
//! The reload pipeline only needs to stop and start the server; anything
//! implementing [`Server`] can be restarted by the
//! [`RestartCoordinator`](crate::reload::RestartCoordinator).

mod error;
#[cfg(feature = "http-server")]
mod http;

use async_trait::async_trait;

pub use error::ServerError;
#[cfg(feature = "http-server")]
pub use http::HttpServer;

/// A restartable server.
#[async_trait]
pub trait Server: Send + Sync {
    /// Bind listeners and begin serving.
    async fn start(&self) -> Result<(), ServerError>;

    /// Stop serving. Returns once listeners are closed.
    ///
    /// Stopping a server that is not running succeeds.
    async fn stop(&self) -> Result<(), ServerError>;
}
