//! Error types for the application server lifecycle.

use thiserror::Error;

/// Errors from starting or stopping the server.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to bind {bind}: {source}")]
    Bind {
        bind: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server is already running on {addr}")]
    AlreadyRunning { addr: String },

    #[error("Server task failed: {reason}")]
    Task { reason: String },
}
