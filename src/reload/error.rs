//! Error types for the reload pipeline.

use std::path::PathBuf;
use thiserror::Error;

use crate::store::LoadError;

/// Errors from watching roots and reloading resources.
#[derive(Error, Debug)]
pub enum ReloadError {
    #[error("Failed to initialize watcher: {reason}")]
    InitFailed { reason: String },

    #[error("Cannot watch path {path}: {reason}")]
    PathWatchFailed { path: PathBuf, reason: String },

    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Load(#[from] LoadError),
}

impl From<notify::Error> for ReloadError {
    fn from(e: notify::Error) -> Self {
        ReloadError::InitFailed {
            reason: e.to_string(),
        }
    }
}
