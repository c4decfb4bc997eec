//! Error types for spec loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from building a resource out of a spec file.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("{kind} '{name}' is not valid JSON: {source}")]
    Parse {
        kind: &'static str,
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{kind} '{name}' must be a JSON object")]
    NotAnObject { kind: &'static str, name: String },

    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Plugin {path} is empty")]
    EmptyPlugin { path: PathBuf },
}
