//! Loaded resource types for each domain.
//!
//! Specs are JSON documents. Loading parses the whole document before
//! anything is inserted, so a failed load never leaves a partial entry.
//! Schemas are not validated beyond requiring a top-level object.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use super::error::LoadError;

/// A resource built from a spec file's content.
pub trait Spec: Sized + Send + Sync + 'static {
    /// Human-readable kind, used in errors and logs.
    const KIND: &'static str;

    /// Build the resource registered under `name`.
    fn load(content: &[u8], name: &str) -> Result<Self, LoadError>;
}

/// Parse `content` into a JSON object.
fn parse_object(
    kind: &'static str,
    content: &[u8],
    name: &str,
) -> Result<Map<String, Value>, LoadError> {
    let value: Value = serde_json::from_slice(content).map_err(|source| LoadError::Parse {
        kind,
        name: name.to_string(),
        source,
    })?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(LoadError::NotAnObject {
            kind,
            name: name.to_string(),
        }),
    }
}

fn label_of(source: &Map<String, Value>) -> Option<String> {
    source.get("name").and_then(Value::as_str).map(str::to_string)
}

/// Data model definition.
#[derive(Debug, Clone)]
pub struct Model {
    pub name: String,
    pub label: Option<String>,
    /// Backing table name, when the model declares one.
    pub table: Option<String>,
    pub source: Value,
}

impl Spec for Model {
    const KIND: &'static str = "model";

    fn load(content: &[u8], name: &str) -> Result<Self, LoadError> {
        let source = parse_object(Self::KIND, content, name)?;
        let table = source
            .get("table")
            .and_then(|t| t.get("name"))
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(Self {
            name: name.to_string(),
            label: label_of(&source),
            table,
            source: Value::Object(source),
        })
    }
}

/// HTTP API definition.
///
/// Built-in APIs generated from tables and charts are marked stale with
/// [`Api::reload`] when their backing specs change. The HTTP server reports
/// the generation it started with.
#[derive(Debug)]
pub struct Api {
    pub name: String,
    pub label: Option<String>,
    /// Route group, defaults to the resource name.
    pub group: String,
    pub source: Value,
    generation: AtomicU64,
}

impl Api {
    /// Record that the specs behind a generated API changed.
    ///
    /// Only bumps the generation counter; the served routes pick the change
    /// up on the next server restart.
    pub fn reload(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        crate::debug_event!("api", "marked stale", "{} generation {generation}", self.name);
    }

    /// Number of in-place reloads since this API was loaded.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

impl Spec for Api {
    const KIND: &'static str = "api";

    fn load(content: &[u8], name: &str) -> Result<Self, LoadError> {
        let source = parse_object(Self::KIND, content, name)?;
        let group = source
            .get("group")
            .and_then(Value::as_str)
            .unwrap_or(name)
            .to_string();

        Ok(Self {
            name: name.to_string(),
            label: label_of(&source),
            group,
            source: Value::Object(source),
            generation: AtomicU64::new(0),
        })
    }
}

/// Business-logic flow definition.
#[derive(Debug, Clone)]
pub struct Flow {
    pub name: String,
    pub label: Option<String>,
    /// Number of nodes declared in the flow.
    pub nodes: usize,
    pub source: Value,
}

impl Spec for Flow {
    const KIND: &'static str = "flow";

    fn load(content: &[u8], name: &str) -> Result<Self, LoadError> {
        let source = parse_object(Self::KIND, content, name)?;
        let nodes = source
            .get("nodes")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);

        Ok(Self {
            name: name.to_string(),
            label: label_of(&source),
            nodes,
            source: Value::Object(source),
        })
    }
}

/// Data table definition.
#[derive(Debug, Clone)]
pub struct Table {
    pub name: String,
    pub label: Option<String>,
    pub source: Value,
}

impl Spec for Table {
    const KIND: &'static str = "table";

    fn load(content: &[u8], name: &str) -> Result<Self, LoadError> {
        let source = parse_object(Self::KIND, content, name)?;
        Ok(Self {
            name: name.to_string(),
            label: label_of(&source),
            source: Value::Object(source),
        })
    }
}

/// Analytics chart definition.
#[derive(Debug, Clone)]
pub struct Chart {
    pub name: String,
    pub label: Option<String>,
    pub source: Value,
}

impl Spec for Chart {
    const KIND: &'static str = "chart";

    fn load(content: &[u8], name: &str) -> Result<Self, LoadError> {
        let source = parse_object(Self::KIND, content, name)?;
        Ok(Self {
            name: name.to_string(),
            label: label_of(&source),
            source: Value::Object(source),
        })
    }
}

/// Native plugin handle.
///
/// Plugins are identified by their shared object on disk. The digest lets
/// callers tell a rebuilt plugin from a touched one.
#[derive(Debug, Clone)]
pub struct Plugin {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    pub sha256: String,
}

impl Plugin {
    /// Open the plugin at `path`.
    pub async fn open(path: &Path, name: &str) -> Result<Self, LoadError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if bytes.is_empty() {
            return Err(LoadError::EmptyPlugin {
                path: path.to_path_buf(),
            });
        }

        let digest = Sha256::digest(&bytes);
        Ok(Self {
            name: name.to_string(),
            path: path.to_path_buf(),
            size: bytes.len() as u64,
            sha256: digest.iter().map(|b| format!("{b:02x}")).collect(),
        })
    }
}
