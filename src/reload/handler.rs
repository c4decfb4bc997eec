//! Domain handler trait and the per-root event dispatcher.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use super::domain::Domain;
use super::error::ReloadError;
use super::event::FileOp;
use super::restart::RestartCoordinator;
use super::watcher::EventSink;
use crate::paths;
use crate::store::{Registry, Spec};

/// Registry operations for one domain.
///
/// Implementations own no state of their own beyond the registries they
/// were given; the registry owns every entry.
#[async_trait]
pub trait ReloadHandler: Send + Sync {
    fn domain(&self) -> Domain;

    /// Load the spec at `path` under `name`, replacing any existing entry.
    ///
    /// On error the registry is left untouched.
    async fn load(&self, path: &Path, name: &str) -> Result<(), ReloadError>;

    /// Remove `name`, returning whether it was present.
    fn remove(&self, name: &str) -> bool;
}

/// Read `path` and replace `name` in `registry` with the parsed spec.
pub(crate) async fn load_spec<T: Spec>(
    registry: &Registry<T>,
    path: &Path,
    name: &str,
) -> Result<(), ReloadError> {
    let content = paths::read_content(path)
        .await
        .map_err(|source| ReloadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let value = T::load(&content, name)?;
    registry.upsert(name, value);
    Ok(())
}

/// What handling one event did to the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Not a file of this domain.
    Ignored,
    Loaded(String),
    /// Load failed; the previous entry (if any) is still in place.
    Failed(String),
    Removed(String),
    /// Remove of a name that was not registered.
    Absent(String),
}

/// Dispatches one root's file events to a domain handler.
pub struct DomainReloader {
    handler: Arc<dyn ReloadHandler>,
    root: PathBuf,
    prefix: String,
    restart: Option<RestartCoordinator>,
}

impl DomainReloader {
    /// `root` must already be absolute. The restart coordinator is only
    /// kept for domains that affect the API surface.
    pub fn new(
        handler: Arc<dyn ReloadHandler>,
        root: PathBuf,
        prefix: impl Into<String>,
        restart: Option<RestartCoordinator>,
    ) -> Self {
        let restart = restart.filter(|_| handler.domain().triggers_restart());
        Self {
            handler,
            root,
            prefix: prefix.into(),
            restart,
        }
    }

    pub fn domain(&self) -> Domain {
        self.handler.domain()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Registry name for a spec file under this root.
    pub fn name_for(&self, spec_path: &Path) -> String {
        format!("{}{}", self.prefix, paths::derive_name(&self.root, spec_path))
    }

    /// Handle one file event.
    pub async fn handle(&self, op: FileOp, path: &Path) -> Outcome {
        let domain = self.domain();
        let Some(spec_path) = domain.spec_path(path) else {
            crate::debug_event!(domain, "filtered", "{op} {}", path.display());
            return Outcome::Ignored;
        };

        let outcome = if op.is_load() {
            self.load(&spec_path).await
        } else {
            self.remove(&spec_path)
        };

        if let Some(restart) = &self.restart {
            restart.request();
        }

        outcome
    }

    /// Load a spec file into the registry.
    pub async fn load(&self, spec_path: &Path) -> Outcome {
        let domain = self.domain();
        let name = self.name_for(spec_path);

        match self.handler.load(spec_path, &name).await {
            Ok(()) => {
                crate::log_event!(domain, "reloaded", "{name}");
                Outcome::Loaded(name)
            }
            Err(e) => {
                tracing::error!("[{domain}] reload of {name} failed: {e}");
                Outcome::Failed(name)
            }
        }
    }

    fn remove(&self, spec_path: &Path) -> Outcome {
        let domain = self.domain();
        let name = self.name_for(spec_path);

        if self.handler.remove(&name) {
            crate::log_event!(domain, "removed", "{name}");
            Outcome::Removed(name)
        } else {
            crate::debug_event!(domain, "not registered", "{name}");
            Outcome::Absent(name)
        }
    }
}

#[async_trait]
impl EventSink for DomainReloader {
    async fn on_event(&self, op: FileOp, path: PathBuf) {
        self.handle(op, &path).await;
    }
}
