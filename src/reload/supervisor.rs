//! Watch supervisor: discovers roots and wires one reloader per root.
//!
//! Two kinds of roots are watched:
//! - engine built-ins under `engine.root`, always named with the engine prefix
//! - user application roots under `root`, named without a prefix
//!
//! Roots that do not exist are skipped; an application rarely uses every
//! domain.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::task::JoinHandle;
use walkdir::WalkDir;

use super::domain::Domain;
use super::error::ReloadError;
use super::handler::{DomainReloader, Outcome, ReloadHandler};
use super::handlers::{
    ApiHandler, ChartHandler, FlowHandler, ModelHandler, PluginHandler, TableHandler,
};
use super::restart::RestartCoordinator;
use super::watcher::watch_directory;
use crate::config::Settings;
use crate::paths;
use crate::store::Registries;

/// A directory watched for one domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchRoot {
    pub domain: Domain,
    pub path: PathBuf,
    pub prefix: String,
}

/// Every candidate root for `settings`, engine built-ins first.
///
/// Existence is not checked here.
pub fn discover_roots(settings: &Settings) -> Vec<WatchRoot> {
    let mut roots = Vec::new();

    if let Some(engine) = settings.engine.root.as_deref() {
        match paths::local_engine_root(engine) {
            Some(local) => {
                let base = settings.root.join(local);
                roots.extend(Domain::ENGINE.iter().map(|&domain| WatchRoot {
                    domain,
                    path: base.join(domain.dir_name()),
                    prefix: settings.engine.prefix.clone(),
                }));
            }
            None => {
                crate::debug_event!("supervisor", "remote engine root not watched", "{engine}");
            }
        }
    }

    roots.extend(Domain::ALL.iter().map(|&domain| WatchRoot {
        domain,
        path: settings.domain_root(domain),
        prefix: String::new(),
    }));

    roots
}

/// Result of loading every existing spec once at startup.
#[derive(Debug, Default)]
pub struct PreloadReport {
    pub loaded: BTreeMap<Domain, usize>,
    pub failed: Vec<String>,
}

impl PreloadReport {
    pub fn total_loaded(&self) -> usize {
        self.loaded.values().sum()
    }
}

/// Registers reloaders for all roots of an application.
pub struct Supervisor {
    registries: Arc<Registries>,
    /// `None` when there is no server to restart (one-shot loading).
    restart: Option<RestartCoordinator>,
    engine_prefix: String,
    debounce_ms: u64,
}

impl Supervisor {
    pub fn new(
        registries: Arc<Registries>,
        restart: Option<RestartCoordinator>,
        settings: &Settings,
    ) -> Self {
        Self {
            registries,
            restart,
            engine_prefix: settings.engine.prefix.clone(),
            debounce_ms: settings.file_watch.debounce_ms,
        }
    }

    fn handler(&self, domain: Domain) -> Arc<dyn ReloadHandler> {
        let registries = Arc::clone(&self.registries);
        match domain {
            Domain::Model => Arc::new(ModelHandler::new(registries)),
            Domain::Api => Arc::new(ApiHandler::new(registries)),
            Domain::Flow => Arc::new(FlowHandler::new(registries)),
            Domain::Plugin => Arc::new(PluginHandler::new(registries)),
            Domain::Table => Arc::new(TableHandler::new(registries, &self.engine_prefix)),
            Domain::Chart => Arc::new(ChartHandler::new(registries, &self.engine_prefix)),
        }
    }

    /// Build the reloader for an existing root.
    pub fn reloader(&self, domain: Domain, root: &Path, prefix: &str) -> DomainReloader {
        DomainReloader::new(
            self.handler(domain),
            paths::resolve_absolute(root),
            prefix,
            self.restart.clone(),
        )
    }

    /// Watch every root in `settings`. Returns without blocking.
    ///
    /// Roots that fail to register are logged and skipped.
    pub fn watch(&self, settings: &Settings) -> Vec<JoinHandle<()>> {
        let mut handles = Vec::new();

        for root in discover_roots(settings) {
            match self.watch_domain(root.domain, &root.path, &root.prefix) {
                Ok(Some(handle)) => handles.push(handle),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!("[supervisor] cannot watch {} root: {e}", root.domain);
                }
            }
        }

        crate::log_event!("supervisor", "watching", "{} roots", handles.len());
        handles
    }

    /// Watch one root. A missing root yields `Ok(None)`.
    pub fn watch_domain(
        &self,
        domain: Domain,
        root: &Path,
        prefix: &str,
    ) -> Result<Option<JoinHandle<()>>, ReloadError> {
        if !paths::dir_exists(root) {
            crate::debug_event!(domain, "root missing, skipped", "{}", root.display());
            return Ok(None);
        }

        let reloader = Arc::new(self.reloader(domain, root, prefix));
        let handle = watch_directory(reloader.root(), self.debounce_ms, reloader.clone())?;
        crate::log_event!(domain, "watching", "{}", reloader.root().display());
        Ok(Some(handle))
    }

    /// Load every spec under every existing root, without restarts.
    ///
    /// Scripts are skipped: their paired spec file is loaded directly.
    pub async fn preload(&self, settings: &Settings) -> PreloadReport {
        let mut report = PreloadReport::default();

        for root in discover_roots(settings) {
            if !paths::dir_exists(&root.path) {
                continue;
            }
            let reloader = self.reloader(root.domain, &root.path, &root.prefix);

            let files = WalkDir::new(reloader.root())
                .sort_by_file_name()
                .into_iter()
                .filter_map(Result::ok)
                .filter(|entry| entry.file_type().is_file())
                .map(walkdir::DirEntry::into_path)
                .filter(|path| !root.domain.is_script(path))
                .collect::<Vec<_>>();

            for path in files {
                let Some(spec_path) = root.domain.spec_path(&path) else {
                    continue;
                };
                match reloader.load(&spec_path).await {
                    Outcome::Loaded(_) => *report.loaded.entry(root.domain).or_default() += 1,
                    Outcome::Failed(name) => report.failed.push(format!("{}: {name}", root.domain)),
                    _ => {}
                }
            }
        }

        crate::log_event!(
            "supervisor",
            "preloaded",
            "{} specs, {} failures",
            report.total_loaded(),
            report.failed.len()
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_user_roots_only() {
        let settings = Settings {
            root: PathBuf::from("/srv/app"),
            ..Settings::default()
        };

        let roots = discover_roots(&settings);
        assert_eq!(roots.len(), 6);
        assert!(roots.iter().all(|r| r.prefix.is_empty()));
        assert_eq!(roots[0].path, PathBuf::from("/srv/app/models"));
    }

    #[test]
    fn test_discover_engine_roots() {
        let mut settings = Settings {
            root: PathBuf::from("/srv/app"),
            ..Settings::default()
        };
        settings.engine.root = Some("fs:///opt/engine".to_string());

        let roots = discover_roots(&settings);
        let engine: Vec<&WatchRoot> = roots.iter().filter(|r| r.prefix == "xiang.").collect();
        assert_eq!(engine.len(), 4);
        assert_eq!(
            engine.iter().map(|r| r.domain).collect::<Vec<_>>(),
            vec![Domain::Model, Domain::Api, Domain::Flow, Domain::Table]
        );
        assert_eq!(engine[1].path, PathBuf::from("/opt/engine/apis"));
    }

    #[test]
    fn test_remote_engine_root_skipped() {
        let mut settings = Settings::default();
        settings.engine.root = Some("s3://bucket/engine".to_string());

        let roots = discover_roots(&settings);
        assert_eq!(roots.len(), 6);
        assert!(roots.iter().all(|r| r.prefix.is_empty()));
    }
}
