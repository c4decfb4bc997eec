//! Handler for native plugins.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::reload::{Domain, ReloadError, ReloadHandler};
use crate::store::{Plugin, Registries};

/// Opens `*.so` files by path rather than by content.
pub struct PluginHandler {
    registries: Arc<Registries>,
}

impl PluginHandler {
    pub fn new(registries: Arc<Registries>) -> Self {
        Self { registries }
    }
}

#[async_trait]
impl ReloadHandler for PluginHandler {
    fn domain(&self) -> Domain {
        Domain::Plugin
    }

    async fn load(&self, path: &Path, name: &str) -> Result<(), ReloadError> {
        let plugin = Plugin::open(path, name).await?;
        crate::debug_event!("plugin", "opened", "{name} sha256 {}", plugin.sha256);
        self.registries.plugins.upsert(name, plugin);
        Ok(())
    }

    fn remove(&self, name: &str) -> bool {
        self.registries.plugins.remove(name).is_some()
    }
}
