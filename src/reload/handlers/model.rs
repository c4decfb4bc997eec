//! Handler for data model specs.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::reload::handler::load_spec;
use crate::reload::{Domain, ReloadError, ReloadHandler};
use crate::store::Registries;

/// Loads `*.json` model specs into the model registry.
pub struct ModelHandler {
    registries: Arc<Registries>,
}

impl ModelHandler {
    pub fn new(registries: Arc<Registries>) -> Self {
        Self { registries }
    }
}

#[async_trait]
impl ReloadHandler for ModelHandler {
    fn domain(&self) -> Domain {
        Domain::Model
    }

    async fn load(&self, path: &Path, name: &str) -> Result<(), ReloadError> {
        load_spec(&self.registries.models, path, name).await
    }

    fn remove(&self, name: &str) -> bool {
        self.registries.models.remove(name).is_some()
    }
}
