//! Handler for HTTP API specs.
//!
//! Changes here alter the served routes, so every event is followed by a
//! server restart (requested by the dispatcher, not by this handler).

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::reload::handler::load_spec;
use crate::reload::{Domain, ReloadError, ReloadHandler};
use crate::store::Registries;

pub struct ApiHandler {
    registries: Arc<Registries>,
}

impl ApiHandler {
    pub fn new(registries: Arc<Registries>) -> Self {
        Self { registries }
    }
}

#[async_trait]
impl ReloadHandler for ApiHandler {
    fn domain(&self) -> Domain {
        Domain::Api
    }

    async fn load(&self, path: &Path, name: &str) -> Result<(), ReloadError> {
        load_spec(&self.registries.apis, path, name).await
    }

    fn remove(&self, name: &str) -> bool {
        self.registries.apis.remove(name).is_some()
    }
}
