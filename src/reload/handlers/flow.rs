//! Handler for business-logic flows.
//!
//! Flow scripts (`*.js`) are mapped to their `*.flow.json` spec before they
//! reach this handler, so only spec files are ever loaded here.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::reload::handler::load_spec;
use crate::reload::{Domain, ReloadError, ReloadHandler};
use crate::store::Registries;

pub struct FlowHandler {
    registries: Arc<Registries>,
}

impl FlowHandler {
    pub fn new(registries: Arc<Registries>) -> Self {
        Self { registries }
    }
}

#[async_trait]
impl ReloadHandler for FlowHandler {
    fn domain(&self) -> Domain {
        Domain::Flow
    }

    async fn load(&self, path: &Path, name: &str) -> Result<(), ReloadError> {
        load_spec(&self.registries.flows, path, name).await
    }

    fn remove(&self, name: &str) -> bool {
        self.registries.flows.remove(name).is_some()
    }
}
