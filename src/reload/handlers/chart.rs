//! Handler for analytics charts.
//!
//! Like flows, a chart script (`*.js`) stands for its `*.chart.json` spec.
//! Like tables, charts are served through a generated built-in API that is
//! refreshed after every successful load.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::reload::handler::load_spec;
use crate::reload::{Domain, ReloadError, ReloadHandler};
use crate::store::Registries;

pub struct ChartHandler {
    registries: Arc<Registries>,
    builtin_api: String,
}

impl ChartHandler {
    pub fn new(registries: Arc<Registries>, engine_prefix: &str) -> Self {
        Self {
            registries,
            builtin_api: format!("{engine_prefix}chart"),
        }
    }
}

#[async_trait]
impl ReloadHandler for ChartHandler {
    fn domain(&self) -> Domain {
        Domain::Chart
    }

    async fn load(&self, path: &Path, name: &str) -> Result<(), ReloadError> {
        load_spec(&self.registries.charts, path, name).await?;

        if let Some(api) = self.registries.apis.get(&self.builtin_api) {
            crate::debug_event!("chart", "reloading api", "{}", self.builtin_api);
            api.reload();
        }
        Ok(())
    }

    fn remove(&self, name: &str) -> bool {
        self.registries.charts.remove(name).is_some()
    }
}
