//! Handler for data table specs.
//!
//! Tables are served through a generated built-in API. After a table loads,
//! that API's cached schema is refreshed in place; the restart that follows
//! every table event rebinds the listener.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::reload::handler::load_spec;
use crate::reload::{Domain, ReloadError, ReloadHandler};
use crate::store::Registries;

pub struct TableHandler {
    registries: Arc<Registries>,
    /// Name of the generated API, e.g. `xiang.table`.
    builtin_api: String,
}

impl TableHandler {
    pub fn new(registries: Arc<Registries>, engine_prefix: &str) -> Self {
        Self {
            registries,
            builtin_api: format!("{engine_prefix}table"),
        }
    }
}

#[async_trait]
impl ReloadHandler for TableHandler {
    fn domain(&self) -> Domain {
        Domain::Table
    }

    async fn load(&self, path: &Path, name: &str) -> Result<(), ReloadError> {
        load_spec(&self.registries.tables, path, name).await?;

        if let Some(api) = self.registries.apis.get(&self.builtin_api) {
            api.reload();
        }
        Ok(())
    }

    fn remove(&self, name: &str) -> bool {
        self.registries.tables.remove(name).is_some()
    }
}
