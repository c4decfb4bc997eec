//! HTTP server exposing the loaded API surface.
//!
//! Routes are built from a snapshot of the API registry taken at start.
//! Changing an API spec therefore needs a restart before the new route
//! table is served, which is exactly what the restart coordinator does.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::{Value, json};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::{Server, ServerError};
use crate::store::Registries;

/// How long `stop` waits for in-flight requests before aborting.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Route table captured when the server started.
struct RouteTable {
    started_at: String,
    /// Name to `{name, generation, source}` as of start.
    apis: BTreeMap<String, Value>,
}

struct Running {
    addr: SocketAddr,
    ct: CancellationToken,
    handle: JoinHandle<()>,
}

/// axum server over the shared registries.
pub struct HttpServer {
    bind: String,
    registries: Arc<Registries>,
    running: Mutex<Option<Running>>,
}

impl HttpServer {
    pub fn new(bind: impl Into<String>, registries: Arc<Registries>) -> Self {
        Self {
            bind: bind.into(),
            registries,
            running: Mutex::new(None),
        }
    }

    /// Address the server is listening on, if running.
    pub async fn local_addr(&self) -> Option<SocketAddr> {
        self.running.lock().await.as_ref().map(|r| r.addr)
    }

    fn router(&self) -> Router {
        let apis = self
            .registries
            .apis
            .snapshot()
            .into_iter()
            .map(|(name, api)| {
                let route = json!({
                    "name": name,
                    "generation": api.generation(),
                    "source": api.source,
                });
                (name, route)
            })
            .collect();

        let table = Arc::new(RouteTable {
            started_at: chrono::Local::now().to_rfc3339(),
            apis,
        });

        Router::new()
            .route("/health", axum::routing::get(health_check))
            .route("/apis", axum::routing::get(list_apis))
            .route("/api/{name}", axum::routing::get(show_api))
            .with_state(table)
    }
}

async fn health_check() -> &'static str {
    "OK"
}

async fn list_apis(State(table): State<Arc<RouteTable>>) -> axum::Json<Value> {
    axum::Json(json!({
        "started_at": table.started_at,
        "apis": table.apis.keys().collect::<Vec<_>>(),
    }))
}

async fn show_api(
    State(table): State<Arc<RouteTable>>,
    Path(name): Path<String>,
) -> Result<axum::Json<Value>, StatusCode> {
    table
        .apis
        .get(&name)
        .map(|route| axum::Json(route.clone()))
        .ok_or(StatusCode::NOT_FOUND)
}

#[async_trait]
impl Server for HttpServer {
    async fn start(&self) -> Result<(), ServerError> {
        let mut running = self.running.lock().await;
        if let Some(current) = running.as_ref() {
            return Err(ServerError::AlreadyRunning {
                addr: current.addr.to_string(),
            });
        }

        let listener = tokio::net::TcpListener::bind(&self.bind)
            .await
            .map_err(|source| ServerError::Bind {
                bind: self.bind.clone(),
                source,
            })?;
        let addr = listener.local_addr().map_err(|source| ServerError::Bind {
            bind: self.bind.clone(),
            source,
        })?;

        let router = self.router();
        let route_count = self.registries.apis.len();
        let ct = CancellationToken::new();
        let shutdown = ct.clone();

        let handle = tokio::spawn(async move {
            let server = axum::serve(listener, router)
                .with_graceful_shutdown(async move { shutdown.cancelled().await });
            if let Err(e) = server.await {
                tracing::error!("[server] serve error: {e}");
            }
        });

        crate::log_event!("server", "listening", "http://{addr} ({route_count} apis)");
        *running = Some(Running { addr, ct, handle });
        Ok(())
    }

    async fn stop(&self) -> Result<(), ServerError> {
        let Some(Running { addr, ct, mut handle }) = self.running.lock().await.take() else {
            crate::debug_event!("server", "stop", "not running");
            return Ok(());
        };

        ct.cancel();
        match tokio::time::timeout(DRAIN_TIMEOUT, &mut handle).await {
            Ok(Ok(())) => {
                crate::log_event!("server", "stopped", "{addr}");
                Ok(())
            }
            Ok(Err(e)) => Err(ServerError::Task {
                reason: e.to_string(),
            }),
            Err(_) => {
                tracing::warn!("[server] drain timed out on {addr}, closing connections");
                handle.abort();
                Ok(())
            }
        }
    }
}
