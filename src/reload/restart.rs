//! Coalescing server restarts.
//!
//! Restart requests set a single-slot pending flag that one worker task
//! consumes. At most one stop/start cycle runs at a time and at most one is
//! pending: any burst of requests during a cycle collapses into exactly one
//! follow-up cycle.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Notify;

use crate::server::Server;

struct Shared {
    /// Holds at most one stored permit, which is the pending flag.
    pending: Notify,
    requests: AtomicU64,
    cycles: AtomicU64,
}

/// Handle for requesting server restarts. Cheap to clone.
#[derive(Clone)]
pub struct RestartCoordinator {
    shared: Arc<Shared>,
}

impl RestartCoordinator {
    /// Spawn the restart worker for `server`.
    ///
    /// Must be called from within a tokio runtime. The worker runs for the
    /// lifetime of the runtime.
    pub fn spawn(server: Arc<dyn Server>) -> Self {
        let shared = Arc::new(Shared {
            pending: Notify::new(),
            requests: AtomicU64::new(0),
            cycles: AtomicU64::new(0),
        });

        let worker = Arc::clone(&shared);
        tokio::spawn(async move {
            loop {
                worker.pending.notified().await;
                restart_cycle(server.as_ref()).await;
                worker.cycles.fetch_add(1, Ordering::SeqCst);
            }
        });

        Self { shared }
    }

    /// Request a restart. Returns immediately.
    pub fn request(&self) {
        let count = self.shared.requests.fetch_add(1, Ordering::SeqCst) + 1;
        crate::debug_event!("restart", "requested", "#{count}");
        self.shared.pending.notify_one();
    }

    /// Total restart requests received.
    pub fn requests(&self) -> u64 {
        self.shared.requests.load(Ordering::SeqCst)
    }

    /// Completed stop/start cycles.
    pub fn cycles(&self) -> u64 {
        self.shared.cycles.load(Ordering::SeqCst)
    }
}

/// Stop, then start. Failures are logged and not retried.
async fn restart_cycle(server: &dyn Server) {
    crate::log_event!("restart", "stopping server");
    if let Err(e) = server.stop().await {
        tracing::error!("[restart] stop failed: {e}");
    }

    match server.start().await {
        Ok(()) => crate::log_event!("restart", "server restarted"),
        Err(e) => tracing::error!("[restart] start failed: {e}"),
    }
}
