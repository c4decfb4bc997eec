//! Per-root filesystem watcher.
//!
//! Each watched root gets its own `notify::RecommendedWatcher` and its own
//! task. Events for one root are delivered to the sink one at a time, in
//! the order the OS reported them (writes are delayed by the debouncer).

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use notify::{Event, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

use super::debouncer::Debouncer;
use super::error::ReloadError;
use super::event::{FileOp, file_ops};

/// Upper bound on how often pending writes are checked.
const MAX_POLL: Duration = Duration::from_millis(50);

/// Receiver of file operations for one watched root.
#[async_trait]
pub trait EventSink: Send + Sync + 'static {
    async fn on_event(&self, op: FileOp, path: PathBuf);
}

/// Watch `root` recursively and feed its events to `sink`.
///
/// The returned task runs until the process exits. Creates and writes are
/// debounced by `debounce_ms`; removes and renames are delivered at once
/// and cancel a pending write for the same path.
pub fn watch_directory(
    root: &Path,
    debounce_ms: u64,
    sink: Arc<dyn EventSink>,
) -> Result<JoinHandle<()>, ReloadError> {
    let (tx, mut rx) = mpsc::channel(256);

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        let _ = tx.blocking_send(res);
    })?;

    watcher
        .watch(root, RecursiveMode::Recursive)
        .map_err(|e| ReloadError::PathWatchFailed {
            path: root.to_path_buf(),
            reason: e.to_string(),
        })?;

    let root = root.to_path_buf();
    let handle = tokio::spawn(async move {
        // Dropping the watcher would stop event delivery
        let _watcher = watcher;
        let mut debouncer = Debouncer::new(debounce_ms);
        let poll = debouncer.duration().clamp(Duration::from_millis(1), MAX_POLL);

        // One ticker for the task: steady traffic must not postpone the flush
        let mut ticker = interval(poll);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        crate::debug_event!("watcher", "watching", "{}", root.display());

        loop {
            tokio::select! {
                res = rx.recv() => match res {
                    Some(Ok(event)) => {
                        for (op, path) in file_ops(&event) {
                            if op.is_load() {
                                debouncer.record(path, op);
                            } else {
                                debouncer.remove(&path);
                                sink.on_event(op, path).await;
                            }
                        }
                    }
                    Some(Err(e)) => {
                        tracing::error!("[watcher] file watch error under {}: {e}", root.display());
                    }
                    None => {
                        tracing::warn!("[watcher] event channel closed for {}", root.display());
                        break;
                    }
                },

                _ = ticker.tick(), if debouncer.has_pending() => {
                    for (op, path) in debouncer.take_ready() {
                        sink.on_event(op, path).await;
                    }
                }
            }
        }
    });

    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<(FileOp, PathBuf)>>,
    }

    #[async_trait]
    impl EventSink for Recorder {
        async fn on_event(&self, op: FileOp, path: PathBuf) {
            self.events.lock().push((op, path));
        }
    }

    async fn wait_for(recorder: &Recorder, check: impl Fn(&[(FileOp, PathBuf)]) -> bool) -> bool {
        for _ in 0..100 {
            if check(&recorder.events.lock()) {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        false
    }

    #[tokio::test]
    async fn test_watch_reports_create_and_remove() {
        let temp_dir = TempDir::new().unwrap();
        let root = crate::paths::resolve_absolute(temp_dir.path());
        let recorder = Arc::new(Recorder::default());

        let handle = watch_directory(&root, 20, recorder.clone()).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        let file = root.join("user.json");
        std::fs::write(&file, "{}").unwrap();
        assert!(
            wait_for(&recorder, |events| events
                .iter()
                .any(|(op, p)| op.is_load() && p == &file))
            .await
        );

        std::fs::remove_file(&file).unwrap();
        assert!(
            wait_for(&recorder, |events| events
                .iter()
                .any(|(op, p)| *op == FileOp::Remove && p == &file))
            .await
        );

        handle.abort();
    }

    #[tokio::test]
    async fn test_pending_write_flushed_under_steady_traffic() {
        let temp_dir = TempDir::new().unwrap();
        let root = crate::paths::resolve_absolute(temp_dir.path());
        let recorder = Arc::new(Recorder::default());

        let handle = watch_directory(&root, 100, recorder.clone()).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        let spec = root.join("user.json");
        std::fs::write(&spec, "{}").unwrap();

        // Unrelated file rewritten faster than the poll interval
        let log = root.join("app.log");
        let noise = tokio::spawn(async move {
            for i in 0..150 {
                std::fs::write(&log, format!("line {i}")).unwrap();
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
        });

        let mut delivered = false;
        for _ in 0..30 {
            tokio::time::sleep(Duration::from_millis(50)).await;
            if recorder.events.lock().iter().any(|(op, p)| op.is_load() && p == &spec) {
                delivered = true;
                break;
            }
        }

        assert!(!noise.is_finished(), "traffic stopped before the check");
        assert!(delivered);

        noise.abort();
        handle.abort();
    }

    #[tokio::test]
    async fn test_watch_missing_root_fails() {
        let temp_dir = TempDir::new().unwrap();
        let recorder = Arc::new(Recorder::default());
        let result = watch_directory(&temp_dir.path().join("missing"), 20, recorder);
        assert!(matches!(result, Err(ReloadError::PathWatchFailed { .. })));
    }
}
