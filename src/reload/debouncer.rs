//! Debouncing of write events per path.
//!
//! Editors and build tools often write a spec several times in a row. Only
//! the last write within the quiet period is reloaded.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use super::event::FileOp;

/// Debounces load events by path.
///
/// Records change timestamps and returns paths that have been stable
/// for the configured duration.
#[derive(Debug)]
pub struct Debouncer {
    /// Pending changes: path -> (latest op, last change timestamp).
    pending: HashMap<PathBuf, (FileOp, Instant)>,
    /// How long a file must be stable before processing.
    duration: Duration,
}

impl Debouncer {
    /// Create a new debouncer with the given duration in milliseconds.
    pub fn new(debounce_ms: u64) -> Self {
        Self {
            pending: HashMap::new(),
            duration: Duration::from_millis(debounce_ms),
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Record a file change event, resetting the timer for this path.
    ///
    /// A pending create is not downgraded to a write.
    pub fn record(&mut self, path: PathBuf, op: FileOp) {
        let op = match self.pending.get(&path) {
            Some((FileOp::Create, _)) => FileOp::Create,
            _ => op,
        };
        self.pending.insert(path, (op, Instant::now()));
    }

    /// Drop a pending change (the file was removed or renamed away).
    pub fn remove(&mut self, path: &Path) {
        self.pending.remove(path);
    }

    /// Take all changes that have been stable for the debounce duration.
    pub fn take_ready(&mut self) -> Vec<(FileOp, PathBuf)> {
        let now = Instant::now();
        let mut ready = Vec::new();

        self.pending.retain(|path, (op, last_change)| {
            if now.duration_since(*last_change) >= self.duration {
                ready.push((*op, path.clone()));
                false
            } else {
                true
            }
        });

        ready
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_debouncer_basic() {
        let mut debouncer = Debouncer::new(50);

        let path = PathBuf::from("/app/models/user.json");
        debouncer.record(path.clone(), FileOp::Write);

        assert!(debouncer.take_ready().is_empty());
        assert!(debouncer.has_pending());

        sleep(Duration::from_millis(60));

        let ready = debouncer.take_ready();
        assert_eq!(ready, vec![(FileOp::Write, path)]);
        assert!(!debouncer.has_pending());
    }

    #[test]
    fn test_debouncer_resets_on_new_change() {
        let mut debouncer = Debouncer::new(50);

        let path = PathBuf::from("/app/models/user.json");
        debouncer.record(path.clone(), FileOp::Write);
        sleep(Duration::from_millis(30));
        debouncer.record(path.clone(), FileOp::Write);
        sleep(Duration::from_millis(30));

        // 60ms since the first write, 30ms since the second
        assert!(debouncer.take_ready().is_empty());

        sleep(Duration::from_millis(30));
        assert_eq!(debouncer.take_ready().len(), 1);
    }

    #[test]
    fn test_create_not_downgraded() {
        let mut debouncer = Debouncer::new(0);

        let path = PathBuf::from("/app/apis/order.json");
        debouncer.record(path.clone(), FileOp::Create);
        debouncer.record(path.clone(), FileOp::Write);

        assert_eq!(debouncer.take_ready(), vec![(FileOp::Create, path)]);
    }

    #[test]
    fn test_debouncer_remove() {
        let mut debouncer = Debouncer::new(50);

        let path = PathBuf::from("/app/flows/calc.flow.json");
        debouncer.record(path.clone(), FileOp::Write);
        assert!(debouncer.has_pending());

        debouncer.remove(&path);
        assert!(!debouncer.has_pending());
    }
}
