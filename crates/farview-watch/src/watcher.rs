//! The polling directory watcher.
//!
//! A running watcher owns exactly two background threads:
//!
//! - the **scan loop** lists the watched directory on a fixed tick, diffs the
//!   listing against the previous snapshot, and offers the resulting
//!   [`ChangeSet`] to a bounded queue with a non-blocking send. A full queue
//!   drops the entire tick's changes (logged at debug): scan freshness is
//!   deliberately favored over delivery completeness. A failed listing
//!   silently skips the tick; transient failures are expected on network
//!   shares.
//! - the **apply loop** receives change sets serially (single writer, FIFO),
//!   folds each into the consumer's authoritative file list, hands the merged
//!   list to the consumer, and only after the consumer returns rebuilds the
//!   snapshot from the list the consumer actually committed. The watcher's
//!   notion of "previous state" therefore always matches whatever the
//!   consumer kept, including its own sorting or reconciliation.
//!
//! Both loops block on "channel or stop signal"; there is no busy polling.
//! [`DirectoryWatcher::stop`] closes the stop signal and lets both threads
//! exit on their next wakeup; shutdown is best-effort, bounded by one tick
//! interval, and never joined.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{bounded, select, tick, Receiver, Sender, TrySendError};
use farview_vfs::{VfsError, VfsProvider};
use parking_lot::RwLock;

use crate::diff::{detect_changes, project_snapshot, ChangeSet, Snapshot};
use crate::record::FileRecord;

/// Default scan interval.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(2);

/// Default bounded-queue capacity for change delivery.
pub const DEFAULT_QUEUE_CAPACITY: usize = 10;

/// Tuning knobs for a watcher.
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// Scan cadence.
    pub interval: Duration,
    /// Capacity of the change-delivery queue; a full queue drops whole ticks.
    pub queue_capacity: usize,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

/// The single consumer of a watcher's change sets.
///
/// `commit` receives the merged file list after a change set has been folded
/// in and returns the list as actually committed; the watcher rebuilds its
/// snapshot from the returned list, not from its own scan.
pub trait ChangeConsumer: Send + 'static {
    /// A path disappeared; drop it from any externally tracked selection.
    fn evict(&mut self, path: &str) {
        let _ = path;
    }

    /// Commit the merged list. May reorder or otherwise reconcile it.
    fn commit(&mut self, files: Vec<FileRecord>, changes: &ChangeSet) -> Vec<FileRecord>;
}

/// Background poller producing Added/Deleted/Modified diffs for one
/// directory.
///
/// `start` is idempotent while running; `stop` is idempotent always.
pub struct DirectoryWatcher {
    provider: Arc<dyn VfsProvider>,
    dir: String,
    config: WatcherConfig,
    snapshot: Arc<RwLock<Snapshot>>,
    dropped_ticks: Arc<AtomicU64>,
    stop: Option<Sender<()>>,
}

impl DirectoryWatcher {
    /// Watcher for `dir` as served by `provider`, with default tuning.
    pub fn new(provider: Arc<dyn VfsProvider>, dir: impl Into<String>) -> Self {
        Self::with_config(provider, dir, WatcherConfig::default())
    }

    /// Watcher with explicit tuning.
    pub fn with_config(
        provider: Arc<dyn VfsProvider>,
        dir: impl Into<String>,
        config: WatcherConfig,
    ) -> Self {
        Self {
            provider,
            dir: dir.into(),
            config,
            snapshot: Arc::new(RwLock::new(Snapshot::new())),
            dropped_ticks: Arc::new(AtomicU64::new(0)),
            stop: None,
        }
    }

    /// True while the background loops are live.
    pub fn is_running(&self) -> bool {
        self.stop.is_some()
    }

    /// Number of scan ticks whose changes were dropped on a full queue.
    pub fn dropped_ticks(&self) -> u64 {
        self.dropped_ticks.load(Ordering::Relaxed)
    }

    /// A copy of the current snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot.read().clone()
    }

    /// Transition `Stopped -> Running`: take the initial snapshot, then
    /// launch the scan and apply loops. A no-op while already running.
    ///
    /// Fails only when the initial listing fails; the loops themselves never
    /// surface errors.
    pub fn start<C: ChangeConsumer>(&mut self, consumer: C) -> Result<(), VfsError> {
        if self.stop.is_some() {
            return Ok(());
        }

        let initial = list_records(self.provider.as_ref(), &self.dir)?;
        *self.snapshot.write() = project_snapshot(&initial);

        let (stop_tx, stop_rx) = bounded::<()>(0);
        let (change_tx, change_rx) = bounded::<ChangeSet>(self.config.queue_capacity);

        self.spawn_scan_loop(change_tx, stop_rx.clone());
        self.spawn_apply_loop(consumer, initial, change_rx, stop_rx);

        self.stop = Some(stop_tx);
        tracing::debug!(dir = %self.dir, interval = ?self.config.interval, "watcher started");
        Ok(())
    }

    /// Transition `Running -> Stopped`. Closes the stop signal; both loops
    /// exit on their next wakeup. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if let Some(stop) = self.stop.take() {
            // Dropping the sender disconnects both loops' stop receivers; the
            // scan thread's exit in turn closes the change queue.
            drop(stop);
            tracing::debug!(dir = %self.dir, "watcher stopped");
        }
    }

    fn spawn_scan_loop(&self, change_tx: Sender<ChangeSet>, stop_rx: Receiver<()>) {
        let provider = Arc::clone(&self.provider);
        let dir = self.dir.clone();
        let snapshot = Arc::clone(&self.snapshot);
        let dropped = Arc::clone(&self.dropped_ticks);
        let ticker = tick(self.config.interval);

        std::thread::spawn(move || loop {
            select! {
                recv(ticker) -> _ => {
                    scan_tick(provider.as_ref(), &dir, &snapshot, &change_tx, &dropped);
                }
                recv(stop_rx) -> _ => break,
            }
        });
    }

    fn spawn_apply_loop<C: ChangeConsumer>(
        &self,
        mut consumer: C,
        initial: Vec<FileRecord>,
        change_rx: Receiver<ChangeSet>,
        stop_rx: Receiver<()>,
    ) {
        let snapshot = Arc::clone(&self.snapshot);

        std::thread::spawn(move || {
            let mut authoritative = initial;
            loop {
                select! {
                    recv(change_rx) -> msg => {
                        let Ok(changes) = msg else { break };
                        merge_changes(&mut authoritative, &changes, |path| consumer.evict(path));
                        let merged = std::mem::take(&mut authoritative);
                        authoritative = consumer.commit(merged, &changes);
                        // Rebuild from what the consumer committed, not from
                        // the scan's transient map.
                        *snapshot.write() = project_snapshot(&authoritative);
                    }
                    recv(stop_rx) -> _ => break,
                }
            }
        });
    }
}

impl Drop for DirectoryWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

/// One scan tick: list, diff under the read lock, offer to the queue.
fn scan_tick(
    provider: &dyn VfsProvider,
    dir: &str,
    snapshot: &RwLock<Snapshot>,
    change_tx: &Sender<ChangeSet>,
    dropped: &AtomicU64,
) {
    let records = match list_records(provider, dir) {
        Ok(records) => records,
        Err(err) => {
            // Availability over completeness: the share may be briefly
            // unreachable; the next tick will catch up.
            tracing::debug!(dir = %dir, error = %err, "scan tick skipped");
            return;
        }
    };

    let current: Snapshot = records
        .into_iter()
        .map(|r| (r.path.clone(), r))
        .collect();

    let changes = {
        let previous = snapshot.read();
        detect_changes(&previous, &current)
    };
    if changes.is_empty() {
        return;
    }

    match change_tx.try_send(changes) {
        Ok(()) => {}
        Err(TrySendError::Full(changes)) => {
            dropped.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(
                dir = %dir,
                changed = changes.len(),
                "change queue full; dropping this tick's changes"
            );
        }
        Err(TrySendError::Disconnected(_)) => {}
    }
}

/// List a directory into file records, stat'ing each entry.
///
/// A failed stat drops that entry from the scan, not the whole listing.
fn list_records(provider: &dyn VfsProvider, dir: &str) -> Result<Vec<FileRecord>, VfsError> {
    let entries = provider.read_dir(dir)?;
    let mut records = Vec::with_capacity(entries.len());
    for entry in entries {
        let path = provider.join(dir, &entry.name);
        match provider.stat(&path) {
            Ok(meta) => records.push(FileRecord::from_entry(&entry, path, &meta)),
            Err(err) => {
                tracing::debug!(path = %path, error = %err, "stat failed during scan; skipping entry");
            }
        }
    }
    Ok(records)
}

/// Fold a change set into the authoritative list.
///
/// Deleted rows are re-marked in place (the row is retained so a browser can
/// render a removed state) and reported to `evict`; modified rows are
/// replaced in place; added rows are appended without resorting.
pub(crate) fn merge_changes(
    authoritative: &mut Vec<FileRecord>,
    changes: &ChangeSet,
    mut evict: impl FnMut(&str),
) {
    for deleted in &changes.deleted {
        if let Some(row) = authoritative.iter_mut().find(|r| r.path == deleted.path) {
            row.status = crate::record::FileStatus::Deleted;
        }
        evict(&deleted.path);
    }
    for modified in &changes.modified {
        if let Some(row) = authoritative.iter_mut().find(|r| r.path == modified.path) {
            *row = modified.clone();
        }
    }
    for added in &changes.added {
        authoritative.push(added.clone());
    }
}
