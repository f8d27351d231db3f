//! Polling change detection for farview directory views.
//!
//! SMB shares offer no OS-native change events (see
//! [`farview_vfs::Capabilities`]), so farview detects changes by polling: a
//! [`DirectoryWatcher`] periodically lists a directory through its VFS
//! provider, diffs the listing against the last-known snapshot, and delivers
//! Added/Deleted/Modified [`ChangeSet`]s through a bounded queue to a single
//! [`ChangeConsumer`].
//!
//! The delivery queue is deliberately bounded with drop-on-full semantics:
//! under a lagging consumer, whole ticks are discarded rather than blocking
//! the scan cadence or queueing without limit. A dropped tick is not lost
//! state — the next diff is computed against the same snapshot and re-reports
//! anything still different.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod diff;
mod record;
mod watcher;

pub use diff::{detect_changes, project_snapshot, ChangeSet, Snapshot};
pub use record::{FileRecord, FileStatus};
pub use watcher::{
    ChangeConsumer, DirectoryWatcher, WatcherConfig, DEFAULT_INTERVAL, DEFAULT_QUEUE_CAPACITY,
};
