//! File records as the watcher and its consumer see them.

use std::time::SystemTime;

use farview_vfs::{DirEntry, Metadata};

/// Change status of a file row.
///
/// Only the watcher's apply loop mutates this field. `Deleted` rows are kept
/// in the consumer's list (so a browser can render a removed state) but are
/// never carried into the watcher's snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileStatus {
    /// Present and unchanged since the last tick.
    #[default]
    Normal,
    /// Appeared since the previous snapshot.
    Added,
    /// Disappeared since the previous snapshot.
    Deleted,
    /// Size or modification time changed since the previous snapshot.
    Modified,
}

/// One file or directory row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Entry name within its directory.
    pub name: String,
    /// Provider-native path; the snapshot key.
    pub path: String,
    /// Whether the row is a directory.
    pub is_dir: bool,
    /// Size in bytes.
    pub size: u64,
    /// Last modification time.
    pub modified: SystemTime,
    /// Display type (lowercased extension, empty for directories).
    pub file_type: String,
    /// Change status; see [`FileStatus`].
    pub status: FileStatus,
}

impl FileRecord {
    /// Build a record from a listing entry and its stat result.
    pub fn from_entry(entry: &DirEntry, path: impl Into<String>, meta: &Metadata) -> Self {
        Self {
            name: entry.name.clone(),
            path: path.into(),
            is_dir: entry.is_dir,
            size: meta.size,
            modified: meta.modified,
            file_type: entry.file_type.clone(),
            status: FileStatus::Normal,
        }
    }

    /// True for the parent-directory (`..`) row a browser prepends; such rows
    /// never enter the snapshot.
    pub fn is_parent(&self) -> bool {
        self.name == ".."
    }
}
