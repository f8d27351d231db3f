//! Snapshot diffing: previous state vs a fresh scan.
//!
//! A snapshot is a plain path→record map. Diffing is a pure function of two
//! maps; the watcher holds the lock only for the comparison, never for I/O.

use std::collections::HashMap;

use crate::record::{FileRecord, FileStatus};

/// The watcher's last-observed directory state, keyed by native path.
pub type Snapshot = HashMap<String, FileRecord>;

/// One scan tick's changes; produced once, delivered as an indivisible unit.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    /// Rows present now but absent from the previous snapshot.
    pub added: Vec<FileRecord>,
    /// Rows absent now but present in the previous snapshot.
    pub deleted: Vec<FileRecord>,
    /// Rows present in both whose size or modification time differ.
    pub modified: Vec<FileRecord>,
}

impl ChangeSet {
    /// True when no category has entries.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty() && self.modified.is_empty()
    }

    /// Total number of changed rows.
    pub fn len(&self) -> usize {
        self.added.len() + self.deleted.len() + self.modified.len()
    }
}

/// Compare the previous snapshot against a fresh scan.
///
/// Each path lands in at most one category. Returned records carry the
/// matching status: `Added` and `Modified` rows are the *current* records,
/// `Deleted` rows are the previous records re-marked.
pub fn detect_changes(previous: &Snapshot, current: &Snapshot) -> ChangeSet {
    let mut changes = ChangeSet::default();

    for (path, record) in current {
        match previous.get(path) {
            None => {
                let mut added = record.clone();
                added.status = FileStatus::Added;
                changes.added.push(added);
            }
            Some(before) => {
                if before.modified != record.modified || before.size != record.size {
                    let mut modified = record.clone();
                    modified.status = FileStatus::Modified;
                    changes.modified.push(modified);
                }
            }
        }
    }

    for (path, record) in previous {
        if !current.contains_key(path) {
            let mut deleted = record.clone();
            deleted.status = FileStatus::Deleted;
            changes.deleted.push(deleted);
        }
    }

    changes
}

/// Project an authoritative file list into a snapshot.
///
/// Drops parent-directory (`..`) rows and `Deleted` rows; everything else is
/// stored under its path with status reset to `Normal`, since a snapshot
/// records state, not history.
pub fn project_snapshot(records: &[FileRecord]) -> Snapshot {
    let mut snapshot = Snapshot::with_capacity(records.len());
    for record in records {
        if record.is_parent() || record.status == FileStatus::Deleted {
            continue;
        }
        let mut stored = record.clone();
        stored.status = FileStatus::Normal;
        snapshot.insert(stored.path.clone(), stored);
    }
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};

    fn record(name: &str, size: u64, modified: SystemTime) -> FileRecord {
        FileRecord {
            name: name.to_string(),
            path: format!("/watched/{name}"),
            is_dir: false,
            size,
            modified,
            file_type: String::new(),
            status: FileStatus::Normal,
        }
    }

    fn snapshot_of(records: Vec<FileRecord>) -> Snapshot {
        records
            .into_iter()
            .map(|r| (r.path.clone(), r))
            .collect()
    }

    #[test]
    fn three_way_diff() {
        let t1 = SystemTime::UNIX_EPOCH;
        let t2 = t1 + Duration::from_secs(60);

        let previous = snapshot_of(vec![record("a", 10, t1), record("b", 5, t1)]);
        let current = snapshot_of(vec![record("a", 20, t2), record("c", 1, t2)]);

        let changes = detect_changes(&previous, &current);

        assert_eq!(changes.added.len(), 1);
        assert_eq!(changes.added[0].name, "c");
        assert_eq!(changes.added[0].status, FileStatus::Added);

        assert_eq!(changes.deleted.len(), 1);
        assert_eq!(changes.deleted[0].name, "b");
        assert_eq!(changes.deleted[0].status, FileStatus::Deleted);

        assert_eq!(changes.modified.len(), 1);
        assert_eq!(changes.modified[0].name, "a");
        assert_eq!(changes.modified[0].status, FileStatus::Modified);
        assert_eq!(changes.modified[0].size, 20);
    }

    #[test]
    fn no_path_lands_in_two_categories() {
        let t1 = SystemTime::UNIX_EPOCH;
        let t2 = t1 + Duration::from_secs(60);
        let previous = snapshot_of(vec![record("a", 10, t1), record("b", 5, t1)]);
        let current = snapshot_of(vec![record("a", 20, t2), record("c", 1, t2)]);

        let changes = detect_changes(&previous, &current);
        let mut seen: Vec<&str> = changes
            .added
            .iter()
            .chain(&changes.deleted)
            .chain(&changes.modified)
            .map(|r| r.path.as_str())
            .collect();
        let before = seen.len();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), before);
    }

    #[test]
    fn mtime_only_change_is_modified() {
        let t1 = SystemTime::UNIX_EPOCH;
        let t2 = t1 + Duration::from_secs(1);
        let previous = snapshot_of(vec![record("a", 10, t1)]);
        let current = snapshot_of(vec![record("a", 10, t2)]);

        let changes = detect_changes(&previous, &current);
        assert_eq!(changes.modified.len(), 1);
        assert!(changes.added.is_empty());
        assert!(changes.deleted.is_empty());
    }

    #[test]
    fn identical_snapshots_are_empty_diff() {
        let t1 = SystemTime::UNIX_EPOCH;
        let snapshot = snapshot_of(vec![record("a", 10, t1), record("b", 5, t1)]);
        assert!(detect_changes(&snapshot, &snapshot).is_empty());
    }

    #[test]
    fn projection_drops_parent_and_deleted_rows() {
        let t1 = SystemTime::UNIX_EPOCH;
        let mut parent = record("..", 0, t1);
        parent.is_dir = true;
        let mut gone = record("gone", 1, t1);
        gone.status = FileStatus::Deleted;
        let mut fresh = record("fresh", 2, t1);
        fresh.status = FileStatus::Added;

        let snapshot = project_snapshot(&[parent, gone, fresh, record("plain", 3, t1)]);

        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.values().all(|r| !r.is_parent()));
        assert!(snapshot.values().all(|r| r.status == FileStatus::Normal));
        assert!(snapshot.contains_key("/watched/fresh"));
        assert!(snapshot.contains_key("/watched/plain"));
    }
}
