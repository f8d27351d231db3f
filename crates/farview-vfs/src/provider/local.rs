//! Local-filesystem provider.
//!
//! Serves plain local paths, native UNC paths on Windows, and mounted SMB
//! shares (the resolver maps those under their mount point before any I/O
//! reaches this provider).

use std::fs;
use std::io::Read;
use std::path::{Path, MAIN_SEPARATOR};
use std::time::SystemTime;

use crate::error::VfsError;
use crate::provider::{file_type_of, Capabilities, DirEntry, Metadata, VfsProvider};

/// Provider backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalProvider;

impl LocalProvider {
    /// A new local provider.
    pub fn new() -> Self {
        Self
    }
}

impl VfsProvider for LocalProvider {
    fn read_dir(&self, path: &str) -> Result<Vec<DirEntry>, VfsError> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path).map_err(|e| VfsError::from_io(path, e))? {
            let entry = entry.map_err(|e| VfsError::from_io(path, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            // Unreadable type for one entry drops that entry, not the listing.
            let is_dir = match entry.file_type() {
                Ok(ft) => ft.is_dir(),
                Err(err) => {
                    tracing::debug!(path, name = %name, error = %err, "skipping unreadable dir entry");
                    continue;
                }
            };
            entries.push(DirEntry {
                file_type: file_type_of(&name, is_dir),
                name,
                is_dir,
            });
        }
        Ok(entries)
    }

    fn stat(&self, path: &str) -> Result<Metadata, VfsError> {
        let meta = fs::metadata(path).map_err(|e| VfsError::from_io(path, e))?;
        Ok(Metadata {
            size: meta.len(),
            modified: meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            is_dir: meta.is_dir(),
        })
    }

    fn open(&self, path: &str) -> Result<Box<dyn Read + Send>, VfsError> {
        let file = fs::File::open(path).map_err(|e| VfsError::from_io(path, e))?;
        Ok(Box::new(file))
    }

    fn join(&self, base: &str, name: &str) -> String {
        if base.is_empty() {
            return name.to_string();
        }
        let mut joined = base.to_string();
        if !joined.ends_with(MAIN_SEPARATOR) && !joined.ends_with('/') {
            joined.push(MAIN_SEPARATOR);
        }
        joined.push_str(name);
        joined
    }

    fn base<'a>(&self, path: &'a str) -> &'a str {
        Path::new(path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(path)
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            fast_list: true,
            watch: true,
        }
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn lists_and_stats_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let mut f = std::fs::File::create(dir.path().join("notes.txt")).unwrap();
        f.write_all(b"hello").unwrap();
        drop(f);

        let provider = LocalProvider::new();
        let root = dir.path().to_str().unwrap();

        let mut entries = provider.read_dir(root).unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "notes.txt");
        assert!(!entries[0].is_dir);
        assert_eq!(entries[0].file_type, "txt");
        assert_eq!(entries[1].name, "sub");
        assert!(entries[1].is_dir);

        let meta = provider.stat(&provider.join(root, "notes.txt")).unwrap();
        assert_eq!(meta.size, 5);
        assert!(!meta.is_dir);
    }

    #[test]
    fn open_reads_contents() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.bin"), b"abc").unwrap();

        let provider = LocalProvider::new();
        let path = provider.join(dir.path().to_str().unwrap(), "a.bin");
        let mut reader = provider.open(&path).unwrap();
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).unwrap();
        assert_eq!(buf, b"abc");
    }

    #[test]
    fn missing_dir_is_io_error() {
        let provider = LocalProvider::new();
        let err = provider.read_dir("/definitely/not/here").unwrap_err();
        assert!(matches!(err, VfsError::Io { .. }));
    }

    #[test]
    fn join_and_base() {
        let provider = LocalProvider::new();
        let joined = provider.join("/tmp/dir", "file.txt");
        assert_eq!(provider.base(&joined), "file.txt");
        assert_eq!(provider.join("", "file.txt"), "file.txt");
    }

    #[test]
    fn declares_local_capabilities() {
        let caps = LocalProvider::new().capabilities();
        assert!(caps.fast_list);
        assert!(caps.watch);
    }
}
