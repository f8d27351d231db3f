//! The VFS provider contract: one list/stat/open interface across local
//! directories and SMB shares.
//!
//! Providers take provider-native paths (see [`crate::path::SharePath::native`])
//! and never see the `smb://` display form. [`Capabilities`] tells callers
//! what they may rely on: the local provider lists fast and could be watched
//! natively, the direct SMB provider declares neither, so callers fall back
//! to polling for change detection.

use std::io::Read;
use std::time::SystemTime;

use crate::error::VfsError;

mod local;
mod smb;

pub use local::LocalProvider;
pub use smb::{SmbProvider, SmbTransport};

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Entry name within its directory.
    pub name: String,
    /// Whether the entry is a directory.
    pub is_dir: bool,
    /// Display type, derived from the extension; empty for directories.
    pub file_type: String,
}

/// Stat result for a single path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metadata {
    /// Size in bytes (0 for directories on most backends).
    pub size: u64,
    /// Last modification time.
    pub modified: SystemTime,
    /// Whether the path is a directory.
    pub is_dir: bool,
}

/// What a provider supports beyond the basic contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Directory listings are cheap enough to repeat freely.
    pub fast_list: bool,
    /// OS-native change events are available for this backend.
    pub watch: bool,
}

/// Uniform list/stat/open interface over a backing store.
pub trait VfsProvider: Send + Sync {
    /// List the entries of a directory.
    fn read_dir(&self, path: &str) -> Result<Vec<DirEntry>, VfsError>;

    /// Stat a single path.
    fn stat(&self, path: &str) -> Result<Metadata, VfsError>;

    /// Open a file for reading. Providers may decline with
    /// [`VfsError::Unsupported`].
    fn open(&self, path: &str) -> Result<Box<dyn Read + Send>, VfsError> {
        let _ = path;
        Err(VfsError::Unsupported {
            operation: "open",
            provider: self.name(),
        })
    }

    /// Join a child name onto a native base path.
    fn join(&self, base: &str, name: &str) -> String;

    /// The final component of a native path.
    fn base<'a>(&self, path: &'a str) -> &'a str;

    /// What this provider supports.
    fn capabilities(&self) -> Capabilities;

    /// Short tag for logs and errors.
    fn name(&self) -> &'static str;
}

/// Derive the display file type from an entry name: the lowercased final
/// extension, or empty when there is none (or the entry is a directory).
pub fn file_type_of(name: &str, is_dir: bool) -> String {
    if is_dir {
        return String::new();
    }
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => ext.to_ascii_lowercase(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_type_from_extension() {
        assert_eq!(file_type_of("movie.MKV", false), "mkv");
        assert_eq!(file_type_of("archive.tar.gz", false), "gz");
        assert_eq!(file_type_of("README", false), "");
        assert_eq!(file_type_of(".hidden", false), "");
        assert_eq!(file_type_of("photos", true), "");
    }
}
