//! Direct SMB provider.
//!
//! Used when a share is neither reachable as a native UNC path nor already
//! mounted. All protocol work is delegated to an injected [`SmbTransport`];
//! the trait mirrors the surface of an SMB client library (connect, readdir,
//! stat, open) so the core itself never links one. Paths handed to the
//! transport are share-relative with forward slashes (`/dir/file`, `/` for
//! the share root).

use std::io::Read;
use std::sync::Arc;

use crate::credentials::Credentials;
use crate::error::{SessionError, VfsError};
use crate::provider::{Capabilities, DirEntry, Metadata, VfsProvider};

/// Client seam for the SMB protocol.
///
/// Implementations map their library's error values into the structured
/// [`SessionError`] codes; the core never inspects error text.
pub trait SmbTransport: Send + Sync {
    /// Establish (or verify) a session to `//host/share` under the given
    /// identity. The session is temporary; persistence is a credential-store
    /// concern.
    fn connect(
        &self,
        host: &str,
        share: &str,
        credentials: &Credentials,
    ) -> Result<(), SessionError>;

    /// List a share-relative directory.
    fn read_dir(&self, host: &str, share: &str, path: &str) -> Result<Vec<DirEntry>, VfsError>;

    /// Stat a share-relative path.
    fn stat(&self, host: &str, share: &str, path: &str) -> Result<Metadata, VfsError>;

    /// Open a share-relative file for reading.
    fn open(
        &self,
        host: &str,
        share: &str,
        path: &str,
    ) -> Result<Box<dyn Read + Send>, VfsError> {
        let _ = (host, share, path);
        Err(VfsError::Unsupported {
            operation: "open",
            provider: "smb",
        })
    }
}

/// [`VfsProvider`] over one `(host, share)` pair of an [`SmbTransport`].
pub struct SmbProvider {
    transport: Arc<dyn SmbTransport>,
    host: String,
    share: String,
}

impl SmbProvider {
    /// Bind a transport to one share.
    pub fn new(transport: Arc<dyn SmbTransport>, host: impl Into<String>, share: impl Into<String>) -> Self {
        Self {
            transport,
            host: host.into(),
            share: share.into(),
        }
    }

    /// The host this provider serves.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The share this provider serves.
    pub fn share(&self) -> &str {
        &self.share
    }
}

impl VfsProvider for SmbProvider {
    fn read_dir(&self, path: &str) -> Result<Vec<DirEntry>, VfsError> {
        self.transport.read_dir(&self.host, &self.share, path)
    }

    fn stat(&self, path: &str) -> Result<Metadata, VfsError> {
        self.transport.stat(&self.host, &self.share, path)
    }

    fn open(&self, path: &str) -> Result<Box<dyn Read + Send>, VfsError> {
        self.transport.open(&self.host, &self.share, path)
    }

    fn join(&self, base: &str, name: &str) -> String {
        let trimmed = base.trim_end_matches('/');
        format!("{trimmed}/{name}")
    }

    fn base<'a>(&self, path: &'a str) -> &'a str {
        path.trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(path)
    }

    fn capabilities(&self) -> Capabilities {
        // Remote listings are slow and there are no OS change events, so
        // callers poll.
        Capabilities {
            fast_list: false,
            watch: false,
        }
    }

    fn name(&self) -> &'static str {
        "smb"
    }
}
