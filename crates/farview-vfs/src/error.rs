//! Error types for the virtual-filesystem layer.
//!
//! Each concern carries its own enum: path resolution, credential lookup,
//! session establishment, and provider I/O. Connection errors are the ones
//! interactive callers must branch on: an [`ConnectError::AuthenticationFailure`]
//! should invalidate the cached credentials for that share, while a
//! [`ConnectError::SessionCredentialConflict`] must be surfaced to the user
//! untouched.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while parsing and resolving a raw path input.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// An SMB path was requested but no native client, mounted share, or
    /// direct transport exists on this platform.
    #[error("SMB is not supported on this platform (no native client or transport for {display})")]
    UnsupportedScheme {
        /// Canonical display form of the rejected path.
        display: String,
    },

    /// The input looked like a share path but did not fit the grammar.
    #[error("invalid share path {input:?}: {reason}")]
    InvalidSharePath {
        /// The raw input as typed.
        input: String,
        /// What was missing or malformed.
        reason: String,
    },

    /// Reading the system mount table failed.
    #[error("failed to read mount table: {0}")]
    MountTable(#[source] std::io::Error),
}

/// Errors from the interactive credential provider.
#[derive(Error, Debug)]
pub enum PromptError {
    /// The user dismissed the prompt.
    #[error("credential prompt cancelled")]
    Cancelled,

    /// The prompt could not be shown (headless session, closed UI channel).
    #[error("credential prompt unavailable: {0}")]
    Unavailable(String),
}

/// Errors from the persisted secret store backend.
#[derive(Error, Debug)]
pub enum SecretStoreError {
    /// The backend rejected or failed the operation.
    #[error("secret store failure: {0}")]
    Backend(String),
}

/// Structured session-establishment failure codes.
///
/// An SMB client adapter maps its own error values into these codes; the
/// core never inspects error message text.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The remote host rejected the supplied identity.
    #[error("access denied by {host}")]
    AccessDenied {
        /// Host that rejected the session.
        host: String,
    },

    /// The logon itself failed (bad username/password/domain).
    #[error("logon failure for {username} on {host}")]
    LogonFailure {
        /// Host that rejected the logon.
        host: String,
        /// Domain-qualified username that was presented.
        username: String,
    },

    /// A session to the same host already exists under a different identity.
    ///
    /// Must be surfaced verbatim; never remediated by disconnecting the
    /// existing session.
    #[error("a session to {host} already exists under a different identity")]
    ConflictingSession {
        /// Host with the existing session.
        host: String,
    },

    /// Network-level failure reaching the host.
    #[error("network error reaching {host}: {source}")]
    Network {
        /// Host that could not be reached.
        host: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Errors from [`ConnectionEstablisher::ensure_connection`].
///
/// [`ConnectionEstablisher::ensure_connection`]: crate::connect::ConnectionEstablisher::ensure_connection
#[derive(Error, Debug)]
pub enum ConnectError {
    /// All three credential tiers were exhausted without producing a
    /// non-empty credential.
    #[error("no credentials available for //{host}/{share}")]
    NoCredentials {
        /// Target host.
        host: String,
        /// Target share.
        share: String,
    },

    /// The remote rejected the identity. The caller should clear the
    /// memory-cached credentials for this `(host, share)` and retry.
    #[error("authentication failed for //{host}/{share}")]
    AuthenticationFailure {
        /// Target host.
        host: String,
        /// Target share.
        share: String,
        /// The structured code reported by the session backend.
        #[source]
        source: SessionError,
    },

    /// A session under a different identity already exists. Returned
    /// verbatim; the caller is responsible for user guidance.
    #[error("conflicting session for //{host}/{share}")]
    SessionCredentialConflict {
        /// Target host.
        host: String,
        /// Target share.
        share: String,
        /// The structured code reported by the session backend.
        #[source]
        source: SessionError,
    },

    /// The target path could not be reduced to a `(host, share)` pair.
    #[error("cannot determine host/share from {path:?}")]
    NotAShare {
        /// The native path that was re-parsed.
        path: String,
    },

    /// Session setup failed for a reason outside the auth/conflict classes.
    #[error("session establishment failed for //{host}/{share}")]
    Session {
        /// Target host.
        host: String,
        /// Target share.
        share: String,
        /// The structured code reported by the session backend.
        #[source]
        source: SessionError,
    },

    /// Persisting credentials after a successful connection failed.
    #[error(transparent)]
    SecretStore(#[from] SecretStoreError),
}

/// Errors from provider I/O operations.
#[derive(Error, Debug)]
pub enum VfsError {
    /// Underlying filesystem I/O failed.
    #[error("I/O error on {}", path.display())]
    Io {
        /// The provider-native path involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The remote denied access. Callers typically re-establish the
    /// connection with fresh credentials and retry once.
    #[error("access denied on {path}")]
    AccessDenied {
        /// The provider-native path involved.
        path: String,
    },

    /// The provider does not implement this operation.
    #[error("operation {operation} not supported by the {provider} provider")]
    Unsupported {
        /// The declined operation name.
        operation: &'static str,
        /// The provider tag.
        provider: &'static str,
    },

    /// The SMB transport reported a failure that is not access-related.
    #[error("transport error on {path}: {message}")]
    Transport {
        /// The share-relative path involved.
        path: String,
        /// Transport-reported description.
        message: String,
    },
}

impl VfsError {
    /// Wrap an `io::Error` for `path`, promoting permission errors to
    /// [`VfsError::AccessDenied`] so callers can trigger the credential
    /// retry path.
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::PermissionDenied {
            VfsError::AccessDenied {
                path: path.display().to_string(),
            }
        } else {
            VfsError::Io { path, source }
        }
    }
}
