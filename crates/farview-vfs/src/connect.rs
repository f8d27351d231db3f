//! Network-session establishment for SMB shares.
//!
//! [`ConnectionEstablisher::ensure_connection`] resolves credentials through
//! the [`CredentialStore`] and asks a [`SessionBackend`] to open a temporary
//! session to the share. Failures are classified into two disjoint classes:
//!
//! - **authentication-class** ([`ConnectError::AuthenticationFailure`]): the
//!   remote rejected the identity. The caller should clear the memory-cached
//!   credentials for that `(host, share)` and retry; a keyring-sourced
//!   credential then gets one fresh attempt before the user is re-prompted.
//! - **conflict-class** ([`ConnectError::SessionCredentialConflict`]): a
//!   session to the same host already exists under a different identity. This
//!   is returned verbatim. No existing session is ever disconnected here;
//!   surfacing guidance is the caller's job.

use std::sync::Arc;

use crate::credentials::{Credentials, CredentialStore};
use crate::error::{ConnectError, SessionError};
use crate::path::{self, SharePath};
use crate::provider::SmbTransport;

/// Platform seam for opening a network session to a share.
///
/// On Windows this wraps the WNet connection call; elsewhere it is usually
/// [`TransportSession`] over the direct SMB transport.
pub trait SessionBackend: Send + Sync {
    /// Open a temporary (non-persistent) session to `//host/share` with the
    /// given identity.
    fn connect(
        &self,
        host: &str,
        share: &str,
        credentials: &Credentials,
    ) -> Result<(), SessionError>;
}

/// [`SessionBackend`] over an [`SmbTransport`].
pub struct TransportSession(
    /// The transport whose `connect` carries the session handshake.
    pub Arc<dyn SmbTransport>,
);

impl SessionBackend for TransportSession {
    fn connect(
        &self,
        host: &str,
        share: &str,
        credentials: &Credentials,
    ) -> Result<(), SessionError> {
        self.0.connect(host, share, credentials)
    }
}

/// Establishes sessions to SMB shares on demand.
pub struct ConnectionEstablisher {
    credentials: Arc<CredentialStore>,
    backend: Arc<dyn SessionBackend>,
}

impl ConnectionEstablisher {
    /// Build an establisher over a credential store and session backend.
    pub fn new(credentials: Arc<CredentialStore>, backend: Arc<dyn SessionBackend>) -> Self {
        Self {
            credentials,
            backend,
        }
    }

    /// Ensure a session to the share behind `parsed` (or, when absent, behind
    /// the re-parsed `native_path`) exists.
    ///
    /// On success, credentials flagged `persist` are written to the secret
    /// store. Failure classification is described in the module docs.
    pub fn ensure_connection(
        &self,
        parsed: Option<&SharePath>,
        native_path: &str,
    ) -> Result<(), ConnectError> {
        let (host, share, rel_path) = match parsed {
            Some(p) if !p.host.is_empty() => (p.host.clone(), p.share.clone(), p.rel_path()),
            _ => {
                let parts =
                    path::parse_share(native_path).map_err(|_| ConnectError::NotAShare {
                        path: native_path.to_string(),
                    })?;
                (parts.host, parts.share, parts.segments.join("/"))
            }
        };

        let credentials = self.credentials.get(&host, &share, &rel_path);
        if credentials.is_empty() {
            return Err(ConnectError::NoCredentials { host, share });
        }

        tracing::debug!(
            host = %host,
            share = %share,
            username = %credentials.qualified_username(),
            "establishing session"
        );

        match self.backend.connect(&host, &share, &credentials) {
            Ok(()) => {
                if credentials.persist {
                    self.credentials
                        .secrets()
                        .set(&host, &share, &credentials)?;
                }
                Ok(())
            }
            Err(source @ (SessionError::AccessDenied { .. } | SessionError::LogonFailure { .. })) => {
                Err(ConnectError::AuthenticationFailure {
                    host,
                    share,
                    source,
                })
            }
            Err(source @ SessionError::ConflictingSession { .. }) => {
                Err(ConnectError::SessionCredentialConflict {
                    host,
                    share,
                    source,
                })
            }
            Err(source) => Err(ConnectError::Session {
                host,
                share,
                source,
            }),
        }
    }
}
