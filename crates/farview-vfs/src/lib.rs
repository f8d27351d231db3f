//! Virtual-filesystem layer for farview.
//!
//! One interface for browsing local directories and SMB/CIFS network shares,
//! addressed as UNC paths or `smb://` URLs.
//!
//! # Components
//!
//! - [`PathResolver`] - parses raw input (`smb://`, UNC, `//host/share`, or a
//!   plain local path) and selects the backing provider
//! - [`VfsProvider`] - the uniform list/stat/open contract, with
//!   [`LocalProvider`] and [`SmbProvider`] implementations
//! - [`CredentialStore`] - three-tier credential cache (session memory, then
//!   the persisted [`SecretStore`], then the interactive [`CredentialPrompt`])
//! - [`ConnectionEstablisher`] - opens network sessions and classifies
//!   failures into authentication vs session-conflict classes
//! - [`MountTable`] - finds SMB shares already mounted into the local tree
//!
//! # Access-denied recovery
//!
//! The intended retry loop for interactive callers:
//!
//! 1. `resolve()` the input and list through the returned provider.
//! 2. On [`VfsError::AccessDenied`], call
//!    [`ConnectionEstablisher::ensure_connection`] and retry the listing.
//! 3. On [`ConnectError::AuthenticationFailure`], call
//!    [`CredentialStore::clear`] for that `(host, share)` and go to 2: a
//!    keyring-sourced credential gets one fresh attempt, after which the
//!    user is prompted.
//! 4. [`ConnectError::SessionCredentialConflict`] is terminal here; show the
//!    user guidance instead of retrying.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod connect;
pub mod credentials;
pub mod error;
pub mod mounts;
pub mod path;
pub mod provider;
pub mod resolver;

pub use connect::{ConnectionEstablisher, SessionBackend, TransportSession};
pub use credentials::{
    CredentialPrompt, CredentialStore, Credentials, MemorySecretStore, SecretStore,
};
pub use error::{
    ConnectError, PromptError, ResolveError, SecretStoreError, SessionError, VfsError,
};
pub use mounts::{MountRow, MountSource, MountTable, StaticMounts, SystemMounts};
pub use path::{ProviderKind, Scheme, SharePath};
pub use provider::{
    file_type_of, Capabilities, DirEntry, LocalProvider, Metadata, SmbProvider, SmbTransport,
    VfsProvider,
};
pub use resolver::{PathResolver, PlatformStrategy, Resolved};
