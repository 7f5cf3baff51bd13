//! Error types for the volume registry.
//!
//! Every distinct failure condition of the registry has its own variant so
//! callers (and the plugin adapter) can branch on the kind without parsing
//! messages:
//! - user errors: [`NetvolError::InvalidArgument`], [`NetvolError::Config`]
//! - lifecycle conflicts: [`NetvolError::AlreadyExists`], [`NetvolError::NotFound`],
//!   [`NetvolError::AlreadyMounted`], [`NetvolError::InUse`]
//! - transient: [`NetvolError::StorageUnavailable`] (caller may retry)
//! - side effects: [`NetvolError::Io`], [`NetvolError::Mount`]

use thiserror::Error;

/// Result alias used throughout netvol.
pub type NetvolResult<T> = Result<T, NetvolError>;

#[derive(Debug, Error)]
pub enum NetvolError {
    /// Malformed or unknown volume option, or an unusable volume name.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A live record already exists for the volume name.
    #[error("{0} already exists")]
    AlreadyExists(String),

    /// No live record for the volume name.
    #[error("{0} not found")]
    NotFound(String),

    /// Mount would violate the volume's mount exclusivity policy.
    #[error("already mounted: {0}")]
    AlreadyMounted(String),

    /// Removal attempted while the volume is still mounted.
    #[error("in use: {0}")]
    InUse(String),

    /// Advisory lock or embedded store could not be acquired or opened.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Filesystem side effect (directory creation/removal) failed.
    #[error("io: {0}")]
    Io(String),

    /// A persisted record could not be decoded or failed validation.
    #[error("corrupted record: {0}")]
    Corrupted(String),

    /// No factory registered under the requested driver name.
    #[error("unknown driver: {0}")]
    UnknownDriver(String),

    /// Backend options failed to parse or validate.
    #[error("config: {0}")]
    Config(String),

    /// Bootstrap mount or unmount of the storage root failed.
    #[error("mount: {0}")]
    Mount(String),

    /// The driver is being destroyed and refuses new operations.
    #[error("driver is shutting down")]
    ShuttingDown,

    /// Unexpected failure inside the storage engine.
    #[error("internal error: {0}")]
    Internal(String),
}

impl NetvolError {
    /// Whether retrying the same operation later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, NetvolError::StorageUnavailable(_))
    }

    /// Whether the error reports a missing volume.
    pub fn is_not_found(&self) -> bool {
        matches!(self, NetvolError::NotFound(_))
    }
}
