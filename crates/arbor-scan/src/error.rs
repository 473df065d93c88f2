//! Error taxonomy for row scans.

use arbor_store::StoreError;
use arbor_types::RepositoryId;

/// Errors surfaced by a scan or while preparing one.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// A referenced commit or tree does not resolve in the store.
    #[error("object not found: {0}")]
    ObjectNotFound(String),

    /// The commit enumeration of a repository failed mid-stream.
    #[error("malformed history in repository {repository}: {reason}")]
    MalformedHistory {
        repository: RepositoryId,
        reason: String,
    },

    /// An object exists but cannot be read (corrupt data, wrong kind).
    #[error("object store error: {0}")]
    Store(StoreError),

    /// The scan configuration could not be resolved.
    #[error("invalid scan context: {0}")]
    InvalidScanContext(String),

    /// A pushed-down filter uses a column or operator the scan cannot evaluate.
    #[error("unsupported selector on column {column}: {op}")]
    SelectorUnsupported { column: String, op: String },
}

impl ScanError {
    /// Whether skip-policy may absorb this error.
    ///
    /// Object access failures are skippable; configuration and selector
    /// errors never are.
    pub fn is_skippable(&self) -> bool {
        match self {
            Self::ObjectNotFound(_) | Self::MalformedHistory { .. } | Self::Store(_) => true,
            Self::InvalidScanContext(_) | Self::SelectorUnsupported { .. } => false,
        }
    }
}

impl From<StoreError> for ScanError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::ObjectNotFound(id.to_hex()),
            other => Self::Store(other),
        }
    }
}

/// Result alias for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;
