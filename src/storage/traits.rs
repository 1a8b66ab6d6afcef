//! Persistence backend trait.

use thiserror::Error as ThisError;

/// Result type for backend operations.
pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Error raised by a persistence backend.
///
/// Every adapter normalizes its underlying failures into these three kinds so
/// the stores never see backend-specific error types.
#[derive(Debug, ThisError)]
pub enum BackendError {
    /// The backend is unreachable or unsupported in this environment.
    #[error("backend not available: {0}")]
    NotAvailable(String),

    /// Stored content is not valid for the expected encoding.
    #[error("stored content could not be decoded: {0}")]
    Decode(String),

    /// An underlying read, write, or delete failed for any other reason.
    #[error("backend i/o failed during {operation}: {cause}")]
    Io {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

impl BackendError {
    /// Builds an I/O error for the named operation.
    pub fn io(operation: impl Into<String>, cause: impl ToString) -> Self {
        Self::Io {
            operation: operation.into(),
            cause: cause.to_string(),
        }
    }
}

/// Metadata about the stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueInfo {
    /// Whether a value is currently stored.
    pub exists: bool,
    /// Size of the stored value in bytes; 0 when absent.
    pub size: u64,
}

/// Trait for whole-value persistence backends.
///
/// A backend instance is bound to exactly one storage location (a key in a
/// key-value store, or a file path) fixed at construction. Values are opaque
/// UTF-8 strings; every write replaces the whole value and there is no
/// partial update.
pub trait PersistenceBackend: Send + Sync {
    /// Reads the stored value.
    ///
    /// An absent value is `Ok(None)`, never an error.
    fn read(&self) -> BackendResult<Option<String>>;

    /// Replaces the stored value.
    fn write(&self, content: &str) -> BackendResult<()>;

    /// Deletes the stored value. Deleting an absent value succeeds.
    fn delete(&self) -> BackendResult<()>;

    /// Returns metadata about the stored value.
    fn stat(&self) -> BackendResult<ValueInfo> {
        Ok(match self.read()? {
            Some(value) => ValueInfo {
                exists: true,
                size: u64::try_from(value.len()).unwrap_or(u64::MAX),
            },
            None => ValueInfo {
                exists: false,
                size: 0,
            },
        })
    }

    /// Checks whether a value is stored.
    fn exists(&self) -> BackendResult<bool> {
        Ok(self.stat()?.exists)
    }
}
