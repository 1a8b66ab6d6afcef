//! # Listkeep
//!
//! A write-through persisted list store.
//!
//! Listkeep keeps an in-memory ordered list of items exactly consistent with
//! a single whole-value storage location: every mutation is persisted before
//! it is acknowledged to the caller, and a failed write rolls the in-memory
//! list back to its pre-mutation state.
//!
//! ## Features
//!
//! - Pluggable persistence backends (SQLite key-value, flat file, in-memory)
//! - Write-through with rollback on write failure (no partial mutations)
//! - Serialized mutations, safe to share across threads via `Arc`
//! - Configurable handling of undecodable stored content
//! - A separate single-document store for unstructured text values
//!
//! ## Example
//!
//! ```rust
//! use listkeep::storage::MemoryBackend;
//! use listkeep::{InsertPosition, ListStore};
//!
//! # fn main() -> listkeep::Result<()> {
//! let store = ListStore::new(Box::new(MemoryBackend::new()));
//! let item = store.add("Maçã", InsertPosition::Append)?;
//! assert_eq!(store.load()?.len(), 1);
//! store.remove(&item.id)?;
//! # Ok(())
//! # }
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod config;
pub mod models;
pub mod storage;
pub mod store;

// Re-exports for convenience
pub use config::{BackendKind, ListkeepConfig};
pub use models::{InsertPosition, Item, ItemId};
pub use storage::{BackendError, PersistenceBackend, ValueInfo};
pub use store::{DecodePolicy, DocumentStore, ListStore};

/// Error type for listkeep operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait implementations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Item text is empty after trimming, unknown backend name in config |
/// | `NotFound` | `remove` referenced an id not present in the list |
/// | `Read` | Backend read failed, or stored content could not be decoded |
/// | `Write` | Backend write or delete failed; the mutation was rolled back |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - Item text is empty or whitespace-only
    /// - A configuration value cannot be parsed (e.g. unknown backend name)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The referenced item does not exist.
    #[error("no item with id '{0}'")]
    NotFound(ItemId),

    /// Reading or decoding persisted content failed.
    ///
    /// An absent value is never a read error; `load` treats it as an empty
    /// list. This variant covers backend I/O failures and, under
    /// [`DecodePolicy::Error`], stored content that does not decode.
    #[error("failed to read persisted content")]
    Read(#[source] BackendError),

    /// Writing or deleting persisted content failed.
    ///
    /// The in-memory list is rolled back before this is returned, so the
    /// caller never observes a partially-applied mutation.
    #[error("failed to write persisted content")]
    Write(#[source] BackendError),
}

/// Result type alias for listkeep operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Returns the current Unix timestamp in seconds.
///
/// Centralized so every item carries a timestamp from the same clock.
/// Falls back to 0 if the system clock is before the Unix epoch.
///
/// # Examples
///
/// ```rust
/// use listkeep::current_timestamp;
///
/// let ts = current_timestamp();
/// assert!(ts > 0);
/// ```
#[must_use]
pub fn current_timestamp() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidInput("text cannot be empty".to_string());
        assert_eq!(err.to_string(), "invalid input: text cannot be empty");

        let err = Error::NotFound(ItemId::new("abc"));
        assert_eq!(err.to_string(), "no item with id 'abc'");

        let err = Error::Read(BackendError::Decode("bad json".to_string()));
        assert_eq!(err.to_string(), "failed to read persisted content");
    }

    #[test]
    fn test_error_source_is_backend_error() {
        use std::error::Error as _;

        let err = Error::Write(BackendError::Io {
            operation: "write_value".to_string(),
            cause: "disk full".to_string(),
        });
        let source = err.source().map(|s| s.to_string());
        assert_eq!(
            source.as_deref(),
            Some("backend i/o failed during write_value: disk full")
        );
    }
}
