//! Storage layer abstraction.
//!
//! A [`PersistenceBackend`] is a whole-value storage location: read, replace,
//! or delete one opaque string. Three adapters implement the contract:
//! - [`SqliteBackend`]: one key in a `SQLite` key-value table
//! - [`FilesystemBackend`]: one UTF-8 text file
//! - [`MemoryBackend`]: one in-process slot (tests, ephemeral lists)

pub mod persistence;
pub mod traits;

pub use persistence::{FilesystemBackend, MemoryBackend, SqliteBackend};
pub use traits::{BackendError, BackendResult, PersistenceBackend, ValueInfo};
