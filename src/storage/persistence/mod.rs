//! Persistence backend implementations.

mod filesystem;
mod memory;
mod sqlite;

pub use filesystem::FilesystemBackend;
pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;
