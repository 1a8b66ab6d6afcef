//! In-memory persistence backend.
//!
//! Holds the value in a mutex-guarded slot. Useful for tests and for lists
//! that should not outlive the process.

use crate::storage::traits::{BackendResult, PersistenceBackend};
use std::sync::Mutex;

/// In-memory persistence backend.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    value: Mutex<Option<String>>,
}

impl MemoryBackend {
    /// Creates an empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend pre-seeded with a stored value.
    #[must_use]
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Mutex::new(Some(value.into())),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        match self.value.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl PersistenceBackend for MemoryBackend {
    fn read(&self) -> BackendResult<Option<String>> {
        Ok(self.slot().clone())
    }

    fn write(&self, content: &str) -> BackendResult<()> {
        *self.slot() = Some(content.to_string());
        Ok(())
    }

    fn delete(&self) -> BackendResult<()> {
        *self.slot() = None;
        Ok(())
    }
}
