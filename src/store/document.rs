//! The document store.
//!
//! The single-value counterpart of [`ListStore`](crate::ListStore): one
//! unstructured text document per backend, no list encoding. Save and read
//! pass the text through verbatim.

use crate::storage::{PersistenceBackend, ValueInfo};
use crate::{Error, Result};

/// A single persisted text document over a whole-value backend.
pub struct DocumentStore {
    backend: Box<dyn PersistenceBackend>,
}

impl DocumentStore {
    /// Creates a document store over the given backend.
    #[must_use]
    pub fn new(backend: Box<dyn PersistenceBackend>) -> Self {
        Self { backend }
    }

    /// Replaces the document content.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Write`] if the backend write fails.
    pub fn save(&self, text: &str) -> Result<()> {
        self.backend.write(text).map_err(Error::Write)?;
        tracing::debug!(bytes = text.len(), "document saved");
        Ok(())
    }

    /// Reads the document content; `None` if no document is stored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Read`] if the backend read fails.
    pub fn read(&self) -> Result<Option<String>> {
        self.backend.read().map_err(Error::Read)
    }

    /// Deletes the document. Deleting an absent document succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Write`] if the backend delete fails.
    pub fn delete(&self) -> Result<()> {
        self.backend.delete().map_err(Error::Write)
    }

    /// Returns existence and size metadata for the document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Read`] if the backend stat fails.
    pub fn info(&self) -> Result<ValueInfo> {
        self.backend.stat().map_err(Error::Read)
    }
}
