//! The list store.
//!
//! Owns the authoritative in-memory copy of a persisted list and keeps the
//! backend content exactly consistent with it after every successful
//! mutation. Mutations are serialized behind one mutex, and a failed write
//! rolls the in-memory list back so callers never observe a partial mutation.

use crate::models::{InsertPosition, Item, ItemId};
use crate::storage::{BackendError, PersistenceBackend};
use crate::{Error, Result};
use std::collections::HashSet;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};

/// How `load` treats stored content that cannot be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodePolicy {
    /// Surface the failure as [`Error::Read`]. The stored blob is left
    /// untouched so it can be inspected or repaired.
    #[default]
    Error,
    /// Treat the undecodable blob as an empty list. The blob is not deleted;
    /// the next successful mutation overwrites it.
    ResetToEmpty,
}

impl FromStr for DecodePolicy {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Error> {
        match s.to_lowercase().as_str() {
            "error" | "strict" => Ok(Self::Error),
            "reset" | "reset-to-empty" => Ok(Self::ResetToEmpty),
            other => Err(Error::InvalidInput(format!(
                "unknown decode policy '{other}' (expected error or reset)"
            ))),
        }
    }
}

/// In-memory state guarded by the store mutex.
#[derive(Debug, Default)]
struct Inner {
    items: Vec<Item>,
    /// Whether `items` has been populated from the backend yet.
    loaded: bool,
}

/// A write-through persisted ordered list.
///
/// The backend is injected at construction and holds the whole list as one
/// serialized value. After any operation returns successfully, re-decoding
/// the backend content yields exactly the in-memory list.
pub struct ListStore {
    backend: Box<dyn PersistenceBackend>,
    inner: Mutex<Inner>,
    decode_policy: DecodePolicy,
}

impl ListStore {
    /// Creates a list store over the given backend with the default
    /// [`DecodePolicy::Error`].
    #[must_use]
    pub fn new(backend: Box<dyn PersistenceBackend>) -> Self {
        Self {
            backend,
            inner: Mutex::new(Inner::default()),
            decode_policy: DecodePolicy::default(),
        }
    }

    /// Sets the decode policy.
    #[must_use]
    pub fn with_decode_policy(mut self, policy: DecodePolicy) -> Self {
        self.decode_policy = policy;
        self
    }

    /// Loads the list from the backend and returns a snapshot.
    ///
    /// An absent stored value is an empty list, never an error. Undecodable
    /// content is handled per the configured [`DecodePolicy`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Read`] if the backend read fails, or if the stored
    /// content does not decode under [`DecodePolicy::Error`].
    pub fn load(&self) -> Result<Vec<Item>> {
        let mut inner = self.lock();
        inner.items = self.read_items()?;
        inner.loaded = true;
        Ok(inner.items.clone())
    }

    /// Adds a new item and persists the updated list.
    ///
    /// The text is trimmed before storage. Returns the created item.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the trimmed text is empty,
    /// [`Error::Read`] if the list has to be loaded first and that fails, and
    /// [`Error::Write`] if persisting fails, in which case the in-memory
    /// list is rolled back to its pre-mutation state.
    pub fn add(&self, text: &str, position: InsertPosition) -> Result<Item> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::InvalidInput("item text cannot be empty".to_string()));
        }

        let mut inner = self.lock();
        self.ensure_loaded(&mut inner)?;

        let item = Item::new(text);
        match position {
            InsertPosition::Prepend => inner.items.insert(0, item.clone()),
            InsertPosition::Append => inner.items.push(item.clone()),
        }

        if let Err(e) = self.persist(&inner.items) {
            // Roll back so the caller never observes the failed insert.
            match position {
                InsertPosition::Prepend => {
                    inner.items.remove(0);
                },
                InsertPosition::Append => {
                    inner.items.pop();
                },
            }
            return Err(e);
        }

        tracing::debug!(id = %item.id, position = position.as_str(), "item added");
        Ok(item)
    }

    /// Removes the item with the given id and persists the updated list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no item has that id, and
    /// [`Error::Write`] with the in-memory list rolled back if persisting
    /// fails.
    pub fn remove(&self, id: &ItemId) -> Result<()> {
        let mut inner = self.lock();
        self.ensure_loaded(&mut inner)?;

        let index = inner
            .items
            .iter()
            .position(|item| &item.id == id)
            .ok_or_else(|| Error::NotFound(id.clone()))?;

        let removed = inner.items.remove(index);

        if let Err(e) = self.persist(&inner.items) {
            inner.items.insert(index, removed);
            return Err(e);
        }

        tracing::debug!(id = %id, "item removed");
        Ok(())
    }

    /// Empties the list and deletes the backing value.
    ///
    /// Idempotent: clearing an already-empty list succeeds silently.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Write`] if the backend delete fails; the in-memory
    /// list is left as it was.
    pub fn clear(&self) -> Result<()> {
        let mut inner = self.lock();

        self.backend.delete().map_err(Error::Write)?;
        inner.items.clear();
        inner.loaded = true;

        tracing::debug!("list cleared");
        Ok(())
    }

    /// Returns a snapshot of the current in-memory list.
    ///
    /// Reflects the backend once `load` or any mutation has run; before
    /// that it is empty.
    #[must_use]
    pub fn items(&self) -> Vec<Item> {
        self.lock().items.clone()
    }

    /// Returns the number of items currently in memory.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    /// Returns whether the in-memory list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    /// Acquires the state lock, recovering from poison.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::warn!("list store mutex was poisoned, recovering");
                poisoned.into_inner()
            },
        }
    }

    /// Populates the in-memory list from the backend on first use.
    ///
    /// Mutations go through here so an `add` on a freshly-constructed store
    /// extends the persisted list instead of clobbering it.
    fn ensure_loaded(&self, inner: &mut Inner) -> Result<()> {
        if !inner.loaded {
            inner.items = self.read_items()?;
            inner.loaded = true;
        }
        Ok(())
    }

    /// Reads and decodes the persisted list.
    fn read_items(&self) -> Result<Vec<Item>> {
        let Some(blob) = self.backend.read().map_err(Error::Read)? else {
            return Ok(Vec::new());
        };

        match decode_items(&blob) {
            Ok(items) => Ok(items),
            Err(e) => match self.decode_policy {
                DecodePolicy::Error => Err(Error::Read(e)),
                DecodePolicy::ResetToEmpty => {
                    tracing::warn!(error = %e, "stored list is undecodable, starting empty");
                    Ok(Vec::new())
                },
            },
        }
    }

    /// Serializes and writes the whole list.
    fn persist(&self, items: &[Item]) -> Result<()> {
        let blob = encode_items(items).map_err(Error::Write)?;
        self.backend.write(&blob).map_err(Error::Write)
    }
}

/// Serializes a list to its stored JSON form.
pub(crate) fn encode_items(items: &[Item]) -> std::result::Result<String, BackendError> {
    serde_json::to_string(items).map_err(|e| BackendError::io("serialize_list", e))
}

/// Decodes a stored JSON blob, enforcing the id-uniqueness invariant.
pub(crate) fn decode_items(blob: &str) -> std::result::Result<Vec<Item>, BackendError> {
    let items: Vec<Item> = serde_json::from_str(blob)
        .map_err(|e| BackendError::Decode(format!("malformed list blob: {e}")))?;

    let mut seen = HashSet::new();
    for item in &items {
        if !seen.insert(&item.id) {
            return Err(BackendError::Decode(format!(
                "duplicate item id in stored list: {}",
                item.id
            )));
        }
    }

    Ok(items)
}
