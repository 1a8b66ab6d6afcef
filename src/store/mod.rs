//! Store implementations over the persistence backends.
//!
//! [`ListStore`] is the structured variant: an ordered list serialized as one
//! JSON blob, write-through on every mutation. [`DocumentStore`] is the
//! degenerate single-value variant: one raw text document, no encoding. Both
//! take any [`PersistenceBackend`](crate::storage::PersistenceBackend) by
//! injection.

mod document;
mod list;

pub use document::DocumentStore;
pub use list::{DecodePolicy, ListStore};
