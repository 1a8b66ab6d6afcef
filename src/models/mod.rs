//! Data models for listkeep.
//!
//! This module contains the core data structures used throughout the system.

mod item;

pub use item::{InsertPosition, Item, ItemId};
