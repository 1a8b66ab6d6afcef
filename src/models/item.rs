//! Item types and identifiers.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a list item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Creates a new item ID from an existing string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh unique ID.
    ///
    /// UUIDv7 combines a millisecond timestamp with random bits, so ids are
    /// unique even when several items are created within the same
    /// millisecond, and sort roughly by creation time.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::now_v7().to_string())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One entry in a persisted list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier, generated at creation time.
    pub id: ItemId,
    /// User-supplied text content. Never empty after trimming; the store
    /// rejects empty text at the API boundary.
    pub text: String,
    /// Creation timestamp (Unix epoch seconds). Informational only;
    /// ordering is insertion order, not timestamp order.
    pub created_at: u64,
}

impl Item {
    /// Creates a new item with a fresh id and the current timestamp.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: ItemId::generate(),
            text: text.into(),
            created_at: crate::current_timestamp(),
        }
    }
}

/// Where a new item is inserted into the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertPosition {
    /// Insert at the front of the list.
    Prepend,
    /// Insert at the back of the list.
    #[default]
    Append,
}

impl InsertPosition {
    /// Returns the canonical string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Prepend => "prepend",
            Self::Append => "append",
        }
    }
}

impl FromStr for InsertPosition {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Error> {
        match s.to_lowercase().as_str() {
            "prepend" | "front" | "first" => Ok(Self::Prepend),
            "append" | "back" | "last" => Ok(Self::Append),
            other => Err(Error::InvalidInput(format!(
                "unknown insert position '{other}' (expected prepend or append)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = ItemId::generate();
        let b = ItemId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_item_id_display_matches_as_str() {
        let id = ItemId::new("item-1");
        assert_eq!(id.to_string(), "item-1");
        assert_eq!(id.as_str(), "item-1");
    }

    #[test]
    fn test_item_new_sets_timestamp() {
        let item = Item::new("hello");
        assert_eq!(item.text, "hello");
        assert!(item.created_at > 0);
    }

    #[test_case("prepend", InsertPosition::Prepend)]
    #[test_case("front", InsertPosition::Prepend)]
    #[test_case("append", InsertPosition::Append)]
    #[test_case("LAST", InsertPosition::Append)]
    fn test_parse_position(input: &str, expected: InsertPosition) {
        assert_eq!(input.parse::<InsertPosition>().unwrap(), expected);
    }

    #[test]
    fn test_parse_position_unknown_is_invalid_input() {
        let result = "middle".parse::<InsertPosition>();
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_item_serde_roundtrip() {
        let item = Item {
            id: ItemId::new("fixed"),
            text: "Maçã".to_string(),
            created_at: 1_234_567_890,
        };

        let json = serde_json::to_string(&item).unwrap();
        let back: Item = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }
}
