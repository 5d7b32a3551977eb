//! Receiver-side durable record.

use serde::{Deserialize, Serialize};

/// An accepted payload's application fields, persisted by the receiver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Auto-incrementing identifier assigned by the item store.
    pub id: u64,
    /// Application-supplied name.
    pub name: String,
    /// Application-supplied numeric value.
    pub value: f64,
}

impl Item {
    /// Create a new item.
    pub fn new(id: u64, name: impl Into<String>, value: f64) -> Self {
        Self {
            id,
            name: name.into(),
            value,
        }
    }
}
