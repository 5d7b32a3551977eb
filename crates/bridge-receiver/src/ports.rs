//! Storage port for accepted items.

use bridge_types::Item;
use thiserror::Error;

/// Item store errors.
#[derive(Debug, Error)]
pub enum ItemStoreError {
    /// Underlying I/O failure.
    #[error("item store I/O error: {message}")]
    Io {
        /// Human-readable cause.
        message: String,
    },

    /// Persisted table could not be decoded.
    #[error("item store corrupted: {message}")]
    Corrupted {
        /// Human-readable cause.
        message: String,
    },
}

impl From<std::io::Error> for ItemStoreError {
    fn from(err: std::io::Error) -> Self {
        ItemStoreError::Io {
            message: err.to_string(),
        }
    }
}

/// Durable, append-oriented store of accepted items.
///
/// Identifiers are assigned by the store, monotonically from 1.
pub trait ItemStore: Send + Sync {
    /// Persist a new item and return it with its assigned id.
    fn append(&self, name: &str, value: f64) -> Result<Item, ItemStoreError>;

    /// All items in insertion order.
    fn list(&self) -> Result<Vec<Item>, ItemStoreError>;
}
