//! In-memory item store for tests and ephemeral deployments.

use bridge_types::Item;
use parking_lot::Mutex;

use crate::ports::{ItemStore, ItemStoreError};

/// Volatile item store. Contents are lost on restart.
#[derive(Default)]
pub struct InMemoryItemStore {
    items: Mutex<Vec<Item>>,
}

impl InMemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ItemStore for InMemoryItemStore {
    fn append(&self, name: &str, value: f64) -> Result<Item, ItemStoreError> {
        let mut items = self.items.lock();
        let item = Item {
            id: items.len() as u64 + 1,
            name: name.to_string(),
            value,
        };
        items.push(item.clone());
        Ok(item)
    }

    fn list(&self) -> Result<Vec<Item>, ItemStoreError> {
        Ok(self.items.lock().clone())
    }
}
