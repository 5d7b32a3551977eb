//! In-memory store for tests and ephemeral buffering.

use crate::errors::StoreError;
use crate::ports::BufferStore;

/// Volatile store keeping records in a `Vec`.
#[derive(Default)]
pub struct InMemoryBufferStore {
    records: Vec<Vec<u8>>,
}

impl InMemoryBufferStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl BufferStore for InMemoryBufferStore {
    fn append(&mut self, record: &[u8]) -> Result<u64, StoreError> {
        self.records.push(record.to_vec());
        Ok(self.records.len() as u64)
    }

    fn scan(&self) -> Result<Vec<(u64, Vec<u8>)>, StoreError> {
        Ok(self
            .records
            .iter()
            .enumerate()
            .map(|(i, r)| (i as u64 + 1, r.clone()))
            .collect())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.records.clear();
        Ok(())
    }

    fn len(&self) -> Result<usize, StoreError> {
        Ok(self.records.len())
    }
}
