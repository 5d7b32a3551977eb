//! File-backed item store.
//!
//! Persists the whole table as a bincode blob, rewritten atomically on each
//! append (temp file + rename). The table is small; rewriting it is cheaper
//! than maintaining an index.

use std::io::Write;
use std::path::{Path, PathBuf};

use bridge_types::Item;
use parking_lot::Mutex;
use tracing::info;

use crate::ports::{ItemStore, ItemStoreError};

/// Durable item store backed by a single file.
pub struct FileItemStore {
    path: PathBuf,
    items: Mutex<Vec<Item>>,
}

impl FileItemStore {
    /// Open the store, loading any existing table.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ItemStoreError> {
        let path = path.as_ref().to_path_buf();

        let items = match std::fs::read(&path) {
            Ok(bytes) if bytes.is_empty() => Vec::new(),
            Ok(bytes) => {
                bincode::deserialize::<Vec<Item>>(&bytes).map_err(|e| {
                    ItemStoreError::Corrupted {
                        message: e.to_string(),
                    }
                })?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        info!(
            path = %path.display(),
            count = items.len(),
            "Opened item store"
        );

        Ok(Self {
            path,
            items: Mutex::new(items),
        })
    }

    fn save(&self, items: &[Item]) -> Result<(), ItemStoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let bytes = bincode::serialize(items).map_err(|e| ItemStoreError::Io {
            message: e.to_string(),
        })?;

        // Write atomically via temp file
        let temp_path = self.path.with_extension("tmp");
        let mut file = std::fs::File::create(&temp_path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        std::fs::rename(&temp_path, &self.path)?;

        Ok(())
    }
}

impl ItemStore for FileItemStore {
    fn append(&self, name: &str, value: f64) -> Result<Item, ItemStoreError> {
        let mut items = self.items.lock();
        let item = Item {
            id: items.len() as u64 + 1,
            name: name.to_string(),
            value,
        };
        items.push(item.clone());

        // Persist before acknowledging; roll back on failure so the
        // in-memory view never claims more than the disk holds.
        if let Err(e) = self.save(&items) {
            items.pop();
            return Err(e);
        }

        Ok(item)
    }

    fn list(&self) -> Result<Vec<Item>, ItemStoreError> {
        Ok(self.items.lock().clone())
    }
}
