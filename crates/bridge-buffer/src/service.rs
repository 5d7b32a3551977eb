//! The encrypted buffer service.

use parking_lot::Mutex;
use tracing::{debug, warn};

use bridge_crypto::{open, seal, SecretKey};
use bridge_types::{canonical_bytes, Payload};

use crate::errors::BufferError;
use crate::ports::BufferStore;

/// Durable, confidentiality-protected queue of undeliverable payloads.
///
/// Payloads are canonically serialized, sealed with XChaCha20-Poly1305, and
/// appended to the underlying store. The symmetric key never leaves process
/// memory; only ciphertext is durable. The buffer is unbounded — capacity
/// management is out of scope.
pub struct EncryptedBuffer<S: BufferStore> {
    key: SecretKey,
    store: Mutex<S>,
}

impl<S: BufferStore> EncryptedBuffer<S> {
    /// Create a buffer over a store with the process-wide buffer key.
    pub fn new(key: SecretKey, store: S) -> Self {
        Self {
            key,
            store: Mutex::new(store),
        }
    }

    /// Seal a payload and append it durably.
    ///
    /// Succeeds or fails atomically: sealing happens before the store is
    /// touched, and the store's append is all-or-nothing.
    pub fn enqueue(&self, payload: &Payload) -> Result<u64, BufferError> {
        let plaintext = canonical_bytes(payload)?;
        let sealed = seal(&self.key, &plaintext)?;

        let id = self.store.lock().append(&sealed)?;
        debug!(record_id = id, "Payload buffered");
        Ok(id)
    }

    /// Decrypt and decode every record, in insertion order.
    ///
    /// A record that fails to decrypt or decode yields
    /// [`BufferError::CorruptRecord`] in place; the drain continues with the
    /// remaining records. The store itself is left untouched.
    pub fn drain_all(&self) -> Result<Vec<Result<Payload, BufferError>>, BufferError> {
        let records = self.store.lock().scan()?;
        Ok(records
            .into_iter()
            .map(|(id, sealed)| self.recover(id, &sealed))
            .collect())
    }

    /// Drain and clear in one step, under a single lock.
    ///
    /// Used by replay: the caller takes ownership of every recoverable
    /// payload and the store is emptied so replayed failures can re-enqueue
    /// without duplication.
    pub fn take_all(&self) -> Result<Vec<Result<Payload, BufferError>>, BufferError> {
        let mut store = self.store.lock();
        let records = store.scan()?;
        let recovered: Vec<_> = records
            .into_iter()
            .map(|(id, sealed)| self.recover(id, &sealed))
            .collect();
        store.clear()?;
        Ok(recovered)
    }

    /// Number of buffered records.
    pub fn len(&self) -> Result<usize, BufferError> {
        Ok(self.store.lock().len()?)
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> Result<bool, BufferError> {
        Ok(self.len()? == 0)
    }

    fn recover(&self, id: u64, sealed: &[u8]) -> Result<Payload, BufferError> {
        let plaintext = open(&self.key, sealed).map_err(|e| {
            warn!(record_id = id, "Buffer record failed to decrypt");
            BufferError::CorruptRecord {
                id,
                reason: e.to_string(),
            }
        })?;

        // Strict structured decode: a record must be a JSON object. Buffer
        // content is never evaluated as anything but data.
        let map: serde_json::Map<String, serde_json::Value> = serde_json::from_slice(&plaintext)
            .map_err(|e| BufferError::CorruptRecord {
                id,
                reason: format!("not a payload object: {e}"),
            })?;
        Ok(Payload::from_map(map))
    }
}
