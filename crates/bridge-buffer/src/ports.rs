//! # Outbound Port (SPI)
//!
//! The durable store the encrypted buffer writes through. The buffer only
//! ever hands sealed blobs to the store; confidentiality is enforced above
//! this seam, durability below it.

use crate::errors::StoreError;

/// Append-only durable store of opaque records.
///
/// Implementations must make `append` atomic: after a crash, a record is
/// either fully present or absent. Identifiers increase strictly in
/// insertion order.
pub trait BufferStore: Send {
    /// Append a record, returning its identifier.
    fn append(&mut self, record: &[u8]) -> Result<u64, StoreError>;

    /// All records in insertion order.
    fn scan(&self) -> Result<Vec<(u64, Vec<u8>)>, StoreError>;

    /// Remove every record.
    fn clear(&mut self) -> Result<(), StoreError>;

    /// Number of records.
    fn len(&self) -> Result<usize, StoreError> {
        Ok(self.scan()?.len())
    }
}
