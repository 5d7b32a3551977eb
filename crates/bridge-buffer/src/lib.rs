//! # Encrypted Buffer
//!
//! Durable, confidentiality-protected queue of payloads that could not be
//! authorized or delivered. Plaintext payload content is never persisted;
//! each record is sealed with XChaCha20-Poly1305 before it touches the
//! store.
//!
//! ## Domain Invariants
//!
//! | # | Invariant | Description |
//! |---|-----------|-------------|
//! | 1 | Ciphertext-only at rest | Only sealed blobs reach durable storage |
//! | 2 | Atomic append | A partially written record is never observable |
//! | 3 | Isolated corruption | A corrupt record never aborts a drain |
//! | 4 | Monotonic identifiers | Record ids strictly increase in insertion order |
//!
//! ## Crate Structure
//!
//! - `ports` - the `BufferStore` trait (outbound SPI)
//! - `adapters` - append-only file store and in-memory store
//! - `service` - `EncryptedBuffer`, the sealing queue over a store

pub mod adapters;
pub mod errors;
pub mod ports;
pub mod service;

pub use adapters::{FileBufferStore, InMemoryBufferStore};
pub use errors::{BufferError, StoreError};
pub use ports::BufferStore;
pub use service::EncryptedBuffer;
