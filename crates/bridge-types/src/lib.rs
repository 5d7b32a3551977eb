//! # Shared Bridge Types
//!
//! Domain types shared by the transmitter and receiver sides of the bridge.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: the canonical byte encoding used for
//!   fingerprinting, signing, and verification lives here and nowhere else.
//!   Both sides reconstruct signed bytes through [`Payload::application_fields`];
//!   independent re-implementations are forbidden because any divergence in
//!   key ordering breaks every signature.
//! - **No ambient state**: every type is a plain value; configuration and
//!   I/O belong to the component crates.

pub mod canonical;
pub mod item;
pub mod payload;

pub use canonical::{canonical_bytes, CanonicalError};
pub use item::Item;
pub use payload::{
    Payload, BUILD_ID_FIELD, ENVELOPE_FIELDS, FINGERPRINT_FIELD, SIGNATURE_FIELD, TIMESTAMP_FIELD,
};
