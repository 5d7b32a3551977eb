//! Deterministic payload fingerprints.
//!
//! A fingerprint is `hex(SHA-256(canonical_bytes(payload)))`, computed over
//! the application fields only. It is the idempotence/dedup key: identical
//! logical content always yields the identical digest, regardless of field
//! insertion order and of any envelope fields already present.

use sha2::{Digest, Sha256};

use bridge_types::{canonical_bytes, CanonicalError, Payload};

/// Length of a rendered fingerprint in hex characters.
pub const FINGERPRINT_HEX_LEN: usize = 64;

/// Compute the content fingerprint of a payload.
///
/// Pure and total for any canonically encodable payload. Envelope fields
/// (`signature`, `timestamp`, `build_id`, `fingerprint`) are excluded, so
/// the digest is stable across signing-time augmentation.
///
/// # Errors
///
/// Returns `CanonicalError` if the payload cannot be canonically encoded.
pub fn fingerprint(payload: &Payload) -> Result<String, CanonicalError> {
    let bytes = canonical_bytes(&payload.application_fields())?;
    let digest = Sha256::digest(&bytes);
    Ok(hex::encode(digest))
}
