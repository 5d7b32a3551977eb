//! Crypto error types.

use std::path::PathBuf;
use thiserror::Error;

use bridge_types::CanonicalError;

/// Cryptographic operation errors.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Key material could not be loaded from its configured location.
    #[error("key material unavailable at {path}: {reason}")]
    KeyUnavailable {
        /// Configured key path.
        path: PathBuf,
        /// Underlying cause.
        reason: String,
    },

    /// Key material could not be persisted.
    #[error("failed to persist key material at {path}: {reason}")]
    KeyPersistFailed {
        /// Configured key path.
        path: PathBuf,
        /// Underlying cause.
        reason: String,
    },

    /// Key bytes were present but not decodable.
    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(String),

    /// Invalid key length.
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length in bytes.
        expected: usize,
        /// Actual key length in bytes.
        actual: usize,
    },

    /// Encryption failed.
    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    /// Decryption failed (wrong key, tampered ciphertext, truncated frame).
    #[error("decryption failed: {0}")]
    DecryptionFailed(String),

    /// The payload could not be canonically encoded for signing or hashing.
    #[error(transparent)]
    Canonical(#[from] CanonicalError),
}
