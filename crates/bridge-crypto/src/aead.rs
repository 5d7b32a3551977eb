//! Symmetric sealing for buffered payloads.
//!
//! XChaCha20-Poly1305 with a random 192-bit nonce per record. The sealed
//! form is `nonce || ciphertext`, a single opaque blob suitable for an
//! append-only store. The key lives in process memory only and is zeroized
//! on drop; only ciphertext is ever durable.

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    XChaCha20Poly1305, XNonce,
};
use zeroize::Zeroize;

use crate::errors::CryptoError;

/// Nonce length in bytes (XChaCha20 uses a 24-byte nonce).
pub const NONCE_LEN: usize = 24;

/// Buffer encryption key (256-bit).
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SecretKey([u8; 32]);

impl SecretKey {
    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse from 64 hex characters.
    pub fn from_hex(hex_str: &str) -> Result<Self, CryptoError> {
        let raw = hex::decode(hex_str)
            .map_err(|e| CryptoError::InvalidKeyMaterial(e.to_string()))?;
        let bytes: [u8; 32] =
            raw.as_slice()
                .try_into()
                .map_err(|_| CryptoError::InvalidKeyLength {
                    expected: 32,
                    actual: raw.len(),
                })?;
        Ok(Self(bytes))
    }

    /// Generate a random key.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut bytes);
        Self(bytes)
    }

    /// Get inner bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

/// Encrypt plaintext, returning `nonce || ciphertext`.
///
/// # Errors
///
/// Returns `CryptoError::EncryptionFailed` if encryption fails.
pub fn seal(key: &SecretKey, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let cipher = XChaCha20Poly1305::new(key.as_bytes().into());

    let mut nonce = [0u8; NONCE_LEN];
    rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut nonce);

    let ciphertext = cipher
        .encrypt(XNonce::from_slice(&nonce), plaintext)
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    sealed.extend_from_slice(&nonce);
    sealed.extend_from_slice(&ciphertext);
    Ok(sealed)
}

/// Decrypt a `nonce || ciphertext` blob.
///
/// # Errors
///
/// Returns `CryptoError::DecryptionFailed` for truncated blobs, tampered
/// ciphertext, or a wrong key.
pub fn open(key: &SecretKey, sealed: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if sealed.len() < NONCE_LEN {
        return Err(CryptoError::DecryptionFailed(format!(
            "sealed blob too short: {} bytes",
            sealed.len()
        )));
    }
    let (nonce, ciphertext) = sealed.split_at(NONCE_LEN);

    let cipher = XChaCha20Poly1305::new(key.as_bytes().into());
    cipher
        .decrypt(XNonce::from_slice(nonce), ciphertext)
        .map_err(|e| CryptoError::DecryptionFailed(e.to_string()))
}
