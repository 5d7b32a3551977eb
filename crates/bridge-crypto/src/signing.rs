//! Ed25519 payload signing with generate-once key persistence.
//!
//! One keypair exists per deployment identity. The private half is persisted
//! as PKCS#8 PEM, the public half as SPKI PEM, at configured filesystem
//! paths. Existing key material is never regenerated or overwritten: doing so
//! would invalidate every previously issued signature.
//!
//! Signatures cover the canonical encoding of the payload's application
//! fields. Verification reconstructs the identical byte sequence through the
//! same encoder and returns a boolean outcome, never an error.

use std::path::{Path, PathBuf};

use ed25519_dalek::pkcs8::spki::der::pem::LineEnding;
use ed25519_dalek::pkcs8::spki::{DecodePublicKey, EncodePublicKey};
use ed25519_dalek::pkcs8::{DecodePrivateKey, EncodePrivateKey};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use tracing::info;

use crate::errors::CryptoError;
use bridge_types::{canonical_bytes, Payload};

/// Configured locations of the persisted keypair.
#[derive(Debug, Clone)]
pub struct KeyPaths {
    /// Private key (PKCS#8 PEM, unencrypted).
    pub private_key: PathBuf,
    /// Public key (SPKI PEM).
    pub public_key: PathBuf,
}

impl KeyPaths {
    /// Standard key locations under a data directory.
    pub fn under(data_dir: &Path) -> Self {
        Self {
            private_key: data_dir.join("keys/bridge_signing.pem"),
            public_key: data_dir.join("keys/bridge_signing.pub.pem"),
        }
    }
}

/// The deployment's signing identity.
#[derive(Debug)]
pub struct SigningIdentity {
    signing_key: SigningKey,
}

impl SigningIdentity {
    /// Load the keypair, generating and persisting a fresh one only when the
    /// private key file is absent. Idempotent; never overwrites existing
    /// material.
    pub fn load_or_generate(paths: &KeyPaths) -> Result<Self, CryptoError> {
        if paths.private_key.exists() {
            let identity = Self::load(paths)?;
            // Re-derive the public half if it went missing; the private key
            // stays authoritative.
            if !paths.public_key.exists() {
                write_public_pem(&identity.signing_key.verifying_key(), &paths.public_key)?;
            }
            return Ok(identity);
        }

        let signing_key = SigningKey::generate(&mut rand::thread_rng());
        write_private_pem(&signing_key, &paths.private_key)?;
        write_public_pem(&signing_key.verifying_key(), &paths.public_key)?;
        info!(path = %paths.private_key.display(), "Generated new signing keypair");

        Ok(Self { signing_key })
    }

    /// Load an existing keypair.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::KeyUnavailable` if the private key cannot be
    /// read or decoded.
    pub fn load(paths: &KeyPaths) -> Result<Self, CryptoError> {
        let pem = std::fs::read_to_string(&paths.private_key).map_err(|e| {
            CryptoError::KeyUnavailable {
                path: paths.private_key.clone(),
                reason: e.to_string(),
            }
        })?;
        let signing_key =
            SigningKey::from_pkcs8_pem(&pem).map_err(|e| CryptoError::KeyUnavailable {
                path: paths.private_key.clone(),
                reason: e.to_string(),
            })?;
        Ok(Self { signing_key })
    }

    /// Sign a payload, returning the signature as hex.
    ///
    /// Envelope fields are excluded from the signed bytes, so signing an
    /// already-augmented payload yields the same signature as signing the
    /// original.
    pub fn sign_payload(&self, payload: &Payload) -> Result<String, CryptoError> {
        let message = canonical_bytes(&payload.application_fields())?;
        let signature = self.signing_key.sign(&message);
        Ok(hex::encode(signature.to_bytes()))
    }

    /// The paired verifier.
    pub fn verifier(&self) -> PayloadVerifier {
        PayloadVerifier {
            verifying_key: self.signing_key.verifying_key(),
        }
    }
}

/// Verifies payload signatures with the public half of the keypair.
#[derive(Debug, Clone)]
pub struct PayloadVerifier {
    verifying_key: VerifyingKey,
}

impl PayloadVerifier {
    /// Load a verifier from an SPKI PEM file.
    pub fn load(path: &Path) -> Result<Self, CryptoError> {
        let pem = std::fs::read_to_string(path).map_err(|e| CryptoError::KeyUnavailable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_pem(&pem)
    }

    /// Parse a verifier from SPKI PEM text.
    pub fn from_pem(pem: &str) -> Result<Self, CryptoError> {
        let verifying_key = VerifyingKey::from_public_key_pem(pem)
            .map_err(|e| CryptoError::InvalidKeyMaterial(e.to_string()))?;
        Ok(Self { verifying_key })
    }

    /// Verify a hex-encoded signature against a payload.
    ///
    /// Returns `false` on any mismatch: malformed hex, wrong signature
    /// length, unencodable payload, or failed cryptographic verification.
    /// Verification failure is a boolean outcome, not an exceptional one.
    pub fn verify_payload(&self, payload: &Payload, signature_hex: &str) -> bool {
        let Ok(raw) = hex::decode(signature_hex) else {
            return false;
        };
        let Ok(sig_bytes) = <[u8; 64]>::try_from(raw.as_slice()) else {
            return false;
        };
        let Ok(message) = canonical_bytes(&payload.application_fields()) else {
            return false;
        };
        let signature = Signature::from_bytes(&sig_bytes);
        self.verifying_key.verify(&message, &signature).is_ok()
    }
}

fn write_private_pem(key: &SigningKey, path: &Path) -> Result<(), CryptoError> {
    let pem = key
        .to_pkcs8_pem(LineEnding::LF)
        .map_err(|e| CryptoError::KeyPersistFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    write_key_file(path, pem.as_bytes())
}

fn write_public_pem(key: &VerifyingKey, path: &Path) -> Result<(), CryptoError> {
    let pem = key
        .to_public_key_pem(LineEnding::LF)
        .map_err(|e| CryptoError::KeyPersistFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    write_key_file(path, pem.as_bytes())
}

fn write_key_file(path: &Path, bytes: &[u8]) -> Result<(), CryptoError> {
    let persist_err = |e: std::io::Error| CryptoError::KeyPersistFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(persist_err)?;
    }
    std::fs::write(path, bytes).map_err(persist_err)
}
