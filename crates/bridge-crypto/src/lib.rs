//! # Bridge Cryptography
//!
//! Cryptographic primitives for the bridge trust pipeline.
//!
//! ## Contents
//!
//! - **Fingerprints**: deterministic SHA-256 content digests over the
//!   canonical payload encoding, rendered as lowercase hex
//! - **Signatures**: Ed25519 payload signing and verification, with
//!   generate-once PEM key persistence
//! - **AEAD**: XChaCha20-Poly1305 sealing for the encrypted buffer
//!
//! ## Security Properties
//!
//! - Signing and verification reconstruct the signed bytes through the same
//!   canonical encoding; there is no second serialization path
//! - Verification is a boolean outcome, never an exceptional one
//! - Key material is zeroized on drop; existing keys are never overwritten

pub mod aead;
pub mod errors;
pub mod fingerprint;
pub mod signing;

pub use aead::{open, seal, SecretKey};
pub use errors::CryptoError;
pub use fingerprint::fingerprint;
pub use signing::{KeyPaths, PayloadVerifier, SigningIdentity};
