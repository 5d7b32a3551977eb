//! Buffer error types.

use thiserror::Error;

use bridge_crypto::CryptoError;
use bridge_types::CanonicalError;

/// Errors from the durable store beneath the buffer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying I/O failure.
    #[error("buffer store I/O error: {message}")]
    Io {
        /// Description of the failure.
        message: String,
    },
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        Self::Io {
            message: e.to_string(),
        }
    }
}

/// Errors from the encrypted buffer.
#[derive(Debug, Error)]
pub enum BufferError {
    /// The payload could not be canonically encoded for sealing.
    #[error(transparent)]
    Canonical(#[from] CanonicalError),

    /// Sealing failed before anything was written.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// The durable store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A single record failed to decrypt or decode on drain. Reported in
    /// place; never aborts the drain of remaining records.
    #[error("buffer record {id} is corrupt: {reason}")]
    CorruptRecord {
        /// Identifier of the corrupt record.
        id: u64,
        /// Why the record could not be recovered.
        reason: String,
    },
}
