//! Transmitter error types.

use thiserror::Error;

use bridge_buffer::BufferError;
use bridge_crypto::CryptoError;
use bridge_types::CanonicalError;

/// Transport-level delivery failures. These trigger buffering, never a
/// retry loop.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The delivery attempt exceeded its timeout.
    #[error("delivery timed out")]
    Timeout,

    /// The receiver could not be reached.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The receiver answered with a non-success status.
    #[error("receiver returned status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// Request construction or response handling failed.
    #[error("transport error: {0}")]
    Other(String),
}

/// Audit sink failures. The sink is observability, not a gate; callers log
/// these and continue.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Underlying I/O failure.
    #[error("audit log I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The audit entry could not be encoded.
    #[error("audit entry encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Fatal errors for a send or replay attempt.
///
/// Transport failures are *not* represented here: they degrade to buffering
/// and surface through `SendOutcome::Buffered`.
#[derive(Debug, Error)]
pub enum TransmitError {
    /// The payload cannot be canonically encoded. Nothing representable can
    /// be buffered, so this is fatal.
    #[error(transparent)]
    Serialization(#[from] CanonicalError),

    /// Key material unavailable or signing failed.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// The fallback buffer itself failed.
    #[error(transparent)]
    Buffer(#[from] BufferError),

    /// Replay was requested with an invalid or expired token.
    #[error("replay refused: bearer token invalid or expired")]
    Unauthorized,
}
