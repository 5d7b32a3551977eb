//! # Outbound Ports (SPI)
//!
//! Seams between the send orchestration and the outside world: the network
//! delivery gateway and the fingerprint audit sink. Tests substitute mocks;
//! production wires the adapters in `adapters/`.

use std::time::SystemTime;

use async_trait::async_trait;

use bridge_types::Payload;

use crate::errors::{AuditError, TransportError};

/// Acknowledgment returned by a successful delivery.
#[derive(Debug, Clone)]
pub struct DeliveryReceipt {
    /// HTTP status code of the acknowledgment.
    pub status: u16,
    /// Response body, if it parsed as JSON.
    pub body: Option<serde_json::Value>,
}

/// Delivers an augmented payload to the remote receiver.
///
/// Implementations must bound each attempt with a timeout; an attempt that
/// would block indefinitely is a design violation.
#[async_trait]
pub trait DeliveryGateway: Send + Sync {
    /// Attempt one delivery with the bearer token attached.
    async fn deliver(
        &self,
        payload: &Payload,
        token: &str,
    ) -> Result<DeliveryReceipt, TransportError>;
}

/// Append-only sink for `{fingerprint, timestamp}` audit records.
///
/// This is an observability sink for later correlation and dedup detection,
/// not a delivery gate.
pub trait AuditSink: Send + Sync {
    /// Record one fingerprint observation.
    fn record(&self, fingerprint: &str, at: SystemTime) -> Result<(), AuditError>;
}
