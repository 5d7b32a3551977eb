//! # Transmitter
//!
//! Orchestrates the send pipeline:
//!
//! ```text
//! caller ──→ token check ──invalid──→ EncryptedBuffer (original payload)
//!               │valid
//!               ↓
//!         sign + fingerprint ──→ audit log ──→ delivery gateway
//!                                                  │
//!                              success ←───────────┴──────→ failure
//!                                 │                            │
//!                            Acknowledged            EncryptedBuffer
//!                                                  (augmented payload)
//! ```
//!
//! Non-retrying: any authorization or transport failure causes exactly one
//! buffering decision. Replay is a separate, operator-triggered operation.

pub mod adapters;
pub mod errors;
pub mod ports;
pub mod service;

pub use adapters::{FileAuditSink, HttpDeliveryGateway};
pub use errors::{AuditError, TransmitError, TransportError};
pub use ports::{AuditSink, DeliveryGateway, DeliveryReceipt};
pub use service::{BufferReason, ReplayReport, SendOutcome, Transmitter, BUILD_ID};
