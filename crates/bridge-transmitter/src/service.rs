//! Send orchestration service.

use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::json;
use tracing::{info, warn};

use bridge_auth::AuthContext;
use bridge_buffer::{BufferError, BufferStore, EncryptedBuffer};
use bridge_crypto::{fingerprint, SigningIdentity};
use bridge_types::{
    Payload, BUILD_ID_FIELD, FINGERPRINT_FIELD, SIGNATURE_FIELD, TIMESTAMP_FIELD,
};

use crate::errors::{TransmitError, TransportError};
use crate::ports::{AuditSink, DeliveryGateway, DeliveryReceipt};

/// Fixed string identifying the sender build, stamped into every signed
/// payload.
pub const BUILD_ID: &str = "BRG-v0.4";

/// Why a payload was diverted to the buffer.
#[derive(Debug)]
pub enum BufferReason {
    /// The caller-held token failed validation; the payload was buffered
    /// unsigned, with no network attempt.
    Unauthorized,
    /// Delivery failed at the transport level; the payload was buffered in
    /// augmented form so replay need not re-sign.
    SendFailed(TransportError),
}

/// Terminal state of one send attempt.
#[derive(Debug)]
pub enum SendOutcome {
    /// The receiver acknowledged delivery.
    Acknowledged {
        /// Content fingerprint of the delivered payload.
        fingerprint: String,
        /// The receiver's acknowledgment.
        receipt: DeliveryReceipt,
    },
    /// The payload was durably buffered instead of delivered.
    Buffered {
        /// Identifier of the new buffer record.
        record_id: u64,
        /// What diverted the payload.
        reason: BufferReason,
    },
}

/// Outcome of one operator-triggered replay pass.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReplayReport {
    /// Records delivered and acknowledged.
    pub delivered: usize,
    /// Records whose delivery failed again and were re-buffered.
    pub rebuffered: usize,
    /// Records that could not be decrypted or decoded; dropped.
    pub corrupt: usize,
}

/// The send pipeline: validate token, sign and fingerprint, attempt
/// delivery, degrade to encrypted buffering on any authorization or
/// transport failure.
///
/// Each send makes at most one delivery attempt and at most one buffering
/// decision. Replay is explicit via [`Transmitter::replay`].
pub struct Transmitter<G, A, S>
where
    G: DeliveryGateway,
    A: AuditSink,
    S: BufferStore,
{
    auth: AuthContext,
    signer: SigningIdentity,
    buffer: EncryptedBuffer<S>,
    gateway: G,
    audit: A,
}

impl<G, A, S> Transmitter<G, A, S>
where
    G: DeliveryGateway,
    A: AuditSink,
    S: BufferStore,
{
    /// Wire the pipeline together.
    pub fn new(
        auth: AuthContext,
        signer: SigningIdentity,
        buffer: EncryptedBuffer<S>,
        gateway: G,
        audit: A,
    ) -> Self {
        Self {
            auth,
            signer,
            buffer,
            gateway,
            audit,
        }
    }

    /// Send one payload.
    ///
    /// State transitions per attempt:
    /// `Unauthorized → Buffered`, or `Authorized → Signed → Sent →
    /// Acknowledged`, or `Authorized → Signed → SendFailed → Buffered`.
    pub async fn send(&self, mut payload: Payload) -> Result<SendOutcome, TransmitError> {
        let now = SystemTime::now();

        if !self.auth.is_valid(self.auth.token(), now) {
            warn!("Token invalid; running in restricted mode, buffering unsigned payload");
            let record_id = self.buffer.enqueue(&payload)?;
            return Ok(SendOutcome::Buffered {
                record_id,
                reason: BufferReason::Unauthorized,
            });
        }

        let fp = self.augment(&mut payload, now)?;
        self.audit_fingerprint(&fp, now);

        match self.gateway.deliver(&payload, self.auth.token()).await {
            Ok(receipt) => {
                info!(fingerprint = %fp, status = receipt.status, "Payload acknowledged");
                Ok(SendOutcome::Acknowledged {
                    fingerprint: fp,
                    receipt,
                })
            }
            Err(transport) => {
                warn!(fingerprint = %fp, error = %transport, "Delivery failed; buffering signed payload");
                let record_id = self.buffer.enqueue(&payload)?;
                Ok(SendOutcome::Buffered {
                    record_id,
                    reason: BufferReason::SendFailed(transport),
                })
            }
        }
    }

    /// Replay every buffered record, independently.
    ///
    /// Explicit and operator-triggered; there is no background scheduler.
    /// Records that already carry a signature are re-delivered as-is;
    /// records buffered unsigned (the token was invalid at send time) are
    /// signed first. A record whose delivery fails again is re-enqueued;
    /// one record's failure never aborts the others.
    ///
    /// # Errors
    ///
    /// Returns `TransmitError::Unauthorized` without touching the buffer if
    /// the token is invalid at replay time.
    pub async fn replay(&self) -> Result<ReplayReport, TransmitError> {
        let now = SystemTime::now();
        if !self.auth.is_valid(self.auth.token(), now) {
            return Err(TransmitError::Unauthorized);
        }

        let records = self.buffer.take_all()?;
        let mut report = ReplayReport::default();

        for record in records {
            let mut payload = match record {
                Ok(payload) => payload,
                Err(BufferError::CorruptRecord { id, reason }) => {
                    warn!(record_id = id, %reason, "Dropping corrupt buffer record");
                    report.corrupt += 1;
                    continue;
                }
                Err(other) => return Err(other.into()),
            };

            let fp = if payload.is_signed() {
                match payload.get(FINGERPRINT_FIELD).and_then(|v| v.as_str()) {
                    Some(fp) => fp.to_string(),
                    None => fingerprint(&payload)?,
                }
            } else {
                self.augment(&mut payload, SystemTime::now())?
            };
            self.audit_fingerprint(&fp, SystemTime::now());

            match self.gateway.deliver(&payload, self.auth.token()).await {
                Ok(receipt) => {
                    info!(fingerprint = %fp, status = receipt.status, "Replayed record acknowledged");
                    report.delivered += 1;
                }
                Err(transport) => {
                    warn!(fingerprint = %fp, error = %transport, "Replay delivery failed; re-buffering");
                    self.buffer.enqueue(&payload)?;
                    report.rebuffered += 1;
                }
            }
        }

        Ok(report)
    }

    /// Number of records currently buffered.
    pub fn buffered(&self) -> Result<usize, TransmitError> {
        Ok(self.buffer.len()?)
    }

    /// Sign and fingerprint the payload, then augment it with the envelope
    /// fields. The fingerprint and signature both cover the application
    /// fields only, so augmentation order cannot perturb them.
    fn augment(&self, payload: &mut Payload, now: SystemTime) -> Result<String, TransmitError> {
        let fp = fingerprint(payload)?;
        let signature = self.signer.sign_payload(payload)?;
        let timestamp = now
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);

        payload.insert(SIGNATURE_FIELD, json!(signature));
        payload.insert(TIMESTAMP_FIELD, json!(timestamp));
        payload.insert(BUILD_ID_FIELD, json!(BUILD_ID));
        payload.insert(FINGERPRINT_FIELD, json!(fp));
        Ok(fp)
    }

    /// The audit log is an observability sink, not a gate: failures are
    /// logged and the send proceeds.
    fn audit_fingerprint(&self, fp: &str, at: SystemTime) {
        if let Err(e) = self.audit.record(fp, at) {
            warn!(fingerprint = %fp, error = %e, "Audit sink write failed");
        }
    }
}
