//! # Pipeline Integration Tests
//!
//! End-to-end transmitter flows over a real file-backed buffer:
//!
//! 1. Authorized send delivers an augmented payload and audits its fingerprint
//! 2. Unauthorized send degrades to unsigned buffering; a later authorized
//!    replay signs and delivers
//! 3. Transport failure degrades to signed buffering with only ciphertext on
//!    disk; replay drains once the endpoint recovers
//! 4. Replay is refused outright while unauthorized and leaves the buffer
//!    untouched
//! 5. Records sealed under a different key are dropped as corrupt, never
//!    delivered

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::{Duration, SystemTime};

    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::json;

    use bridge_auth::AuthContext;
    use bridge_buffer::{BufferStore, EncryptedBuffer, FileBufferStore};
    use bridge_crypto::{KeyPaths, SecretKey, SigningIdentity};
    use bridge_transmitter::{
        BufferReason, DeliveryGateway, DeliveryReceipt, FileAuditSink, SendOutcome, TransmitError,
        Transmitter, TransportError, BUILD_ID,
    };
    use bridge_types::{Payload, BUILD_ID_FIELD, FINGERPRINT_FIELD, SIGNATURE_FIELD};

    const TOKEN: &str = "integration-token";

    /// Gateway that records every delivered payload; failure is switchable.
    #[derive(Clone)]
    struct CapturingGateway {
        deliveries: Arc<Mutex<Vec<Payload>>>,
        fail: Arc<AtomicBool>,
    }

    impl CapturingGateway {
        fn new() -> Self {
            Self {
                deliveries: Arc::new(Mutex::new(Vec::new())),
                fail: Arc::new(AtomicBool::new(false)),
            }
        }

        fn failing() -> Self {
            let gateway = Self::new();
            gateway.fail.store(true, Ordering::SeqCst);
            gateway
        }
    }

    #[async_trait]
    impl DeliveryGateway for CapturingGateway {
        async fn deliver(
            &self,
            payload: &Payload,
            _token: &str,
        ) -> Result<DeliveryReceipt, TransportError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(TransportError::Connect("connection refused".to_string()));
            }
            self.deliveries.lock().push(payload.clone());
            Ok(DeliveryReceipt {
                status: 201,
                body: None,
            })
        }
    }

    fn valid_auth() -> AuthContext {
        AuthContext::new(TOKEN, SystemTime::now())
    }

    fn expired_auth() -> AuthContext {
        let issued = SystemTime::now() - Duration::from_secs(7200);
        AuthContext::new(TOKEN, issued).with_validity(Duration::from_secs(3600))
    }

    fn sample_payload() -> Payload {
        Payload::from_serialize(&json!({"event": "sensor_update", "value": 42})).unwrap()
    }

    struct Fixture {
        dir: tempfile::TempDir,
        key: SecretKey,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                dir: tempfile::tempdir().unwrap(),
                key: SecretKey::generate(),
            }
        }

        fn buffer_path(&self) -> std::path::PathBuf {
            self.dir.path().join("buffer.dat")
        }

        fn audit_path(&self) -> std::path::PathBuf {
            self.dir.path().join("fingerprints.log")
        }

        fn transmitter(
            &self,
            auth: AuthContext,
            gateway: CapturingGateway,
        ) -> Transmitter<CapturingGateway, FileAuditSink, FileBufferStore> {
            let signer =
                SigningIdentity::load_or_generate(&KeyPaths::under(self.dir.path())).unwrap();
            let store = FileBufferStore::open(self.buffer_path()).unwrap();
            let buffer = EncryptedBuffer::new(self.key.clone(), store);
            Transmitter::new(
                auth,
                signer,
                buffer,
                gateway,
                FileAuditSink::new(self.audit_path()),
            )
        }

        fn buffered_record_count(&self) -> usize {
            FileBufferStore::open(self.buffer_path())
                .unwrap()
                .len()
                .unwrap()
        }
    }

    #[tokio::test]
    async fn test_authorized_send_delivers_augmented_payload() {
        let fixture = Fixture::new();
        let gateway = CapturingGateway::new();
        let transmitter = fixture.transmitter(valid_auth(), gateway.clone());

        let outcome = transmitter.send(sample_payload()).await.unwrap();

        let SendOutcome::Acknowledged {
            fingerprint,
            receipt,
        } = outcome
        else {
            panic!("expected acknowledgment");
        };
        assert_eq!(receipt.status, 201);
        assert_eq!(fingerprint.len(), 64);

        let deliveries = gateway.deliveries.lock();
        assert_eq!(deliveries.len(), 1);
        let delivered = &deliveries[0];
        assert!(delivered.is_signed());
        assert_eq!(delivered.get(BUILD_ID_FIELD), Some(&json!(BUILD_ID)));
        assert_eq!(delivered.get(FINGERPRINT_FIELD), Some(&json!(fingerprint)));
        // Application fields survive augmentation untouched.
        assert_eq!(delivered.get("event"), Some(&json!("sensor_update")));

        // Nothing buffered, fingerprint audited.
        assert_eq!(fixture.buffered_record_count(), 0);
        let audit = std::fs::read_to_string(fixture.audit_path()).unwrap();
        assert!(audit.contains(&fingerprint));
    }

    #[tokio::test]
    async fn test_unauthorized_send_buffers_then_replay_delivers() {
        let fixture = Fixture::new();

        // Restricted mode: expired token, payload goes to the buffer unsigned.
        let gateway = CapturingGateway::new();
        let restricted = fixture.transmitter(expired_auth(), gateway.clone());
        let outcome = restricted.send(sample_payload()).await.unwrap();
        assert!(matches!(
            outcome,
            SendOutcome::Buffered {
                reason: BufferReason::Unauthorized,
                ..
            }
        ));
        assert!(gateway.deliveries.lock().is_empty());
        assert_eq!(fixture.buffered_record_count(), 1);
        drop(restricted);

        // Authorization restored: replay signs the stored record and delivers.
        let gateway = CapturingGateway::new();
        let authorized = fixture.transmitter(valid_auth(), gateway.clone());
        let report = authorized.replay().await.unwrap();

        assert_eq!(report.delivered, 1);
        assert_eq!(report.rebuffered, 0);
        assert_eq!(report.corrupt, 0);
        assert_eq!(fixture.buffered_record_count(), 0);

        let deliveries = gateway.deliveries.lock();
        assert!(deliveries[0].is_signed());
        assert_eq!(deliveries[0].get("value"), Some(&json!(42)));
    }

    #[tokio::test]
    async fn test_transport_failure_buffers_ciphertext_only() {
        let fixture = Fixture::new();
        let gateway = CapturingGateway::failing();
        let transmitter = fixture.transmitter(valid_auth(), gateway.clone());

        let outcome = transmitter.send(sample_payload()).await.unwrap();
        assert!(matches!(
            outcome,
            SendOutcome::Buffered {
                reason: BufferReason::SendFailed(_),
                ..
            }
        ));

        // Only ciphertext reaches disk.
        let raw = std::fs::read(fixture.buffer_path()).unwrap();
        let raw_text = String::from_utf8_lossy(&raw);
        assert!(!raw_text.contains("sensor_update"));

        // Endpoint recovers; the same transmitter drains its own buffer.
        gateway.fail.store(false, Ordering::SeqCst);
        let report = transmitter.replay().await.unwrap();
        assert_eq!(report.delivered, 1);
        assert_eq!(fixture.buffered_record_count(), 0);

        // The record was already signed at send time.
        let deliveries = gateway.deliveries.lock();
        assert!(deliveries[0].get(SIGNATURE_FIELD).is_some());
    }

    #[tokio::test]
    async fn test_replay_refused_while_unauthorized() {
        let fixture = Fixture::new();

        let gateway = CapturingGateway::new();
        let restricted = fixture.transmitter(expired_auth(), gateway.clone());
        restricted.send(sample_payload()).await.unwrap();
        assert_eq!(fixture.buffered_record_count(), 1);

        let result = restricted.replay().await;
        assert!(matches!(result, Err(TransmitError::Unauthorized)));

        // Refusal must not consume the buffer.
        assert_eq!(fixture.buffered_record_count(), 1);
        assert!(gateway.deliveries.lock().is_empty());
    }

    #[tokio::test]
    async fn test_foreign_key_records_dropped_as_corrupt() {
        let fixture = Fixture::new();

        // A record sealed under a key this process does not hold.
        {
            let foreign = EncryptedBuffer::new(
                SecretKey::generate(),
                FileBufferStore::open(fixture.buffer_path()).unwrap(),
            );
            foreign.enqueue(&sample_payload()).unwrap();
        }

        let gateway = CapturingGateway::new();
        let transmitter = fixture.transmitter(valid_auth(), gateway.clone());
        let report = transmitter.replay().await.unwrap();

        assert_eq!(report.corrupt, 1);
        assert_eq!(report.delivered, 0);
        assert!(gateway.deliveries.lock().is_empty());
        // Corrupt records are dropped, not retried forever.
        assert_eq!(fixture.buffered_record_count(), 0);
    }
}
