//! # Receiver API Integration Tests
//!
//! The full HTTP contract, exercised against the real router with payloads
//! produced by the real transmitter pipeline:
//!
//! - a transmitter-augmented payload passes signature verification end to end
//! - tampering with a signed payload in flight is rejected and nothing is
//!   persisted
//! - the status contract holds: 401 before anything else, 415 for the wrong
//!   content type, 201 on acceptance
//! - accepted items survive a receiver restart

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::SystemTime;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use parking_lot::Mutex;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use bridge_auth::AuthContext;
    use bridge_buffer::{EncryptedBuffer, InMemoryBufferStore};
    use bridge_crypto::{KeyPaths, PayloadVerifier, SecretKey, SigningIdentity};
    use bridge_receiver::{build_router, AppState, FileItemStore, InMemoryItemStore, ItemStore};
    use bridge_transmitter::{
        DeliveryGateway, DeliveryReceipt, FileAuditSink, Transmitter, TransportError,
    };
    use bridge_types::Payload;

    const TOKEN: &str = "integration-token";

    /// Gateway that hands the augmented payload back to the test.
    #[derive(Clone)]
    struct CapturingGateway {
        deliveries: Arc<Mutex<Vec<Payload>>>,
    }

    #[async_trait]
    impl DeliveryGateway for CapturingGateway {
        async fn deliver(
            &self,
            payload: &Payload,
            _token: &str,
        ) -> Result<DeliveryReceipt, TransportError> {
            self.deliveries.lock().push(payload.clone());
            Ok(DeliveryReceipt {
                status: 201,
                body: None,
            })
        }
    }

    /// Run a payload through the real send pipeline and return the augmented
    /// form the gateway saw, plus the verifier for its signing key.
    async fn augmented_payload(
        dir: &tempfile::TempDir,
        payload: Payload,
    ) -> (Payload, PayloadVerifier) {
        let identity = SigningIdentity::load_or_generate(&KeyPaths::under(dir.path())).unwrap();
        let verifier = identity.verifier();

        let deliveries = Arc::new(Mutex::new(Vec::new()));
        let transmitter = Transmitter::new(
            AuthContext::new(TOKEN, SystemTime::now()),
            identity,
            EncryptedBuffer::new(SecretKey::generate(), InMemoryBufferStore::new()),
            CapturingGateway {
                deliveries: Arc::clone(&deliveries),
            },
            FileAuditSink::new(dir.path().join("fingerprints.log")),
        );
        transmitter.send(payload).await.unwrap();

        let augmented = deliveries.lock().pop().unwrap();
        (augmented, verifier)
    }

    fn router_with(
        verifier: Option<PayloadVerifier>,
        store: Arc<dyn ItemStore>,
    ) -> axum::Router {
        build_router(AppState {
            auth: Arc::new(AuthContext::new(TOKEN, SystemTime::now())),
            verifier: verifier.map(Arc::new),
            store,
        })
    }

    fn post_data(body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/data")
            .header("Authorization", format!("Bearer {TOKEN}"))
            .header("Content-Type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_transmitter_output_passes_verification() {
        let dir = tempfile::tempdir().unwrap();
        let payload =
            Payload::from_serialize(&json!({"name": "temperature", "value": 21.5})).unwrap();
        let (augmented, verifier) = augmented_payload(&dir, payload).await;

        let store: Arc<dyn ItemStore> = Arc::new(InMemoryItemStore::new());
        let app = router_with(Some(verifier), Arc::clone(&store));

        let body = serde_json::to_string(&augmented).unwrap();
        let response = app.oneshot(post_data(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        assert_eq!(created["status"], "Success");
        assert_eq!(created["name"], "temperature");

        let items = store.list().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].value, 21.5);
    }

    #[tokio::test]
    async fn test_in_flight_tampering_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let payload = Payload::from_serialize(&json!({"name": "reading", "value": 7.0})).unwrap();
        let (mut augmented, verifier) = augmented_payload(&dir, payload).await;

        // An attacker rewrites the value after signing.
        augmented.insert("value", json!(9999.0));

        let store: Arc<dyn ItemStore> = Arc::new(InMemoryItemStore::new());
        let app = router_with(Some(verifier), Arc::clone(&store));

        let body = serde_json::to_string(&augmented).unwrap();
        let response = app.oneshot(post_data(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error = body_json(response).await;
        assert_eq!(error["error"], "Signature invalid");
        assert!(store.list().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_status_contract_order() {
        let store: Arc<dyn ItemStore> = Arc::new(InMemoryItemStore::new());
        let app = router_with(None, store);

        // No token: 401 before any parsing.
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/data")
                    .header("Content-Type", "text/plain")
                    .body(Body::from("not even json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get("WWW-Authenticate").is_some());

        // Token but wrong content type: 415.
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/data")
                    .header("Authorization", format!("Bearer {TOKEN}"))
                    .header("Content-Type", "text/plain")
                    .body(Body::from(r#"{"name": "x", "value": 1}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

        // Everything right: 201.
        let response = app
            .oneshot(post_data(r#"{"name": "x", "value": 1}"#.to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_items_survive_restart() {
        let dir = tempfile::tempdir().unwrap();
        let items_path = dir.path().join("items.dat");

        {
            let store: Arc<dyn ItemStore> = Arc::new(FileItemStore::open(&items_path).unwrap());
            let app = router_with(None, store);
            let response = app
                .oneshot(post_data(r#"{"name": "persisted", "value": 3.5}"#.to_string()))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        // A fresh service over the same file sees the item.
        let store: Arc<dyn ItemStore> = Arc::new(FileItemStore::open(&items_path).unwrap());
        let app = router_with(None, store);

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/data?api_key={TOKEN}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let listed = body_json(response).await;
        assert_eq!(listed["count"], 1);
        assert_eq!(listed["items"][0]["name"], "persisted");
    }
}
