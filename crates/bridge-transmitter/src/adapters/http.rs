//! HTTP delivery gateway.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use bridge_types::Payload;

use crate::errors::TransportError;
use crate::ports::{DeliveryGateway, DeliveryReceipt};

/// Default per-attempt delivery timeout.
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Delivers payloads with `POST <endpoint>` as JSON, bearer token attached.
pub struct HttpDeliveryGateway {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpDeliveryGateway {
    /// Create a gateway for the receiver endpoint with the default timeout.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, TransportError> {
        Self::with_timeout(endpoint, DEFAULT_SEND_TIMEOUT)
    }

    /// Create a gateway with an explicit per-attempt timeout.
    pub fn with_timeout(
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl DeliveryGateway for HttpDeliveryGateway {
    async fn deliver(
        &self,
        payload: &Payload,
        token: &str,
    ) -> Result<DeliveryReceipt, TransportError> {
        debug!(endpoint = %self.endpoint, "Attempting delivery");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(token)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout
                } else if e.is_connect() {
                    TransportError::Connect(e.to_string())
                } else {
                    TransportError::Other(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.json::<serde_json::Value>().await.ok();
        Ok(DeliveryReceipt {
            status: status.as_u16(),
            body,
        })
    }
}
