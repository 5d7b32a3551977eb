//! # Bridge Runtime
//!
//! Entry point wiring the transmitter pipeline and the receiver service.
//!
//! ```text
//!   bridge send [JSON]   sign + deliver one payload (buffers on failure)
//!   bridge replay        drain the encrypted buffer toward the receiver
//!   bridge serve         run the receiving HTTP service
//! ```
//!
//! Configuration comes from `BRIDGE_*` environment variables; see
//! [`config::BridgeConfig::load_from_env`].

mod config;

use std::sync::Arc;
use std::time::SystemTime;

use anyhow::{bail, Context, Result};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use bridge_auth::AuthContext;
use bridge_buffer::{EncryptedBuffer, FileBufferStore};
use bridge_crypto::{SecretKey, SigningIdentity};
use bridge_receiver::{ReceiverConfig, ReceiverService};
use bridge_transmitter::{FileAuditSink, HttpDeliveryGateway, SendOutcome, Transmitter};

use crate::config::BridgeConfig;

type BridgeTransmitter = Transmitter<HttpDeliveryGateway, FileAuditSink, FileBufferStore>;

/// Assemble the full transmitter pipeline from configuration.
fn build_transmitter(config: &BridgeConfig) -> Result<BridgeTransmitter> {
    let auth = AuthContext::new(config.security.auth_token.clone(), SystemTime::now());

    let signer = SigningIdentity::load_or_generate(&config.key_paths())
        .context("Failed to load or generate signing keys")?;

    let store = FileBufferStore::open(config.buffer_path())
        .context("Failed to open the encrypted buffer")?;
    let buffer = EncryptedBuffer::new(SecretKey::from_bytes(config.security.buffer_key), store);

    let gateway = HttpDeliveryGateway::with_timeout(
        config.transmitter.receiver_url.clone(),
        config.transmitter.send_timeout(),
    )
    .context("Failed to build the delivery client")?;

    let audit = FileAuditSink::new(config.audit_path());

    Ok(Transmitter::new(auth, signer, buffer, gateway, audit))
}

/// Sign and deliver a single payload.
async fn run_send(config: &BridgeConfig, body: Option<String>) -> Result<()> {
    let value: serde_json::Value = match body {
        Some(raw) => serde_json::from_str(&raw).context("Payload argument is not valid JSON")?,
        None => serde_json::json!({ "event": "sensor_update", "value": 42 }),
    };
    let payload =
        bridge_types::Payload::from_serialize(&value).context("Payload must be a JSON object")?;

    let transmitter = build_transmitter(config)?;

    match transmitter.send(payload).await? {
        SendOutcome::Acknowledged {
            fingerprint,
            receipt,
        } => {
            info!(
                fingerprint = %fingerprint,
                status = receipt.status,
                "Payload delivered"
            );
        }
        SendOutcome::Buffered { record_id, reason } => {
            info!(record_id, ?reason, "Payload buffered for later replay");
        }
    }

    Ok(())
}

/// Drain the buffer toward the receiver.
async fn run_replay(config: &BridgeConfig) -> Result<()> {
    let transmitter = build_transmitter(config)?;
    let report = transmitter.replay().await?;

    info!(
        delivered = report.delivered,
        rebuffered = report.rebuffered,
        corrupt = report.corrupt,
        "Replay finished"
    );

    Ok(())
}

/// Run the receiving HTTP service until Ctrl+C.
async fn run_serve(config: &BridgeConfig) -> Result<()> {
    let auth = Arc::new(AuthContext::new(
        config.security.auth_token.clone(),
        SystemTime::now(),
    ));

    let public_key_path = config
        .receiver
        .verify_signatures
        .then(|| config.key_paths().public_key);

    let receiver_config = ReceiverConfig {
        host: config.receiver.host.clone(),
        port: config.receiver.port,
        verify_signatures: config.receiver.verify_signatures,
        public_key_path,
        items_path: config.items_path(),
    };

    let service = ReceiverService::new(receiver_config, auth)?;

    tokio::select! {
        result = service.serve() => result.context("Receiver exited with an error")?,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = BridgeConfig::load_from_env();
    config.validate()?;

    let mut args = std::env::args().skip(1);
    let command = args.next().unwrap_or_else(|| "serve".to_string());

    match command.as_str() {
        "send" => run_send(&config, args.next()).await,
        "replay" => run_replay(&config).await,
        "serve" => run_serve(&config).await,
        other => bail!("unknown command '{other}' (expected send, replay, or serve)"),
    }
}
