//! Receiver service wiring and lifecycle.

use std::sync::Arc;

use axum::Router;
use bridge_auth::AuthContext;
use bridge_crypto::PayloadVerifier;
use tracing::info;

use crate::adapters::FileItemStore;
use crate::config::ReceiverConfig;
use crate::error::ReceiverError;
use crate::ports::ItemStore;
use crate::routes::{build_router, AppState};

/// The assembled receiver: configuration plus everything the router needs.
pub struct ReceiverService {
    config: ReceiverConfig,
    state: AppState,
}

impl ReceiverService {
    /// Validate configuration, load the verifier key if verification is
    /// enabled, and open the item store.
    pub fn new(config: ReceiverConfig, auth: Arc<AuthContext>) -> Result<Self, ReceiverError> {
        config.validate()?;

        let verifier = match (&config.public_key_path, config.verify_signatures) {
            (Some(path), true) => {
                let verifier = PayloadVerifier::load(path)?;
                info!(path = %path.display(), "Signature verification enabled");
                Some(Arc::new(verifier))
            }
            _ => {
                info!("Signature verification disabled");
                None
            }
        };

        let store: Arc<dyn ItemStore> = Arc::new(FileItemStore::open(&config.items_path)?);

        Ok(Self {
            config,
            state: AppState {
                auth,
                verifier,
                store,
            },
        })
    }

    /// Same wiring with a caller-supplied store (tests, ephemeral runs).
    pub fn with_store(
        config: ReceiverConfig,
        auth: Arc<AuthContext>,
        store: Arc<dyn ItemStore>,
    ) -> Result<Self, ReceiverError> {
        config.validate()?;

        let verifier = match (&config.public_key_path, config.verify_signatures) {
            (Some(path), true) => Some(Arc::new(PayloadVerifier::load(path)?)),
            _ => None,
        };

        Ok(Self {
            config,
            state: AppState {
                auth,
                verifier,
                store,
            },
        })
    }

    /// The router, for embedding or in-process testing.
    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Bind and serve until the process is stopped.
    pub async fn serve(self) -> Result<(), ReceiverError> {
        let addr = self.config.bind_addr()?;
        let listener = tokio::net::TcpListener::bind(addr).await?;

        info!(%addr, "Receiver listening");

        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}
