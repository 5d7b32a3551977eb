//! Receiver configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Receiver configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct ReceiverConfig {
    /// Listen address.
    pub host: String,
    /// Listen port.
    pub port: u16,
    /// Whether to verify payload signatures on POST.
    pub verify_signatures: bool,
    /// SPKI PEM public key path; required when verification is enabled.
    pub public_key_path: Option<PathBuf>,
    /// Durable item table location.
    pub items_path: PathBuf,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            verify_signatures: false,
            public_key_path: None,
            items_path: PathBuf::from("./data/items.dat"),
        }
    }
}

impl ReceiverConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.verify_signatures && self.public_key_path.is_none() {
            return Err(ConfigError::MissingPublicKey);
        }
        Ok(())
    }

    /// Bind address for the listener.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidAddress {
                host: self.host.clone(),
                port: self.port,
            })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Signature verification enabled without a public key to verify with.
    #[error("signature verification enabled but no public key path configured")]
    MissingPublicKey,

    /// Host/port did not form a bindable address.
    #[error("invalid listen address {host}:{port}")]
    InvalidAddress {
        /// Configured host.
        host: String,
        /// Configured port.
        port: u16,
    },
}
