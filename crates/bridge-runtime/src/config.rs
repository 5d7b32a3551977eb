//! Unified bridge configuration.
//!
//! Defaults are development-friendly; `load_from_env` applies `BRIDGE_*`
//! overrides and `validate` gates startup on the secrets being real.

use std::path::PathBuf;
use std::time::Duration;

use bridge_crypto::KeyPaths;
use tracing::{info, warn};

/// Complete bridge configuration.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Transmitter-side settings.
    pub transmitter: TransmitterConfig,
    /// Receiver-side settings.
    pub receiver: ReceiverSettings,
    /// Shared security material.
    pub security: SecurityConfig,
    /// Data directory for keys, buffer, audit log, and items.
    pub data_dir: PathBuf,
    /// Override for the private key location (defaults under `data_dir`).
    pub private_key_path: Option<PathBuf>,
    /// Override for the public key location (defaults under `data_dir`).
    pub public_key_path: Option<PathBuf>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            transmitter: TransmitterConfig::default(),
            receiver: ReceiverSettings::default(),
            security: SecurityConfig::default(),
            data_dir: PathBuf::from("./data"),
            private_key_path: None,
            public_key_path: None,
        }
    }
}

/// Transmitter-side settings.
#[derive(Debug, Clone)]
pub struct TransmitterConfig {
    /// Receiver ingestion endpoint.
    pub receiver_url: String,
    /// Per-attempt delivery timeout in seconds.
    pub send_timeout_secs: u64,
}

impl Default for TransmitterConfig {
    fn default() -> Self {
        Self {
            receiver_url: "http://127.0.0.1:5000/data".to_string(),
            send_timeout_secs: 10,
        }
    }
}

impl TransmitterConfig {
    pub fn send_timeout(&self) -> Duration {
        Duration::from_secs(self.send_timeout_secs)
    }
}

/// Receiver-side settings.
#[derive(Debug, Clone)]
pub struct ReceiverSettings {
    /// Listen address.
    pub host: String,
    /// Listen port.
    pub port: u16,
    /// Verify payload signatures on ingestion.
    pub verify_signatures: bool,
}

impl Default for ReceiverSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            verify_signatures: false,
        }
    }
}

/// Shared security material.
///
/// Both secrets MUST be overridden before production use; `validate`
/// rejects the defaults.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Shared bearer token (transmitter presents it, receiver checks it).
    pub auth_token: String,
    /// Buffer encryption key (32 bytes). Zero means unset.
    pub buffer_key: [u8; 32],
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            auth_token: String::new(),
            buffer_key: [0u8; 32],
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No token configured.
    #[error("auth token is empty. Set the BRIDGE_AUTH_TOKEN environment variable.")]
    MissingAuthToken,

    /// Buffer key is the default zero value.
    #[error(
        "buffer encryption key is the default zero value. \
         Set BRIDGE_BUFFER_KEY to 64 hex characters."
    )]
    InsecureBufferKey,
}

impl BridgeConfig {
    /// Validate configuration before startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.security.auth_token.is_empty() {
            return Err(ConfigError::MissingAuthToken);
        }
        if self.security.buffer_key == [0u8; 32] {
            return Err(ConfigError::InsecureBufferKey);
        }
        Ok(())
    }

    /// Defaults plus `BRIDGE_*` environment overrides.
    pub fn load_from_env() -> Self {
        let mut config = Self::default();

        if let Ok(token) = std::env::var("BRIDGE_AUTH_TOKEN") {
            config.security.auth_token = token;
        }

        if let Ok(key_hex) = std::env::var("BRIDGE_BUFFER_KEY") {
            if let Ok(key_bytes) = hex::decode(&key_hex) {
                if key_bytes.len() == 32 {
                    config.security.buffer_key.copy_from_slice(&key_bytes);
                    info!("Loaded buffer key from environment");
                } else {
                    warn!("BRIDGE_BUFFER_KEY must be 32 bytes (64 hex chars)");
                }
            } else {
                warn!("BRIDGE_BUFFER_KEY is not valid hex");
            }
        }

        if let Ok(url) = std::env::var("BRIDGE_RECEIVER_URL") {
            config.transmitter.receiver_url = url;
        }
        if let Ok(secs) = std::env::var("BRIDGE_SEND_TIMEOUT_SECS") {
            if let Ok(s) = secs.parse() {
                config.transmitter.send_timeout_secs = s;
            }
        }

        if let Ok(dir) = std::env::var("BRIDGE_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(path) = std::env::var("BRIDGE_PRIVATE_KEY_PATH") {
            config.private_key_path = Some(PathBuf::from(path));
        }
        if let Ok(path) = std::env::var("BRIDGE_PUBLIC_KEY_PATH") {
            config.public_key_path = Some(PathBuf::from(path));
        }
        if let Ok(host) = std::env::var("BRIDGE_HTTP_HOST") {
            config.receiver.host = host;
        }
        if let Ok(port) = std::env::var("BRIDGE_HTTP_PORT") {
            if let Ok(p) = port.parse() {
                config.receiver.port = p;
            }
        }
        if let Ok(flag) = std::env::var("BRIDGE_VERIFY_SIGNATURES") {
            config.receiver.verify_signatures = matches!(flag.as_str(), "1" | "true" | "yes");
        }

        config
    }

    /// Key locations: defaults under `data_dir`, with per-half overrides.
    pub fn key_paths(&self) -> KeyPaths {
        let mut paths = KeyPaths::under(&self.data_dir);
        if let Some(private_key) = &self.private_key_path {
            paths.private_key = private_key.clone();
        }
        if let Some(public_key) = &self.public_key_path {
            paths.public_key = public_key.clone();
        }
        paths
    }

    /// Where the buffer file lives.
    pub fn buffer_path(&self) -> PathBuf {
        self.data_dir.join("buffer.dat")
    }

    /// Where the fingerprint audit log lives.
    pub fn audit_path(&self) -> PathBuf {
        self.data_dir.join("fingerprints.log")
    }

    /// Where the receiver's item table lives.
    pub fn items_path(&self) -> PathBuf {
        self.data_dir.join("items.dat")
    }
}
