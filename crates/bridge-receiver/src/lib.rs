//! # Bridge Receiver
//!
//! The external-facing HTTP collaborator of the bridge.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                RECEIVER                      │
//! ├──────────────────────────────────────────────┤
//! │  GET /            status (public)            │
//! │  GET /data        list items   ┐             │
//! │  POST /data       accept item  ├─ AuthLayer  │
//! │                                ┘             │
//! │        │                                     │
//! │  signature check (optional) → ItemStore      │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! # Status contract
//!
//! - `200`/`201` success
//! - `400` bad or unverifiable signature, malformed payload
//! - `401` missing or invalid token (before any storage access)
//! - `415` wrong content type
//! - `500` internal storage/serialization error (generic message only)

pub mod adapters;
pub mod config;
pub mod error;
pub mod middleware;
pub mod ports;
pub mod routes;
pub mod service;

pub use adapters::{FileItemStore, InMemoryItemStore};
pub use config::{ConfigError, ReceiverConfig};
pub use error::{ApiError, ReceiverError};
pub use middleware::AuthLayer;
pub use ports::{ItemStore, ItemStoreError};
pub use routes::{build_router, AppState};
pub use service::ReceiverService;
