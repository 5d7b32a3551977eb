//! Port adapters: HTTP delivery and NDJSON audit log.

pub mod audit;
pub mod http;

pub use audit::FileAuditSink;
pub use http::HttpDeliveryGateway;
