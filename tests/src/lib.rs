//! # CoreBridge Test Suite
//!
//! Unified test crate exercising the crates together:
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── pipeline.rs      # Transmitter → buffer → replay flows
//!     └── receiver_api.rs  # Full HTTP contract against the real router
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p bridge-tests
//!
//! # By category
//! cargo test -p bridge-tests integration::pipeline
//! cargo test -p bridge-tests integration::receiver_api
//! ```

#![allow(dead_code)]

pub mod integration;
