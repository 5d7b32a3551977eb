//! # Bridge Authorization
//!
//! Bearer-token validation shared by the transmitter (self-check before
//! sending) and the receiver (request authentication).
//!
//! ## Design
//!
//! The reference token and its issuance time are captured once, at startup,
//! in an immutable [`AuthContext`]. Validation never re-reads ambient
//! configuration: a deployment-wide secret rotation takes effect on restart,
//! consistently, instead of mid-flight. The validity window is anchored to
//! `issued_at`, never to the moment of check.
//!
//! Token comparison is constant-time via the `subtle` crate.

use std::time::{Duration, SystemTime};

use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

/// Default validity window measured from issuance.
pub const DEFAULT_VALIDITY: Duration = Duration::from_secs(3600);

/// Immutable authorization context, constructed once at startup.
#[derive(Clone)]
pub struct AuthContext {
    token: Zeroizing<String>,
    issued_at: SystemTime,
    validity: Duration,
}

impl AuthContext {
    /// Create a context with the default one-hour validity window.
    pub fn new(token: impl Into<String>, issued_at: SystemTime) -> Self {
        Self {
            token: Zeroizing::new(token.into()),
            issued_at,
            validity: DEFAULT_VALIDITY,
        }
    }

    /// Override the validity window.
    pub fn with_validity(mut self, validity: Duration) -> Self {
        self.validity = validity;
        self
    }

    /// The reference token (attached as the bearer credential when sending).
    pub fn token(&self) -> &str {
        &self.token
    }

    /// When the reference token was issued.
    pub fn issued_at(&self) -> SystemTime {
        self.issued_at
    }

    /// Pure validity predicate.
    ///
    /// Returns `true` iff `candidate` is non-empty, matches the reference
    /// token exactly (constant-time), and `now` falls within the validity
    /// window measured from `issued_at`. No side effects.
    pub fn is_valid(&self, candidate: &str, now: SystemTime) -> bool {
        if candidate.is_empty() {
            return false;
        }
        let in_window = now >= self.issued_at
            && now
                .duration_since(self.issued_at)
                .map(|age| age < self.validity)
                .unwrap_or(false);

        // The comparison runs regardless of the window outcome; no
        // early-exit path on the token itself.
        constant_time_eq(candidate, &self.token) && in_window
    }
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the token.
        f.debug_struct("AuthContext")
            .field("issued_at", &self.issued_at)
            .field("validity", &self.validity)
            .finish_non_exhaustive()
    }
}

/// Constant-time string comparison to prevent timing side channels.
///
/// Both inputs are padded to the longer length (with differing pad bytes so
/// unequal lengths can never compare equal), then compared with
/// `subtle::ConstantTimeEq` together with a constant-time length check.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    let max_len = std::cmp::max(a.len(), b.len());

    let mut a_padded = vec![0u8; max_len];
    let mut b_padded = vec![0xFFu8; max_len];
    a_padded[..a.len()].copy_from_slice(a.as_bytes());
    b_padded[..b.len()].copy_from_slice(b.as_bytes());

    let lengths_equal = a.len().ct_eq(&b.len());
    let contents_equal = a_padded.ct_eq(&b_padded);

    (lengths_equal & contents_equal).into()
}
