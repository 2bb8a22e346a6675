//! The cookie entry type stored in a [`CookieJar`](crate::jar::CookieJar).

use bytes::Bytes;
use std::time::{Duration, Instant};

/// A single stored cookie value with an optional expiry time.
#[derive(Debug, Clone)]
pub struct Cookie {
    /// The actual value stored
    pub value: Bytes,
    /// When this cookie expires (None = session cookie, never expires)
    pub expires_at: Option<Instant>,
}

impl Cookie {
    /// Creates a session cookie without expiry.
    pub fn session(value: Bytes) -> Self {
        Self {
            value,
            expires_at: None,
        }
    }

    /// Creates a cookie that expires after `ttl`.
    pub fn with_ttl(value: Bytes, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Some(Instant::now() + ttl),
        }
    }

    /// Checks whether this cookie has expired as of `now`.
    ///
    /// Session cookies never expire.
    #[inline]
    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.expires_at.map(|exp| exp <= now).unwrap_or(false)
    }

    /// Returns the remaining time to live, or `None` for session cookies.
    ///
    /// An already-expired cookie reports a zero duration.
    pub fn remaining_ttl(&self) -> Option<Duration> {
        self.expires_at
            .map(|exp| exp.saturating_duration_since(Instant::now()))
    }
}
