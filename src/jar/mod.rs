//! Cookie Jar Module
//!
//! This module provides the shared cookie store for CookieVault:
//! a thread-safe, sharded map of cookie name to expirable value.
//!
//! ## Features
//!
//! - **Sharded Storage**: independent shards reduce lock contention
//! - **RwLock**: multiple concurrent readers, exclusive writers
//! - **TTL Support**: cookies can carry a time-to-live
//! - **Lazy Expiry**: expired cookies are cleaned on access
//! - **Active Expiry**: a background task sweeps orphaned expired cookies
//!
//! The jar only stores; it never schedules its own sweeps. Eviction
//! scheduling lives in [`crate::eviction`], which guarantees one running
//! sweep task per jar instance regardless of how many clients share it.
//!
//! ## Example
//!
//! ```
//! use cookievault::CookieJar;
//! use bytes::Bytes;
//! use std::sync::Arc;
//! use std::time::{Duration, Instant};
//!
//! let jar = Arc::new(CookieJar::new());
//!
//! jar.insert(Bytes::from("sid"), Bytes::from("abc123"), Duration::from_secs(3600));
//! jar.insert_persistent(Bytes::from("theme"), Bytes::from("dark"));
//!
//! assert_eq!(jar.len(), 2);
//! jar.sweep(Instant::now());
//! assert_eq!(jar.len(), 2); // nothing expired yet
//! ```

pub mod cookie;
pub mod store;

// Re-export commonly used types
pub use cookie::Cookie;
pub use store::{CookieJar, JarStats};
