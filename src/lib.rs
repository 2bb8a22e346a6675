//! # CookieVault - A Thread-Safe, Self-Evicting Cookie Store
//!
//! CookieVault manages expirable key-value entries (cookies) for HTTP
//! client instances. Any number of clients can share one jar, and the
//! crate guarantees that exactly one periodic eviction task runs against
//! that jar for as long as at least one client uses it - no more, no
//! fewer - even under concurrent client startup and shutdown.
//!
//! ## Features
//!
//! - **Thread-Safe Storage**: sharded jar with RwLock for concurrent access
//! - **TTL Support**: cookies expire lazily on access and actively via sweeps
//! - **Reference-Counted Eviction**: one sweep task per shared jar, started
//!   by the first client in and stopped by the last client out
//! - **Pluggable Scheduling**: eviction runs on any [`Timer`] implementation;
//!   a Tokio-backed one is provided
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                              CookieVault                                │
//! │                                                                         │
//! │  ┌─────────────┐  attach/detach  ┌──────────────────┐                   │
//! │  │  Client 1   │───────────────> │ EvictionRegistry │                   │
//! │  └─────────────┘                 │                  │                   │
//! │  ┌─────────────┐                 │  ref count per   │                   │
//! │  │  Client 2   │───────────────> │  jar instance    │                   │
//! │  └─────────────┘                 └────────┬─────────┘                   │
//! │                                           │ 0->1 schedules              │
//! │                                           │ 1->0 cancels                │
//! │                                           ▼                             │
//! │  ┌─────────────┐   schedule(task, delay)  ┌───────────────────────────┐ │
//! │  │ Timer       │ <─────────────────────── │       EvictionTask        │ │
//! │  │ (Tokio, …)  │ ───────────────────────> │ sweep, then resubmit self │ │
//! │  └─────────────┘     fires once           └─────────────┬─────────────┘ │
//! │                                                         │ sweep(now)    │
//! │                                                         ▼               │
//! │                     ┌──────────────────────────────────────────────┐    │
//! │                     │                  CookieJar                   │    │
//! │                     │  ┌────────┐ ┌────────┐ ┌────────┐ ┌────────┐ │    │
//! │                     │  │Shard 0 │ │Shard 1 │ │Shard 2 │ │...N    │ │    │
//! │                     │  │RwLock  │ │RwLock  │ │RwLock  │ │shards  │ │    │
//! │                     │  └────────┘ └────────┘ └────────┘ └────────┘ │    │
//! │                     └──────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use cookievault::{Client, ClientConfig, CookieJar};
//! use bytes::Bytes;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), cookievault::EvictionError> {
//!     let jar = Arc::new(CookieJar::new());
//!
//!     // Two clients share the jar; a single eviction task serves both.
//!     let first = Client::new(ClientConfig::new().cookie_jar(Arc::clone(&jar)))?;
//!     let second = Client::new(ClientConfig::new().cookie_jar(Arc::clone(&jar)))?;
//!
//!     jar.insert(Bytes::from("sid"), Bytes::from("abc123"), Duration::from_secs(3600));
//!
//!     second.close()?;
//!     first.close()?; // last one out cancels the eviction task
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`jar`]: thread-safe cookie storage with TTL support
//! - [`timer`]: the "run once after a delay" scheduling abstraction
//! - [`eviction`]: the self-rescheduling sweep task and the
//!   reference-counting registry that arbitrates it
//! - [`client`]: client lifecycle and configuration
//!
//! ## Design Highlights
//!
//! ### One Sweep Per Shared Jar
//!
//! Jars are tracked by instance identity, not by contents. The attach
//! that takes a jar's reference count from 0 to 1 schedules the eviction
//! task; every later attach reuses it, even when the newcomer brings a
//! different timer. The detach that returns the count to 0 cancels the
//! task, and a later attach restarts eviction from scratch.
//!
//! ### Lazy + Active Expiry
//!
//! Cookies with a TTL are expired two ways:
//! 1. **Lazy**: an expired cookie is removed when accessed
//! 2. **Active**: the eviction task periodically sweeps the whole jar
//!
//! This reclaims memory even for cookies that are never read again.
//!
//! ### Cooperative Cancellation
//!
//! The eviction task rechecks its cancellation flag after every sweep,
//! so a cancel racing with a fire lets that sweep finish but stops the
//! chain before the next submission. At most one extra no-op fire can
//! be delivered; an orphaned infinite chain cannot.

pub mod client;
pub mod eviction;
pub mod jar;
pub mod timer;

// Re-export commonly used types for convenience
pub use client::{Client, ClientConfig, DEFAULT_EVICTION_INTERVAL};
pub use eviction::{Attachment, EvictionError, EvictionRegistry, EvictionTask};
pub use jar::{Cookie, CookieJar, JarStats};
pub use timer::{Timeout, Timer, TimerError, TimerTask, TokioTimer};

/// Version of CookieVault
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
