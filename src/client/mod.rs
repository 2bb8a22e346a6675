//! Client Module
//!
//! This module is the caller-facing boundary of CookieVault. A
//! [`Client`] models one client instance's lifecycle: construction
//! attaches to the configured cookie jar (possibly starting its eviction
//! task), and [`Client::close`] or drop detaches (possibly stopping it).
//!
//! Configuration follows a small builder surface:
//!
//! ```
//! use cookievault::{Client, ClientConfig, CookieJar};
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! // Private jar per client (the default)
//! let solo = Client::new(ClientConfig::new()).unwrap();
//!
//! // Shared jar across clients
//! let jar = Arc::new(CookieJar::new());
//! let shared = Client::new(ClientConfig::new().cookie_jar(Arc::clone(&jar))).unwrap();
//!
//! // Cookies disabled
//! let bare = Client::new(ClientConfig::new().without_cookie_jar()).unwrap();
//!
//! bare.close().unwrap();
//! shared.close().unwrap();
//! solo.close().unwrap();
//! # });
//! ```

pub mod config;
pub mod lifecycle;

// Re-export commonly used types
pub use config::{ClientConfig, DEFAULT_EVICTION_INTERVAL};
pub use lifecycle::Client;
