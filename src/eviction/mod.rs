//! Eviction Module
//!
//! This module keeps expired cookies from accumulating in a shared jar.
//! It has two halves:
//!
//! - [`EvictionTask`]: a self-rescheduling sweep. Each firing sweeps the
//!   jar once, then resubmits itself to its timer with a fixed interval,
//!   so one submission grows into a periodic sweep without a dedicated
//!   thread. Cancellation ends the chain.
//! - [`EvictionRegistry`]: the reference-counting controller. Any number
//!   of clients may share one jar `Arc`; the registry counts attachments
//!   per jar instance and guarantees exactly one task runs while the
//!   count is positive - started by the attach that finds the jar idle,
//!   cancelled by the detach that leaves it idle.
//!
//! ```text
//!  client 1 ──attach──┐
//!  client 2 ──attach──┤      ┌──────────────────┐     ┌───────────┐
//!  client 3 ──attach──┼────> │ EvictionRegistry │ ──> │ one       │
//!                     │      │ (count per jar)  │     │ Eviction  │
//!  client 2 ──detach──┤      └──────────────────┘     │ Task      │
//!  client 1 ──detach──┘                               └─────┬─────┘
//!                                                           │ sweep every
//!                                                           ▼ interval
//!                                                     ┌───────────┐
//!                                                     │ CookieJar │
//!                                                     └───────────┘
//! ```
//!
//! Client code must never schedule sweeps directly; going through the
//! registry is what makes "exactly one sweep per shared jar" hold.

pub mod registry;
pub mod task;

// Re-export commonly used types
pub use registry::{Attachment, EvictionError, EvictionRegistry};
pub use task::EvictionTask;
