//! Reference-counted eviction scheduling per jar instance.
//!
//! The registry is the sole arbiter of eviction-task lifetime. Every
//! client attaches to its jar on startup and detaches on close; the
//! registry counts attachments per jar *instance* (pointer identity, not
//! contents) and keeps exactly one [`EvictionTask`] running per jar for
//! as long as the count is positive.
//!
//! ## Per-jar state
//!
//! ```text
//!            attach (0 -> 1)
//!            schedules a task
//!   ┌──────┐ ─────────────────> ┌────────┐ <─┐ attach / detach
//!   │ IDLE │                    │ ACTIVE │ ──┘ (count stays > 0)
//!   └──────┘ <───────────────── └────────┘
//!            detach (1 -> 0)
//!            cancels the task
//! ```
//!
//! A record cycles between the two states indefinitely; quiescence does
//! not retire it, so a later attach restarts eviction from a clean
//! slate. Only an attach that performs the 0 -> 1 transition schedules a
//! task, so the timer of every later attacher goes unused for that jar:
//! sweep work is proportional to "is anyone using this jar", not to how
//! many schedulers were offered.

use crate::eviction::EvictionTask;
use crate::jar::CookieJar;
use crate::timer::{Timer, TimerError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError, Weak};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from attach/detach bookkeeping.
#[derive(Debug, Error)]
pub enum EvictionError {
    /// Detach without a matching attach. Surfacing this instead of
    /// ignoring it matters: masking it would corrupt the count and could
    /// cancel an eviction task another client still depends on.
    #[error("not attached: detach without a matching attach")]
    NotAttached,

    /// The scheduling facility refused the eviction task.
    #[error("failed to schedule eviction task: {0}")]
    Schedule(#[from] TimerError),
}

/// Attachment bookkeeping for one jar instance.
struct RecordState {
    /// Number of currently attached clients.
    ref_count: usize,
    /// The one running eviction task while `ref_count > 0`.
    active_task: Option<Arc<EvictionTask>>,
    /// The jar this record belongs to, held weakly so a record never
    /// keeps an abandoned jar alive.
    store: Weak<CookieJar>,
}

/// One attachment record. Persists through quiescence so the same jar
/// can go idle and active any number of times.
struct AttachmentRecord {
    state: Mutex<RecordState>,
}

impl AttachmentRecord {
    fn new() -> Self {
        Self {
            state: Mutex::new(RecordState {
                ref_count: 0,
                active_task: None,
                store: Weak::new(),
            }),
        }
    }

    /// A record is reclaimable once nobody is attached and its jar is gone.
    fn is_live(&self) -> bool {
        let state = self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        state.ref_count > 0 || state.store.strong_count() > 0
    }

    fn detach(&self) -> Result<(), EvictionError> {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if state.ref_count == 0 {
            return Err(EvictionError::NotAttached);
        }
        state.ref_count -= 1;

        if state.ref_count == 0 {
            if let Some(task) = state.active_task.take() {
                task.cancel();
                debug!("last client detached, eviction task cancelled");
            }
        }
        Ok(())
    }
}

/// Tracks which jars have clients attached and keeps exactly one
/// eviction task running per attached jar.
///
/// Records are keyed by jar identity - the `Arc` allocation, never the
/// contents - so two jars that happen to hold equal cookies stay fully
/// independent, and sharing eviction requires passing the same `Arc`.
pub struct EvictionRegistry {
    records: Mutex<HashMap<usize, Arc<AttachmentRecord>>>,
}

impl Default for EvictionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EvictionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
        }
    }

    /// The process-wide registry used by [`Client`](crate::client::Client).
    ///
    /// Independently configured clients that share a jar `Arc` must also
    /// share the registry, otherwise each would start its own sweep task.
    pub fn global() -> &'static EvictionRegistry {
        static GLOBAL: OnceLock<EvictionRegistry> = OnceLock::new();
        GLOBAL.get_or_init(EvictionRegistry::new)
    }

    fn key_for(jar: &Arc<CookieJar>) -> usize {
        Arc::as_ptr(jar) as usize
    }

    /// Looks up or creates the record for a jar identity.
    fn record_for(&self, jar: &Arc<CookieJar>) -> Arc<AttachmentRecord> {
        let key = Self::key_for(jar);
        // A poisoned map must not wedge every later attach.
        let mut records = self
            .records
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if !records.contains_key(&key) {
            // Reclaim records whose jar is gone before the map grows.
            records.retain(|_, record| record.is_live());
        }

        Arc::clone(
            records
                .entry(key)
                .or_insert_with(|| Arc::new(AttachmentRecord::new())),
        )
    }

    /// Attaches a client to `jar`, starting eviction if it was idle.
    ///
    /// The increment and the idle-to-active decision form one critical
    /// section: concurrent attaches racing on a fresh jar produce exactly
    /// one task. If the timer refuses the submission the increment is
    /// rolled back and the record stays idle.
    ///
    /// Returns a handle that must be kept for the lifetime of the
    /// attachment; it detaches when consumed by
    /// [`Attachment::detach`] or when dropped.
    pub fn attach(
        &self,
        jar: &Arc<CookieJar>,
        timer: &Arc<dyn Timer>,
        interval: Duration,
    ) -> Result<Attachment, EvictionError> {
        let record = self.record_for(jar);
        let mut state = record
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        state.ref_count += 1;
        if state.ref_count == 1 {
            // Idle -> active: this attach owns starting the chain. Later
            // attaches reuse the running task even when they bring a
            // different timer.
            let task = Arc::new(EvictionTask::new(jar, Arc::clone(timer), interval));
            if let Err(err) = EvictionTask::submit(&task) {
                state.ref_count -= 1;
                return Err(EvictionError::Schedule(err));
            }
            state.active_task = Some(task);
            state.store = Arc::downgrade(jar);
            debug!(
                interval_ms = interval.as_millis() as u64,
                "first client attached, eviction task scheduled"
            );
        }
        drop(state);

        Ok(Attachment {
            record: Some(record),
        })
    }

    /// Number of clients currently attached to `jar`.
    pub fn ref_count(&self, jar: &Arc<CookieJar>) -> usize {
        let records = self
            .records
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        records
            .get(&Self::key_for(jar))
            .map(|record| {
                record
                    .state
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .ref_count
            })
            .unwrap_or(0)
    }

    /// True while an eviction task is scheduled for `jar`.
    pub fn is_evicting(&self, jar: &Arc<CookieJar>) -> bool {
        let records = self
            .records
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        records
            .get(&Self::key_for(jar))
            .map(|record| {
                record
                    .state
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .active_task
                    .is_some()
            })
            .unwrap_or(false)
    }
}

/// Handle to one client's attachment to a jar.
///
/// Detaches exactly once: explicitly via [`Attachment::detach`], which
/// surfaces bookkeeping errors, or implicitly on drop, so release runs on
/// every exit path including a failed client startup.
pub struct Attachment {
    record: Option<Arc<AttachmentRecord>>,
}

impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attachment").finish()
    }
}

impl Attachment {
    /// Detaches from the jar, cancelling its eviction task if this was
    /// the last attached client.
    pub fn detach(mut self) -> Result<(), EvictionError> {
        match self.record.take() {
            Some(record) => record.detach(),
            None => Err(EvictionError::NotAttached),
        }
    }
}

impl Drop for Attachment {
    fn drop(&mut self) {
        if let Some(record) = self.record.take() {
            if let Err(err) = record.detach() {
                warn!(error = %err, "attachment dropped in invalid state");
            }
        }
    }
}
