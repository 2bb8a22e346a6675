//! The self-rescheduling sweep task.
//!
//! An [`EvictionTask`] is bound to one jar, one timer, and a fixed
//! interval. Each run sweeps the jar once and resubmits the task to its
//! timer, producing a periodic sweep without any dedicated thread or
//! loop. Cancelling the task turns the next run into a no-op that does
//! not resubmit, which ends the chain.

use crate::jar::CookieJar;
use crate::timer::{Timeout, Timer, TimerError, TimerTask};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::{Duration, Instant};
use tracing::{debug, error, trace};

/// A periodic cookie-eviction task.
///
/// The task holds its jar weakly: if every client drops the jar, the
/// next run finds nothing to sweep and the chain ends on its own.
pub struct EvictionTask {
    jar: Weak<CookieJar>,
    timer: Arc<dyn Timer>,
    interval: Duration,
    cancelled: AtomicBool,
    /// Handle to the not-yet-fired submission, replaced on every resubmit.
    pending: Mutex<Option<Timeout>>,
}

impl EvictionTask {
    /// Creates a task bound to `jar`, sweeping every `interval` on `timer`.
    ///
    /// The task does nothing until submitted via [`EvictionTask::submit`].
    pub(crate) fn new(jar: &Arc<CookieJar>, timer: Arc<dyn Timer>, interval: Duration) -> Self {
        Self {
            jar: Arc::downgrade(jar),
            timer,
            interval,
            cancelled: AtomicBool::new(false),
            pending: Mutex::new(None),
        }
    }

    /// Submits the task to its timer for one firing after the interval.
    pub(crate) fn submit(task: &Arc<EvictionTask>) -> Result<(), TimerError> {
        let timeout = task
            .timer
            .schedule(Arc::clone(task) as Arc<dyn TimerTask>, task.interval)?;
        *task.pending.lock().unwrap() = Some(timeout);
        Ok(())
    }

    /// Marks the task inactive and ends the periodic chain.
    ///
    /// The pending submission is cancelled; a run that has already
    /// started still completes its sweep but will not resubmit.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
        if let Some(timeout) = self.pending.lock().unwrap().take() {
            timeout.cancel();
        }
    }

    /// Returns true once [`cancel`](EvictionTask::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl TimerTask for EvictionTask {
    fn run(self: Arc<Self>) {
        if self.cancelled.load(Ordering::Acquire) {
            trace!("eviction task fired after cancellation");
            return;
        }

        let Some(jar) = self.jar.upgrade() else {
            debug!("cookie jar dropped, eviction chain ends");
            return;
        };

        let swept = jar.sweep(Instant::now());
        if swept > 0 {
            debug!(swept, remaining = jar.len(), "expired cookies evicted");
        } else {
            trace!("sweep found no expired cookies");
        }
        drop(jar);

        // Re-check after the sweep: a cancel that landed while sweeping
        // must stop the chain here, not after one more interval.
        if self.cancelled.load(Ordering::Acquire) {
            return;
        }

        if let Err(err) = EvictionTask::submit(&self) {
            error!(error = %err, "failed to resubmit eviction task, chain ends");
        }
    }
}
