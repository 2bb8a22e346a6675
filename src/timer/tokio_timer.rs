//! Tokio-backed [`Timer`] implementation.
//!
//! Each submission spawns one task on the runtime that sleeps for the
//! requested delay, re-checks the cancellation flag, and then runs the
//! [`TimerTask`]. A cancelled submission wakes once from its sleep and
//! exits without running anything.

use crate::timer::{Timeout, Timer, TimerError, TimerTask};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::trace;

/// A [`Timer`] that schedules tasks on a Tokio runtime.
///
/// # Example
///
/// ```
/// use cookievault::timer::{Timer, TimerTask, TokioTimer};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// struct Ping(AtomicUsize);
///
/// impl TimerTask for Ping {
///     fn run(self: Arc<Self>) {
///         self.0.fetch_add(1, Ordering::SeqCst);
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let timer = TokioTimer::new().unwrap();
/// let ping = Arc::new(Ping(AtomicUsize::new(0)));
/// timer.schedule(Arc::clone(&ping) as _, Duration::from_millis(10)).unwrap();
/// tokio::time::sleep(Duration::from_millis(50)).await;
/// assert_eq!(ping.0.load(Ordering::SeqCst), 1);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct TokioTimer {
    handle: Handle,
}

impl TokioTimer {
    /// Creates a timer on the current Tokio runtime.
    ///
    /// Fails with [`TimerError::NoRuntime`] when called outside a runtime.
    pub fn new() -> Result<Self, TimerError> {
        Handle::try_current()
            .map(|handle| Self { handle })
            .map_err(|_| TimerError::NoRuntime)
    }

    /// Creates a timer on an explicit runtime handle.
    pub fn with_handle(handle: Handle) -> Self {
        Self { handle }
    }
}

impl Timer for TokioTimer {
    fn schedule(
        &self,
        task: Arc<dyn TimerTask>,
        delay: Duration,
    ) -> Result<Timeout, TimerError> {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);

        self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            if flag.load(Ordering::Acquire) {
                trace!("timer submission cancelled before firing");
                return;
            }
            task.run();
        });

        Ok(Timeout::new(cancelled))
    }
}
