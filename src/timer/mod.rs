//! Timer Module
//!
//! This module abstracts the "run this task once after a delay" facility
//! that drives cookie eviction. A [`Timer`] accepts a [`TimerTask`] and a
//! delay, and fires the task at most once per submission; periodic
//! behavior is achieved by the task resubmitting itself after each run.
//!
//! Every submission returns a [`Timeout`] handle that can cancel the
//! pending firing. Cancellation is cooperative: a task that has already
//! started running is not interrupted.
//!
//! The production implementation is [`TokioTimer`], which schedules on a
//! Tokio runtime. Anything that can run a boxed task after a delay can
//! implement [`Timer`] instead - the eviction machinery in
//! [`crate::eviction`] only ever talks to the trait.

pub mod tokio_timer;

#[cfg(test)]
pub(crate) mod mock;

pub use tokio_timer::TokioTimer;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced when a timer cannot accept a submission.
#[derive(Debug, Error)]
pub enum TimerError {
    /// No async runtime is available to schedule on.
    #[error("no async runtime available to schedule on")]
    NoRuntime,

    /// The timer has been shut down and accepts no further tasks.
    #[error("timer is shut down")]
    Shutdown,
}

/// A task that a [`Timer`] runs once per submission.
pub trait TimerTask: Send + Sync + 'static {
    /// Runs the task. Called at most once per submission.
    fn run(self: Arc<Self>);
}

/// A facility that runs a task once after a delay.
pub trait Timer: Send + Sync + 'static {
    /// Schedules `task` to run once after `delay`.
    ///
    /// Returns a [`Timeout`] that cancels the pending firing, or an error
    /// if the facility cannot accept the task.
    fn schedule(&self, task: Arc<dyn TimerTask>, delay: Duration)
        -> Result<Timeout, TimerError>;
}

/// Cancellable handle to one scheduled submission.
#[derive(Debug)]
pub struct Timeout {
    cancelled: Arc<AtomicBool>,
}

impl Timeout {
    /// Creates a handle around a shared cancellation flag.
    ///
    /// Timer implementations check the flag immediately before running
    /// the task.
    pub fn new(cancelled: Arc<AtomicBool>) -> Self {
        Self { cancelled }
    }

    /// Prevents the pending submission from running.
    ///
    /// A run already in progress is not interrupted.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Returns true if this submission has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}
