//! Test doubles for the [`Timer`] trait.
//!
//! [`MockTimer`] records every submission and fires queued tasks only
//! when the test says so, which makes attach/detach scheduling decisions
//! observable without any sleeping. [`FailingTimer`] refuses every
//! submission.

use crate::timer::{Timeout, Timer, TimerError, TimerTask};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

struct Submission {
    task: Arc<dyn TimerTask>,
    delay: Duration,
    cancelled: Arc<AtomicBool>,
}

/// A timer that queues submissions instead of running them.
#[derive(Default)]
pub(crate) struct MockTimer {
    queue: Mutex<Vec<Submission>>,
    total: Mutex<usize>,
}

impl MockTimer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Total number of submissions ever accepted.
    pub(crate) fn submit_count(&self) -> usize {
        *self.total.lock().unwrap()
    }

    /// Delay of the most recent submission.
    pub(crate) fn last_delay(&self) -> Option<Duration> {
        self.queue.lock().unwrap().last().map(|s| s.delay)
    }

    /// Runs every queued, uncancelled submission exactly once.
    ///
    /// Tasks run outside the queue lock, so a task that resubmits itself
    /// lands back on the queue for the next call. Returns the number of
    /// tasks actually run.
    pub(crate) fn fire_all(&self) -> usize {
        let pending: Vec<Submission> = self.queue.lock().unwrap().drain(..).collect();

        let mut fired = 0;
        for submission in pending {
            if submission.cancelled.load(Ordering::Acquire) {
                continue;
            }
            submission.task.run();
            fired += 1;
        }
        fired
    }
}

impl Timer for MockTimer {
    fn schedule(
        &self,
        task: Arc<dyn TimerTask>,
        delay: Duration,
    ) -> Result<Timeout, TimerError> {
        let cancelled = Arc::new(AtomicBool::new(false));
        self.queue.lock().unwrap().push(Submission {
            task,
            delay,
            cancelled: Arc::clone(&cancelled),
        });
        *self.total.lock().unwrap() += 1;
        Ok(Timeout::new(cancelled))
    }
}

/// A timer that rejects every submission.
pub(crate) struct FailingTimer;

impl Timer for FailingTimer {
    fn schedule(
        &self,
        _task: Arc<dyn TimerTask>,
        _delay: Duration,
    ) -> Result<Timeout, TimerError> {
        Err(TimerError::Shutdown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    struct CountingTask {
        runs: AtomicUsize,
    }

    impl TimerTask for CountingTask {
        fn run(self: Arc<Self>) {
            self.runs.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn records_and_fires_submissions() {
        let timer = MockTimer::new();
        let task = Arc::new(CountingTask {
            runs: AtomicUsize::new(0),
        });

        timer
            .schedule(Arc::clone(&task) as _, Duration::from_secs(30))
            .unwrap();

        assert_eq!(timer.submit_count(), 1);
        assert_eq!(timer.last_delay(), Some(Duration::from_secs(30)));
        assert_eq!(task.runs.load(Ordering::SeqCst), 0);

        assert_eq!(timer.fire_all(), 1);
        assert_eq!(task.runs.load(Ordering::SeqCst), 1);

        // Each submission fires at most once
        assert_eq!(timer.fire_all(), 0);
        assert_eq!(task.runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn cancelled_submission_is_skipped() {
        let timer = MockTimer::new();
        let task = Arc::new(CountingTask {
            runs: AtomicUsize::new(0),
        });

        let timeout = timer
            .schedule(Arc::clone(&task) as _, Duration::from_secs(30))
            .unwrap();
        timeout.cancel();

        assert_eq!(timer.fire_all(), 0);
        assert_eq!(task.runs.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn failing_timer_rejects() {
        let timer = FailingTimer;
        let task = Arc::new(CountingTask {
            runs: AtomicUsize::new(0),
        });

        assert!(matches!(
            timer.schedule(task as _, Duration::from_secs(1)),
            Err(TimerError::Shutdown)
        ));
    }
}
