use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

/// Countdown of requests that have not signalled completion yet.
///
/// Decrements are lock-free; the mutex/condvar pair is only touched when the
/// count reaches zero and by waiters.
#[derive(Debug)]
pub struct CompletionTracker {
    remaining: AtomicU64,
    expected: u64,
    zero_lock: Mutex<()>,
    zero_signal: Condvar,
}

impl CompletionTracker {
    #[must_use]
    pub const fn new(expected: u64) -> Self {
        Self {
            remaining: AtomicU64::new(expected),
            expected,
            zero_lock: Mutex::new(()),
            zero_signal: Condvar::new(),
        }
    }

    #[must_use]
    pub const fn expected(&self) -> u64 {
        self.expected
    }

    #[must_use]
    pub fn outstanding(&self) -> u64 {
        self.remaining.load(Ordering::Acquire)
    }

    /// Count one completion. Returns false if the counter was already zero.
    pub fn decrement(&self) -> bool {
        let previous =
            self.remaining
                .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                    current.checked_sub(1)
                });
        match previous {
            Ok(1) => {
                self.notify_zero();
                true
            }
            Ok(_) => true,
            Err(_) => {
                tracing::warn!("Completion signalled after the counter reached zero.");
                false
            }
        }
    }

    /// Block until every expected completion arrived or `timeout` elapsed.
    ///
    /// Returns `true` when the counter reached zero in time.
    #[must_use]
    pub fn await_zero(&self, timeout: Duration) -> bool {
        if self.outstanding() == 0 {
            return true;
        }
        let deadline = Instant::now().checked_add(timeout);
        let mut guard = match self.zero_lock.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        loop {
            if self.outstanding() == 0 {
                return true;
            }
            let wait_for = match deadline {
                Some(deadline) => deadline.saturating_duration_since(Instant::now()),
                None => timeout,
            };
            if wait_for.is_zero() {
                return false;
            }
            guard = match self.zero_signal.wait_timeout(guard, wait_for) {
                Ok((guard, _)) => guard,
                Err(poisoned) => poisoned.into_inner().0,
            };
        }
    }

    fn notify_zero(&self) {
        // Taking the lock orders the notification after a waiter's check.
        let _guard = match self.zero_lock.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        self.zero_signal.notify_all();
    }
}
