//! In-memory throttling of failed login attempts.
//!
//! DESIGN
//! ======
//! Sliding-window counters backed by `HashMap<String, VecDeque<Instant>>`,
//! keyed by normalized email. Each attempt reserves a slot under the lock
//! before credentials are checked, so concurrent guesses cannot overshoot
//! the limit. A successful login clears the key. Once `limit` attempts sit
//! inside the window, further attempts for that email are rejected until the
//! oldest one slides out. Expired keys are swept on every acquire.
//!
//! TRADE-OFFS
//! ==========
//! State is per-process and lost on restart. That is acceptable for a
//! single-node deployment and keeps the login path free of extra queries.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

// =============================================================================
// ERROR TYPE
// =============================================================================

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RateLimitError {
    #[error("too many failed login attempts (max {limit}/{window_secs}s), retry in {retry_after_secs}s")]
    TooManyAttempts { limit: usize, window_secs: u64, retry_after_secs: u64 },
}

// =============================================================================
// LOGIN LIMITER
// =============================================================================

#[derive(Clone)]
pub struct LoginLimiter {
    failures: Arc<Mutex<HashMap<String, VecDeque<Instant>>>>,
    limit: usize,
    window: Duration,
}

impl LoginLimiter {
    #[must_use]
    pub fn new(limit: usize, window: Duration) -> Self {
        Self { failures: Arc::new(Mutex::new(HashMap::new())), limit, window }
    }

    /// Reserve one login attempt for `key`, or reject it if `limit` attempts
    /// already sit inside the window.
    ///
    /// The reservation counts as a failure until the caller either calls
    /// [`reset`](Self::reset) (successful login) or [`release`](Self::release)
    /// (attempt never reached a credential check).
    pub fn acquire(&self, key: &str) -> Result<(), RateLimitError> {
        self.acquire_at(key, Instant::now())
    }

    fn acquire_at(&self, key: &str, now: Instant) -> Result<(), RateLimitError> {
        let mut failures = self
            .failures
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        // Drop every key whose window has fully elapsed.
        failures.retain(|_, deque| {
            prune_window(deque, now, self.window);
            !deque.is_empty()
        });

        let deque = failures.entry(key.to_owned()).or_default();
        if deque.len() >= self.limit {
            let oldest = deque.front().copied().unwrap_or(now);
            let retry_after = self.window.saturating_sub(now.duration_since(oldest));
            return Err(RateLimitError::TooManyAttempts {
                limit: self.limit,
                window_secs: self.window.as_secs(),
                retry_after_secs: retry_after.as_secs().max(1),
            });
        }
        deque.push_back(now);
        Ok(())
    }

    /// Give back the most recent reservation for `key`.
    pub fn release(&self, key: &str) {
        let mut failures = self
            .failures
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(deque) = failures.get_mut(key) {
            deque.pop_back();
            if deque.is_empty() {
                failures.remove(key);
            }
        }
    }

    /// Forget all failures for `key`.
    pub fn reset(&self, key: &str) {
        self.failures
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(key);
    }

    #[cfg(test)]
    pub(crate) fn tracked_keys(&self) -> usize {
        self.failures
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn prune_window(deque: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(&front) = deque.front() {
        if now.duration_since(front) > window {
            deque.pop_front();
        } else {
            break;
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[path = "rate_limit_test.rs"]
mod tests;
