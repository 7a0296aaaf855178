//! Bounded retry policies for polling a flaky remote UI

use std::time::Duration;

/// How many times to attempt an operation and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one (at least 1)
    pub max_attempts: u32,
    /// Delay before each further attempt
    pub backoff: Duration,
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts,
            backoff,
        }
    }

    /// A policy that retries immediately
    pub const fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO)
    }

    /// Attempt numbers, starting at 1
    pub fn attempts(&self) -> std::ops::RangeInclusive<u32> {
        1..=self.max_attempts.max(1)
    }

    /// Check if `attempt` was the final one allowed
    pub fn is_last(&self, attempt: u32) -> bool {
        attempt >= self.max_attempts.max(1)
    }

    /// Wait out the backoff delay
    pub async fn pause(&self) {
        if !self.backoff.is_zero() {
            tokio::time::sleep(self.backoff).await;
        }
    }
}

/// Retry policies used while draining one spell-check batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckPolicy {
    /// Re-reading an element that vanished between lookup and read
    pub stale_read: RetryPolicy,
    /// Re-reading the flagged word while the surface still shows it empty
    pub empty_read: RetryPolicy,
    /// Waiting for the dismiss ("ignore") control to reappear
    pub dismiss: RetryPolicy,
}

impl Default for CheckPolicy {
    fn default() -> Self {
        let poll = Duration::from_secs(1);
        Self {
            stale_read: RetryPolicy::immediate(3),
            empty_read: RetryPolicy::new(30, poll),
            dismiss: RetryPolicy::new(30, poll),
        }
    }
}
