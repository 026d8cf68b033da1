//! Poll policy for waiting on runs.

use std::time::Duration;

use async_trait::async_trait;

/// Maximum number of status checks before giving up on a run.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 30;

/// Fixed pause between two status checks.
pub const DEFAULT_POLL_DELAY: Duration = Duration::from_secs(2);

/// Fixed-count, fixed-delay poll budget.
///
/// There is no backoff growth and no jitter: with the defaults a run that never
/// finishes is checked 30 times with 29 pauses of 2 seconds in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl PollPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Upper bound on the time spent sleeping while polling.
    pub fn max_wait(&self) -> Duration {
        self.delay * self.max_attempts.saturating_sub(1)
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_DELAY)
    }
}

/// Source of the pause between polls.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = PollPolicy::default();
        assert_eq!(policy.max_attempts, 30);
        assert_eq!(policy.delay, Duration::from_secs(2));
        assert_eq!(policy.max_wait(), Duration::from_secs(58));
    }

    #[test]
    fn test_max_wait_single_attempt() {
        let policy = PollPolicy::new(1, Duration::from_secs(5));
        assert_eq!(policy.max_wait(), Duration::ZERO);
    }
}
