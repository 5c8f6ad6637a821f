use std::time::Duration;

/// Delay before the first retry
pub const DEFAULT_BASE: Duration = Duration::from_millis(500);

/// Upper bound on any single backoff delay
pub const DEFAULT_CAP: Duration = Duration::from_secs(4);

/// Attempts made by [`RetryPolicy::default`] before giving up
pub const DEFAULT_MAX_ATTEMPTS: u32 = 8;

/// Exponential backoff: `min(base * 2^attempt, cap)`
///
/// `attempt` counts failures so far, starting at 0.
pub fn backoff_delay(base: Duration, cap: Duration, attempt: u32) -> Duration {
    let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
    base.checked_mul(factor).map_or(cap, |delay| delay.min(cap))
}

/// How often and how long to retry a failing operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub base: Duration,
    pub cap: Duration,
    /// Total attempts including the first; `None` retries forever
    pub max_attempts: Option<u32>,
    /// Stop retrying once this much time has passed since the first attempt
    pub max_elapsed: Option<Duration>,
}

impl RetryPolicy {
    /// Retry forever with the default backoff
    pub fn unbounded() -> Self {
        Self {
            max_attempts: None,
            ..Self::default()
        }
    }

    pub fn with_base(mut self, base: Duration) -> Self {
        self.base = base;
        self
    }

    pub fn with_cap(mut self, cap: Duration) -> Self {
        self.cap = cap;
        self
    }

    /// Limit total attempts; values below 1 are raised to 1
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts.max(1));
        self
    }

    pub fn with_max_elapsed(mut self, elapsed: Duration) -> Self {
        self.max_elapsed = Some(elapsed);
        self
    }

    /// Delay to wait after `attempt` failures
    pub fn delay_for(&self, attempt: u32) -> Duration {
        backoff_delay(self.base, self.cap, attempt)
    }

    /// Whether another attempt is allowed after `attempts` failures, `elapsed`
    /// since the first attempt, before sleeping `next_delay`
    pub fn allows_retry(&self, attempts: u32, elapsed: Duration, next_delay: Duration) -> bool {
        if self.max_attempts.is_some_and(|max| attempts >= max) {
            return false;
        }
        !self
            .max_elapsed
            .is_some_and(|max| elapsed.saturating_add(next_delay) > max)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base: DEFAULT_BASE,
            cap: DEFAULT_CAP,
            max_attempts: Some(DEFAULT_MAX_ATTEMPTS),
            max_elapsed: None,
        }
    }
}
