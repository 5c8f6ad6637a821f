use std::time::Duration;

use crate::limiter::{LimiterError, RateLimiter};

/// Default worker pool size and burst capacity
pub const DEFAULT_CAPACITY: usize = 10;

/// Default admissions per second
pub const DEFAULT_RATE: f64 = 10.0;

/// Sizing for a [`StreamExecutor`](super::StreamExecutor)
///
/// `capacity` bounds both the worker pool and the limiter's burst; `rate`
/// is the sustained number of admissions per second.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutorConfig {
    pub capacity: usize,
    pub rate: f64,
}

impl ExecutorConfig {
    pub fn new(capacity: usize, rate: f64) -> Self {
        Self { capacity, rate }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_rate(mut self, rate: f64) -> Self {
        self.rate = rate;
        self
    }

    /// Check the configuration without building anything
    pub fn validate(&self) -> Result<(), LimiterError> {
        self.limiter()?;
        self.throttle_delay().map(drop)
    }

    /// Pause between admissions once the burst is spent, `1 / rate`
    ///
    /// Rates so small that the pause overflows a `Duration` are rejected.
    pub fn throttle_delay(&self) -> Result<Duration, LimiterError> {
        if !self.rate.is_finite() || self.rate <= 0.0 {
            return Err(LimiterError::InvalidRate(self.rate));
        }
        Duration::try_from_secs_f64(1.0 / self.rate).map_err(|_| LimiterError::InvalidRate(self.rate))
    }

    /// Build the admission limiter, validating the configuration
    pub fn limiter(&self) -> Result<RateLimiter, LimiterError> {
        let capacity = u32::try_from(self.capacity).unwrap_or(u32::MAX);
        RateLimiter::new(capacity, self.rate)
    }
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            rate: DEFAULT_RATE,
        }
    }
}
