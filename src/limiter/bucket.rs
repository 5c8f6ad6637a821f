use dashmap::{DashMap, Entry};
use tokio::time::Instant;
use tracing::debug;

use super::error::LimiterError;

/// Token state for a single key
#[derive(Debug, Clone)]
struct Bucket {
    tokens: f64,
    refilled_at: Instant,
}

impl Bucket {
    fn full(capacity: u32) -> Self {
        Self {
            tokens: f64::from(capacity),
            refilled_at: Instant::now(),
        }
    }

    fn refill(&mut self, capacity: u32, rate: f64) {
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(self.refilled_at).as_secs_f64();
        self.tokens = (self.tokens + elapsed * rate).min(f64::from(capacity));
        self.refilled_at = now;
    }
}

/// Keyed token-bucket rate limiter
///
/// Every key owns an independent bucket holding at most `capacity` tokens,
/// refilled continuously at `rate` tokens per second. Buckets are created
/// full on first use, so a fresh key may burst up to `capacity`.
///
/// Bucket state is kept in a `DashMap`; each `consume` runs its
/// refill-check-deduct sequence while holding the shard lock for that key.
#[derive(Debug)]
pub struct RateLimiter {
    capacity: u32,
    rate: f64,
    buckets: DashMap<String, Bucket>,
}

impl RateLimiter {
    /// Create a limiter with `capacity` burst tokens refilled at `rate` per second
    pub fn new(capacity: u32, rate: f64) -> Result<Self, LimiterError> {
        if capacity == 0 {
            return Err(LimiterError::ZeroCapacity);
        }
        if !rate.is_finite() || rate <= 0.0 {
            return Err(LimiterError::InvalidRate(rate));
        }

        Ok(Self {
            capacity,
            rate,
            buckets: DashMap::new(),
        })
    }

    /// Try to take `cost` tokens from the bucket for `key`
    ///
    /// Returns `true` and deducts the tokens if enough are available,
    /// otherwise returns `false` and leaves the bucket untouched.
    ///
    /// `cost` must not exceed the capacity: such a request can never be
    /// satisfied and always returns `false`.
    pub fn consume(&self, key: &str, cost: u32) -> bool {
        if cost > self.capacity {
            debug!(key, cost, capacity = self.capacity, "Cost exceeds bucket capacity");
            return false;
        }

        let cost = f64::from(cost);
        match self.buckets.entry(key.to_string()) {
            Entry::Occupied(mut e) => {
                let bucket = e.get_mut();
                bucket.refill(self.capacity, self.rate);
                if bucket.tokens >= cost {
                    bucket.tokens -= cost;
                    true
                } else {
                    false
                }
            }
            Entry::Vacant(e) => {
                let mut bucket = Bucket::full(self.capacity);
                bucket.tokens -= cost;
                e.insert(bucket);
                true
            }
        }
    }

    /// Tokens currently available for `key`, after refill
    pub fn available(&self, key: &str) -> f64 {
        match self.buckets.get_mut(key) {
            Some(mut bucket) => {
                bucket.refill(self.capacity, self.rate);
                bucket.tokens
            }
            None => f64::from(self.capacity),
        }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }
}
