use thiserror::Error;

/// Rate limiter configuration errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LimiterError {
    #[error("Bucket capacity must be at least 1")]
    ZeroCapacity,

    #[error("Refill rate must be a positive number of tokens per second, got {0}")]
    InvalidRate(f64),
}
