pub mod bucket;
pub mod error;

// Re-export commonly used types
pub use bucket::RateLimiter;
pub use error::LimiterError;
