pub mod action;
pub mod error;
pub mod policy;
pub mod runner;

// Re-export commonly used types
pub use action::Retrying;
pub use error::RetryError;
pub use policy::{RetryPolicy, backoff_delay};
pub use runner::retry;
