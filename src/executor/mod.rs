pub mod action;
pub mod config;
pub mod error;
pub mod parallel;
pub mod pool;
pub mod stream;

// Re-export commonly used types
pub use action::Action;
pub use config::{DEFAULT_CAPACITY, DEFAULT_RATE, ExecutorConfig};
pub use error::ExecutorError;
pub use parallel::parallelize;
pub use pool::WorkerPool;
pub use stream::{Outcome, StreamExecutor};
