pub mod app;
pub mod executor;
pub mod limiter;
pub mod merge;
pub mod output;
pub mod prelude;
pub mod record;
pub mod retry;
