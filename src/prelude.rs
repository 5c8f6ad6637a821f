//! Prelude module for convenient imports
//!
//! Import everything you need with: `use drip::prelude::*;`

// Rate limiting
pub use crate::limiter::{LimiterError, RateLimiter};

// Execution
pub use crate::executor::{
    Action, ExecutorConfig, ExecutorError, Outcome, StreamExecutor, WorkerPool, parallelize,
};

// Merging
pub use crate::merge::{MergeSorted, MergeSortedIter, ascending_by, by_id, by_timestamp, merge_sorted};

// Retrying
pub use crate::retry::{RetryError, RetryPolicy, Retrying, retry};

// Records
pub use crate::record::{
    EntryKind, FsEntry, Record, RecordError, chunked, deep_merge, nested_get, nested_set,
    read_json_lines, walk,
};

// Output
pub use crate::output::{OutputError, OutputFormat};

// App types
pub use crate::app::{AppError, Cli, CliApp, Command, Settings, execute};
