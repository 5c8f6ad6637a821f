pub mod chunk;
pub mod error;
pub mod lines;
pub mod path;
pub mod walk;

// Re-export commonly used types
pub use chunk::{Chunked, chunked};
pub use error::RecordError;
pub use lines::read_json_lines;
pub use path::{Record, deep_merge, nested_get, nested_set};
pub use walk::{EntryKind, FsEntry, FsWalk, walk};
