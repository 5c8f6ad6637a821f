pub mod error;
pub mod format;

// Re-export commonly used types
pub use error::OutputError;
pub use format::OutputFormat;
