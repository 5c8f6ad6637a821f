pub mod args;
pub mod cli;
pub mod commands;
pub mod error;

// Re-export commonly used types
pub use args::{Cli, Command, MergeArgs, MergeOrder, Settings, WalkArgs, parse_list, parse_update};
pub use cli::CliApp;
pub use commands::{StatEntry, execute};
pub use error::AppError;
