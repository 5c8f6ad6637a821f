use std::io;
use thiserror::Error;
use tokio::task::JoinError;

use crate::limiter::LimiterError;
use crate::output::OutputError;
use crate::record::RecordError;

/// Top-level application errors unifying all layer errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Record error: {0}")]
    Record(#[from] RecordError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    #[error("Invalid executor configuration: {0}")]
    Config(#[from] LimiterError),

    #[error("Background task failed: {0}")]
    Task(#[from] JoinError),

    #[error("Execution failed: {0}")]
    Execution(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}
