use thiserror::Error;
use tokio::task::JoinError;

/// Errors surfaced while draining a [`StreamExecutor`](super::StreamExecutor)
///
/// Either one terminates the result sequence.
#[derive(Error, Debug)]
pub enum ExecutorError<E> {
    #[error("Operation failed: {0}")]
    Operation(E),

    #[error("Worker task failed: {0}")]
    Join(#[from] JoinError),
}

impl<E> ExecutorError<E> {
    /// The action's own error, if that is what failed
    pub fn into_operation_error(self) -> Option<E> {
        match self {
            ExecutorError::Operation(e) => Some(e),
            ExecutorError::Join(_) => None,
        }
    }
}
