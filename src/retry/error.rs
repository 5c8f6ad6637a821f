use std::time::Duration;
use thiserror::Error;

/// Returned when a retried operation gives up
#[derive(Error, Debug)]
pub enum RetryError<E> {
    #[error("Gave up after {attempts} attempts ({elapsed:?} elapsed): {last}")]
    Exhausted {
        attempts: u32,
        elapsed: Duration,
        last: E,
    },
}

impl<E> RetryError<E> {
    /// The error returned by the final attempt
    pub fn into_last(self) -> E {
        match self {
            RetryError::Exhausted { last, .. } => last,
        }
    }

    pub fn attempts(&self) -> u32 {
        match self {
            RetryError::Exhausted { attempts, .. } => *attempts,
        }
    }
}
