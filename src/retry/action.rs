use std::fmt::Display;

use async_trait::async_trait;

use super::error::RetryError;
use super::policy::RetryPolicy;
use super::runner::retry;
use crate::executor::Action;

/// Wraps an [`Action`] so each operation is retried under a [`RetryPolicy`]
pub struct Retrying<A> {
    inner: A,
    policy: RetryPolicy,
}

impl<A> Retrying<A> {
    pub fn new(inner: A, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

#[async_trait]
impl<Op, A> Action<Op> for Retrying<A>
where
    Op: Clone + Send + Sync + 'static,
    A: Action<Op>,
    A::Error: Display,
{
    type Output = A::Output;
    type Error = RetryError<A::Error>;

    async fn call(&self, op: Op) -> Result<Self::Output, Self::Error> {
        retry(&self.policy, || self.inner.call(op.clone())).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use futures::stream;

    use super::*;
    use crate::executor::{ExecutorConfig, StreamExecutor};

    #[tokio::test(start_paused = true)]
    async fn retried_action_recovers_inside_executor() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let flaky = move |op: u32| {
            let first_try = counter.fetch_add(1, Ordering::SeqCst) == 0;
            async move {
                if first_try {
                    Err(format!("transient failure on {op}"))
                } else {
                    Ok(op)
                }
            }
        };

        let action = Retrying::new(flaky, RetryPolicy::default());
        let mut executor =
            StreamExecutor::new(&ExecutorConfig::new(1, 1_000.0), stream::iter(vec![7u32]), action)
                .unwrap();

        let (op, output) = executor.next().await.unwrap().unwrap();
        assert_eq!((op, output), (7, 7));
        assert!(executor.next().await.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_retries_surface_as_operation_error() {
        let action = Retrying::new(
            |_: u32| async { Err::<u32, _>("permanent") },
            RetryPolicy::default()
                .with_max_attempts(2)
                .with_base(Duration::from_millis(10)),
        );

        let err = action.call(1).await.unwrap_err();

        assert_eq!(err.attempts(), 2);
        assert_eq!(err.into_last(), "permanent");
    }
}
