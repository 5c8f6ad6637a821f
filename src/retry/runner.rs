use std::fmt::Display;
use std::future::Future;

use tokio::time::{Instant, sleep};
use tracing::warn;

use super::error::RetryError;
use super::policy::RetryPolicy;

/// Run `operation` until it succeeds or `policy` gives up
///
/// Every failure is treated the same way: it is logged, then the runner
/// sleeps for the policy's backoff delay before the next attempt. When the
/// policy's attempt or elapsed-time ceiling is reached, the last error is
/// returned inside [`RetryError::Exhausted`].
pub async fn retry<F, Fut, T, E>(policy: &RetryPolicy, mut operation: F) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let started = Instant::now();
    let mut failures: u32 = 0;

    loop {
        let error = match operation().await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        let delay = policy.delay_for(failures);
        failures = failures.saturating_add(1);
        let elapsed = started.elapsed();

        if !policy.allows_retry(failures, elapsed, delay) {
            warn!(attempts = failures, error = %error, "Giving up");
            return Err(RetryError::Exhausted {
                attempts: failures,
                elapsed,
                last: error,
            });
        }

        warn!(
            attempt = failures,
            error = %error,
            delay_ms = delay.as_millis() as u64,
            "Retrying"
        );
        sleep(delay).await;
    }
}
