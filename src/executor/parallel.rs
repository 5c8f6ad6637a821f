use futures::{StreamExt, stream};

use super::action::Action;

/// Run `action` over every operation with at most `capacity` in flight,
/// returning the results in input order
///
/// Unlike [`StreamExecutor`](super::StreamExecutor) there is no rate limit
/// and failures do not stop the remaining operations.
pub async fn parallelize<A, I>(
    action: &A,
    operations: I,
    capacity: usize,
) -> Vec<Result<A::Output, A::Error>>
where
    I: IntoIterator,
    A: Action<I::Item>,
{
    stream::iter(operations)
        .map(|op| action.call(op))
        .buffered(capacity.max(1))
        .collect()
        .await
}
