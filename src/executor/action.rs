use std::future::Future;

use async_trait::async_trait;

/// The unit of work performed for each operation
///
/// Any `Fn(Op) -> impl Future<Output = Result<R, E>>` closure is an action,
/// so most callers never implement this by hand. Implement it directly for
/// actions that carry their own state.
#[async_trait]
pub trait Action<Op>: Send + Sync + 'static {
    type Output: Send + 'static;
    type Error: Send + 'static;

    /// Perform the work for a single operation
    async fn call(&self, op: Op) -> Result<Self::Output, Self::Error>;
}

#[async_trait]
impl<Op, F, Fut, R, E> Action<Op> for F
where
    Op: Send + 'static,
    F: Fn(Op) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, E>> + Send + 'static,
    R: Send + 'static,
    E: Send + 'static,
{
    type Output = R;
    type Error = E;

    async fn call(&self, op: Op) -> Result<R, E> {
        self(op).await
    }
}
