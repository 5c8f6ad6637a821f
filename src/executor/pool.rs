use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};

/// Bounded pool of tokio worker tasks
///
/// Every submission is spawned immediately but waits for one of `capacity`
/// permits before running, so excess submissions queue inside the pool.
/// Dropping the pool aborts everything still queued or running.
pub struct WorkerPool<T> {
    tasks: JoinSet<T>,
    permits: Arc<Semaphore>,
    capacity: usize,
}

impl<T: Send + 'static> WorkerPool<T> {
    /// Create a pool running at most `capacity` tasks at once (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, Semaphore::MAX_PERMITS);
        Self {
            tasks: JoinSet::new(),
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Queue `work` for execution on the pool
    pub fn submit<F>(&mut self, work: F)
    where
        F: Future<Output = T> + Send + 'static,
    {
        let permits = Arc::clone(&self.permits);
        self.tasks.spawn(async move {
            // The semaphore is never closed, so acquisition cannot fail
            let _permit = permits.acquire_owned().await.ok();
            work.await
        });
    }

    /// Wait for any submitted task to finish
    ///
    /// Returns `None` when nothing is queued or running.
    pub async fn join_next(&mut self) -> Option<Result<T, JoinError>> {
        self.tasks.join_next().await
    }

    /// Collect a finished task without waiting
    pub fn try_join_next(&mut self) -> Option<Result<T, JoinError>> {
        self.tasks.try_join_next()
    }

    /// Abort every queued and running task
    pub fn abort_all(&mut self) {
        self.tasks.abort_all();
    }

    /// Tasks submitted but not yet collected
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Tasks currently holding a permit
    pub fn running(&self) -> usize {
        self.capacity - self.permits.available_permits()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
