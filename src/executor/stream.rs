use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use futures::{Stream, StreamExt, stream};
use tokio::task::JoinError;
use tokio::time::{Instant, sleep};
use tracing::{debug, warn};

use super::action::Action;
use super::config::ExecutorConfig;
use super::error::ExecutorError;
use super::pool::WorkerPool;
use crate::limiter::{LimiterError, RateLimiter};

/// Limiter bucket shared by every admission of one executor
const ADMISSION_BUCKET: &str = "stream";

/// Item produced by a [`StreamExecutor`]
pub type Outcome<Op, A> =
    Result<(Op, <A as Action<Op>>::Output), ExecutorError<<A as Action<Op>>::Error>>;

type Completion<Op, A> = (Op, Result<<A as Action<Op>>::Output, <A as Action<Op>>::Error>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Admitting,
    Draining,
    Finished,
}

fn never_sync<Op>(_: &Op) -> bool {
    false
}

/// Rate-limited, bounded-concurrency executor over a stream of operations
///
/// Operations are pulled from `operations` no faster than the configured
/// rate and handed to a pool of at most `capacity` concurrent workers.
/// Results come back in completion order, except for operations matched by
/// the sync predicate: those run inline on the caller's task, bypassing the
/// pool, and are yielded exactly where they were pulled.
///
/// The first failure (an action error or a panicked worker) is yielded and
/// ends the sequence; remaining workers are aborted. Dropping the executor
/// early aborts all outstanding work as well.
///
/// `next` is not cancel-safe: dropping its future part-way may lose the
/// operation being admitted.
///
/// # Example
/// ```rust,ignore
/// let action = |id: u32| async move { upload(id).await };
/// let mut executor = StreamExecutor::new(&ExecutorConfig::default(), stream::iter(0..100), action)?
///     .with_sync(|id| *id == 0);
///
/// while let Some(outcome) = executor.next().await {
///     let (id, response) = outcome?;
/// }
/// ```
pub struct StreamExecutor<S, A, P = fn(&<S as Stream>::Item) -> bool>
where
    S: Stream,
    A: Action<S::Item>,
{
    operations: S,
    action: Arc<A>,
    sync: P,
    limiter: RateLimiter,
    throttle_delay: Duration,
    pool: WorkerPool<Completion<S::Item, A>>,
    ready: VecDeque<Outcome<S::Item, A>>,
    admitted: bool,
    phase: Phase,
}

impl<S, A> StreamExecutor<S, A>
where
    S: Stream + Unpin,
    S::Item: Clone + Send + 'static,
    A: Action<S::Item>,
{
    /// Create an executor that runs every operation on the worker pool
    pub fn new(config: &ExecutorConfig, operations: S, action: A) -> Result<Self, LimiterError> {
        let limiter = config.limiter()?;
        let throttle_delay = config.throttle_delay()?;

        Ok(Self {
            operations,
            action: Arc::new(action),
            sync: never_sync::<S::Item>,
            throttle_delay,
            limiter,
            pool: WorkerPool::new(config.capacity),
            ready: VecDeque::new(),
            admitted: false,
            phase: Phase::Admitting,
        })
    }
}

impl<S, A, P> StreamExecutor<S, A, P>
where
    S: Stream + Unpin,
    S::Item: Clone + Send + 'static,
    A: Action<S::Item>,
    P: FnMut(&S::Item) -> bool,
{
    /// Run operations matching `sync` inline instead of on the pool
    pub fn with_sync<Q>(self, sync: Q) -> StreamExecutor<S, A, Q>
    where
        Q: FnMut(&S::Item) -> bool,
    {
        StreamExecutor {
            operations: self.operations,
            action: self.action,
            sync,
            limiter: self.limiter,
            throttle_delay: self.throttle_delay,
            pool: self.pool,
            ready: self.ready,
            admitted: self.admitted,
            phase: self.phase,
        }
    }

    /// Produce the next `(operation, output)` pair, or `None` once every
    /// operation has been executed and collected
    pub async fn next(&mut self) -> Option<Outcome<S::Item, A>> {
        loop {
            if let Some(outcome) = self.ready.pop_front() {
                if outcome.is_err() {
                    self.terminate();
                }
                return Some(outcome);
            }

            match self.phase {
                Phase::Finished => return None,
                Phase::Draining => {
                    match self.pool.join_next().await {
                        Some(joined) => self.collect(joined),
                        None => {
                            debug!("All operations collected");
                            self.phase = Phase::Finished;
                        }
                    }
                    continue;
                }
                Phase::Admitting => {}
            }

            if !self.admitted {
                if !self.limiter.consume(ADMISSION_BUCKET, 1) {
                    self.throttle().await;
                }
                // Whatever the throttle collected is yielded before pulling
                self.admitted = true;
                continue;
            }
            self.admitted = false;

            match self.operations.next().await {
                None => {
                    debug!(in_flight = self.pool.len(), "Operations exhausted, draining pool");
                    self.phase = Phase::Draining;
                }
                Some(op) if (self.sync)(&op) => {
                    debug!("Executing operation inline");
                    let result = A::call(&self.action, op.clone()).await;
                    self.push_completion((op, result));
                }
                Some(op) => self.submit(op),
            }
        }
    }

    /// Consume the executor as a `Stream` of outcomes
    pub fn into_stream(self) -> impl Stream<Item = Outcome<S::Item, A>> {
        stream::unfold(self, |mut executor| async move {
            let outcome = executor.next().await?;
            Some((outcome, executor))
        })
    }

    /// Operations submitted to the pool and not yet collected
    pub fn in_flight(&self) -> usize {
        self.pool.len()
    }

    fn submit(&mut self, op: S::Item) {
        let action = Arc::clone(&self.action);
        debug!(in_flight = self.pool.len() + 1, "Admitting operation");
        self.pool.submit(async move {
            let result = A::call(&action, op.clone()).await;
            (op, result)
        });
    }

    /// Wait for at least one in-flight operation, then pause long enough for
    /// the limiter to have a token again
    async fn throttle(&mut self) {
        let started = Instant::now();

        if let Some(joined) = self.pool.join_next().await {
            self.collect(joined);
        }
        while let Some(joined) = self.pool.try_join_next() {
            self.collect(joined);
        }

        if started.elapsed() < Duration::from_secs(1) {
            debug!(delay_ms = self.throttle_delay.as_millis() as u64, "Rate limited");
            sleep(self.throttle_delay).await;
        }
    }

    fn collect(&mut self, joined: Result<Completion<S::Item, A>, JoinError>) {
        match joined {
            Ok(completion) => self.push_completion(completion),
            Err(e) => {
                warn!(error = %e, "Worker task did not complete");
                self.ready.push_back(Err(ExecutorError::Join(e)));
            }
        }
    }

    fn push_completion(&mut self, (op, result): Completion<S::Item, A>) {
        let outcome = match result {
            Ok(output) => Ok((op, output)),
            Err(e) => {
                warn!("Operation failed, terminating stream");
                Err(ExecutorError::Operation(e))
            }
        };
        self.ready.push_back(outcome);
    }

    fn terminate(&mut self) {
        self.phase = Phase::Finished;
        self.ready.clear();
        self.pool.abort_all();
    }
}
