use std::convert::Infallible;
use std::fmt::Display;
use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::{Stream, stream};
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::args::{Command, MergeArgs, MergeOrder, Settings, WalkArgs};
use super::error::AppError;
use crate::executor::{Action, StreamExecutor};
use crate::merge::{ascending_by, by_timestamp, compare, merge_sorted};
use crate::record::{EntryKind, FsEntry, Record, chunked, deep_merge, read_json_lines, walk};
use crate::retry::{RetryPolicy, Retrying};

type Comparator = Box<dyn Fn(&Record, &Record) -> bool + Send>;

/// Walked entries buffered ahead of the executor
const WALK_BUFFER: usize = 256;

/// Run a parsed command and return its rendered output
pub async fn execute(settings: &Settings, command: Command) -> Result<String, AppError> {
    let records = match command {
        Command::Walk(args) => walk_tree(settings, args).await?,
        Command::Merge(args) => merge_files(settings, args).await?,
    };

    Ok(settings
        .format
        .render_list(&records, settings.columns())?)
}

/// Looks up metadata for one filesystem entry
pub struct StatEntry;

#[async_trait]
impl Action<FsEntry> for StatEntry {
    type Output = Record;
    type Error = io::Error;

    async fn call(&self, entry: FsEntry) -> Result<Record, io::Error> {
        let meta = tokio::fs::symlink_metadata(&entry.path).await?;
        let modified = meta.modified().ok().map(|t| DateTime::<Utc>::from(t).to_rfc3339());

        Ok(json!({
            "kind": entry.kind,
            "path": entry.path.to_string_lossy(),
            "size": meta.len(),
            "modified": modified,
            "readonly": meta.permissions().readonly(),
        }))
    }
}

async fn walk_tree(settings: &Settings, args: WalkArgs) -> Result<Vec<Record>, AppError> {
    let (tx, mut rx) = mpsc::channel(WALK_BUFFER);
    let root = args.root;

    // The walk blocks on the filesystem, so it runs off the runtime and
    // waits whenever the executor falls behind.
    let walker = tokio::task::spawn_blocking(move || {
        let mut walked = 0usize;
        for entry in walk(root) {
            match entry {
                Ok(entry) => {
                    if tx.blocking_send(entry).is_err() {
                        break;
                    }
                    walked += 1;
                }
                Err(e) => warn!(error = %e, "Skipping unreadable directory"),
            }
        }
        walked
    });
    let entries = stream::poll_fn(move |cx| rx.poll_recv(cx));

    let policy = RetryPolicy::default().with_max_attempts(settings.retries.saturating_add(1));
    let serial_dirs = args.serial_dirs;

    let executor = StreamExecutor::new(
        &settings.executor_config(),
        entries,
        Retrying::new(StatEntry, policy),
    )?
    .with_sync(move |entry: &FsEntry| serial_dirs && entry.kind == EntryKind::Dir);

    let records = collect_outputs(executor, |record| vec![record]).await?;
    info!(entries = walker.await?, "Walked directory tree");
    Ok(records)
}

async fn merge_files(settings: &Settings, args: MergeArgs) -> Result<Vec<Record>, AppError> {
    if args.batch == 0 {
        return Err(AppError::InvalidArguments("batch size must be at least 1".to_string()));
    }

    let (left, right) = tokio::try_join!(read_json_lines(&args.left), read_json_lines(&args.right))?;
    info!(left = left.len(), right = right.len(), "Loaded records");

    let precedes: Comparator = match args.order {
        MergeOrder::Id => Box::new(ascending_by(args.field.as_deref().unwrap_or(compare::ID_FIELD))),
        MergeOrder::Timestamp => Box::new(by_timestamp(
            args.field.as_deref().unwrap_or(compare::TIMESTAMP_FIELD),
        )),
    };
    let batches = chunked(merge_sorted(left, right, precedes), args.batch);

    let update = Arc::new(args.set.unwrap_or_else(|| Value::Object(Default::default())));
    let apply = move |mut batch: Vec<Record>| {
        let update = Arc::clone(&update);
        async move {
            for record in &mut batch {
                deep_merge(record, &update);
            }
            Ok::<_, Infallible>(batch)
        }
    };

    let ordered = args.ordered;
    let executor = StreamExecutor::new(&settings.executor_config(), stream::iter(batches), apply)?
        .with_sync(move |_: &Vec<Record>| ordered);

    collect_outputs(executor, |batch| batch).await
}

async fn collect_outputs<S, A, P, F>(
    mut executor: StreamExecutor<S, A, P>,
    mut flatten: F,
) -> Result<Vec<Record>, AppError>
where
    S: Stream + Unpin,
    S::Item: Clone + Send + 'static,
    A: Action<S::Item>,
    A::Error: Display,
    P: FnMut(&S::Item) -> bool,
    F: FnMut(A::Output) -> Vec<Record>,
{
    let mut records = Vec::new();
    while let Some(outcome) = executor.next().await {
        let (_, output) = outcome.map_err(|e| AppError::Execution(e.to_string()))?;
        records.extend(flatten(output));
    }
    Ok(records)
}
