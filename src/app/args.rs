use std::convert::Infallible;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::{Map, Value};

use super::error::AppError;
use crate::executor::{DEFAULT_CAPACITY, DEFAULT_RATE, ExecutorConfig};
use crate::output::OutputFormat;
use crate::record::{Record, nested_set};

/// Rate-limited, concurrent record and file processing
#[derive(Parser, Debug)]
#[command(name = "drip", version)]
pub struct Cli {
    #[command(flatten)]
    pub settings: Settings,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command
#[derive(Args, Debug, Clone)]
pub struct Settings {
    /// How to format output
    #[arg(global = true, short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Comma-separated (dotted) field paths to show in table output
    #[arg(global = true, long)]
    pub columns: Option<ColumnList>,

    /// Maximum concurrent operations and burst size
    #[arg(global = true, long, env = "DRIP_CAPACITY", default_value_t = DEFAULT_CAPACITY)]
    pub capacity: usize,

    /// Operations admitted per second
    #[arg(global = true, long, env = "DRIP_RATE", default_value_t = DEFAULT_RATE)]
    pub rate: f64,

    /// Retries per failing operation
    #[arg(global = true, long, env = "DRIP_RETRIES", default_value_t = 3)]
    pub retries: u32,
}

impl Settings {
    pub fn executor_config(&self) -> ExecutorConfig {
        ExecutorConfig::new(self.capacity, self.rate)
    }

    pub fn columns(&self) -> &[String] {
        self.columns.as_ref().map_or(&[], |c| c.0.as_slice())
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Stat every directory and file below ROOT
    Walk(WalkArgs),
    /// Merge two sorted JSON-lines files and apply an update to every record
    Merge(MergeArgs),
}

#[derive(Args, Debug)]
pub struct WalkArgs {
    pub root: PathBuf,

    /// Stat directories one at a time, in walk order
    #[arg(long)]
    pub serial_dirs: bool,
}

#[derive(Args, Debug)]
pub struct MergeArgs {
    pub left: PathBuf,
    pub right: PathBuf,

    /// Ordering both inputs are sorted by
    #[arg(long, value_enum, default_value_t = MergeOrder::Id)]
    pub order: MergeOrder,

    /// Field compared by the ordering (defaults to `id` or `created_at`)
    #[arg(long)]
    pub field: Option<String>,

    /// Update applied to each record, e.g. `status=done,meta.owner=ops`
    #[arg(long, value_parser = parse_update)]
    pub set: Option<Record>,

    /// Records per operation
    #[arg(long, default_value_t = 1)]
    pub batch: usize,

    /// Process records one at a time, keeping merged order in the output
    #[arg(long)]
    pub ordered: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOrder {
    /// Ascending identifier
    Id,
    /// Ascending ISO-8601 timestamp
    Timestamp,
}

/// A comma-separated list argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnList(pub Vec<String>);

impl FromStr for ColumnList {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(parse_list(s)))
    }
}

/// Split `a, b ,c` into trimmed, non-empty items
pub fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse `a.b=1,c=2` into the nested object `{"a": {"b": "1"}, "c": "2"}`
///
/// Values stay strings; only the first `=` of each pair separates key from value.
pub fn parse_update(value: &str) -> Result<Record, AppError> {
    let mut update = Value::Object(Map::new());

    for pair in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (path, val) = pair
            .split_once('=')
            .ok_or_else(|| AppError::InvalidArguments(format!("expected key=value, got '{pair}'")))?;
        let path = path.trim();
        if path.is_empty() || path.split('.').any(str::is_empty) {
            return Err(AppError::InvalidArguments(format!("invalid field path in '{pair}'")));
        }
        nested_set(&mut update, path, Value::String(val.trim().to_string()));
    }

    Ok(update)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use serde_json::json;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_list() {
        assert_eq!(parse_list("id, meta.owner ,name"), vec!["id", "meta.owner", "name"]);
        assert!(parse_list("").is_empty());
    }

    #[test]
    fn parses_nested_update() {
        let update = parse_update("a.b=1, c=2, a.d=x=y").unwrap();
        assert_eq!(update, json!({"a": {"b": "1", "d": "x=y"}, "c": "2"}));
    }

    #[test]
    fn rejects_update_without_value() {
        assert!(matches!(parse_update("a.b"), Err(AppError::InvalidArguments(_))));
        assert!(matches!(parse_update("a..b=1"), Err(AppError::InvalidArguments(_))));
    }

    #[test]
    fn parses_full_command_line() {
        let cli = Cli::try_parse_from([
            "drip", "--format", "table", "--columns", "id,meta.owner", "--capacity", "4", "merge",
            "a.jsonl", "b.jsonl", "--order", "timestamp", "--set", "status=done", "--ordered",
        ])
        .unwrap();

        assert_eq!(cli.settings.format, OutputFormat::Table);
        assert_eq!(cli.settings.columns(), ["id", "meta.owner"]);
        assert_eq!(cli.settings.executor_config().capacity, 4);

        let Command::Merge(args) = cli.command else {
            panic!("Expected merge command");
        };
        assert_eq!(args.order, MergeOrder::Timestamp);
        assert_eq!(args.set, Some(json!({"status": "done"})));
        assert!(args.ordered);
        assert_eq!(args.batch, 1);
    }

    #[test]
    fn global_flags_accepted_after_subcommand() {
        let cli = Cli::try_parse_from(["drip", "walk", "/tmp", "--serial-dirs", "--rate", "2.5"]).unwrap();

        assert_eq!(cli.settings.rate, 2.5);
        assert!(matches!(cli.command, Command::Walk(WalkArgs { serial_dirs: true, .. })));
    }
}
