use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::error::RecordError;
use super::path::Record;

/// Read one JSON object per non-blank line from `path`
pub async fn read_json_lines(path: impl AsRef<Path>) -> Result<Vec<Record>, RecordError> {
    let path = path.as_ref();
    let file = File::open(path).await?;
    let mut lines = BufReader::new(file).lines();

    let mut records = Vec::new();
    let mut line_no = 0;
    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }

        let record: Record = serde_json::from_str(&line).map_err(|source| RecordError::Json {
            path: path.to_path_buf(),
            line: line_no,
            source,
        })?;
        if !record.is_object() {
            return Err(RecordError::NotAnObject {
                path: path.to_path_buf(),
                line: line_no,
            });
        }
        records.push(record);
    }

    Ok(records)
}
