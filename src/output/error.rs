use thiserror::Error;

/// Errors rendering records for display
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Record is not a JSON object, cannot infer columns")]
    NoColumns,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formats_correctly() {
        assert_eq!(
            OutputError::NoColumns.to_string(),
            "Record is not a JSON object, cannot infer columns"
        );
    }
}
