use comfy_table::{Cell, Table, presets};
use serde_json::Value;

use super::error::OutputError;
use crate::record::{Record, nested_get};

/// How results are printed
#[derive(clap::ValueEnum, Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Pretty-printed JSON with sorted keys
    #[default]
    Json,
    /// A table with one column per (dotted) field path
    Table,
}

impl OutputFormat {
    /// Render a list of records
    ///
    /// Table columns default to the keys of the first record.
    pub fn render_list(&self, records: &[Record], columns: &[String]) -> Result<String, OutputError> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(records)?),
            OutputFormat::Table => {
                let Some(first) = records.first() else {
                    return Ok("No results".to_string());
                };
                let columns = resolve_columns(first, columns)?;

                let mut table = new_table(columns.iter().map(String::as_str));
                for record in records {
                    table.add_row(columns.iter().map(|col| cell(nested_get(record, col))));
                }
                Ok(table.to_string())
            }
        }
    }

    /// Render a single record, as an `attribute | value` table in table mode
    pub fn render_one(&self, record: &Record, columns: &[String]) -> Result<String, OutputError> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
            OutputFormat::Table => {
                let columns = resolve_columns(record, columns)?;

                let mut table = new_table(["attribute", "value"]);
                for col in &columns {
                    table.add_row(vec![Cell::new(col), cell(nested_get(record, col))]);
                }
                Ok(table.to_string())
            }
        }
    }
}

fn resolve_columns(record: &Record, columns: &[String]) -> Result<Vec<String>, OutputError> {
    if !columns.is_empty() {
        return Ok(columns.to_vec());
    }
    record
        .as_object()
        .map(|map| map.keys().cloned().collect())
        .ok_or(OutputError::NoColumns)
}

fn new_table<'a>(headers: impl IntoIterator<Item = &'a str>) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::ASCII_FULL);
    table.set_header(headers);
    table
}

/// Scalars render verbatim, nested values as compact JSON, missing as empty
fn cell(value: Option<&Value>) -> Cell {
    match value {
        None | Some(Value::Null) => Cell::new(""),
        Some(Value::String(s)) => Cell::new(s),
        Some(other) => Cell::new(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn columns(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn json_sorts_keys() {
        let records = vec![json!({"b": 1, "a": 2})];
        let out = OutputFormat::Json.render_list(&records, &[]).unwrap();

        assert!(out.find("\"a\"").unwrap() < out.find("\"b\"").unwrap());
    }

    #[test]
    fn empty_table_reports_no_results() {
        assert_eq!(OutputFormat::Table.render_list(&[], &[]).unwrap(), "No results");
    }

    #[test]
    fn table_resolves_dotted_columns() {
        let records = vec![
            json!({"id": 1, "meta": {"owner": "ops", "tags": ["x"]}}),
            json!({"id": 2, "meta": {"owner": "dev"}}),
        ];

        let out = OutputFormat::Table
            .render_list(&records, &columns(&["id", "meta.owner", "meta.tags"]))
            .unwrap();

        assert!(out.contains("meta.owner"));
        assert!(out.contains("ops"));
        assert!(out.contains("dev"));
        assert!(out.contains("[\"x\"]"));
        // Strings are rendered without JSON quotes
        assert!(!out.contains("\"ops\""));
    }

    #[test]
    fn table_columns_default_to_first_record_keys() {
        let records = vec![json!({"id": 1, "name": "a"}), json!({"id": 2, "extra": true})];
        let out = OutputFormat::Table.render_list(&records, &[]).unwrap();

        assert!(out.contains("name"));
        assert!(!out.contains("extra"));
    }

    #[test]
    fn single_record_renders_attribute_table() {
        let record = json!({"id": 9, "meta": {"owner": "ops"}});
        let out = OutputFormat::Table.render_one(&record, &[]).unwrap();

        assert!(out.contains("attribute"));
        assert!(out.contains("value"));
        assert!(out.contains("{\"owner\":\"ops\"}"));
    }

    #[test]
    fn non_object_without_columns_is_an_error() {
        let err = OutputFormat::Table.render_one(&json!(3), &[]).unwrap_err();
        assert!(matches!(err, OutputError::NoColumns));
    }
}
