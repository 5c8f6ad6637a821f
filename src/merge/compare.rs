use std::cmp::Ordering;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;
use tracing::warn;

use crate::record::{Record, nested_get};

/// Field compared by [`by_id`]
pub const ID_FIELD: &str = "id";

/// Field compared by the default timestamp ordering
pub const TIMESTAMP_FIELD: &str = "created_at";

/// Ascending order on the `id` field of two records
pub fn by_id(a: &Record, b: &Record) -> bool {
    precedes_by_value(nested_get(a, ID_FIELD), nested_get(b, ID_FIELD))
}

/// Ascending order on the value found at a dotted `path`
///
/// Numbers compare numerically and strings lexically. Records missing the
/// field sort first.
pub fn ascending_by(path: &str) -> impl Fn(&Record, &Record) -> bool + Clone + Send + Sync + use<> {
    let path = path.to_string();
    move |a, b| precedes_by_value(nested_get(a, &path), nested_get(b, &path))
}

/// Ascending order on an ISO-8601 timestamp found at a dotted `path`
///
/// Timestamps are parsed to instants before comparison, so differing
/// offsets and fractional precision order correctly. Values that cannot be
/// parsed fall back to lexical comparison.
pub fn by_timestamp(path: &str) -> impl Fn(&Record, &Record) -> bool + Clone + Send + Sync + use<> {
    let path = path.to_string();
    move |a, b| {
        let (a, b) = (nested_get(a, &path), nested_get(b, &path));
        match (a.and_then(parse_instant), b.and_then(parse_instant)) {
            (Some(a), Some(b)) => a <= b,
            _ => {
                warn!(path = %path, "Unparseable timestamp, comparing lexically");
                precedes_by_value(a, b)
            }
        }
    }
}

/// Parse an ISO-8601 timestamp such as `2021-03-04T05:06:07.123456Z`
pub fn parse_instant(value: &Value) -> Option<DateTime<Utc>> {
    let raw = value.as_str()?;
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

fn precedes_by_value(a: Option<&Value>, b: Option<&Value>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => compare_values(a, b) != Ordering::Greater,
        (None, _) => true,
        (Some(_), None) => false,
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => {
                let (a, b) = (a.as_f64().unwrap_or(f64::NAN), b.as_f64().unwrap_or(f64::NAN));
                a.partial_cmp(&b).unwrap_or(Ordering::Equal)
            }
        },
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        // Mixed types: keep input order stable by treating them as equal
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::merge_sorted;
    use serde_json::json;

    #[test]
    fn merges_records_by_ascending_id() {
        let a = vec![json!({"id": 1}), json!({"id": 3}), json!({"id": 5})];
        let b = vec![json!({"id": 2}), json!({"id": 4})];

        let ids: Vec<_> = merge_sorted(a, b, by_id)
            .map(|r| r["id"].as_i64().unwrap())
            .collect();

        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn by_id_handles_string_ids() {
        assert!(by_id(&json!({"id": "a"}), &json!({"id": "b"})));
        assert!(!by_id(&json!({"id": "b"}), &json!({"id": "a"})));
    }

    #[test]
    fn ascending_by_nested_path() {
        let cmp = ascending_by("meta.seq");
        assert!(cmp(&json!({"meta": {"seq": 2}}), &json!({"meta": {"seq": 10}})));
        assert!(!cmp(&json!({"meta": {"seq": 10}}), &json!({"meta": {"seq": 2}})));
    }

    #[test]
    fn comparators_outlive_their_path_argument() {
        type Boxed = Box<dyn Fn(&Record, &Record) -> bool + Send + 'static>;

        let (by_seq, by_at): (Boxed, Boxed) = {
            let field = String::from("seq");
            let at = format!("{}.at", "meta");
            (Box::new(ascending_by(&field)), Box::new(by_timestamp(at.as_str())))
        };

        assert!(by_seq(&json!({"seq": 1}), &json!({"seq": 2})));
        assert!(by_at(
            &json!({"meta": {"at": "2021-01-01T00:00:00Z"}}),
            &json!({"meta": {"at": "2021-01-02T00:00:00Z"}})
        ));
    }

    #[test]
    fn missing_field_sorts_first() {
        assert!(by_id(&json!({}), &json!({"id": 1})));
        assert!(!by_id(&json!({"id": 1}), &json!({})));
    }

    #[test]
    fn timestamps_compare_as_instants() {
        let cmp = by_timestamp(TIMESTAMP_FIELD);
        let earlier = json!({"created_at": "2021-03-04T05:06:07.5Z"});
        let later = json!({"created_at": "2021-03-04T05:06:07.123456Z"});

        // Lexically "07.5Z" > "07.1...", but as instants 07.123456 < 07.5
        assert!(cmp(&later, &earlier));
        assert!(!cmp(&earlier, &later));
    }

    #[test]
    fn timestamps_respect_offsets() {
        let cmp = by_timestamp("ts");
        let utc = json!({"ts": "2021-01-01T10:00:00.000Z"});
        let ahead = json!({"ts": "2021-01-01T11:30:00.000+02:00"});

        assert!(cmp(&ahead, &utc));
    }

    #[test]
    fn parses_timestamp_without_zone() {
        let parsed = parse_instant(&json!("2020-06-01T12:00:00.000")).unwrap();
        assert_eq!(parsed.to_rfc3339(), "2020-06-01T12:00:00+00:00");
        assert!(parse_instant(&json!("yesterday")).is_none());
        assert!(parse_instant(&json!(42)).is_none());
    }

    #[test]
    fn merges_records_by_timestamp() {
        let a = vec![
            json!({"n": 1, "created_at": "2021-01-01T00:00:00.000Z"}),
            json!({"n": 3, "created_at": "2021-01-03T00:00:00.000Z"}),
        ];
        let b = vec![json!({"n": 2, "created_at": "2021-01-02T00:00:00.000Z"})];

        let order: Vec<_> = merge_sorted(a, b, by_timestamp(TIMESTAMP_FIELD))
            .map(|r| r["n"].as_i64().unwrap())
            .collect();

        assert_eq!(order, vec![1, 2, 3]);
    }
}
