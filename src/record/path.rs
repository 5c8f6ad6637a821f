use serde_json::{Map, Value};

/// A caller-defined record, typically one JSON object per operation
pub type Record = Value;

/// Resolve a dotted `path` such as `meta.owner.name` against a record
///
/// Returns `None` as soon as a segment is missing or the value at that point
/// is not an object.
pub fn nested_get<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(record, |current, segment| current.as_object()?.get(segment))
}

/// Set `value` at a dotted `path`, creating intermediate objects as needed
///
/// Any non-object value found along the path is replaced by an object.
pub fn nested_set(record: &mut Value, path: &str, value: Value) {
    let mut segments = path.split('.').peekable();
    let mut current = record;

    while let Some(segment) = segments.next() {
        let map = ensure_object(current);
        if segments.peek().is_none() {
            map.insert(segment.to_string(), value);
            return;
        }
        current = map
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
}

/// Recursively merge `patch` into `target`
///
/// Objects merge key by key; any other value in `patch` replaces the one in
/// `target`.
pub fn deep_merge(target: &mut Value, patch: &Value) {
    match (target, patch) {
        (Value::Object(target), Value::Object(patch)) => {
            for (key, value) in patch {
                match target.get_mut(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        target.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (target, patch) => *target = patch.clone(),
    }
}

fn ensure_object(value: &mut Value) -> &mut Map<String, Value> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => map,
        _ => unreachable!("value was just replaced by an object"),
    }
}
