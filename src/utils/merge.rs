use serde::Serialize;
use serde_json::Value;

use crate::models::Record;

/// A record with every key set to `null`.
pub fn blank_record(keys: &[&str]) -> Record {
    keys.iter().map(|k| (k.to_string(), Value::Null)).collect()
}

/// Overlay `other` onto `record`; keys in `other` win.
pub fn merge_into(record: &mut Record, other: &Record) {
    for (k, v) in other {
        record.insert(k.clone(), v.clone());
    }
}

/// Serialize a struct and overlay its top-level fields onto `record`.
/// Anything that does not serialize to a JSON object is ignored.
pub fn merge_serialized<T: Serialize>(record: &mut Record, item: &T) {
    if let Ok(Value::Object(map)) = serde_json::to_value(item) {
        record.extend(map);
    }
}

/// Turn an optional string into a JSON value (`None` becomes `null`).
pub fn opt_str(value: Option<&str>) -> Value {
    value.map(|s| Value::String(s.to_string())).unwrap_or(Value::Null)
}
