use serde_json::Value;

use crate::models::Record;

/// Raw EC2 values and what the aggregator expects instead.
pub const NORMALIZED_VALUES: &[(&str, &str)] = &[
    // image_os_type
    ("Linux/UNIX", "linux"),
    ("Windows", "windows"),
    // image_architecture
    ("i386", "i686"),
];

/// Map a single value through [`NORMALIZED_VALUES`]; anything else is
/// returned unchanged.
pub fn normalize_value(value: Value) -> Value {
    match value {
        Value::String(s) => match NORMALIZED_VALUES.iter().find(|(raw, _)| *raw == s) {
            Some((_, normalized)) => Value::String((*normalized).to_string()),
            None => Value::String(s),
        },
        other => other,
    }
}

/// Apply [`normalize_value`] to every value of the record.
pub fn normalize_record(record: Record) -> Record {
    record
        .into_iter()
        .map(|(k, v)| (k, normalize_value(v)))
        .collect()
}
