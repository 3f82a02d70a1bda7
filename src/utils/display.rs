use serde_json::Value;

/// Longest cell rendered in table output before it is cut with `...`.
pub const MAX_CELL_CHARS: usize = 80;

/// Render a record value as a single table cell.
///
/// Unset fields show as `-` so they stand out from empty strings; lists
/// (product codes, software) are comma separated.
pub fn cell_text(value: &Value) -> String {
    let text = match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) if items.is_empty() => "-".to_string(),
        Value::Array(items) => items
            .iter()
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    };
    truncate(text, MAX_CELL_CHARS)
}

fn truncate(text: String, max: usize) -> String {
    if text.chars().count() <= max {
        return text;
    }
    let mut cut: String = text.chars().take(max.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}
