use std::collections::HashMap;

pub use serde_json::Value;

pub type ValueMap = HashMap<String, Value>;

/// Textual form used by every string-based getter.
///
/// Strings pass through untouched, null renders empty, arrays render as
/// comma-joined items so they split back cleanly, and objects render as
/// compact JSON.
pub fn render_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::Array(items) => items
            .iter()
            .map(render_text)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}

/// Flattens nested objects into dot-separated keys. Arrays and scalars are
/// kept as leaf values; empty objects are kept as-is.
pub fn flatten_into(prefix: &str, value: Value, out: &mut ValueMap) {
    match value {
        Value::Object(object) if !object.is_empty() => {
            for (key, nested) in object {
                let path = if prefix.is_empty() {
                    key
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_into(&path, nested, out);
            }
        }
        leaf => {
            out.insert(prefix.to_owned(), leaf);
        }
    }
}
