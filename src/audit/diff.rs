//! Diff generation for audit logging

use serde_json::Value;

/// Generate a human-readable diff between two JSON values
///
/// Only top-level field changes are reported.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    match (before, after) {
        (Value::Object(before_obj), Value::Object(after_obj)) => {
            let mut changes = Vec::new();

            for (key, before_val) in before_obj {
                match after_obj.get(key) {
                    Some(after_val) if before_val != after_val => changes.push(format!(
                        "{}: {} -> {}",
                        key,
                        format_value(before_val),
                        format_value(after_val)
                    )),
                    Some(_) => {}
                    None => changes.push(format!(
                        "{}: {} -> (removed)",
                        key,
                        format_value(before_val)
                    )),
                }
            }

            for (key, after_val) in after_obj {
                if !before_obj.contains_key(key) {
                    changes.push(format!("{}: (added) -> {}", key, format_value(after_val)));
                }
            }

            if changes.is_empty() {
                None
            } else {
                Some(changes.join(", "))
            }
        }
        _ if before != after => Some(format!(
            "{} -> {}",
            format_value(before),
            format_value(after)
        )),
        _ => None,
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) if s.chars().count() > 50 => {
            let truncated: String = s.chars().take(47).collect();
            format!("\"{}...\"", truncated)
        }
        Value::String(s) => format!("\"{}\"", s),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}
