//! Record helpers
//!
//! Extracting records from API responses, adding display fields, and reading
//! values by dot-notation path.

use super::registry::ResourceDef;
use chrono::DateTime;
use serde_json::Value;

/// Fallback locations of the record list when a collection response is an object
const FALLBACK_RESPONSE_PATHS: &[&str] = &["items", "@graph"];

/// Extract records from a collection response
///
/// A bare array is used as-is; an object is searched at the resource's
/// `response_path` first, then at the common fallbacks.
pub fn extract_records(response: &Value, resource_def: &ResourceDef) -> Vec<Value> {
    let raw_items = if let Some(arr) = response.as_array() {
        arr.clone()
    } else {
        let mut paths = Vec::with_capacity(FALLBACK_RESPONSE_PATHS.len() + 1);
        if !resource_def.response_path.is_empty() {
            paths.push(resource_def.response_path.as_str());
        }
        paths.extend(FALLBACK_RESPONSE_PATHS.iter().copied());

        paths
            .into_iter()
            .find_map(|path| lookup_json_value(response, path).and_then(|v| v.as_array()))
            .cloned()
            .unwrap_or_default()
    };

    raw_items.into_iter().map(post_process_record).collect()
}

/// Post-process a record to add computed display fields
pub fn post_process_record(mut item: Value) -> Value {
    if let Value::Object(ref mut map) = item {
        let mut derived = Vec::new();

        for (key, value) in map.iter() {
            // Lists of scalars (aliases, dbxref, ...) are joined for display
            if let Some(arr) = value.as_array() {
                let parts: Vec<String> = arr
                    .iter()
                    .filter_map(|v| match v {
                        Value::String(s) => Some(s.clone()),
                        Value::Number(n) => Some(n.to_string()),
                        Value::Bool(b) => Some(b.to_string()),
                        _ => None,
                    })
                    .collect();
                if parts.len() == arr.len() {
                    derived.push((format!("{}_display", key), parts.join(", ")));
                }
            }
        }

        if let Some(created) = map.get("date_created").and_then(|v| v.as_str()) {
            derived.push(("date_created_short".to_string(), format_timestamp_short(created)));
        }

        for (key, value) in derived {
            map.insert(key, Value::String(value));
        }
    }

    item
}

/// Format a timestamp to its date part
fn format_timestamp_short(timestamp: &str) -> String {
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(dt) => dt.format("%Y-%m-%d").to_string(),
        Err(_) => timestamp.to_string(),
    }
}

/// Look up a value using a dot-notation path (array indices allowed)
pub fn lookup_json_value<'a>(item: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = item;

    for part in path.split('.') {
        current = if let Ok(idx) = part.parse::<usize>() {
            current.get(idx).or_else(|| current.get(part))?
        } else {
            current.get(part)?
        };
    }

    Some(current)
}

/// Extract a value from JSON using a dot-notation path, `-` when absent
pub fn extract_json_value(item: &Value, path: &str) -> String {
    match lookup_json_value(item, path) {
        Some(value) => display_value(value),
        None => "-".to_string(),
    }
}

/// Read a scalar identifier (string or number) at `path`
pub fn extract_id(item: &Value, path: &str) -> Option<String> {
    match lookup_json_value(item, path)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(_) => "[object]".to_string(),
    }
}
