//! Path Resolver - dotted paths into value trees
//!
//! Supports:
//! - `a.b.c` (object keys)
//! - `items.0.name` (array index as a segment)
//!
//! A numeric segment is an index only when the current value is an array;
//! against an object it is an ordinary key. JSON `null` resolves as absent.
//!
//! Does NOT support `$` roots, brackets, filters, wildcards or slices.

use serde_json::Value;

/// Walk `path` from `value`, returning a reference to the addressed value
pub fn lookup<'v>(value: &'v Value, path: &str) -> Option<&'v Value> {
    let mut current = value;

    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }

    (!current.is_null()).then_some(current)
}

/// Owned variant of [`lookup`]
pub fn resolve(value: &Value, path: &str) -> Option<Value> {
    lookup(value, path).cloned()
}

/// Best-effort string form: strings raw, scalars via display, containers as JSON
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
