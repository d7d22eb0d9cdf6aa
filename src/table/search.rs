//! Free-text search over rows.
//!
//! Rows are projected to a single searchable string and matched with a
//! case-insensitive substring test. [`all_fields`] reproduces the dashboard's
//! "stringify every field" behaviour: it matches fields that are never shown
//! as columns (internal ids included) and coerces numbers and flags to text.

use serde::Serialize;
use serde_json::Value;

/// Projects a row to the text searched by the table.
pub type SearchProjection<T> = Box<dyn Fn(&T) -> String>;

/// Separator between projected fields so a match never spans two fields.
const FIELD_SEPARATOR: char = '\u{1f}';

/// Project every field of a row through its serde representation.
///
/// Nested objects and arrays contribute their leaf values. `null` fields
/// contribute nothing.
pub fn all_fields<T: Serialize>(row: &T) -> String {
    match serde_json::to_value(row) {
        Ok(value) => {
            let mut out = String::new();
            collect_leaves(&value, &mut out);
            out
        }
        Err(_) => String::new(),
    }
}

fn collect_leaves(value: &Value, out: &mut String) {
    match value {
        Value::Null => {}
        Value::Bool(b) => push_field(out, &b.to_string()),
        Value::Number(n) => push_field(out, &n.to_string()),
        Value::String(s) => push_field(out, s),
        Value::Array(items) => items.iter().for_each(|v| collect_leaves(v, out)),
        Value::Object(map) => map.values().for_each(|v| collect_leaves(v, out)),
    }
}

fn push_field(out: &mut String, field: &str) {
    if !out.is_empty() {
        out.push(FIELD_SEPARATOR);
    }
    out.push_str(field);
}

/// Case-insensitive substring test. An empty query matches everything.
pub fn matches(haystack: &str, query: &str) -> bool {
    query.is_empty() || haystack.to_lowercase().contains(&query.to_lowercase())
}

/// Indices of the rows whose projection matches the query, in input order.
pub fn filter_indices<T>(rows: &[T], query: &str, projection: &dyn Fn(&T) -> String) -> Vec<usize> {
    if query.is_empty() {
        return (0..rows.len()).collect();
    }
    let needle = query.to_lowercase();
    rows.iter()
        .enumerate()
        .filter(|(_, row)| projection(row).to_lowercase().contains(&needle))
        .map(|(i, _)| i)
        .collect()
}
