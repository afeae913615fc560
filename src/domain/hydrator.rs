// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reconciles a persisted document back into the live tree.
//!
//! The document is flattened into `(dot.path, value)` pairs in document order and
//! each pair is written straight into the matching leaf's `value`, creating the leaf
//! if the schema does not know it yet. Arrays are opaque and never traversed; the
//! connection list is read separately by [`extract_connections`].

use crate::domain::config_path::ConfigPath;
use crate::domain::tree::SchemaTree;
use serde_json::{Map, Value};

/// An opaque connection record.
pub type Connection = Map<String, Value>;

/// Flattens every scalar member of `document` into dot-path/value pairs.
///
/// Nested object keys are prefixed with their parent path. Array members are
/// skipped. A non-object document yields nothing.
///
/// # Examples
///
/// ```
/// use formcfg::domain::hydrator::flatten;
/// use serde_json::json;
///
/// let pairs = flatten(&json!({"general": {"port": 9999}, "connections": [{}]}));
/// assert_eq!(pairs, vec![("general.port".to_string(), json!(9999))]);
/// ```
pub fn flatten(document: &Value) -> Vec<(String, Value)> {
    let mut out = Vec::new();
    if let Value::Object(map) = document {
        flatten_into(map, "", &mut out);
    }
    out
}

fn flatten_into(map: &Map<String, Value>, prefix: &str, out: &mut Vec<(String, Value)>) {
    for (key, value) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            Value::Object(child) => flatten_into(child, &path, out),
            Value::Array(_) => {}
            scalar => out.push((path, scalar.clone())),
        }
    }
}

/// Replays the document's values into `tree`.
///
/// Each value is assigned directly to the resolved leaf's `value` (`null` clears
/// it). Returns the number of leaves whose value changed.
pub fn hydrate(tree: &mut SchemaTree, document: &Value) -> usize {
    let mut changed = 0;
    for (path, value) in flatten(document) {
        let id = tree.resolve(&ConfigPath::from(path));
        let value = Some(value).filter(|v| !v.is_null());
        if let Some(el) = tree.leaf_mut(id) {
            if el.value != value {
                el.value = value;
                changed += 1;
            }
        }
    }
    changed
}

/// Reads the connection list stored under `key`.
///
/// Non-object entries are dropped; a missing or non-array member yields an empty
/// list.
pub fn extract_connections(document: &Value, key: &str) -> Vec<Connection> {
    match document.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_object().cloned())
            .collect(),
        _ => Vec::new(),
    }
}
