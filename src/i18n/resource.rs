//! Resource Blobs
//!
//! A resource blob is the parsed content of one `<language>/<group>.json`
//! file: a nested mapping whose leaves are strings. Array elements are
//! addressed by index. Blobs are immutable once loaded and cheap to clone.

use crate::error::{Error, Result};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Immutable nested key-value document for one language/group pair
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceBlob(Arc<Map<String, Value>>);

impl ResourceBlob {
    /// Create an empty blob (every lookup misses)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a blob from a JSON value, which must be an object
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(Arc::new(map))),
            other => Err(Error::Invalid {
                message: format!("resource root must be an object, got {}", kind_of(&other)),
            }),
        }
    }

    /// Parse a blob from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Walk a dot-delimited key through the nested mappings.
    ///
    /// Each segment must name an entry of the current mapping, or the
    /// canonical index (`0`, `1`, ...) of an array element; any miss, or an
    /// attempt to descend into a scalar, fails the whole lookup.
    pub fn lookup(&self, key: &str) -> Option<&Value> {
        let mut segments = key.split('.');
        let first = segments.next()?;
        let mut value = self.0.get(first)?;
        for segment in segments {
            value = child(value, segment)?;
        }
        Some(value)
    }

    /// Look up a key and return it only if it is a string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.lookup(key).and_then(Value::as_str)
    }

    /// Number of top-level entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the blob has no entries
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every dotted key that resolves to a string, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        collect_keys(&self.0, None, &mut keys);
        keys.sort_unstable();
        keys
    }

    /// Keys of `reference` that do not resolve to a string in this blob, sorted
    pub fn missing_keys(&self, reference: &ResourceBlob) -> Vec<String> {
        reference
            .keys()
            .into_iter()
            .filter(|key| self.get_str(key).is_none())
            .collect()
    }

    /// Borrow the underlying mapping
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for ResourceBlob {
    fn from(map: Map<String, Value>) -> Self {
        Self(Arc::new(map))
    }
}

fn child<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => {
            let index: usize = segment.parse().ok()?;
            // "01" or "+1" do not name an element
            if index.to_string() != segment {
                return None;
            }
            items.get(index)
        }
        _ => None,
    }
}

fn collect_keys(map: &Map<String, Value>, prefix: Option<&str>, out: &mut Vec<String>) {
    for (name, value) in map {
        collect_value(value, join_path(prefix, name), out);
    }
}

fn collect_value(value: &Value, path: String, out: &mut Vec<String>) {
    match value {
        Value::String(_) => out.push(path),
        Value::Object(nested) => collect_keys(nested, Some(&path), out),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                collect_value(item, join_path(Some(&path), &index.to_string()), out);
            }
        }
        _ => {}
    }
}

fn join_path(prefix: Option<&str>, name: &str) -> String {
    match prefix {
        Some(prefix) => format!("{prefix}.{name}"),
        None => name.to_string(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nested() -> ResourceBlob {
        ResourceBlob::from_value(json!({
            "a": { "b": { "c": "x" } },
            "title": "Hello",
            "count": 3,
            "list": ["one"]
        }))
        .expect("object")
    }

    #[test]
    fn test_lookup_walks_segments() {
        let blob = nested();
        assert_eq!(blob.lookup("a.b.c"), Some(&json!("x")));
        assert_eq!(blob.lookup("a.b"), Some(&json!({ "c": "x" })));
        assert_eq!(blob.get_str("title"), Some("Hello"));
    }

    #[test]
    fn test_lookup_has_no_partial_matches() {
        let blob = nested();
        assert_eq!(blob.lookup("a.b.c.d"), None);
        assert_eq!(blob.lookup("a.x.c"), None);
        assert_eq!(blob.lookup("title.more"), None);
        assert_eq!(blob.lookup("missing"), None);
        assert_eq!(blob.get_str("a.b"), None);
    }

    #[test]
    fn test_lookup_indexes_arrays() {
        let blob = ResourceBlob::from_value(json!({
            "list": ["one", "two", { "deep": "three" }]
        }))
        .expect("object");

        assert_eq!(blob.get_str("list.0"), Some("one"));
        assert_eq!(blob.get_str("list.1"), Some("two"));
        assert_eq!(blob.get_str("list.2.deep"), Some("three"));
        assert_eq!(blob.lookup("list.3"), None);
        assert_eq!(blob.lookup("list.01"), None);
        assert_eq!(blob.lookup("list.+1"), None);
        assert_eq!(blob.lookup("list.first"), None);
    }

    #[test]
    fn test_root_must_be_object() {
        assert!(ResourceBlob::from_json_str("[1, 2]").is_err());
        assert!(ResourceBlob::from_json_str("\"text\"").is_err());
        assert!(ResourceBlob::from_json_str("{ broken").is_err());
        assert!(ResourceBlob::from_json_str("{}").expect("object").is_empty());
    }

    #[test]
    fn test_keys_lists_string_leaves() {
        let blob = nested();
        assert_eq!(
            blob.keys(),
            vec!["a.b.c".to_string(), "list.0".to_string(), "title".to_string()]
        );
    }

    #[test]
    fn test_missing_keys_against_reference() {
        let reference = nested();
        let partial = ResourceBlob::from_value(json!({ "title": "Bonjour", "a": { "b": {} } }))
            .expect("object");
        assert_eq!(
            partial.missing_keys(&reference),
            vec!["a.b.c".to_string(), "list.0".to_string()]
        );
        assert!(reference.missing_keys(&partial).is_empty());
    }

    #[test]
    fn test_empty_blob() {
        let blob = ResourceBlob::empty();
        assert!(blob.is_empty());
        assert_eq!(blob.len(), 0);
        assert_eq!(blob.lookup("anything"), None);
        assert!(blob.keys().is_empty());
    }
}
