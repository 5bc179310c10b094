//! Null-pruning request parameters.
//!
//! The Plato service distinguishes an omitted parameter from one sent with an
//! empty or placeholder value, so optional controls (page number, resize
//! width/height, tag filters) must disappear from the request entirely when
//! unset. [`RequestParams`] guarantees that no key ever maps to `null`, at any
//! nesting depth.

use serde::Serialize;
use serde_json::{Map, Value};

/// Removes every `null` entry from mappings inside `value`, recursively.
///
/// Sequences are walked so mappings nested inside them are pruned too, but
/// sequence elements themselves keep their positions.
pub fn prune(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(prune_map(map)),
        Value::Array(items) => Value::Array(items.into_iter().map(prune).collect()),
        other => other,
    }
}

fn prune_map(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (key, prune(value)))
        .collect()
}

/// Query-string or form parameter set that never holds absent values.
///
/// # Example
///
/// ```rust
/// use plato_client::params::RequestParams;
/// use serde_json::json;
///
/// let mut params = RequestParams::new()
///     .with("a", 2)
///     .with("b", None::<u32>)
///     .with("c", json!({ "d": null }));
/// assert_eq!(params.clone().into_value(), json!({ "a": 2, "c": {} }));
///
/// params.set("a", None::<u32>);
/// assert!(!params.contains_key("a"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RequestParams {
    entries: Map<String, Value>,
}

impl RequestParams {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a parameter set from a JSON mapping, dropping absent values.
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self {
            entries: prune_map(map),
        }
    }

    /// Sets a parameter and returns the updated set.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Sets a parameter.
    ///
    /// A `null` value removes the key if present and is otherwise a no-op.
    /// Returns the previous value for the key, if any.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        match prune(value.into()) {
            Value::Null => self.entries.remove(&key),
            value => self.entries.insert(key, value),
        }
    }

    /// Returns the value for a key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Removes a key, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    /// Returns true if the key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the number of top-level parameters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no parameter is set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the top-level keys.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    /// Returns the underlying mapping.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.entries
    }

    /// Converts into a JSON object.
    pub fn into_value(self) -> Value {
        Value::Object(self.entries)
    }

    /// Flattens the parameters into `(name, value)` pairs for query strings
    /// and url-encoded forms.
    ///
    /// Sequences repeat their key once per element and nested mappings use
    /// bracket notation (`outer[inner]`).
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for (key, value) in &self.entries {
            flatten_into(key, value, &mut pairs);
        }
        pairs
    }
}

fn flatten_into(name: &str, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Array(items) => {
            for item in items {
                flatten_into(name, item, pairs);
            }
        }
        Value::Object(map) => {
            for (key, nested) in map {
                flatten_into(&format!("{}[{}]", name, key), nested, pairs);
            }
        }
        Value::String(s) => pairs.push((name.to_string(), s.clone())),
        other => pairs.push((name.to_string(), other.to_string())),
    }
}

impl<K, V> FromIterator<(K, V)> for RequestParams
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = RequestParams::new();
        for (key, value) in iter {
            params.set(key, value);
        }
        params
    }
}

impl From<RequestParams> for Value {
    fn from(params: RequestParams) -> Self {
        params.into_value()
    }
}
