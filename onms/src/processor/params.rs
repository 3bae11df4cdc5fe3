//! Compiled request parameters.

use indexmap::IndexMap;
use serde::Serialize;

/// A parameter value: one string, or several for a repeated key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Single(String),
    Multi(Vec<String>),
}

impl ParamValue {
    pub fn values(&self) -> &[String] {
        match self {
            ParamValue::Single(value) => std::slice::from_ref(value),
            ParamValue::Multi(values) => values,
        }
    }

    pub fn as_single(&self) -> Option<&str> {
        match self {
            ParamValue::Single(value) => Some(value),
            ParamValue::Multi(_) => None,
        }
    }

    fn push(&mut self, value: String) {
        match self {
            ParamValue::Single(existing) => {
                let first = std::mem::take(existing);
                *self = ParamValue::Multi(vec![first, value]);
            }
            ParamValue::Multi(values) => values.push(value),
        }
    }
}

/// Ordered parameter map, in emission order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Params(IndexMap<String, ParamValue>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, replacing any previous value.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.0.insert(key.to_string(), ParamValue::Single(value.into()));
    }

    /// Add a value for `key`; repeated keys accumulate into a list.
    pub fn append(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.0.get_mut(key) {
            Some(existing) => existing.push(value),
            None => {
                self.0.insert(key.to_string(), ParamValue::Single(value));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    /// The value of a single-valued key.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(ParamValue::as_single)
    }

    /// Every value of `key`, in insertion order.
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.0
            .get(key)
            .map(|v| v.values().iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Flatten into `(key, value)` pairs, repeating keys with several values.
    pub fn query_pairs(&self) -> Vec<(&str, &str)> {
        self.iter()
            .flat_map(|(key, value)| value.values().iter().map(move |v| (key, v.as_str())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_accumulates() {
        let mut params = Params::new();
        params.append("node.label", "a");
        assert_eq!(params.get_str("node.label"), Some("a"));

        params.append("node.label", "b");
        params.append("node.label", "c");
        assert_eq!(params.get_str("node.label"), None);
        assert_eq!(params.get_all("node.label"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_set_replaces() {
        let mut params = Params::new();
        params.append("limit", "1");
        params.append("limit", "2");
        params.set("limit", "3");
        assert_eq!(params.get("limit"), Some(&ParamValue::Single("3".to_string())));
    }

    #[test]
    fn test_query_pairs_keep_order() {
        let mut params = Params::new();
        params.set("limit", "10");
        params.append("orderBy", "id");
        params.append("orderBy", "uei");
        params.set("order", "DESC");
        assert_eq!(
            params.query_pairs(),
            vec![("limit", "10"), ("orderBy", "id"), ("orderBy", "uei"), ("order", "DESC")]
        );
    }

    #[test]
    fn test_serializes_as_json_object() {
        let mut params = Params::new();
        params.set("limit", "10");
        params.append("id", "1");
        params.append("id", "2");
        let json = serde_json::to_string(&params).unwrap();
        assert_eq!(json, r#"{"limit":"10","id":["1","2"]}"#);
    }
}
