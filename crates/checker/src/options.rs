//! Ordered option maps for raw input and validated output.

use std::ops::Index;

use indexmap::IndexMap;
use optcheck_value::{Object, Value};
use serde::{Deserialize, Serialize};

/// An options object: raw input to [`validate`](crate::validate) and its
/// validated output, keyed by option name in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Options {
    #[serde(flatten)]
    values: IndexMap<String, Value>,
}

impl Options {
    /// Create an empty options object.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads options from a JSON object.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Options from an object value; `None` for anything else.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_object().map(|obj| {
            obj.iter()
                .map(|(k, v)| (k.to_owned(), v.clone()))
                .collect()
        })
    }

    /// Builder-style insert.
    #[must_use = "builder methods must be chained or built"]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Get a value by option key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Set the value for an option key, keeping its position if present.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Remove a value by key, returning it if it existed.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.shift_remove(key)
    }

    /// Check whether a value exists for the given key.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Iterate over all keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The number of values stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Try to get a value as a string reference.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key)?.as_str()
    }

    /// Try to get a value as f64.
    #[must_use]
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.values.get(key)?.as_f64()
    }

    /// Try to get a value as bool.
    #[must_use]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.values.get(key)?.as_bool()
    }

    /// The options as a plain object value.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.values.into_iter().collect::<Object>())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Options {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<Options> for Value {
    fn from(options: Options) -> Self {
        options.into_value()
    }
}

impl Index<&str> for Options {
    type Output = Value;

    fn index(&self, key: &str) -> &Self::Output {
        &self.values[key]
    }
}

impl<'a> IntoIterator for &'a Options {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_is_empty() {
        let opts = Options::new();
        assert!(opts.is_empty());
        assert_eq!(opts.len(), 0);
    }

    #[test]
    fn set_and_get() {
        let mut opts = Options::new();
        opts.set("name", "alice");
        opts.set("port", 8080);
        opts.set("debug", true);

        assert_eq!(opts.get_str("name"), Some("alice"));
        assert_eq!(opts.get_f64("port"), Some(8080.0));
        assert_eq!(opts.get_bool("debug"), Some(true));
        assert_eq!(opts["port"], Value::from(8080));
        assert!(opts.get("missing").is_none());
    }

    #[test]
    fn remove_keeps_remaining_order() {
        let mut opts = Options::new().with("a", 1).with("b", 2).with("c", 3);
        assert_eq!(opts.remove("b"), Some(Value::from(2)));
        assert_eq!(opts.keys().collect::<Vec<_>>(), vec!["a", "c"]);
        assert!(opts.remove("b").is_none());
    }

    #[test]
    fn overwrite_keeps_position() {
        let mut opts = Options::new().with("a", 1).with("b", 2);
        opts.set("a", 10);
        assert_eq!(
            opts.iter().collect::<Vec<_>>(),
            vec![("a", &Value::from(10)), ("b", &Value::from(2))]
        );
    }

    #[test]
    fn serde_is_a_flat_object() {
        let opts = Options::new().with("x", 1).with("tags", Value::array(["a"]));
        let json = serde_json::to_value(&opts).unwrap();
        assert_eq!(json, serde_json::json!({"x": 1, "tags": ["a"]}));

        let back = Options::from_json(r#"{"x": 1, "tags": ["a"]}"#).unwrap();
        assert_eq!(back, opts);
    }

    #[test]
    fn object_value_conversions() {
        let value = Value::object([("a", 1)]);
        let opts = Options::from_value(&value).unwrap();
        assert_eq!(opts.get_f64("a"), Some(1.0));
        assert_eq!(opts.into_value(), value);
        assert!(Options::from_value(&Value::array([1])).is_none());
        assert!(Options::from_value(&Value::Null).is_none());
    }
}
