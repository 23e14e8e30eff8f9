//! Option resolution: defaults, element-embedded JSON, call-site overrides.
//!
//! Options are a single JSON object per instance. The compacted read view
//! (`Instance::prop`) looks keys up in it rather than duplicating them.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::ExtensionError;

/// The value that resets an option to its namespace default in `configure`.
pub const DEFAULT_SENTINEL: &str = "default";

/// Recursively merge `source` into `target`.
///
/// Objects merge key-wise; any other value overwrites.
pub fn deep_merge(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Object(target), Value::Object(source)) => {
            for (key, value) in source {
                match target.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (target, source) => *target = source,
    }
}

/// Parse element-embedded configuration. Malformed or non-object JSON is
/// logged and treated as no override.
pub fn parse_embedded(text: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Some(map),
        Ok(other) => {
            tracing::warn!(value = %other, "embedded options are not an object, ignoring");
            None
        }
        Err(err) => {
            tracing::warn!(error = %err, "malformed embedded options, ignoring");
            None
        }
    }
}

/// A resolved option set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Options(Map<String, Value>);

impl Options {
    /// Merge, in order: a deep copy of `defaults`, the embedded JSON (if
    /// any), then the call-site options (if any).
    pub fn resolve(defaults: &Value, embedded: Option<&str>, call: Option<&Value>) -> Self {
        let mut merged = match defaults {
            Value::Object(_) => defaults.clone(),
            _ => Value::Object(Map::new()),
        };
        if let Some(map) = embedded.and_then(parse_embedded) {
            deep_merge(&mut merged, Value::Object(map));
        }
        match call {
            Some(Value::Object(map)) => deep_merge(&mut merged, Value::Object(map.clone())),
            Some(Value::Null) | None => {}
            Some(other) => {
                tracing::warn!(value = %other, "call options are not an object, ignoring");
            }
        }
        match merged {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    /// Apply a partial update. Each top-level key either resets to a deep
    /// copy of its default (value `"default"`) or deep-merges into the
    /// current value. Unmentioned keys are untouched.
    ///
    /// Returns the keys that were touched.
    pub fn configure(&mut self, defaults: &Value, partial: Value) -> Result<Vec<String>, ExtensionError> {
        let partial = match partial {
            Value::Object(map) => map,
            other => {
                return Err(ExtensionError::InvalidOptions(format!(
                    "configure expects an object, got {other}"
                )))
            }
        };
        let mut touched = Vec::with_capacity(partial.len());
        for (key, value) in partial {
            if value.as_str() == Some(DEFAULT_SENTINEL) {
                match defaults.get(&key) {
                    Some(default) => {
                        self.0.insert(key.clone(), default.clone());
                    }
                    None => {
                        self.0.remove(&key);
                    }
                }
            } else {
                match self.0.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        self.0.insert(key.clone(), value);
                    }
                }
            }
            touched.push(key);
        }
        Ok(touched)
    }

    /// Top-level option value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Top-level option deserialized into `T`. `None` if missing or of the
    /// wrong shape.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.0
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// The whole option set deserialized into `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, ExtensionError> {
        serde_json::from_value(Value::Object(self.0.clone()))
            .map_err(|err| ExtensionError::InvalidOptions(err.to_string()))
    }

    /// Set a top-level option.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Whether the key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Top-level keys.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// The underlying map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// The options as a JSON object value.
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn deep_merge_objects_merge_keywise() {
        let mut target = json!({ "a": { "x": 1, "y": 2 }, "b": 1 });
        deep_merge(&mut target, json!({ "a": { "y": 3, "z": 4 }, "c": true }));
        assert_eq!(target, json!({ "a": { "x": 1, "y": 3, "z": 4 }, "b": 1, "c": true }));
    }

    #[test]
    fn deep_merge_non_objects_overwrite() {
        let mut target = json!({ "a": { "x": 1 }, "b": [1, 2] });
        deep_merge(&mut target, json!({ "a": "flat", "b": [3] }));
        assert_eq!(target, json!({ "a": "flat", "b": [3] }));
    }

    #[test]
    fn resolve_order() {
        let defaults = json!({ "interval": 300, "nested": { "a": 1, "b": 1 } });
        let options = Options::resolve(
            &defaults,
            Some(r#"{ "interval": 100, "nested": { "b": 2 } }"#),
            Some(&json!({ "nested": { "c": 3 } })),
        );
        assert_eq!(
            options.to_value(),
            json!({ "interval": 100, "nested": { "a": 1, "b": 2, "c": 3 } })
        );
        // Defaults are deep-copied, never mutated.
        assert_eq!(defaults, json!({ "interval": 300, "nested": { "a": 1, "b": 1 } }));
    }

    #[test]
    fn resolve_call_options_win_over_embedded() {
        let options = Options::resolve(
            &json!({}),
            Some(r#"{ "someOption": "embedded" }"#),
            Some(&json!({ "someOption": "call" })),
        );
        assert_eq!(options.get("someOption"), Some(&json!("call")));
    }

    #[test]
    fn malformed_embedded_json_is_ignored() {
        let options = Options::resolve(&json!({ "a": 1 }), Some("{not json"), None);
        assert_eq!(options.to_value(), json!({ "a": 1 }));
        let options = Options::resolve(&json!({ "a": 1 }), Some("[1, 2]"), None);
        assert_eq!(options.to_value(), json!({ "a": 1 }));
    }

    #[test]
    fn configure_merges_and_resets() {
        let defaults = json!({ "classNames": {}, "selectors": {} });
        let mut options = Options::resolve(&defaults, None, None);
        options
            .configure(&defaults, json!({ "selectors": { "someElement": ".foo" } }))
            .unwrap();
        assert_eq!(options.get("selectors"), Some(&json!({ "someElement": ".foo" })));
        options
            .configure(&defaults, json!({ "selectors": { "other": ".bar" } }))
            .unwrap();
        assert_eq!(
            options.get("selectors"),
            Some(&json!({ "someElement": ".foo", "other": ".bar" }))
        );
        let touched = options.configure(&defaults, json!({ "selectors": "default" })).unwrap();
        assert_eq!(touched, vec!["selectors".to_string()]);
        assert_eq!(options.get("selectors"), Some(&json!({})));
        assert_eq!(options.get("classNames"), Some(&json!({})));
    }

    #[test]
    fn configure_default_without_default_removes_key() {
        let defaults = json!({});
        let mut options = Options::resolve(&defaults, None, Some(&json!({ "extra": 1 })));
        options.configure(&defaults, json!({ "extra": "default" })).unwrap();
        assert!(!options.contains_key("extra"));
    }

    #[test]
    fn configure_rejects_non_object() {
        let mut options = Options::default();
        assert!(matches!(
            options.configure(&json!({}), json!("default")),
            Err(ExtensionError::InvalidOptions(_))
        ));
    }

    #[test]
    fn typed_access() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Timing {
            interval: u64,
            sensitivity: f64,
        }
        let options = Options::resolve(&json!({ "interval": 300, "sensitivity": 2 }), None, None);
        assert_eq!(options.get_as::<u64>("interval"), Some(300));
        assert_eq!(options.get_as::<String>("interval"), None);
        assert_eq!(
            options.deserialize::<Timing>().unwrap(),
            Timing { interval: 300, sensitivity: 2.0 }
        );
    }
}
