//! Namespaced names and the namespace descriptor.
//!
//! Every extension kind has a short prefix (`"se"`, `"hlf-hi"`). Attribute,
//! class, event, and CSS custom-property names are derived from it with the
//! pure functions below, which [`Namespace`] and instances expose as methods.

use std::fmt;

use serde_json::{Map, Value};

/// `data-<prefix>-<base>`, or `data-<prefix>` for an empty base.
pub fn attr_name(prefix: &str, base: &str) -> String {
    if base.is_empty() {
        format!("data-{prefix}")
    } else {
        format!("data-{prefix}-{base}")
    }
}

/// `js-<prefix>-<base>`, or `js-<prefix>` for an empty base.
pub fn class_name(prefix: &str, base: &str) -> String {
    if base.is_empty() {
        format!("js-{prefix}")
    } else {
        format!("js-{prefix}-{base}")
    }
}

/// `<prefix><base>` with no separator, hyphens dropped, lowercased.
pub fn event_name(prefix: &str, base: &str) -> String {
    let mut name: String = prefix.chars().filter(|&c| c != '-').collect();
    name.push_str(base);
    name.to_lowercase()
}

/// `--<prefix>-<base>`.
pub fn var_name(prefix: &str, base: &str) -> String {
    format!("--{prefix}-{base}")
}

// ---------------------------------------------------------------------------
// Namespace
// ---------------------------------------------------------------------------

/// Static metadata for one extension kind: prefix, debug flag, default options.
///
/// Immutable once an extension is built from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Namespace {
    name: String,
    debug: bool,
    defaults: Value,
}

impl Namespace {
    /// A namespace with the given prefix, debugging off and empty defaults.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            debug: false,
            defaults: Value::Object(Map::new()),
        }
    }

    /// Enable or disable debug logging (builder).
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set the default options (builder). Non-object values are replaced by
    /// an empty object.
    pub fn with_defaults(mut self, defaults: Value) -> Self {
        if defaults.is_object() {
            self.defaults = defaults;
        } else {
            tracing::warn!(namespace = %self.name, defaults = %defaults, "defaults must be an object, using an empty one");
            self.defaults = Value::Object(Map::new());
        }
        self
    }

    /// The prefix.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether debug logging is enabled.
    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Default options, always a JSON object.
    pub fn defaults(&self) -> &Value {
        &self.defaults
    }

    pub fn attr_name(&self, base: &str) -> String {
        attr_name(&self.name, base)
    }

    pub fn class_name(&self, base: &str) -> String {
        class_name(&self.name, base)
    }

    pub fn event_name(&self, base: &str) -> String {
        event_name(&self.name, base)
    }

    pub fn var_name(&self, base: &str) -> String {
        var_name(&self.name, base)
    }

    /// Class added to every instance's root element (`js-<prefix>`).
    pub fn main_class(&self) -> String {
        self.class_name("")
    }

    /// Attribute holding the registry id (`data-<prefix>-instance-id`).
    pub fn instance_id_attr(&self) -> String {
        self.attr_name("instance-id")
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn derived_names() {
        let ns = Namespace::new("se");
        assert_eq!(ns.attr_name("some-attribute"), "data-se-some-attribute");
        assert_eq!(ns.class_name("some-class"), "js-se-some-class");
        assert_eq!(ns.event_name("someevent"), "sesomeevent");
        assert_eq!(ns.var_name("some-var"), "--se-some-var");
    }

    #[test]
    fn empty_base() {
        let ns = Namespace::new("se");
        assert_eq!(ns.attr_name(""), "data-se");
        assert_eq!(ns.main_class(), "js-se");
        assert_eq!(ns.instance_id_attr(), "data-se-instance-id");
    }

    #[test]
    fn hyphenated_prefix() {
        assert_eq!(attr_name("hlf-hi", "x"), "data-hlf-hi-x");
        assert_eq!(event_name("hlf-hi", "enter"), "hlfhienter");
        assert_eq!(event_name("se", "someEvent"), "sesomeevent");
    }

    #[test]
    fn free_functions_match_methods() {
        let ns = Namespace::new("ab");
        assert_eq!(ns.attr_name("q"), attr_name("ab", "q"));
        assert_eq!(ns.class_name("q"), class_name("ab", "q"));
        assert_eq!(ns.event_name("q"), event_name("ab", "q"));
        assert_eq!(ns.var_name("q"), var_name("ab", "q"));
    }

    #[test]
    fn defaults_must_be_object() {
        let ns = Namespace::new("se").with_defaults(json!([1, 2]));
        assert_eq!(ns.defaults(), &json!({}));
        let ns = Namespace::new("se").with_defaults(json!({ "a": 1 }));
        assert_eq!(ns.defaults(), &json!({ "a": 1 }));
    }

    #[test]
    fn display_is_prefix() {
        assert_eq!(Namespace::new("se").with_debug(true).to_string(), "se");
    }
}
