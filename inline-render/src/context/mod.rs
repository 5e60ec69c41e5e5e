//! Render contexts
//!
//! A [`Context`] is an ordered map of variable names to template values. The
//! effective context of a render call is the process-wide defaults with the
//! call's own entries layered on top.
//!
//! ```rust
//! use inline_render::Context;
//!
//! let mut defaults = Context::new();
//! defaults.insert("site", "Acme");
//! defaults.insert("year", 2024);
//!
//! let mut call = Context::new();
//! call.insert("year", 2025);
//!
//! let effective = Context::merged(&defaults, &call);
//! assert_eq!(effective.get("site").and_then(|v| v.as_str()), Some("Acme"));
//! assert_eq!(effective.get("year").and_then(|v| v.as_i64()), Some(2025));
//! ```

use std::collections::BTreeMap;

use minijinja::value::{Value, ValueKind};
use serde::Serialize;

use crate::error::RenderError;

/// Variables available to a template
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Context {
    vars: BTreeMap<String, Value>,
}

impl Context {
    /// Create an empty context
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vars: BTreeMap::new(),
        }
    }

    /// Build a context from any map-shaped serializable value
    ///
    /// Accepts `minijinja::context!` values, `serde_json` objects, maps and
    /// structs.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidContext`] if the value does not serialize
    /// to a map.
    pub fn from_serialize<S: Serialize>(value: S) -> Result<Self, RenderError> {
        let value = Value::from_serialize(value);
        if value.kind() != ValueKind::Map {
            return Err(RenderError::InvalidContext(format!(
                "expected a map, got {:?}",
                value.kind()
            )));
        }

        let mut vars = BTreeMap::new();
        for key in value.try_iter().map_err(RenderError::Runtime)? {
            let item = value.get_item(&key).map_err(RenderError::Runtime)?;
            let name = key
                .as_str()
                .map_or_else(|| key.to_string(), ToOwned::to_owned);
            vars.insert(name, item);
        }
        Ok(Self { vars })
    }

    /// Insert a variable, replacing any previous value under `key`
    pub fn insert<V: Serialize>(&mut self, key: impl Into<String>, value: V) {
        self.vars.insert(key.into(), Value::from_serialize(value));
    }

    /// Look up a variable
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.vars.get(key)
    }

    /// Number of variables
    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether the context has no variables
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Variable names in order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }

    /// Layer `call` over `defaults`; keys present in both take the call's value
    #[must_use]
    pub fn merged(defaults: &Self, call: &Self) -> Self {
        let mut vars = defaults.vars.clone();
        vars.extend(call.vars.iter().map(|(k, v)| (k.clone(), v.clone())));
        Self { vars }
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Context {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
