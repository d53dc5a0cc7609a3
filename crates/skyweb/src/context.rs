//! Per-request render context handed to the templates.

use serde::Serialize;
use serde_json::{Map, Value};

/// Ordered key/value data for a single page render.
///
/// Built fresh by each hydrator and consumed by exactly one render.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RenderContext(Map<String, Value>);

impl RenderContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a serializable value under `key`.
    ///
    /// Values that fail to serialize are dropped with a warning; a page never
    /// fails because one piece of metadata could not be encoded.
    pub fn insert(&mut self, key: &str, value: impl Serialize) {
        match serde_json::to_value(value) {
            Ok(value) => {
                self.0.insert(key.to_string(), value);
            }
            Err(err) => tracing::warn!(key, error = %err, "dropping unserializable context value"),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}
