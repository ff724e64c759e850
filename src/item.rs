//! The unit of data flowing through a pipeline

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A payload plus a bag of metadata
///
/// Stages never mutate an item in place behind the pipeline's back: an
/// action takes ownership of its input and emits whatever it derives from it.
///
/// # Example
/// ```
/// use itemflow::Item;
/// use serde_json::json;
///
/// let item = Item::new(json!({"id": "a1", "type": "dashboard"}))
///     .with_meta("origin", "import");
///
/// assert_eq!(item.meta_str("origin"), Some("import"));
/// assert_eq!(item.pointer("/type"), Some(&json!("dashboard")));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// The record itself
    pub data: Value,
    /// Free-form metadata attached by sources and actions
    #[serde(default)]
    pub meta: Map<String, Value>,
}

impl Item {
    /// Create an item with empty metadata
    pub fn new(data: Value) -> Self {
        Self {
            data,
            meta: Map::new(),
        }
    }

    /// Builder-style metadata insert
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    /// Metadata value as a string, if present and a string
    pub fn meta_str(&self, key: &str) -> Option<&str> {
        self.meta.get(key).and_then(|v| v.as_str())
    }

    /// Look up a value in the payload by JSON pointer (`/a/b/0`)
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        self.data.pointer(pointer)
    }
}

impl From<Value> for Item {
    fn from(data: Value) -> Self {
        Self::new(data)
    }
}
