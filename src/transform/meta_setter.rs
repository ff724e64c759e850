//! Metadata setter action
//!
//! Tags every item with a fixed metadata value.

use crate::etl::{Action, Emitted, stream};
use crate::item::Item;
use eyre::Result;
use serde_json::Value;

/// Action that sets a metadata key on every item
///
/// Setting `Value::Null` removes the key instead.
///
/// # Example
/// ```
/// use itemflow::transform::MetaSetter;
/// use itemflow::etl::Action;
/// use itemflow::Item;
/// use serde_json::json;
///
/// let mut setter = MetaSetter::new("origin", "import");
/// let output = setter.apply(Item::new(json!({"id": "a"}))).unwrap().next().unwrap().unwrap();
/// assert_eq!(output.meta_str("origin"), Some("import"));
/// ```
#[derive(Debug, Clone)]
pub struct MetaSetter {
    key: String,
    value: Value,
}

impl MetaSetter {
    /// Create a new metadata setter
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl Action for MetaSetter {
    fn reset(&mut self) {}

    fn apply(&mut self, mut item: Item) -> Result<Emitted> {
        if self.value.is_null() {
            item.meta.remove(&self.key);
        } else {
            item.meta.insert(self.key.clone(), self.value.clone());
        }
        Ok(stream::once(item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(setter: &mut MetaSetter, item: Item) -> Item {
        setter.apply(item).unwrap().next().unwrap().unwrap()
    }

    #[test]
    fn test_sets_meta() {
        let mut setter = MetaSetter::new("managed", true);
        let output = run(&mut setter, Item::new(json!({"id": "test"})));

        assert_eq!(output.meta["managed"], json!(true));
        assert_eq!(output.data, json!({"id": "test"}));
    }

    #[test]
    fn test_overwrites_existing_value() {
        let mut setter = MetaSetter::new("managed", true);
        let output = run(
            &mut setter,
            Item::new(json!({})).with_meta("managed", false),
        );
        assert_eq!(output.meta["managed"], json!(true));
    }

    #[test]
    fn test_null_removes_key() {
        let mut setter = MetaSetter::new("managed", Value::Null);
        let output = run(
            &mut setter,
            Item::new(json!({})).with_meta("managed", true),
        );
        assert!(output.meta.get("managed").is_none());
    }
}
