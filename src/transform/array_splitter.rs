//! One-to-many splitting of array fields

use crate::etl::{Action, Emitted, stream};
use crate::item::Item;
use eyre::Result;
use serde_json::Value;

/// Action that emits one item per element of the array at `pointer`
///
/// Each emitted item carries the element as its payload, the parent's
/// metadata, and the element position under the `index_key` metadata key.
/// Items whose field is not an array pass through unchanged; an empty array
/// emits nothing.
#[derive(Debug, Clone)]
pub struct ArraySplitter {
    pointer: String,
    index_key: String,
}

impl ArraySplitter {
    pub fn new(pointer: impl Into<String>) -> Self {
        Self {
            pointer: pointer.into(),
            index_key: "index".to_string(),
        }
    }

    /// Metadata key for the element position (default `index`)
    pub fn with_index_key(mut self, key: impl Into<String>) -> Self {
        self.index_key = key.into();
        self
    }
}

impl Action for ArraySplitter {
    fn reset(&mut self) {}

    fn apply(&mut self, mut item: Item) -> Result<Emitted> {
        let elements = match item.data.pointer_mut(&self.pointer) {
            Some(Value::Array(elements)) => Some(std::mem::take(elements)),
            _ => None,
        };
        let Some(elements) = elements else {
            return Ok(stream::once(item));
        };

        let meta = item.meta;
        let index_key = self.index_key.clone();
        Ok(Box::new(elements.into_iter().enumerate().map(
            move |(index, element)| {
                let mut child = Item::new(element);
                child.meta = meta.clone();
                child.meta.insert(index_key.clone(), index.into());
                Ok(child)
            },
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn split(splitter: &mut ArraySplitter, item: Item) -> Vec<Item> {
        splitter.apply(item).unwrap().collect::<Result<_>>().unwrap()
    }

    #[test]
    fn test_splits_in_order() {
        let mut splitter = ArraySplitter::new("/children");
        let parent = Item::new(json!({"children": ["a", "b", "c"]})).with_meta("origin", "feed");

        let out = split(&mut splitter, parent);

        let data: Vec<_> = out.iter().map(|i| i.data.clone()).collect();
        assert_eq!(data, vec![json!("a"), json!("b"), json!("c")]);
        assert_eq!(out[1].meta["index"], json!(1));
        assert_eq!(out[2].meta_str("origin"), Some("feed"));
    }

    #[test]
    fn test_empty_array_emits_nothing() {
        let mut splitter = ArraySplitter::new("/children");
        assert!(split(&mut splitter, Item::new(json!({"children": []}))).is_empty());
    }

    #[test]
    fn test_non_array_passes_through() {
        let mut splitter = ArraySplitter::new("/children").with_index_key("pos");
        let item = Item::new(json!({"children": "none"}));
        assert_eq!(split(&mut splitter, item.clone()), vec![item]);
    }

    #[test]
    fn test_root_pointer() {
        let mut splitter = ArraySplitter::new("").with_index_key("pos");
        let out = split(&mut splitter, Item::new(json!([10, 20])));
        assert_eq!(out[0].data, json!(10));
        assert_eq!(out[1].meta["pos"], json!(1));
    }
}
