//! Field dropper action
//!
//! Removes specified fields from object payloads, typically bookkeeping
//! fields that should not travel downstream.

use crate::etl::{Action, Emitted, stream};
use crate::item::Item;
use eyre::Result;

/// Action that drops top-level fields from object payloads
///
/// Non-object payloads pass through untouched.
///
/// # Example
/// ```
/// use itemflow::transform::FieldDropper;
/// use itemflow::etl::Action;
/// use itemflow::Item;
/// use serde_json::json;
///
/// let mut dropper = FieldDropper::new(vec!["created_at", "version"]);
/// let input = Item::new(json!({
///     "id": "test",
///     "created_at": "2024-01-01",
///     "version": "1.0",
///     "title": "My Object"
/// }));
///
/// let output: Vec<Item> = dropper.apply(input).unwrap().collect::<eyre::Result<_>>().unwrap();
/// assert!(output[0].pointer("/created_at").is_none());
/// assert_eq!(output[0].data["title"], "My Object");
/// ```
#[derive(Debug, Clone)]
pub struct FieldDropper {
    fields: Vec<String>,
}

impl FieldDropper {
    /// Create a new field dropper with the specified fields to remove
    pub fn new<S: AsRef<str>>(fields: impl IntoIterator<Item = S>) -> Self {
        Self {
            fields: fields.into_iter().map(|s| s.as_ref().to_string()).collect(),
        }
    }

    /// Create a field dropper for common timestamp and audit fields
    ///
    /// Drops: created_at, created_by, updated_at, updated_by, version
    pub fn audit_fields() -> Self {
        Self::new([
            "created_at",
            "created_by",
            "updated_at",
            "updated_by",
            "version",
        ])
    }
}

impl Action for FieldDropper {
    fn reset(&mut self) {}

    fn apply(&mut self, mut item: Item) -> Result<Emitted> {
        if let Some(obj) = item.data.as_object_mut() {
            for field in &self.fields {
                obj.remove(field);
            }
        }
        Ok(stream::once(item))
    }
}
