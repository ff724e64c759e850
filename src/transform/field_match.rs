//! Regex filter on a payload field

use crate::etl::{Action, Emitted, stream};
use crate::item::Item;
use eyre::{Context, Result};
use regex::Regex;
use serde_json::Value;

/// Action that keeps items whose field at `pointer` matches a pattern
///
/// Strings are matched as-is; numbers and booleans by their JSON text.
/// Items where the field is missing, null, an array or an object never match.
/// With [`inverted`](FieldMatch::inverted) the selection flips.
#[derive(Debug, Clone)]
pub struct FieldMatch {
    pointer: String,
    regex: Regex,
    invert: bool,
}

impl FieldMatch {
    /// Create a filter on the JSON pointer `pointer`
    ///
    /// # Errors
    /// Returns an error if `pattern` is not a valid regular expression
    pub fn new(pointer: impl Into<String>, pattern: &str) -> Result<Self> {
        let regex =
            Regex::new(pattern).with_context(|| format!("Invalid match pattern: {}", pattern))?;
        Ok(Self {
            pointer: pointer.into(),
            regex,
            invert: false,
        })
    }

    /// Keep the items that do not match instead
    pub fn inverted(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    fn matches(&self, item: &Item) -> bool {
        match item.pointer(&self.pointer) {
            Some(Value::String(s)) => self.regex.is_match(s),
            Some(v @ (Value::Number(_) | Value::Bool(_))) => self.regex.is_match(&v.to_string()),
            _ => false,
        }
    }
}

impl Action for FieldMatch {
    fn reset(&mut self) {}

    fn apply(&mut self, item: Item) -> Result<Emitted> {
        if self.matches(&item) != self.invert {
            Ok(stream::once(item))
        } else {
            log::trace!("Filtered out item at {}", self.pointer);
            Ok(stream::empty())
        }
    }
}
