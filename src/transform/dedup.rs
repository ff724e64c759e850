//! Global deduplication
//!
//! Unlike the streaming actions, `Dedup` remembers every key it has seen for
//! the whole pass, so its memory grows with the number of distinct items.

use crate::etl::{Action, Emitted, stream};
use crate::item::Item;
use eyre::Result;
use std::collections::HashSet;

/// Action that drops items whose key was already seen this pass
///
/// The key is the serialized value at a JSON pointer, or the whole payload
/// when no pointer is given. Items without the keyed field always pass.
#[derive(Debug, Clone, Default)]
pub struct Dedup {
    pointer: Option<String>,
    seen: HashSet<String>,
}

impl Dedup {
    /// Deduplicate on whole payloads
    pub fn new() -> Self {
        Self::default()
    }

    /// Deduplicate on the value at `pointer`
    pub fn by(pointer: impl Into<String>) -> Self {
        Self {
            pointer: Some(pointer.into()),
            seen: HashSet::new(),
        }
    }

    fn key(&self, item: &Item) -> Option<String> {
        let value = match &self.pointer {
            Some(pointer) => item.pointer(pointer)?,
            None => &item.data,
        };
        Some(value.to_string())
    }
}

impl Action for Dedup {
    fn reset(&mut self) {
        self.seen.clear();
    }

    fn apply(&mut self, item: Item) -> Result<Emitted> {
        let Some(key) = self.key(&item) else {
            return Ok(stream::once(item));
        };

        if self.seen.insert(key) {
            Ok(stream::once(item))
        } else {
            log::debug!("Dropping duplicate item: {}", item.data);
            Ok(stream::empty())
        }
    }
}
