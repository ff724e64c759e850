//! Per-pass sequence numbering

use crate::etl::{Action, Emitted, stream};
use crate::item::Item;
use eyre::Result;

/// Action that records each item's position in the stream it received
///
/// Counting starts at zero on every pass.
#[derive(Debug, Clone)]
pub struct Enumerate {
    key: String,
    next: u64,
}

impl Enumerate {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            next: 0,
        }
    }
}

impl Default for Enumerate {
    fn default() -> Self {
        Self::new("seq")
    }
}

impl Action for Enumerate {
    fn reset(&mut self) {
        self.next = 0;
    }

    fn apply(&mut self, item: Item) -> Result<Emitted> {
        let position = self.next;
        self.next += 1;
        Ok(stream::once(item.with_meta(self.key.clone(), position)))
    }
}
