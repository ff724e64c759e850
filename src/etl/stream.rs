//! Lazy item sequences

use crate::item::Item;
use eyre::{Report, Result};

/// A lazy, pull-based sequence of items
///
/// Errors travel through the stream as `Err` items. Consumers stop at the
/// first one; nothing downstream retries or replaces it.
pub type ItemStream<'a> = Box<dyn Iterator<Item = Result<Item>> + 'a>;

/// What an action emits for a single input item
pub type Emitted = ItemStream<'static>;

/// Emit a single item
pub fn once(item: Item) -> Emitted {
    Box::new(std::iter::once(Ok(item)))
}

/// Emit nothing
pub fn empty() -> Emitted {
    Box::new(std::iter::empty())
}

/// Emit the given items in order
pub fn from_items(items: Vec<Item>) -> Emitted {
    Box::new(items.into_iter().map(Ok))
}

/// A stream holding a single error
pub fn fail<'a>(err: impl Into<Report>) -> ItemStream<'a> {
    Box::new(std::iter::once(Err(err.into())))
}
