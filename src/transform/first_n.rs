//! Head of the stream

use crate::etl::{Action, Emitted, ItemStream, stream};
use crate::item::Item;
use eyre::Result;

/// Action that passes the first `limit` items and then ends the stream
///
/// Overrides [`Action::iter_from`] so that once the limit is reached it
/// stops pulling upstream entirely.
#[derive(Debug, Clone)]
pub struct FirstN {
    limit: usize,
    passed: usize,
}

impl FirstN {
    pub fn new(limit: usize) -> Self {
        Self { limit, passed: 0 }
    }
}

impl Action for FirstN {
    fn reset(&mut self) {
        self.passed = 0;
    }

    fn apply(&mut self, item: Item) -> Result<Emitted> {
        if self.passed < self.limit {
            self.passed += 1;
            Ok(stream::once(item))
        } else {
            Ok(stream::empty())
        }
    }

    fn iter_from<'a>(mut self: Box<Self>, mut upstream: ItemStream<'a>) -> ItemStream<'a> {
        Box::new(std::iter::from_fn(move || {
            if self.passed >= self.limit {
                return None;
            }
            let next = upstream.next()?;
            if next.is_ok() {
                self.passed += 1;
            }
            Some(next)
        }))
    }
}
