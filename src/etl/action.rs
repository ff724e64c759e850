//! Action trait for stateful transformation stages

use super::source::short_type_name;
use super::{Emitted, ItemStream};
use crate::item::Item;
use eyre::Result;

/// A stateful stage between a source and its consumer
///
/// An action turns each upstream item into zero, one or many downstream
/// items. Its state (counters, seen-sets, windows) belongs to a single
/// pass: [`reset`](Action::reset) clears it, and pipelines only ever run
/// reset copies, never the instance the caller handed in.
///
/// # Example
/// ```
/// use itemflow::etl::{Action, Emitted, stream};
/// use itemflow::Item;
/// use eyre::Result;
///
/// /// Emits every item twice
/// #[derive(Clone)]
/// struct Twice;
///
/// impl Action for Twice {
///     fn reset(&mut self) {}
///
///     fn apply(&mut self, item: Item) -> Result<Emitted> {
///         Ok(stream::from_items(vec![item.clone(), item]))
///     }
/// }
/// ```
pub trait Action: ActionClone + 'static {
    /// Clear all per-pass state
    fn reset(&mut self);

    /// Transform one upstream item
    ///
    /// Emitted items keep the order in which they are produced.
    ///
    /// # Errors
    /// Returns an error if the item cannot be processed; the error ends the pass
    fn apply(&mut self, item: Item) -> Result<Emitted>;

    /// Label used in logs, defaulting to the concrete type name
    fn name(&self) -> String {
        short_type_name::<Self>()
    }

    /// Consume an upstream stream lazily, producing this stage's stream
    ///
    /// The default applies [`apply`](Action::apply) to each upstream item in
    /// turn and yields all of its results before pulling the next one.
    /// Override for windowing or early termination, but keep pulling lazily.
    fn iter_from<'a>(self: Box<Self>, upstream: ItemStream<'a>) -> ItemStream<'a> {
        Box::new(FlatApply::new(self, upstream))
    }
}

/// Object-safe cloning for boxed actions
pub trait ActionClone {
    /// Independent copy of this action, state included
    fn clone_box(&self) -> Box<dyn Action>;
}

impl<T> ActionClone for T
where
    T: Action + Clone,
{
    fn clone_box(&self) -> Box<dyn Action> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn Action> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// The default `iter_from` combinator: an order-preserving flat map
///
/// Holds at most one pending emission, so buffering is bounded by what a
/// single `apply` call returns. After any error the stream is fused.
pub struct FlatApply<'a, A: Action + ?Sized> {
    action: Box<A>,
    upstream: ItemStream<'a>,
    pending: Option<Emitted>,
    done: bool,
}

impl<'a, A: Action + ?Sized> FlatApply<'a, A> {
    /// Apply `action` to every item pulled from `upstream`
    pub fn new(action: Box<A>, upstream: ItemStream<'a>) -> Self {
        Self {
            action,
            upstream,
            pending: None,
            done: false,
        }
    }
}

impl<A: Action + ?Sized> Iterator for FlatApply<'_, A> {
    type Item = Result<Item>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done {
                return None;
            }

            if let Some(pending) = self.pending.as_mut() {
                match pending.next() {
                    Some(Ok(item)) => return Some(Ok(item)),
                    Some(Err(err)) => {
                        self.done = true;
                        return Some(Err(err));
                    }
                    None => self.pending = None,
                }
            }

            match self.upstream.next() {
                Some(Ok(item)) => match self.action.apply(item) {
                    Ok(emitted) => self.pending = Some(emitted),
                    Err(err) => {
                        self.done = true;
                        return Some(Err(err));
                    }
                },
                Some(Err(err)) => {
                    self.done = true;
                    return Some(Err(err));
                }
                None => {
                    self.done = true;
                    return None;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::etl::stream;
    use serde_json::json;

    /// Emits `n` copies of each item where `n` is the item's payload
    #[derive(Clone)]
    struct Repeat;

    impl Action for Repeat {
        fn reset(&mut self) {}

        fn apply(&mut self, item: Item) -> Result<Emitted> {
            let n = item.data.as_u64().unwrap_or(0) as usize;
            Ok(stream::from_items(vec![item; n]))
        }
    }

    #[derive(Clone, Default)]
    struct Counter {
        seen: usize,
    }

    impl Action for Counter {
        fn reset(&mut self) {
            self.seen = 0;
        }

        fn apply(&mut self, item: Item) -> Result<Emitted> {
            self.seen += 1;
            Ok(stream::once(item.with_meta("seen", self.seen)))
        }
    }

    #[derive(Clone)]
    struct FailOn(i64);

    impl Action for FailOn {
        fn reset(&mut self) {}

        fn apply(&mut self, item: Item) -> Result<Emitted> {
            if item.data.as_i64() == Some(self.0) {
                eyre::bail!("refusing item {}", self.0);
            }
            Ok(stream::once(item))
        }
    }

    fn numbers(values: &[i64]) -> ItemStream<'static> {
        stream::from_items(values.iter().map(|v| Item::new(json!(v))).collect())
    }

    fn payloads(stream: ItemStream<'_>) -> Vec<i64> {
        stream
            .map(|r| r.unwrap().data.as_i64().unwrap())
            .collect()
    }

    #[test]
    fn test_default_iter_from_flattens_in_order() {
        let out = Box::new(Repeat).iter_from(numbers(&[2, 0, 1, 3]));
        assert_eq!(payloads(out), vec![2, 2, 1, 3, 3, 3]);
    }

    #[test]
    fn test_apply_error_fuses_stream() {
        let mut out = Box::new(FailOn(2)).iter_from(numbers(&[1, 2, 3]));

        assert_eq!(out.next().unwrap().unwrap().data, json!(1));
        assert!(out.next().unwrap().is_err());
        assert!(out.next().is_none());
    }

    #[test]
    fn test_upstream_error_propagates_unchanged() {
        let upstream: ItemStream<'static> = Box::new(
            vec![Ok(Item::new(json!(1))), Err(eyre::eyre!("upstream broke"))].into_iter(),
        );
        let mut out = Box::new(Counter::default()).iter_from(upstream);

        assert!(out.next().unwrap().is_ok());
        let err = out.next().unwrap().unwrap_err();
        assert_eq!(err.to_string(), "upstream broke");
        assert!(out.next().is_none());
    }

    #[test]
    fn test_clone_box_copies_state() {
        let mut counter = Counter::default();
        counter.apply(Item::new(json!(null))).unwrap();

        let boxed: Box<dyn Action> = Box::new(counter.clone());
        let mut copy = boxed.clone();
        let out: Vec<Item> = copy
            .apply(Item::new(json!(null)))
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(out[0].meta["seen"], json!(2));
        assert_eq!(counter.seen, 1);
    }
}
