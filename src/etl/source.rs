//! Source trait for item producers

use super::{Action, Attached, Exporter, ItemStream, Progress};
use eyre::Result;

/// A producer of a lazy, finite, ordered sequence of items
///
/// Implementors define where items come from:
/// - File systems
/// - In-memory collections
/// - Other pipelines (see [`Attached`])
///
/// Iterating a source more than once must produce the same sequence again,
/// since one source may back several pipelines.
///
/// # Example
/// ```
/// use itemflow::etl::{ItemStream, Source};
/// use itemflow::Item;
/// use serde_json::json;
///
/// struct Countdown(u64);
///
/// impl Source for Countdown {
///     fn produce(&self) -> ItemStream<'_> {
///         Box::new((1..=self.0).rev().map(|n| Ok(Item::new(json!(n)))))
///     }
/// }
///
/// let items: Vec<Item> = Countdown(3).iterate().collect::<eyre::Result<_>>().unwrap();
/// assert_eq!(items[0].data, json!(3));
/// ```
pub trait Source {
    /// Produce the raw item sequence
    fn produce(&self) -> ItemStream<'_>;

    /// Label used for progress reporting
    ///
    /// Defaults to the concrete type name without its module path.
    fn name(&self) -> String {
        short_type_name::<Self>()
    }

    /// Public entry point: [`produce`](Source::produce) plus progress ticks
    fn iterate(&self) -> ItemStream<'_> {
        Box::new(Progress::new(self.produce(), self.name()))
    }

    /// Compose this source with reset copies of `actions`, in order
    ///
    /// Neither this source nor the passed actions are modified.
    fn attach<'s>(&'s self, actions: &[&dyn Action]) -> Attached<'s>
    where
        Self: Sized,
    {
        Attached::new(self, actions)
    }

    /// Drain this source into a reset copy of `exporter`
    ///
    /// # Errors
    /// Returns the first error raised by the source, an action, or the exporter
    fn export_to<E>(&self, exporter: &E) -> Result<E::Output>
    where
        Self: Sized,
        E: Exporter + Clone,
    {
        let mut exporter = exporter.clone();
        exporter.reset();
        exporter.export_from(self.iterate())
    }
}

impl<S: Source + ?Sized> Source for Box<S> {
    fn produce(&self) -> ItemStream<'_> {
        (**self).produce()
    }

    fn name(&self) -> String {
        (**self).name()
    }

    fn iterate(&self) -> ItemStream<'_> {
        (**self).iterate()
    }
}

/// `my_crate::storage::NdjsonSource<T>` -> `NdjsonSource`
pub(crate) fn short_type_name<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::etl::{ProgressObserver, progress};
    use crate::item::Item;
    use serde_json::json;
    use serial_test::serial;
    use std::sync::{Arc, Mutex};

    struct Letters;

    impl Source for Letters {
        fn produce(&self) -> ItemStream<'_> {
            Box::new(["a", "b", "c"].into_iter().map(|s| Ok(Item::new(json!(s)))))
        }
    }

    #[derive(Default)]
    struct Ticks(Mutex<Vec<(String, u64)>>);

    impl ProgressObserver for Ticks {
        fn tick(&self, label: &str, count: u64) {
            self.0.lock().unwrap().push((label.to_string(), count));
        }
    }

    #[test]
    fn test_name_is_short_type_name() {
        assert_eq!(Letters.name(), "Letters");
        let boxed: Box<dyn Source> = Box::new(Letters);
        assert_eq!(boxed.name(), "Letters");
        assert_eq!(short_type_name::<Vec<String>>(), "Vec");
    }

    #[test]
    fn test_iterate_is_repeatable() {
        let first: Vec<Item> = Letters.iterate().collect::<Result<_>>().unwrap();
        let second: Vec<Item> = Letters.iterate().collect::<Result<_>>().unwrap();
        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
    }

    #[test]
    #[serial]
    fn test_iterate_ticks_with_source_name() {
        let ticks = Arc::new(Ticks::default());
        progress::set_observer(ticks.clone());

        let items: Vec<Item> = Letters.iterate().collect::<Result<_>>().unwrap();
        progress::reset_observer();

        assert_eq!(items.len(), 3);
        let ours: Vec<u64> = ticks
            .0
            .lock()
            .unwrap()
            .iter()
            .filter(|(label, _)| label == "Letters")
            .map(|(_, n)| *n)
            .collect();
        assert_eq!(ours, vec![1, 2, 3]);
    }
}
