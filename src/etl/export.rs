//! Exporter trait for terminal pipeline consumers

use super::ItemStream;
use crate::item::Item;
use eyre::Result;

/// A terminal consumer that drains a stream and produces a summary
///
/// Implementors define how items leave the pipeline:
/// - File systems
/// - In-memory collections
/// - Aggregations
///
/// Like actions, exporters keep per-pass state. Sources hand a reset copy
/// to [`export_from`](Exporter::export_from) and never touch the caller's
/// instance.
///
/// # Example
/// ```
/// use itemflow::etl::Exporter;
/// use itemflow::Item;
/// use eyre::Result;
///
/// #[derive(Clone, Default)]
/// struct Counter {
///     count: usize,
/// }
///
/// impl Exporter for Counter {
///     type Output = usize;
///
///     fn reset(&mut self) {
///         self.count = 0;
///     }
///
///     fn export_item(&mut self, _item: Item) -> Result<()> {
///         self.count += 1;
///         Ok(())
///     }
///
///     fn finish(&mut self) -> Result<usize> {
///         Ok(self.count)
///     }
/// }
/// ```
pub trait Exporter {
    /// Summary returned once the stream is drained
    type Output;

    /// Clear accumulated state
    fn reset(&mut self);

    /// Side effect for a single item
    ///
    /// # Errors
    /// Returns an error if the item cannot be written; the pass stops there
    fn export_item(&mut self, item: Item) -> Result<()>;

    /// Finalization after the last item
    fn finish(&mut self) -> Result<Self::Output>;

    /// Drain `items` in order, then finalize
    ///
    /// Stops at the first error without finalizing. Items exported before the
    /// error stay exported.
    fn export_from(&mut self, items: ItemStream<'_>) -> Result<Self::Output> {
        let mut count = 0usize;
        for item in items {
            self.export_item(item?)?;
            count += 1;
        }
        log::debug!("Drained {} item(s), finalizing export", count);
        self.finish()
    }
}
