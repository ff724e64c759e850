//! Pipeline orchestration

use super::{Action, Attached, Exporter, Source};
use crate::item::Item;
use eyre::Result;

/// An owned source, action chain and exporter, ready to run
///
/// `Pipeline` owns its parts so it can be built from configuration and run
/// repeatedly. Every run attaches fresh copies of the actions and exports
/// into a fresh copy of the exporter.
///
/// # Example
/// ```
/// use itemflow::etl::Pipeline;
/// use itemflow::storage::{CollectExporter, MemorySource};
/// use itemflow::transform::FirstN;
/// use itemflow::Item;
/// use serde_json::json;
///
/// let source = MemorySource::new(vec![
///     Item::new(json!(1)),
///     Item::new(json!(2)),
///     Item::new(json!(3)),
/// ]);
///
/// let pipeline = Pipeline::new(source, CollectExporter::new()).with_action(FirstN::new(2));
/// let items = pipeline.run().unwrap();
/// assert_eq!(items.len(), 2);
/// ```
pub struct Pipeline<E> {
    source: Box<dyn Source>,
    actions: Vec<Box<dyn Action>>,
    exporter: E,
}

impl<E> Pipeline<E>
where
    E: Exporter + Clone,
{
    /// Create a pipeline with no actions
    pub fn new(source: impl Source + 'static, exporter: E) -> Self {
        Self::from_boxed(Box::new(source), Vec::new(), exporter)
    }

    /// Create a pipeline from already boxed parts
    pub fn from_boxed(
        source: Box<dyn Source>,
        actions: Vec<Box<dyn Action>>,
        exporter: E,
    ) -> Self {
        Self {
            source,
            actions,
            exporter,
        }
    }

    /// Append an action to the chain
    pub fn with_action(mut self, action: impl Action) -> Self {
        self.actions.push(Box::new(action));
        self
    }

    /// Names of the source and actions, in pull order
    pub fn describe(&self) -> String {
        let mut parts = vec![self.source.name()];
        parts.extend(self.actions.iter().map(|a| a.name()));
        parts.join(" -> ")
    }

    fn attached(&self) -> Attached<'_> {
        let actions: Vec<&dyn Action> = self.actions.iter().map(|a| a.as_ref()).collect();
        Attached::new(self.source.as_ref(), &actions)
    }

    /// Run the complete pipeline
    ///
    /// Returns whatever summary the exporter produces
    ///
    /// # Errors
    /// Returns an error if any stage fails
    pub fn run(&self) -> Result<E::Output> {
        log::info!("Starting pipeline: {}", self.describe());
        let output = self.attached().export_to(&self.exporter)?;
        log::info!("Pipeline complete");
        Ok(output)
    }

    /// Pull at most `limit` items through the actions without exporting
    ///
    /// The rest of the stream is abandoned, so no work is done for items
    /// past the limit.
    pub fn preview(&self, limit: usize) -> Result<Vec<Item>> {
        log::debug!("Previewing {} item(s) of: {}", limit, self.describe());
        self.attached().iterate().take(limit).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::etl::{Emitted, ItemStream, stream};
    use serde_json::json;

    struct MockSource(Vec<i64>);

    impl Source for MockSource {
        fn produce(&self) -> ItemStream<'_> {
            Box::new(self.0.iter().map(|v| Ok(Item::new(json!(v)))))
        }
    }

    #[derive(Clone)]
    struct Double;

    impl Action for Double {
        fn reset(&mut self) {}

        fn apply(&mut self, item: Item) -> Result<Emitted> {
            let value = item.data.as_i64().unwrap_or_default();
            Ok(stream::once(Item::new(json!(value * 2))))
        }
    }

    #[derive(Clone, Default)]
    struct Sum {
        total: i64,
        items: usize,
    }

    impl Exporter for Sum {
        type Output = (usize, i64);

        fn reset(&mut self) {
            *self = Self::default();
        }

        fn export_item(&mut self, item: Item) -> Result<()> {
            self.total += item.data.as_i64().unwrap_or_default();
            self.items += 1;
            Ok(())
        }

        fn finish(&mut self) -> Result<Self::Output> {
            Ok((self.items, self.total))
        }
    }

    #[test]
    fn test_pipeline() {
        let pipeline = Pipeline::new(MockSource(vec![1, 2, 3]), Sum::default()).with_action(Double);

        let (count, total) = pipeline.run().unwrap();
        assert_eq!(count, 3);
        assert_eq!(total, 12); // (1+2+3)*2 = 12
    }

    #[test]
    fn test_empty_pipeline() {
        let pipeline = Pipeline::new(MockSource(vec![]), Sum::default()).with_action(Double);

        let (count, total) = pipeline.run().unwrap();
        assert_eq!(count, 0);
        assert_eq!(total, 0);
    }

    #[test]
    fn test_runs_are_independent() {
        let pipeline = Pipeline::new(MockSource(vec![5, 5]), Sum::default());

        assert_eq!(pipeline.run().unwrap(), (2, 10));
        assert_eq!(pipeline.run().unwrap(), (2, 10));
    }

    #[test]
    fn test_preview_limits_items() {
        let pipeline = Pipeline::new(MockSource(vec![1, 2, 3, 4]), Sum::default()).with_action(Double);

        let items = pipeline.preview(2).unwrap();
        let values: Vec<_> = items.into_iter().map(|i| i.data).collect();
        assert_eq!(values, vec![json!(2), json!(4)]);
    }

    #[test]
    fn test_describe() {
        let pipeline = Pipeline::new(MockSource(vec![]), Sum::default())
            .with_action(Double)
            .with_action(Double);
        assert_eq!(pipeline.describe(), "MockSource -> Double -> Double");
    }
}
