//! In-memory sources and exporters

use crate::etl::{Exporter, ItemStream, Source};
use crate::item::Item;
use eyre::Result;

/// Source backed by a vector of items
///
/// Every pass yields clones of the stored items, in order.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    items: Vec<Item>,
}

impl MemorySource {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<Item> for MemorySource {
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Source for MemorySource {
    fn produce(&self) -> ItemStream<'_> {
        Box::new(self.items.iter().cloned().map(Ok))
    }
}

/// Exporter that collects every item into a vector
#[derive(Debug, Clone, Default)]
pub struct CollectExporter {
    items: Vec<Item>,
}

impl CollectExporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Exporter for CollectExporter {
    type Output = Vec<Item>;

    fn reset(&mut self) {
        self.items.clear();
    }

    fn export_item(&mut self, item: Item) -> Result<()> {
        self.items.push(item);
        Ok(())
    }

    fn finish(&mut self) -> Result<Vec<Item>> {
        Ok(std::mem::take(&mut self.items))
    }
}
