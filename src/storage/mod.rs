//! File system and in-memory endpoints
//!
//! This module provides the concrete ends of a pipeline:
//! - NDJSON file reading/writing
//! - Directory-based item storage
//! - In-memory sources and collectors

mod directory;
mod memory;
mod ndjson;

pub use directory::{DirectoryExporter, DirectorySource};
pub use memory::{CollectExporter, MemorySource};
pub use ndjson::{NdjsonExporter, NdjsonSource};

use crate::etl::Exporter;
use crate::item::Item;
use eyre::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// What a file exporter wrote, and where
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    /// Number of items written
    pub count: usize,
    /// File or directory written to
    pub location: PathBuf,
}

impl ExportSummary {
    pub fn new(count: usize, location: impl AsRef<Path>) -> Self {
        Self {
            count,
            location: location.as_ref().to_path_buf(),
        }
    }
}

/// Either file exporter, chosen at runtime
#[derive(Debug, Clone)]
pub enum FileExporter {
    Ndjson(NdjsonExporter),
    Directory(DirectoryExporter),
}

impl Exporter for FileExporter {
    type Output = ExportSummary;

    fn reset(&mut self) {
        match self {
            Self::Ndjson(exporter) => exporter.reset(),
            Self::Directory(exporter) => exporter.reset(),
        }
    }

    fn export_item(&mut self, item: Item) -> Result<()> {
        match self {
            Self::Ndjson(exporter) => exporter.export_item(item),
            Self::Directory(exporter) => exporter.export_item(item),
        }
    }

    fn finish(&mut self) -> Result<ExportSummary> {
        match self {
            Self::Ndjson(exporter) => exporter.finish(),
            Self::Directory(exporter) => exporter.finish(),
        }
    }
}

impl From<NdjsonExporter> for FileExporter {
    fn from(exporter: NdjsonExporter) -> Self {
        Self::Ndjson(exporter)
    }
}

impl From<DirectoryExporter> for FileExporter {
    fn from(exporter: DirectoryExporter) -> Self {
        Self::Directory(exporter)
    }
}
