//! Item Flow
//!
//! Lazy, composable pipelines: a source produces items, attached actions
//! transform them stage by stage, and an exporter drains the result.

pub mod config;
pub mod etl;
pub mod item;
pub mod storage;
pub mod transform;

// Re-exports for convenience
pub use config::PipelineConfig;
pub use etl::{Action, Attached, Exporter, ItemStream, Pipeline, Source};
pub use item::Item;
pub use storage::{
    CollectExporter, DirectoryExporter, DirectorySource, ExportSummary, FileExporter,
    MemorySource, NdjsonExporter, NdjsonSource,
};
