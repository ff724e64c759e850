//! Pipeline configuration files
//!
//! A pipeline is described in YAML and built into a runnable
//! [`Pipeline`](crate::etl::Pipeline).
//!
//! Example format:
//! ```yaml
//! source:
//!   type: ndjson
//!   path: export.ndjson
//! actions:
//!   - type: drop_fields
//!     fields: [created_at, updated_at]
//!   - type: match
//!     pointer: /type
//!     pattern: "^dashboard$"
//!   - type: dedup
//!     pointer: /id
//!   - type: first
//!     count: 100
//! export:
//!   type: directory
//!   path: objects
//! ```

use crate::etl::{Action, Pipeline, Source};
use crate::storage::{DirectoryExporter, DirectorySource, FileExporter, NdjsonExporter, NdjsonSource};
use crate::transform::{
    ArraySplitter, Dedup, Enumerate, FieldDropper, FieldMatch, FirstN, MetaSetter,
};
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Where items come from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceConfig {
    Ndjson {
        path: PathBuf,
        #[serde(default)]
        with_meta: bool,
    },
    Directory {
        path: PathBuf,
    },
}

/// One stage of the action chain
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionConfig {
    DropFields {
        fields: Vec<String>,
    },
    SetMeta {
        key: String,
        value: Value,
    },
    Match {
        pointer: String,
        pattern: String,
        #[serde(default)]
        invert: bool,
    },
    Dedup {
        #[serde(default)]
        pointer: Option<String>,
    },
    First {
        count: usize,
    },
    Split {
        pointer: String,
        #[serde(default)]
        index_key: Option<String>,
    },
    Enumerate {
        #[serde(default = "default_enumerate_key")]
        key: String,
    },
}

fn default_enumerate_key() -> String {
    "seq".to_string()
}

/// Where items end up
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExportConfig {
    Ndjson {
        path: PathBuf,
        #[serde(default)]
        with_meta: bool,
    },
    Directory {
        path: PathBuf,
    },
}

/// A complete pipeline description
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipelineConfig {
    pub source: SourceConfig,
    #[serde(default)]
    pub actions: Vec<ActionConfig>,
    pub export: ExportConfig,
}

impl PipelineConfig {
    /// Parse a configuration from YAML text
    ///
    /// Relative paths are kept as written.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).with_context(|| "Failed to parse pipeline configuration")
    }

    /// Load a configuration file
    ///
    /// Relative paths are resolved against the file's directory.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading pipeline configuration from {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_yaml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        match path.parent() {
            Some(base) => Ok(config.relative_to(base)),
            None => Ok(config),
        }
    }

    /// Resolve relative source and export paths against `base`
    pub fn relative_to(mut self, base: &Path) -> Self {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };

        match &mut self.source {
            SourceConfig::Ndjson { path, .. } | SourceConfig::Directory { path } => resolve(path),
        }
        match &mut self.export {
            ExportConfig::Ndjson { path, .. } | ExportConfig::Directory { path } => resolve(path),
        }
        self
    }

    pub fn build_source(&self) -> Box<dyn Source> {
        match &self.source {
            SourceConfig::Ndjson { path, with_meta } => {
                Box::new(NdjsonSource::new(path).with_meta(*with_meta))
            }
            SourceConfig::Directory { path } => Box::new(DirectorySource::new(path)),
        }
    }

    /// # Errors
    /// Returns an error if a `match` pattern is not a valid regex
    pub fn build_actions(&self) -> Result<Vec<Box<dyn Action>>> {
        self.actions
            .iter()
            .enumerate()
            .map(|(index, action)| {
                action
                    .build()
                    .with_context(|| format!("Invalid action #{}", index + 1))
            })
            .collect()
    }

    pub fn build_exporter(&self) -> FileExporter {
        match &self.export {
            ExportConfig::Ndjson { path, with_meta } => {
                NdjsonExporter::new(path).with_meta(*with_meta).into()
            }
            ExportConfig::Directory { path } => DirectoryExporter::new(path).into(),
        }
    }

    /// Build the runnable pipeline
    pub fn build(&self) -> Result<Pipeline<FileExporter>> {
        Ok(Pipeline::from_boxed(
            self.build_source(),
            self.build_actions()?,
            self.build_exporter(),
        ))
    }
}

impl ActionConfig {
    fn build(&self) -> Result<Box<dyn Action>> {
        let action: Box<dyn Action> = match self {
            Self::DropFields { fields } => Box::new(FieldDropper::new(fields)),
            Self::SetMeta { key, value } => Box::new(MetaSetter::new(key.clone(), value.clone())),
            Self::Match {
                pointer,
                pattern,
                invert,
            } => Box::new(FieldMatch::new(pointer.clone(), pattern)?.inverted(*invert)),
            Self::Dedup { pointer: None } => Box::new(Dedup::new()),
            Self::Dedup {
                pointer: Some(pointer),
            } => Box::new(Dedup::by(pointer.clone())),
            Self::First { count } => Box::new(FirstN::new(*count)),
            Self::Split { pointer, index_key } => {
                let splitter = ArraySplitter::new(pointer.clone());
                match index_key {
                    Some(key) => Box::new(splitter.with_index_key(key.clone())),
                    None => Box::new(splitter),
                }
            }
            Self::Enumerate { key } => Box::new(Enumerate::new(key.clone())),
        };
        Ok(action)
    }
}
