//! NDJSON (Newline Delimited JSON) file operations

use super::ExportSummary;
use crate::etl::{Exporter, ItemStream, Source, stream};
use crate::item::Item;

use eyre::{Context, Result};
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Read items from an NDJSON file, one line at a time
///
/// In the default mode every line is a payload and the item metadata
/// records `path` and the 1-based `line`. With [`with_meta`](Self::with_meta)
/// every line is a whole serialized [`Item`].
#[derive(Debug, Clone)]
pub struct NdjsonSource {
    path: PathBuf,
    with_meta: bool,
}

impl NdjsonSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            with_meta: false,
        }
    }

    /// Treat each line as a serialized item with its metadata
    pub fn with_meta(mut self, with_meta: bool) -> Self {
        self.with_meta = with_meta;
        self
    }

    fn parse_line(&self, number: usize, line: &str) -> Result<Item> {
        if self.with_meta {
            return serde_json::from_str(line).with_context(|| {
                format!("Failed to parse item at {}:{}", self.path.display(), number)
            });
        }

        let data: Value = serde_json::from_str(line).with_context(|| {
            format!("Failed to parse JSON line at {}:{}", self.path.display(), number)
        })?;
        Ok(Item::new(data)
            .with_meta("path", self.path.display().to_string())
            .with_meta("line", number))
    }
}

impl Source for NdjsonSource {
    fn produce(&self) -> ItemStream<'_> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) => {
                return stream::fail(eyre::Report::new(err).wrap_err(format!(
                    "Failed to read NDJSON file: {}",
                    self.path.display()
                )));
            }
        };

        let lines = BufReader::new(file).lines().enumerate();
        Box::new(lines.filter_map(move |(index, line)| match line {
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => Some(self.parse_line(index + 1, &line)),
            Err(err) => Some(Err(eyre::Report::new(err).wrap_err(format!(
                "Failed to read line {} of {}",
                index + 1,
                self.path.display()
            )))),
        }))
    }
}

/// Write items to an NDJSON file, one line per item
///
/// The file is truncated when the first item arrives (or at finish, for an
/// empty pass). Copies share only the configuration, never an open file.
#[derive(Debug)]
pub struct NdjsonExporter {
    path: PathBuf,
    with_meta: bool,
    writer: Option<BufWriter<File>>,
    count: usize,
}

impl NdjsonExporter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            with_meta: false,
            writer: None,
            count: 0,
        }
    }

    /// Write whole items including metadata instead of bare payloads
    pub fn with_meta(mut self, with_meta: bool) -> Self {
        self.with_meta = with_meta;
        self
    }

    fn writer(&mut self) -> Result<&mut BufWriter<File>> {
        let writer = match self.writer.take() {
            Some(writer) => writer,
            None => {
                if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create directory: {}", parent.display())
                    })?;
                }
                let file = File::create(&self.path).with_context(|| {
                    format!("Failed to write NDJSON file: {}", self.path.display())
                })?;
                BufWriter::new(file)
            }
        };
        Ok(self.writer.insert(writer))
    }
}

impl Clone for NdjsonExporter {
    fn clone(&self) -> Self {
        Self::new(&self.path).with_meta(self.with_meta)
    }
}

impl Exporter for NdjsonExporter {
    type Output = ExportSummary;

    fn reset(&mut self) {
        self.writer = None;
        self.count = 0;
    }

    fn export_item(&mut self, item: Item) -> Result<()> {
        let line = if self.with_meta {
            serde_json::to_string(&item)?
        } else {
            serde_json::to_string(&item.data)?
        };
        writeln!(self.writer()?, "{}", line)?;
        self.count += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<ExportSummary> {
        self.writer()?
            .flush()
            .with_context(|| format!("Failed to flush NDJSON file: {}", self.path.display()))?;
        self.writer = None;

        log::info!("Wrote {} item(s) to {}", self.count, self.path.display());
        Ok(ExportSummary::new(self.count, &self.path))
    }
}
