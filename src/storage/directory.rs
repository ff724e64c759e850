//! Directory-based item storage

use super::ExportSummary;
use crate::etl::{Exporter, ItemStream, Source, stream};
use crate::item::Item;
use eyre::{Context, Result};
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

/// Read items from the `*.json` files of a directory
///
/// Files are visited in sorted path order and read lazily, one per pull.
/// A missing directory yields no items. Metadata records `path` and
/// `filename`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    path: PathBuf,
}

impl DirectorySource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// JSON files in the directory, sorted
    pub fn files(&self) -> Result<Vec<PathBuf>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        let entries = std::fs::read_dir(&self.path)
            .with_context(|| format!("Failed to list directory: {}", self.path.display()))?;
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Count JSON files in directory
    pub fn count(&self) -> Result<usize> {
        Ok(self.files()?.len())
    }
}

fn read_item(path: &Path) -> Result<Item> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let data: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON: {}", path.display()))?;

    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(Item::new(data)
        .with_meta("path", path.display().to_string())
        .with_meta("filename", filename))
}

impl Source for DirectorySource {
    fn produce(&self) -> ItemStream<'_> {
        match self.files() {
            Ok(files) => Box::new(files.into_iter().map(|path| read_item(&path))),
            Err(err) => stream::fail(err),
        }
    }
}

/// Write each item to its own pretty-printed JSON file
///
/// File names come from the `filename` metadata key when present, then from
/// the payload's `type` and `id` fields, and finally from the item's
/// position in the pass.
///
/// A name must be a single plain path component; anything else fails the
/// export. A name already written during the pass gets a numeric suffix
/// (`page.json`, `page-1.json`, ...), so every exported item has its own file.
#[derive(Debug, Clone)]
pub struct DirectoryExporter {
    path: PathBuf,
    count: usize,
    written: HashSet<String>,
}

impl DirectoryExporter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            count: 0,
            written: HashSet::new(),
        }
    }

    fn generate_filename(&self, item: &Item) -> String {
        if let Some(name) = item.meta_str("filename") {
            return name.to_string();
        }

        let obj_type = item.data.get("type").and_then(|v| v.as_str());
        let id = item.data.get("id").and_then(|v| v.as_str());

        match (obj_type, id) {
            (Some(obj_type), Some(id)) => format!("{}-{}.json", obj_type, id),
            _ => format!("item-{:06}.json", self.count),
        }
    }

    /// Reserve `name` for this pass, suffixing it until it is unused
    fn claim(&mut self, name: String) -> String {
        if self.written.insert(name.clone()) {
            return name;
        }

        let path = Path::new(&name);
        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned());

        let mut n = 1;
        loop {
            let candidate = match &extension {
                Some(ext) => format!("{}-{}.{}", stem, n, ext),
                None => format!("{}-{}", stem, n),
            };
            if self.written.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Clear all JSON files from directory
    pub fn clear(&self) -> Result<()> {
        for path in DirectorySource::new(&self.path).files()? {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove file: {}", path.display()))?;
        }
        Ok(())
    }
}

/// Reject names that would resolve outside the export directory
fn check_filename(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !name.contains(['/', '\\']) => Ok(()),
        _ => eyre::bail!("Unsafe file name for directory export: {:?}", name),
    }
}

impl Exporter for DirectoryExporter {
    type Output = ExportSummary;

    fn reset(&mut self) {
        self.count = 0;
        self.written.clear();
    }

    fn export_item(&mut self, item: Item) -> Result<()> {
        std::fs::create_dir_all(&self.path)
            .with_context(|| format!("Failed to create directory: {}", self.path.display()))?;

        let name = self.generate_filename(&item);
        check_filename(&name)?;
        let claimed = self.claim(name);
        let path = self.path.join(claimed);
        let json = serde_json::to_string_pretty(&item.data)?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write file: {}", path.display()))?;

        self.count += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<ExportSummary> {
        std::fs::create_dir_all(&self.path)
            .with_context(|| format!("Failed to create directory: {}", self.path.display()))?;

        log::info!("Wrote {} file(s) to {}", self.count, self.path.display());
        Ok(ExportSummary::new(self.count, &self.path))
    }
}
