//! CSV directory data source
//!
//! Every `*.csv` file in a directory becomes one data node. Previews read the
//! header row plus the first `row_limit` records of the file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};

use super::fetcher::{PreviewFetcher, PreviewTable};
use super::node::{DataNode, NodeRegistry};

#[derive(Debug, Clone)]
pub struct CsvSourceOptions {
    pub delimiter: u8,
    pub row_limit: usize,
}

impl Default for CsvSourceOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            row_limit: 15,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CsvDirectorySource {
    options: CsvSourceOptions,
    /// Node id -> file, in enumeration order
    files: Vec<(String, PathBuf)>,
    index: HashMap<String, usize>,
}

impl CsvDirectorySource {
    /// Scan `directory` for CSV files, ordered by file name
    pub fn open(directory: impl AsRef<Path>, options: CsvSourceOptions) -> anyhow::Result<Self> {
        let directory = directory.as_ref().to_path_buf();
        let entries = std::fs::read_dir(&directory)
            .with_context(|| format!("Failed to read source directory {}", directory.display()))?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry
                .with_context(|| format!("Failed to list {}", directory.display()))?
                .path();
            let is_csv = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case("csv"))
                .unwrap_or(false);
            if path.is_file() && is_csv {
                paths.push(path);
            }
        }
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        let mut files = Vec::with_capacity(paths.len());
        let mut index = HashMap::new();
        for path in paths {
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                log::warn!("Skipping non UTF-8 file name {}", path.display());
                continue;
            };
            let id = stem.to_string();
            if index.contains_key(&id) {
                log::warn!("Skipping {}: node '{}' already enumerated", path.display(), id);
                continue;
            }
            index.insert(id.clone(), files.len());
            files.push((id, path));
        }

        log::info!("Found {} CSV data sources in {}", files.len(), directory.display());

        Ok(Self {
            options,
            files,
            index,
        })
    }

    /// Nodes in enumeration order, all unchecked
    pub fn nodes(&self) -> anyhow::Result<NodeRegistry> {
        let nodes = self
            .files
            .iter()
            .map(|(id, _)| DataNode::new(id.clone(), humanize(id)))
            .collect();
        NodeRegistry::new(nodes)
    }

    fn path_for(&self, node_id: &str) -> Option<&Path> {
        self.index
            .get(node_id)
            .and_then(|&i| self.files.get(i))
            .map(|(_, path)| path.as_path())
    }
}

impl PreviewFetcher for CsvDirectorySource {
    fn fetch(&self, node_id: &str) -> anyhow::Result<Option<PreviewTable>> {
        let path = self
            .path_for(node_id)
            .ok_or_else(|| anyhow!("unknown data node '{}'", node_id))?;

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.options.delimiter)
            .flexible(true)
            .has_headers(true)
            .from_path(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;

        let headers = reader
            .headers()
            .with_context(|| format!("Failed to read header of {}", path.display()))?
            .clone();
        if headers.is_empty() {
            return Ok(None);
        }

        let mut rows = Vec::new();
        for record in reader.records().take(self.options.row_limit) {
            let record = record.with_context(|| format!("Malformed record in {}", path.display()))?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        log::debug!("[{}] Read {} preview rows from {}", node_id, rows.len(), path.display());

        Ok(Some(PreviewTable::new(
            headers.iter().map(str::to_string).collect(),
            rows,
        )))
    }
}

/// "customer_orders" -> "Customer Orders"
fn humanize(stem: &str) -> String {
    stem.split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
