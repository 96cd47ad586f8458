//! Preview data fetch capability supplied by the data source

use serde::Serialize;

/// A small sample of a node's data: named columns and ordered rows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PreviewTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl PreviewTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    /// Number of data rows (header excluded)
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// A table without any data rows counts as an empty preview
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell value, or an empty string for short rows
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Produces preview data for a node
///
/// Implementations may block for a long time (disk, network). Callers must
/// never invoke this on the interactive loop; the preview coordinator runs it
/// on a blocking worker.
pub trait PreviewFetcher: Send + Sync {
    /// `Ok(None)` means the source has no table for this node
    fn fetch(&self, node_id: &str) -> anyhow::Result<Option<PreviewTable>>;
}
