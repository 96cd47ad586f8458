//! Wizard session: the enumerated data nodes and the preview capability

pub mod csv_source;
pub mod fetcher;
pub mod node;

use std::sync::Arc;

pub use csv_source::{CsvDirectorySource, CsvSourceOptions};
pub use fetcher::{PreviewFetcher, PreviewTable};
pub use node::{DataNode, NodeRegistry};

/// Everything the select screen needs from the wizard host
#[derive(Clone)]
pub struct BulldozerSession {
    pub data_nodes: NodeRegistry,
    pub fetcher: Arc<dyn PreviewFetcher>,
}

impl BulldozerSession {
    pub fn new(data_nodes: NodeRegistry, fetcher: Arc<dyn PreviewFetcher>) -> Self {
        Self { data_nodes, fetcher }
    }

    /// Open a CSV directory as a session
    pub fn from_csv_directory(
        directory: &std::path::Path,
        options: CsvSourceOptions,
    ) -> anyhow::Result<Self> {
        let source = CsvDirectorySource::open(directory, options)?;
        let data_nodes = source.nodes()?;
        Ok(Self::new(data_nodes, Arc::new(source)))
    }
}

impl std::fmt::Debug for BulldozerSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BulldozerSession")
            .field("data_nodes", &self.data_nodes.len())
            .finish_non_exhaustive()
    }
}
