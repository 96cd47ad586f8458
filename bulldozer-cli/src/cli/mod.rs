//! Command line interface

pub mod commands;

use std::path::PathBuf;

use anyhow::bail;
use clap::{Args, Parser, Subcommand};

use crate::config::Config;
use crate::session::BulldozerSession;

#[derive(Debug, Parser)]
#[command(name = "bulldozer-cli", version, about = "Pick and preview data sources for a migration")]
pub struct Cli {
    /// Config file (default: <config_dir>/bulldozer/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log file (default: <data_local_dir>/bulldozer/bulldozer.log)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Open the data source select screen
    Select(SelectCommand),
    /// List the data sources a directory provides
    Nodes(NodesCommand),
    /// Print the preview of one data source
    Preview(PreviewCommand),
}

/// Where to read data sources from
#[derive(Debug, Args)]
pub struct SourceArgs {
    /// Directory of CSV files, one data source per file
    #[arg(long, value_name = "DIR")]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct SelectCommand {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Rows sampled per preview
    #[arg(long, value_name = "N")]
    pub rows: Option<usize>,

    /// Give up on a preview after this many seconds (0 disables the limit)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Write the selection manifest here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct NodesCommand {
    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Debug, Args)]
pub struct PreviewCommand {
    /// Id of the data source, as listed by `nodes`
    pub node_id: String,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Rows sampled
    #[arg(long, value_name = "N")]
    pub rows: Option<usize>,
}

/// Fold command line overrides into the loaded config
pub fn apply_overrides(config: &mut Config, source: &SourceArgs, rows: Option<usize>) -> anyhow::Result<()> {
    if let Some(dir) = &source.source {
        config.source.directory = Some(dir.clone());
    }
    if let Some(rows) = rows {
        if rows == 0 {
            bail!("--rows must be at least 1");
        }
        config.preview.row_limit = rows;
    }
    Ok(())
}

/// Open the configured source, `None` when no source is configured
pub fn open_session(config: &Config) -> anyhow::Result<Option<BulldozerSession>> {
    let Some(dir) = &config.source.directory else {
        return Ok(None);
    };
    let session = BulldozerSession::from_csv_directory(dir, config.csv_options())?;
    log::info!(
        "Opened {} with {} data sources",
        dir.display(),
        session.data_nodes.len()
    );
    Ok(Some(session))
}

/// Like `open_session`, for commands that cannot do anything without a source
pub fn require_session(config: &Config) -> anyhow::Result<BulldozerSession> {
    match open_session(config)? {
        Some(session) => Ok(session),
        None => bail!("No data source configured; pass --source or set BULLDOZER_SOURCE_DIR"),
    }
}
