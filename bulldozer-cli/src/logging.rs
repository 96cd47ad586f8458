//! File logging
//!
//! The terminal belongs to the TUI, so everything goes to a log file.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use anyhow::Context;
use chrono::Local;
use log::LevelFilter;

use crate::config::Config;

/// Install `env_logger` writing to the configured log file
///
/// `RUST_LOG` wins over the config level; `verbose` raises the config level
/// to at least debug.
pub fn init(config: &Config, verbose: bool) -> anyhow::Result<()> {
    let path = config.log_file();
    let file = open_log_file(&path)?;

    let mut builder = env_logger::Builder::new();
    builder
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] [{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.module_path().unwrap_or("unknown"),
                record.args()
            )
        });

    match std::env::var("RUST_LOG") {
        Ok(filters) if !filters.trim().is_empty() => {
            builder.parse_filters(&filters);
        }
        _ => {
            builder.filter_level(level_for(&config.logging.level, verbose)?);
        }
    }

    builder.try_init().context("Logger already installed")?;
    log::info!("Logging to {}", path.display());
    Ok(())
}

fn open_log_file(path: &Path) -> anyhow::Result<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}

fn level_for(configured: &str, verbose: bool) -> anyhow::Result<LevelFilter> {
    let level: LevelFilter = configured
        .trim()
        .parse()
        .with_context(|| format!("Unknown log level '{}'", configured))?;
    Ok(if verbose { level.max(LevelFilter::Debug) } else { level })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for() {
        assert_eq!(level_for("info", false).unwrap(), LevelFilter::Info);
        assert_eq!(level_for("WARN", false).unwrap(), LevelFilter::Warn);
        assert_eq!(level_for("info", true).unwrap(), LevelFilter::Debug);
        assert_eq!(level_for("trace", true).unwrap(), LevelFilter::Trace);
        assert!(level_for("loud", false).is_err());
    }

    #[test]
    fn test_open_log_file_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("bulldozer.log");
        open_log_file(&path).unwrap();
        assert!(path.exists());
    }
}
