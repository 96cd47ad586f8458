//! Application configuration
//!
//! Loaded from `<config_dir>/bulldozer/config.toml` (or `--config`), then
//! overridden by `BULLDOZER_*` environment variables, then by CLI flags.
//! A missing default config file just means defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};

use crate::session::CsvSourceOptions;
use crate::tui::ThemeVariant;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub preview: PreviewConfig,
    pub logging: LoggingConfig,
    pub ui: UiConfig,
}

/// Where data sources are enumerated from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Directory of CSV files, one data node per file
    pub directory: Option<PathBuf>,
    pub delimiter: char,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Rows sampled per preview
    pub row_limit: usize,
    /// Give up on a preview fetch after this many seconds (no limit if unset)
    pub fetch_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is not set
    pub level: String,
    /// Log file (the terminal belongs to the TUI)
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub theme: ThemeVariant,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            directory: None,
            delimiter: ',',
        }
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            row_limit: 15,
            fetch_timeout_secs: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl Config {
    /// `<config_dir>/bulldozer/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("bulldozer").join("config.toml"))
    }

    /// Load from an explicit path (must exist) or the default location (optional)
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match Self::default_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            if required {
                bail!("Config file {} does not exist", path.display());
            }
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml_str(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `BULLDOZER_*` overrides from the process environment
    pub fn apply_env(&mut self) -> anyhow::Result<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        if let Some(dir) = lookup("BULLDOZER_SOURCE_DIR") {
            self.source.directory = Some(PathBuf::from(dir));
        }
        if let Some(rows) = lookup("BULLDOZER_PREVIEW_ROWS") {
            self.preview.row_limit = rows
                .trim()
                .parse()
                .with_context(|| format!("BULLDOZER_PREVIEW_ROWS is not a number: {}", rows))?;
        }
        if let Some(secs) = lookup("BULLDOZER_PREVIEW_TIMEOUT_SECS") {
            let secs = secs.trim();
            self.preview.fetch_timeout_secs = if secs.is_empty() || secs == "0" {
                None
            } else {
                Some(secs.parse().with_context(|| {
                    format!("BULLDOZER_PREVIEW_TIMEOUT_SECS is not a number: {}", secs)
                })?)
            };
        }
        if let Some(theme) = lookup("BULLDOZER_THEME") {
            self.ui.theme = theme.parse()?;
        }
        self.validate()
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.preview.row_limit == 0 {
            bail!("preview.row_limit must be at least 1");
        }
        if !self.source.delimiter.is_ascii() {
            bail!("source.delimiter must be a single ASCII character");
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.preview.fetch_timeout_secs.map(Duration::from_secs)
    }

    pub fn csv_options(&self) -> CsvSourceOptions {
        CsvSourceOptions {
            delimiter: self.source.delimiter as u8,
            row_limit: self.preview.row_limit,
        }
    }

    /// Configured log file, else `<data_local_dir>/bulldozer/bulldozer.log`
    pub fn log_file(&self) -> PathBuf {
        if let Some(file) = &self.logging.file {
            return file.clone();
        }
        dirs::data_local_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("bulldozer")
            .join("bulldozer.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.preview.row_limit, 15);
        assert_eq!(config.fetch_timeout(), None);
        assert_eq!(config.source.delimiter, ',');
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.ui.theme, ThemeVariant::Dark);
    }

    #[test]
    fn test_parse_partial_toml() {
        let config = Config::from_toml_str(
            r#"
            [source]
            directory = "/data/export"
            delimiter = ";"

            [preview]
            fetch_timeout_secs = 30

            [ui]
            theme = "light"
            "#,
        )
        .unwrap();

        assert_eq!(config.source.directory, Some(PathBuf::from("/data/export")));
        assert_eq!(config.csv_options().delimiter, b';');
        assert_eq!(config.preview.row_limit, 15);
        assert_eq!(config.fetch_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.ui.theme, ThemeVariant::Light);
    }

    #[test]
    fn test_rejects_zero_rows() {
        assert!(Config::from_toml_str("[preview]\nrow_limit = 0\n").is_err());
    }

    #[test]
    fn test_rejects_non_ascii_delimiter() {
        assert!(Config::from_toml_str("[source]\ndelimiter = \"§\"\n").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_env_from(env(&[
                ("BULLDOZER_SOURCE_DIR", "/tmp/csv"),
                ("BULLDOZER_PREVIEW_ROWS", "40"),
                ("BULLDOZER_PREVIEW_TIMEOUT_SECS", "5"),
                ("BULLDOZER_THEME", "light"),
            ]))
            .unwrap();

        assert_eq!(config.source.directory, Some(PathBuf::from("/tmp/csv")));
        assert_eq!(config.preview.row_limit, 40);
        assert_eq!(config.fetch_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.ui.theme, ThemeVariant::Light);
    }

    #[test]
    fn test_env_zero_timeout_disables_limit() {
        let mut config = Config::default();
        config.preview.fetch_timeout_secs = Some(10);
        config
            .apply_env_from(env(&[("BULLDOZER_PREVIEW_TIMEOUT_SECS", "0")]))
            .unwrap();
        assert_eq!(config.fetch_timeout(), None);
    }

    #[test]
    fn test_env_rejects_garbage() {
        let mut config = Config::default();
        assert!(config
            .apply_env_from(env(&[("BULLDOZER_PREVIEW_ROWS", "lots")]))
            .is_err());
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[preview]\nrow_limit = 3\n").unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.preview.row_limit, 3);
    }
}
