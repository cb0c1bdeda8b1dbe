mod file_config;

pub use file_config::{FeedConfig, FileConfig, SearchConfig};

use crate::debounce::DEFAULT_DEBOUNCE_MS;
use anyhow::{bail, Result};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_FEED_TIMEOUT_SEC: u64 = 10;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub db_path: Option<PathBuf>,
    pub feed_url: Option<String>,
    pub feed_timeout_sec: u64,
    pub search_debounce_ms: u64,
    pub schedules_file: Option<PathBuf>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            feed_url: None,
            feed_timeout_sec: DEFAULT_FEED_TIMEOUT_SEC,
            search_debounce_ms: DEFAULT_DEBOUNCE_MS,
            schedules_file: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub schedules_file: Option<PathBuf>,
    pub feed: FeedSettings,
    pub search_debounce_ms: u64,
}

#[derive(Debug, Clone)]
pub struct FeedSettings {
    pub url: Option<String>,
    pub timeout_sec: u64,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .or_else(|| cli.db_path.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("db_path must be specified via --db-path or in config file")
            })?;

        if db_path.is_dir() {
            bail!("db_path is a directory: {:?}", db_path);
        }
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.is_dir() {
                bail!("Database directory does not exist: {:?}", parent);
            }
        }

        let schedules_file = file
            .schedules_file
            .map(PathBuf::from)
            .or_else(|| cli.schedules_file.clone());
        if let Some(path) = &schedules_file {
            if !path.is_file() {
                bail!("Schedules file not found: {:?}", path);
            }
        }

        let feed_file = file.feed.unwrap_or_default();
        let url = feed_file.url.or_else(|| cli.feed_url.clone());
        let feed = FeedSettings {
            url,
            timeout_sec: feed_file.timeout_sec.unwrap_or(cli.feed_timeout_sec),
        };

        let search_debounce_ms = file
            .search
            .and_then(|s| s.debounce_ms)
            .unwrap_or(cli.search_debounce_ms);

        Ok(Self {
            db_path,
            schedules_file,
            feed,
            search_debounce_ms,
        })
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}
