//! Configuration for the tracker CLI.
//!
//! Read from the environment (a `.env` file is honoured):
//! - `TRACKER_DATA_DIR` - where `storage.json` lives (default `./.tracker`)
//! - `TRACKER_SIGNAL_TTL_SECS` - relay freshness window
//! - `TRACKER_DEBOUNCE_MS` - re-extraction delay for `watch`
//! - `TRACKER_EXTRACTOR_CONFIG` - TOML file overriding keywords and selectors

use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use job_tracker::{ExtractorConfig, RelayConfig};

const DEFAULT_DATA_DIR: &str = ".tracker";
const STORAGE_FILE: &str = "storage.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub signal_ttl: Option<Duration>,
    pub debounce: Option<Duration>,
    pub extractor_config: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        let _ = dotenv();

        Ok(Self {
            data_dir: env::var("TRACKER_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR)),
            signal_ttl: parse_var("TRACKER_SIGNAL_TTL_SECS")?.map(Duration::from_secs),
            debounce: parse_var("TRACKER_DEBOUNCE_MS")?.map(Duration::from_millis),
            extractor_config: env::var("TRACKER_EXTRACTOR_CONFIG").ok().map(PathBuf::from),
        })
    }

    pub fn storage_path(&self) -> PathBuf {
        self.data_dir.join(STORAGE_FILE)
    }

    pub fn relay_config(&self) -> RelayConfig {
        match self.signal_ttl {
            Some(ttl) => RelayConfig::new().with_ttl(ttl),
            None => RelayConfig::default(),
        }
    }

    /// Extractor settings: defaults, then the TOML file, then the debounce
    /// variable.
    pub fn extractor_config(&self) -> Result<ExtractorConfig> {
        let config = match &self.extractor_config {
            Some(path) => load_extractor_config(path)?,
            None => ExtractorConfig::default(),
        };

        Ok(match self.debounce {
            Some(debounce) => config.with_debounce(debounce),
            None => config,
        })
    }
}

fn parse_var(name: &str) -> Result<Option<u64>> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{name} must be a whole number, got `{raw}`")),
        Err(_) => Ok(None),
    }
}

fn load_extractor_config(path: &Path) -> Result<ExtractorConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    toml::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}
