use chrono::Duration;
use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::cache::DEFAULT_CACHE_PERIOD_SECS;

/// Environment variable overriding `cache.period_secs`.
pub const CACHE_PERIOD_ENV: &str = "CRUDSEL_CACHE_PERIOD_SECS";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub cache: CacheConfig,
  #[serde(default)]
  pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
  /// Age in seconds after which cached data counts as stale
  #[serde(default = "default_period_secs")]
  pub period_secs: u64,
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      period_secs: default_period_secs(),
    }
  }
}

impl CacheConfig {
  /// The cache period as a duration, saturating at the largest representable one.
  pub fn period(&self) -> Duration {
    i64::try_from(self.period_secs)
      .ok()
      .and_then(Duration::try_seconds)
      .unwrap_or(Duration::MAX)
  }
}

fn default_period_secs() -> u64 {
  DEFAULT_CACHE_PERIOD_SECS
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
  /// `tracing` filter directive; `RUST_LOG` takes precedence
  #[serde(default = "default_filter")]
  pub filter: String,
  /// Write logs to this file instead of stderr
  pub file: Option<PathBuf>,
}

impl Default for LogConfig {
  fn default() -> Self {
    Self {
      filter: default_filter(),
      file: None,
    }
  }
}

fn default_filter() -> String {
  "warn".to_string()
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./crudsel.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/crudsel/config.yaml
  ///
  /// With no file found the defaults are used. Environment overrides are
  /// applied last.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    let config = match path {
      Some(p) => Self::load_from_path(&p)?,
      None => Config::default(),
    };

    config.apply_overrides(|key| std::env::var(key).ok())
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("crudsel.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("crudsel").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    let config: Config = serde_yaml::from_str(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))?;

    Ok(config)
  }

  /// Apply environment overrides, looking variables up through `lookup`.
  pub fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    if let Some(raw) = lookup(CACHE_PERIOD_ENV) {
      self.cache.period_secs = raw
        .trim()
        .parse()
        .map_err(|e| eyre!("Invalid {} value '{}': {}", CACHE_PERIOD_ENV, raw, e))?;
    }
    Ok(self)
  }
}
