//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub market: MarketConfig,

    #[serde(default)]
    pub persistence: PersistenceConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Market settings applied at startup
#[derive(Debug, Clone, Deserialize)]
pub struct MarketConfig {
    #[serde(default)]
    pub currency_scoreboard: String,

    #[serde(default = "default_max_page_listings")]
    pub max_page_listings: usize,

    #[serde(default)]
    pub show_expired: bool,
}

fn default_max_page_listings() -> usize {
    crate::settings::DEFAULT_PAGE_LISTINGS
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            currency_scoreboard: String::new(),
            max_page_listings: default_max_page_listings(),
            show_expired: false,
        }
    }
}

/// Where the market is dumped between runs
#[derive(Debug, Clone, Deserialize)]
pub struct PersistenceConfig {
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,
}

fn default_snapshot_path() -> String {
    dirs::data_local_dir()
        .map(|p| {
            p.join("auctionhouse")
                .join("snapshot.json")
                .to_string_lossy()
                .to_string()
        })
        .unwrap_or_else(|| "./auctionhouse_data/snapshot.json".to_string())
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
        }
    }
}

impl PersistenceConfig {
    /// Snapshot location with a leading `~/` expanded
    pub fn snapshot_path(&self) -> PathBuf {
        match self.snapshot_path.strip_prefix("~/") {
            Some(rest) => dirs::home_dir()
                .map(|home| home.join(rest))
                .unwrap_or_else(|| PathBuf::from(&self.snapshot_path)),
            None => PathBuf::from(&self.snapshot_path),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("auctionhouse").join("config.toml")),
            Some(PathBuf::from("./auctionhouse.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        // Fall back to environment-only config
        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Market overrides
        if let Some(scoreboard) = lookup("AUCTION_CURRENCY_SCOREBOARD") {
            self.market.currency_scoreboard = scoreboard;
        }
        if let Some(max) = lookup("AUCTION_MAX_PAGE_LISTINGS") {
            if let Ok(n) = max.parse() {
                self.market.max_page_listings = n;
            }
        }
        if let Some(show) = lookup("AUCTION_SHOW_EXPIRED") {
            if let Ok(b) = show.parse() {
                self.market.show_expired = b;
            }
        }

        // Persistence overrides
        if let Some(path) = lookup("AUCTION_SNAPSHOT_PATH") {
            self.persistence.snapshot_path = path;
        }

        // Logging overrides
        if let Some(level) = lookup("AUCTION_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("AUCTION_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Auction House Configuration
#
# Environment variables override these settings:
# - AUCTION_CURRENCY_SCOREBOARD
# - AUCTION_MAX_PAGE_LISTINGS
# - AUCTION_SHOW_EXPIRED
# - AUCTION_SNAPSHOT_PATH
# - AUCTION_LOG_LEVEL
# - AUCTION_LOG_FORMAT

[market]
# Scoreboard objective used as currency
currency_scoreboard = ""

# Listings per page when a query does not ask for a size (1-45)
max_page_listings = 27

# Show expired listings when browsing
show_expired = false

[persistence]
# JSON file the market is dumped to between runs
snapshot_path = "~/.local/share/auctionhouse/snapshot.json"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.market.max_page_listings, 27);
        assert!(!config.market.show_expired);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
        assert!(config.persistence.snapshot_path.ends_with("snapshot.json"));
    }

    #[test]
    fn test_generated_config_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.market.max_page_listings, 27);
        assert_eq!(
            config.persistence.snapshot_path,
            "~/.local/share/auctionhouse/snapshot.json"
        );
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::parse("[market]\nmax_page_listings = 9\n").unwrap();
        assert_eq!(config.market.max_page_listings, 9);
        assert_eq!(config.market.currency_scoreboard, "");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[market]\ncurrency_scoreboard = \"Coins\"\n[logging]\nformat = \"json\"\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.market.currency_scoreboard, "Coins");
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_load_errors() {
        let dir = tempdir().unwrap();

        let missing = Config::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));

        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[market\n").unwrap();
        let bad = Config::load(&path).unwrap_err();
        assert!(matches!(bad, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("AUCTION_MAX_PAGE_LISTINGS", "12"),
            ("AUCTION_SHOW_EXPIRED", "true"),
            ("AUCTION_SNAPSHOT_PATH", "/tmp/market.json"),
            ("AUCTION_LOG_LEVEL", "debug"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.market.max_page_listings, 12);
        assert!(config.market.show_expired);
        assert_eq!(config.persistence.snapshot_path(), PathBuf::from("/tmp/market.json"));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_unparseable_override_is_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|key| {
            (key == "AUCTION_MAX_PAGE_LISTINGS").then(|| "lots".to_string())
        });
        assert_eq!(config.market.max_page_listings, 27);
    }
}
