//! Market settings
//!
//! Runtime-adjustable values an operator can change while the market is
//! live. The query path reads the page size through `PageSizeSource` on
//! every call rather than caching it.

use crate::config::MarketConfig;
use thiserror::Error;

/// Smallest page an operator may configure
pub const MIN_PAGE_LISTINGS: usize = 1;
/// Largest page an operator may configure
pub const MAX_PAGE_LISTINGS: usize = 45;
/// Page size used when nothing is configured
pub const DEFAULT_PAGE_LISTINGS: usize = 27;

/// Supplies the page size used when a query does not set one
pub trait PageSizeSource {
    fn default_page_size(&self) -> usize;
}

/// Errors raised when an operator supplies an invalid setting
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("max page listings must be between {min} and {max}, got {value}")]
    MaxPageListingsOutOfRange { value: usize, min: usize, max: usize },

    #[error("currency scoreboard name must not be blank")]
    BlankScoreboard,
}

/// Operator settings for the market
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    currency_scoreboard: String,
    max_page_listings: usize,
    show_expired: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency_scoreboard: String::new(),
            max_page_listings: DEFAULT_PAGE_LISTINGS,
            show_expired: false,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build settings from config, falling back to defaults for bad values
    pub fn from_config(config: &MarketConfig) -> Self {
        let mut settings = Self::default();

        if let Err(e) = settings.set_max_page_listings(config.max_page_listings) {
            tracing::warn!(error = %e, "Ignoring configured page size, using {}", DEFAULT_PAGE_LISTINGS);
        }
        if !config.currency_scoreboard.trim().is_empty() {
            settings.currency_scoreboard = config.currency_scoreboard.trim().to_string();
        }
        settings.show_expired = config.show_expired;

        settings
    }

    pub fn currency_scoreboard(&self) -> &str {
        &self.currency_scoreboard
    }

    pub fn max_page_listings(&self) -> usize {
        self.max_page_listings
    }

    pub fn show_expired(&self) -> bool {
        self.show_expired
    }

    pub fn set_currency_scoreboard(&mut self, name: &str) -> Result<(), SettingsError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SettingsError::BlankScoreboard);
        }

        tracing::info!(scoreboard = %name, "Currency scoreboard updated");
        self.currency_scoreboard = name.to_string();
        Ok(())
    }

    pub fn set_max_page_listings(&mut self, value: usize) -> Result<(), SettingsError> {
        if !(MIN_PAGE_LISTINGS..=MAX_PAGE_LISTINGS).contains(&value) {
            return Err(SettingsError::MaxPageListingsOutOfRange {
                value,
                min: MIN_PAGE_LISTINGS,
                max: MAX_PAGE_LISTINGS,
            });
        }

        tracing::info!(max_page_listings = value, "Page size updated");
        self.max_page_listings = value;
        Ok(())
    }

    pub fn set_show_expired(&mut self, show: bool) {
        self.show_expired = show;
    }
}

impl PageSizeSource for Settings {
    fn default_page_size(&self) -> usize {
        self.max_page_listings
    }
}
