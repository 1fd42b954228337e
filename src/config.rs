//! # Configuration
//!
//! Command-line flags with environment fallbacks. [`DirectoryConfig::load`] reads an
//! optional `.env` file first, so every flag can also live there:
//!
//! ```text
//! USER_DIRECTORY_BASE_URL=https://jsonplaceholder.typicode.com/users
//! USER_DIRECTORY_PAGE_SIZE=5
//! USER_DIRECTORY_DEFAULT_TOTAL=10
//! USER_DIRECTORY_SUPERSEDE=last-resolved
//! USER_DIRECTORY_TOAST_TTL_MS=3000
//! ```

use crate::model::DEFAULT_PAGE_SIZE;
use clap::{Parser, ValueEnum};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com/users";

/// Collection size assumed when a list response carries no usable count.
pub const DEFAULT_TOTAL_COUNT: u64 = 10;

/// What happens when a page fetch resolves after a newer one was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SupersedePolicy {
    /// Every resolution is applied as it arrives; the last one to resolve wins.
    #[default]
    #[value(name = "last-resolved")]
    LastResolvedWins,
    /// Only the most recently issued fetch may update the page; older ones are dropped.
    #[value(name = "latest-request")]
    LatestRequestWins,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Page size must be at least 1")]
    ZeroPageSize,
    #[error("Base url cannot carry a record path: {0}")]
    UnsupportedBaseUrl(String),
}

/// Settings for the console and its controller.
#[derive(Debug, Clone, Parser)]
#[command(name = "user-directory", version, about = "Browse and edit a remote user directory")]
pub struct DirectoryConfig {
    /// REST collection holding the users.
    #[arg(long, env = "USER_DIRECTORY_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: Url,

    /// Records per page.
    #[arg(long, env = "USER_DIRECTORY_PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,

    /// Total assumed when the list response has no count header.
    #[arg(long, env = "USER_DIRECTORY_DEFAULT_TOTAL", default_value_t = DEFAULT_TOTAL_COUNT)]
    pub default_total: u64,

    /// Handling of page fetches that resolve out of order.
    #[arg(long, env = "USER_DIRECTORY_SUPERSEDE", value_enum, default_value_t = SupersedePolicy::default())]
    pub supersede: SupersedePolicy,

    /// Milliseconds a notification stays visible.
    #[arg(long, env = "USER_DIRECTORY_TOAST_TTL_MS", default_value_t = 3000)]
    pub toast_ttl_ms: u64,
}

impl DirectoryConfig {
    /// Default settings pointed at `base_url`.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            page_size: DEFAULT_PAGE_SIZE,
            default_total: DEFAULT_TOTAL_COUNT,
            supersede: SupersedePolicy::default(),
            toast_ttl_ms: 3000,
        }
    }

    /// Parses flags and environment (after loading `.env`), then validates.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "Loaded environment file");
        }
        let config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        if self.base_url.cannot_be_a_base() {
            return Err(ConfigError::UnsupportedBaseUrl(self.base_url.to_string()));
        }
        Ok(())
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_supersede(mut self, supersede: SupersedePolicy) -> Self {
        self.supersede = supersede;
        self
    }

    pub fn with_default_total(mut self, default_total: u64) -> Self {
        self.default_total = default_total;
        self
    }

    pub fn toast_ttl(&self) -> Duration {
        Duration::from_millis(self.toast_ttl_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let config = DirectoryConfig::try_parse_from([
            "user-directory",
            "--base-url",
            "http://localhost:3000/users",
            "--page-size",
            "10",
            "--supersede",
            "latest-request",
        ])
        .unwrap();

        assert_eq!(config.base_url.as_str(), "http://localhost:3000/users");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.supersede, SupersedePolicy::LatestRequestWins);
        assert_eq!(config.default_total, DEFAULT_TOTAL_COUNT);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let config = DirectoryConfig::new(Url::parse("http://localhost/users").unwrap())
            .with_page_size(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroPageSize));
    }

    #[test]
    fn opaque_url_is_rejected() {
        let config = DirectoryConfig::new(Url::parse("mailto:users@example.com").unwrap());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnsupportedBaseUrl(_))
        ));
    }

    #[test]
    fn defaults_are_valid() {
        let config = DirectoryConfig::new(Url::parse(DEFAULT_BASE_URL).unwrap());
        assert!(config.validate().is_ok());
        assert_eq!(config.toast_ttl(), Duration::from_secs(3));
    }
}
