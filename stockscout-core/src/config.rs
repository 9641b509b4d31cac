//! TOML configuration shared by the CLI and the dashboard.
//!
//! Every field has a default, so an empty file (or no file) is valid.
//! Command-line flags override whatever is loaded here.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::Universe;
use crate::domain::Ticker;
use crate::rank::MAX_LOOKBACK_DAYS;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoutConfig {
    /// Trailing trading days to measure over.
    pub lookback_days: u32,
    /// How many winners to report.
    pub top_n: usize,
    /// Explicit universe. `None` means the built-in default universe.
    pub tickers: Option<Vec<String>>,
    pub fetch: FetchConfig,
    pub notify: NotifyConfig,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            lookback_days: 30,
            top_n: 10,
            tickers: None,
            fetch: FetchConfig::default(),
            notify: NotifyConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Per-request HTTP timeout.
    pub timeout_secs: u64,
    /// Retries after the first attempt, with exponential backoff.
    pub max_retries: u32,
    /// Upper bound on concurrent fetches.
    pub max_concurrency: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_retries: 3,
            max_concurrency: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    pub title: String,
    pub timeout_ms: u32,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            title: "Top movers update".into(),
            timeout_ms: 10_000,
        }
    }
}

impl ScoutConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lookback_days < 1 {
            return Err(ConfigError::Invalid("lookback_days must be at least 1".into()));
        }
        if self.lookback_days > MAX_LOOKBACK_DAYS {
            return Err(ConfigError::Invalid(format!(
                "lookback_days must be at most {MAX_LOOKBACK_DAYS}"
            )));
        }
        if self.top_n < 1 {
            return Err(ConfigError::Invalid("top_n must be at least 1".into()));
        }
        if self.fetch.max_concurrency < 1 {
            return Err(ConfigError::Invalid("fetch.max_concurrency must be at least 1".into()));
        }
        if self.fetch.timeout_secs < 1 {
            return Err(ConfigError::Invalid("fetch.timeout_secs must be at least 1".into()));
        }
        if let Some(tickers) = &self.tickers {
            for raw in tickers {
                Ticker::parse(raw).map_err(ConfigError::Invalid)?;
            }
        }
        Ok(())
    }

    /// Configured tickers, or the given universe when none are configured.
    pub fn resolve_tickers(&self, universe: &Universe) -> Vec<Ticker> {
        match &self.tickers {
            Some(list) => list.iter().filter_map(|s| Ticker::parse(s).ok()).collect(),
            None => universe.tickers(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        let config = ScoutConfig::from_toml("").unwrap();
        assert_eq!(config, ScoutConfig::default());
        assert_eq!(config.lookback_days, 30);
        assert_eq!(config.top_n, 10);
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config = ScoutConfig::from_toml(
            r#"
            top_n = 5
            tickers = ["aapl", "nvda"]

            [fetch]
            max_concurrency = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.top_n, 5);
        assert_eq!(config.fetch.max_concurrency, 2);
        assert_eq!(config.fetch.timeout_secs, 30);
        assert_eq!(config.notify.title, "Top movers update");

        let tickers = config.resolve_tickers(&Universe::default_us());
        let symbols: Vec<&str> = tickers.iter().map(|t| t.as_str()).collect();
        assert_eq!(symbols, vec!["AAPL", "NVDA"]);
    }

    #[test]
    fn zero_lookback_is_invalid() {
        let err = ScoutConfig::from_toml("lookback_days = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn oversized_lookback_is_invalid() {
        let err = ScoutConfig::from_toml("lookback_days = 100000000").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(ScoutConfig::from_toml("lookback_days = 5000").is_ok());
    }

    #[test]
    fn zero_concurrency_is_invalid() {
        let err = ScoutConfig::from_toml("[fetch]\nmax_concurrency = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn unknown_types_fail_to_parse() {
        let err = ScoutConfig::from_toml("top_n = \"ten\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn default_universe_when_no_tickers() {
        let config = ScoutConfig::default();
        assert_eq!(config.resolve_tickers(&Universe::default_us()).len(), 50);
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scout.toml");
        std::fs::write(&path, "lookback_days = 14\n").unwrap();
        assert_eq!(ScoutConfig::from_file(&path).unwrap().lookback_days, 14);

        let missing = ScoutConfig::from_file(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Read { .. }));
    }
}
