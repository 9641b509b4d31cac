//! Ticker universe: sector-organized symbol lists.
//!
//! Stored as TOML:
//!
//! ```toml
//! [sectors]
//! Technology = ["AAPL", "MSFT"]
//! Energy = ["XOM", "CVX"]
//! ```

use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::config::ConfigError;
use crate::domain::Ticker;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Universe {
    pub sectors: BTreeMap<String, Vec<String>>,
}

impl Universe {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let universe: Self = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        if universe.tickers().is_empty() {
            return Err(ConfigError::Invalid("universe contains no valid tickers".into()));
        }
        Ok(universe)
    }

    /// All valid tickers across sectors, de-duplicated and sorted.
    pub fn tickers(&self) -> Vec<Ticker> {
        self.sectors
            .values()
            .flatten()
            .filter_map(|s| Ticker::parse(s).ok())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Fifty liquid US large caps across sectors.
    pub fn default_us() -> Self {
        let groups: [(&str, &[&str]); 8] = [
            (
                "Technology",
                &[
                    "AAPL", "MSFT", "NVDA", "AVGO", "ADBE", "CRM", "CSCO", "INTC", "ORCL", "AMD",
                    "IBM", "QCOM", "TXN",
                ],
            ),
            ("Communication", &["GOOGL", "META", "NFLX", "DIS", "T", "VZ"]),
            (
                "Consumer",
                &["AMZN", "TSLA", "HD", "MCD", "NKE", "SBUX", "LOW", "WMT", "COST", "PG", "KO", "PEP"],
            ),
            ("Finance", &["JPM", "V", "MA", "BAC", "PYPL", "MS", "GS"]),
            ("Healthcare", &["UNH", "PFE", "ABBV", "DHR", "MDT", "BMY"]),
            ("Energy", &["XOM", "CVX"]),
            ("Industrials", &["UPS", "BA", "HON"]),
            ("Materials", &["LIN"]),
        ];

        let sectors = groups
            .iter()
            .map(|(name, tickers)| {
                (
                    name.to_string(),
                    tickers.iter().map(|t| t.to_string()).collect(),
                )
            })
            .collect();

        Self { sectors }
    }
}

impl Default for Universe {
    fn default() -> Self {
        Self::default_us()
    }
}
