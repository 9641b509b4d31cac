//! In-memory price source for tests and offline demos.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};

use super::provider::{DataError, PriceSource};
use crate::domain::{PricePoint, PriceSeries, Ticker};

#[derive(Debug, Clone)]
enum Entry {
    Series(Vec<PricePoint>),
    Fails(String),
}

/// Map of ticker to canned closes or a canned failure. Unknown tickers fail
/// with `SymbolNotFound`.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    entries: HashMap<Ticker, Entry>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register consecutive daily closes ending on 2024-06-28.
    pub fn with_closes(mut self, symbol: &str, closes: &[f64]) -> Self {
        let end = NaiveDate::from_ymd_opt(2024, 6, 28).unwrap_or_default();
        let n = closes.len() as i64;
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint {
                date: end - Duration::days(n - 1 - i as i64),
                close,
            })
            .collect();
        self.insert(symbol, Entry::Series(points));
        self
    }

    pub fn with_failure(mut self, symbol: &str, message: &str) -> Self {
        self.insert(symbol, Entry::Fails(message.to_string()));
        self
    }

    fn insert(&mut self, symbol: &str, entry: Entry) {
        if let Ok(ticker) = Ticker::parse(symbol) {
            self.entries.insert(ticker, entry);
        }
    }
}

impl PriceSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    fn fetch_series(&self, ticker: &Ticker, _lookback_days: u32) -> Result<PriceSeries, DataError> {
        match self.entries.get(ticker) {
            Some(Entry::Series(points)) => Ok(PriceSeries::new(ticker.clone(), points.clone())),
            Some(Entry::Fails(message)) => Err(DataError::NetworkUnreachable(message.clone())),
            None => Err(DataError::SymbolNotFound {
                symbol: ticker.to_string(),
            }),
        }
    }
}
