//! Price source trait and structured error types.
//!
//! The `PriceSource` trait abstracts over where closes come from (Yahoo
//! Finance, a CSV directory, an in-memory map) so the ranker can be driven by
//! any of them and mocked in tests.

use thiserror::Error;

use crate::domain::{PriceSeries, Ticker};

/// Per-ticker fetch failures.
///
/// Any of these turns into an exclusion when it reaches the ranker. They are
/// displayable in both CLI and TUI contexts.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("hard stop: data provider has blocked requests (circuit breaker tripped)")]
    CircuitBreakerTripped,

    #[error("no local data for '{symbol}' in {dir}")]
    NoLocalData { symbol: String, dir: String },

    #[error("csv error: {0}")]
    Csv(String),

    #[error("data error: {0}")]
    Other(String),
}

/// Where closes come from.
///
/// Implementations must be usable from several fetch threads at once.
pub trait PriceSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Fetch at least `lookback_days` trading days of closes ending at the
    /// most recent available session. Returning more history is fine; the
    /// ranker trims to the window.
    fn fetch_series(&self, ticker: &Ticker, lookback_days: u32) -> Result<PriceSeries, DataError>;
}

impl<T: PriceSource + ?Sized> PriceSource for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch_series(&self, ticker: &Ticker, lookback_days: u32) -> Result<PriceSeries, DataError> {
        (**self).fetch_series(ticker, lookback_days)
    }
}

impl<T: PriceSource + ?Sized> PriceSource for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch_series(&self, ticker: &Ticker, lookback_days: u32) -> Result<PriceSeries, DataError> {
        (**self).fetch_series(ticker, lookback_days)
    }
}
