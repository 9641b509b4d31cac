//! Performance ranker: fetch, measure, sort, truncate.
//!
//! Per-ticker failures never abort a run. Each fetch lands in a partial-result
//! accumulator as either a `PerformanceRecord` or an `Exclusion`; only an
//! invalid request or a run where every ticker was excluded is an error.

use std::collections::BTreeSet;

use rayon::prelude::*;
use thiserror::Error;

use crate::data::{DataError, PriceSource};
use crate::domain::{
    Exclusion, ExclusionReason, Leaderboard, PerformanceRecord, PriceSeries, RankOutcome, Ticker,
};

#[derive(Debug, Error)]
pub enum RankError {
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("no price data available for any of the {} requested ticker(s)", .excluded.len())]
    NoDataAvailable { excluded: Vec<Exclusion> },
}

/// Longest accepted lookback in trading days, roughly twenty years.
pub const MAX_LOOKBACK_DAYS: u32 = 5000;

/// A validated ranking request. Tickers are de-duplicated and sorted.
#[derive(Debug, Clone, PartialEq)]
pub struct RankRequest {
    tickers: Vec<Ticker>,
    lookback_days: u32,
    top_n: usize,
}

impl RankRequest {
    pub fn new(
        tickers: impl IntoIterator<Item = Ticker>,
        lookback_days: u32,
        top_n: usize,
    ) -> Result<Self, RankError> {
        if lookback_days < 1 {
            return Err(RankError::InvalidParameters(
                "lookback_days must be at least 1".into(),
            ));
        }
        if lookback_days > MAX_LOOKBACK_DAYS {
            return Err(RankError::InvalidParameters(format!(
                "lookback_days must be at most {MAX_LOOKBACK_DAYS}"
            )));
        }
        if top_n < 1 {
            return Err(RankError::InvalidParameters("top_n must be at least 1".into()));
        }
        let tickers: Vec<Ticker> = tickers
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if tickers.is_empty() {
            return Err(RankError::InvalidParameters("ticker set is empty".into()));
        }
        Ok(Self {
            tickers,
            lookback_days,
            top_n,
        })
    }

    /// Parse raw symbols; any unparseable symbol rejects the whole request.
    pub fn from_symbols<S: AsRef<str>>(
        symbols: &[S],
        lookback_days: u32,
        top_n: usize,
    ) -> Result<Self, RankError> {
        let tickers = symbols
            .iter()
            .map(|s| Ticker::parse(s.as_ref()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(RankError::InvalidParameters)?;
        Self::new(tickers, lookback_days, top_n)
    }

    pub fn tickers(&self) -> &[Ticker] {
        &self.tickers
    }

    pub fn lookback_days(&self) -> u32 {
        self.lookback_days
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankerOptions {
    /// Upper bound on concurrent fetches. 1 means strictly sequential.
    pub max_concurrency: usize,
}

impl Default for RankerOptions {
    fn default() -> Self {
        Self { max_concurrency: 8 }
    }
}

/// Successes and exclusions gathered from independent fetches.
#[derive(Debug, Default)]
struct Tally {
    records: Vec<PerformanceRecord>,
    excluded: Vec<Exclusion>,
}

impl Tally {
    fn absorb(&mut self, ticker: Ticker, fetched: Result<PriceSeries, DataError>, lookback_days: u32) {
        let series = match fetched {
            Ok(series) => series.window(lookback_days),
            Err(e) => {
                tracing::warn!(%ticker, error = %e, "excluding ticker: fetch failed");
                self.excluded.push(Exclusion {
                    ticker,
                    reason: ExclusionReason::FetchFailed {
                        message: e.to_string(),
                    },
                });
                return;
            }
        };

        let points = series.len();
        match PerformanceRecord::from_series(series) {
            Some(record) => self.records.push(record),
            None => {
                tracing::warn!(%ticker, points, "excluding ticker: insufficient data");
                self.excluded.push(Exclusion {
                    ticker,
                    reason: ExclusionReason::InsufficientData { points },
                });
            }
        }
    }
}

pub struct Ranker<S> {
    source: S,
    options: RankerOptions,
}

impl<S: PriceSource> Ranker<S> {
    pub fn new(source: S, options: RankerOptions) -> Self {
        Self { source, options }
    }

    /// Rank the request's tickers. Re-fetches every time.
    pub fn rank(&self, request: &RankRequest) -> Result<RankOutcome, RankError> {
        let lookback = request.lookback_days();
        let fetched = self.fetch_all(request.tickers(), lookback);

        let mut tally = Tally::default();
        for (ticker, result) in fetched {
            tally.absorb(ticker, result, lookback);
        }
        tally.excluded.sort_by(|a, b| a.ticker.cmp(&b.ticker));

        if tally.records.is_empty() {
            tracing::warn!(
                requested = request.tickers().len(),
                source = self.source.name(),
                "no ticker produced usable data"
            );
            return Err(RankError::NoDataAvailable {
                excluded: tally.excluded,
            });
        }

        let valid = tally.records.len();
        let leaderboard = Leaderboard::from_records(tally.records, request.top_n());
        tracing::info!(
            requested = request.tickers().len(),
            valid,
            excluded = tally.excluded.len(),
            shown = leaderboard.len(),
            lookback_days = lookback,
            "ranking complete"
        );

        Ok(RankOutcome {
            leaderboard,
            excluded: tally.excluded,
            requested: request.tickers().len(),
        })
    }

    /// Fetch every ticker on a private bounded pool. Completion order does
    /// not matter; the caller sorts.
    fn fetch_all(
        &self,
        tickers: &[Ticker],
        lookback_days: u32,
    ) -> Vec<(Ticker, Result<PriceSeries, DataError>)> {
        let fetch_one = |ticker: &Ticker| {
            tracing::debug!(%ticker, source = self.source.name(), "fetching series");
            (ticker.clone(), self.source.fetch_series(ticker, lookback_days))
        };

        let threads = self.options.max_concurrency.clamp(1, tickers.len().max(1));
        if threads == 1 {
            return tickers.iter().map(fetch_one).collect();
        }

        match rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("stockscout-fetch-{i}"))
            .build()
        {
            Ok(pool) => pool.install(|| tickers.par_iter().map(fetch_one).collect()),
            Err(e) => {
                tracing::warn!(error = %e, "fetch pool unavailable, fetching sequentially");
                tickers.iter().map(fetch_one).collect()
            }
        }
    }
}

/// One-shot ranking with default options.
pub fn rank<S: PriceSource>(
    source: S,
    tickers: impl IntoIterator<Item = Ticker>,
    lookback_days: u32,
    top_n: usize,
) -> Result<RankOutcome, RankError> {
    let request = RankRequest::new(tickers, lookback_days, top_n)?;
    Ranker::new(source, RankerOptions::default()).rank(&request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::StaticSource;

    fn t(s: &str) -> Ticker {
        Ticker::parse(s).unwrap()
    }

    #[test]
    fn request_deduplicates_case_insensitively() {
        let req = RankRequest::from_symbols(&["aapl", "AAPL", " msft"], 30, 5).unwrap();
        let symbols: Vec<&str> = req.tickers().iter().map(|t| t.as_str()).collect();
        assert_eq!(symbols, vec!["AAPL", "MSFT"]);
    }

    #[test]
    fn request_rejects_bad_parameters() {
        assert!(matches!(
            RankRequest::new(vec![t("A")], 0, 5),
            Err(RankError::InvalidParameters(_))
        ));
        assert!(matches!(
            RankRequest::new(vec![t("A")], MAX_LOOKBACK_DAYS + 1, 5),
            Err(RankError::InvalidParameters(_))
        ));
        assert!(matches!(
            RankRequest::new(vec![t("A")], u32::MAX, 5),
            Err(RankError::InvalidParameters(_))
        ));
        assert!(RankRequest::new(vec![t("A")], MAX_LOOKBACK_DAYS, 5).is_ok());
        assert!(matches!(
            RankRequest::new(vec![t("A")], 5, 0),
            Err(RankError::InvalidParameters(_))
        ));
        assert!(matches!(
            RankRequest::new(Vec::new(), 5, 5),
            Err(RankError::InvalidParameters(_))
        ));
        assert!(matches!(
            RankRequest::from_symbols(&["AAPL", ""], 5, 5),
            Err(RankError::InvalidParameters(_))
        ));
    }

    #[test]
    fn window_trims_history_before_measuring() {
        // lookback 2 → last three closes: 50, 100, 110
        let source = StaticSource::new().with_closes("X", &[10.0, 20.0, 50.0, 100.0, 110.0]);
        let outcome = rank(&source, vec![t("X")], 2, 1).unwrap();
        let rec = &outcome.leaderboard.entries()[0];
        assert_eq!(rec.start_price, 50.0);
        assert_eq!(rec.series.len(), 3);
    }

    #[test]
    fn exclusions_are_sorted_by_ticker() {
        let source = StaticSource::new()
            .with_closes("OK", &[1.0, 2.0])
            .with_failure("ZED", "timeout")
            .with_closes("ABC", &[1.0]);
        let outcome = rank(&source, vec![t("ZED"), t("OK"), t("ABC")], 5, 5).unwrap();
        let excluded: Vec<&str> = outcome.excluded.iter().map(|e| e.ticker.as_str()).collect();
        assert_eq!(excluded, vec!["ABC", "ZED"]);
        assert_eq!(outcome.retrieved(), 1);
        assert!(outcome.is_partial());
    }

    #[test]
    fn sequential_and_parallel_agree() {
        let mut source = StaticSource::new();
        let mut tickers = Vec::new();
        for i in 0..20 {
            let symbol = format!("T{i:02}");
            source = source.with_closes(&symbol, &[100.0, 100.0 + i as f64]);
            tickers.push(t(&symbol));
        }
        let request = RankRequest::new(tickers, 10, 5).unwrap();
        let seq = Ranker::new(&source, RankerOptions { max_concurrency: 1 })
            .rank(&request)
            .unwrap();
        let par = Ranker::new(&source, RankerOptions { max_concurrency: 6 })
            .rank(&request)
            .unwrap();
        assert_eq!(seq, par);
        assert_eq!(seq.leaderboard.entries()[0].ticker.as_str(), "T19");
    }
}
