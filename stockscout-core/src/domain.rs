//! Domain types: tickers, price series, performance records, leaderboards.
//!
//! Everything here is created fresh per ranking call. Nothing is cached or
//! shared between calls.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A normalized ticker symbol (trimmed, upper-case).
///
/// Equality and ordering use the normalized form, so `"aapl"` and `" AAPL "`
/// are the same ticker.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    /// Normalize and validate a raw symbol.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let symbol = raw.trim().to_uppercase();
        if symbol.is_empty() {
            return Err("ticker symbol is empty".into());
        }
        if symbol.chars().any(|c| c.is_whitespace() || c == ',') {
            return Err(format!("ticker symbol '{symbol}' contains a separator"));
        }
        Ok(Self(symbol))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Ticker {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Ticker::parse(&value)
    }
}

impl From<Ticker> for String {
    fn from(t: Ticker) -> Self {
        t.0
    }
}

/// Split free text ("aapl, msft nvda") into tickers. Invalid fragments are skipped.
pub fn parse_ticker_list(text: &str) -> Vec<Ticker> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter_map(|s| Ticker::parse(s).ok())
        .collect()
}

/// One daily close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Chronologically ascending closes for one ticker.
///
/// Deserialization goes through [`PriceSeries::new`], so decoded series are
/// filtered and sorted the same way as built ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSeries")]
pub struct PriceSeries {
    pub ticker: Ticker,
    points: Vec<PricePoint>,
}

#[derive(Deserialize)]
struct RawSeries {
    ticker: Ticker,
    points: Vec<PricePoint>,
}

impl From<RawSeries> for PriceSeries {
    fn from(raw: RawSeries) -> Self {
        PriceSeries::new(raw.ticker, raw.points)
    }
}

impl PriceSeries {
    /// Build a series, sorting by date and dropping unusable closes
    /// (non-finite or non-positive).
    pub fn new(ticker: Ticker, mut points: Vec<PricePoint>) -> Self {
        points.retain(|p| p.close.is_finite() && p.close > 0.0);
        points.sort_by_key(|p| p.date);
        points.dedup_by_key(|p| p.date);
        Self { ticker, points }
    }

    pub fn empty(ticker: Ticker) -> Self {
        Self {
            ticker,
            points: Vec::new(),
        }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.close)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Trailing window for `lookback_days` trading days: the last
    /// `lookback_days + 1` points (the first one is the anchor close).
    pub fn window(&self, lookback_days: u32) -> PriceSeries {
        let keep = (lookback_days as usize).saturating_add(1);
        let start = self.points.len().saturating_sub(keep);
        PriceSeries {
            ticker: self.ticker.clone(),
            points: self.points[start..].to_vec(),
        }
    }
}

/// Performance of one ticker over the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    pub ticker: Ticker,
    pub start_price: f64,
    pub end_price: f64,
    /// Fractional change: 0.10 == +10%.
    pub pct_change: f64,
    pub series: PriceSeries,
}

impl PerformanceRecord {
    /// Derive a record from a windowed series. `None` when fewer than two
    /// points remain.
    pub fn from_series(series: PriceSeries) -> Option<Self> {
        if series.len() < 2 {
            return None;
        }
        let start_price = series.first()?.close;
        let end_price = series.last()?.close;
        // PriceSeries::new guarantees positive finite closes.
        let pct_change = (end_price - start_price) / start_price;
        Some(Self {
            ticker: series.ticker.clone(),
            start_price,
            end_price,
            pct_change,
            series,
        })
    }

    /// Leaderboard order: `pct_change` descending, then ticker ascending.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .pct_change
            .partial_cmp(&self.pct_change)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.ticker.cmp(&other.ticker))
    }
}

/// Ranked, truncated list of top performers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    entries: Vec<PerformanceRecord>,
}

impl Leaderboard {
    /// Sort records into leaderboard order and keep the best `top_n`.
    pub fn from_records(mut records: Vec<PerformanceRecord>, top_n: usize) -> Self {
        records.sort_by(|a, b| a.rank_cmp(b));
        records.truncate(top_n);
        Self { entries: records }
    }

    pub fn entries(&self) -> &[PerformanceRecord] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, ticker: &Ticker) -> Option<&PerformanceRecord> {
        self.entries.iter().find(|e| &e.ticker == ticker)
    }
}

/// Why a ticker was left out of the ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExclusionReason {
    FetchFailed { message: String },
    InsufficientData { points: usize },
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExclusionReason::FetchFailed { message } => write!(f, "data unavailable: {message}"),
            ExclusionReason::InsufficientData { points } => {
                write!(f, "insufficient data: {points} price point(s), need at least 2")
            }
        }
    }
}

/// A ticker omitted from the ranking, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exclusion {
    pub ticker: Ticker,
    pub reason: ExclusionReason,
}

/// Full result of a ranking call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankOutcome {
    pub leaderboard: Leaderboard,
    /// Sorted by ticker.
    pub excluded: Vec<Exclusion>,
    /// Size of the de-duplicated universe that was requested.
    pub requested: usize,
}

impl RankOutcome {
    /// Number of tickers that produced a valid record.
    pub fn retrieved(&self) -> usize {
        self.requested - self.excluded.len()
    }

    pub fn is_partial(&self) -> bool {
        !self.excluded.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn series(symbol: &str, closes: &[f64]) -> PriceSeries {
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint {
                date: date(i as u32 + 1),
                close,
            })
            .collect();
        PriceSeries::new(Ticker::parse(symbol).unwrap(), points)
    }

    #[test]
    fn ticker_normalizes_case_and_whitespace() {
        let a = Ticker::parse(" aapl ").unwrap();
        let b = Ticker::parse("AAPL").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "AAPL");
    }

    #[test]
    fn ticker_rejects_empty_and_separators() {
        assert!(Ticker::parse("   ").is_err());
        assert!(Ticker::parse("BRK B").is_err());
        assert!(Ticker::parse("A,B").is_err());
    }

    #[test]
    fn ticker_list_splits_commas_and_spaces() {
        let list = parse_ticker_list("aapl, msft  nvda,,");
        let symbols: Vec<&str> = list.iter().map(|t| t.as_str()).collect();
        assert_eq!(symbols, vec!["AAPL", "MSFT", "NVDA"]);
    }

    #[test]
    fn series_sorts_and_drops_bad_closes() {
        let t = Ticker::parse("X").unwrap();
        let s = PriceSeries::new(
            t,
            vec![
                PricePoint { date: date(3), close: 12.0 },
                PricePoint { date: date(1), close: 10.0 },
                PricePoint { date: date(2), close: f64::NAN },
                PricePoint { date: date(4), close: 0.0 },
            ],
        );
        let closes: Vec<f64> = s.closes().collect();
        assert_eq!(closes, vec![10.0, 12.0]);
    }

    #[test]
    fn decoded_series_drops_bad_closes() {
        let json = r#"{"ticker":"aapl","points":[
            {"date":"2024-03-02","close":110.0},
            {"date":"2024-03-01","close":100.0},
            {"date":"2024-03-03","close":0.0},
            {"date":"2024-03-04","close":-5.0}
        ]}"#;
        let s: PriceSeries = serde_json::from_str(json).unwrap();
        assert_eq!(s.ticker.as_str(), "AAPL");
        assert_eq!(s.closes().collect::<Vec<_>>(), vec![100.0, 110.0]);
        assert_eq!(s.first().unwrap().date, date(1));

        let round: PriceSeries = serde_json::from_str(&serde_json::to_string(&s).unwrap()).unwrap();
        assert_eq!(round, s);
    }

    #[test]
    fn window_keeps_anchor_plus_lookback() {
        let s = series("X", &[1.0, 2.0, 3.0, 4.0, 5.0]);
        let w = s.window(2);
        let closes: Vec<f64> = w.closes().collect();
        assert_eq!(closes, vec![3.0, 4.0, 5.0]);
        // Longer lookback than history keeps everything.
        assert_eq!(s.window(100).len(), 5);
    }

    #[test]
    fn pct_change_is_exact_for_ten_percent() {
        let rec = PerformanceRecord::from_series(series("X", &[100.0, 110.0])).unwrap();
        assert!((rec.pct_change - 0.10).abs() < 1e-12);
        assert_eq!(rec.start_price, 100.0);
        assert_eq!(rec.end_price, 110.0);
    }

    #[test]
    fn single_point_series_has_no_record() {
        assert!(PerformanceRecord::from_series(series("X", &[100.0])).is_none());
        assert!(PerformanceRecord::from_series(series("X", &[])).is_none());
    }

    #[test]
    fn leaderboard_breaks_ties_by_ticker() {
        let records = vec![
            PerformanceRecord::from_series(series("MSFT", &[100.0, 105.0])).unwrap(),
            PerformanceRecord::from_series(series("AAPL", &[200.0, 210.0])).unwrap(),
            PerformanceRecord::from_series(series("NVDA", &[100.0, 120.0])).unwrap(),
        ];
        let board = Leaderboard::from_records(records, 10);
        let order: Vec<&str> = board.entries().iter().map(|e| e.ticker.as_str()).collect();
        assert_eq!(order, vec!["NVDA", "AAPL", "MSFT"]);
    }

    #[test]
    fn exclusion_reason_display() {
        let r = ExclusionReason::InsufficientData { points: 1 };
        assert!(r.to_string().contains("1 price point"));
    }
}
