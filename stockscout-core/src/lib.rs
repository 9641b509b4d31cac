//! StockScout Core: price sources, performance ranking, notifications.
//!
//! This crate holds everything the CLI and the dashboard share:
//! - Domain types (tickers, price series, performance records, leaderboards)
//! - Price sources (Yahoo Finance, CSV directory, in-memory)
//! - The performance ranker with its partial-result policy
//! - Series statistics for the detail view
//! - Notification formatting and desktop delivery
//! - TOML configuration

pub mod config;
pub mod data;
pub mod domain;
pub mod notify;
pub mod rank;
pub mod stats;

pub use config::{ConfigError, FetchConfig, NotifyConfig, ScoutConfig};
pub use domain::{
    parse_ticker_list, Exclusion, ExclusionReason, Leaderboard, PerformanceRecord, PricePoint,
    PriceSeries, RankOutcome, Ticker,
};
pub use notify::{
    format_pct, format_pct_precise, format_summary, notify_best_effort, DesktopNotifier, Notifier,
    NotifyError,
};
pub use rank::{rank, RankError, RankRequest, Ranker, RankerOptions, MAX_LOOKBACK_DAYS};
pub use stats::SeriesStats;
