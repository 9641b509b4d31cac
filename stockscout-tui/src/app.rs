//! Application state: single-owner, main-thread only.
//!
//! All dashboard state lives here. Ranking runs on the worker thread and
//! comes back through `apply_response`.

use std::sync::mpsc::{Receiver, Sender};

use stockscout_core::{
    format_summary, parse_ticker_list, Exclusion, NotifyConfig, PerformanceRecord, RankOutcome,
    SeriesStats, Ticker,
};

use crate::worker::{RankFailure, WorkerCommand, WorkerResponse};

pub const DAYS_MIN: u32 = 7;
pub const DAYS_MAX: u32 = 90;
pub const TOP_MIN: usize = 5;
pub const TOP_MAX: usize = 20;

/// Which panel has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Settings,
    Leaderboard,
    Chart,
}

impl Panel {
    pub fn index(self) -> usize {
        match self {
            Panel::Settings => 0,
            Panel::Leaderboard => 1,
            Panel::Chart => 2,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        match i {
            0 => Some(Panel::Settings),
            1 => Some(Panel::Leaderboard),
            2 => Some(Panel::Chart),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Panel::Settings => "Settings",
            Panel::Leaderboard => "Top Performers",
            Panel::Chart => "Performance Chart",
        }
    }

    pub fn next(self) -> Panel {
        Panel::from_index((self.index() + 1) % 3).unwrap_or(Panel::Settings)
    }

    pub fn prev(self) -> Panel {
        Panel::from_index((self.index() + 2) % 3).unwrap_or(Panel::Settings)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// Sidebar field under the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    Tickers,
    Days,
    Top,
}

impl SettingsField {
    pub fn next(self) -> Self {
        match self {
            SettingsField::Tickers => SettingsField::Days,
            SettingsField::Days => SettingsField::Top,
            SettingsField::Top => SettingsField::Tickers,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            SettingsField::Tickers => SettingsField::Top,
            SettingsField::Days => SettingsField::Tickers,
            SettingsField::Top => SettingsField::Days,
        }
    }
}

/// Sidebar inputs: ticker text, lookback window, top-N.
#[derive(Debug, Clone)]
pub struct SettingsState {
    pub ticker_text: String,
    pub lookback_days: u32,
    pub top_n: usize,
    pub field: SettingsField,
    /// Typing into the ticker text box.
    pub editing: bool,
}

impl SettingsState {
    pub fn new(tickers: &[Ticker], lookback_days: u32, top_n: usize) -> Self {
        Self {
            ticker_text: tickers
                .iter()
                .map(|t| t.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            lookback_days: lookback_days.clamp(DAYS_MIN, DAYS_MAX),
            top_n: top_n.clamp(TOP_MIN, TOP_MAX),
            field: SettingsField::Tickers,
            editing: false,
        }
    }

    pub fn tickers(&self) -> Vec<Ticker> {
        parse_ticker_list(&self.ticker_text)
    }

    /// Nudge the numeric field under the cursor, clamped to its slider range.
    pub fn adjust(&mut self, delta: i64) {
        match self.field {
            SettingsField::Days => {
                let v = i64::from(self.lookback_days) + delta;
                self.lookback_days = v.clamp(i64::from(DAYS_MIN), i64::from(DAYS_MAX)) as u32;
            }
            SettingsField::Top => {
                let v = self.top_n as i64 + delta;
                self.top_n = v.clamp(TOP_MIN as i64, TOP_MAX as i64) as usize;
            }
            SettingsField::Tickers => {}
        }
    }
}

#[derive(Debug, Default)]
pub struct LeaderboardState {
    pub outcome: Option<RankOutcome>,
    pub cursor: usize,
    /// Lookback the current outcome was computed with.
    pub lookback_days: u32,
}

impl LeaderboardState {
    pub fn entries(&self) -> &[PerformanceRecord] {
        self.outcome
            .as_ref()
            .map(|o| o.leaderboard.entries())
            .unwrap_or(&[])
    }
}

pub struct AppState {
    pub running: bool,
    pub active_panel: Panel,
    pub settings: SettingsState,
    pub board: LeaderboardState,
    /// Ticker shown in the chart panel.
    pub selected: Option<Ticker>,
    pub status_message: Option<(String, StatusLevel)>,
    pub loading: bool,
    pub show_help: bool,
    /// Exclusions from the last failed run (NoDataAvailable).
    pub last_failure: Option<Vec<Exclusion>>,
    pub notify: NotifyConfig,
    pub worker_tx: Sender<WorkerCommand>,
    pub worker_rx: Receiver<WorkerResponse>,
}

impl AppState {
    pub fn new(
        settings: SettingsState,
        notify: NotifyConfig,
        worker_tx: Sender<WorkerCommand>,
        worker_rx: Receiver<WorkerResponse>,
    ) -> Self {
        Self {
            running: true,
            active_panel: Panel::Leaderboard,
            settings,
            board: LeaderboardState::default(),
            selected: None,
            status_message: None,
            loading: false,
            show_help: false,
            last_failure: None,
            notify,
            worker_tx,
            worker_rx,
        }
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Error));
    }

    /// Ask the worker for a fresh ranking with the current sidebar inputs.
    pub fn request_refresh(&mut self) {
        let tickers = self.settings.tickers();
        if tickers.is_empty() {
            self.set_warning("Please enter at least one ticker symbol.");
            return;
        }
        let cmd = WorkerCommand::Rank {
            tickers,
            lookback_days: self.settings.lookback_days,
            top_n: self.settings.top_n,
        };
        if self.worker_tx.send(cmd).is_err() {
            self.set_error("Background worker stopped; restart the dashboard.");
            return;
        }
        self.loading = true;
        self.set_status("Fetching latest stock data...");
    }

    /// Send the current leaderboard as a desktop notification.
    pub fn request_notify(&mut self) {
        let Some(outcome) = &self.board.outcome else {
            self.set_warning("Nothing to notify yet.");
            return;
        };
        let cmd = WorkerCommand::Notify {
            title: self.notify.title.clone(),
            body: format_summary(&outcome.leaderboard),
        };
        if self.worker_tx.send(cmd).is_err() {
            self.set_error("Background worker stopped; restart the dashboard.");
        }
    }

    pub fn apply_response(&mut self, resp: WorkerResponse) {
        match resp {
            WorkerResponse::Ranked {
                outcome,
                lookback_days,
            } => {
                self.loading = false;
                self.last_failure = None;
                if outcome.is_partial() {
                    self.set_warning(format!(
                        "Retrieved data for {} of {} tickers. Some tickers may be invalid or unavailable.",
                        outcome.retrieved(),
                        outcome.requested
                    ));
                } else {
                    self.set_status(format!("Successfully loaded {} stocks", outcome.requested));
                }
                self.board.lookback_days = lookback_days;
                self.board.cursor = 0;
                // Keep the chart on the same ticker if it is still on the board.
                let keep = self
                    .selected
                    .as_ref()
                    .filter(|t| outcome.leaderboard.get(t).is_some())
                    .cloned();
                self.selected = keep.or_else(|| {
                    outcome
                        .leaderboard
                        .entries()
                        .first()
                        .map(|e| e.ticker.clone())
                });
                self.board.outcome = Some(*outcome);
            }
            WorkerResponse::RankFailed(failure) => {
                self.loading = false;
                self.board.outcome = None;
                self.selected = None;
                match failure {
                    RankFailure::InvalidParameters(reason) => {
                        self.last_failure = None;
                        self.set_error(format!("Invalid input: {reason}"));
                    }
                    RankFailure::NoDataAvailable(excluded) => {
                        self.set_error(format!(
                            "Failed to load data: none of the {} ticker(s) returned prices; check tickers or network connectivity.",
                            excluded.len()
                        ));
                        self.last_failure = Some(excluded);
                    }
                }
            }
            WorkerResponse::Notified { delivered } => {
                if delivered {
                    self.set_status("Notification sent");
                } else {
                    self.set_warning("Desktop notification could not be delivered");
                }
            }
        }
    }

    pub fn cursor_down(&mut self) {
        let len = self.board.entries().len();
        if self.board.cursor + 1 < len {
            self.board.cursor += 1;
        }
    }

    pub fn cursor_up(&mut self) {
        self.board.cursor = self.board.cursor.saturating_sub(1);
    }

    /// Chart the leaderboard row under the cursor.
    pub fn select_cursor(&mut self) {
        if let Some(entry) = self.board.entries().get(self.board.cursor) {
            self.selected = Some(entry.ticker.clone());
        }
    }

    pub fn selected_record(&self) -> Option<&PerformanceRecord> {
        let ticker = self.selected.as_ref()?;
        self.board.outcome.as_ref()?.leaderboard.get(ticker)
    }

    pub fn selected_stats(&self) -> Option<SeriesStats> {
        SeriesStats::from_series(&self.selected_record()?.series)
    }
}
