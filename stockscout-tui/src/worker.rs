//! Background worker thread: fetching and ranking run here.
//!
//! Communication with the TUI main thread is via `mpsc` channels. The
//! ranker owns its own bounded fetch pool, so the worker itself stays
//! single-threaded and handles one command at a time.

use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use stockscout_core::data::PriceSource;
use stockscout_core::{
    notify_best_effort, Exclusion, Notifier, RankError, RankOutcome, RankRequest, Ranker,
    RankerOptions, Ticker,
};

/// Commands sent from the TUI to the worker.
#[derive(Debug)]
pub enum WorkerCommand {
    Rank {
        tickers: Vec<Ticker>,
        lookback_days: u32,
        top_n: usize,
    },
    Notify {
        title: String,
        body: String,
    },
    Shutdown,
}

/// Why a ranking produced no leaderboard.
#[derive(Debug, Clone)]
pub enum RankFailure {
    InvalidParameters(String),
    NoDataAvailable(Vec<Exclusion>),
}

impl From<RankError> for RankFailure {
    fn from(e: RankError) -> Self {
        match e {
            RankError::InvalidParameters(reason) => RankFailure::InvalidParameters(reason),
            RankError::NoDataAvailable { excluded } => RankFailure::NoDataAvailable(excluded),
        }
    }
}

/// Responses sent from the worker back to the TUI.
#[derive(Debug, Clone)]
pub enum WorkerResponse {
    Ranked {
        outcome: Box<RankOutcome>,
        lookback_days: u32,
    },
    RankFailed(RankFailure),
    Notified {
        delivered: bool,
    },
}

/// Spawn the background worker thread.
pub fn spawn_worker(
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
    source: Box<dyn PriceSource>,
    notifier: Box<dyn Notifier + Send>,
    options: RankerOptions,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("stockscout-worker".into())
        .spawn(move || {
            let ranker = Ranker::new(source, options);
            worker_loop(rx, tx, &ranker, notifier.as_ref());
        })
}

fn worker_loop<S: PriceSource>(
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
    ranker: &Ranker<S>,
    notifier: &dyn Notifier,
) {
    loop {
        let resp = match rx.recv() {
            Ok(WorkerCommand::Shutdown) | Err(_) => break,
            Ok(WorkerCommand::Rank {
                tickers,
                lookback_days,
                top_n,
            }) => run_rank(ranker, tickers, lookback_days, top_n),
            Ok(WorkerCommand::Notify { title, body }) => WorkerResponse::Notified {
                delivered: notify_best_effort(notifier, &title, &body),
            },
        };
        // Main thread gone: nothing left to report to.
        if tx.send(resp).is_err() {
            break;
        }
    }
    tracing::debug!("worker stopped");
}

fn run_rank<S: PriceSource>(
    ranker: &Ranker<S>,
    tickers: Vec<Ticker>,
    lookback_days: u32,
    top_n: usize,
) -> WorkerResponse {
    let result = RankRequest::new(tickers, lookback_days, top_n).and_then(|req| ranker.rank(&req));
    match result {
        Ok(outcome) => WorkerResponse::Ranked {
            outcome: Box::new(outcome),
            lookback_days,
        },
        Err(e) => {
            tracing::warn!(error = %e, "ranking failed");
            WorkerResponse::RankFailed(e.into())
        }
    }
}
