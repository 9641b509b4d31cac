//! StockScout dashboard: three-panel terminal interface.
//!
//! Panels:
//! 1. Settings: ticker list, lookback days, top-N
//! 2. Top Performers: ranked leaderboard with exclusions
//! 3. Chart: trajectory and statistics of the selected ticker
//!
//! Fetching and ranking run on a background worker; the UI thread only
//! renders and handles keys. Logs go to a file in the user cache dir so
//! they never draw over the terminal.

mod app;
mod input;
mod theme;
mod ui;
mod worker;

use std::fs::File;
use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing_subscriber::EnvFilter;

use stockscout_core::data::{CircuitBreaker, CsvSource, PriceSource, Universe, YahooSource};
use stockscout_core::{DesktopNotifier, RankerOptions, ScoutConfig};

use crate::app::{AppState, SettingsState};
use crate::worker::WorkerCommand;

#[derive(Parser, Debug)]
#[command(
    name = "stockscout-tui",
    version,
    about = "Interactive top-performers dashboard."
)]
struct Args {
    /// TOML config file (initial settings, fetch and notify options).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sector universe TOML used when the config lists no tickers.
    #[arg(long)]
    universe: Option<PathBuf>,

    /// Read closes from <DIR>/<TICKER>.csv instead of Yahoo Finance.
    #[arg(long, value_name = "DIR")]
    csv_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let log_path = dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stockscout")
        .join("dashboard.log");
    init_file_logging(&log_path)?;

    let config = match &args.config {
        Some(path) => ScoutConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ScoutConfig::default(),
    };
    let universe = match &args.universe {
        Some(path) => Universe::from_file(path)?,
        None => Universe::default_us(),
    };

    let source: Box<dyn PriceSource> = match &args.csv_dir {
        Some(dir) => Box::new(CsvSource::new(dir)),
        None => Box::new(YahooSource::new(
            &config.fetch,
            Arc::new(CircuitBreaker::default_provider()),
        )?),
    };
    tracing::info!(source = source.name(), log = %log_path.display(), "dashboard starting");

    // Worker channels
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    let worker_handle = worker::spawn_worker(
        cmd_rx,
        resp_tx,
        source,
        Box::new(DesktopNotifier::new(&config.notify)),
        RankerOptions {
            max_concurrency: config.fetch.max_concurrency,
        },
    )
    .context("spawning worker thread")?;

    // Sidebar starts from the config; nothing carries over between sessions.
    let settings = SettingsState::new(
        &config.resolve_tickers(&universe),
        config.lookback_days,
        config.top_n,
    );
    let mut app = AppState::new(settings, config.notify.clone(), cmd_tx.clone(), resp_rx);
    app.request_refresh();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the main event loop
    let result = run_app(&mut terminal, &mut app);

    // Shutdown worker. An in-flight fetch finishes first.
    let _ = cmd_tx.send(WorkerCommand::Shutdown);
    let _ = worker_handle.join();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Route `tracing` to a log file. `RUST_LOG` overrides the `info` default.
fn init_file_logging(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        // 1. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Drain worker responses (non-blocking)
        while let Ok(resp) = app.worker_rx.try_recv() {
            app.apply_response(resp);
        }

        // 3. Poll for input events (50ms timeout for ~20 FPS tick)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        // 4. Check quit
        if !app.running {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_parse() {
        let args = Args::parse_from(["stockscout-tui", "--csv-dir", "data"]);
        assert_eq!(args.csv_dir, Some(PathBuf::from("data")));
        assert!(args.config.is_none());
    }
}
