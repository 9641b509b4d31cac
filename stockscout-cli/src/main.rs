//! StockScout CLI: rank a ticker universe by recent performance.
//!
//! Prints the top movers as a table (or JSON) and optionally sends a desktop
//! notification summarizing them.
//!
//! Exit codes: 0 on success (partial data included), 1 when no ticker
//! produced usable data or on other fatal errors, 2 for invalid parameters.

mod report;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use stockscout_core::data::{CircuitBreaker, CsvSource, PriceSource, Universe, YahooSource};
use stockscout_core::{
    format_summary, notify_best_effort, DesktopNotifier, RankError, RankRequest, Ranker,
    RankerOptions, ScoutConfig, Ticker,
};

const EXIT_FAILURE: u8 = 1;
const EXIT_INVALID: u8 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "stockscout",
    version,
    about = "Rank stocks by recent performance."
)]
struct Cli {
    /// Lookback window in trading days.
    #[arg(long)]
    days: Option<u32>,

    /// How many tickers to display.
    #[arg(long)]
    top: Option<usize>,

    /// Universe of tickers to evaluate (space separated).
    #[arg(long, num_args = 1..)]
    tickers: Option<Vec<String>>,

    /// Send a desktop notification summarizing the top results.
    #[arg(long, default_value_t = false)]
    notify: bool,

    /// TOML config file (defaults for every flag above).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sector universe TOML used when no tickers are given.
    #[arg(long)]
    universe: Option<PathBuf>,

    /// Read closes from <DIR>/<TICKER>.csv instead of Yahoo Finance.
    #[arg(long, value_name = "DIR")]
    csv_dir: Option<PathBuf>,

    /// Print the outcome as JSON (includes trajectories).
    #[arg(long, default_value_t = false)]
    json: bool,

    /// More log output on stderr (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn run(cli: Cli) -> Result<u8> {
    let config = load_config(&cli)?;
    let universe = match &cli.universe {
        Some(path) => Universe::from_file(path)?,
        None => Universe::default_us(),
    };

    let tickers: Vec<Ticker> = match &cli.tickers {
        Some(raw) => match raw.iter().map(|s| Ticker::parse(s)).collect::<Result<Vec<_>, _>>() {
            Ok(list) => list,
            Err(reason) => return Ok(invalid(&reason)),
        },
        None => config.resolve_tickers(&universe),
    };

    let request = match RankRequest::new(tickers, config.lookback_days, config.top_n) {
        Ok(request) => request,
        Err(e) => return Ok(invalid(&e.to_string())),
    };

    let source: Box<dyn PriceSource> = match &cli.csv_dir {
        Some(dir) => Box::new(CsvSource::new(dir)),
        None => Box::new(YahooSource::new(
            &config.fetch,
            Arc::new(CircuitBreaker::default_provider()),
        )?),
    };
    tracing::info!(
        source = source.name(),
        tickers = request.tickers().len(),
        lookback_days = request.lookback_days(),
        top_n = request.top_n(),
        "ranking"
    );

    let ranker = Ranker::new(
        source,
        RankerOptions {
            max_concurrency: config.fetch.max_concurrency,
        },
    );

    let outcome = match ranker.rank(&request) {
        Ok(outcome) => outcome,
        Err(RankError::NoDataAvailable { excluded }) => {
            eprintln!(
                "No price data available for any of the {} requested ticker(s); check tickers or network connectivity.",
                excluded.len()
            );
            for line in report::exclusion_lines(&excluded) {
                eprintln!("  {line}");
            }
            return Ok(EXIT_FAILURE);
        }
        Err(e @ RankError::InvalidParameters(_)) => return Ok(invalid(&e.to_string())),
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!("{}", report::leaderboard_table(&outcome));
    }

    if let Some(warning) = report::partial_warning(&outcome) {
        eprintln!();
        eprintln!("WARNING: {warning}");
        for line in report::exclusion_lines(&outcome.excluded) {
            eprintln!("  {line}");
        }
    }

    if cli.notify {
        let notifier = DesktopNotifier::new(&config.notify);
        let body = format_summary(&outcome.leaderboard);
        if !notify_best_effort(&notifier, &config.notify.title, &body) {
            eprintln!("WARNING: desktop notification could not be delivered");
        }
    }

    Ok(0)
}

/// Config file values, overridden by flags. Range checks happen in `RankRequest`.
fn load_config(cli: &Cli) -> Result<ScoutConfig> {
    let mut config = match &cli.config {
        Some(path) => ScoutConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ScoutConfig::default(),
    };
    if let Some(days) = cli.days {
        config.lookback_days = days;
    }
    if let Some(top) = cli.top {
        config.top_n = top;
    }
    Ok(config)
}

fn invalid(reason: &str) -> u8 {
    eprintln!("Invalid input: {reason}");
    EXIT_INVALID
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config_defaults() {
        let cli = Cli::parse_from(["stockscout", "--days", "14", "--top", "3", "--tickers", "aapl", "msft"]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.lookback_days, 14);
        assert_eq!(config.top_n, 3);
        assert_eq!(cli.tickers.unwrap(), vec!["aapl", "msft"]);
        assert!(!cli.notify);
    }

    #[test]
    fn defaults_are_thirty_days_top_ten() {
        let cli = Cli::parse_from(["stockscout"]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.lookback_days, 30);
        assert_eq!(config.top_n, 10);
        assert!(cli.tickers.is_none());
    }

    #[test]
    fn zero_top_is_invalid_parameters() {
        let dir = std::env::temp_dir();
        let cli = Cli::parse_from([
            "stockscout",
            "--top",
            "0",
            "--tickers",
            "AAPL",
            "--csv-dir",
            dir.to_str().unwrap(),
        ]);
        assert_eq!(run(cli).unwrap(), EXIT_INVALID);
    }

    #[test]
    fn missing_csv_data_is_exit_one() {
        let dir = std::env::temp_dir().join(format!("stockscout_cli_empty_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let cli = Cli::parse_from([
            "stockscout",
            "--tickers",
            "AAPL",
            "--csv-dir",
            dir.to_str().unwrap(),
        ]);
        assert_eq!(run(cli).unwrap(), EXIT_FAILURE);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn csv_run_succeeds() {
        let dir = std::env::temp_dir().join(format!("stockscout_cli_csv_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("AAPL.csv"), "date,close\n2024-03-01,100\n2024-03-04,110\n").unwrap();
        let cli = Cli::parse_from([
            "stockscout",
            "--tickers",
            "AAPL",
            "MSFT",
            "--csv-dir",
            dir.to_str().unwrap(),
        ]);
        assert_eq!(run(cli).unwrap(), 0);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
