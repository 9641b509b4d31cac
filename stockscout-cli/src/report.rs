//! Plain-text rendering of a ranking outcome.

use stockscout_core::{format_pct_precise, Exclusion, RankOutcome};

pub fn leaderboard_table(outcome: &RankOutcome) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:>4}  {:<8} {:>10} {:>10} {:>10}\n",
        "Rank", "Ticker", "Start", "End", "% Change"
    ));
    out.push_str(&format!("{}\n", "-".repeat(46)));
    for (i, entry) in outcome.leaderboard.entries().iter().enumerate() {
        out.push_str(&format!(
            "{:>4}  {:<8} {:>10.2} {:>10.2} {:>10}\n",
            i + 1,
            entry.ticker.as_str(),
            entry.start_price,
            entry.end_price,
            format_pct_precise(entry.pct_change)
        ));
    }
    out
}

pub fn exclusion_lines(excluded: &[Exclusion]) -> Vec<String> {
    excluded
        .iter()
        .map(|e| format!("excluded: {} ({})", e.ticker, e.reason))
        .collect()
}

/// "Retrieved data for 48 of 50 tickers..." when some tickers were excluded.
pub fn partial_warning(outcome: &RankOutcome) -> Option<String> {
    outcome.is_partial().then(|| {
        format!(
            "Retrieved data for {} of {} tickers. Some tickers may be invalid or unavailable.",
            outcome.retrieved(),
            outcome.requested
        )
    })
}
