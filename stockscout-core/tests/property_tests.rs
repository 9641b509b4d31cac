//! Property tests for leaderboard invariants.
//!
//! 1. Length never exceeds min(top_n, tickers with >= 2 usable points)
//! 2. Ordering is pct_change descending, ticker ascending on ties
//! 3. Every requested ticker is either eligible for ranking or excluded

use proptest::prelude::*;
use stockscout_core::data::StaticSource;
use stockscout_core::{rank, RankError, Ticker};

fn arb_closes() -> impl Strategy<Value = Vec<f64>> {
    // Coarse price grid so ties actually happen.
    prop::collection::vec((1u32..20).prop_map(|c| c as f64 * 5.0), 0..6)
}

fn arb_universe() -> impl Strategy<Value = Vec<(String, Vec<f64>)>> {
    prop::collection::vec(("[A-F]{1,2}", arb_closes()), 1..12)
}

proptest! {
    #[test]
    fn leaderboard_invariants(universe in arb_universe(), top_n in 1usize..8) {
        let mut source = StaticSource::new();
        let mut tickers = Vec::new();
        let mut last_closes = std::collections::BTreeMap::new();
        for (symbol, closes) in &universe {
            source = source.with_closes(symbol, closes);
            tickers.push(Ticker::parse(symbol).unwrap());
            // Later registrations of the same symbol win.
            last_closes.insert(symbol.clone(), closes.len());
        }
        let valid = last_closes.values().filter(|&&n| n >= 2).count();

        match rank(&source, tickers, 30, top_n) {
            Ok(outcome) => {
                let board = outcome.leaderboard.entries();
                prop_assert!(board.len() <= top_n.min(valid));
                prop_assert_eq!(board.len(), top_n.min(valid));
                prop_assert_eq!(outcome.requested, last_closes.len());
                prop_assert_eq!(outcome.requested - outcome.excluded.len(), valid);
                for pair in board.windows(2) {
                    let (a, b) = (&pair[0], &pair[1]);
                    prop_assert!(
                        a.pct_change > b.pct_change
                            || (a.pct_change == b.pct_change && a.ticker < b.ticker)
                    );
                }
            }
            Err(RankError::NoDataAvailable { excluded }) => {
                prop_assert_eq!(valid, 0);
                prop_assert_eq!(excluded.len(), last_closes.len());
            }
            Err(e) => prop_assert!(false, "unexpected error: {}", e),
        }
    }
}
