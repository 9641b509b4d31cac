//! Descriptive statistics for one trajectory (dashboard detail view).

use serde::{Deserialize, Serialize};

use crate::domain::PriceSeries;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    pub highest: f64,
    pub lowest: f64,
    pub average: f64,
    /// Sample standard deviation of closes.
    pub volatility: f64,
    /// Fractional first-to-last return.
    pub total_return: f64,
    /// Last close minus first close.
    pub price_change: f64,
    pub trading_days: usize,
}

impl SeriesStats {
    /// `None` for fewer than two points.
    pub fn from_series(series: &PriceSeries) -> Option<Self> {
        let n = series.len();
        if n < 2 {
            return None;
        }
        let first = series.first()?.close;
        let last = series.last()?.close;

        let (mut highest, mut lowest, mut sum) = (f64::NEG_INFINITY, f64::INFINITY, 0.0);
        for close in series.closes() {
            highest = highest.max(close);
            lowest = lowest.min(close);
            sum += close;
        }
        let average = sum / n as f64;
        let variance = series
            .closes()
            .map(|c| (c - average).powi(2))
            .sum::<f64>()
            / (n - 1) as f64;

        Some(Self {
            highest,
            lowest,
            average,
            volatility: variance.sqrt(),
            total_return: (last - first) / first,
            price_change: last - first,
            trading_days: n,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PricePoint, Ticker};
    use chrono::NaiveDate;

    fn series(closes: &[f64]) -> PriceSeries {
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint {
                date: NaiveDate::from_ymd_opt(2024, 1, 1 + i as u32).unwrap(),
                close,
            })
            .collect();
        PriceSeries::new(Ticker::parse("X").unwrap(), points)
    }

    #[test]
    fn basic_stats() {
        let stats = SeriesStats::from_series(&series(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0])).unwrap();
        assert_eq!(stats.highest, 9.0);
        assert_eq!(stats.lowest, 2.0);
        assert!((stats.average - 5.0).abs() < 1e-12);
        // sample variance = 32 / 7
        assert!((stats.volatility - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
        assert!((stats.total_return - 3.5).abs() < 1e-12);
        assert_eq!(stats.price_change, 7.0);
        assert_eq!(stats.trading_days, 8);
    }

    #[test]
    fn too_short_has_no_stats() {
        assert!(SeriesStats::from_series(&series(&[1.0])).is_none());
    }
}
