//! Offline price source: one `<TICKER>.csv` per symbol with `date,close` columns.
//!
//! ```text
//! date,close
//! 2024-03-01,179.66
//! 2024-03-04,175.10
//! ```
//!
//! Extra columns are ignored, so a Yahoo "Download" export whose close column
//! is named `close` (any case) or `adj close` also works.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use super::provider::{DataError, PriceSource};
use crate::domain::{PricePoint, PriceSeries, Ticker};

pub struct CsvSource {
    dir: PathBuf,
}

impl CsvSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, ticker: &Ticker) -> PathBuf {
        self.dir.join(format!("{ticker}.csv"))
    }

    fn read(&self, ticker: &Ticker, path: &Path) -> Result<PriceSeries, DataError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| DataError::Csv(format!("{}: {e}", path.display())))?;

        let headers = reader
            .headers()
            .map_err(|e| DataError::Csv(format!("{}: {e}", path.display())))?
            .clone();
        let column = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.iter().any(|n| h.eq_ignore_ascii_case(n)))
        };
        let date_col = column(&["date"])
            .ok_or_else(|| DataError::Csv(format!("{}: no 'date' column", path.display())))?;
        let close_col = column(&["adj close", "adj_close", "close"])
            .ok_or_else(|| DataError::Csv(format!("{}: no 'close' column", path.display())))?;

        let mut points = Vec::new();
        for (line, record) in reader.records().enumerate() {
            let record = record.map_err(|e| DataError::Csv(format!("{}: {e}", path.display())))?;
            let (Some(date), Some(close)) = (record.get(date_col), record.get(close_col)) else {
                continue;
            };
            let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| {
                DataError::Csv(format!("{} row {}: bad date '{date}': {e}", path.display(), line + 2))
            })?;
            // Blank or "null" closes mark non-trading rows.
            if let Ok(close) = close.parse::<f64>() {
                points.push(PricePoint { date, close });
            }
        }

        Ok(PriceSeries::new(ticker.clone(), points))
    }
}

impl PriceSource for CsvSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch_series(&self, ticker: &Ticker, _lookback_days: u32) -> Result<PriceSeries, DataError> {
        let path = self.path_for(ticker);
        if !path.is_file() {
            return Err(DataError::NoLocalData {
                symbol: ticker.to_string(),
                dir: self.dir.display().to_string(),
            });
        }
        self.read(ticker, &path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticker(s: &str) -> Ticker {
        Ticker::parse(s).unwrap()
    }

    #[test]
    fn reads_date_close_columns() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("AAPL.csv"),
            "date,close\n2024-03-04,110\n2024-03-01,100\n2024-03-05,\n",
        )
        .unwrap();

        let source = CsvSource::new(dir.path());
        let series = source.fetch_series(&ticker("aapl"), 30).unwrap();
        let closes: Vec<f64> = series.closes().collect();
        assert_eq!(closes, vec![100.0, 110.0]);
    }

    #[test]
    fn prefers_adjusted_close_in_yahoo_exports() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("MSFT.csv"),
            "Date,Open,High,Low,Close,Adj Close,Volume\n\
             2024-03-01,1,1,1,400,398,10\n\
             2024-03-04,1,1,1,410,408,10\n",
        )
        .unwrap();

        let series = CsvSource::new(dir.path())
            .fetch_series(&ticker("MSFT"), 30)
            .unwrap();
        assert_eq!(series.first().unwrap().close, 398.0);
    }

    #[test]
    fn missing_file_is_no_local_data() {
        let dir = tempfile::tempdir().unwrap();
        let err = CsvSource::new(dir.path())
            .fetch_series(&ticker("NVDA"), 30)
            .unwrap_err();
        assert!(matches!(err, DataError::NoLocalData { .. }));
    }

    #[test]
    fn bad_date_is_a_csv_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("X.csv"), "date,close\n03/01/2024,10\n").unwrap();
        let err = CsvSource::new(dir.path())
            .fetch_series(&ticker("X"), 30)
            .unwrap_err();
        assert!(matches!(err, DataError::Csv(_)));
    }
}
