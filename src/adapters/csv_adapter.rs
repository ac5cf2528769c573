//! Historical CSV price feed.
//!
//! One file per symbol, `<base_path>/<SYMBOL>.csv`:
//!
//! ```text
//! date,open,high,low,close,volume
//! 2025-08-29,245.23,245.46,241.72,243.49,2967558
//! ```
//!
//! The close becomes the observation price. Rows that fail to parse are
//! skipped with a warning.

use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;
use csv::StringRecord;
use log::warn;

use crate::domain::error::SmatraderError;
use crate::domain::tick::PriceObservation;
use crate::ports::data_port::PriceFeed;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    fn parse_record(symbol: &str, record: &StringRecord) -> Result<PriceObservation, String> {
        let date = NaiveDate::parse_from_str(field(record, 0, "date")?, "%Y-%m-%d")
            .map_err(|e| format!("invalid date format: {}", e))?;
        let open: f64 = parse_field(record, 1, "open")?;
        let high: f64 = parse_field(record, 2, "high")?;
        let low: f64 = parse_field(record, 3, "low")?;
        let close: f64 = parse_field(record, 4, "close")?;
        let volume: i64 = parse_field(record, 5, "volume")?;

        Ok(PriceObservation::daily_bar(
            symbol, date, open, high, low, close, volume,
        ))
    }
}

fn field<'a>(record: &'a StringRecord, idx: usize, name: &str) -> Result<&'a str, String> {
    record
        .get(idx)
        .map(str::trim)
        .ok_or_else(|| format!("missing {} column", name))
}

fn parse_field<T>(record: &StringRecord, idx: usize, name: &str) -> Result<T, String>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    field(record, idx, name)?
        .parse()
        .map_err(|e| format!("invalid {} value: {}", name, e))
}

impl PriceFeed for CsvAdapter {
    fn fetch_ticks(&self, symbol: &str) -> Result<Vec<PriceObservation>, SmatraderError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| SmatraderError::Feed {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut ticks = Vec::new();

        for (row, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| SmatraderError::Feed {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;

            match Self::parse_record(symbol, &record) {
                Ok(tick) => ticks.push(tick),
                Err(reason) => warn!("skipping row {} of {}: {}", row + 1, path.display(), reason),
            }
        }

        ticks.sort_by_key(|t| t.timestamp);
        Ok(ticks)
    }
}
