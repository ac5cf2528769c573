#![allow(dead_code)]

use chrono::NaiveDate;
pub use smatrader::domain::tick::PriceObservation;
use smatrader::domain::error::SmatraderError;
use smatrader::ports::data_port::PriceFeed;
use std::collections::HashMap;

pub struct MockFeed {
    pub data: HashMap<String, Vec<PriceObservation>>,
    pub errors: HashMap<String, String>,
}

impl MockFeed {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_prices(mut self, symbol: &str, start: &str, prices: &[f64]) -> Self {
        self.data
            .insert(symbol.to_string(), daily_ticks(symbol, start, prices));
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl PriceFeed for MockFeed {
    fn fetch_ticks(&self, symbol: &str) -> Result<Vec<PriceObservation>, SmatraderError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(SmatraderError::Feed {
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(symbol).cloned().unwrap_or_default())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// One daily bar per price starting at `start`, close = price.
pub fn daily_ticks(symbol: &str, start: &str, prices: &[f64]) -> Vec<PriceObservation> {
    let start = NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap();
    prices
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            PriceObservation::daily_bar(
                symbol,
                start + chrono::Duration::days(i as i64),
                close - 1.0,
                close + 1.0,
                close - 2.0,
                close,
                1000,
            )
        })
        .collect()
}

/// Render ticks as a CSV feed file body.
pub fn csv_body(ticks: &[PriceObservation]) -> String {
    let mut body = String::from("date,open,high,low,close,volume\n");
    for t in ticks {
        body.push_str(&format!(
            "{},{},{},{},{},{}\n",
            t.date().unwrap().format("%Y-%m-%d"),
            t.open.unwrap(),
            t.high.unwrap(),
            t.low.unwrap(),
            t.price,
            t.volume.unwrap()
        ));
    }
    body
}
