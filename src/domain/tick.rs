//! Price observation (tick) for a single symbol.

use chrono::{DateTime, NaiveDate, NaiveTime};

/// A single price observation as delivered by a feed.
///
/// `price` is the traded or closing price the engines act on; the optional
/// OHLC/volume fields are carried through for reporting only.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PriceObservation {
    pub symbol: String,
    pub price: f64,
    pub timestamp: i64,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub volume: Option<i64>,
}

impl PriceObservation {
    pub fn new(symbol: impl Into<String>, price: f64, timestamp: i64) -> Self {
        PriceObservation {
            symbol: symbol.into(),
            price,
            timestamp,
            open: None,
            high: None,
            low: None,
            volume: None,
        }
    }

    /// Build a daily bar observation: price is the close, timestamp is
    /// midnight UTC of `date`.
    pub fn daily_bar(
        symbol: impl Into<String>,
        date: NaiveDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: i64,
    ) -> Self {
        PriceObservation {
            symbol: symbol.into(),
            price: close,
            timestamp: date_to_timestamp(date),
            open: Some(open),
            high: Some(high),
            low: Some(low),
            volume: Some(volume),
        }
    }

    /// Calendar date (UTC) of the observation, if the timestamp is in range.
    pub fn date(&self) -> Option<NaiveDate> {
        DateTime::from_timestamp(self.timestamp, 0).map(|dt| dt.date_naive())
    }
}

pub fn date_to_timestamp(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}
