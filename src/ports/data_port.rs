//! Price feed port.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use log::warn;

use crate::domain::error::SmatraderError;
use crate::domain::tick::PriceObservation;

/// Where price observations come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedMode {
    /// Polled REST feed.
    Live,
    /// Historical CSV files.
    Csv,
    /// Live first, with CSV data replacing it for any symbol it covers.
    Both,
}

impl FromStr for FeedMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "live" => Ok(FeedMode::Live),
            "csv" => Ok(FeedMode::Csv),
            "both" => Ok(FeedMode::Both),
            other => Err(format!("unknown feed mode '{}' (expected live, csv or both)", other)),
        }
    }
}

impl fmt::Display for FeedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedMode::Live => write!(f, "live"),
            FeedMode::Csv => write!(f, "csv"),
            FeedMode::Both => write!(f, "both"),
        }
    }
}

pub trait PriceFeed {
    /// All observations for `symbol`, sorted by ascending timestamp.
    fn fetch_ticks(&self, symbol: &str) -> Result<Vec<PriceObservation>, SmatraderError>;

    /// Fetch every symbol, skipping those that fail or return no data.
    fn fetch_all(&self, symbols: &[String]) -> BTreeMap<String, Vec<PriceObservation>> {
        let mut all = BTreeMap::new();
        for symbol in symbols {
            match self.fetch_ticks(symbol) {
                Ok(ticks) if ticks.is_empty() => {
                    warn!("no ticks extracted for {}", symbol);
                }
                Ok(ticks) => {
                    all.insert(symbol.clone(), ticks);
                }
                Err(e) => warn!("skipping {} ({})", symbol, e),
            }
        }
        all
    }
}
