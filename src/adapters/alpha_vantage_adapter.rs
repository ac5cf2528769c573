//! Alpha Vantage daily price feed.
//!
//! Polls the `TIME_SERIES_DAILY` endpoint (compact output, the latest 100
//! bars) once per symbol. An HTTP 429 waits on an exponential backoff and
//! retries; any other response resets the wait. Error payloads and
//! malformed bodies become `Feed` errors, and bad data points are skipped.

use std::cell::Cell;
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;
use std::thread;
use std::time::Duration;

use chrono::NaiveDate;
use log::{info, warn};
use serde::Deserialize;

use crate::domain::error::SmatraderError;
use crate::domain::tick::PriceObservation;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::PriceFeed;

pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co/query";
pub const API_KEY_ENV: &str = "ALPHA_VANTAGE_API_KEY";

/// Daily series response. Either the series or an error message is present.
#[derive(Debug, Deserialize)]
struct DailyResponse {
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Time Series (Daily)")]
    series: Option<BTreeMap<String, HashMap<String, String>>>,
}

/// Rate-limit wait schedule: starts at `initial`, doubles per consecutive
/// 429 up to `max`, and drops to `reset_to` after any non-429 response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    current: Duration,
    max: Duration,
    reset_to: Duration,
}

impl Backoff {
    pub fn new(initial: Duration, max: Duration, reset_to: Duration) -> Self {
        Backoff {
            current: initial,
            max,
            reset_to,
        }
    }

    /// Wait to apply now; the following wait doubles, capped at `max`.
    pub fn next_wait(&mut self) -> Duration {
        let wait = self.current;
        self.current = (self.current * 2).min(self.max);
        wait
    }

    pub fn reset(&mut self) {
        self.current = self.reset_to;
    }

    pub fn current(&self) -> Duration {
        self.current
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Backoff::new(
            Duration::from_secs(5),
            Duration::from_secs(60),
            Duration::from_secs(1),
        )
    }
}

pub struct AlphaVantageAdapter {
    client: reqwest::blocking::Client,
    api_key: String,
    base_url: String,
    max_retries: u32,
    backoff: Cell<Backoff>,
}

impl AlphaVantageAdapter {
    pub fn new(api_key: impl Into<String>) -> Result<Self, SmatraderError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(missing_key());
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SmatraderError::Transport {
                reason: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            max_retries: 3,
            backoff: Cell::new(Backoff::default()),
        })
    }

    /// Build from `[live] api_key` / `[live] base_url`, falling back to the
    /// `ALPHA_VANTAGE_API_KEY` environment variable for the key.
    pub fn from_config(config: Option<&dyn ConfigPort>) -> Result<Self, SmatraderError> {
        let configured = config.and_then(|c| c.get_string("live", "api_key"));
        let api_key = resolve_api_key(configured, std::env::var(API_KEY_ENV).ok())?;

        let mut adapter = Self::new(api_key)?;
        if let Some(url) = config.and_then(|c| c.get_string("live", "base_url")) {
            adapter.base_url = url;
        }
        Ok(adapter)
    }

    pub fn backoff(&self) -> Backoff {
        self.backoff.get()
    }

    fn update_backoff<R>(&self, f: impl FnOnce(&mut Backoff) -> R) -> R {
        let mut backoff = self.backoff.get();
        let result = f(&mut backoff);
        self.backoff.set(backoff);
        result
    }
}

impl PriceFeed for AlphaVantageAdapter {
    fn fetch_ticks(&self, symbol: &str) -> Result<Vec<PriceObservation>, SmatraderError> {
        for attempt in 0..=self.max_retries {
            info!("fetching daily data for {}", symbol);
            let response = self
                .client
                .get(&self.base_url)
                .query(&[
                    ("function", "TIME_SERIES_DAILY"),
                    ("symbol", symbol),
                    ("outputsize", "compact"),
                    ("apikey", self.api_key.as_str()),
                ])
                .send()
                .map_err(|e| SmatraderError::Transport {
                    reason: format!("request for {} failed: {}", symbol, e),
                })?;

            let status = response.status();
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                let wait = self.update_backoff(Backoff::next_wait);
                if attempt == self.max_retries {
                    break;
                }
                warn!(
                    "rate limited on {}; waiting {}s before retrying",
                    symbol,
                    wait.as_secs()
                );
                thread::sleep(wait);
                continue;
            }

            self.update_backoff(Backoff::reset);

            if !status.is_success() {
                return Err(SmatraderError::Transport {
                    reason: format!("HTTP {} for {}", status, symbol),
                });
            }

            let body = response.text().map_err(|e| SmatraderError::Transport {
                reason: format!("failed to read response for {}: {}", symbol, e),
            })?;
            let ticks = parse_daily(symbol, &body)?;
            info!("processed {} ticks for {}", ticks.len(), symbol);
            return Ok(ticks);
        }

        Err(SmatraderError::Transport {
            reason: format!(
                "rate limited on {} after {} attempts",
                symbol,
                self.max_retries + 1
            ),
        })
    }
}

fn missing_key() -> SmatraderError {
    SmatraderError::ConfigMissing {
        section: "live".to_string(),
        key: "api_key".to_string(),
    }
}

/// Configured key first, then the environment. Blank values count as absent.
pub fn resolve_api_key(
    configured: Option<String>,
    env: Option<String>,
) -> Result<String, SmatraderError> {
    configured
        .into_iter()
        .chain(env)
        .map(|k| k.trim().to_string())
        .find(|k| !k.is_empty())
        .ok_or_else(missing_key)
}

/// Parse a `TIME_SERIES_DAILY` body into ticks sorted by timestamp.
pub fn parse_daily(symbol: &str, body: &str) -> Result<Vec<PriceObservation>, SmatraderError> {
    let response: DailyResponse =
        serde_json::from_str(body).map_err(|e| SmatraderError::Feed {
            reason: format!("malformed response for {}: {}", symbol, e),
        })?;

    if let Some(message) = response.error_message {
        return Err(SmatraderError::Feed {
            reason: format!("API error for {}: {}", symbol, message),
        });
    }

    let series = response.series.ok_or_else(|| SmatraderError::Feed {
        reason: format!("unexpected response format for {}: no daily series", symbol),
    })?;

    let mut ticks = Vec::with_capacity(series.len());
    for (date, values) in &series {
        match parse_point(symbol, date, values) {
            Ok(tick) => ticks.push(tick),
            Err(reason) => warn!("skipping {} data point {}: {}", symbol, date, reason),
        }
    }

    ticks.sort_by_key(|t| t.timestamp);
    Ok(ticks)
}

fn parse_point(
    symbol: &str,
    date: &str,
    values: &HashMap<String, String>,
) -> Result<PriceObservation, String> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|e| format!("invalid date: {}", e))?;

    Ok(PriceObservation::daily_bar(
        symbol,
        date,
        value(values, "1. open")?,
        value(values, "2. high")?,
        value(values, "3. low")?,
        value(values, "4. close")?,
        value(values, "5. volume")?,
    ))
}

fn value<T>(values: &HashMap<String, String>, key: &str) -> Result<T, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    values
        .get(key)
        .ok_or_else(|| format!("missing '{}'", key))?
        .trim()
        .parse()
        .map_err(|e| format!("invalid '{}': {}", key, e))
}
