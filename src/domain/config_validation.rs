//! Configuration validation.
//!
//! Validates all config fields before a session is built.

use log::warn;

use crate::domain::error::SmatraderError;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::FeedMode;

pub const DEFAULT_INITIAL_CASH: f64 = 10_000.0;
pub const DEFAULT_SHORT_WINDOW: i64 = 50;
pub const DEFAULT_LONG_WINDOW: i64 = 100;
pub const DEFAULT_ORDER_QUANTITY: i64 = 10;
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_SYMBOLS: &str = "IBM,AAPL,MSFT";
pub const DEFAULT_FEED_MODE: FeedMode = FeedMode::Live;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), SmatraderError> {
    validate_initial_cash(config)?;
    validate_windows(config)?;
    validate_order_quantity(config)?;
    validate_symbols(config)?;
    feed_mode(config)?;
    Ok(())
}

/// `[feed] mode`, or the default when the key is absent.
pub fn feed_mode(config: &dyn ConfigPort) -> Result<FeedMode, SmatraderError> {
    match config.get_string("feed", "mode") {
        None => Ok(DEFAULT_FEED_MODE),
        Some(raw) => raw.parse().map_err(|reason| SmatraderError::ConfigInvalid {
            section: "feed".to_string(),
            key: "mode".to_string(),
            reason,
        }),
    }
}

/// Split a comma-separated symbol list, trimming and upper-casing entries.
/// Empty entries are dropped; duplicates keep their first position.
pub fn parse_symbols(input: &str) -> Vec<String> {
    let mut symbols: Vec<String> = Vec::new();
    for raw in input.split(',') {
        let symbol = raw.trim().to_ascii_uppercase();
        if !symbol.is_empty() && !symbols.contains(&symbol) {
            symbols.push(symbol);
        }
    }
    symbols
}

fn validate_initial_cash(config: &dyn ConfigPort) -> Result<(), SmatraderError> {
    let value = config.get_double("portfolio", "initial_cash", DEFAULT_INITIAL_CASH);
    if value <= 0.0 {
        return Err(SmatraderError::ConfigInvalid {
            section: "portfolio".to_string(),
            key: "initial_cash".to_string(),
            reason: "initial_cash must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_windows(config: &dyn ConfigPort) -> Result<(), SmatraderError> {
    let short = config.get_int("indicator", "short_window", DEFAULT_SHORT_WINDOW);
    let long = config.get_int("indicator", "long_window", DEFAULT_LONG_WINDOW);

    for (key, value) in [("short_window", short), ("long_window", long)] {
        if value < 1 {
            return Err(SmatraderError::ConfigInvalid {
                section: "indicator".to_string(),
                key: key.to_string(),
                reason: format!("{} must be at least 1", key),
            });
        }
    }

    if short >= long {
        warn!(
            "short_window ({}) is not shorter than long_window ({}); crossovers will be inverted or absent",
            short, long
        );
    }
    Ok(())
}

fn validate_order_quantity(config: &dyn ConfigPort) -> Result<(), SmatraderError> {
    let value = config.get_int("policy", "order_quantity", DEFAULT_ORDER_QUANTITY);
    if value < 1 {
        return Err(SmatraderError::ConfigInvalid {
            section: "policy".to_string(),
            key: "order_quantity".to_string(),
            reason: "order_quantity must be at least 1".to_string(),
        });
    }
    Ok(())
}

fn validate_symbols(config: &dyn ConfigPort) -> Result<(), SmatraderError> {
    let symbols = config
        .get_string("feed", "symbols")
        .unwrap_or_else(|| DEFAULT_SYMBOLS.to_string());
    if parse_symbols(&symbols).is_empty() {
        return Err(SmatraderError::ConfigMissing {
            section: "feed".to_string(),
            key: "symbols".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    #[test]
    fn valid_config_passes() {
        let config = make_config(
            r#"
[portfolio]
initial_cash = 10000.0

[indicator]
short_window = 20
long_window = 50

[policy]
order_quantity = 5

[feed]
data_dir = data
symbols = IBM,AAPL
"#,
        );
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_config_uses_valid_defaults() {
        let config = make_config("");
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn non_positive_cash_rejected() {
        let config = make_config("[portfolio]\ninitial_cash = 0\n");
        let err = validate_config(&config).unwrap_err();
        assert!(
            matches!(err, SmatraderError::ConfigInvalid { ref key, .. } if key == "initial_cash")
        );
    }

    #[test]
    fn zero_short_window_rejected() {
        let config = make_config("[indicator]\nshort_window = 0\nlong_window = 10\n");
        let err = validate_config(&config).unwrap_err();
        assert!(
            matches!(err, SmatraderError::ConfigInvalid { ref key, .. } if key == "short_window")
        );
    }

    #[test]
    fn negative_long_window_rejected() {
        let config = make_config("[indicator]\nshort_window = 5\nlong_window = -1\n");
        let err = validate_config(&config).unwrap_err();
        assert!(
            matches!(err, SmatraderError::ConfigInvalid { ref key, .. } if key == "long_window")
        );
    }

    #[test]
    fn inverted_windows_allowed() {
        let config = make_config("[indicator]\nshort_window = 100\nlong_window = 50\n");
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn zero_order_quantity_rejected() {
        let config = make_config("[policy]\norder_quantity = 0\n");
        let err = validate_config(&config).unwrap_err();
        assert!(
            matches!(err, SmatraderError::ConfigInvalid { ref key, .. } if key == "order_quantity")
        );
    }

    #[test]
    fn blank_symbols_rejected() {
        let config = make_config("[feed]\nsymbols = , ,\n");
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, SmatraderError::ConfigMissing { ref key, .. } if key == "symbols"));
    }

    #[test]
    fn feed_mode_defaults_to_live() {
        assert_eq!(feed_mode(&make_config("")).unwrap(), FeedMode::Live);
        assert_eq!(
            feed_mode(&make_config("[feed]\nmode = CSV\n")).unwrap(),
            FeedMode::Csv
        );
    }

    #[test]
    fn unknown_feed_mode_rejected() {
        let config = make_config("[feed]\nmode = redis\n");
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, SmatraderError::ConfigInvalid { ref key, .. } if key == "mode"));
    }

    #[test]
    fn parse_symbols_normalises() {
        assert_eq!(
            parse_symbols(" ibm, AAPL ,,msft,IBM"),
            vec!["IBM", "AAPL", "MSFT"]
        );
        assert!(parse_symbols("").is_empty());
    }
}
