//! Domain error types.

/// Validation failure raised while constructing an [`Order`](super::order::Order).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderError {
    #[error("invalid order side '{0}' (expected BUY or SELL)")]
    InvalidSide(String),

    #[error("invalid order type '{0}' (expected MARKET or LIMIT)")]
    InvalidOrderType(String),

    #[error("order quantity must be positive, got {0}")]
    NonPositiveQuantity(i64),

    #[error("LIMIT order requires a price")]
    MissingLimitPrice,
}

/// Top-level error type for smatrader.
#[derive(Debug, thiserror::Error)]
pub enum SmatraderError {
    #[error(transparent)]
    InvalidOrder(#[from] OrderError),

    #[error("cannot sell {symbol}: symbol not held")]
    UnknownHolding { symbol: String },

    #[error("no current price for held symbol {symbol}")]
    MissingPrice { symbol: String },

    #[error("holding of {symbol} would exceed the maximum share count")]
    HoldingOverflow { symbol: String },

    #[error("feed error: {reason}")]
    Feed { reason: String },

    #[error("transport error: {reason}")]
    Transport { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("no price data for {symbol}")]
    NoData { symbol: String },
}

impl From<&SmatraderError> for std::process::ExitCode {
    fn from(err: &SmatraderError) -> Self {
        let code: u8 = match err {
            SmatraderError::ConfigParse { .. }
            | SmatraderError::ConfigMissing { .. }
            | SmatraderError::ConfigInvalid { .. } => 2,
            SmatraderError::Feed { .. } | SmatraderError::Transport { .. } => 3,
            SmatraderError::InvalidOrder(_)
            | SmatraderError::UnknownHolding { .. }
            | SmatraderError::MissingPrice { .. }
            | SmatraderError::HoldingOverflow { .. } => 4,
            SmatraderError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
