//! Simulated order execution.
//!
//! Every order fills immediately and in full at the latest market price
//! known for its symbol. There is no book, no partial fill and no limit
//! logic: a LIMIT order's own price is never consulted.

use std::collections::HashMap;
use std::fmt;

use chrono::Utc;
use log::{error, info, warn};

use super::error::SmatraderError;
use super::order::{Order, Side};
use super::portfolio::Portfolio;

/// Record of a completed fill. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Execution {
    order_id: String,
    symbol: String,
    side: Side,
    quantity: i64,
    price: f64,
    timestamp: i64,
    pnl: f64,
}

impl Execution {
    pub fn new(
        order_id: impl Into<String>,
        symbol: impl Into<String>,
        side: Side,
        quantity: i64,
        price: f64,
        timestamp: i64,
    ) -> Self {
        Execution {
            order_id: order_id.into(),
            symbol: symbol.into(),
            side,
            quantity,
            price,
            timestamp,
            pnl: 0.0,
        }
    }

    /// Attach a caller-computed realized pnl. Fills produced by the engine
    /// always carry 0.
    pub fn with_pnl(mut self, pnl: f64) -> Self {
        self.pnl = pnl;
        self
    }

    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn pnl(&self) -> f64 {
        self.pnl
    }

    pub fn value(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

/// Why an order was not filled.
#[derive(Debug)]
pub enum RejectReason {
    NoMarketPrice,
    InsufficientHoldings { held: i64, requested: i64 },
    InsufficientCash { required: f64, available: f64 },
    PortfolioUpdate(SmatraderError),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::NoMarketPrice => write!(f, "no market price available"),
            RejectReason::InsufficientHoldings { held, requested } => {
                write!(f, "insufficient shares: hold {}, selling {}", held, requested)
            }
            RejectReason::InsufficientCash {
                required,
                available,
            } => write!(
                f,
                "insufficient cash: need {:.2}, have {:.2}",
                required, available
            ),
            RejectReason::PortfolioUpdate(err) => write!(f, "portfolio update failed: {}", err),
        }
    }
}

/// Outcome of a fill attempt. A rejection is an expected result, not an error.
#[derive(Debug)]
pub enum FillResult {
    Filled(Execution),
    Rejected(RejectReason),
}

impl FillResult {
    pub fn is_filled(&self) -> bool {
        matches!(self, FillResult::Filled(_))
    }

    pub fn execution(&self) -> Option<&Execution> {
        match self {
            FillResult::Filled(execution) => Some(execution),
            FillResult::Rejected(_) => None,
        }
    }

    pub fn into_execution(self) -> Option<Execution> {
        match self {
            FillResult::Filled(execution) => Some(execution),
            FillResult::Rejected(_) => None,
        }
    }
}

/// Fills orders against the latest price seen per symbol.
#[derive(Debug, Clone, Default)]
pub struct ExecutionEngine {
    latest_prices: HashMap<String, f64>,
}

impl ExecutionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_market_price(&mut self, symbol: &str, price: f64) {
        self.latest_prices.insert(symbol.to_string(), price);
    }

    pub fn market_price(&self, symbol: &str) -> Option<f64> {
        self.latest_prices.get(symbol).copied()
    }

    pub fn market_prices(&self) -> &HashMap<String, f64> {
        &self.latest_prices
    }

    /// Fill `order` now, stamping the execution with the wall clock.
    pub fn fill(&self, order: &Order, portfolio: &mut Portfolio) -> FillResult {
        self.fill_at(order, portfolio, Utc::now().timestamp())
    }

    /// Fill `order` with an explicit execution timestamp.
    ///
    /// A SELL requires the held quantity to strictly exceed the requested
    /// quantity, so closing an entire position in one order is rejected.
    /// A BUY requires cash >= price * quantity. A rejected fill leaves the
    /// portfolio unchanged.
    pub fn fill_at(&self, order: &Order, portfolio: &mut Portfolio, timestamp: i64) -> FillResult {
        let symbol = order.symbol();

        let Some(price) = self.market_price(symbol) else {
            warn!("cannot execute order {}: no price available for {}", order.id(), symbol);
            return FillResult::Rejected(RejectReason::NoMarketPrice);
        };

        match order.side() {
            Side::Sell => {
                let held = portfolio.holding(symbol).unwrap_or(0);
                if held <= order.quantity() {
                    warn!(
                        "cannot execute SELL order: insufficient shares of {} (hold {}, selling {})",
                        symbol,
                        held,
                        order.quantity()
                    );
                    return FillResult::Rejected(RejectReason::InsufficientHoldings {
                        held,
                        requested: order.quantity(),
                    });
                }
            }
            Side::Buy => {
                let cost = price * order.quantity() as f64;
                if portfolio.cash() < cost {
                    warn!(
                        "cannot execute BUY order: insufficient cash for {} {} (need {:.2}, have {:.2})",
                        order.quantity(),
                        symbol,
                        cost,
                        portfolio.cash()
                    );
                    return FillResult::Rejected(RejectReason::InsufficientCash {
                        required: cost,
                        available: portfolio.cash(),
                    });
                }
            }
        }

        let execution = Execution::new(
            order.id(),
            symbol,
            order.side(),
            order.quantity(),
            price,
            timestamp,
        );

        if let Err(e) = portfolio.apply_execution(execution.clone()) {
            error!("failed to update portfolio for order {}: {}", order.id(), e);
            return FillResult::Rejected(RejectReason::PortfolioUpdate(e));
        }

        info!(
            "executed {} order for {} shares of {} at ${:.2}",
            order.side(),
            order.quantity(),
            symbol,
            price
        );
        FillResult::Filled(execution)
    }
}
