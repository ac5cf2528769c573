//! Translation of signals into orders.

use super::error::OrderError;
use super::order::{Order, Side};
use super::signal::{Signal, SignalKind};

pub trait SignalPolicy {
    /// Order to submit for `signal`, or `None` to ignore it.
    fn order_for(&self, signal: &Signal) -> Result<Option<Order>, OrderError>;
}

/// Trade a fixed number of shares on every signal: BUY on a golden cross,
/// SELL on a death cross, as a market order stamped with the signal time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedQuantityPolicy {
    pub quantity: i64,
}

impl FixedQuantityPolicy {
    pub fn new(quantity: i64) -> Self {
        FixedQuantityPolicy { quantity }
    }
}

impl SignalPolicy for FixedQuantityPolicy {
    fn order_for(&self, signal: &Signal) -> Result<Option<Order>, OrderError> {
        let side = match signal.kind {
            SignalKind::Buy => Side::Buy,
            SignalKind::Sell => Side::Sell,
        };
        Order::market_at(&signal.symbol, side, self.quantity, signal.timestamp).map(Some)
    }
}
