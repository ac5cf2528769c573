//! Portfolio state: cash, holdings and the append-only trade history.
//!
//! Cash and holdings change only through [`Portfolio::apply_execution`].
//! Every key in `holdings` maps to a strictly positive quantity; a position
//! sold down to zero (or below) is removed from the map.

use std::collections::{BTreeMap, HashMap};

use super::error::SmatraderError;
use super::execution::Execution;
use super::order::Side;

#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    cash: f64,
    holdings: HashMap<String, i64>,
    trade_history: Vec<Execution>,
}

/// Point-in-time copy of a portfolio for reporting.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortfolioSnapshot {
    pub cash: f64,
    pub holdings: BTreeMap<String, i64>,
    pub trade_history: Vec<Execution>,
}

impl Portfolio {
    pub fn new(cash: f64) -> Self {
        Portfolio {
            cash,
            holdings: HashMap::new(),
            trade_history: Vec::new(),
        }
    }

    /// Start from existing positions. Non-positive quantities are dropped.
    pub fn with_holdings<I, S>(cash: f64, holdings: I) -> Self
    where
        I: IntoIterator<Item = (S, i64)>,
        S: Into<String>,
    {
        Portfolio {
            cash,
            holdings: holdings
                .into_iter()
                .filter(|(_, qty)| *qty > 0)
                .map(|(sym, qty)| (sym.into(), qty))
                .collect(),
            trade_history: Vec::new(),
        }
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn holdings(&self) -> &HashMap<String, i64> {
        &self.holdings
    }

    /// Held quantity for `symbol`, or `None` when not held.
    pub fn holding(&self, symbol: &str) -> Option<i64> {
        self.holdings.get(symbol).copied()
    }

    pub fn trade_history(&self) -> &[Execution] {
        &self.trade_history
    }

    /// Apply a fill to cash and holdings, then append it to the history.
    ///
    /// Selling a symbol that is not held, or buying past `i64::MAX` shares,
    /// is an invariant violation and leaves the portfolio untouched. No
    /// floor is applied to cash.
    pub fn apply_execution(&mut self, execution: Execution) -> Result<(), SmatraderError> {
        let value = execution.price() * execution.quantity() as f64;

        match execution.side() {
            Side::Buy => {
                let held = self.holding(execution.symbol()).unwrap_or(0);
                let updated = held.checked_add(execution.quantity()).ok_or_else(|| {
                    SmatraderError::HoldingOverflow {
                        symbol: execution.symbol().to_string(),
                    }
                })?;
                self.cash -= value;
                self.holdings.insert(execution.symbol().to_string(), updated);
            }
            Side::Sell => {
                let Some(held) = self.holdings.get_mut(execution.symbol()) else {
                    return Err(SmatraderError::UnknownHolding {
                        symbol: execution.symbol().to_string(),
                    });
                };
                *held -= execution.quantity();
                if *held <= 0 {
                    self.holdings.remove(execution.symbol());
                }
                self.cash += value;
            }
        }

        self.trade_history.push(execution);
        Ok(())
    }

    /// cash + sum(quantity * price) over all holdings. Every held symbol
    /// must have an entry in `prices`.
    pub fn total_value(&self, prices: &HashMap<String, f64>) -> Result<f64, SmatraderError> {
        let mut total = self.cash;
        for (symbol, qty) in &self.holdings {
            let price = prices
                .get(symbol)
                .ok_or_else(|| SmatraderError::MissingPrice {
                    symbol: symbol.clone(),
                })?;
            total += *qty as f64 * price;
        }
        Ok(total)
    }

    pub fn snapshot(&self) -> PortfolioSnapshot {
        PortfolioSnapshot {
            cash: self.cash,
            holdings: self
                .holdings
                .iter()
                .map(|(k, v)| (k.clone(), *v))
                .collect(),
            trade_history: self.trade_history.clone(),
        }
    }
}
