//! Typed messages exchanged across the event boundary.

use std::fmt;

use super::execution::Execution;
use super::order::Order;
use super::signal::Signal;
use super::tick::PriceObservation;

/// Named channel a message is published on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Channel {
    MarketData,
    Signals,
    Orders,
    Executions,
}

impl Channel {
    pub const ALL: [Channel; 4] = [
        Channel::MarketData,
        Channel::Signals,
        Channel::Orders,
        Channel::Executions,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Channel::MarketData => "market_data",
            Channel::Signals => "signals",
            Channel::Orders => "orders",
            Channel::Executions => "executions",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum MarketEvent {
    Tick(PriceObservation),
    Signal(Signal),
    Order(Order),
    Execution(Execution),
}

impl MarketEvent {
    pub fn channel(&self) -> Channel {
        match self {
            MarketEvent::Tick(_) => Channel::MarketData,
            MarketEvent::Signal(_) => Channel::Signals,
            MarketEvent::Order(_) => Channel::Orders,
            MarketEvent::Execution(_) => Channel::Executions,
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            MarketEvent::Tick(t) => &t.symbol,
            MarketEvent::Signal(s) => &s.symbol,
            MarketEvent::Order(o) => o.symbol(),
            MarketEvent::Execution(e) => e.symbol(),
        }
    }
}
