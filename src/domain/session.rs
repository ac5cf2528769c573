//! Per-tick driver: price → indicator → signal → order → fill.
//!
//! A session owns the indicator bank, the execution engine and the
//! portfolio, and is driven by one sequential stream of observations.
//! Messages produced along the way go out through the `EventPort` handed
//! to each call.

use std::collections::BTreeMap;

use log::debug;

use super::error::SmatraderError;
use super::event::MarketEvent;
use super::execution::{ExecutionEngine, FillResult};
use super::indicator::{IndicatorBank, WindowConfig};
use super::policy::{FixedQuantityPolicy, SignalPolicy};
use super::portfolio::Portfolio;
use super::signal::{Signal, SignalData, SignalField};
use super::tick::PriceObservation;
use crate::ports::event_port::EventPort;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    pub windows: WindowConfig,
    pub initial_cash: f64,
    pub order_quantity: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            windows: WindowConfig::default(),
            initial_cash: 10_000.0,
            order_quantity: 10,
        }
    }
}

/// What a single observation did.
#[derive(Debug)]
pub struct TickOutcome {
    pub short_average: f64,
    pub long_average: f64,
    pub signal: Option<Signal>,
    pub fill: Option<FillResult>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub ticks: usize,
    pub signals: usize,
    pub fills: usize,
    pub rejections: usize,
}

pub struct TradingSession<P: SignalPolicy = FixedQuantityPolicy> {
    indicators: IndicatorBank,
    engine: ExecutionEngine,
    portfolio: Portfolio,
    policy: P,
}

impl TradingSession<FixedQuantityPolicy> {
    pub fn from_config(config: &SessionConfig) -> Self {
        TradingSession::new(
            config.windows,
            Portfolio::new(config.initial_cash),
            FixedQuantityPolicy::new(config.order_quantity),
        )
    }
}

impl<P: SignalPolicy> TradingSession<P> {
    pub fn new(windows: WindowConfig, portfolio: Portfolio, policy: P) -> Self {
        TradingSession {
            indicators: IndicatorBank::new(windows),
            engine: ExecutionEngine::new(),
            portfolio,
            policy,
        }
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    pub fn engine(&self) -> &ExecutionEngine {
        &self.engine
    }

    pub fn indicators(&self) -> &IndicatorBank {
        &self.indicators
    }

    pub fn into_portfolio(self) -> Portfolio {
        self.portfolio
    }

    /// Portfolio value marked at the latest price seen for each symbol.
    pub fn total_value(&self) -> Result<f64, SmatraderError> {
        self.portfolio.total_value(self.engine.market_prices())
    }

    /// Process one observation.
    ///
    /// Signals, orders and executions are published as they occur. A
    /// rejected fill is reported in the outcome, not as an error; errors
    /// come only from order validation or the transport.
    pub fn on_tick(
        &mut self,
        tick: &PriceObservation,
        bus: &mut dyn EventPort,
    ) -> Result<TickOutcome, SmatraderError> {
        let sma = self.indicators.engine_mut(&tick.symbol);
        let (short_average, long_average) = sma.update(tick.price);
        let crossover = sma.detect_crossover();

        self.engine.set_market_price(&tick.symbol, tick.price);

        let Some(kind) = crossover else {
            return Ok(TickOutcome {
                short_average,
                long_average,
                signal: None,
                fill: None,
            });
        };

        let data = SignalData::new()
            .with(SignalField::Price, tick.price)
            .with(SignalField::ShortAverage, short_average)
            .with(SignalField::LongAverage, long_average);
        let signal = Signal::new(&tick.symbol, kind, tick.timestamp).with_data(data);
        debug!("{} signal for {} at {}", kind, tick.symbol, tick.timestamp);
        bus.publish(&MarketEvent::Signal(signal.clone()))?;

        let fill = match self.policy.order_for(&signal)? {
            Some(order) => {
                bus.publish(&MarketEvent::Order(order.clone()))?;
                let result = self.engine.fill_at(&order, &mut self.portfolio, tick.timestamp);
                if let Some(execution) = result.execution() {
                    bus.publish(&MarketEvent::Execution(execution.clone()))?;
                }
                Some(result)
            }
            None => None,
        };

        Ok(TickOutcome {
            short_average,
            long_average,
            signal: Some(signal),
            fill,
        })
    }

    /// Publish and process every observation in order.
    pub fn replay<I>(&mut self, ticks: I, bus: &mut dyn EventPort) -> Result<ReplaySummary, SmatraderError>
    where
        I: IntoIterator<Item = PriceObservation>,
    {
        let mut summary = ReplaySummary::default();
        for tick in ticks {
            bus.publish(&MarketEvent::Tick(tick.clone()))?;
            let outcome = self.on_tick(&tick, bus)?;

            summary.ticks += 1;
            if outcome.signal.is_some() {
                summary.signals += 1;
            }
            match outcome.fill {
                Some(FillResult::Filled(_)) => summary.fills += 1,
                Some(FillResult::Rejected(_)) => summary.rejections += 1,
                None => {}
            }
        }
        Ok(summary)
    }
}

/// Interleave per-symbol streams into one stream ordered by timestamp.
/// Ties keep symbol order, then each stream's own order.
pub fn merge_streams(streams: BTreeMap<String, Vec<PriceObservation>>) -> Vec<PriceObservation> {
    let mut merged: Vec<PriceObservation> = streams.into_values().flatten().collect();
    merged.sort_by_key(|t| t.timestamp);
    merged
}
