//! End-to-end tests of the price → signal → order → fill chain.
//!
//! Tests cover:
//! - Indicator scenarios with small windows
//! - Fill scenarios against a seeded execution engine
//! - Full session replay from a mock feed, including multi-symbol streams
//! - Inbound order messages validated at construction

mod common;

use approx::assert_abs_diff_eq;
use common::*;
use smatrader::adapters::memory_bus::MemoryBus;
use smatrader::domain::error::{OrderError, SmatraderError};
use smatrader::domain::event::{Channel, MarketEvent};
use smatrader::domain::execution::{Execution, ExecutionEngine, FillResult, RejectReason};
use smatrader::domain::indicator::WindowConfig;
use smatrader::domain::indicator::sma_cross::SmaCrossover;
use smatrader::domain::order::{Order, OrderRequest, Side};
use smatrader::domain::portfolio::Portfolio;
use smatrader::domain::session::{merge_streams, SessionConfig, TradingSession};
use smatrader::domain::signal::SignalKind;
use smatrader::ports::data_port::PriceFeed;

mod indicator_scenarios {
    use super::*;

    #[test]
    fn identical_windows_ramp_up() {
        let mut sma = SmaCrossover::new(3, 5);
        let mut shorts = Vec::new();
        let mut longs = Vec::new();
        for p in [10.0, 10.0, 20.0] {
            let (s, l) = sma.update(p);
            shorts.push(s);
            longs.push(l);
        }

        assert_abs_diff_eq!(shorts[0], 10.0);
        assert_abs_diff_eq!(shorts[1], 10.0);
        assert_abs_diff_eq!(shorts[2], 13.333333333, epsilon = 1e-6);
        assert_abs_diff_eq!(longs[2], 13.333333333, epsilon = 1e-6);
        assert_eq!(sma.detect_crossover(), None);
    }

    #[test]
    fn golden_cross_with_short_two_long_four() {
        let mut sma = SmaCrossover::new(2, 4);
        for p in [10.0, 10.0] {
            sma.update(p);
        }
        let (short, long) = sma.update(20.0);

        assert_abs_diff_eq!(short, 15.0);
        assert_abs_diff_eq!(long, 13.333333333, epsilon = 1e-6);
        assert_eq!(sma.detect_crossover(), Some(SignalKind::Buy));
    }
}

mod fill_scenarios {
    use super::*;

    fn seeded_engine() -> ExecutionEngine {
        let mut engine = ExecutionEngine::new();
        engine.set_market_price("AAPL", 150.0);
        engine.set_market_price("MSFT", 250.0);
        engine.set_market_price("GOOG", 2000.0);
        engine
    }

    #[test]
    fn buy_ten_aapl() {
        let engine = seeded_engine();
        let mut portfolio = Portfolio::new(10_000.0);
        let order = Order::market("AAPL", Side::Buy, 10).unwrap();

        let execution = engine.fill(&order, &mut portfolio).into_execution().unwrap();

        assert_eq!(execution.price(), 150.0);
        assert_abs_diff_eq!(portfolio.cash(), 8_500.0);
        assert_eq!(portfolio.holding("AAPL"), Some(10));
        assert_eq!(portfolio.trade_history().len(), 1);
    }

    #[test]
    fn selling_whole_msft_position_is_rejected() {
        // held quantity must exceed, not merely equal, the requested quantity
        let engine = seeded_engine();
        let mut portfolio = Portfolio::with_holdings(10_000.0, [("MSFT", 5)]);
        let order = Order::market("MSFT", Side::Sell, 5).unwrap();

        let result = engine.fill(&order, &mut portfolio);

        assert!(!result.is_filled());
        assert_eq!(portfolio.holding("MSFT"), Some(5));
        assert!(portfolio.trade_history().is_empty());
    }

    #[test]
    fn expensive_goog_buy_is_rejected() {
        let engine = seeded_engine();
        let mut portfolio = Portfolio::new(10_000.0);
        let order = Order::market("GOOG", Side::Buy, 100).unwrap();

        let result = engine.fill(&order, &mut portfolio);

        assert!(matches!(
            result,
            FillResult::Rejected(RejectReason::InsufficientCash { .. })
        ));
        assert_eq!(portfolio, Portfolio::new(10_000.0));
    }

    #[test]
    fn direct_sell_of_unheld_symbol_is_invariant_error() {
        let mut portfolio = Portfolio::new(10_000.0);
        let execution = Execution::new("manual", "TSLA", Side::Sell, 1, 200.0, 0);

        let err = portfolio.apply_execution(execution).unwrap_err();
        assert!(matches!(err, SmatraderError::UnknownHolding { .. }));
        assert_eq!(portfolio, Portfolio::new(10_000.0));
    }

    #[test]
    fn inbound_order_message_is_validated() {
        let bad = OrderRequest::market("AAPL", "BUY", 0);
        assert_eq!(
            Order::try_from(bad),
            Err(OrderError::NonPositiveQuantity(0))
        );

        let mut limit = OrderRequest::market("AAPL", "BUY", 1);
        limit.order_type = "LIMIT".into();
        limit.price = Some(1.0);
        let order = Order::try_from(limit).unwrap();

        // filled at market, not at the limit price
        let engine = seeded_engine();
        let mut portfolio = Portfolio::new(10_000.0);
        let execution = engine.fill(&order, &mut portfolio).into_execution().unwrap();
        assert_eq!(execution.price(), 150.0);
    }
}

mod session_replay {
    use super::*;

    fn config(short: usize, long: usize, cash: f64, qty: i64) -> SessionConfig {
        SessionConfig {
            windows: WindowConfig { short, long },
            initial_cash: cash,
            order_quantity: qty,
        }
    }

    #[test]
    fn replay_from_mock_feed() {
        let feed = MockFeed::new().with_prices("IBM", "2024-01-01", &[10.0, 10.0, 20.0, 25.0]);
        let ticks = feed.fetch_ticks("IBM").unwrap();

        let mut session = TradingSession::from_config(&config(2, 4, 10_000.0, 10));
        let mut bus = MemoryBus::new();
        let summary = session.replay(ticks, &mut bus).unwrap();

        assert_eq!(summary.ticks, 4);
        assert_eq!(summary.fills, 1);
        assert_eq!(session.portfolio().holding("IBM"), Some(10));

        let executions: Vec<_> = bus
            .on_channel(Channel::Executions)
            .filter_map(|e| match e {
                MarketEvent::Execution(x) => Some(x.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(executions.len(), 1);
        assert_eq!(executions[0].timestamp(), date_ts(2024, 1, 3));
        assert_eq!(executions[0].pnl(), 0.0);
    }

    #[test]
    fn messages_follow_control_flow_order() {
        let feed = MockFeed::new().with_prices("IBM", "2024-01-01", &[10.0, 10.0, 20.0]);
        let mut session = TradingSession::from_config(&config(2, 4, 10_000.0, 1));
        let mut bus = MemoryBus::new();
        session
            .replay(feed.fetch_ticks("IBM").unwrap(), &mut bus)
            .unwrap();

        let channels: Vec<_> = bus.events().iter().map(|e| e.channel()).collect();
        assert_eq!(
            channels,
            vec![
                Channel::MarketData,
                Channel::MarketData,
                Channel::MarketData,
                Channel::Signals,
                Channel::Orders,
                Channel::Executions,
            ]
        );
    }

    #[test]
    fn multi_symbol_replay_keeps_states_apart() {
        let feed = MockFeed::new()
            .with_prices("IBM", "2024-01-01", &[10.0, 10.0, 20.0, 5.0, 5.0])
            .with_prices("AAPL", "2024-01-01", &[100.0, 90.0, 80.0, 70.0, 60.0]);
        let symbols = vec!["IBM".to_string(), "AAPL".to_string()];

        let merged = merge_streams(feed.fetch_all(&symbols));
        assert_eq!(merged.len(), 10);

        let mut session = TradingSession::new(
            WindowConfig { short: 2, long: 4 },
            Portfolio::with_holdings(10_000.0, [("IBM", 50), ("AAPL", 50)]),
            smatrader::domain::policy::FixedQuantityPolicy::new(10),
        );
        let mut bus = MemoryBus::new();
        session.replay(merged, &mut bus).unwrap();

        // IBM: golden cross buys 10, death cross sells 10
        assert_eq!(session.portfolio().holding("IBM"), Some(50));
        // AAPL: falling from the second tick, one death cross
        assert_eq!(session.portfolio().holding("AAPL"), Some(40));
        assert_eq!(session.portfolio().trade_history().len(), 3);
    }

    #[test]
    fn feed_errors_skip_symbol() {
        let feed = MockFeed::new()
            .with_prices("IBM", "2024-01-01", &[1.0])
            .with_error("BAD", "connection refused");
        let symbols = vec!["IBM".to_string(), "BAD".to_string(), "EMPTY".to_string()];

        let all = feed.fetch_all(&symbols);
        assert_eq!(all.keys().collect::<Vec<_>>(), vec!["IBM"]);
    }

    fn date_ts(y: i32, m: u32, d: u32) -> i64 {
        smatrader::domain::tick::date_to_timestamp(date(y, m, d))
    }
}
