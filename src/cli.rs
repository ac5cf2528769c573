//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::layered_feed::LayeredFeed;
use crate::adapters::memory_bus::MemoryBus;
use crate::domain::config_validation::{
    feed_mode, parse_symbols, validate_config, DEFAULT_DATA_DIR, DEFAULT_FEED_MODE,
    DEFAULT_INITIAL_CASH, DEFAULT_LONG_WINDOW, DEFAULT_ORDER_QUANTITY, DEFAULT_SHORT_WINDOW,
    DEFAULT_SYMBOLS,
};
use crate::domain::error::SmatraderError;
use crate::domain::event::Channel;
use crate::domain::indicator::WindowConfig;
use crate::domain::session::{merge_streams, SessionConfig, TradingSession};
use crate::domain::tick::PriceObservation;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::{FeedMode, PriceFeed};

#[derive(Parser, Debug)]
#[command(name = "smatrader", about = "SMA crossover signals with simulated execution")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay prices through the crossover strategy
    Replay {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Comma-separated symbols, overriding [feed] symbols
        #[arg(long)]
        symbols: Option<String>,
        /// live, csv or both, overriding [feed] mode
        #[arg(long)]
        mode: Option<FeedMode>,
    },
    /// Print the most recent ticks for a symbol
    Ticks {
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(short = 'n', long, default_value_t = 5)]
        last: usize,
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// live, csv or both, overriding [feed] mode
        #[arg(long)]
        mode: Option<FeedMode>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Replay {
            config,
            data_dir,
            symbols,
            mode,
        } => run_replay(&config, data_dir.as_deref(), symbols.as_deref(), mode),
        Command::Ticks {
            symbol,
            data_dir,
            last,
            config,
            mode,
        } => run_ticks(&symbol, data_dir.as_deref(), last, config.as_deref(), mode),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

pub fn build_session_config(adapter: &dyn ConfigPort) -> SessionConfig {
    let short = adapter.get_int("indicator", "short_window", DEFAULT_SHORT_WINDOW);
    let long = adapter.get_int("indicator", "long_window", DEFAULT_LONG_WINDOW);
    SessionConfig {
        windows: WindowConfig {
            short: short.max(0) as usize,
            long: long.max(0) as usize,
        },
        initial_cash: adapter.get_double("portfolio", "initial_cash", DEFAULT_INITIAL_CASH),
        order_quantity: adapter.get_int("policy", "order_quantity", DEFAULT_ORDER_QUANTITY),
    }
}

pub fn resolve_symbols(symbols_override: Option<&str>, adapter: &dyn ConfigPort) -> Vec<String> {
    match symbols_override {
        Some(s) => parse_symbols(s),
        None => parse_symbols(
            &adapter
                .get_string("feed", "symbols")
                .unwrap_or_else(|| DEFAULT_SYMBOLS.to_string()),
        ),
    }
}

pub fn resolve_data_dir(dir_override: Option<&Path>, adapter: Option<&dyn ConfigPort>) -> PathBuf {
    if let Some(dir) = dir_override {
        return dir.to_path_buf();
    }
    adapter
        .and_then(|a| a.get_string("feed", "data_dir"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

/// The `--mode` flag wins over `[feed] mode`, which wins over the default.
pub fn resolve_mode(
    mode_override: Option<FeedMode>,
    adapter: Option<&dyn ConfigPort>,
) -> Result<FeedMode, SmatraderError> {
    if let Some(mode) = mode_override {
        return Ok(mode);
    }
    match adapter {
        Some(a) => feed_mode(a),
        None => Ok(DEFAULT_FEED_MODE),
    }
}

/// Build the price feed for `mode`. In `both` mode CSV data replaces live
/// data for any symbol it covers.
pub fn build_feed(
    mode: FeedMode,
    data_dir: PathBuf,
    adapter: Option<&dyn ConfigPort>,
) -> Result<Box<dyn PriceFeed>, SmatraderError> {
    match mode {
        FeedMode::Csv => {
            eprintln!("Reading CSV data from {}", data_dir.display());
            Ok(Box::new(CsvAdapter::new(data_dir)))
        }
        FeedMode::Live => live_feed(adapter),
        FeedMode::Both => {
            let live = live_feed(adapter)?;
            eprintln!("Reading CSV data from {}", data_dir.display());
            let layers: Vec<Box<dyn PriceFeed>> = vec![live, Box::new(CsvAdapter::new(data_dir))];
            Ok(Box::new(LayeredFeed::new(layers)))
        }
    }
}

#[cfg(feature = "live")]
fn live_feed(adapter: Option<&dyn ConfigPort>) -> Result<Box<dyn PriceFeed>, SmatraderError> {
    use crate::adapters::alpha_vantage_adapter::AlphaVantageAdapter;

    eprintln!("Fetching live data from Alpha Vantage");
    Ok(Box::new(AlphaVantageAdapter::from_config(adapter)?))
}

#[cfg(not(feature = "live"))]
fn live_feed(_adapter: Option<&dyn ConfigPort>) -> Result<Box<dyn PriceFeed>, SmatraderError> {
    Err(SmatraderError::ConfigInvalid {
        section: "feed".to_string(),
        key: "mode".to_string(),
        reason: "built without live feed support".to_string(),
    })
}

fn run_replay(
    config_path: &Path,
    data_dir: Option<&Path>,
    symbols: Option<&str>,
    mode: Option<FeedMode>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let session_config = build_session_config(&adapter);
    let symbols = resolve_symbols(symbols, &adapter);
    if symbols.is_empty() {
        eprintln!("error: no symbols configured");
        return ExitCode::from(2);
    }

    let port: &dyn ConfigPort = &adapter;
    let feed = match resolve_mode(mode, Some(port))
        .and_then(|mode| build_feed(mode, resolve_data_dir(data_dir, Some(port)), Some(port)))
    {
        Ok(feed) => feed,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    run_replay_pipeline(feed.as_ref(), &session_config, &symbols)
}

/// Fetch, merge and replay ticks for `symbols`, then print a summary.
pub fn run_replay_pipeline(
    feed: &dyn PriceFeed,
    session_config: &SessionConfig,
    symbols: &[String],
) -> ExitCode {
    let streams = feed.fetch_all(symbols);
    if streams.is_empty() {
        let err = SmatraderError::NoData {
            symbol: symbols.join(","),
        };
        eprintln!("error: {err}");
        return (&err).into();
    }

    for (symbol, ticks) in &streams {
        eprintln!("  {}: {} ticks", symbol, ticks.len());
    }

    let ticks = merge_streams(streams);
    let mut session = TradingSession::from_config(session_config);
    let mut bus = MemoryBus::new();

    eprintln!(
        "Replaying {} ticks with {}",
        ticks.len(),
        session_config.windows
    );

    let summary = match session.replay(ticks, &mut bus) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let snapshot = session.portfolio().snapshot();

    eprintln!("\n=== Replay Summary ===");
    eprintln!("Ticks:            {}", summary.ticks);
    eprintln!("Signals:          {}", summary.signals);
    eprintln!("Fills:            {}", summary.fills);
    eprintln!("Rejected:         {}", summary.rejections);

    eprintln!("\n=== Portfolio ===");
    eprintln!("Cash:             ${:.2}", snapshot.cash);
    if snapshot.holdings.is_empty() {
        eprintln!("Holdings:         (none)");
    } else {
        for (symbol, qty) in &snapshot.holdings {
            eprintln!("  {}: {} shares", symbol, qty);
        }
    }
    eprintln!("Trades:           {}", snapshot.trade_history.len());

    match session.total_value() {
        Ok(value) => eprintln!("Total Value:      ${:.2}", value),
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }

    eprintln!("\n=== Messages ===");
    for channel in Channel::ALL {
        eprintln!("  {:<12} {}", channel.name(), bus.count(channel));
    }

    ExitCode::SUCCESS
}

fn run_ticks(
    symbol: &str,
    data_dir: Option<&Path>,
    last: usize,
    config: Option<&Path>,
    mode: Option<FeedMode>,
) -> ExitCode {
    let adapter = match config {
        Some(path) => match load_config(path) {
            Ok(a) => Some(a),
            Err(code) => return code,
        },
        None => None,
    };
    let port = adapter.as_ref().map(|a| a as &dyn ConfigPort);
    let feed = match resolve_mode(mode, port)
        .and_then(|mode| build_feed(mode, resolve_data_dir(data_dir, port), port))
    {
        Ok(feed) => feed,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let symbol = symbol.trim().to_ascii_uppercase();

    let ticks = match feed.fetch_ticks(&symbol) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if ticks.is_empty() {
        let err = SmatraderError::NoData { symbol };
        eprintln!("error: {err}");
        return (&err).into();
    }

    println!("Data for {} ({} data points):", symbol, ticks.len());
    let start = ticks.len().saturating_sub(last);
    for tick in &ticks[start..] {
        println!("{}", format_tick(tick));
    }
    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let session_config = build_session_config(&adapter);
    let symbols = resolve_symbols(None, &adapter);

    eprintln!("Config validated successfully");
    eprintln!("  indicator:    {}", session_config.windows);
    eprintln!("  initial cash: ${:.2}", session_config.initial_cash);
    eprintln!("  order size:   {}", session_config.order_quantity);
    eprintln!("  symbols:      {}", symbols.join(", "));
    if let Ok(mode) = feed_mode(&adapter) {
        eprintln!("  feed mode:    {}", mode);
    }
    ExitCode::SUCCESS
}

/// `date | symbol | Price | Open | High | Low | Volume`, with `-` for
/// absent bar fields.
pub fn format_tick(tick: &PriceObservation) -> String {
    let date = tick
        .date()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| tick.timestamp.to_string());
    let money = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("${:.2}", v));
    let volume = tick
        .volume
        .map_or_else(|| "-".to_string(), |v| v.to_string());

    format!(
        "{} | {} | Price: ${:.2} | Open: {} | High: {} | Low: {} | Volume: {}",
        date,
        tick.symbol,
        tick.price,
        money(tick.open),
        money(tick.high),
        money(tick.low),
        volume
    )
}
