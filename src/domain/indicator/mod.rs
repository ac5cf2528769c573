//! Moving-average indicators.
//!
//! - `RollingWindow`: bounded FIFO with O(1) running sum
//! - `SmaCrossover`: short/long SMA pair with golden/death cross detection
//! - `IndicatorBank`: one isolated `SmaCrossover` per symbol

pub mod sma_cross;
pub mod window;

use std::collections::HashMap;
use std::fmt;

use sma_cross::SmaCrossover;

/// Window lengths shared by every symbol in a bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowConfig {
    pub short: usize,
    pub long: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            short: 50,
            long: 100,
        }
    }
}

impl fmt::Display for WindowConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SMA({})/SMA({})", self.short, self.long)
    }
}

/// Per-symbol indicator state. Engines are created on first sight of a
/// symbol and never shared between symbols.
#[derive(Debug, Clone, Default)]
pub struct IndicatorBank {
    windows: WindowConfig,
    engines: HashMap<String, SmaCrossover>,
}

impl IndicatorBank {
    pub fn new(windows: WindowConfig) -> Self {
        IndicatorBank {
            windows,
            engines: HashMap::new(),
        }
    }

    pub fn windows(&self) -> WindowConfig {
        self.windows
    }

    pub fn engine_mut(&mut self, symbol: &str) -> &mut SmaCrossover {
        let windows = self.windows;
        self.engines
            .entry(symbol.to_string())
            .or_insert_with(|| SmaCrossover::new(windows.short, windows.long))
    }

    pub fn get(&self, symbol: &str) -> Option<&SmaCrossover> {
        self.engines.get(symbol)
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}
