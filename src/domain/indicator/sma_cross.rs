//! Dual simple-moving-average engine with crossover detection.
//!
//! One instance tracks a single symbol. `update` records the pair of
//! averages as they stood *before* the new price was incorporated, and
//! `detect_crossover` compares that pair with the current one:
//!
//! - BUY (golden cross): prev_short <= prev_long and short > long
//! - SELL (death cross): prev_short >= prev_long and short < long
//!
//! The previous pair cannot be rebuilt from the buffers once a value has
//! been evicted, which is why it is captured inside `update`.

use super::window::RollingWindow;
use crate::domain::signal::SignalKind;

#[derive(Debug, Clone, PartialEq)]
pub struct SmaCrossover {
    short: RollingWindow,
    long: RollingWindow,
    prev_short: Option<f64>,
    prev_long: Option<f64>,
}

impl SmaCrossover {
    pub fn new(short_window: usize, long_window: usize) -> Self {
        SmaCrossover {
            short: RollingWindow::new(short_window),
            long: RollingWindow::new(long_window),
            prev_short: None,
            prev_long: None,
        }
    }

    /// Feed one price. Returns the post-update `(short, long)` averages.
    pub fn update(&mut self, price: f64) -> (f64, f64) {
        self.prev_short = Some(self.short.average());
        self.prev_long = Some(self.long.average());

        self.short.push(price);
        self.long.push(price);

        (self.short.average(), self.long.average())
    }

    pub fn short_average(&self) -> f64 {
        self.short.average()
    }

    pub fn long_average(&self) -> f64 {
        self.long.average()
    }

    /// Averages captured immediately before the most recent `update`.
    pub fn previous_averages(&self) -> Option<(f64, f64)> {
        self.prev_short.zip(self.prev_long)
    }

    pub fn short_window(&self) -> usize {
        self.short.capacity()
    }

    pub fn long_window(&self) -> usize {
        self.long.capacity()
    }

    /// True once both windows hold their full complement of prices.
    pub fn is_warmed_up(&self) -> bool {
        self.short.is_full() && self.long.is_full()
    }

    /// Pure read: repeated calls between updates return the same answer.
    pub fn detect_crossover(&self) -> Option<SignalKind> {
        let (prev_short, prev_long) = self.previous_averages()?;
        let short = self.short.average();
        let long = self.long.average();

        if prev_short <= prev_long && short > long {
            Some(SignalKind::Buy)
        } else if prev_short >= prev_long && short < long {
            Some(SignalKind::Sell)
        } else {
            None
        }
    }
}
