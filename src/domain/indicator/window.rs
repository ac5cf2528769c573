//! Bounded FIFO price window with an O(1) running sum.
//!
//! The sum is adjusted on every push: the evicted value is subtracted before
//! the new one is added, so `sum` always equals the sum of the current
//! contents and `average` never walks the buffer.

use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq)]
pub struct RollingWindow {
    capacity: usize,
    values: VecDeque<f64>,
    sum: f64,
}

impl RollingWindow {
    pub fn new(capacity: usize) -> Self {
        RollingWindow {
            capacity,
            values: VecDeque::with_capacity(capacity),
            sum: 0.0,
        }
    }

    /// Append `price`, evicting the oldest value when full. A zero-capacity
    /// window ignores every push.
    pub fn push(&mut self, price: f64) {
        if self.capacity == 0 {
            return;
        }
        if self.values.len() == self.capacity {
            if let Some(evicted) = self.values.pop_front() {
                self.sum -= evicted;
            }
        }
        self.values.push_back(price);
        self.sum += price;
    }

    /// Mean of the current contents; 0 when empty. Before the window fills
    /// this is the mean over fewer than `capacity` values.
    pub fn average(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.sum / self.values.len() as f64
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.capacity > 0 && self.values.len() == self.capacity
    }
}
