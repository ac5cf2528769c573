//! Trend signals emitted by the crossover detector.

use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum SignalKind {
    /// Golden cross: short average moved from at-or-below to above the long.
    Buy,
    /// Death cross: short average moved from at-or-above to below the long.
    Sell,
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalKind::Buy => write!(f, "BUY"),
            SignalKind::Sell => write!(f, "SELL"),
        }
    }
}

/// Keys allowed in a signal's auxiliary data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SignalField {
    Price,
    ShortAverage,
    LongAverage,
}

/// Auxiliary numeric data attached to a signal. Empty by default.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignalData(BTreeMap<SignalField, f64>);

impl SignalData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: SignalField, value: f64) -> Self {
        self.0.insert(field, value);
        self
    }

    pub fn get(&self, field: SignalField) -> Option<f64> {
        self.0.get(&field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SignalField, f64)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Signal {
    pub symbol: String,
    pub kind: SignalKind,
    pub timestamp: i64,
    pub data: SignalData,
}

impl Signal {
    pub fn new(symbol: impl Into<String>, kind: SignalKind, timestamp: i64) -> Self {
        Signal {
            symbol: symbol.into(),
            kind,
            timestamp,
            data: SignalData::new(),
        }
    }

    pub fn with_data(mut self, data: SignalData) -> Self {
        self.data = data;
        self
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn signal_kind_is_uppercase_on_the_wire() {
        let signal = Signal::new("IBM", SignalKind::Sell, 7);
        let value = serde_json::to_value(&signal).unwrap();
        assert_eq!(value["kind"], "SELL");
        assert_eq!(serde_json::from_value::<Signal>(value).unwrap(), signal);
    }
}
