//! Several feeds stacked in priority order.

use log::warn;

use crate::domain::error::SmatraderError;
use crate::domain::tick::PriceObservation;
use crate::ports::data_port::PriceFeed;

/// Asks every layer for a symbol. The last layer with data wins; layers
/// that fail are logged and passed over.
pub struct LayeredFeed {
    layers: Vec<Box<dyn PriceFeed>>,
}

impl LayeredFeed {
    pub fn new(layers: Vec<Box<dyn PriceFeed>>) -> Self {
        Self { layers }
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl PriceFeed for LayeredFeed {
    fn fetch_ticks(&self, symbol: &str) -> Result<Vec<PriceObservation>, SmatraderError> {
        let mut found: Option<Vec<PriceObservation>> = None;
        let mut last_error = None;

        for layer in &self.layers {
            match layer.fetch_ticks(symbol) {
                Ok(ticks) if ticks.is_empty() => {
                    found.get_or_insert_with(Vec::new);
                }
                Ok(ticks) => found = Some(ticks),
                Err(e) => {
                    warn!("feed layer failed for {}: {}", symbol, e);
                    last_error = Some(e);
                }
            }
        }

        match (found, last_error) {
            (Some(ticks), _) => Ok(ticks),
            (None, Some(e)) => Err(e),
            (None, None) => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Fixed(HashMap<&'static str, Result<Vec<f64>, &'static str>>);

    impl PriceFeed for Fixed {
        fn fetch_ticks(&self, symbol: &str) -> Result<Vec<PriceObservation>, SmatraderError> {
            match self.0.get(symbol) {
                Some(Ok(prices)) => Ok(prices
                    .iter()
                    .enumerate()
                    .map(|(i, p)| PriceObservation::new(symbol, *p, i as i64))
                    .collect()),
                Some(Err(reason)) => Err(SmatraderError::Feed {
                    reason: reason.to_string(),
                }),
                None => Ok(Vec::new()),
            }
        }
    }

    fn prices(ticks: &[PriceObservation]) -> Vec<f64> {
        ticks.iter().map(|t| t.price).collect()
    }

    fn layered() -> LayeredFeed {
        let live = Fixed(HashMap::from([
            ("IBM", Ok(vec![1.0, 2.0])),
            ("AAPL", Ok(vec![3.0])),
            ("MSFT", Err("rate limited")),
        ]));
        let csv = Fixed(HashMap::from([
            ("IBM", Ok(vec![9.0])),
            ("AAPL", Err("no file")),
            ("MSFT", Err("no file")),
        ]));
        let layers: Vec<Box<dyn PriceFeed>> = vec![Box::new(live), Box::new(csv)];
        LayeredFeed::new(layers)
    }

    #[test]
    fn later_layer_overrides_earlier() {
        let feed = layered();
        assert_eq!(feed.len(), 2);
        assert_eq!(prices(&feed.fetch_ticks("IBM").unwrap()), vec![9.0]);
    }

    #[test]
    fn failing_layer_falls_back_to_data() {
        let feed = layered();
        assert_eq!(prices(&feed.fetch_ticks("AAPL").unwrap()), vec![3.0]);
    }

    #[test]
    fn all_layers_failing_returns_last_error() {
        let feed = layered();
        let err = feed.fetch_ticks("MSFT").unwrap_err();
        assert!(matches!(err, SmatraderError::Feed { ref reason } if reason == "no file"));
    }

    #[test]
    fn unknown_symbol_is_empty() {
        assert!(layered().fetch_ticks("GOOG").unwrap().is_empty());
        assert!(LayeredFeed::new(Vec::new()).fetch_ticks("IBM").unwrap().is_empty());
    }
}
