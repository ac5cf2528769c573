//! In-process event transport.
//!
//! Records every published message in order. Used by the CLI replay and
//! by tests to observe what the session emitted on each channel.

use log::debug;

use crate::domain::error::SmatraderError;
use crate::domain::event::{Channel, MarketEvent};
use crate::ports::event_port::EventPort;

#[derive(Debug, Default)]
pub struct MemoryBus {
    events: Vec<MarketEvent>,
}

impl MemoryBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[MarketEvent] {
        &self.events
    }

    pub fn on_channel(&self, channel: Channel) -> impl Iterator<Item = &MarketEvent> {
        self.events.iter().filter(move |e| e.channel() == channel)
    }

    pub fn count(&self, channel: Channel) -> usize {
        self.on_channel(channel).count()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventPort for MemoryBus {
    fn publish(&mut self, event: &MarketEvent) -> Result<(), SmatraderError> {
        debug!("published on {}: {:?}", event.channel(), event);
        self.events.push(event.clone());
        Ok(())
    }
}
