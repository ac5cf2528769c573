//! Message transport port.
//!
//! The session is handed a transport explicitly; nothing in the core
//! reaches for a process-wide connection.

use crate::domain::error::SmatraderError;
use crate::domain::event::MarketEvent;

pub trait EventPort {
    /// Publish `event` on its channel.
    fn publish(&mut self, event: &MarketEvent) -> Result<(), SmatraderError>;
}
