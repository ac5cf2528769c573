//! Concrete adapter implementations for ports.

#[cfg(feature = "live")]
pub mod alpha_vantage_adapter;
pub mod csv_adapter;
pub mod file_config_adapter;
pub mod layered_feed;
pub mod memory_bus;
