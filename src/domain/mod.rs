//! Core domain types and logic.

pub mod tick;
pub mod order;
pub mod signal;
pub mod execution;
pub mod portfolio;
pub mod indicator;
pub mod policy;
pub mod event;
pub mod session;
pub mod config_validation;
pub mod error;
