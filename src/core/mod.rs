//! Core types and constants for the telemetry reconciliation engine

pub mod types;
pub mod constants;

pub use types::*;
pub use constants::*;
