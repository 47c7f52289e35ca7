//! Derived-state algorithms

pub mod bearing;

pub use bearing::{bearing_degrees, normalize_degrees};
