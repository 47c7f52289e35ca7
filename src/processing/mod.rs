//! Event normalization and state registries

pub mod normalizer;
pub mod vehicles;
pub mod alerts;

pub use alerts::{AlertRegistry, AlertTransition};
pub use normalizer::{normalize, round_coordinate, NormalizedEvent, RawEvent};
pub use vehicles::VehicleRegistry;
