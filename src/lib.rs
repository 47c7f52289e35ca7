//! Trackside Telemetry Reconciliation Engine
//!
//! Reconciles a live stream of vehicle telemetry events (position updates,
//! distress raise/clear) into consistent registry state: per-vehicle path
//! history with derived headings, active alerts, announcement scheduling,
//! and a recommended map viewport.

pub mod algorithms;
pub mod core;
pub mod engine;
pub mod notify;
pub mod processing;
pub mod utils;
pub mod validation;
pub mod viewport;

// Re-export commonly used types
pub use crate::core::{GeoPoint, PositionSample, Snapshot, VehicleId, VehicleState, ViewportTarget};
pub use crate::engine::{Applied, TelemetryEngine};
pub use crate::notify::{
    AnnouncementSink, ConsoleSink, MemorySink, NotificationScheduler, SinkCommand,
};
pub use crate::processing::{
    normalize, AlertRegistry, AlertTransition, NormalizedEvent, RawEvent, VehicleRegistry,
};
pub use crate::utils::{ConfigError, EngineConfig};
pub use crate::validation::{IngestStats, RejectReason, SinkError};
