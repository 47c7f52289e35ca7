//! Error classification for the telemetry engine
//!
//! Malformed input is recovered locally: rejected events are counted and
//! logged, the stream continues, and no registry state is mutated. Sink
//! failures are likewise recoverable and must never block event processing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reasons the normalizer rejects a raw event.
///
/// Rejection is not an error in the fatal sense; the event is dropped and
/// the stream continues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RejectReason {
    /// Vehicle id missing or empty
    MissingVehicleId,
    /// Coordinate field present but not parsable as a number
    UnparsableCoordinate { field: String, value: String },
    /// Coordinate parsed to NaN or infinity
    NonFiniteCoordinate { field: String },
    /// Coordinate outside the valid geographic range; rejected, not clamped
    OutOfRangeCoordinate { field: String, value: f64 },
    /// Payload shape did not match any known event type
    MalformedPayload { details: String },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::MissingVehicleId => write!(f, "Missing or empty vehicle id"),
            RejectReason::UnparsableCoordinate { field, value } => {
                write!(f, "Unparsable {} value: '{}'", field, value)
            }
            RejectReason::NonFiniteCoordinate { field } => {
                write!(f, "Non-finite {} value", field)
            }
            RejectReason::OutOfRangeCoordinate { field, value } => {
                write!(f, "Out-of-range {}: {}", field, value)
            }
            RejectReason::MalformedPayload { details } => {
                write!(f, "Malformed payload: {}", details)
            }
        }
    }
}

impl std::error::Error for RejectReason {}

/// Announcement delivery failure reported by a sink.
///
/// Recoverable: the announcement for that occurrence is lost, nothing else.
#[derive(Debug, Clone, PartialEq)]
pub struct SinkError {
    pub message: String,
}

impl SinkError {
    pub fn new(message: impl Into<String>) -> Self {
        SinkError {
            message: message.into(),
        }
    }
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Announcement sink unavailable: {}", self.message)
    }
}

impl std::error::Error for SinkError {}

/// Running counters over the event stream
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestStats {
    /// Position samples applied to the vehicle registry
    pub positions_applied: u64,
    /// Events dropped by the normalizer
    pub events_rejected: u64,
    /// Rejections with an out-of-range or non-finite coordinate
    pub coordinate_rejections: u64,
    /// Alerts that transitioned Inactive -> Active
    pub alerts_raised: u64,
    /// Alerts that transitioned Active -> Inactive
    pub alerts_cleared: u64,
    /// Announcement deliveries that failed at the sink
    pub sink_failures: u64,
}

impl IngestStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a rejection, bucketing coordinate-related reasons separately.
    pub fn record_rejection(&mut self, reason: &RejectReason) {
        self.events_rejected += 1;
        match reason {
            RejectReason::OutOfRangeCoordinate { .. }
            | RejectReason::NonFiniteCoordinate { .. }
            | RejectReason::UnparsableCoordinate { .. } => {
                self.coordinate_rejections += 1;
            }
            _ => {}
        }
    }
}
