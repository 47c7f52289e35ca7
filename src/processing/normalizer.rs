//! Event normalization for raw transport payloads
//!
//! Validates and canonicalizes raw inbound events (position updates,
//! distress raise/clear) into typed, fixed-precision records. Pure: no side
//! effects, no registry access. Rejection reasons are returned to the
//! caller, which decides how to count and log them.

use crate::core::{
    GeoPoint, PositionSample, VehicleId, COORDINATE_PRECISION_SCALE, LATITUDE_MAX, LATITUDE_MIN,
    LONGITUDE_MAX, LONGITUDE_MIN,
};
use crate::validation::RejectReason;
use serde::{Deserialize, Serialize};

/// A wire field that may arrive as a number or as text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Num(f64),
    Text(String),
}

/// Raw position payload as delivered by the transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPosition {
    #[serde(rename = "carId", default)]
    pub car_id: Option<Scalar>,
    #[serde(default)]
    pub latitude: Option<Scalar>,
    #[serde(default)]
    pub longitude: Option<Scalar>,
}

/// Raw distress payload as delivered by the transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDistress {
    #[serde(rename = "carId", default)]
    pub car_id: Option<Scalar>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Raw distress-clear payload as delivered by the transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawClear {
    #[serde(rename = "carId", default)]
    pub car_id: Option<Scalar>,
}

/// Inbound event shapes consumed from the transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum RawEvent {
    #[serde(rename = "locationUpdate")]
    LocationUpdate(RawPosition),
    #[serde(rename = "sos")]
    Sos(RawDistress),
    #[serde(rename = "sos-clear")]
    SosClear(RawClear),
}

/// Canonical event after normalization
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedEvent {
    Position(PositionSample),
    AlertRaise { vehicle_id: VehicleId, message: String },
    AlertClear { vehicle_id: VehicleId },
}

/// Round a coordinate to 7 decimal digits, half away from zero.
///
/// Downstream dwell detection and the bearing estimator treat two samples
/// with identical rounded coordinates as "no movement", so this precision
/// boundary is part of the engine contract.
pub fn round_coordinate(value: f64) -> f64 {
    (value * COORDINATE_PRECISION_SCALE).round() / COORDINATE_PRECISION_SCALE
}

/// Normalize a raw transport event into a typed record.
///
/// `seq` is the logical arrival order assigned by the caller. Returns a
/// rejection instead of panicking or clamping on bad input.
pub fn normalize(raw: &RawEvent, seq: u64) -> Result<NormalizedEvent, RejectReason> {
    match raw {
        RawEvent::LocationUpdate(pos) => {
            let vehicle_id = canonical_id(pos.car_id.as_ref())?;
            let lat = coordinate_value("latitude", pos.latitude.as_ref())?;
            let lng = coordinate_value("longitude", pos.longitude.as_ref())?;

            let lat = round_coordinate(lat);
            let lng = round_coordinate(lng);

            if !(LATITUDE_MIN..=LATITUDE_MAX).contains(&lat) {
                return Err(RejectReason::OutOfRangeCoordinate {
                    field: "latitude".to_string(),
                    value: lat,
                });
            }
            if !(LONGITUDE_MIN..=LONGITUDE_MAX).contains(&lng) {
                return Err(RejectReason::OutOfRangeCoordinate {
                    field: "longitude".to_string(),
                    value: lng,
                });
            }

            Ok(NormalizedEvent::Position(PositionSample {
                vehicle_id,
                point: GeoPoint::new(lat, lng),
                seq,
            }))
        }
        RawEvent::Sos(distress) => {
            let vehicle_id = canonical_id(distress.car_id.as_ref())?;
            let message = distress
                .message
                .as_ref()
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())
                .ok_or_else(|| RejectReason::MalformedPayload {
                    details: "sos event without message".to_string(),
                })?;
            Ok(NormalizedEvent::AlertRaise {
                vehicle_id,
                message,
            })
        }
        RawEvent::SosClear(clear) => {
            let vehicle_id = canonical_id(clear.car_id.as_ref())?;
            Ok(NormalizedEvent::AlertClear { vehicle_id })
        }
    }
}

/// Canonicalize a wire id into an opaque `VehicleId`.
///
/// Integer-valued numeric ids render without a fractional part so that the
/// id "42" is the same vehicle whether it arrived as `42` or `"42"`.
fn canonical_id(raw: Option<&Scalar>) -> Result<VehicleId, RejectReason> {
    match raw {
        Some(Scalar::Num(n)) if n.is_finite() => {
            if n.fract() == 0.0 && n.abs() < 1e15 {
                Ok(VehicleId::new(format!("{}", *n as i64)))
            } else {
                Ok(VehicleId::new(format!("{}", n)))
            }
        }
        Some(Scalar::Text(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Err(RejectReason::MissingVehicleId)
            } else {
                Ok(VehicleId::new(trimmed))
            }
        }
        _ => Err(RejectReason::MissingVehicleId),
    }
}

/// Parse a coordinate field that may be numeric or textual
fn coordinate_value(field: &str, raw: Option<&Scalar>) -> Result<f64, RejectReason> {
    let value = match raw {
        Some(Scalar::Num(n)) => *n,
        Some(Scalar::Text(s)) => {
            s.trim()
                .parse::<f64>()
                .map_err(|_| RejectReason::UnparsableCoordinate {
                    field: field.to_string(),
                    value: s.clone(),
                })?
        }
        None => {
            return Err(RejectReason::UnparsableCoordinate {
                field: field.to_string(),
                value: "<missing>".to_string(),
            })
        }
    };

    if !value.is_finite() {
        return Err(RejectReason::NonFiniteCoordinate {
            field: field.to_string(),
        });
    }
    Ok(value)
}
