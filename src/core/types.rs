//! Core data types shared across the engine

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, VecDeque};
use std::fmt;

/// Opaque vehicle identifier.
///
/// Ids arrive on the wire as numbers or strings and are canonicalized to
/// text. Numeric ids order before non-numeric ids and compare by value
/// (so "10" sorts after "9"); non-numeric ids compare lexically. The
/// numeric-first split keeps the order total when both kinds share one map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleId(String);

impl VehicleId {
    pub fn new(id: impl Into<String>) -> Self {
        VehicleId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Ord for VehicleId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.0.parse::<u64>(), other.0.parse::<u64>()) {
            (Ok(a), Ok(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Ok(_), Err(_)) => Ordering::Less,
            (Err(_), Ok(_)) => Ordering::Greater,
            (Err(_), Err(_)) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for VehicleId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VehicleId {
    fn from(id: &str) -> Self {
        VehicleId(id.to_string())
    }
}

impl From<String> for VehicleId {
    fn from(id: String) -> Self {
        VehicleId(id)
    }
}

/// Geographic point in decimal degrees, fixed to 7 decimal digits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        GeoPoint { lat, lng }
    }
}

/// A single normalized position report for one vehicle.
///
/// `seq` is the logical arrival order assigned by the engine, not a wall
/// clock; it only orders events on the processing stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    pub vehicle_id: VehicleId,
    pub point: GeoPoint,
    pub seq: u64,
}

/// Current state of one tracked vehicle.
///
/// `path` is the append-only authoritative history (bounded by the
/// configured retention); the latest position is always the back of `path`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleState {
    pub vehicle_id: VehicleId,
    pub path: VecDeque<PositionSample>,
    /// Compass heading in degrees [0, 360), clockwise from north.
    /// `None` until the vehicle has moved between two distinct points.
    pub heading_deg: Option<f64>,
}

impl VehicleState {
    pub fn new(vehicle_id: VehicleId) -> Self {
        VehicleState {
            vehicle_id,
            path: VecDeque::new(),
            heading_deg: None,
        }
    }

    /// Most recent position, if any sample has been applied.
    pub fn latest(&self) -> Option<&PositionSample> {
        self.path.back()
    }
}

/// Recommended map focal point for the rendering surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportTarget {
    pub center: GeoPoint,
    pub zoom: f64,
    pub animated: bool,
}

/// Immutable, consistently ordered view of all current state, for external
/// consumption by the rendering surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Vehicle states ordered by id ascending, independent of update order
    pub vehicles: Vec<VehicleState>,
    /// Active distress alerts, vehicle id -> message
    pub active_alerts: BTreeMap<VehicleId, String>,
    pub viewport: ViewportTarget,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_id_ordering() {
        let mut ids: Vec<VehicleId> = vec!["10".into(), "9".into(), "2".into()];
        ids.sort();
        let sorted: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
        assert_eq!(sorted, vec!["2", "9", "10"]);
    }

    #[test]
    fn test_lexical_fallback_ordering() {
        let mut ids: Vec<VehicleId> = vec!["car-b".into(), "car-a".into(), "7".into()];
        ids.sort();
        let sorted: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
        // Non-numeric ids fall back to lexical comparison
        assert_eq!(sorted, vec!["7", "car-a", "car-b"]);
    }

    #[test]
    fn test_mixed_ids_form_one_total_order() {
        let mut ids: Vec<VehicleId> =
            vec!["5x".into(), "10".into(), "car-a".into(), "9".into(), "2".into()];
        ids.sort();
        let sorted: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
        // Numeric block first, by value; then non-numeric, lexically
        assert_eq!(sorted, vec!["2", "9", "10", "5x", "car-a"]);

        // Pairwise comparisons agree with the sorted order (no cycles)
        for (i, a) in ids.iter().enumerate() {
            for b in ids.iter().skip(i + 1) {
                assert_eq!(a.cmp(b), Ordering::Less);
                assert_eq!(b.cmp(a), Ordering::Greater);
            }
        }
    }

    #[test]
    fn test_padded_numeric_ids_stay_distinct() {
        let a = VehicleId::from("07");
        let b = VehicleId::from("7");
        assert_ne!(a, b);
        assert_ne!(a.cmp(&b), Ordering::Equal);
    }

    #[test]
    fn test_latest_is_back_of_path() {
        let mut state = VehicleState::new("42".into());
        assert!(state.latest().is_none());

        state.path.push_back(PositionSample {
            vehicle_id: "42".into(),
            point: GeoPoint::new(10.0, 20.0),
            seq: 1,
        });
        state.path.push_back(PositionSample {
            vehicle_id: "42".into(),
            point: GeoPoint::new(10.001, 20.001),
            seq: 2,
        });

        assert_eq!(state.latest().unwrap().seq, 2);
    }
}
