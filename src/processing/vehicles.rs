//! Vehicle registry: current positions, path history, derived headings
//!
//! Single writer: one engine task owns all mutation. Snapshots are
//! copy-on-read; live internals never escape to a concurrent reader.

use crate::algorithms::bearing::{bearing_degrees, normalize_degrees};
use crate::core::{PositionSample, VehicleId, VehicleState};
use std::collections::BTreeMap;

/// Default bound on retained path samples per vehicle. Unbounded growth is
/// a resource leak in a long-running session.
pub const DEFAULT_MAX_PATH_SAMPLES: usize = 512;

/// Owns every `VehicleState`; applies normalized position events and
/// exposes the id-ordered snapshot and the most-recently-updated query.
#[derive(Debug, Clone)]
pub struct VehicleRegistry {
    vehicles: BTreeMap<VehicleId, VehicleState>,
    most_recent: Option<VehicleId>,
    max_path_samples: usize,
    /// Fixed mounting-angle offset applied to estimated headings, degrees.
    /// Zero unless explicitly configured.
    bearing_offset_deg: f64,
}

impl VehicleRegistry {
    pub fn new() -> Self {
        Self::with_settings(DEFAULT_MAX_PATH_SAMPLES, 0.0)
    }

    pub fn with_settings(max_path_samples: usize, bearing_offset_deg: f64) -> Self {
        VehicleRegistry {
            vehicles: BTreeMap::new(),
            most_recent: None,
            max_path_samples: max_path_samples.max(2),
            bearing_offset_deg,
        }
    }

    /// Insert or update the vehicle's entry with a normalized sample.
    ///
    /// The sample is always appended to the path, even when the rounded
    /// coordinates match the previous sample (dwell detection needs the
    /// entry); the heading is only recomputed when the vehicle actually
    /// moved, so a zero displacement never resets it.
    pub fn apply_position(&mut self, sample: PositionSample) -> &VehicleState {
        let id = sample.vehicle_id.clone();
        let state = self
            .vehicles
            .entry(id.clone())
            .or_insert_with(|| VehicleState::new(id.clone()));

        if let Some(prev) = state.path.back() {
            if let Some(raw_bearing) = bearing_degrees(prev.point, sample.point) {
                state.heading_deg = Some(normalize_degrees(raw_bearing + self.bearing_offset_deg));
            }
        }

        state.path.push_back(sample);
        while state.path.len() > self.max_path_samples {
            state.path.pop_front();
        }

        self.most_recent = Some(id.clone());
        &self.vehicles[&id]
    }

    /// All vehicle states ordered by id ascending, independent of update
    /// order. Stable presentation order for the rendering surface.
    pub fn snapshot_vehicles(&self) -> Vec<VehicleState> {
        self.vehicles.values().cloned().collect()
    }

    /// Id of the vehicle whose position was updated last, if any
    pub fn most_recently_updated(&self) -> Option<&VehicleId> {
        self.most_recent.as_ref()
    }

    pub fn get(&self, id: &VehicleId) -> Option<&VehicleState> {
        self.vehicles.get(id)
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Drop all vehicle state, including the most-recently-updated marker
    pub fn clear(&mut self) {
        self.vehicles.clear();
        self.most_recent = None;
    }
}

impl Default for VehicleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
