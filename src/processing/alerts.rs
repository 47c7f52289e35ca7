//! Alert registry: active distress alerts keyed by vehicle
//!
//! The registry owns alert state and nothing else. It communicates with the
//! notification scheduler only through the `AlertTransition` values returned
//! here, observed in arrival order, which keeps alert state and audio state
//! from forming a reentrant cycle.

use crate::core::VehicleId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An active distress alert for one vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveAlert {
    pub message: String,
    /// Logical arrival order of the raise that activated this alert
    pub raised_seq: u64,
}

/// Outcome of applying a raise or clear event
#[derive(Debug, Clone, PartialEq)]
pub enum AlertTransition {
    /// Vehicle had no active alert; observers must notify
    NewAlert {
        vehicle_id: VehicleId,
        message: String,
    },
    /// Vehicle already had an active alert; message replaced, no
    /// renotification
    MessageUpdated {
        vehicle_id: VehicleId,
        message: String,
    },
    /// Alert transitioned Active -> Inactive
    Cleared { vehicle_id: VehicleId },
    /// Clear for a vehicle with no active alert; idempotent no-op
    NoOp,
}

/// Owns the set of currently active alerts, at most one per vehicle
#[derive(Debug, Clone, Default)]
pub struct AlertRegistry {
    active: BTreeMap<VehicleId, ActiveAlert>,
}

impl AlertRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a raise event. A raise for an already-active vehicle replaces
    /// the message but is not a new alert for notification purposes.
    pub fn raise(&mut self, vehicle_id: VehicleId, message: String, seq: u64) -> AlertTransition {
        match self.active.get_mut(&vehicle_id) {
            Some(existing) => {
                existing.message = message.clone();
                AlertTransition::MessageUpdated {
                    vehicle_id,
                    message,
                }
            }
            None => {
                self.active.insert(
                    vehicle_id.clone(),
                    ActiveAlert {
                        message: message.clone(),
                        raised_seq: seq,
                    },
                );
                AlertTransition::NewAlert {
                    vehicle_id,
                    message,
                }
            }
        }
    }

    /// Apply a clear event. Clearing an unknown or already-inactive vehicle
    /// is a no-op, not an error.
    pub fn clear(&mut self, vehicle_id: &VehicleId) -> AlertTransition {
        if self.active.remove(vehicle_id).is_some() {
            AlertTransition::Cleared {
                vehicle_id: vehicle_id.clone(),
            }
        } else {
            AlertTransition::NoOp
        }
    }

    /// Bulk clear, used by an operator acknowledging all alerts. Returns
    /// exactly the ids that transitioned Active -> Inactive, ascending.
    pub fn clear_all(&mut self) -> Vec<VehicleId> {
        let cleared: Vec<VehicleId> = self.active.keys().cloned().collect();
        self.active.clear();
        cleared
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn is_active(&self, vehicle_id: &VehicleId) -> bool {
        self.active.contains_key(vehicle_id)
    }

    pub fn get(&self, vehicle_id: &VehicleId) -> Option<&ActiveAlert> {
        self.active.get(vehicle_id)
    }

    /// Active alerts as id -> message, ordered by id, for the snapshot
    pub fn active_messages(&self) -> BTreeMap<VehicleId, String> {
        self.active
            .iter()
            .map(|(id, alert)| (id.clone(), alert.message.clone()))
            .collect()
    }
}
