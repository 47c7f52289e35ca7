//! The live state-reconciliation engine
//!
//! Single-threaded event loop over the normalized stream: each inbound
//! event is applied to the registries atomically and fully before the next
//! is considered, which gives linearizable semantics with no internal
//! locking. One `&mut self` writer owns all registry mutation; readers get
//! copy-on-read snapshots, never live internals.
//!
//! Registry mutation never blocks. The only operations that may block are
//! outside this type: transport receive and whatever the sink does with a
//! delivered command.

use crate::core::{GeoPoint, Snapshot, VehicleId};
use crate::notify::scheduler::NotificationScheduler;
use crate::notify::sink::AnnouncementSink;
use crate::processing::alerts::{AlertRegistry, AlertTransition};
use crate::processing::normalizer::{normalize, NormalizedEvent, RawEvent};
use crate::processing::vehicles::VehicleRegistry;
use crate::utils::{ConfigError, EngineConfig};
use crate::validation::{IngestStats, RejectReason};
use crate::viewport;
use log::{debug, warn};

/// What an accepted event did to the registries
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    /// Position sample applied to the vehicle registry
    Position { vehicle_id: VehicleId },
    /// Alert registry transition, already observed by the scheduler
    Alert(AlertTransition),
}

/// Owns the registries, the scheduler, and the announcement sink, and
/// applies the inbound event stream to them.
pub struct TelemetryEngine {
    config: EngineConfig,
    /// Logical arrival order; assigned to every inbound event, accepted
    /// or not
    seq: u64,
    vehicles: VehicleRegistry,
    alerts: AlertRegistry,
    scheduler: NotificationScheduler,
    sink: Box<dyn AnnouncementSink>,
    pinned_focus: Option<GeoPoint>,
    stats: IngestStats,
}

impl TelemetryEngine {
    /// Build an engine from a validated configuration and a sink
    pub fn new(config: EngineConfig, sink: Box<dyn AnnouncementSink>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(TelemetryEngine {
            vehicles: VehicleRegistry::with_settings(
                config.max_path_samples,
                config.bearing_offset_deg,
            ),
            alerts: AlertRegistry::new(),
            scheduler: NotificationScheduler::with_repeats(config.announcement_repeats),
            sink,
            pinned_focus: None,
            stats: IngestStats::new(),
            seq: 0,
            config,
        })
    }

    /// Normalize and apply one raw transport event.
    ///
    /// Malformed input is recovered locally: counted, logged, returned to
    /// the caller, and never mutates registry state. The stream continues.
    pub fn apply_raw(&mut self, raw: &RawEvent) -> Result<Applied, RejectReason> {
        self.seq += 1;
        match normalize(raw, self.seq) {
            Ok(event) => Ok(self.apply(event)),
            Err(reason) => {
                warn!("Dropping event #{}: {}", self.seq, reason);
                self.stats.record_rejection(&reason);
                Err(reason)
            }
        }
    }

    /// Apply an already-normalized event
    pub fn apply(&mut self, event: NormalizedEvent) -> Applied {
        match event {
            NormalizedEvent::Position(sample) => {
                let vehicle_id = sample.vehicle_id.clone();
                let state = self.vehicles.apply_position(sample);
                debug!(
                    "Vehicle {} at ({}, {}), path length {}",
                    vehicle_id,
                    state.latest().map(|s| s.point.lat).unwrap_or_default(),
                    state.latest().map(|s| s.point.lng).unwrap_or_default(),
                    state.path.len()
                );
                self.stats.positions_applied += 1;
                Applied::Position { vehicle_id }
            }
            NormalizedEvent::AlertRaise {
                vehicle_id,
                message,
            } => {
                let transition = self.alerts.raise(vehicle_id, message, self.seq);
                if matches!(transition, AlertTransition::NewAlert { .. }) {
                    self.stats.alerts_raised += 1;
                }
                self.observe_transition(&transition);
                Applied::Alert(transition)
            }
            NormalizedEvent::AlertClear { vehicle_id } => {
                let transition = self.alerts.clear(&vehicle_id);
                if matches!(transition, AlertTransition::Cleared { .. }) {
                    self.stats.alerts_cleared += 1;
                }
                self.observe_transition(&transition);
                Applied::Alert(transition)
            }
        }
    }

    /// Operator acknowledgement of every active alert. Returns the ids
    /// that transitioned, each of which yields a cancel at the sink.
    pub fn acknowledge_all_alerts(&mut self) -> Vec<VehicleId> {
        let cleared = self.alerts.clear_all();
        for vehicle_id in &cleared {
            self.stats.alerts_cleared += 1;
            self.scheduler.cancel(vehicle_id);
        }
        self.enforce_silence_invariant();
        self.dispatch_commands();
        cleared
    }

    /// Full registry reset: vehicles, alerts, and pending announcements
    pub fn reset(&mut self) {
        self.vehicles.clear();
        self.alerts.clear_all();
        self.scheduler.cancel_all();
        self.dispatch_commands();
        self.pinned_focus = None;
    }

    /// Pin the viewport to an explicit focus point
    pub fn pin_focus(&mut self, point: GeoPoint) {
        self.pinned_focus = Some(point);
    }

    /// Release the pinned focus, resuming auto-follow
    pub fn clear_focus(&mut self) {
        self.pinned_focus = None;
    }

    /// Consistent copy of all current state for the rendering surface
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            vehicles: self.vehicles.snapshot_vehicles(),
            active_alerts: self.alerts.active_messages(),
            viewport: viewport::recommend(
                &self.vehicles,
                self.pinned_focus,
                self.vehicles.most_recently_updated(),
                &self.config,
            ),
        }
    }

    /// Whether any vehicle has reported a position yet; the rendering
    /// surface shows "tracking not enabled" when false
    pub fn is_tracking(&self) -> bool {
        !self.vehicles.is_empty()
    }

    pub fn active_alert_count(&self) -> usize {
        self.alerts.active_count()
    }

    pub fn stats(&self) -> &IngestStats {
        &self.stats
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Feed a transition to the scheduler and flush the consequences
    fn observe_transition(&mut self, transition: &AlertTransition) {
        self.scheduler.observe(transition);
        self.enforce_silence_invariant();
        self.dispatch_commands();
    }

    /// No active alerts implies no live notification jobs. This single
    /// rule is what lets the audio sink stop playback deterministically.
    fn enforce_silence_invariant(&mut self) {
        if self.alerts.active_count() == 0 {
            self.scheduler.cancel_all();
        }
    }

    /// Hand pending commands to the sink. A failed delivery loses that
    /// one announcement and nothing else.
    fn dispatch_commands(&mut self) {
        for command in self.scheduler.drain_commands() {
            if let Err(error) = self.sink.deliver(&command) {
                warn!(
                    "Lost delivery for vehicle {}: {}",
                    command.vehicle_id(),
                    error
                );
                self.stats.sink_failures += 1;
            }
        }
    }
}
