//! Notification scheduling for alert transitions
//!
//! Consumes `AlertTransition` values in arrival order (single-threaded,
//! FIFO) and turns them into a bounded, ordered stream of sink commands.
//! Jobs for different vehicles are independent; commands for the same
//! vehicle are strictly ordered, so a cancel is observable to the sink no
//! later than any announcement issued by a prior raise of that vehicle.

use crate::core::VehicleId;
use crate::notify::sink::SinkCommand;
use crate::processing::alerts::AlertTransition;
use std::collections::{HashMap, VecDeque};

/// Default number of announcement repeats per new alert
pub const DEFAULT_ANNOUNCEMENT_REPEATS: u32 = 1;

/// Outstanding announcement work for one vehicle's alert. Cancellation
/// removes the job, so every held job is live.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationJob {
    pub vehicle_id: VehicleId,
    pub message: String,
    pub repeat_count: u32,
}

/// Turns alert registry transitions into announcement jobs and sink
/// commands, and cancels pending work when an alert is cleared.
#[derive(Debug)]
pub struct NotificationScheduler {
    repeat_count: u32,
    jobs: HashMap<VehicleId, NotificationJob>,
    outbound: VecDeque<SinkCommand>,
}

impl NotificationScheduler {
    pub fn new() -> Self {
        Self::with_repeats(DEFAULT_ANNOUNCEMENT_REPEATS)
    }

    pub fn with_repeats(repeat_count: u32) -> Self {
        NotificationScheduler {
            repeat_count: repeat_count.max(1),
            jobs: HashMap::new(),
            outbound: VecDeque::new(),
        }
    }

    /// Observe one alert transition, in arrival order.
    ///
    /// `NewAlert` enqueues a job and its announcements. `MessageUpdated`
    /// enqueues nothing: an alert already known to the observer must not
    /// re-interrupt unless explicitly cleared and re-raised. `Cleared`
    /// cancels the outstanding job. `NoOp` is ignored.
    pub fn observe(&mut self, transition: &AlertTransition) {
        match transition {
            AlertTransition::NewAlert {
                vehicle_id,
                message,
            } => {
                let job = NotificationJob {
                    vehicle_id: vehicle_id.clone(),
                    message: message.clone(),
                    repeat_count: self.repeat_count,
                };
                for _ in 0..self.repeat_count {
                    self.outbound.push_back(SinkCommand::Announce {
                        vehicle_id: vehicle_id.clone(),
                        utterance: format!("vehicle {}: {}", vehicle_id, message),
                    });
                }
                self.jobs.insert(vehicle_id.clone(), job);
            }
            AlertTransition::MessageUpdated { .. } => {}
            AlertTransition::Cleared { vehicle_id } => {
                self.cancel(vehicle_id);
            }
            AlertTransition::NoOp => {}
        }
    }

    /// Cancel the outstanding job for one vehicle: drop the job, retract
    /// its pending announcements, and tell the sink to interrupt anything
    /// in flight. Cancelling a vehicle with no job is a no-op.
    pub fn cancel(&mut self, vehicle_id: &VehicleId) {
        if self.jobs.remove(vehicle_id).is_some() {
            self.outbound.retain(|command| {
                !matches!(command, SinkCommand::Announce { vehicle_id: id, .. } if id == vehicle_id)
            });
            self.outbound.push_back(SinkCommand::Cancel {
                vehicle_id: vehicle_id.clone(),
            });
        }
    }

    /// Cancel every outstanding job, used on bulk clear or registry reset
    pub fn cancel_all(&mut self) {
        let live: Vec<VehicleId> = self.jobs.keys().cloned().collect();
        for vehicle_id in live {
            self.cancel(&vehicle_id);
        }
    }

    /// Drain pending sink commands, FIFO
    pub fn drain_commands(&mut self) -> Vec<SinkCommand> {
        self.outbound.drain(..).collect()
    }

    pub fn pending_command_count(&self) -> usize {
        self.outbound.len()
    }

    /// Number of outstanding jobs
    pub fn live_job_count(&self) -> usize {
        self.jobs.len()
    }

    pub fn job(&self, vehicle_id: &VehicleId) -> Option<&NotificationJob> {
        self.jobs.get(vehicle_id)
    }
}

impl Default for NotificationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_alert(id: &str, message: &str) -> AlertTransition {
        AlertTransition::NewAlert {
            vehicle_id: id.into(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_new_alert_enqueues_one_job() {
        let mut scheduler = NotificationScheduler::new();
        scheduler.observe(&new_alert("42", "crash"));

        assert_eq!(scheduler.live_job_count(), 1);
        let commands = scheduler.drain_commands();
        assert_eq!(
            commands,
            vec![SinkCommand::Announce {
                vehicle_id: "42".into(),
                utterance: "vehicle 42: crash".to_string(),
            }]
        );
    }

    #[test]
    fn test_configurable_repeat_count() {
        let mut scheduler = NotificationScheduler::with_repeats(3);
        scheduler.observe(&new_alert("7", "low fuel"));

        let commands = scheduler.drain_commands();
        assert_eq!(commands.len(), 3);
        assert!(commands
            .iter()
            .all(|c| matches!(c, SinkCommand::Announce { vehicle_id, .. } if vehicle_id.as_str() == "7")));
    }

    #[test]
    fn test_message_update_does_not_renotify() {
        let mut scheduler = NotificationScheduler::new();
        scheduler.observe(&new_alert("1", "low fuel"));
        scheduler.drain_commands();

        scheduler.observe(&AlertTransition::MessageUpdated {
            vehicle_id: "1".into(),
            message: "tire burst".to_string(),
        });
        assert_eq!(scheduler.pending_command_count(), 0);
        assert_eq!(scheduler.live_job_count(), 1);
    }

    #[test]
    fn test_clear_cancels_pending_announcements() {
        let mut scheduler = NotificationScheduler::with_repeats(3);
        scheduler.observe(&new_alert("1", "crash"));
        // Not drained yet; clear must retract the pending announcements
        scheduler.observe(&AlertTransition::Cleared {
            vehicle_id: "1".into(),
        });

        let commands = scheduler.drain_commands();
        assert_eq!(
            commands,
            vec![SinkCommand::Cancel {
                vehicle_id: "1".into(),
            }]
        );
        assert_eq!(scheduler.live_job_count(), 0);
        assert!(scheduler.job(&"1".into()).is_none());
    }

    #[test]
    fn test_cancelled_jobs_are_pruned() {
        let mut scheduler = NotificationScheduler::new();
        for id in ["1", "2", "3"] {
            scheduler.observe(&new_alert(id, "stuck"));
            scheduler.observe(&AlertTransition::Cleared {
                vehicle_id: id.into(),
            });
        }

        // Nothing lingers after the clears, only the cancels to drain
        assert_eq!(scheduler.live_job_count(), 0);
        assert!(scheduler.job(&"2".into()).is_none());
        let commands = scheduler.drain_commands();
        assert_eq!(commands.len(), 3);
        assert!(commands
            .iter()
            .all(|c| matches!(c, SinkCommand::Cancel { .. })));
    }

    #[test]
    fn test_clear_without_job_emits_nothing() {
        let mut scheduler = NotificationScheduler::new();
        scheduler.observe(&AlertTransition::Cleared {
            vehicle_id: "99".into(),
        });
        scheduler.observe(&AlertTransition::NoOp);
        assert_eq!(scheduler.pending_command_count(), 0);
    }

    #[test]
    fn test_per_vehicle_ordering_preserved() {
        let mut scheduler = NotificationScheduler::new();
        scheduler.observe(&new_alert("1", "crash"));
        scheduler.observe(&new_alert("2", "spin"));
        scheduler.observe(&AlertTransition::Cleared {
            vehicle_id: "1".into(),
        });

        let commands = scheduler.drain_commands();
        // Vehicle 2's announcement survives; vehicle 1's is retracted and
        // replaced by a cancel that arrives after its (removed) announce slot
        assert_eq!(commands.len(), 2);
        assert!(matches!(
            &commands[0],
            SinkCommand::Announce { vehicle_id, .. } if vehicle_id.as_str() == "2"
        ));
        assert_eq!(
            commands[1],
            SinkCommand::Cancel {
                vehicle_id: "1".into(),
            }
        );
    }

    #[test]
    fn test_cancel_all() {
        let mut scheduler = NotificationScheduler::new();
        scheduler.observe(&new_alert("1", "a"));
        scheduler.observe(&new_alert("2", "b"));
        scheduler.drain_commands();

        scheduler.cancel_all();
        assert_eq!(scheduler.live_job_count(), 0);

        let commands = scheduler.drain_commands();
        assert_eq!(commands.len(), 2);
        assert!(commands
            .iter()
            .all(|c| matches!(c, SinkCommand::Cancel { .. })));

        // Idempotent: nothing left to cancel
        scheduler.cancel_all();
        assert_eq!(scheduler.pending_command_count(), 0);
    }

    #[test]
    fn test_reraise_after_clear_notifies_again() {
        let mut scheduler = NotificationScheduler::new();
        scheduler.observe(&new_alert("1", "crash"));
        scheduler.observe(&AlertTransition::Cleared {
            vehicle_id: "1".into(),
        });
        scheduler.drain_commands();

        scheduler.observe(&new_alert("1", "crash again"));
        assert_eq!(scheduler.live_job_count(), 1);
        let commands = scheduler.drain_commands();
        assert_eq!(
            commands,
            vec![SinkCommand::Announce {
                vehicle_id: "1".into(),
                utterance: "vehicle 1: crash again".to_string(),
            }]
        );
    }
}
