//! Announcement sink interface
//!
//! The sink is the seam to the audio/speech playback device. The engine
//! owns exactly one sink, constructed once and passed in by the caller;
//! there is no ambient global audio handle. How a sink plays a tone or
//! interrupts in-flight speech is its own business; the scheduler only
//! tells it what to announce and when to stop.

use crate::core::VehicleId;
use crate::validation::SinkError;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Commands handed to the announcement sink, in per-vehicle order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SinkCommand {
    /// Play the alert tone, then speak the utterance
    Announce {
        vehicle_id: VehicleId,
        utterance: String,
    },
    /// Stop issuing output for this vehicle, including in-flight playback
    Cancel { vehicle_id: VehicleId },
}

impl SinkCommand {
    pub fn vehicle_id(&self) -> &VehicleId {
        match self {
            SinkCommand::Announce { vehicle_id, .. } => vehicle_id,
            SinkCommand::Cancel { vehicle_id } => vehicle_id,
        }
    }
}

/// External announcement consumer.
///
/// Delivery may fail; failures are recoverable and must never block or
/// crash registry processing. At most the announcement for that occurrence
/// is lost.
pub trait AnnouncementSink: Send {
    fn deliver(&mut self, command: &SinkCommand) -> Result<(), SinkError>;
}

#[derive(Debug, Default)]
struct MemoryLog {
    delivered: Vec<SinkCommand>,
    fail_deliveries: bool,
}

/// Sink recording every delivered command into a shared log.
///
/// Cloning yields another handle to the same log, so a test can hand one
/// handle to the engine and keep another for assertions.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    inner: Arc<Mutex<MemoryLog>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose deliveries all fail, for failure-path tests
    pub fn failing() -> Self {
        MemorySink {
            inner: Arc::new(Mutex::new(MemoryLog {
                delivered: Vec::new(),
                fail_deliveries: true,
            })),
        }
    }

    /// Copy of every command delivered so far
    pub fn delivered(&self) -> Vec<SinkCommand> {
        self.inner
            .lock()
            .map(|log| log.delivered.clone())
            .unwrap_or_default()
    }

    pub fn delivered_count(&self) -> usize {
        self.inner.lock().map(|log| log.delivered.len()).unwrap_or(0)
    }
}

impl AnnouncementSink for MemorySink {
    fn deliver(&mut self, command: &SinkCommand) -> Result<(), SinkError> {
        let mut log = self
            .inner
            .lock()
            .map_err(|_| SinkError::new("sink log poisoned"))?;
        if log.fail_deliveries {
            return Err(SinkError::new("injected delivery failure"));
        }
        log.delivered.push(command.clone());
        Ok(())
    }
}

/// Sink that prints announcements to stdout, for the demo binary
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl AnnouncementSink for ConsoleSink {
    fn deliver(&mut self, command: &SinkCommand) -> Result<(), SinkError> {
        match command {
            SinkCommand::Announce {
                vehicle_id,
                utterance,
            } => println!("[announce {}] {}", vehicle_id, utterance),
            SinkCommand::Cancel { vehicle_id } => println!("[cancel {}]", vehicle_id),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_records_commands() {
        let mut sink = MemorySink::new();
        let command = SinkCommand::Announce {
            vehicle_id: "42".into(),
            utterance: "vehicle 42: crash".to_string(),
        };
        sink.deliver(&command).unwrap();
        assert_eq!(sink.delivered(), vec![command]);
    }

    #[test]
    fn test_cloned_handles_share_one_log() {
        let sink = MemorySink::new();
        let mut engine_handle = sink.clone();
        engine_handle
            .deliver(&SinkCommand::Cancel {
                vehicle_id: "7".into(),
            })
            .unwrap();
        assert_eq!(sink.delivered_count(), 1);
    }

    #[test]
    fn test_failing_sink_reports_error() {
        let mut sink = MemorySink::failing();
        let command = SinkCommand::Cancel {
            vehicle_id: "42".into(),
        };
        assert!(sink.deliver(&command).is_err());
        assert!(sink.delivered().is_empty());
    }
}
