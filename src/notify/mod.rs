//! Alert notification scheduling and announcement delivery

pub mod scheduler;
pub mod sink;

pub use scheduler::{NotificationJob, NotificationScheduler};
pub use sink::{AnnouncementSink, ConsoleSink, MemorySink, SinkCommand};
