//! Error taxonomy and ingest accounting

pub mod error;

pub use error::{IngestStats, RejectReason, SinkError};
