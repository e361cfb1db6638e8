//! Kamstrup Multical 401 reader.
//!
//! Drives the IEC 62056-21 sign-on and readout handshake over the meter's
//! optical serial head (7E2 framing) and extracts the cumulative thermal
//! energy, volume, and hour counter registers from the response telegram.

pub mod config;
pub mod models;
pub mod protocol;
pub mod serial_link;

// Re-export common types for easier access
pub use config::{Config, ConfigError, MeterConfig};
pub use models::MeterReading;
pub use protocol::diagnostics::{DiagnosticsSink, LogSink, SessionEvent};
pub use protocol::registers::{RegisterId, RegisterKind, RegisterValue};
pub use protocol::structs::{BaudAnnouncement, Phase};
pub use protocol::{read_meter, ReadError, ReadSession, MAX_LINES_PER_PHASE};
pub use serial_link::{MeterLink, SerialLink};
