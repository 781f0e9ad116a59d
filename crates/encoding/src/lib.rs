//! Tell wire encoding
//!
//! Hand-written encoders for the Tell collector's FlatBuffer-compatible wire
//! format. No code generation, no runtime dependencies: every message is
//! assembled byte-by-byte into a caller-supplied `Vec<u8>`, so a sender can
//! reuse its buffers across batches.
//!
//! # Wire Format
//!
//! FlatBuffers use a vtable-based layout:
//! ```text
//! [4 bytes: root offset] -> [table]
//!                              |
//!                              v
//!                           [vtable offset (i32)]
//!                           [inline scalars + vector offsets]
//!
//! [vtable]
//!   [vtable size (u16)]
//!   [table size (u16)]
//!   [field offsets (u16 each, 0 = field absent)]
//! ```
//!
//! All scalars are little-endian; multi-byte fields are 4-byte aligned with
//! zero padding. Strings are length-prefixed and NUL-terminated; byte vectors
//! are length-prefixed.
//!
//! # Messages
//!
//! - [`encode_event_into`] / [`encode_event_data_into`] - analytics events
//!   and the `EventData` container (`event.fbs`)
//! - [`encode_log_entry_into`] / [`encode_log_data_into`] - log entries and
//!   the `LogData` container (`log.fbs`)
//! - [`encode_batch_into`] - the outer `Batch` envelope (`common.fbs`)

mod batch;
mod event;
mod helpers;
mod log;
mod schema;

pub use batch::{BatchParams, encode_batch_into};
pub use event::{EventParams, encode_event_data_into, encode_event_into};
pub use log::{LogEntryParams, encode_log_data_into, encode_log_entry_into};
pub use schema::{EventType, LogEventType, LogLevel, SchemaType};

/// API key length in bytes
pub const API_KEY_LENGTH: usize = 16;

/// UUID length in bytes (device_id, session_id)
pub const UUID_LENGTH: usize = 16;

/// Default protocol version (v1.0 = 100)
pub const DEFAULT_VERSION: u8 = 100;

#[cfg(test)]
mod log_test;
#[cfg(test)]
mod schema_test;
