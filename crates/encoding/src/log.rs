//! Log FlatBuffer encoding
//!
//! Encodes log entries into the LogData format defined in `log.fbs`:
//!
//! ```text
//! table LogEntry {
//!     event_type:LogEventType (id: 0);
//!     session_id:[ubyte] (id: 1);
//!     level:LogLevel (id: 2);
//!     timestamp:uint64 (id: 3);
//!     source:string (id: 4);
//!     service:string (id: 5);
//!     payload:[ubyte] (id: 6);
//! }
//! table LogData { logs:[LogEntry] (required); }
//! ```

use crate::helpers::{
    align4, patch_offset, patch_u32, write_byte_vector, write_i32, write_string, write_u16,
    write_u32, write_u64,
};
use crate::schema::{LogEventType, LogLevel};
use crate::UUID_LENGTH;

/// Borrowed view of one log entry, ready to encode.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogEntryParams<'a> {
    pub event_type: LogEventType,
    pub session_id: Option<&'a [u8; UUID_LENGTH]>,
    pub level: LogLevel,
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
    pub source: Option<&'a str>,
    pub service: Option<&'a str>,
    pub payload: Option<&'a [u8]>,
}

/// Encode a single LogEntry as a standalone FlatBuffer, appended to `buf`.
///
/// Table layout (inline offsets relative to the table start):
/// ```text
/// +0:  soffset to vtable (i32)
/// +4:  session_id offset    +8:  source offset
/// +12: service offset       +16: payload offset
/// +20: timestamp (u64)
/// +28: event_type (u8)      +29: level (u8), 2 pad
/// ```
pub fn encode_log_entry_into(buf: &mut Vec<u8>, params: &LogEntryParams<'_>) {
    let has_session_id = params.session_id.is_some();
    let has_source = params.source.is_some();
    let has_service = params.service.is_some();
    let has_payload = params.payload.is_some_and(|p| !p.is_empty());

    // Root offset placeholder
    let root_pos = buf.len();
    buf.extend_from_slice(&[0u8; 4]);

    // === VTable ===
    let vtable_start = buf.len();
    write_u16(buf, 18); // vtable_size: 4 header + 7 fields * 2
    write_u16(buf, 32); // table_size: soffset + 28 inline bytes
    write_u16(buf, 28); // field 0: event_type at +28
    write_u16(buf, if has_session_id { 4 } else { 0 }); // field 1: session_id
    write_u16(buf, 29); // field 2: level at +29
    write_u16(buf, 20); // field 3: timestamp at +20
    write_u16(buf, if has_source { 8 } else { 0 }); // field 4: source
    write_u16(buf, if has_service { 12 } else { 0 }); // field 5: service
    write_u16(buf, if has_payload { 16 } else { 0 }); // field 6: payload
    buf.extend_from_slice(&[0u8; 2]); // pad vtable to 4-byte alignment

    // === Table ===
    let table_start = buf.len();
    write_i32(buf, (table_start - vtable_start) as i32);

    let session_id_off_pos = buf.len();
    buf.extend_from_slice(&[0u8; 4]);
    let source_off_pos = buf.len();
    buf.extend_from_slice(&[0u8; 4]);
    let service_off_pos = buf.len();
    buf.extend_from_slice(&[0u8; 4]);
    let payload_off_pos = buf.len();
    buf.extend_from_slice(&[0u8; 4]);

    write_u64(buf, params.timestamp);
    buf.push(params.event_type.as_u8());
    buf.push(params.level.as_u8());
    buf.extend_from_slice(&[0u8; 2]); // padding

    // === Vectors and strings ===
    align4(buf);

    let mut session_id_start = 0;
    if let Some(id) = params.session_id {
        session_id_start = write_byte_vector(buf, id);
        align4(buf);
    }

    let mut source_start = 0;
    if let Some(source) = params.source {
        source_start = write_string(buf, source);
        align4(buf);
    }

    let mut service_start = 0;
    if let Some(service) = params.service {
        service_start = write_string(buf, service);
        align4(buf);
    }

    let mut payload_start = 0;
    if has_payload {
        payload_start = write_byte_vector(buf, params.payload.unwrap_or_default());
    }

    // === Patch offsets ===
    patch_u32(buf, root_pos, (table_start - root_pos) as u32);

    if has_session_id {
        patch_offset(buf, session_id_off_pos, session_id_start);
    }
    if has_source {
        patch_offset(buf, source_off_pos, source_start);
    }
    if has_service {
        patch_offset(buf, service_off_pos, service_start);
    }
    if has_payload {
        patch_offset(buf, payload_off_pos, payload_start);
    }
}

/// Encode a LogData container (count-prefixed vector of LogEntry tables),
/// appended to `buf`. Returns the start position of the container.
pub fn encode_log_data_into(buf: &mut Vec<u8>, logs: &[LogEntryParams<'_>]) -> usize {
    let data_start = buf.len();
    let count = logs.len();

    // Root offset placeholder
    let root_pos = buf.len();
    buf.extend_from_slice(&[0u8; 4]);

    // === LogData vtable ===
    let vtable_start = buf.len();
    write_u16(buf, 6); // vtable_size: 4 header + 1 field * 2
    write_u16(buf, 8); // table_size: soffset + logs offset
    write_u16(buf, 4); // field 0: logs at +4
    buf.extend_from_slice(&[0u8; 2]); // align vtable

    // === LogData table ===
    let table_start = buf.len();
    write_i32(buf, (table_start - vtable_start) as i32);

    let logs_off_pos = buf.len();
    buf.extend_from_slice(&[0u8; 4]);

    align4(buf);

    // === Logs vector (offsets to LogEntry tables) ===
    let logs_vec_start = buf.len();
    write_u32(buf, count as u32);

    let offsets_start = buf.len();
    for _ in 0..count {
        buf.extend_from_slice(&[0u8; 4]);
    }

    align4(buf);

    let mut table_positions = Vec::with_capacity(count);
    for params in logs {
        align4(buf);
        let entry_start = buf.len();
        encode_log_entry_into(buf, params);

        let root_offset = u32::from_le_bytes([
            buf[entry_start],
            buf[entry_start + 1],
            buf[entry_start + 2],
            buf[entry_start + 3],
        ]) as usize;
        table_positions.push(entry_start + root_offset);
    }

    // === Patch offsets ===
    for (i, &table_pos) in table_positions.iter().enumerate() {
        patch_offset(buf, offsets_start + i * 4, table_pos);
    }

    patch_offset(buf, logs_off_pos, logs_vec_start);
    patch_u32(buf, root_pos, (table_start - data_start) as u32);

    data_start
}
