//! Event FlatBuffer encoding
//!
//! Encodes analytics events into the EventData format defined in `event.fbs`:
//!
//! ```text
//! table Event {
//!     event_type:EventType (id: 0);
//!     timestamp:uint64 (id: 1);
//!     service:string (id: 2);
//!     device_id:[ubyte] (id: 3);
//!     session_id:[ubyte] (id: 4);
//!     event_name:string (id: 5);
//!     payload:[ubyte] (id: 6);
//! }
//! table EventData { events:[Event] (required); }
//! ```
//!
//! Forward layout: root offset first, each table's vtable immediately before
//! it, vectors and strings after the table that references them.

use crate::UUID_LENGTH;
use crate::helpers::{
    align4, patch_offset, patch_u32, write_byte_vector, write_i32, write_string, write_u16,
    write_u32, write_u64,
};
use crate::schema::EventType;

/// Borrowed view of one event, ready to encode.
///
/// Optional fields are elided from the wire (vtable slot 0) when `None`;
/// a payload is also elided when empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventParams<'a> {
    pub event_type: EventType,
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
    pub service: Option<&'a str>,
    pub device_id: Option<&'a [u8; UUID_LENGTH]>,
    pub session_id: Option<&'a [u8; UUID_LENGTH]>,
    pub event_name: Option<&'a str>,
    pub payload: Option<&'a [u8]>,
}

/// Encode a single Event as a standalone FlatBuffer (root offset included),
/// appended to `buf`.
///
/// Table layout (inline offsets relative to the table start):
/// ```text
/// +0:  soffset to vtable (i32)
/// +4:  device_id offset     +8:  session_id offset
/// +12: event_name offset    +16: payload offset
/// +20: timestamp (u64)
/// +28: event_type (u8), 3 pad
/// +32: service offset
/// ```
pub fn encode_event_into(buf: &mut Vec<u8>, params: &EventParams<'_>) {
    let has_service = params.service.is_some();
    let has_device_id = params.device_id.is_some();
    let has_session_id = params.session_id.is_some();
    let has_event_name = params.event_name.is_some();
    let has_payload = params.payload.is_some_and(|p| !p.is_empty());

    // Root offset placeholder
    let root_pos = buf.len();
    buf.extend_from_slice(&[0u8; 4]);

    // === VTable ===
    let vtable_start = buf.len();
    write_u16(buf, 18); // vtable_size: 4 header + 7 fields * 2
    write_u16(buf, 36); // table_size: soffset + 32 inline bytes
    write_u16(buf, 28); // field 0: event_type at +28
    write_u16(buf, 20); // field 1: timestamp at +20
    write_u16(buf, if has_service { 32 } else { 0 }); // field 2: service
    write_u16(buf, if has_device_id { 4 } else { 0 }); // field 3: device_id
    write_u16(buf, if has_session_id { 8 } else { 0 }); // field 4: session_id
    write_u16(buf, if has_event_name { 12 } else { 0 }); // field 5: event_name
    write_u16(buf, if has_payload { 16 } else { 0 }); // field 6: payload
    buf.extend_from_slice(&[0u8; 2]); // pad vtable to 4-byte alignment

    // === Table ===
    let table_start = buf.len();
    write_i32(buf, (table_start - vtable_start) as i32);

    let device_id_off_pos = buf.len();
    buf.extend_from_slice(&[0u8; 4]);
    let session_id_off_pos = buf.len();
    buf.extend_from_slice(&[0u8; 4]);
    let event_name_off_pos = buf.len();
    buf.extend_from_slice(&[0u8; 4]);
    let payload_off_pos = buf.len();
    buf.extend_from_slice(&[0u8; 4]);

    write_u64(buf, params.timestamp);
    buf.push(params.event_type.as_u8());
    buf.extend_from_slice(&[0u8; 3]); // padding

    let service_off_pos = buf.len();
    buf.extend_from_slice(&[0u8; 4]);

    // === Vectors and strings ===
    align4(buf);

    let mut device_id_start = 0;
    if let Some(id) = params.device_id {
        device_id_start = write_byte_vector(buf, id);
        align4(buf);
    }

    let mut session_id_start = 0;
    if let Some(id) = params.session_id {
        session_id_start = write_byte_vector(buf, id);
        align4(buf);
    }

    let mut service_start = 0;
    if let Some(service) = params.service {
        service_start = write_string(buf, service);
        align4(buf);
    }

    let mut event_name_start = 0;
    if let Some(name) = params.event_name {
        event_name_start = write_string(buf, name);
        align4(buf);
    }

    let mut payload_start = 0;
    if has_payload {
        payload_start = write_byte_vector(buf, params.payload.unwrap_or_default());
    }

    // === Patch offsets ===
    patch_u32(buf, root_pos, (table_start - root_pos) as u32);

    if has_device_id {
        patch_offset(buf, device_id_off_pos, device_id_start);
    }
    if has_session_id {
        patch_offset(buf, session_id_off_pos, session_id_start);
    }
    if has_service {
        patch_offset(buf, service_off_pos, service_start);
    }
    if has_event_name {
        patch_offset(buf, event_name_off_pos, event_name_start);
    }
    if has_payload {
        patch_offset(buf, payload_off_pos, payload_start);
    }
}

/// Encode an EventData container (count-prefixed vector of Event tables),
/// appended to `buf`. Returns the start position of the container so callers
/// appending into a shared buffer can slice it back out.
pub fn encode_event_data_into(buf: &mut Vec<u8>, events: &[EventParams<'_>]) -> usize {
    let data_start = buf.len();
    let count = events.len();

    // Root offset placeholder
    let root_pos = buf.len();
    buf.extend_from_slice(&[0u8; 4]);

    // === EventData vtable ===
    let vtable_start = buf.len();
    write_u16(buf, 6); // vtable_size: 4 header + 1 field * 2
    write_u16(buf, 8); // table_size: soffset + events offset
    write_u16(buf, 4); // field 0: events at +4
    buf.extend_from_slice(&[0u8; 2]); // align vtable

    // === EventData table ===
    let table_start = buf.len();
    write_i32(buf, (table_start - vtable_start) as i32);

    let events_off_pos = buf.len();
    buf.extend_from_slice(&[0u8; 4]);

    align4(buf);

    // === Events vector (offsets to Event tables) ===
    let events_vec_start = buf.len();
    write_u32(buf, count as u32);

    let offsets_start = buf.len();
    for _ in 0..count {
        buf.extend_from_slice(&[0u8; 4]);
    }

    align4(buf);

    // Each event is emitted as a standalone FlatBuffer; its leading root
    // offset locates the table the vector slot must point at.
    let mut table_positions = Vec::with_capacity(count);
    for params in events {
        align4(buf);
        let event_start = buf.len();
        encode_event_into(buf, params);

        let root_offset = u32::from_le_bytes([
            buf[event_start],
            buf[event_start + 1],
            buf[event_start + 2],
            buf[event_start + 3],
        ]) as usize;
        table_positions.push(event_start + root_offset);
    }

    // === Patch offsets ===
    for (i, &table_pos) in table_positions.iter().enumerate() {
        patch_offset(buf, offsets_start + i * 4, table_pos);
    }

    patch_offset(buf, events_off_pos, events_vec_start);
    patch_u32(buf, root_pos, (table_start - data_start) as u32);

    data_start
}
