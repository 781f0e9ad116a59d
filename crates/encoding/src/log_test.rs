//! Byte-level tests for the LogEntry and LogData encoders.

use crate::log::{LogEntryParams, encode_log_data_into, encode_log_entry_into};
use crate::schema::{LogEventType, LogLevel};

fn read_u16(buf: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([buf[offset], buf[offset + 1]])
}

fn read_u32(buf: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([buf[offset], buf[offset + 1], buf[offset + 2], buf[offset + 3]])
}

fn read_u64(buf: &[u8], offset: usize) -> u64 {
    u64::from_le_bytes(buf[offset..offset + 8].try_into().unwrap())
}

fn vtable_of(buf: &[u8], table: usize) -> usize {
    table - read_u32(buf, table) as i32 as usize
}

fn field_pos(buf: &[u8], table: usize, index: usize) -> Option<usize> {
    let vtable = vtable_of(buf, table);
    let slot = read_u16(buf, vtable + 4 + index * 2) as usize;
    (slot != 0).then_some(table + slot)
}

fn read_vector(buf: &[u8], field_pos: usize) -> &[u8] {
    let vec_start = field_pos + read_u32(buf, field_pos) as usize;
    let len = read_u32(buf, vec_start) as usize;
    &buf[vec_start + 4..vec_start + 4 + len]
}

#[test]
fn test_log_entry_layout() {
    let session = [0x5A; 16];
    let mut buf = Vec::new();
    encode_log_entry_into(
        &mut buf,
        &LogEntryParams {
            event_type: LogEventType::Log,
            session_id: Some(&session),
            level: LogLevel::Error,
            timestamp: 1_700_000_000_456,
            source: Some("web-01"),
            service: Some("api-gateway"),
            payload: Some(b"{\"message\":\"boom\"}"),
        },
    );

    let table = read_u32(&buf, 0) as usize;
    let vtable = vtable_of(&buf, table);
    assert_eq!(read_u16(&buf, vtable), 18); // 4 + 7 fields * 2
    assert_eq!(read_u16(&buf, vtable + 2), 32);

    // event_type, session_id, level, timestamp, source, service, payload
    let slots: Vec<u16> = (0..7).map(|i| read_u16(&buf, vtable + 4 + i * 2)).collect();
    assert_eq!(slots, [28, 4, 29, 20, 8, 12, 16]);

    assert_eq!(buf[table + 28], LogEventType::Log.as_u8());
    assert_eq!(buf[table + 29], LogLevel::Error.as_u8());
    assert_eq!(read_u64(&buf, table + 20), 1_700_000_000_456);

    assert_eq!(read_vector(&buf, field_pos(&buf, table, 1).unwrap()), &session);
    assert_eq!(read_vector(&buf, field_pos(&buf, table, 4).unwrap()), b"web-01");
    assert_eq!(
        read_vector(&buf, field_pos(&buf, table, 5).unwrap()),
        b"api-gateway"
    );
    assert_eq!(
        read_vector(&buf, field_pos(&buf, table, 6).unwrap()),
        b"{\"message\":\"boom\"}"
    );
}

#[test]
fn test_log_entry_optional_fields_elided() {
    let mut buf = Vec::new();
    encode_log_entry_into(
        &mut buf,
        &LogEntryParams {
            level: LogLevel::Info,
            timestamp: 7,
            ..Default::default()
        },
    );

    let table = read_u32(&buf, 0) as usize;
    assert!(field_pos(&buf, table, 1).is_none()); // session_id
    assert!(field_pos(&buf, table, 4).is_none()); // source
    assert!(field_pos(&buf, table, 5).is_none()); // service
    assert!(field_pos(&buf, table, 6).is_none()); // payload

    assert_eq!(buf[table + 29], LogLevel::Info.as_u8());
}

#[test]
fn test_log_data_count_and_levels() {
    let session = [0x09; 16];
    let levels = [LogLevel::Trace, LogLevel::Warning, LogLevel::Emergency];
    let entries: Vec<LogEntryParams<'_>> = levels
        .iter()
        .map(|&level| LogEntryParams {
            event_type: LogEventType::Log,
            session_id: Some(&session),
            level,
            timestamp: 1,
            payload: Some(b"{}"),
            ..Default::default()
        })
        .collect();

    let mut buf = Vec::new();
    let data_start = encode_log_data_into(&mut buf, &entries);
    assert_eq!(data_start, 0);

    let table = read_u32(&buf, 0) as usize;
    let logs_pos = field_pos(&buf, table, 0).unwrap();
    let vec_start = logs_pos + read_u32(&buf, logs_pos) as usize;
    assert_eq!(read_u32(&buf, vec_start), 3);

    for (i, &level) in levels.iter().enumerate() {
        let slot_pos = vec_start + 4 + i * 4;
        let entry_table = slot_pos + read_u32(&buf, slot_pos) as usize;
        assert_eq!(buf[entry_table + 29], level.as_u8());
    }
}
