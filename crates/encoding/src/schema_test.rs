//! Round-trip tests for the wire enums.

use crate::schema::{EventType, LogEventType, LogLevel, SchemaType};

#[test]
fn test_schema_type_roundtrip() {
    for st in [SchemaType::Unknown, SchemaType::Event, SchemaType::Log] {
        assert_eq!(SchemaType::from_u8(st.as_u8()), st);
    }
    assert_eq!(SchemaType::from_u8(200), SchemaType::Unknown);
}

#[test]
fn test_event_type_values() {
    assert_eq!(EventType::Unknown.as_u8(), 0);
    assert_eq!(EventType::Track.as_u8(), 1);
    assert_eq!(EventType::Identify.as_u8(), 2);
    assert_eq!(EventType::Group.as_u8(), 3);
    assert_eq!(EventType::Alias.as_u8(), 4);
    assert_eq!(EventType::Enrich.as_u8(), 5);
    assert_eq!(EventType::Context.as_u8(), 6);
    assert_eq!(EventType::from_u8(255), EventType::Unknown);
}

#[test]
fn test_log_event_type_roundtrip() {
    for t in [LogEventType::Unknown, LogEventType::Log, LogEventType::Enrich] {
        assert_eq!(LogEventType::from_u8(t.as_u8()), t);
    }
}

#[test]
fn test_log_level_rfc5424_values() {
    assert_eq!(LogLevel::Emergency.as_u8(), 0);
    assert_eq!(LogLevel::Alert.as_u8(), 1);
    assert_eq!(LogLevel::Critical.as_u8(), 2);
    assert_eq!(LogLevel::Error.as_u8(), 3);
    assert_eq!(LogLevel::Warning.as_u8(), 4);
    assert_eq!(LogLevel::Notice.as_u8(), 5);
    assert_eq!(LogLevel::Info.as_u8(), 6);
    assert_eq!(LogLevel::Debug.as_u8(), 7);
    assert_eq!(LogLevel::Trace.as_u8(), 8);
}

#[test]
fn test_log_level_invalid_defaults_to_info() {
    assert_eq!(LogLevel::from_u8(42), LogLevel::Info);
    assert_eq!(LogLevel::default(), LogLevel::Info);
}
