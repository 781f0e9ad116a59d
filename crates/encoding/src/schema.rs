//! Wire-level enums shared by the encoders and the collector schemas.

/// Schema type in the Batch envelope - tells the collector how to decode
/// the data payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum SchemaType {
    /// Default value (should not be used in production)
    #[default]
    Unknown = 0,
    /// Product analytics events (EventData payload)
    Event = 1,
    /// Structured log entries (LogData payload)
    Log = 2,
}

impl SchemaType {
    /// Convert to u8 for FlatBuffer encoding
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Create from u8 (returns Unknown for invalid values)
    #[inline]
    pub const fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Event,
            2 => Self::Log,
            _ => Self::Unknown,
        }
    }
}

/// Event types for different processing paths
///
/// Determines downstream processing and storage routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum EventType {
    /// Default value (should not be used in production)
    #[default]
    Unknown = 0,
    /// User action tracking (page views, clicks, etc.)
    Track = 1,
    /// User identification/traits updates
    Identify = 2,
    /// Group membership/traits updates
    Group = 3,
    /// Identity resolution/user merging
    Alias = 4,
    /// Generic entity enrichment
    Enrich = 5,
    /// Session/device context updates
    Context = 6,
}

impl EventType {
    /// Convert to u8 for FlatBuffer encoding
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Create from u8 (returns Unknown for invalid values)
    #[inline]
    pub const fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Track,
            2 => Self::Identify,
            3 => Self::Group,
            4 => Self::Alias,
            5 => Self::Enrich,
            6 => Self::Context,
            _ => Self::Unknown,
        }
    }
}

/// Log entry kind (regular entry vs. enrichment record).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum LogEventType {
    #[default]
    Unknown = 0,
    /// Regular log entry
    Log = 1,
    /// Enrichment of an earlier entry
    Enrich = 2,
}

impl LogEventType {
    /// Convert to u8 for FlatBuffer encoding
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Create from u8 (returns Unknown for invalid values)
    #[inline]
    pub const fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Log,
            2 => Self::Enrich,
            _ => Self::Unknown,
        }
    }
}

/// Log severity - RFC 5424 levels 0-7 plus Trace (8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[repr(u8)]
pub enum LogLevel {
    Emergency = 0,
    Alert = 1,
    Critical = 2,
    Error = 3,
    Warning = 4,
    Notice = 5,
    #[default]
    Info = 6,
    Debug = 7,
    Trace = 8,
}

impl LogLevel {
    /// Convert to u8 for FlatBuffer encoding
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Create from u8 (returns Info for invalid values)
    #[inline]
    pub const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Emergency,
            1 => Self::Alert,
            2 => Self::Critical,
            3 => Self::Error,
            4 => Self::Warning,
            5 => Self::Notice,
            6 => Self::Info,
            7 => Self::Debug,
            8 => Self::Trace,
            _ => Self::Info,
        }
    }
}
