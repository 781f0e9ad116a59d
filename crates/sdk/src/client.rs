//! The Tell client facade
//!
//! Every ingest call validates its input, merges process-wide super
//! properties with per-call properties, freezes the timestamp, device id,
//! and session snapshot, and hands the serialized record to the background
//! worker. Nothing here blocks on network I/O and nothing panics; failures
//! flow through the configured error callback.

use std::collections::BTreeMap;
use std::io::Write as _;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use parking_lot::RwLock;
use uuid::Uuid;

use tell_encoding::{EventType, LogLevel};

use crate::config::TellConfig;
use crate::error::{ErrorCallback, Result, TellError};
use crate::props::{Props, write_escaped};
use crate::validation;
use crate::worker::{QueuedEvent, QueuedLog, Worker};

/// A Tell client: batched analytics events and structured logs, shipped to
/// a collector by a background worker.
///
/// All ingest methods are non-blocking and safe to call from any number of
/// threads. Dropping the client closes it (draining and flushing pending
/// records) if [`close`](Tell::close) was not called explicitly.
///
/// # Example
///
/// ```no_run
/// use tell_sdk::{Props, Tell, TellConfig};
///
/// let client = Tell::new(TellConfig::production("a1b2c3d4e5f60718293a4b5c6d7e8f90")?)?;
///
/// client.register_props(&Props::new().add("plan", "pro"));
/// client.track("user_1", "Page Viewed", &Props::new().add("url", "/home"));
/// client.log_info("checkout worker started");
///
/// client.close();
/// # Ok::<(), tell_sdk::TellError>(())
/// ```
pub struct Tell {
    device_id: [u8; 16],
    session_id: RwLock<[u8; 16]>,
    super_props: RwLock<BTreeMap<String, Vec<u8>>>,
    on_error: Option<ErrorCallback>,
    close_timeout: Duration,
    closed: AtomicBool,
    worker: Worker,
}

impl std::fmt::Debug for Tell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tell")
            .field("device_id", &self.device_id)
            .field("session_id", &self.session_id)
            .field("close_timeout", &self.close_timeout)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

impl Tell {
    /// Create a client and start its background worker.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error for a malformed endpoint, or `Io` if
    /// the worker thread cannot be spawned.
    pub fn new(config: TellConfig) -> Result<Self> {
        let on_error = config.on_error().cloned();
        let close_timeout = config.close_timeout();
        let worker = Worker::spawn(config)?;

        Ok(Self {
            device_id: new_uuid(),
            session_id: RwLock::new(new_uuid()),
            super_props: RwLock::new(BTreeMap::new()),
            on_error,
            close_timeout,
            closed: AtomicBool::new(false),
            worker,
        })
    }

    // --- Events ---

    /// Record a user action.
    ///
    /// Payload: `{"user_id":…, <super properties>, <properties>}`; the
    /// event name travels as its own field. Per-call properties win over
    /// super properties on key collision.
    pub fn track(&self, user_id: &str, event_name: &str, properties: &Props) {
        if !self.check_open() {
            return;
        }
        if !validation::check_user_id(user_id) {
            self.report_error(&TellError::validation("userId", "is required"));
            return;
        }
        if !validation::check_event_name(event_name) {
            let reason = if event_name.is_empty() {
                "is required"
            } else {
                "must be at most 256 characters"
            };
            self.report_error(&TellError::validation("eventName", reason));
            return;
        }

        let mut payload = Vec::with_capacity(64 + user_id.len() + properties.raw().len());
        payload.extend_from_slice(b"{\"user_id\":\"");
        write_escaped(&mut payload, user_id);
        payload.push(b'"');
        self.append_super_props(&mut payload);
        append_props(&mut payload, properties);
        payload.push(b'}');

        self.enqueue_event(EventType::Track, Some(event_name.to_string()), payload);
    }

    /// Set traits on a user.
    ///
    /// Payload: `{"user_id":…,"traits":{…}}`. Super properties are not
    /// merged into traits.
    pub fn identify(&self, user_id: &str, traits: &Props) {
        if !self.check_open() {
            return;
        }
        if !validation::check_user_id(user_id) {
            self.report_error(&TellError::validation("userId", "is required"));
            return;
        }

        let mut payload = Vec::with_capacity(64 + user_id.len() + traits.raw().len());
        payload.extend_from_slice(b"{\"user_id\":\"");
        write_escaped(&mut payload, user_id);
        payload.push(b'"');
        if !traits.is_empty() {
            payload.extend_from_slice(b",\"traits\":{");
            payload.extend_from_slice(traits.raw());
            payload.push(b'}');
        }
        payload.push(b'}');

        self.enqueue_event(EventType::Identify, None, payload);
    }

    /// Associate a user with a group.
    ///
    /// Payload: `{"group_id":…,"user_id":…, <super properties>, <properties>}`.
    pub fn group(&self, user_id: &str, group_id: &str, properties: &Props) {
        if !self.check_open() {
            return;
        }
        if !validation::check_user_id(user_id) {
            self.report_error(&TellError::validation("userId", "is required"));
            return;
        }
        if group_id.is_empty() {
            self.report_error(&TellError::validation("groupId", "is required"));
            return;
        }

        let mut payload =
            Vec::with_capacity(80 + user_id.len() + group_id.len() + properties.raw().len());
        payload.extend_from_slice(b"{\"group_id\":\"");
        write_escaped(&mut payload, group_id);
        payload.extend_from_slice(b"\",\"user_id\":\"");
        write_escaped(&mut payload, user_id);
        payload.push(b'"');
        self.append_super_props(&mut payload);
        append_props(&mut payload, properties);
        payload.push(b'}');

        self.enqueue_event(EventType::Group, None, payload);
    }

    /// Record revenue, emitted as a Track event named "Order Completed".
    ///
    /// Payload:
    /// `{"user_id":…,"amount":…,"currency":…,"order_id":…, <super>, <properties>}`.
    pub fn revenue(
        &self,
        user_id: &str,
        amount: f64,
        currency: &str,
        order_id: &str,
        properties: &Props,
    ) {
        if !self.check_open() {
            return;
        }
        if !validation::check_user_id(user_id) {
            self.report_error(&TellError::validation("userId", "is required"));
            return;
        }
        if amount <= 0.0 {
            self.report_error(&TellError::validation("amount", "must be positive"));
            return;
        }
        if currency.is_empty() {
            self.report_error(&TellError::validation("currency", "is required"));
            return;
        }
        if order_id.is_empty() {
            self.report_error(&TellError::validation("orderId", "is required"));
            return;
        }

        let mut payload = Vec::with_capacity(
            120 + user_id.len() + currency.len() + order_id.len() + properties.raw().len(),
        );
        payload.extend_from_slice(b"{\"user_id\":\"");
        write_escaped(&mut payload, user_id);
        payload.extend_from_slice(b"\",\"amount\":");
        let _ = write!(payload, "{amount}");
        payload.extend_from_slice(b",\"currency\":\"");
        write_escaped(&mut payload, currency);
        payload.extend_from_slice(b"\",\"order_id\":\"");
        write_escaped(&mut payload, order_id);
        payload.push(b'"');
        self.append_super_props(&mut payload);
        append_props(&mut payload, properties);
        payload.push(b'}');

        self.enqueue_event(
            EventType::Track,
            Some(crate::events::ORDER_COMPLETED.to_string()),
            payload,
        );
    }

    /// Merge a previous identity into a user.
    ///
    /// Payload: `{"previous_id":…,"user_id":…}`.
    pub fn alias(&self, previous_id: &str, user_id: &str) {
        if !self.check_open() {
            return;
        }
        if previous_id.is_empty() {
            self.report_error(&TellError::validation("previousId", "is required"));
            return;
        }
        if !validation::check_user_id(user_id) {
            self.report_error(&TellError::validation("userId", "is required"));
            return;
        }

        let mut payload = Vec::with_capacity(40 + previous_id.len() + user_id.len());
        payload.extend_from_slice(b"{\"previous_id\":\"");
        write_escaped(&mut payload, previous_id);
        payload.extend_from_slice(b"\",\"user_id\":\"");
        write_escaped(&mut payload, user_id);
        payload.extend_from_slice(b"\"}");

        self.enqueue_event(EventType::Alias, None, payload);
    }

    // --- Logging ---

    /// Record a structured log entry.
    ///
    /// Payload: `{"message":…, <data>}`. Super properties are not merged
    /// into logs. An empty `service` omits the field from the wire.
    pub fn log(&self, level: LogLevel, message: &str, service: &str, data: &Props) {
        if !self.check_open() {
            return;
        }
        if !validation::check_log_message(message) {
            let reason = if message.is_empty() {
                "is required"
            } else {
                "must be at most 65536 characters"
            };
            self.report_error(&TellError::validation("message", reason));
            return;
        }
        if !validation::check_service_name(service) {
            self.report_error(&TellError::validation("service", "must be at most 256 characters"));
            return;
        }

        let mut payload = Vec::with_capacity(32 + message.len() + data.raw().len());
        payload.extend_from_slice(b"{\"message\":\"");
        write_escaped(&mut payload, message);
        payload.push(b'"');
        append_props(&mut payload, data);
        payload.push(b'}');

        let entry = QueuedLog {
            level,
            timestamp: now_ms(),
            session_id: *self.session_id.read(),
            source: None,
            service: (!service.is_empty()).then(|| service.to_string()),
            payload,
        };
        self.worker.send_log(entry);
    }

    pub fn log_emergency(&self, message: &str) {
        self.log(LogLevel::Emergency, message, "", &Props::default());
    }

    pub fn log_alert(&self, message: &str) {
        self.log(LogLevel::Alert, message, "", &Props::default());
    }

    pub fn log_critical(&self, message: &str) {
        self.log(LogLevel::Critical, message, "", &Props::default());
    }

    pub fn log_error(&self, message: &str) {
        self.log(LogLevel::Error, message, "", &Props::default());
    }

    pub fn log_warning(&self, message: &str) {
        self.log(LogLevel::Warning, message, "", &Props::default());
    }

    pub fn log_notice(&self, message: &str) {
        self.log(LogLevel::Notice, message, "", &Props::default());
    }

    pub fn log_info(&self, message: &str) {
        self.log(LogLevel::Info, message, "", &Props::default());
    }

    pub fn log_debug(&self, message: &str) {
        self.log(LogLevel::Debug, message, "", &Props::default());
    }

    pub fn log_trace(&self, message: &str) {
        self.log(LogLevel::Trace, message, "", &Props::default());
    }

    // --- Super properties ---

    /// Upsert process-wide properties stamped onto every non-log event.
    /// Last write wins per key.
    pub fn register_props(&self, properties: &Props) {
        if properties.is_empty() {
            return;
        }
        let mut map = self.super_props.write();
        parse_props_into_map(properties.raw(), &mut map);
    }

    /// Remove one super property. Removing an unknown key is a no-op.
    pub fn unregister(&self, key: &str) {
        self.super_props.write().remove(key);
    }

    // --- Session ---

    /// Rotate the session id. Events enqueued afterwards carry the new id.
    pub fn reset_session(&self) {
        *self.session_id.write() = new_uuid();
    }

    // --- Lifecycle ---

    /// Ask the worker to flush everything staged so far, waiting up to
    /// `close_timeout` for the flush to complete (or be attempted).
    pub fn flush(&self) {
        if self.closed.load(Ordering::Acquire) {
            return;
        }
        let done = self.worker.send_flush();
        let _ = done.recv_timeout(self.close_timeout);
    }

    /// Flush, stop the worker, and join its thread. Waits up to
    /// `close_timeout` for the final flush; idempotent.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        let done = self.worker.send_close();
        let _ = done.recv_timeout(self.close_timeout);
        self.worker.join();
    }

    // --- Internals ---

    fn check_open(&self) -> bool {
        if self.closed.load(Ordering::Acquire) {
            self.report_error(&TellError::Closed);
            return false;
        }
        true
    }

    fn report_error(&self, err: &TellError) {
        if let Some(callback) = &self.on_error {
            callback(err);
        }
    }

    fn enqueue_event(&self, event_type: EventType, event_name: Option<String>, payload: Vec<u8>) {
        let event = QueuedEvent {
            event_type,
            timestamp: now_ms(),
            device_id: self.device_id,
            session_id: *self.session_id.read(),
            event_name,
            payload,
        };
        self.worker.send_event(event);
    }

    /// Append `,"key":value` for every super property, in map order.
    fn append_super_props(&self, buf: &mut Vec<u8>) {
        let map = self.super_props.read();
        for (key, value) in map.iter() {
            buf.push(b',');
            buf.push(b'"');
            write_escaped(buf, key);
            buf.extend_from_slice(b"\":");
            buf.extend_from_slice(value);
        }
    }
}

impl Drop for Tell {
    fn drop(&mut self) {
        if !self.closed.load(Ordering::Acquire) {
            self.close();
        }
    }
}

/// Random 16-byte identity with the version-4 / variant-1 bits set.
fn new_uuid() -> [u8; 16] {
    *Uuid::new_v4().as_bytes()
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Append `,<interior>` when the per-call properties are non-empty. Coming
/// last keeps per-call keys winning over super properties (textual
/// last-key-wins).
fn append_props(buf: &mut Vec<u8>, props: &Props) {
    if props.is_empty() {
        return;
    }
    buf.push(b',');
    buf.extend_from_slice(props.raw());
}

/// Parse a Props interior (`"key":value,"key":value,…`) into the super
/// property map, upserting entries.
///
/// Keys are unescaped; values are kept as raw already-escaped bytes so they
/// can be spliced straight into payloads. The interior originates from
/// `Props` in this process, so the parser is tolerant: it stops at the
/// first byte that cannot start a key and ignores trailing garbage.
fn parse_props_into_map(raw: &[u8], map: &mut BTreeMap<String, Vec<u8>>) {
    let n = raw.len();
    let mut i = 0;
    while i < n {
        if raw[i] != b'"' {
            break;
        }
        i += 1; // skip opening quote

        // Read the key, unescaping
        let mut key = Vec::new();
        while i < n && raw[i] != b'"' {
            if raw[i] == b'\\' && i + 1 < n {
                match raw[i + 1] {
                    b'"' => key.push(b'"'),
                    b'\\' => key.push(b'\\'),
                    b'/' => key.push(b'/'),
                    b'b' => key.push(0x08),
                    b'f' => key.push(0x0C),
                    b'n' => key.push(b'\n'),
                    b'r' => key.push(b'\r'),
                    b't' => key.push(b'\t'),
                    esc => {
                        key.push(b'\\');
                        key.push(esc);
                    }
                }
                i += 2;
            } else {
                key.push(raw[i]);
                i += 1;
            }
        }
        if i < n {
            i += 1; // skip closing quote
        }
        if i < n && raw[i] == b':' {
            i += 1;
        }

        // Read the value as raw JSON bytes
        let value_start = i;
        if i < n && raw[i] == b'"' {
            i += 1;
            while i < n {
                if raw[i] == b'\\' && i + 1 < n {
                    i += 2;
                } else if raw[i] == b'"' {
                    i += 1;
                    break;
                } else {
                    i += 1;
                }
            }
        } else {
            while i < n && raw[i] != b',' {
                i += 1;
            }
        }

        map.insert(
            String::from_utf8_lossy(&key).into_owned(),
            raw[value_start..i].to_vec(),
        );

        if i < n && raw[i] == b',' {
            i += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(props: &Props) -> BTreeMap<String, Vec<u8>> {
        let mut map = BTreeMap::new();
        parse_props_into_map(props.raw(), &mut map);
        map
    }

    #[test]
    fn test_parse_props_scalars() {
        let map = parse(
            &Props::new()
                .add("plan", "pro")
                .add("seats", 5)
                .add("ratio", 0.5)
                .add("active", true),
        );
        assert_eq!(map.len(), 4);
        assert_eq!(map["plan"], b"\"pro\"");
        assert_eq!(map["seats"], b"5");
        assert_eq!(map["ratio"], b"0.5");
        assert_eq!(map["active"], b"true");
    }

    #[test]
    fn test_parse_props_upserts_last_write_wins() {
        let mut map = BTreeMap::new();
        parse_props_into_map(Props::new().add("plan", "free").raw(), &mut map);
        parse_props_into_map(Props::new().add("plan", "pro").raw(), &mut map);
        assert_eq!(map.len(), 1);
        assert_eq!(map["plan"], b"\"pro\"");
    }

    #[test]
    fn test_parse_props_unescapes_keys_keeps_values_raw() {
        let map = parse(&Props::new().add("we\"ird\nkey", "a\"b"));
        // Key is restored to its unescaped form...
        assert_eq!(map.keys().next().unwrap(), "we\"ird\nkey");
        // ...while the value keeps its wire form
        assert_eq!(map["we\"ird\nkey"], b"\"a\\\"b\"");
    }

    #[test]
    fn test_parse_props_values_with_commas_inside_strings() {
        let map = parse(&Props::new().add("list", "a,b,c").add("n", 1));
        assert_eq!(map.len(), 2);
        assert_eq!(map["list"], b"\"a,b,c\"");
        assert_eq!(map["n"], b"1");
    }

    #[test]
    fn test_parse_props_tolerates_trailing_garbage() {
        let mut raw = Props::new().add("a", 1).raw().to_vec();
        raw.extend_from_slice(b",garbage without quotes");
        let mut map = BTreeMap::new();
        parse_props_into_map(&raw, &mut map);
        assert_eq!(map.len(), 1);
        assert_eq!(map["a"], b"1");
    }

    #[test]
    fn test_parse_props_empty_input() {
        let mut map = BTreeMap::new();
        parse_props_into_map(b"", &mut map);
        assert!(map.is_empty());
    }

    #[test]
    fn test_new_uuid_sets_version_and_variant_bits() {
        for _ in 0..32 {
            let id = new_uuid();
            assert_eq!(id[6] >> 4, 0x4, "version nibble");
            assert_eq!(id[8] >> 6, 0b10, "variant bits");
        }
    }

    #[test]
    fn test_now_ms_is_plausible() {
        // 2020-01-01 as a floor
        assert!(now_ms() > 1_577_836_800_000);
    }
}
