//! Background worker
//!
//! One dedicated thread per client multiplexes event records, log records,
//! flush requests, and close requests over a single bounded channel. Records
//! drain into type-homogeneous staging vectors and flush on size or time
//! threshold; failed sends hand the framed batch to a small pool of retry
//! threads so the main loop keeps serving the fast path.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{Receiver, SyncSender, sync_channel};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use bytes::Bytes;
use parking_lot::{Condvar, Mutex};
use rand::Rng as _;
use tracing::{debug, trace, warn};

use tell_encoding::{
    BatchParams, EventParams, EventType, LogEntryParams, LogEventType, LogLevel, SchemaType,
    encode_batch_into, encode_event_data_into, encode_log_data_into,
};

use crate::config::{DEFAULT_SERVICE, TellConfig};
use crate::error::{ErrorCallback, Result, TellError};
use crate::transport::TcpTransport;

/// Ingest channel capacity; on overflow the oldest pending message is
/// dropped to make room.
const MAX_QUEUE_SIZE: usize = 10_000;

/// Concurrent retry thread cap
const MAX_RETRY_THREADS: usize = 8;

const RETRY_BASE_DELAY_MS: f64 = 1_000.0;
const RETRY_MAX_DELAY_MS: f64 = 30_000.0;
const RETRY_BACKOFF_FACTOR: f64 = 1.5;

/// Event frozen at enqueue time, ready to be encoded.
pub(crate) struct QueuedEvent {
    pub event_type: EventType,
    pub timestamp: u64,
    pub device_id: [u8; 16],
    pub session_id: [u8; 16],
    pub event_name: Option<String>,
    pub payload: Vec<u8>,
    // service is config-level, not per-event; the worker resolves it when
    // building the batch.
}

/// Log entry frozen at enqueue time.
pub(crate) struct QueuedLog {
    pub level: LogLevel,
    pub timestamp: u64,
    pub session_id: [u8; 16],
    pub source: Option<String>,
    pub service: Option<String>,
    pub payload: Vec<u8>,
}

/// One-shot completion a producer can wait on.
pub(crate) type Completion = SyncSender<()>;

pub(crate) enum WorkerMessage {
    Event(QueuedEvent),
    Log(QueuedLog),
    Flush(Completion),
    Close(Completion),
}

/// The ingest channel shared between producers and the worker thread.
struct Channel {
    queue: Mutex<VecDeque<WorkerMessage>>,
    cv: Condvar,
    running: AtomicBool,
}

impl Channel {
    fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            cv: Condvar::new(),
            running: AtomicBool::new(true),
        }
    }

    /// Bounded drop-head push. Wakes the worker only on the empty→non-empty
    /// transition so bursts of producers don't stampede the condvar.
    fn push(&self, msg: WorkerMessage) {
        let was_empty;
        {
            let mut queue = self.queue.lock();
            was_empty = queue.is_empty();
            if queue.len() >= MAX_QUEUE_SIZE {
                queue.pop_front();
                trace!("ingest channel full, dropping oldest message");
            }
            queue.push_back(msg);
        }
        if was_empty {
            self.cv.notify_one();
        }
    }
}

/// Handle owned by the client facade; the loop state lives on the thread.
pub(crate) struct Worker {
    channel: Arc<Channel>,
    thread: Mutex<Option<JoinHandle<()>>>,
}

impl Worker {
    /// Validate the endpoint, then start the worker thread.
    pub fn spawn(config: TellConfig) -> Result<Self> {
        // Fail on a malformed endpoint before any thread exists.
        let transport = TcpTransport::new(config.endpoint(), config.network_timeout())?;

        let channel = Arc::new(Channel::new());
        let thread_channel = Arc::clone(&channel);
        let handle = thread::Builder::new()
            .name("tell-worker".to_string())
            .spawn(move || WorkerLoop::new(config, transport, thread_channel).run())?;

        Ok(Self {
            channel,
            thread: Mutex::new(Some(handle)),
        })
    }

    pub fn send_event(&self, event: QueuedEvent) {
        self.channel.push(WorkerMessage::Event(event));
    }

    pub fn send_log(&self, log: QueuedLog) {
        self.channel.push(WorkerMessage::Log(log));
    }

    pub fn send_flush(&self) -> Receiver<()> {
        let (tx, rx) = sync_channel(1);
        self.channel.push(WorkerMessage::Flush(tx));
        rx
    }

    pub fn send_close(&self) -> Receiver<()> {
        let (tx, rx) = sync_channel(1);
        self.channel.push(WorkerMessage::Close(tx));
        rx
    }

    /// Join the worker thread. Safe to call more than once.
    pub fn join(&self) {
        let handle = self.thread.lock().take();
        if let Some(handle) = handle {
            let _ = handle.join();
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        if self.channel.running.load(Ordering::Acquire) {
            let _ = self.send_close();
        }
        self.join();
    }
}

/// Per-thread worker state.
struct WorkerLoop {
    config: TellConfig,
    channel: Arc<Channel>,
    transport: TcpTransport,
    event_queue: Vec<QueuedEvent>,
    log_queue: Vec<QueuedLog>,
    // Reusable encoding buffers
    data_buf: Vec<u8>,
    batch_buf: Vec<u8>,
    batch_counter: AtomicU64,
    retry_threads: Vec<JoinHandle<()>>,
}

impl WorkerLoop {
    fn new(config: TellConfig, transport: TcpTransport, channel: Arc<Channel>) -> Self {
        let batch_size = config.batch_size();
        Self {
            config,
            channel,
            transport,
            event_queue: Vec::with_capacity(batch_size),
            log_queue: Vec::with_capacity(batch_size),
            data_buf: Vec::with_capacity(64 * 1024),
            batch_buf: Vec::with_capacity(64 * 1024),
            batch_counter: AtomicU64::new(1),
            retry_threads: Vec::new(),
        }
    }

    fn run(mut self) {
        let flush_interval = self.config.flush_interval();
        let batch_size = self.config.batch_size();
        let mut next_flush = Instant::now() + flush_interval;

        loop {
            // Sleep until woken or the flush tick, then drain everything
            // currently queued in one go.
            let mut local = {
                let mut queue = self.channel.queue.lock();
                while queue.is_empty() {
                    if self.channel.cv.wait_until(&mut queue, next_flush).timed_out() {
                        break;
                    }
                }
                std::mem::take(&mut *queue)
            };

            let mut should_flush = false;
            let mut should_close = false;
            let mut completions: Vec<Completion> = Vec::new();

            for msg in local.drain(..) {
                match msg {
                    WorkerMessage::Event(event) => {
                        self.event_queue.push(event);
                        if self.event_queue.len() >= batch_size {
                            self.flush_events();
                        }
                    }
                    WorkerMessage::Log(log) => {
                        self.log_queue.push(log);
                        if self.log_queue.len() >= batch_size {
                            self.flush_logs();
                        }
                    }
                    WorkerMessage::Flush(completion) => {
                        should_flush = true;
                        completions.push(completion);
                    }
                    WorkerMessage::Close(completion) => {
                        should_close = true;
                        completions.push(completion);
                    }
                }
            }

            let now = Instant::now();
            if now >= next_flush {
                should_flush = true;
                next_flush = now + flush_interval;
            }

            if should_flush || should_close {
                self.flush_events();
                self.flush_logs();

                // Every waiter from this round completes together, whether
                // or not the transport cooperated.
                for completion in completions {
                    let _ = completion.send(());
                }
            }

            if should_close {
                for handle in self.retry_threads.drain(..) {
                    let _ = handle.join();
                }
                self.transport.close_connection();
                self.channel.running.store(false, Ordering::Release);
                debug!("worker terminated");
                return;
            }
        }
    }

    fn flush_events(&mut self) {
        if self.event_queue.is_empty() {
            return;
        }
        let events = std::mem::take(&mut self.event_queue);

        let service = if self.config.service().is_empty() {
            DEFAULT_SERVICE
        } else {
            self.config.service()
        };

        let params: Vec<EventParams<'_>> = events
            .iter()
            .map(|event| EventParams {
                event_type: event.event_type,
                timestamp: event.timestamp,
                service: Some(service),
                device_id: Some(&event.device_id),
                session_id: Some(&event.session_id),
                event_name: event.event_name.as_deref(),
                payload: (!event.payload.is_empty()).then_some(event.payload.as_slice()),
            })
            .collect();

        self.data_buf.clear();
        let data_start = encode_event_data_into(&mut self.data_buf, &params);
        drop(params);

        self.encode_and_send(SchemaType::Event, data_start);
        trace!(count = events.len(), "event batch flushed");
    }

    fn flush_logs(&mut self) {
        if self.log_queue.is_empty() {
            return;
        }
        let logs = std::mem::take(&mut self.log_queue);

        let params: Vec<LogEntryParams<'_>> = logs
            .iter()
            .map(|log| LogEntryParams {
                event_type: LogEventType::Log,
                session_id: Some(&log.session_id),
                level: log.level,
                timestamp: log.timestamp,
                source: log.source.as_deref(),
                service: log.service.as_deref(),
                payload: (!log.payload.is_empty()).then_some(log.payload.as_slice()),
            })
            .collect();

        self.data_buf.clear();
        let data_start = encode_log_data_into(&mut self.data_buf, &params);
        drop(params);

        self.encode_and_send(SchemaType::Log, data_start);
        trace!(count = logs.len(), "log batch flushed");
    }

    /// Wrap the encoded data container in a batch envelope and send it.
    fn encode_and_send(&mut self, schema_type: SchemaType, data_start: usize) {
        self.batch_buf.clear();
        encode_batch_into(
            &mut self.batch_buf,
            &BatchParams {
                api_key: self.config.api_key_bytes(),
                schema_type,
                version: tell_encoding::DEFAULT_VERSION,
                batch_id: self.batch_counter.fetch_add(1, Ordering::Relaxed),
                data: &self.data_buf[data_start..],
            },
        );

        let batch = std::mem::take(&mut self.batch_buf);
        self.send_or_retry(&batch);
        self.batch_buf = batch;
    }

    fn send_or_retry(&mut self, data: &[u8]) {
        if self.transport.send_frame(data) {
            trace!(bytes = data.len(), "batch sent");
            return;
        }

        if self.config.max_retries() == 0 {
            self.report_error(&TellError::network("send failed, no retries configured"));
            return;
        }

        // Reap finished retry threads before checking the cap
        let mut still_running = Vec::with_capacity(self.retry_threads.len());
        for handle in self.retry_threads.drain(..) {
            if handle.is_finished() {
                let _ = handle.join();
            } else {
                still_running.push(handle);
            }
        }
        self.retry_threads = still_running;

        if self.retry_threads.len() >= MAX_RETRY_THREADS {
            warn!("retry pool full, dropping batch");
            self.report_error(&TellError::network("send failed, retry pool full"));
            return;
        }

        let payload = Bytes::copy_from_slice(data);
        let endpoint = self.config.endpoint().to_string();
        let network_timeout = self.config.network_timeout();
        let max_retries = self.config.max_retries();
        let on_error = self.config.on_error().cloned();

        let spawned = thread::Builder::new()
            .name("tell-retry".to_string())
            .spawn(move || retry_send(&endpoint, network_timeout, max_retries, &payload, on_error));
        match spawned {
            Ok(handle) => self.retry_threads.push(handle),
            Err(err) => {
                self.report_error(&TellError::network(format!(
                    "send failed, could not start retry worker: {err}"
                )));
            }
        }
    }

    fn report_error(&self, err: &TellError) {
        if let Some(callback) = self.config.on_error() {
            callback(err);
        }
    }
}

/// Retry loop run on its own thread, with its own transport so the main
/// worker keeps serving the fast path.
fn retry_send(
    endpoint: &str,
    network_timeout: Duration,
    max_retries: u32,
    payload: &Bytes,
    on_error: Option<ErrorCallback>,
) {
    // The endpoint was validated when the main transport was built.
    let Ok(mut transport) = TcpTransport::new(endpoint, network_timeout) else {
        return;
    };

    for attempt in 1..=max_retries {
        let base = RETRY_BASE_DELAY_MS * RETRY_BACKOFF_FACTOR.powi(attempt as i32 - 1);
        let jitter = base * 0.2 * rand::rng().random::<f64>();
        let delay = (base + jitter).min(RETRY_MAX_DELAY_MS);
        thread::sleep(Duration::from_millis(delay as u64));

        if transport.send_frame(payload) {
            debug!(attempt, "retry send succeeded");
            return;
        }
    }

    if let Some(callback) = on_error {
        callback(&TellError::network(format!(
            "send failed after {max_retries} retries"
        )));
    }
}
