//! Tell client SDK
//!
//! An embeddable client for the Tell collector: analytics events and
//! structured log records are accepted on hot application paths, batched by
//! a background worker, and shipped as length-prefixed FlatBuffer frames
//! over a persistent TCP connection.
//!
//! # Design
//!
//! - **Never block producers.** Ingest calls validate, serialize, and
//!   enqueue; all network I/O happens on the worker thread (plus a bounded
//!   pool of retry threads).
//! - **Never leak failures.** Ingest calls don't return errors and don't
//!   panic; drops and transport failures reach the embedder through the
//!   configured error callback.
//! - **Don't silently lose data on a healthy network.** Batches flush on
//!   size and time thresholds, failed sends retry with exponential backoff,
//!   and `close` drains everything before the worker exits.
//!
//! # Quick Start
//!
//! ```no_run
//! use tell_sdk::{Props, Tell, TellConfig};
//!
//! let config = TellConfig::builder("a1b2c3d4e5f60718293a4b5c6d7e8f90")
//!     .service("storefront")
//!     .on_error(|err| eprintln!("tell: {err}"))
//!     .build()?;
//! let client = Tell::new(config)?;
//!
//! client.track(
//!     "user_1",
//!     tell_sdk::events::CHECKOUT_STARTED,
//!     &Props::new().add("cart_total", 49.99).add("items", 3),
//! );
//!
//! client.close();
//! # Ok::<(), tell_sdk::TellError>(())
//! ```

mod client;
mod config;
mod error;
mod props;
mod transport;
mod validation;
mod worker;

pub mod events;

pub use client::Tell;
pub use config::{DEFAULT_ENDPOINT, TellConfig, TellConfigBuilder};
pub use error::{ErrorCallback, ErrorKind, Result, TellError};
pub use props::{Props, Value};

// Re-export the wire-level enums embedders see in the public API
pub use tell_encoding::{EventType, LogEventType, LogLevel, SchemaType};
