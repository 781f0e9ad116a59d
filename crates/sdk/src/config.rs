//! Client configuration
//!
//! A flat config struct with a fluent builder and the two standard presets.
//! The api key is validated and decoded when the builder finishes, so a bad
//! key fails at construction rather than on the first event.

use std::sync::Arc;
use std::time::Duration;

use crate::error::{ErrorCallback, Result, TellError};
use crate::validation;

/// Default collector endpoint
pub const DEFAULT_ENDPOINT: &str = "collect.tell.rs:50000";

/// Service tag applied to events when none is configured
pub(crate) const DEFAULT_SERVICE: &str = "app";

/// Configuration for a [`Tell`](crate::Tell) client.
#[derive(Clone)]
pub struct TellConfig {
    api_key_bytes: [u8; 16],
    service: String,
    endpoint: String,
    batch_size: usize,
    flush_interval: Duration,
    max_retries: u32,
    close_timeout: Duration,
    network_timeout: Duration,
    on_error: Option<ErrorCallback>,
}

impl std::fmt::Debug for TellConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TellConfig")
            .field("service", &self.service)
            .field("endpoint", &self.endpoint)
            .field("batch_size", &self.batch_size)
            .field("flush_interval", &self.flush_interval)
            .field("max_retries", &self.max_retries)
            .field("close_timeout", &self.close_timeout)
            .field("network_timeout", &self.network_timeout)
            .finish_non_exhaustive()
    }
}

impl TellConfig {
    /// Start building a config from a 32-character hex api key.
    pub fn builder(api_key: impl Into<String>) -> TellConfigBuilder {
        TellConfigBuilder::new(api_key.into())
    }

    /// Production preset: the defaults.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error for a malformed api key.
    pub fn production(api_key: &str) -> Result<Self> {
        Self::builder(api_key).build()
    }

    /// Development preset: local collector, small batches, fast flushes.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error for a malformed api key.
    pub fn development(api_key: &str) -> Result<Self> {
        Self::builder(api_key)
            .endpoint("localhost:50000")
            .batch_size(10)
            .flush_interval(Duration::from_secs(2))
            .build()
    }

    pub(crate) fn api_key_bytes(&self) -> &[u8; 16] {
        &self.api_key_bytes
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn flush_interval(&self) -> Duration {
        self.flush_interval
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn close_timeout(&self) -> Duration {
        self.close_timeout
    }

    pub fn network_timeout(&self) -> Duration {
        self.network_timeout
    }

    pub(crate) fn on_error(&self) -> Option<&ErrorCallback> {
        self.on_error.as_ref()
    }
}

/// Fluent builder for [`TellConfig`].
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use tell_sdk::TellConfig;
///
/// let config = TellConfig::builder("a1b2c3d4e5f60718293a4b5c6d7e8f90")
///     .service("checkout")
///     .batch_size(50)
///     .flush_interval(Duration::from_secs(5))
///     .build()
///     .unwrap();
/// assert_eq!(config.batch_size(), 50);
/// ```
pub struct TellConfigBuilder {
    api_key: String,
    service: String,
    endpoint: String,
    batch_size: usize,
    flush_interval: Duration,
    max_retries: u32,
    close_timeout: Duration,
    network_timeout: Duration,
    on_error: Option<ErrorCallback>,
}

impl TellConfigBuilder {
    fn new(api_key: String) -> Self {
        Self {
            api_key,
            service: String::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            batch_size: 100,
            flush_interval: Duration::from_secs(10),
            max_retries: 3,
            close_timeout: Duration::from_secs(5),
            network_timeout: Duration::from_secs(30),
            on_error: None,
        }
    }

    /// Service tag stamped on every event (default: "app")
    #[must_use]
    pub fn service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    /// Collector endpoint as `host:port`
    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Records per batch before a forced flush (default: 100)
    #[must_use]
    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Maximum idle time before a forced flush (default: 10 s)
    #[must_use]
    pub fn flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = interval;
        self
    }

    /// Send attempts after the initial failure (default: 3)
    #[must_use]
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Caller-side wait for flush/close completion (default: 5 s)
    #[must_use]
    pub fn close_timeout(mut self, timeout: Duration) -> Self {
        self.close_timeout = timeout;
        self
    }

    /// Per-connect and per-send deadline (default: 30 s)
    #[must_use]
    pub fn network_timeout(mut self, timeout: Duration) -> Self {
        self.network_timeout = timeout;
        self
    }

    /// Callback invoked with every dropped-record or transport error.
    ///
    /// Runs synchronously on the calling thread for validation errors and
    /// on a worker-owned thread for network errors; it must not block.
    #[must_use]
    pub fn on_error(mut self, callback: impl Fn(&TellError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(callback));
        self
    }

    /// Build the config, validating and decoding the api key.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error if the api key is not exactly 32 hex
    /// characters.
    pub fn build(self) -> Result<TellConfig> {
        let api_key_bytes = validation::decode_api_key(&self.api_key)?;
        Ok(TellConfig {
            api_key_bytes,
            service: self.service,
            endpoint: self.endpoint,
            batch_size: self.batch_size,
            flush_interval: self.flush_interval,
            max_retries: self.max_retries,
            close_timeout: self.close_timeout,
            network_timeout: self.network_timeout,
            on_error: self.on_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const KEY: &str = "a1b2c3d4e5f60718293a4b5c6d7e8f90";

    #[test]
    fn test_defaults() {
        let config = TellConfig::builder(KEY).build().unwrap();
        assert_eq!(config.endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(config.service(), "");
        assert_eq!(config.batch_size(), 100);
        assert_eq!(config.flush_interval(), Duration::from_secs(10));
        assert_eq!(config.max_retries(), 3);
        assert_eq!(config.close_timeout(), Duration::from_secs(5));
        assert_eq!(config.network_timeout(), Duration::from_secs(30));
        assert_eq!(config.api_key_bytes()[0], 0xa1);
    }

    #[test]
    fn test_production_preset_uses_defaults() {
        let config = TellConfig::production(KEY).unwrap();
        assert_eq!(config.endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(config.batch_size(), 100);
    }

    #[test]
    fn test_development_preset() {
        let config = TellConfig::development(KEY).unwrap();
        assert_eq!(config.endpoint(), "localhost:50000");
        assert_eq!(config.batch_size(), 10);
        assert_eq!(config.flush_interval(), Duration::from_secs(2));
        // Everything else stays at the defaults
        assert_eq!(config.max_retries(), 3);
    }

    #[test]
    fn test_builder_overrides() {
        let config = TellConfig::builder(KEY)
            .service("api")
            .endpoint("10.0.0.1:9000")
            .batch_size(1)
            .max_retries(0)
            .build()
            .unwrap();
        assert_eq!(config.service(), "api");
        assert_eq!(config.endpoint(), "10.0.0.1:9000");
        assert_eq!(config.batch_size(), 1);
        assert_eq!(config.max_retries(), 0);
    }

    #[test]
    fn test_bad_api_key_is_configuration_error() {
        let err = TellConfig::builder("nope").build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);

        let err = TellConfig::builder("zzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzz")
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
