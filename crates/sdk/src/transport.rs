//! TCP transport with lazy connect and auto-reconnect
//!
//! Owns at most one outbound connection. Every send first ensures a
//! connection exists, then writes one length-prefixed frame:
//!
//! ```text
//! [4 bytes: length (big-endian)][N bytes: batch message]
//! ```
//!
//! A failed write closes the socket and reports failure; the next send
//! reconnects from scratch.

use std::io::Write as _;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use socket2::{SockRef, TcpKeepalive};
use tracing::{debug, trace};

use crate::error::{Result, TellError};

pub(crate) struct TcpTransport {
    host: String,
    port: u16,
    endpoint: String,
    timeout: Duration,
    stream: Option<TcpStream>,
}

impl TcpTransport {
    /// Parse `host:port` and prepare a lazily-connecting transport.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error for a malformed endpoint. No network
    /// activity happens here.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let (host, port) = parse_endpoint(endpoint)?;
        Ok(Self {
            host,
            port,
            endpoint: endpoint.to_string(),
            timeout,
            stream: None,
        })
    }

    /// Drop the connection, if any. Idempotent.
    pub fn close_connection(&mut self) {
        self.stream = None;
    }

    /// Send one length-prefixed frame, connecting first if necessary.
    ///
    /// Returns `false` on any resolution, connect, or write failure; the
    /// socket is closed so the next call starts clean.
    pub fn send_frame(&mut self, data: &[u8]) -> bool {
        if self.stream.is_none() {
            match self.connect() {
                Ok(stream) => self.stream = Some(stream),
                Err(err) => {
                    debug!(endpoint = %self.endpoint, error = %err, "connect failed");
                    return false;
                }
            }
        }
        let Some(stream) = self.stream.as_mut() else {
            return false;
        };
        let Ok(len) = u32::try_from(data.len()) else {
            return false;
        };

        let result = stream
            .write_all(&len.to_be_bytes())
            .and_then(|()| stream.write_all(data));
        match result {
            Ok(()) => true,
            Err(err) => {
                debug!(endpoint = %self.endpoint, error = %err, "send failed");
                self.close_connection();
                false
            }
        }
    }

    /// Resolve the host and try each address in turn, each under the
    /// configured deadline. The first that connects wins.
    fn connect(&self) -> Result<TcpStream> {
        let addrs = (self.host.as_str(), self.port).to_socket_addrs().map_err(|err| {
            TellError::network(format!("DNS resolution failed for {}: {err}", self.host))
        })?;

        for addr in addrs {
            match TcpStream::connect_timeout(&addr, self.timeout) {
                Ok(stream) => {
                    if let Err(err) = self.configure_socket(&stream) {
                        trace!(%addr, error = %err, "socket configuration failed");
                        continue;
                    }
                    trace!(%addr, "connected");
                    return Ok(stream);
                }
                Err(err) => {
                    trace!(%addr, error = %err, "connect attempt failed");
                }
            }
        }

        Err(TellError::network(format!("connect failed to {}", self.endpoint)))
    }

    fn configure_socket(&self, stream: &TcpStream) -> std::io::Result<()> {
        stream.set_nodelay(true)?;
        stream.set_write_timeout(Some(self.timeout))?;
        let sock = SockRef::from(stream);
        sock.set_tcp_keepalive(&TcpKeepalive::new().with_time(Duration::from_secs(60)))?;
        Ok(())
    }
}

/// Split `host:port`, validating the port.
fn parse_endpoint(endpoint: &str) -> Result<(String, u16)> {
    let Some((host, port)) = endpoint.rsplit_once(':') else {
        return Err(TellError::configuration(format!(
            "endpoint must be host:port, got: {endpoint}"
        )));
    };

    let port: u16 = port.parse().map_err(|_| {
        TellError::configuration(format!("endpoint port is not a valid number: {endpoint}"))
    })?;
    if port == 0 {
        return Err(TellError::configuration(format!(
            "endpoint port must be 1-65535, got: {endpoint}"
        )));
    }

    Ok((host.to_string(), port))
}
