//! Socket writer for remote logging
//!
//! Sends each record as a JSON line over TCP to a collector.

use crate::core::{LogRecord, LogWriter, LoggerError, Result};
use std::io::Write;
use std::net::TcpStream;
use std::time::Duration;

const IO_TIMEOUT: Duration = Duration::from_secs(5);

/// # Example
///
/// ```no_run
/// use rust_log_dispatcher::prelude::*;
/// use rust_log_dispatcher::writers::SocketWriter;
///
/// let writer = SocketWriter::connect("127.0.0.1:9514").expect("collector is up");
///
/// let log = Dispatcher::new();
/// log.add_filter("collector", LogLevel::Info, Box::new(writer));
/// log.info("this goes over the wire");
/// ```
pub struct SocketWriter {
    stream: Option<TcpStream>,
    address: String,
    reconnect_on_error: bool,
}

impl SocketWriter {
    /// Connect to `address` (`host:port`)
    pub fn connect(address: impl Into<String>) -> Result<Self> {
        let address = address.into();
        let stream = open_stream(&address)?;

        Ok(Self {
            stream: Some(stream),
            address,
            reconnect_on_error: true,
        })
    }

    /// Try one reconnect and resend when a write fails. Default: enabled
    #[must_use]
    pub fn with_reconnect(mut self, enable: bool) -> Self {
        self.reconnect_on_error = enable;
        self
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    fn send(&mut self, payload: &[u8]) -> std::io::Result<()> {
        match self.stream.as_mut() {
            Some(stream) => stream.write_all(payload),
            None => Err(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "socket is not connected",
            )),
        }
    }
}

fn open_stream(address: &str) -> Result<TcpStream> {
    let stream = TcpStream::connect(address)
        .map_err(|e| LoggerError::io_operation("connecting to log collector", address, e))?;
    stream.set_write_timeout(Some(IO_TIMEOUT))?;
    stream.set_nodelay(true)?;
    Ok(stream)
}

impl LogWriter for SocketWriter {
    fn write(&mut self, record: &LogRecord) -> Result<bool> {
        let mut payload = serde_json::to_vec(record)?;
        payload.push(b'\n');

        let Err(first) = self.send(&payload) else {
            return Ok(true);
        };

        self.stream = None;
        if !self.reconnect_on_error {
            return Err(first.into());
        }

        match open_stream(&self.address) {
            Ok(stream) => {
                self.stream = Some(stream);
                self.send(&payload)?;
                Ok(true)
            }
            Err(reconnect_err) => Err(LoggerError::writer(format!(
                "Failed to send log and reconnect: {} (reconnect: {})",
                first, reconnect_err
            ))),
        }
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut stream) = self.stream {
            stream.flush()?;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if let Some(mut stream) = self.stream.take() {
            stream.flush()?;
            let _ = stream.shutdown(std::net::Shutdown::Both);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "socket"
    }
}
