//! Writer trait for log output destinations

use super::{error::Result, log_record::LogRecord};

/// A log destination.
///
/// The dispatcher serialises calls into one writer, so implementations take
/// `&mut self` and need no locking of their own.
pub trait LogWriter: Send {
    /// Offer a record to this destination.
    ///
    /// `Ok(true)` means the record was accepted, `Ok(false)` that the writer
    /// chose to drop it (a full buffer, say).
    fn write(&mut self, record: &LogRecord) -> Result<bool>;

    fn flush(&mut self) -> Result<()>;

    /// Flush and release the underlying resource. Called once at shutdown.
    fn close(&mut self) -> Result<()> {
        self.flush()
    }

    fn name(&self) -> &str;
}
