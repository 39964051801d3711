//! Named binding of a severity threshold to one writer

use super::{
    error::{LoggerError, Result},
    log_level::LogLevel,
    log_record::LogRecord,
    writer::LogWriter,
};
use parking_lot::Mutex;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Outcome of offering a record to a filter's writer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Accepted,
    /// The writer turned the record away without failing
    Dropped,
    /// The writer was already closed
    Skipped,
}

/// A filter never changes after construction. Replacing a threshold or a
/// writer means registering a new filter under the same name, which swaps
/// the whole value at once.
pub struct Filter {
    name: String,
    threshold: LogLevel,
    /// `None` once closed. The lock serialises writes and keeps `close`
    /// from racing an in-flight write.
    writer: Mutex<Option<Box<dyn LogWriter>>>,
}

impl Filter {
    pub fn new(name: impl Into<String>, threshold: LogLevel, writer: Box<dyn LogWriter>) -> Self {
        Self {
            name: name.into(),
            threshold,
            writer: Mutex::new(Some(writer)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn threshold(&self) -> LogLevel {
        self.threshold
    }

    #[inline]
    pub fn admits(&self, level: LogLevel) -> bool {
        level.admits(self.threshold)
    }

    pub fn is_closed(&self) -> bool {
        self.writer.lock().is_none()
    }

    /// Name reported by the writer, `None` once closed
    pub fn writer_name(&self) -> Option<String> {
        self.writer.lock().as_ref().map(|w| w.name().to_string())
    }

    /// Offer `record` to the writer, turning a writer panic into an error
    pub fn deliver(&self, record: &LogRecord) -> Result<Delivery> {
        let mut guard = self.writer.lock();
        let Some(writer) = guard.as_mut() else {
            return Ok(Delivery::Skipped);
        };

        match catch_unwind(AssertUnwindSafe(|| writer.write(record))) {
            Ok(Ok(true)) => Ok(Delivery::Accepted),
            Ok(Ok(false)) => Ok(Delivery::Dropped),
            Ok(Err(e)) => Err(e),
            Err(panic_info) => Err(LoggerError::writer(format!(
                "panicked: {}",
                panic_message(panic_info.as_ref())
            ))),
        }
    }

    pub fn flush(&self) -> Result<()> {
        match self.writer.lock().as_mut() {
            Some(writer) => writer.flush(),
            None => Ok(()),
        }
    }

    /// Close the writer. Waits for a write in progress; a second call is a no-op.
    pub fn close(&self) -> Result<()> {
        let taken = self.writer.lock().take();
        match taken {
            Some(mut writer) => match catch_unwind(AssertUnwindSafe(|| writer.close())) {
                Ok(result) => result,
                Err(panic_info) => Err(LoggerError::writer(format!(
                    "panicked during close: {}",
                    panic_message(panic_info.as_ref())
                ))),
            },
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("name", &self.name)
            .field("threshold", &self.threshold)
            .field("writer", &self.writer_name())
            .finish()
    }
}

/// Best-effort text from a panic payload
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writers::MemoryWriter;

    struct PanickingWriter;

    impl LogWriter for PanickingWriter {
        fn write(&mut self, _record: &LogRecord) -> Result<bool> {
            panic!("writer exploded");
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "panicking"
        }
    }

    #[test]
    fn test_admits_at_or_above_threshold() {
        let filter = Filter::new("mem", LogLevel::Info, Box::new(MemoryWriter::new(8)));
        assert!(!filter.admits(LogLevel::Debug));
        assert!(filter.admits(LogLevel::Info));
        assert!(filter.admits(LogLevel::Critical));
    }

    #[test]
    fn test_deliver_after_close_is_skipped() {
        let memory = MemoryWriter::new(8);
        let handle = memory.handle();
        let filter = Filter::new("mem", LogLevel::Trace, Box::new(memory));

        let record = LogRecord::new(LogLevel::Info, "test", "before close");
        assert_eq!(filter.deliver(&record).unwrap(), Delivery::Accepted);

        filter.close().unwrap();
        assert!(filter.is_closed());
        assert_eq!(filter.deliver(&record).unwrap(), Delivery::Skipped);
        assert_eq!(handle.len(), 1);

        // Closing twice does nothing
        filter.close().unwrap();
    }

    #[test]
    fn test_panic_becomes_error() {
        let filter = Filter::new("boom", LogLevel::Trace, Box::new(PanickingWriter));
        let record = LogRecord::new(LogLevel::Info, "test", "hello");

        let err = filter.deliver(&record).unwrap_err();
        assert!(err.to_string().contains("writer exploded"));

        // The lock is still usable after the panic
        assert_eq!(filter.writer_name().as_deref(), Some("panicking"));
    }
}
