//! In-memory ring buffer writer
//!
//! Keeps the most recent records and exposes them through a cloneable
//! [`MemoryHandle`], so tests and diagnostics can look at what was logged
//! after the writer itself has been handed to a dispatcher.

use crate::core::{LogRecord, LogWriter, Result};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Default)]
struct Shared {
    records: Mutex<VecDeque<LogRecord>>,
    evicted: AtomicU64,
}

pub struct MemoryWriter {
    capacity: usize,
    shared: Arc<Shared>,
}

impl MemoryWriter {
    /// Keep at most `capacity` records; the oldest goes first when full
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            shared: Arc::new(Shared::default()),
        }
    }

    pub fn handle(&self) -> MemoryHandle {
        MemoryHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl LogWriter for MemoryWriter {
    fn write(&mut self, record: &LogRecord) -> Result<bool> {
        let mut records = self.shared.records.lock();
        if records.len() == self.capacity {
            records.pop_front();
            self.shared.evicted.fetch_add(1, Ordering::Relaxed);
        }
        records.push_back(record.clone());
        Ok(true)
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Read side of a [`MemoryWriter`]
#[derive(Clone)]
pub struct MemoryHandle {
    shared: Arc<Shared>,
}

impl MemoryHandle {
    /// Snapshot of the buffered records, oldest first
    pub fn records(&self) -> Vec<LogRecord> {
        self.shared.records.lock().iter().cloned().collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.shared
            .records
            .lock()
            .iter()
            .map(|r| r.message.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.shared.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.records.lock().is_empty()
    }

    /// Records pushed out because the buffer was full
    pub fn evicted(&self) -> u64 {
        self.shared.evicted.load(Ordering::Relaxed)
    }

    pub fn clear(&self) {
        self.shared.records.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;

    #[test]
    fn test_ring_buffer_keeps_newest() {
        let mut writer = MemoryWriter::new(2);
        let handle = writer.handle();

        for text in ["one", "two", "three"] {
            assert!(writer.write(&LogRecord::new(LogLevel::Info, "t", text)).unwrap());
        }

        assert_eq!(handle.messages(), vec!["two", "three"]);
        assert_eq!(handle.evicted(), 1);
    }

    #[test]
    fn test_handle_outlives_writer() {
        let mut writer = MemoryWriter::new(4);
        let handle = writer.handle();
        writer.write(&LogRecord::new(LogLevel::Debug, "t", "kept")).unwrap();
        drop(writer);

        assert_eq!(handle.len(), 1);
        handle.clear();
        assert!(handle.is_empty());
    }

    #[test]
    fn test_zero_capacity_holds_one() {
        assert_eq!(MemoryWriter::new(0).capacity(), 1);
    }
}
