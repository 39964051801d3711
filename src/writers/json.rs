//! JSON-lines writer
//!
//! Each record is serialised with `serde_json` as one object per line, which
//! log shippers (ELK, Loki, ...) read directly.

use crate::core::{LogRecord, LogWriter, LoggerError, Result};
use super::file::open_append;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub struct JsonWriter {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    pretty: bool,
}

impl JsonWriter {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = open_append(&path)?;

        Ok(Self {
            path,
            writer: Some(BufWriter::new(file)),
            pretty: false,
        })
    }

    /// Pretty-print each record; the output is then no longer one line per record
    #[must_use]
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl LogWriter for JsonWriter {
    fn write(&mut self, record: &LogRecord) -> Result<bool> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::WriterClosed(self.path.display().to_string()))?;

        let json = if self.pretty {
            serde_json::to_string_pretty(record)?
        } else {
            serde_json::to_string(record)?
        };

        writeln!(writer, "{}", json)?;
        Ok(true)
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "json"
    }
}

impl Drop for JsonWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_records_read_back() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("app.jsonl");

        let mut writer = JsonWriter::new(&path)?;
        let written: Vec<LogRecord> = (0..5)
            .map(|i| LogRecord::new(LogLevel::Fine, "job.rs:9", format!("Iteration {}", i)))
            .collect();
        for record in &written {
            writer.write(record)?;
        }
        writer.close()?;

        let content = fs::read_to_string(&path)?;
        let read: Vec<LogRecord> = content
            .lines()
            .map(serde_json::from_str)
            .collect::<std::result::Result<_, _>>()?;
        assert_eq!(read, written);
        Ok(())
    }

    #[test]
    fn test_level_is_named() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("level.jsonl");

        let mut writer = JsonWriter::new(&path)?;
        writer.write(&LogRecord::new(LogLevel::Warning, "x.rs:1", "careful"))?;
        writer.flush()?;

        let parsed: serde_json::Value = serde_json::from_str(fs::read_to_string(&path)?.trim())?;
        assert_eq!(parsed["level"], "WARNING");
        assert_eq!(parsed["message"], "careful");
        Ok(())
    }
}
