//! Console writer implementation

use crate::core::{LogLevel, LogRecord, LogWriter, OutputFormat, Result, TimestampFormat};
use colored::Colorize;
use std::io::Write;

/// Writes one line per record to stdout, or stderr for ERROR and CRITICAL
pub struct ConsoleWriter {
    use_colors: bool,
    timestamp_format: TimestampFormat,
    output_format: OutputFormat,
}

impl ConsoleWriter {
    pub fn new() -> Self {
        Self::with_colors(true)
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors,
            timestamp_format: TimestampFormat::Classic,
            output_format: OutputFormat::default(),
        }
    }

    /// Set the output format for this writer
    ///
    /// # Example
    ///
    /// ```
    /// use rust_log_dispatcher::writers::ConsoleWriter;
    /// use rust_log_dispatcher::core::OutputFormat;
    ///
    /// let writer = ConsoleWriter::new().with_output_format(OutputFormat::Logfmt);
    /// ```
    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    fn render(&self, record: &LogRecord) -> String {
        if self.output_format != OutputFormat::Text || !self.use_colors {
            return self.output_format.format(record, &self.timestamp_format);
        }

        // Colour only the level tag so the message stays greppable
        let plain = self.output_format.format(record, &self.timestamp_format);
        let tag = format!("[{}]", record.level.short_name());
        let painted = tag.color(record.level.color_code()).to_string();
        plain.replacen(&tag, &painted, 1)
    }
}

impl Default for ConsoleWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl LogWriter for ConsoleWriter {
    fn write(&mut self, record: &LogRecord) -> Result<bool> {
        let line = self.render(record);

        match record.level {
            LogLevel::Error | LogLevel::Critical => writeln!(std::io::stderr().lock(), "{}", line)?,
            _ => writeln!(std::io::stdout().lock(), "{}", line)?,
        }
        Ok(true)
    }

    fn flush(&mut self) -> Result<()> {
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
