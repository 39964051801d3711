//! Line layouts for log records
//!
//! - Text: `[2025/01/08 10:30:45] [INFO] (main.rs:12) Request processed`
//! - Json: one JSON object per line
//! - Logfmt: `timestamp=... level=INFO source=main.rs:12 message="..."`
//!
//! Text and logfmt escape control characters in the message so one record
//! always stays on one line.

use super::log_record::LogRecord;
use super::timestamp::TimestampFormat;
use std::str::FromStr;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Logfmt,
}

impl OutputFormat {
    /// Render `record` as a single line, without the trailing newline
    pub fn format(&self, record: &LogRecord, timestamp_format: &TimestampFormat) -> String {
        match self {
            OutputFormat::Text => format!(
                "[{}] [{}] ({}) {}",
                timestamp_format.format(&record.created),
                record.level.short_name(),
                record.source,
                escape_controls(&record.message)
            ),
            OutputFormat::Json => format_json(record, timestamp_format),
            OutputFormat::Logfmt => format!(
                "timestamp={} level={} source={} message={}",
                logfmt_value(&timestamp_format.format(&record.created)),
                record.level,
                logfmt_value(&record.source),
                quote(&escape_controls(&record.message))
            ),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "logfmt" => Ok(OutputFormat::Logfmt),
            _ => Err(format!("Invalid output format: '{}'", s)),
        }
    }
}

fn format_json(record: &LogRecord, timestamp_format: &TimestampFormat) -> String {
    let timestamp = match timestamp_format {
        TimestampFormat::Unix => serde_json::Value::from(record.created.timestamp()),
        TimestampFormat::UnixMillis => serde_json::Value::from(record.created.timestamp_millis()),
        _ => serde_json::Value::String(timestamp_format.format(&record.created)),
    };

    serde_json::json!({
        "timestamp": timestamp,
        "level": record.level.to_str(),
        "source": record.source,
        "message": record.message,
    })
    .to_string()
}

fn escape_controls(message: &str) -> String {
    message
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

/// Quote a logfmt value only when it needs it
fn logfmt_value(value: &str) -> String {
    if value.contains(' ') || value.contains('"') || value.contains('=') {
        quote(value)
    } else {
        value.to_string()
    }
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
