//! Timestamp layouts for writer output

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How a writer renders a record's creation time
///
/// # Examples
///
/// ```
/// use rust_log_dispatcher::core::TimestampFormat;
///
/// let format: TimestampFormat = "unix_millis".parse().unwrap();
/// assert!(format.is_numeric());
///
/// let custom: TimestampFormat = "%d/%b/%Y".parse().unwrap();
/// assert_eq!(custom, TimestampFormat::Custom("%d/%b/%Y".to_string()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// `2025-01-08T10:30:45.123Z`
    #[default]
    Iso8601,
    /// `2025-01-08T10:30:45.123456Z`
    Iso8601Micros,
    /// `2025-01-08T10:30:45.123456+00:00`
    Rfc3339,
    /// `2025/01/08 10:30:45`, the classic date-then-time layout
    Classic,
    /// Seconds since the epoch
    Unix,
    /// Milliseconds since the epoch
    UnixMillis,
    /// Any strftime layout
    Custom(String),
}

impl TimestampFormat {
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            TimestampFormat::Iso8601Micros => datetime.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339(),
            TimestampFormat::Classic => datetime.format("%Y/%m/%d %H:%M:%S").to_string(),
            TimestampFormat::Unix => datetime.timestamp().to_string(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::Custom(layout) => datetime.format(layout).to_string(),
        }
    }

    /// JSON writers emit numeric layouts as numbers rather than strings
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, TimestampFormat::Unix | TimestampFormat::UnixMillis)
    }
}

impl FromStr for TimestampFormat {
    type Err = String;

    /// Accepts a layout name, or anything containing `%` as a strftime layout
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.contains('%') {
            return Ok(TimestampFormat::Custom(s.to_string()));
        }
        match s.trim().to_lowercase().as_str() {
            "iso8601" | "iso" => Ok(TimestampFormat::Iso8601),
            "iso8601_micros" => Ok(TimestampFormat::Iso8601Micros),
            "rfc3339" => Ok(TimestampFormat::Rfc3339),
            "classic" => Ok(TimestampFormat::Classic),
            "unix" => Ok(TimestampFormat::Unix),
            "unix_millis" => Ok(TimestampFormat::UnixMillis),
            _ => Err(format!("Invalid timestamp format: '{}'", s)),
        }
    }
}
