//! Log record structure

use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::panic::Location;

/// One resolved log event.
///
/// A record is built once per accepted log call and handed to every
/// interested writer by shared reference. Writers that need to keep it
/// clone it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub level: LogLevel,
    pub created: DateTime<Utc>,
    /// Where the call came from, usually `file:line`
    pub source: String,
    pub message: String,
}

impl LogRecord {
    pub fn new(level: LogLevel, source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            created: Utc::now(),
            source: source.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn with_created(mut self, created: DateTime<Utc>) -> Self {
        self.created = created;
        self
    }
}

/// Render a caller location the way records carry it
pub fn source_of(location: &Location<'_>) -> String {
    format!("{}:{}", location.file(), location.line())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_message_verbatim() {
        let record = LogRecord::new(LogLevel::Info, "main.rs:10", "line one\nline two");
        assert_eq!(record.message, "line one\nline two");
        assert_eq!(record.source, "main.rs:10");
    }

    #[test]
    fn test_source_of_location() {
        let here = Location::caller();
        let source = source_of(here);
        assert!(source.ends_with(&format!(":{}", here.line())));
        assert!(source.contains(".rs"));
    }
}
