//! Log level definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity scale used for threshold filtering.
///
/// The order is fixed: `Trace < Finest < Fine < Debug < Info < Warning <
/// Error < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
#[serde(try_from = "String", into = "&'static str")]
pub enum LogLevel {
    Trace = 0,
    Finest = 1,
    Fine = 2,
    #[default]
    Debug = 3,
    Info = 4,
    Warning = 5,
    Error = 6,
    Critical = 7,
}

impl LogLevel {
    /// Every level, lowest first
    pub const ALL: [LogLevel; 8] = [
        LogLevel::Trace,
        LogLevel::Finest,
        LogLevel::Fine,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warning,
        LogLevel::Error,
        LogLevel::Critical,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Finest => "FINEST",
            LogLevel::Fine => "FINE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
        }
    }

    /// Fixed-width four letter tag used by text layouts
    pub fn short_name(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRAC",
            LogLevel::Finest => "FNST",
            LogLevel::Fine => "FINE",
            LogLevel::Debug => "DEBG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARN",
            LogLevel::Error => "EROR",
            LogLevel::Critical => "CRIT",
        }
    }

    /// `true` when a record at `self` passes a filter with `threshold`
    #[inline]
    pub fn admits(self, threshold: LogLevel) -> bool {
        self >= threshold
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            LogLevel::Trace | LogLevel::Finest => BrightBlack,
            LogLevel::Fine => White,
            LogLevel::Debug => Blue,
            LogLevel::Info => Green,
            LogLevel::Warning => Yellow,
            LogLevel::Error => Red,
            LogLevel::Critical => BrightRed,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "TRACE" | "TRAC" => Ok(LogLevel::Trace),
            "FINEST" | "FNST" => Ok(LogLevel::Finest),
            "FINE" => Ok(LogLevel::Fine),
            "DEBUG" | "DEBG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARNING" | "WARN" => Ok(LogLevel::Warning),
            "ERROR" | "EROR" => Ok(LogLevel::Error),
            "CRITICAL" | "CRIT" | "FATAL" => Ok(LogLevel::Critical),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}

impl TryFrom<String> for LogLevel {
    type Error = String;

    fn try_from(value: String) -> Result<Self, String> {
        value.parse()
    }
}

impl From<LogLevel> for &'static str {
    fn from(level: LogLevel) -> Self {
        level.to_str()
    }
}
