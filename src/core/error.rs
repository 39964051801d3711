//! Error types for the dispatcher

use super::log_level::LogLevel;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Configuration names a writer type nobody registered
    #[error("Unknown writer type '{kind}' for filter '{tag}'")]
    UnknownWriterKind { tag: String, kind: String },

    /// Level name that does not parse
    #[error("Invalid log level: '{0}'")]
    InvalidLevel(String),

    /// Writer error (generic)
    #[error("Writer error: {0}")]
    WriterError(String),

    /// Writer was used after it was closed
    #[error("Writer '{0}' is closed")]
    WriterClosed(String),

    /// Channel send error
    #[error("Failed to hand log record to writer worker")]
    ChannelSendError,

    /// One or more writers failed to close during shutdown
    #[error("{} writer(s) failed to close: {}", .failures.len(), describe_failures(.failures))]
    Shutdown { failures: Vec<(String, LoggerError)> },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

fn describe_failures(failures: &[(String, LoggerError)]) -> String {
    failures
        .iter()
        .map(|(name, err)| format!("{}: {}", name, err))
        .collect::<Vec<_>>()
        .join("; ")
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create an unknown writer kind error
    pub fn unknown_kind(tag: impl Into<String>, kind: impl Into<String>) -> Self {
        LoggerError::UnknownWriterKind {
            tag: tag.into(),
            kind: kind.into(),
        }
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}

/// Error value handed back by the warning, error and critical entry points.
///
/// Its text is exactly the resolved log message, so a call site can log and
/// bail out in one expression:
///
/// ```
/// use rust_log_dispatcher::{Dispatcher, LoggedError};
///
/// fn open_account(log: &Dispatcher, id: u32) -> Result<(), LoggedError> {
///     if id == 0 {
///         return Err(log.error("account id must be non-zero"));
///     }
///     Ok(())
/// }
///
/// let log = Dispatcher::new();
/// let err = open_account(&log, 0).unwrap_err();
/// assert_eq!(err.to_string(), "account id must be non-zero");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct LoggedError {
    pub level: LogLevel,
    pub message: String,
}

impl LoggedError {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
