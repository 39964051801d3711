//! # Rust Log Dispatcher
//!
//! A leveled logging dispatcher. Each log call is checked against a set of
//! named filters, each binding a minimum level to one writer, and the
//! resolved record is handed to every filter that admits it, in
//! registration order.
//!
//! ## Features
//!
//! - **Lazy messages**: nothing is formatted unless some filter is interested
//! - **printf-style templates** with `%s`, `%d`, `%v`, `%.2f`, ...
//! - **Writers**: console, file, JSON lines, TCP socket, in-memory, and a
//!   channel-backed wrapper that moves any writer onto its own thread
//! - **JSON configuration** and a process-wide default instance
//!
//! ```
//! use rust_log_dispatcher::prelude::*;
//!
//! let memory = MemoryWriter::new(8);
//! let lines = memory.handle();
//!
//! let log = Dispatcher::new();
//! log.add_filter("memory", LogLevel::Warning, Box::new(memory));
//!
//! log.info("skipped");
//! let err = log.error(Message::template("disk %s is %d%% full", args!["/var", 97]));
//!
//! assert_eq!(err.to_string(), "disk /var is 97% full");
//! assert_eq!(lines.messages(), vec![err.to_string()]);
//! ```

pub mod macros;

pub mod config;
pub mod core;
pub mod global;
pub mod writers;

pub mod prelude {
    pub use crate::args;
    pub use crate::core::{
        Arg, Dispatcher, DispatcherBuilder, LogLevel, LogRecord, LogWriter, LoggedError,
        LoggerError, Message, Result,
    };
    pub use crate::writers::{FileWriter, MemoryWriter};
    #[cfg(feature = "console")]
    pub use crate::writers::ConsoleWriter;
}

pub use config::WriterRegistry;
pub use core::{
    Arg, Dispatcher, DispatcherBuilder, DispatchMetrics, ErrorHandler, LogLevel, LogRecord,
    LogWriter, LoggedError, LoggerError, Message, OutputFormat, ProcessTerminator, Result,
    Terminator, TimestampFormat,
};
