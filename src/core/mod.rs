//! Core dispatcher types and traits

pub mod dispatcher;
pub mod error;
pub mod filter;
pub mod log_level;
pub mod log_record;
pub mod message;
pub mod metrics;
pub mod output_format;
pub mod template;
pub mod terminate;
pub mod timestamp;
pub mod writer;

pub use dispatcher::{Dispatcher, DispatcherBuilder, ErrorHandler};
pub use error::{LoggedError, LoggerError, Result};
pub use filter::{Delivery, Filter};
pub use log_level::LogLevel;
pub use log_record::LogRecord;
pub use message::{Arg, Message};
pub use metrics::DispatchMetrics;
pub use output_format::OutputFormat;
pub use terminate::{ProcessTerminator, Terminator};
pub use timestamp::TimestampFormat;
pub use writer::LogWriter;
