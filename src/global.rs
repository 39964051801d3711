//! Process-wide default dispatcher
//!
//! Starts with no filters and a DEBUG baseline. Every function here is a
//! thin pass-through to [`dispatcher()`].
//!
//! ```
//! use rust_log_dispatcher::{global, LogLevel};
//! use rust_log_dispatcher::writers::MemoryWriter;
//!
//! global::add_filter("doc-memory", LogLevel::Info, Box::new(MemoryWriter::new(4)));
//! global::info("ready");
//! global::remove_filter("doc-memory");
//! ```

use crate::core::{Arg, Dispatcher, LogLevel, LogWriter, LoggedError, Message, Result};
use std::path::Path;
use std::sync::LazyLock;

static GLOBAL: LazyLock<Dispatcher> = LazyLock::new(|| Dispatcher::with_baseline(LogLevel::Debug));

/// The shared instance
pub fn dispatcher() -> &'static Dispatcher {
    &GLOBAL
}

pub fn add_filter(name: impl Into<String>, threshold: LogLevel, writer: Box<dyn LogWriter>) {
    GLOBAL.add_filter(name, threshold, writer);
}

pub fn attach(name: impl Into<String>, writer: Box<dyn LogWriter>) {
    GLOBAL.attach(name, writer);
}

pub fn remove_filter(name: &str) -> bool {
    GLOBAL.remove_filter(name)
}

pub fn load_configuration_file(path: impl AsRef<Path>) -> Result<()> {
    GLOBAL.load_configuration_file(path)
}

pub fn load_configuration_str(json: &str) -> Result<()> {
    GLOBAL.load_configuration_str(json)
}

pub fn flush() -> Result<()> {
    GLOBAL.flush()
}

pub fn close() -> Result<()> {
    GLOBAL.close()
}

#[track_caller]
pub fn log<'a>(level: LogLevel, message: impl Into<Message<'a>>) {
    GLOBAL.log(level, message);
}

pub fn log_at<'a>(level: LogLevel, source: &str, message: impl Into<Message<'a>>) {
    GLOBAL.log_at(level, source, message);
}

#[track_caller]
pub fn log_lazy<F: FnOnce() -> String>(level: LogLevel, f: F) {
    GLOBAL.log_lazy(level, f);
}

#[track_caller]
pub fn logf(level: LogLevel, template: &str, args: Vec<Arg>) {
    GLOBAL.logf(level, template, args);
}

#[track_caller]
pub fn trace<'a>(message: impl Into<Message<'a>>) {
    GLOBAL.trace(message);
}

#[track_caller]
pub fn finest<'a>(message: impl Into<Message<'a>>) {
    GLOBAL.finest(message);
}

#[track_caller]
pub fn fine<'a>(message: impl Into<Message<'a>>) {
    GLOBAL.fine(message);
}

#[track_caller]
pub fn debug<'a>(message: impl Into<Message<'a>>) {
    GLOBAL.debug(message);
}

#[track_caller]
pub fn info<'a>(message: impl Into<Message<'a>>) {
    GLOBAL.info(message);
}

#[track_caller]
pub fn warn<'a>(message: impl Into<Message<'a>>) -> LoggedError {
    GLOBAL.warn(message)
}

#[track_caller]
pub fn error<'a>(message: impl Into<Message<'a>>) -> LoggedError {
    GLOBAL.error(message)
}

#[track_caller]
pub fn critical<'a>(message: impl Into<Message<'a>>) -> LoggedError {
    GLOBAL.critical(message)
}

#[track_caller]
pub fn crash<'a>(message: impl Into<Message<'a>>) -> ! {
    GLOBAL.crash(message)
}

#[track_caller]
pub fn crashf(template: &str, args: Vec<Arg>) -> ! {
    GLOBAL.crashf(template, args)
}

#[track_caller]
pub fn exit<'a>(message: impl Into<Message<'a>>) -> ! {
    GLOBAL.exit(message)
}

#[track_caller]
pub fn exitf(template: &str, args: Vec<Arg>) -> ! {
    GLOBAL.exitf(template, args)
}

/// Log values at INFO, space separated. Nothing happens for an empty list.
#[track_caller]
pub fn stdout(values: Vec<Arg>) {
    if !values.is_empty() {
        GLOBAL.log(LogLevel::Info, Message::values(values));
    }
}

#[track_caller]
pub fn stdoutf(template: &str, args: Vec<Arg>) {
    GLOBAL.logf(LogLevel::Info, template, args);
}

/// Log values at ERROR, space separated. Nothing happens for an empty list.
#[track_caller]
pub fn stderr(values: Vec<Arg>) {
    if !values.is_empty() {
        GLOBAL.log(LogLevel::Error, Message::values(values));
    }
}

#[track_caller]
pub fn stderrf(template: &str, args: Vec<Arg>) {
    GLOBAL.logf(LogLevel::Error, template, args);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use crate::writers::MemoryWriter;

    // One test touches the shared instance so nothing races on it
    #[test]
    fn test_global_pass_through() {
        assert_eq!(dispatcher().baseline(), LogLevel::Debug);

        let memory = MemoryWriter::new(16);
        let handle = memory.handle();
        attach("global-test", Box::new(memory));
        assert_eq!(dispatcher().threshold_of("global-test"), Some(LogLevel::Debug));

        fine("too fine");
        debug(Message::values(args!["a", 1]));
        stdout(Vec::new());
        stdout(args!["out", 2]);
        stderrf("err %d", args![3]);
        let err = warn("careful");

        assert_eq!(err.to_string(), "careful");
        assert_eq!(handle.messages(), vec!["a 1", "out 2", "err 3", "careful"]);
        assert!(handle.records()[0].source.contains("global.rs:"));

        assert!(remove_filter("global-test"));
        info("after removal");
        assert_eq!(handle.len(), 4);
    }
}
