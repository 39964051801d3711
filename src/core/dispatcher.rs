//! Main dispatcher implementation

use super::{
    error::{LoggedError, LoggerError, Result},
    filter::{Delivery, Filter},
    log_level::LogLevel,
    log_record::{source_of, LogRecord},
    message::{Arg, Message},
    metrics::DispatchMetrics,
    terminate::{ProcessTerminator, Terminator},
    writer::LogWriter,
};
use parking_lot::RwLock;
use std::panic::Location;
use std::sync::Arc;

/// Callback told about every writer failure, with the failing filter's name
pub type ErrorHandler = Arc<dyn Fn(&str, &LoggerError) + Send + Sync>;

type FilterList = Arc<Vec<Arc<Filter>>>;

/// Filters log calls by level and fans accepted records out to writers.
///
/// Filters are kept in registration order and every record reaches the
/// admitting writers in that order. The filter list is copy-on-write: a log
/// call clones an `Arc` to the current list and works from that snapshot, so
/// registration and removal never show a half-updated set.
///
/// # Example
///
/// ```
/// use rust_log_dispatcher::prelude::*;
///
/// let memory = MemoryWriter::new(16);
/// let lines = memory.handle();
///
/// let log = Dispatcher::new();
/// log.add_filter("memory", LogLevel::Info, Box::new(memory));
///
/// log.debug("not interesting");
/// log.info(Message::template("%s had %d items", args!["cart", 3]));
///
/// assert_eq!(lines.messages(), vec!["cart had 3 items".to_string()]);
/// ```
pub struct Dispatcher {
    filters: RwLock<FilterList>,
    /// Threshold used by [`Dispatcher::attach`]
    baseline: LogLevel,
    metrics: DispatchMetrics,
    on_writer_error: Option<ErrorHandler>,
    terminator: Arc<dyn Terminator>,
}

impl Dispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::with_baseline(LogLevel::default())
    }

    #[must_use]
    pub fn with_baseline(baseline: LogLevel) -> Self {
        Self {
            filters: RwLock::new(Arc::new(Vec::new())),
            baseline,
            metrics: DispatchMetrics::new(),
            on_writer_error: None,
            terminator: Arc::new(ProcessTerminator),
        }
    }

    /// Create a builder for Dispatcher
    #[must_use]
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    pub fn baseline(&self) -> LogLevel {
        self.baseline
    }

    pub(crate) fn error_handler(&self) -> Option<&ErrorHandler> {
        self.on_writer_error.as_ref()
    }

    // ------------------------------------------------------------------
    // Filter registration
    // ------------------------------------------------------------------

    /// Register `writer` under `name`.
    ///
    /// An existing filter with the same name is replaced in place (it keeps
    /// its position in the delivery order) and its writer is closed.
    pub fn add_filter(&self, name: impl Into<String>, threshold: LogLevel, writer: Box<dyn LogWriter>) {
        let filter = Arc::new(Filter::new(name, threshold, writer));

        let replaced = {
            let mut filters = self.filters.write();
            let mut next: Vec<Arc<Filter>> = filters.as_ref().clone();
            let replaced = match next.iter().position(|f| f.name() == filter.name()) {
                Some(idx) => Some(std::mem::replace(&mut next[idx], filter)),
                None => {
                    next.push(filter);
                    None
                }
            };
            *filters = Arc::new(next);
            replaced
        };

        if let Some(old) = replaced {
            self.close_filter(&old);
        }
    }

    /// Register `writer` under `name` at the baseline threshold
    pub fn attach(&self, name: impl Into<String>, writer: Box<dyn LogWriter>) {
        self.add_filter(name, self.baseline, writer);
    }

    /// Remove and close the filter called `name`.
    ///
    /// Returns `false` when no such filter exists.
    pub fn remove_filter(&self, name: &str) -> bool {
        let removed = {
            let mut filters = self.filters.write();
            match filters.iter().position(|f| f.name() == name) {
                Some(idx) => {
                    let mut next: Vec<Arc<Filter>> = filters.as_ref().clone();
                    let removed = next.remove(idx);
                    *filters = Arc::new(next);
                    Some(removed)
                }
                None => None,
            }
        };

        match removed {
            Some(filter) => {
                self.close_filter(&filter);
                true
            }
            None => false,
        }
    }

    /// Names of the registered filters, in delivery order
    pub fn filter_names(&self) -> Vec<String> {
        self.snapshot().iter().map(|f| f.name().to_string()).collect()
    }

    pub fn filter_count(&self) -> usize {
        self.snapshot().len()
    }

    pub fn threshold_of(&self, name: &str) -> Option<LogLevel> {
        self.snapshot()
            .iter()
            .find(|f| f.name() == name)
            .map(|f| f.threshold())
    }

    /// `true` when at least one filter would take a record at `level`
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        self.snapshot().iter().any(|f| f.admits(level))
    }

    fn snapshot(&self) -> FilterList {
        Arc::clone(&self.filters.read())
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    /// Resolve and deliver, but only if some filter admits `level`
    fn dispatch<'a, M, S>(&self, level: LogLevel, source: S, message: M)
    where
        M: Into<Message<'a>>,
        S: FnOnce() -> String,
    {
        let filters = self.snapshot();
        if !filters.iter().any(|f| f.admits(level)) {
            self.metrics.record_filtered_out();
            return;
        }

        let record = LogRecord::new(level, source(), message.into().resolve());
        self.fan_out(&filters, &record);
    }

    /// Always resolve; deliver only if some filter admits `level`
    fn dispatch_returning<'a, M, S>(&self, level: LogLevel, source: S, message: M) -> LoggedError
    where
        M: Into<Message<'a>>,
        S: FnOnce() -> String,
    {
        let text = message.into().resolve();

        let filters = self.snapshot();
        if filters.iter().any(|f| f.admits(level)) {
            let record = LogRecord::new(level, source(), text.clone());
            self.fan_out(&filters, &record);
        } else {
            self.metrics.record_filtered_out();
        }

        LoggedError::new(level, text)
    }

    fn fan_out(&self, filters: &[Arc<Filter>], record: &LogRecord) {
        self.metrics.record_dispatched();

        for filter in filters.iter().filter(|f| f.admits(record.level)) {
            match filter.deliver(record) {
                Ok(Delivery::Accepted) => {
                    self.metrics.record_delivered();
                }
                Ok(Delivery::Dropped) => {
                    self.metrics.record_dropped();
                }
                Ok(Delivery::Skipped) => {}
                Err(e) => {
                    self.metrics.record_failed();
                    self.report(filter.name(), &e, "failed");
                }
            }
        }
    }

    fn report(&self, name: &str, err: &LoggerError, what: &str) {
        match &self.on_writer_error {
            Some(handler) => handler(name, err),
            None => eprintln!("[LOGGER ERROR] Writer '{}' {}: {}", name, what, err),
        }
    }

    fn close_filter(&self, filter: &Filter) -> Option<LoggerError> {
        match filter.close() {
            Ok(()) => None,
            Err(e) => {
                self.metrics.record_close_failure();
                self.report(filter.name(), &e, "failed to close");
                Some(e)
            }
        }
    }

    // ------------------------------------------------------------------
    // Entry points
    // ------------------------------------------------------------------

    /// Log at an explicit level
    #[track_caller]
    pub fn log<'a>(&self, level: LogLevel, message: impl Into<Message<'a>>) {
        let location = Location::caller();
        self.dispatch(level, || source_of(location), message);
    }

    /// Log with an explicit source instead of the caller's location
    pub fn log_at<'a>(&self, level: LogLevel, source: &str, message: impl Into<Message<'a>>) {
        self.dispatch(level, || source.to_string(), message);
    }

    /// Log the result of `f`, which runs only if some filter admits `level`
    #[track_caller]
    pub fn log_lazy<F>(&self, level: LogLevel, f: F)
    where
        F: FnOnce() -> String,
    {
        let location = Location::caller();
        self.dispatch(level, || source_of(location), Message::deferred(f));
    }

    /// Log with an explicit source and return the message as an error,
    /// like [`Dispatcher::error`] at any level
    pub fn raise_at<'a>(&self, level: LogLevel, source: &str, message: impl Into<Message<'a>>) -> LoggedError {
        self.dispatch_returning(level, || source.to_string(), message)
    }

    /// Log a printf-style template
    #[track_caller]
    pub fn logf(&self, level: LogLevel, template: &str, args: Vec<Arg>) {
        let location = Location::caller();
        self.dispatch(level, || source_of(location), Message::template(template, args));
    }

    #[inline]
    #[track_caller]
    pub fn trace<'a>(&self, message: impl Into<Message<'a>>) {
        self.log(LogLevel::Trace, message);
    }

    #[inline]
    #[track_caller]
    pub fn finest<'a>(&self, message: impl Into<Message<'a>>) {
        self.log(LogLevel::Finest, message);
    }

    #[inline]
    #[track_caller]
    pub fn fine<'a>(&self, message: impl Into<Message<'a>>) {
        self.log(LogLevel::Fine, message);
    }

    #[inline]
    #[track_caller]
    pub fn debug<'a>(&self, message: impl Into<Message<'a>>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    #[track_caller]
    pub fn info<'a>(&self, message: impl Into<Message<'a>>) {
        self.log(LogLevel::Info, message);
    }

    /// Log at WARNING and return the message as an error
    #[track_caller]
    pub fn warn<'a>(&self, message: impl Into<Message<'a>>) -> LoggedError {
        let location = Location::caller();
        self.dispatch_returning(LogLevel::Warning, || source_of(location), message)
    }

    /// Log at ERROR and return the message as an error
    #[track_caller]
    pub fn error<'a>(&self, message: impl Into<Message<'a>>) -> LoggedError {
        let location = Location::caller();
        self.dispatch_returning(LogLevel::Error, || source_of(location), message)
    }

    /// Log at CRITICAL and return the message as an error
    #[track_caller]
    pub fn critical<'a>(&self, message: impl Into<Message<'a>>) -> LoggedError {
        let location = Location::caller();
        self.dispatch_returning(LogLevel::Critical, || source_of(location), message)
    }

    // ------------------------------------------------------------------
    // Crash and exit helpers
    // ------------------------------------------------------------------

    /// Log at CRITICAL, then crash without closing any writer
    #[track_caller]
    pub fn crash<'a>(&self, message: impl Into<Message<'a>>) -> ! {
        let message = message.into();
        let text = if message.is_empty() {
            String::new()
        } else {
            let location = Location::caller();
            self.dispatch_returning(LogLevel::Critical, || source_of(location), message)
                .message
        };
        self.terminator.crash(text)
    }

    /// Log a template at CRITICAL, close every writer, then crash
    #[track_caller]
    pub fn crashf(&self, template: &str, args: Vec<Arg>) -> ! {
        let location = Location::caller();
        let text = self
            .dispatch_returning(
                LogLevel::Critical,
                || source_of(location),
                Message::template(template, args),
            )
            .message;
        let _ = self.close();
        self.terminator.crash(text)
    }

    /// Log at ERROR, close every writer, then exit with status 0
    #[track_caller]
    pub fn exit<'a>(&self, message: impl Into<Message<'a>>) -> ! {
        let location = Location::caller();
        let message = message.into();
        if !message.is_empty() {
            self.dispatch(LogLevel::Error, || source_of(location), message);
        }
        let _ = self.close();
        self.terminator.exit(0)
    }

    /// Log a template at ERROR, close every writer, then exit with status 0
    #[track_caller]
    pub fn exitf(&self, template: &str, args: Vec<Arg>) -> ! {
        let location = Location::caller();
        self.dispatch(LogLevel::Error, || source_of(location), Message::template(template, args));
        let _ = self.close();
        self.terminator.exit(0)
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Flush every writer, reporting failures and carrying on
    pub fn flush(&self) -> Result<()> {
        let mut failures = Vec::new();
        for filter in self.snapshot().iter() {
            if let Err(e) = filter.flush() {
                self.report(filter.name(), &e, "failed to flush");
                failures.push((filter.name().to_string(), e));
            }
        }

        match failures.len() {
            0 => Ok(()),
            _ => Err(LoggerError::other(format!(
                "{} writer(s) failed to flush: {}",
                failures.len(),
                failures
                    .iter()
                    .map(|(name, e)| format!("{}: {}", name, e))
                    .collect::<Vec<_>>()
                    .join("; ")
            ))),
        }
    }

    /// Close every writer and remove every filter.
    ///
    /// Each writer is closed exactly once, after any write already in
    /// progress on it finishes. A failing writer does not stop the others;
    /// all failures come back together. The dispatcher stays usable and
    /// simply has no filters until new ones are registered.
    pub fn close(&self) -> Result<()> {
        let filters = std::mem::take(&mut *self.filters.write());

        let failures: Vec<(String, LoggerError)> = filters
            .iter()
            .filter_map(|filter| {
                self.close_filter(filter)
                    .map(|e| (filter.name().to_string(), e))
            })
            .collect();

        if failures.is_empty() {
            Ok(())
        } else {
            Err(LoggerError::Shutdown { failures })
        }
    }

    /// Get the dispatcher metrics for observability
    ///
    /// # Example
    ///
    /// ```
    /// use rust_log_dispatcher::prelude::*;
    ///
    /// let log = Dispatcher::new();
    /// log.info("nobody is listening");
    ///
    /// assert_eq!(log.metrics().filtered_out_count(), 1);
    /// assert_eq!(log.metrics().dispatched_count(), 0);
    /// ```
    pub fn metrics(&self) -> &DispatchMetrics {
        &self.metrics
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        if self.filters.read().is_empty() {
            return;
        }
        // close() already reported each failure
        let _ = self.close();
    }
}

/// Builder for constructing a Dispatcher with a fluent API
///
/// # Example
/// ```
/// use rust_log_dispatcher::prelude::*;
/// use std::sync::Arc;
///
/// let log = Dispatcher::builder()
///     .baseline_level(LogLevel::Info)
///     .filter("memory", LogLevel::Debug, MemoryWriter::new(64))
///     .on_writer_error(Arc::new(|name, err| {
///         eprintln!("ALERT: writer {} failed: {}", name, err);
///     }))
///     .build();
///
/// assert_eq!(log.filter_names(), vec!["memory".to_string()]);
/// ```
pub struct DispatcherBuilder {
    baseline: LogLevel,
    filters: Vec<(String, Option<LogLevel>, Box<dyn LogWriter>)>,
    on_writer_error: Option<ErrorHandler>,
    terminator: Option<Arc<dyn Terminator>>,
}

impl DispatcherBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            baseline: LogLevel::default(),
            filters: Vec::new(),
            on_writer_error: None,
            terminator: None,
        }
    }

    /// Threshold used by `attach` and [`Dispatcher::attach`]
    #[must_use = "builder methods return a new value"]
    pub fn baseline_level(mut self, level: LogLevel) -> Self {
        self.baseline = level;
        self
    }

    /// Add a named filter
    #[must_use = "builder methods return a new value"]
    pub fn filter<W: LogWriter + 'static>(
        mut self,
        name: impl Into<String>,
        threshold: LogLevel,
        writer: W,
    ) -> Self {
        self.filters.push((name.into(), Some(threshold), Box::new(writer)));
        self
    }

    /// Add a named filter at the baseline threshold
    #[must_use = "builder methods return a new value"]
    pub fn attach<W: LogWriter + 'static>(mut self, name: impl Into<String>, writer: W) -> Self {
        self.filters.push((name.into(), None, Box::new(writer)));
        self
    }

    /// Set a callback for writer failures
    ///
    /// Without one, failures are printed to stderr.
    #[must_use = "builder methods return a new value"]
    pub fn on_writer_error(mut self, handler: ErrorHandler) -> Self {
        self.on_writer_error = Some(handler);
        self
    }

    /// Replace the process terminator used by the crash and exit helpers
    #[must_use = "builder methods return a new value"]
    pub fn terminator<T: Terminator + 'static>(mut self, terminator: T) -> Self {
        self.terminator = Some(Arc::new(terminator));
        self
    }

    /// Build the Dispatcher
    pub fn build(self) -> Dispatcher {
        let mut dispatcher = Dispatcher::with_baseline(self.baseline);
        dispatcher.on_writer_error = self.on_writer_error;
        if let Some(terminator) = self.terminator {
            dispatcher.terminator = terminator;
        }

        for (name, threshold, writer) in self.filters {
            dispatcher.add_filter(name, threshold.unwrap_or(self.baseline), writer);
        }

        dispatcher
    }
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}
