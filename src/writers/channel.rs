//! Channel-backed writer
//!
//! Moves the real writer onto a worker thread behind a bounded
//! `crossbeam-channel` queue, so a slow destination does not hold up the
//! thread that logs. What happens when the queue is full is decided by the
//! [`OverflowPolicy`].

use crate::core::filter::panic_message;
use crate::core::{ErrorHandler, LogRecord, LogWriter, LoggerError, Result};
use crossbeam_channel::{bounded, Receiver, SendTimeoutError, Sender, TrySendError};
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// What a full queue does to a new record
///
/// ```
/// use rust_log_dispatcher::writers::OverflowPolicy;
/// use std::time::Duration;
///
/// let policy: OverflowPolicy = "block:250".parse().unwrap();
/// assert_eq!(policy, OverflowPolicy::BlockWithTimeout(Duration::from_millis(250)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Turn the record away; the writer reports it as dropped
    #[default]
    Drop,
    /// Wait for room. Slows the logging thread down to the writer's pace.
    Block,
    /// Wait up to the timeout, then drop
    BlockWithTimeout(Duration),
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverflowPolicy::Drop => write!(f, "drop"),
            OverflowPolicy::Block => write!(f, "block"),
            OverflowPolicy::BlockWithTimeout(d) => write!(f, "block:{}", d.as_millis()),
        }
    }
}

impl FromStr for OverflowPolicy {
    type Err = LoggerError;

    /// `drop`, `block`, or `block:<millis>`
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().to_lowercase();
        match s.split_once(':') {
            Some(("block", millis)) => millis
                .trim()
                .parse::<u64>()
                .map(|ms| OverflowPolicy::BlockWithTimeout(Duration::from_millis(ms)))
                .map_err(|_| LoggerError::config("overflow", format!("bad timeout '{}'", millis))),
            Some(_) => Err(LoggerError::config("overflow", format!("unknown policy '{}'", s))),
            None => match s.as_str() {
                "drop" => Ok(OverflowPolicy::Drop),
                "block" => Ok(OverflowPolicy::Block),
                _ => Err(LoggerError::config("overflow", format!("unknown policy '{}'", s))),
            },
        }
    }
}

enum Command {
    Record(LogRecord),
    Flush(Sender<Result<()>>),
}

#[derive(Default)]
struct Counters {
    dropped: AtomicU64,
    failed: AtomicU64,
}

pub struct ChannelWriter {
    name: String,
    sender: Option<Sender<Command>>,
    worker: Option<thread::JoinHandle<Result<()>>>,
    policy: OverflowPolicy,
    counters: Arc<Counters>,
}

impl ChannelWriter {
    /// Wrap `inner` behind a queue holding up to `capacity` records
    pub fn new(inner: Box<dyn LogWriter>, capacity: usize, policy: OverflowPolicy) -> Result<Self> {
        Self::spawn(inner, capacity, policy, None)
    }

    /// Like [`ChannelWriter::new`], but failures on the worker thread go to
    /// `handler` instead of stderr
    pub fn with_error_handler(
        inner: Box<dyn LogWriter>,
        capacity: usize,
        policy: OverflowPolicy,
        handler: ErrorHandler,
    ) -> Result<Self> {
        Self::spawn(inner, capacity, policy, Some(handler))
    }

    fn spawn(
        inner: Box<dyn LogWriter>,
        capacity: usize,
        policy: OverflowPolicy,
        handler: Option<ErrorHandler>,
    ) -> Result<Self> {
        let name = format!("channel({})", inner.name());
        let (sender, receiver) = bounded(capacity.max(1));
        let counters = Arc::new(Counters::default());
        let worker_counters = Arc::clone(&counters);

        let worker = thread::Builder::new()
            .name(format!("log-{}", inner.name()))
            .spawn(move || run_worker(inner, receiver, &worker_counters, handler))
            .map_err(|e| LoggerError::io_operation("spawning writer thread", name.clone(), e))?;

        Ok(Self {
            name,
            sender: Some(sender),
            worker: Some(worker),
            policy,
            counters,
        })
    }

    pub fn policy(&self) -> &OverflowPolicy {
        &self.policy
    }

    /// Records turned away because the queue was full
    pub fn dropped_count(&self) -> u64 {
        self.counters.dropped.load(Ordering::Relaxed)
    }

    /// Records the inner writer failed on
    pub fn failed_count(&self) -> u64 {
        self.counters.failed.load(Ordering::Relaxed)
    }

    fn sender(&self) -> Result<&Sender<Command>> {
        self.sender
            .as_ref()
            .ok_or_else(|| LoggerError::WriterClosed(self.name.clone()))
    }

    fn dropped(&self) -> Result<bool> {
        self.counters.dropped.fetch_add(1, Ordering::Relaxed);
        Ok(false)
    }

    fn shutdown(&mut self) -> Result<()> {
        // Hanging up lets the worker drain what is queued and exit
        drop(self.sender.take());

        match self.worker.take() {
            Some(handle) => match handle.join() {
                Ok(result) => result,
                Err(panic_info) => Err(LoggerError::writer(format!(
                    "{} worker panicked: {}",
                    self.name,
                    panic_message(panic_info.as_ref())
                ))),
            },
            None => Ok(()),
        }
    }
}

fn run_worker(
    mut inner: Box<dyn LogWriter>,
    receiver: Receiver<Command>,
    counters: &Counters,
    handler: Option<ErrorHandler>,
) -> Result<()> {
    let report = |name: &str, err: LoggerError| match &handler {
        Some(handler) => handler(name, &err),
        None => eprintln!("[LOGGER ERROR] Writer '{}' failed on worker thread: {}", name, err),
    };

    for command in receiver.iter() {
        match command {
            Command::Record(record) => {
                let outcome = catch_unwind(AssertUnwindSafe(|| inner.write(&record)));
                match outcome {
                    Ok(Ok(true)) => {}
                    Ok(Ok(false)) => {
                        counters.dropped.fetch_add(1, Ordering::Relaxed);
                    }
                    Ok(Err(e)) => {
                        counters.failed.fetch_add(1, Ordering::Relaxed);
                        report(inner.name(), e);
                    }
                    Err(panic_info) => {
                        counters.failed.fetch_add(1, Ordering::Relaxed);
                        let message = format!("panicked: {}", panic_message(panic_info.as_ref()));
                        report(inner.name(), LoggerError::writer(message));
                    }
                }
            }
            Command::Flush(ack) => {
                let _ = ack.send(inner.flush());
            }
        }
    }

    inner.close()
}

impl LogWriter for ChannelWriter {
    fn write(&mut self, record: &LogRecord) -> Result<bool> {
        let sender = self.sender()?;
        let command = Command::Record(record.clone());

        match &self.policy {
            OverflowPolicy::Drop => match sender.try_send(command) {
                Ok(()) => Ok(true),
                Err(TrySendError::Full(_)) => self.dropped(),
                Err(TrySendError::Disconnected(_)) => Err(LoggerError::ChannelSendError),
            },
            OverflowPolicy::Block => sender
                .send(command)
                .map(|()| true)
                .map_err(|_| LoggerError::ChannelSendError),
            OverflowPolicy::BlockWithTimeout(timeout) => match sender.send_timeout(command, *timeout) {
                Ok(()) => Ok(true),
                Err(SendTimeoutError::Timeout(_)) => self.dropped(),
                Err(SendTimeoutError::Disconnected(_)) => Err(LoggerError::ChannelSendError),
            },
        }
    }

    /// Waits until everything queued before the call has been written
    fn flush(&mut self) -> Result<()> {
        let (ack, done) = bounded(1);
        self.sender()?
            .send(Command::Flush(ack))
            .map_err(|_| LoggerError::ChannelSendError)?;
        done.recv().map_err(|_| LoggerError::ChannelSendError)?
    }

    /// Drain the queue, close the inner writer and join the worker
    fn close(&mut self) -> Result<()> {
        self.shutdown()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for ChannelWriter {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            eprintln!("[LOGGER ERROR] Failed to shut down {}: {}", self.name, e);
        }
    }
}
