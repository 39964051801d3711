//! Logging macros
//!
//! Each level macro takes a dispatcher, a printf-style template and its
//! arguments, and records the calling module and line as the source.
//!
//! ```
//! use rust_log_dispatcher::prelude::*;
//! use rust_log_dispatcher::{info, warn};
//!
//! let log = Dispatcher::new();
//! log.attach("memory", Box::new(MemoryWriter::new(8)));
//!
//! info!(log, "server listening on port %d", 8080);
//! let err = warn!(log, "retry %d of %d", 3, 5);
//! assert_eq!(err.to_string(), "retry 3 of 5");
//! ```

/// Build a `Vec<Arg>` from a list of values
///
/// ```
/// use rust_log_dispatcher::{args, Arg};
///
/// let values = args!["disk", 97, true];
/// assert_eq!(values[1], Arg::Int(97));
/// ```
#[macro_export]
macro_rules! args {
    ($($value:expr),* $(,)?) => {
        vec![$($crate::core::Arg::from($value)),*]
    };
}

/// Log a template at an explicit level
///
/// ```
/// # use rust_log_dispatcher::prelude::*;
/// # let log = Dispatcher::new();
/// use rust_log_dispatcher::log;
/// log!(log, LogLevel::Info, "plain message");
/// log!(log, LogLevel::Error, "status %d", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($dispatcher:expr, $level:expr, $template:expr $(, $value:expr)* $(,)?) => {
        $dispatcher.log_at(
            $level,
            concat!(module_path!(), ":", line!()),
            $crate::core::Message::template($template, $crate::args![$($value),*]),
        )
    };
}

#[macro_export]
macro_rules! trace {
    ($dispatcher:expr, $($rest:tt)+) => {
        $crate::log!($dispatcher, $crate::core::LogLevel::Trace, $($rest)+)
    };
}

#[macro_export]
macro_rules! finest {
    ($dispatcher:expr, $($rest:tt)+) => {
        $crate::log!($dispatcher, $crate::core::LogLevel::Finest, $($rest)+)
    };
}

#[macro_export]
macro_rules! fine {
    ($dispatcher:expr, $($rest:tt)+) => {
        $crate::log!($dispatcher, $crate::core::LogLevel::Fine, $($rest)+)
    };
}

#[macro_export]
macro_rules! debug {
    ($dispatcher:expr, $($rest:tt)+) => {
        $crate::log!($dispatcher, $crate::core::LogLevel::Debug, $($rest)+)
    };
}

#[macro_export]
macro_rules! info {
    ($dispatcher:expr, $($rest:tt)+) => {
        $crate::log!($dispatcher, $crate::core::LogLevel::Info, $($rest)+)
    };
}

/// Log at a level and return the message as a
/// [`LoggedError`](crate::core::LoggedError)
#[doc(hidden)]
#[macro_export]
macro_rules! raise {
    ($dispatcher:expr, $level:expr, $template:expr $(, $value:expr)* $(,)?) => {
        $dispatcher.raise_at(
            $level,
            concat!(module_path!(), ":", line!()),
            $crate::core::Message::template($template, $crate::args![$($value),*]),
        )
    };
}

/// Log at WARNING; evaluates to the [`LoggedError`](crate::core::LoggedError)
#[macro_export]
macro_rules! warn {
    ($dispatcher:expr, $($rest:tt)+) => {
        $crate::raise!($dispatcher, $crate::core::LogLevel::Warning, $($rest)+)
    };
}

/// Log at ERROR; evaluates to the [`LoggedError`](crate::core::LoggedError)
///
/// ```
/// use rust_log_dispatcher::{error, Dispatcher, LoggedError};
///
/// fn connect(log: &Dispatcher, attempts: u32) -> Result<(), LoggedError> {
///     Err(error!(log, "gave up after %d attempts", attempts))
/// }
///
/// let err = connect(&Dispatcher::new(), 3).unwrap_err();
/// assert_eq!(err.message(), "gave up after 3 attempts");
/// ```
#[macro_export]
macro_rules! error {
    ($dispatcher:expr, $($rest:tt)+) => {
        $crate::raise!($dispatcher, $crate::core::LogLevel::Error, $($rest)+)
    };
}

/// Log at CRITICAL; evaluates to the [`LoggedError`](crate::core::LoggedError)
#[macro_export]
macro_rules! critical {
    ($dispatcher:expr, $($rest:tt)+) => {
        $crate::raise!($dispatcher, $crate::core::LogLevel::Critical, $($rest)+)
    };
}
