//! Message payloads and their resolution
//!
//! Every entry point accepts a [`Message`] in one of three shapes:
//! - `Deferred`: a closure producing the text, run only if some filter wants it
//! - `Templated`: a printf-style template plus arguments
//! - `Values`: a list of values joined with single spaces
//!
//! Resolution consumes the message, so it can happen at most once per call.

use super::log_level::LogLevel;
use super::template;
use std::borrow::Cow;
use std::fmt;

/// A single log argument
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Str(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Char(char),
    Null,
}

impl Arg {
    /// Capture any displayable value as text
    pub fn display<T: fmt::Display + ?Sized>(value: &T) -> Self {
        Arg::Str(value.to_string())
    }

    /// Type name used in template diagnostics such as `%!d(string=abc)`
    pub fn type_name(&self) -> &'static str {
        match self {
            Arg::Str(_) => "string",
            Arg::Int(_) => "int",
            Arg::UInt(_) => "uint",
            Arg::Float(_) => "float64",
            Arg::Bool(_) => "bool",
            Arg::Char(_) => "char",
            Arg::Null => "nil",
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Str(s) => write!(f, "{}", s),
            Arg::Int(i) => write!(f, "{}", i),
            Arg::UInt(u) => write!(f, "{}", u),
            Arg::Float(fl) => f.write_str(&template::float_default(*fl)),
            Arg::Bool(b) => write!(f, "{}", b),
            Arg::Char(c) => write!(f, "{}", c),
            Arg::Null => write!(f, "<nil>"),
        }
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Arg::Str(s)
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Str(s.to_string())
    }
}

impl From<&String> for Arg {
    fn from(s: &String) -> Self {
        Arg::Str(s.clone())
    }
}

macro_rules! arg_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Arg {
            fn from(i: $t) -> Self {
                Arg::Int(i as i64)
            }
        })*
    };
}

macro_rules! arg_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Arg {
            fn from(u: $t) -> Self {
                Arg::UInt(u as u64)
            }
        })*
    };
}

arg_from_signed!(i8, i16, i32, i64, isize);
arg_from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for Arg {
    fn from(f: f32) -> Self {
        Arg::Float(f as f64)
    }
}

impl From<f64> for Arg {
    fn from(f: f64) -> Self {
        Arg::Float(f)
    }
}

impl From<bool> for Arg {
    fn from(b: bool) -> Self {
        Arg::Bool(b)
    }
}

impl From<char> for Arg {
    fn from(c: char) -> Self {
        Arg::Char(c)
    }
}

impl From<LogLevel> for Arg {
    fn from(level: LogLevel) -> Self {
        Arg::Str(level.to_str().to_string())
    }
}

impl<T: Into<Arg>> From<Option<T>> for Arg {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Arg::Null)
    }
}

/// Closure type for deferred messages
pub type DeferredFn<'a> = Box<dyn FnOnce() -> String + 'a>;

/// The payload of a log call, resolved lazily
pub enum Message<'a> {
    /// Computed on demand; never run if no filter admits the level
    Deferred(DeferredFn<'a>),
    /// printf-style template; with no args the template is used verbatim
    Templated {
        template: Cow<'a, str>,
        args: Vec<Arg>,
    },
    /// Values rendered with their default representation, space separated
    Values(Vec<Arg>),
}

impl<'a> Message<'a> {
    pub fn deferred<F>(f: F) -> Self
    where
        F: FnOnce() -> String + 'a,
    {
        Message::Deferred(Box::new(f))
    }

    pub fn template(template: impl Into<Cow<'a, str>>, args: Vec<Arg>) -> Self {
        Message::Templated {
            template: template.into(),
            args,
        }
    }

    pub fn values(values: Vec<Arg>) -> Self {
        Message::Values(values)
    }

    /// `true` for a value list with nothing in it
    pub fn is_empty(&self) -> bool {
        matches!(self, Message::Values(values) if values.is_empty())
    }

    /// Turn the payload into the final message text
    pub fn resolve(self) -> String {
        match self {
            Message::Deferred(f) => f(),
            Message::Templated { template, args } => {
                if args.is_empty() {
                    template.into_owned()
                } else {
                    template::render(&template, &args)
                }
            }
            Message::Values(values) => values
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

impl fmt::Debug for Message<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Deferred(_) => f.write_str("Deferred(..)"),
            Message::Templated { template, args } => f
                .debug_struct("Templated")
                .field("template", template)
                .field("args", args)
                .finish(),
            Message::Values(values) => f.debug_tuple("Values").field(values).finish(),
        }
    }
}

impl<'a> From<&'a str> for Message<'a> {
    fn from(s: &'a str) -> Self {
        Message::template(s, Vec::new())
    }
}

impl From<String> for Message<'_> {
    fn from(s: String) -> Self {
        Message::template(s, Vec::new())
    }
}

impl<'a> From<&'a String> for Message<'a> {
    fn from(s: &'a String) -> Self {
        Message::template(s.as_str(), Vec::new())
    }
}

impl From<Vec<Arg>> for Message<'_> {
    fn from(values: Vec<Arg>) -> Self {
        Message::Values(values)
    }
}

impl From<Arg> for Message<'_> {
    fn from(value: Arg) -> Self {
        Message::Values(vec![value])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_template_resolution() {
        let msg = Message::template("%s had %d items", vec!["cart".into(), 3.into()]);
        assert_eq!(msg.resolve(), "cart had 3 items");
    }

    #[test]
    fn test_template_without_args_is_verbatim() {
        let msg = Message::from("100% done");
        assert_eq!(msg.resolve(), "100% done");
    }

    #[test]
    fn test_values_resolution() {
        let msg = Message::values(vec!["a".into(), 1.into(), true.into()]);
        assert_eq!(msg.resolve(), "a 1 true");
    }

    #[test]
    fn test_values_default_representations() {
        let msg = Message::values(vec![
            2.5f64.into(),
            3.0f64.into(),
            'x'.into(),
            Option::<i32>::None.into(),
            LogLevel::Error.into(),
        ]);
        assert_eq!(msg.resolve(), "2.5 3 x <nil> ERROR");
    }

    #[test]
    fn test_deferred_runs_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let msg = Message::deferred(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            "computed".to_string()
        });

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(msg.resolve(), "computed");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_arg_display_helper() {
        let addr: std::net::SocketAddr = "127.0.0.1:8080".parse().unwrap();
        assert_eq!(Arg::display(&addr), Arg::Str("127.0.0.1:8080".to_string()));
    }

    #[test]
    fn test_deferred_may_borrow() {
        let items = vec![1, 2, 3];
        let msg = Message::deferred(|| format!("{} items", items.len()));
        assert_eq!(msg.resolve(), "3 items");
    }

    #[test]
    fn test_is_empty_only_for_empty_values() {
        assert!(Message::values(Vec::new()).is_empty());
        assert!(!Message::from("").is_empty());
    }

    #[test]
    fn test_debug_hides_closure() {
        let msg = Message::deferred(|| "x".to_string());
        assert_eq!(format!("{:?}", msg), "Deferred(..)");
    }
}
