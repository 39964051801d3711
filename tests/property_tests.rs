//! Property-based tests for rust_log_dispatcher using proptest

use proptest::prelude::*;
use rust_log_dispatcher::core::template::render;
use rust_log_dispatcher::prelude::*;

fn any_level() -> impl Strategy<Value = LogLevel> {
    proptest::sample::select(LogLevel::ALL.to_vec())
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// Level names and short names parse back to the same level
    #[test]
    fn test_log_level_str_roundtrip(level in any_level()) {
        prop_assert_eq!(level.to_str().parse::<LogLevel>().unwrap(), level);
        prop_assert_eq!(level.short_name().parse::<LogLevel>().unwrap(), level);
        prop_assert_eq!(level.to_str().to_lowercase().parse::<LogLevel>().unwrap(), level);
    }

    /// Ordering follows the numeric rank
    #[test]
    fn test_log_level_ordering(a in any_level(), b in any_level()) {
        prop_assert_eq!(a <= b, (a as u8) <= (b as u8));
        prop_assert_eq!(a.admits(b), a >= b);
    }

    /// A filter admits exactly the levels at or above its threshold
    #[test]
    fn test_filter_admission(threshold in any_level(), level in any_level()) {
        let memory = MemoryWriter::new(4);
        let handle = memory.handle();
        let log = Dispatcher::new();
        log.add_filter("mem", threshold, Box::new(memory));

        log.log(level, "sample");

        prop_assert_eq!(handle.len() == 1, level >= threshold);
        prop_assert_eq!(log.is_enabled(level), level >= threshold);
    }
}

// ============================================================================
// Message Tests
// ============================================================================

proptest! {
    /// Bare values are joined by single spaces in their default form
    #[test]
    fn test_values_join_with_spaces(values in prop::collection::vec(any::<i64>(), 0..8)) {
        let expected = values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(" ");
        let args: Vec<Arg> = values.into_iter().map(Arg::from).collect();
        prop_assert_eq!(Message::values(args).resolve(), expected);
    }

    /// A template without arguments comes back verbatim, `%` included
    #[test]
    fn test_template_without_args_is_verbatim(text in ".*") {
        prop_assert_eq!(Message::template(text.as_str(), Vec::new()).resolve(), text);
    }

    /// Text with no `%` renders unchanged apart from the extra-argument note
    #[test]
    fn test_plain_text_reports_extra_args(text in "[a-zA-Z0-9 ]{0,40}", n in any::<i32>()) {
        prop_assert_eq!(
            render(&text, &[Arg::from(n)]),
            format!("{}%!(EXTRA int={})", text, n)
        );
    }

    /// `%d` agrees with Rust's own integer formatting
    #[test]
    fn test_decimal_verb(n in any::<i64>(), width in 0usize..20) {
        prop_assert_eq!(render("%d", &[Arg::from(n)]), n.to_string());
        let template = format!("%{}d", width);
        prop_assert_eq!(render(&template, &[Arg::from(n)]), format!("{:>width$}", n, width = width));
    }

    /// `%s` with a string argument inserts it unchanged
    #[test]
    fn test_string_verb(s in ".*") {
        prop_assert_eq!(render("[%s]", &[Arg::from(s.as_str())]), format!("[{}]", s));
    }

    /// `%x` matches Rust's hex formatting for non-negative values
    #[test]
    fn test_hex_verb(n in any::<u64>()) {
        prop_assert_eq!(render("%x", &[Arg::from(n)]), format!("{:x}", n));
        prop_assert_eq!(render("%X", &[Arg::from(n)]), format!("{:X}", n));
    }

    /// Warning, error and critical always hand back the resolved text
    #[test]
    fn test_returned_error_matches_message(s in "[a-z ]{0,30}", n in any::<u32>()) {
        let log = Dispatcher::new();
        let err = log.error(Message::template("%s=%d", args![s.as_str(), n]));
        prop_assert_eq!(err.to_string(), format!("{}={}", s, n));
    }
}
