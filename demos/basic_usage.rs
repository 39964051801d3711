//! Basic dispatcher usage example
//!
//! Demonstrates filters at different thresholds, the three message shapes,
//! and the error-returning entry points.
//!
//! Run with: cargo run --example basic_usage

use rust_log_dispatcher::prelude::*;
use rust_log_dispatcher::{debug, info};

fn find_user(log: &Dispatcher, id: u32) -> std::result::Result<&'static str, LoggedError> {
    match id {
        1 => Ok("alice"),
        _ => Err(log.error(Message::template("no user with id %d", args![id]))),
    }
}

fn main() -> Result<()> {
    println!("=== Rust Log Dispatcher - Basic Usage Example ===\n");

    let history = MemoryWriter::new(100);
    let recorded = history.handle();

    let log = Dispatcher::builder()
        .filter("stdout", LogLevel::Info, ConsoleWriter::new())
        .filter("history", LogLevel::Trace, history)
        .build();

    println!("1. Every level, console shows INFO and above:");
    for level in LogLevel::ALL {
        log.log(level, Message::template("a %s message", args![level]));
    }

    println!("\n2. Message shapes:");
    log.info("a plain string");
    log.info(Message::template("%-8s|%6.2f|%x", args!["padded", 3.5, 255]));
    log.info(Message::values(args!["values", 42, true, 'c']));
    log.log_lazy(LogLevel::Fine, || {
        println!("   (deferred closure ran because 'history' wants FINE)");
        "computed lazily".to_string()
    });

    println!("\n3. Macros record the module and line as source:");
    info!(log, "listening on port %d", 8080);
    debug!(log, "only the history filter sees this");

    println!("\n4. Errors carry the logged text:");
    match find_user(&log, 7) {
        Ok(name) => println!("   found {}", name),
        Err(e) => println!("   caller got: {}", e),
    }

    log.close()?;

    println!("\n5. History kept {} records; the last one came from {}", recorded.len(),
        recorded.records().last().map(|r| r.source.clone()).unwrap_or_default());

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
