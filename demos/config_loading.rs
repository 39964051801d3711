//! Configuration loading example
//!
//! Builds a dispatcher from a JSON document, including a file writer moved
//! onto its own thread with `buffered`, then reads the file back.
//!
//! Run with: cargo run --example config_loading

use rust_log_dispatcher::prelude::*;
use rust_log_dispatcher::global;

fn main() -> Result<()> {
    println!("=== Rust Log Dispatcher - Configuration Example ===\n");

    let log_path = std::env::temp_dir().join("rust_log_dispatcher_demo.log");
    let _ = std::fs::remove_file(&log_path);

    let config = serde_json::json!({
        "filters": [
            {
                "tag": "file",
                "level": "FINE",
                "type": "file",
                "properties": {
                    "filename": log_path,
                    "buffered": "256",
                    "overflow": "block"
                }
            },
            {
                "tag": "disabled",
                "enabled": false,
                "level": "TRACE",
                "type": "memory"
            }
        ]
    });

    global::load_configuration_str(&config.to_string())?;
    println!("Registered filters: {:?}", global::dispatcher().filter_names());

    global::fine("fine detail");
    global::info(Message::template("%d workers started", args![4]));
    global::stdout(args!["legacy", "stdout", "call"]);
    let _ = global::warn("queue depth above 80%");

    global::close()?;

    println!("\nContents of {}:", log_path.display());
    for line in std::fs::read_to_string(&log_path)?.lines() {
        println!("   {}", line);
    }

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
