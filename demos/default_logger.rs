//! Default logger example
//!
//! Demonstrates the process-wide logger behind the free functions and how to
//! replace it.
//!
//! Run with: cargo run --example default_logger

use rust_log_facade::prelude::*;

fn main() {
    println!("=== Rust Log Facade - Default Logger Example ===\n");

    println!("1. Replacing the default with a console-only logger:");
    set_logger(Logger::builder().name("app").build());
    rust_log_facade::debug("debug through the default logger");
    rust_log_facade::infof(format_args!("listening on port {}", 8080));

    println!("\n2. Switching to structured output at warning level:");
    set_logger(
        Logger::builder()
            .name("app")
            .level(Severity::Warning)
            .format(Format::Structured)
            .build(),
    );
    rust_log_facade::info("hidden");
    rust_log_facade::warning(["disk", "usage", "at", "91%"]);

    println!("\n3. Adjusting the threshold of the current default:");
    logger().set_level(Severity::Error);
    rust_log_facade::warning("hidden now");
    rust_log_facade::errorf(format_args!("lost connection to {}", "db-1"));

    println!("\n=== Example completed successfully! ===");
}
