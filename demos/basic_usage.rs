//! Basic logger usage example
//!
//! Demonstrates console logging, message forms and runtime threshold changes.
//!
//! Run with: cargo run --example basic_usage

use rust_log_facade::prelude::*;
use rust_log_facade::{info, warning};

fn main() {
    println!("=== Rust Log Facade - Basic Usage Example ===\n");

    let logger = Logger::builder().name("basic").build();

    println!("1. Logging at different levels:");
    logger.debug("This is a debug message");
    logger.info("This is an info message");
    logger.warning("This is a warning message");
    logger.error("This is an error message");

    println!("\n2. Message forms:");
    logger.info(["parts", "are", "joined", "with", "spaces"]);
    logger.infof(format_args!("{} items processed in {}ms", 128, 42));
    info!(logger, "macros format too: {:?}", ("a", 1));

    println!("\n3. Changing the threshold at runtime:");
    logger.set_level(Severity::Warning);
    println!("   Threshold set to WARNING - debug and info won't show:");
    logger.debug("Debug message (hidden)");
    logger.info("Info message (hidden)");
    warning!(logger, "Warning message (visible)");

    println!("\n4. Structured output:");
    let json = Logger::builder()
        .format(Format::Structured)
        .name("basic.json")
        .build();
    json.info("one JSON object per line");

    println!(
        "\nLogged {} records, filtered {}",
        logger.metrics().total_logged(),
        logger.metrics().filtered_count()
    );
    println!("\n=== Example completed successfully! ===");
}
