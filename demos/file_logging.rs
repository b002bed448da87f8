//! File logging example
//!
//! Demonstrates logging to the console and a rotating file simultaneously.
//!
//! Run with: cargo run --example file_logging

use rust_log_facade::prelude::*;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== Rust Log Facade - File Logging Example ===\n");

    let policy = RotationPolicy::new("logs/application.log")
        .with_max_size(4 * 1024)
        .with_max_backups(3)
        .with_max_age(Duration::from_secs(7 * 24 * 60 * 60))
        .with_compression(true);

    let logger = Logger::builder()
        .level(Severity::Info)
        .rotate_with(policy.clone())
        .build();

    println!("1. Logging to both console and file:");
    logger.info("Application started");
    logger.debug("Loading configuration... (below threshold)");
    logger.info("Configuration loaded successfully");
    logger.warning("Using default settings for some options");
    logger.error("Failed to load optional plugin");

    println!("\n2. Writing enough to roll the file over:");
    for i in 1..=100 {
        logger.infof(format_args!("Processing item {}/100", i));
    }
    logger.sync();

    let sink = RotatingFileSink::new(policy);
    println!("\n3. Backups next to {}:", sink.path().display());
    for backup in sink.backups()? {
        println!("   {} (#{})", backup.path.display(), backup.sequence);
    }

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
