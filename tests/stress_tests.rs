//! Stress tests for concurrent logging
//!
//! Many threads share one logger; every record must come out whole, on its
//! own line, exactly once.

use parking_lot::Mutex;
use rust_log_facade::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::io::{self, Write};
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

const THREADS: usize = 100;
const LINES_PER_THREAD: usize = 100;

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn hammer(logger: &Arc<Logger>) {
    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = Arc::clone(logger);
            thread::spawn(move || {
                for i in 0..LINES_PER_THREAD {
                    logger.infof(format_args!("thread {} line {}", t, i));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("logging thread panicked");
    }
}

fn assert_well_formed(output: &str) {
    let mut seen = HashSet::new();
    let mut count = 0;

    for line in output.lines() {
        let record: serde_json::Value =
            serde_json::from_str(line).unwrap_or_else(|e| panic!("corrupted line {:?}: {}", line, e));
        assert_eq!(record["level"], "info");
        let msg = record["msg"].as_str().expect("msg is a string").to_string();
        assert!(seen.insert(msg), "duplicate record: {}", line);
        count += 1;
    }

    assert_eq!(count, THREADS * LINES_PER_THREAD);
}

#[test]
fn test_concurrent_console_logging() {
    let capture = Capture::default();
    let logger = Arc::new(
        Logger::builder()
            .format(Format::Structured)
            .console_writer(capture.clone())
            .build(),
    );

    hammer(&logger);

    let output = String::from_utf8(capture.0.lock().clone()).expect("records are utf-8");
    assert_well_formed(&output);
    assert_eq!(logger.metrics().total_logged(), (THREADS * LINES_PER_THREAD) as u64);
    assert_eq!(logger.metrics().dropped_count(), 0);
}

#[test]
fn test_concurrent_rotating_file_logging() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("stress.log");
    let logger = Arc::new(
        Logger::builder()
            .format(Format::Structured)
            .console_writer(io::sink())
            .rotate_with(
                RotationPolicy::new(&log_file)
                    .with_max_size(64 * 1024)
                    .with_max_backups(0),
            )
            .build(),
    );

    hammer(&logger);
    logger.sync();

    // With no backup limit every rolled file survives; read them all
    let mut output = String::new();
    for entry in fs::read_dir(temp_dir.path()).expect("Failed to list temp dir") {
        let path = entry.expect("Failed to read dir entry").path();
        output.push_str(&fs::read_to_string(&path).expect("Failed to read log file"));
    }

    assert_well_formed(&output);
}

#[test]
fn test_threshold_changes_while_logging() {
    let capture = Capture::default();
    let logger = Arc::new(
        Logger::builder()
            .level(Severity::Info)
            .console_writer(capture.clone())
            .build(),
    );
    let gate = logger.gate();

    let writer = {
        let logger = Arc::clone(&logger);
        thread::spawn(move || {
            for i in 0..5_000 {
                logger.info(format!("line {}", i));
            }
        })
    };
    for i in 0..1_000 {
        gate.set(if i % 2 == 0 { Severity::Error } else { Severity::Info });
    }
    writer.join().expect("logging thread panicked");

    let metrics = logger.metrics();
    assert_eq!(metrics.total_logged() + metrics.filtered_count(), 5_000);

    let output = String::from_utf8(capture.0.lock().clone()).expect("records are utf-8");
    assert_eq!(output.lines().count() as u64, metrics.total_logged());
}
