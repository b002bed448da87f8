//! Property-based tests for rust_log_facade using proptest

use parking_lot::Mutex;
use proptest::prelude::*;
use rust_log_facade::prelude::*;
use std::io::{self, Write};
use std::sync::Arc;

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    fn take(&self) -> String {
        let bytes = std::mem::take(&mut *self.0.lock());
        String::from_utf8(bytes).expect("records are utf-8")
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn any_severity() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::Debug),
        Just(Severity::Info),
        Just(Severity::Warning),
        Just(Severity::Error),
        Just(Severity::Fatal),
    ]
}

fn non_fatal_severity() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::Debug),
        Just(Severity::Info),
        Just(Severity::Warning),
        Just(Severity::Error),
    ]
}

// ============================================================================
// Severity Tests
// ============================================================================

proptest! {
    /// Severity names parse back to the same severity
    #[test]
    fn test_severity_str_roundtrip(level in any_severity()) {
        let parsed: Severity = level.to_str().parse().unwrap();
        prop_assert_eq!(level, parsed);
    }

    /// The gate admits a severity iff it is at or above the threshold
    #[test]
    fn test_gate_matches_ordering(level in any_severity(), threshold in any_severity()) {
        let gate = LevelGate::new(threshold);
        prop_assert_eq!(gate.enabled(level), level >= threshold);
    }
}

// ============================================================================
// Logger Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// A record is written iff its severity passes the current threshold,
    /// including after the threshold moves
    #[test]
    fn test_observable_iff_enabled(
        level in non_fatal_severity(),
        initial in any_severity(),
        updated in any_severity(),
    ) {
        let capture = Capture::default();
        let logger = Logger::builder()
            .level(initial)
            .format(Format::Structured)
            .console_writer(capture.clone())
            .build();

        logger.log(level, "probe");
        prop_assert_eq!(!capture.take().is_empty(), level >= initial);

        logger.set_level(updated);
        logger.log(level, "probe");
        prop_assert_eq!(!capture.take().is_empty(), level >= updated);
    }

    /// Any message survives structured encoding unchanged
    #[test]
    fn test_structured_message_preserved(message in any::<String>()) {
        let capture = Capture::default();
        let logger = Logger::builder()
            .format(Format::Structured)
            .console_writer(capture.clone())
            .build();

        logger.info(message.as_str());

        let output = capture.take();
        prop_assert_eq!(output.lines().count(), 1);
        let record: serde_json::Value = serde_json::from_str(output.trim_end()).unwrap();
        prop_assert_eq!(record["msg"].as_str(), Some(message.as_str()));
    }

    /// Text records stay on one line whatever the message contains
    #[test]
    fn test_text_record_is_single_line(message in "[a-z\\n\\r\\t ]{0,64}") {
        let capture = Capture::default();
        let logger = Logger::builder().console_writer(capture.clone()).build();

        logger.warning(message.as_str());

        let output = capture.take();
        prop_assert_eq!(output.matches('\n').count(), 1);
        prop_assert!(output.ends_with('\n'));
    }

    /// Message parts are joined with exactly one space
    #[test]
    fn test_parts_joined_with_single_space(parts in prop::collection::vec("[a-z0-9]{1,8}", 1..6)) {
        prop_assert_eq!(parts.clone().into_message(), parts.join(" "));
    }
}
