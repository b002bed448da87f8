//! Main logger implementation

use super::{
    encoder::{select_encoder, Encoder, EncoderOptions, Format},
    error::LoggerError,
    level_gate::LevelGate,
    log_entry::{Caller, LogEntry},
    message::IntoMessage,
    metrics::LoggerMetrics,
    severity::Severity,
    sink::Sink,
    timestamp::TimestampFormat,
};
use crate::sinks::{
    shared_writer, ConsoleSink, FanoutSink, RotatingFileSink, RotationPolicy, SharedWriter,
};
use std::backtrace::Backtrace;
use std::fmt;
use std::io::Write;
use std::sync::Arc;

/// Process exit code used after a fatal record has been written
pub const FATAL_EXIT_CODE: i32 = 1;

/// Report the first failure and every 1000th after it
const FAILURE_REPORT_INTERVAL: u64 = 1000;

/// An encoder, a sink and a severity gate bound together.
///
/// Built once by [`LoggerBuilder`] and immutable afterwards, except for the
/// severity threshold which can be moved at runtime with [`Logger::set_level`].
/// All methods take `&self`; share a logger across threads with `Arc`.
///
/// Log methods never return errors. Records that fail to encode or write are
/// counted in [`Logger::metrics`] and reported on stderr.
pub struct Logger {
    gate: Arc<LevelGate>,
    encoder: Box<dyn Encoder>,
    sink: Arc<dyn Sink>,
    name: Option<String>,
    metrics: LoggerMetrics,
}

impl Logger {
    /// Logger with the process defaults: debug threshold, text format,
    /// console plus the default rotating file.
    #[must_use]
    pub fn new() -> Self {
        LoggerBuilder::new().rotate().build()
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use rust_log_facade::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .level(Severity::Info)
    ///     .format(Format::Structured)
    ///     .build();
    /// assert_eq!(logger.level(), Severity::Info);
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub fn level(&self) -> Severity {
        self.gate.level()
    }

    /// Move the threshold; visible to every thread's next log call
    pub fn set_level(&self, level: Severity) {
        self.gate.set(level);
    }

    pub fn enabled(&self, level: Severity) -> bool {
        self.gate.enabled(level)
    }

    /// Shared handle to this logger's threshold
    pub fn gate(&self) -> Arc<LevelGate> {
        Arc::clone(&self.gate)
    }

    pub fn format(&self) -> Format {
        self.encoder.format()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Flush the sink. Failures are reported, never returned.
    pub fn sync(&self) {
        if let Err(e) = self.sink.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush log sink: {}", e);
        }
    }

    /// Log `message` at `level`. A `Fatal` level terminates the process
    /// exactly like [`Logger::fatal`].
    #[track_caller]
    pub fn log<M: IntoMessage>(&self, level: Severity, message: M) {
        if level == Severity::Fatal {
            self.terminate(message.into_message(), Caller::here());
        }
        if !self.gate.enabled(level) {
            self.metrics.record_filtered();
            return;
        }
        self.emit(level, message.into_message(), Caller::here(), None);
    }

    #[track_caller]
    #[inline]
    pub fn debug<M: IntoMessage>(&self, message: M) {
        self.log(Severity::Debug, message);
    }

    #[track_caller]
    #[inline]
    pub fn debugf(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Debug, args);
    }

    #[track_caller]
    #[inline]
    pub fn info<M: IntoMessage>(&self, message: M) {
        self.log(Severity::Info, message);
    }

    #[track_caller]
    #[inline]
    pub fn infof(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Info, args);
    }

    #[track_caller]
    #[inline]
    pub fn warning<M: IntoMessage>(&self, message: M) {
        self.log(Severity::Warning, message);
    }

    #[track_caller]
    #[inline]
    pub fn warningf(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Warning, args);
    }

    #[track_caller]
    #[inline]
    pub fn error<M: IntoMessage>(&self, message: M) {
        self.log(Severity::Error, message);
    }

    #[track_caller]
    #[inline]
    pub fn errorf(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Error, args);
    }

    /// Write a fatal record with a stack trace, flush, and exit the process.
    ///
    /// Fatal records ignore the severity threshold.
    #[track_caller]
    pub fn fatal<M: IntoMessage>(&self, message: M) -> ! {
        self.terminate(message.into_message(), Caller::here())
    }

    #[track_caller]
    pub fn fatalf(&self, args: fmt::Arguments<'_>) -> ! {
        self.terminate(args.into_message(), Caller::here())
    }

    fn terminate(&self, message: String, caller: Caller) -> ! {
        let stacktrace = Backtrace::force_capture().to_string();
        self.emit(Severity::Fatal, message, caller, Some(stacktrace));
        self.sync();
        std::process::exit(FATAL_EXIT_CODE)
    }

    fn emit(&self, level: Severity, message: String, caller: Caller, stacktrace: Option<String>) {
        let mut entry = LogEntry::new(level, message)
            .with_logger(self.name.as_deref())
            .with_caller(caller);
        entry.stacktrace = stacktrace;

        let mut record = Vec::with_capacity(128 + entry.message.len());
        let written = self
            .encoder
            .encode(&entry, &mut record)
            .and_then(|()| self.sink.write_record(&record));

        match written {
            Ok(()) => {
                self.metrics.record_logged();
            }
            Err(e) => self.report_failure(e),
        }
    }

    fn report_failure(&self, error: LoggerError) {
        let dropped = self.metrics.record_dropped() + 1;
        if dropped == 1 || dropped % FAILURE_REPORT_INTERVAL == 0 {
            eprintln!(
                "[LOGGER ERROR] Failed to write log record ({} failed so far): {}",
                dropped, error
            );
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &self.level())
            .field("format", &self.format())
            .field("sink", &self.sink.name())
            .finish()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// Options are only recorded by the chain; the encoder and sink are assembled
/// in [`LoggerBuilder::build`], so independent options may be given in any
/// order.
///
/// `build` consumes the builder. Clone it first to build several loggers from
/// one configuration; every clone builds an independent logger.
///
/// ```compile_fail
/// use rust_log_facade::{LoggerBuilder, Severity};
///
/// let builder = LoggerBuilder::new();
/// let first = builder.build();
/// let second = builder.level(Severity::Info).build(); // builder was moved
/// ```
///
/// # Example
/// ```
/// use rust_log_facade::prelude::*;
///
/// let logger = Logger::builder()
///     .level(Severity::Warning)
///     .format("json")
///     .name("billing")
///     .build();
///
/// logger.info("filtered out");
/// logger.warning(["disk", "almost", "full"]);
/// ```
#[derive(Clone)]
pub struct LoggerBuilder {
    level: Severity,
    rotation: Option<RotationPolicy>,
    format: Format,
    name: Option<String>,
    console: Option<SharedWriter>,
    sinks: Vec<Arc<dyn Sink>>,
    timestamp_format: TimestampFormat,
    colored: bool,
}

impl LoggerBuilder {
    /// Debug threshold, text format, console output only
    pub fn new() -> Self {
        Self {
            level: Severity::Debug,
            rotation: None,
            format: Format::Text,
            name: None,
            console: None,
            sinks: Vec::new(),
            timestamp_format: TimestampFormat::default(),
            colored: false,
        }
    }

    /// Set minimum severity
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: Severity) -> Self {
        self.level = level;
        self
    }

    /// Also write to the default rotating file.
    ///
    /// Replaces any policy set earlier with [`LoggerBuilder::rotate_with`].
    #[must_use = "builder methods return a new value"]
    pub fn rotate(mut self) -> Self {
        self.rotation = Some(RotationPolicy::default());
        self
    }

    /// Also write to a rotating file governed by `policy`
    #[must_use = "builder methods return a new value"]
    pub fn rotate_with(mut self, policy: RotationPolicy) -> Self {
        self.rotation = Some(policy);
        self
    }

    /// Set the record format; unknown tags select text
    #[must_use = "builder methods return a new value"]
    pub fn format(mut self, format: impl Into<Format>) -> Self {
        self.format = format.into();
        self
    }

    /// Name reported in the `logger` field of every record
    #[must_use = "builder methods return a new value"]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Send console output to `writer` instead of stdout
    #[must_use = "builder methods return a new value"]
    pub fn console_writer<W: Write + Send + 'static>(mut self, writer: W) -> Self {
        self.console = Some(shared_writer(writer));
        self
    }

    /// Add another destination next to the console (and rotating file)
    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.sinks.push(Arc::new(sink));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Colour the level token of text records
    #[must_use = "builder methods return a new value"]
    pub fn colored(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    /// Build the Logger. Never fails: an unusable rotation path falls back to
    /// the default path, and I/O problems only show up (and are swallowed)
    /// when records are written.
    pub fn build(self) -> Logger {
        let encoder = select_encoder(
            self.format,
            EncoderOptions {
                timestamp_format: self.timestamp_format,
                colored: self.colored,
            },
        );

        let console = match self.console {
            Some(writer) => ConsoleSink::with_shared(writer),
            None => ConsoleSink::new(),
        };
        let mut branches: Vec<Arc<dyn Sink>> = vec![Arc::new(console)];
        if let Some(policy) = self.rotation {
            branches.push(Arc::new(RotatingFileSink::new(usable_policy(policy))));
        }
        branches.extend(self.sinks);

        let sink: Arc<dyn Sink> = if branches.len() == 1 {
            branches.remove(0)
        } else {
            Arc::new(FanoutSink::new(branches))
        };

        Logger {
            gate: Arc::new(LevelGate::new(self.level)),
            encoder,
            sink,
            name: self.name,
            metrics: LoggerMetrics::new(),
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn usable_policy(policy: RotationPolicy) -> RotationPolicy {
    if policy.has_usable_path() {
        return policy;
    }
    let fallback = RotationPolicy::default_path();
    eprintln!(
        "[LOGGER WARNING] Unusable log file path '{}', falling back to '{}'",
        policy.path.display(),
        fallback.display()
    );
    policy.with_path(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Result;
    use parking_lot::Mutex;
    use std::io;
    use tempfile::tempdir;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Capture {
        fn lines(&self) -> Vec<String> {
            String::from_utf8(self.0.lock().clone())
                .unwrap()
                .lines()
                .map(str::to_string)
                .collect()
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

    struct BrokenSink;

    impl Sink for BrokenSink {
        fn write_record(&self, _record: &[u8]) -> Result<()> {
            Err(LoggerError::writer("broken"))
        }

        fn flush(&self) -> Result<()> {
            Err(LoggerError::writer("broken"))
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    fn captured(builder: LoggerBuilder) -> (Logger, Capture) {
        let capture = Capture::default();
        (builder.console_writer(capture.clone()).build(), capture)
    }

    #[test]
    fn test_builder_defaults() {
        let logger = LoggerBuilder::default().build();
        assert_eq!(logger.level(), Severity::Debug);
        assert_eq!(logger.format(), Format::Text);
        assert_eq!(logger.name(), None);
        assert_eq!(logger.metrics().total_logged(), 0);
    }

    #[test]
    fn test_threshold_filters_before_encoding() {
        let (logger, capture) = captured(Logger::builder().level(Severity::Warning));

        logger.debug("hidden");
        logger.info("hidden");
        logger.warning("shown");
        logger.error("shown");

        assert_eq!(capture.lines().len(), 2);
        assert_eq!(logger.metrics().filtered_count(), 2);
        assert_eq!(logger.metrics().total_logged(), 2);
    }

    #[test]
    fn test_set_level_applies_immediately() {
        let (logger, capture) = captured(Logger::builder().level(Severity::Error));

        logger.info("before");
        logger.set_level(Severity::Info);
        logger.info("after");

        let lines = capture.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("\tafter"));
    }

    #[test]
    fn test_gate_handle_controls_logger() {
        let (logger, capture) = captured(Logger::builder().level(Severity::Error));
        let gate = logger.gate();

        gate.set(Severity::Debug);
        logger.debug("through the handle");

        assert_eq!(logger.level(), Severity::Debug);
        assert_eq!(capture.lines().len(), 1);
    }

    #[test]
    fn test_message_parts_and_format_args() {
        let (logger, capture) = captured(Logger::builder());

        logger.info(["user", "42", "logged in"]);
        logger.infof(format_args!("{} items in {}ms", 3, 12));

        let lines = capture.lines();
        assert!(lines[0].ends_with("\tuser 42 logged in"));
        assert!(lines[1].ends_with("\t3 items in 12ms"));
    }

    #[test]
    fn test_caller_is_the_call_site() {
        let (logger, capture) = captured(Logger::builder().format(Format::Structured));

        let line = line!() + 1;
        logger.error("where am I");

        let record: serde_json::Value = serde_json::from_str(&capture.lines()[0]).unwrap();
        assert_eq!(record["caller"], format!("core/logger.rs:{}", line));
    }

    #[test]
    fn test_name_in_records() {
        let (logger, capture) = captured(
            Logger::builder().name("billing").format(Format::Structured),
        );
        logger.info("invoice sent");

        let record: serde_json::Value = serde_json::from_str(&capture.lines()[0]).unwrap();
        assert_eq!(record["logger"], "billing");
        assert_eq!(logger.name(), Some("billing"));
    }

    #[test]
    fn test_unknown_format_tag_falls_back_to_text() {
        let logger = Logger::builder().format("yaml").build();
        assert_eq!(logger.format(), Format::Text);
    }

    #[test]
    fn test_sink_failures_are_counted_not_raised() {
        let logger = Logger::builder()
            .console_writer(io::sink())
            .sink(BrokenSink)
            .build();

        logger.info("first");
        logger.info("second");
        logger.sync();

        assert_eq!(logger.metrics().dropped_count(), 2);
        assert_eq!(logger.metrics().total_logged(), 0);
    }

    #[test]
    fn test_rotate_resets_custom_policy() {
        let dir = tempdir().unwrap();
        let custom = RotationPolicy::custom(dir.path().join("custom.log"), 1, 1);

        let builder = LoggerBuilder::new().rotate_with(custom.clone());
        assert_eq!(builder.rotation.as_ref(), Some(&custom));

        let builder = builder.rotate();
        assert_eq!(builder.rotation, Some(RotationPolicy::default()));
    }

    #[test]
    fn test_unusable_rotation_path_falls_back_to_default() {
        let dir = tempdir().unwrap();
        let policy = usable_policy(RotationPolicy::new(dir.path()).with_max_backups(9));

        assert_eq!(policy.path, RotationPolicy::default_path());
        assert_eq!(policy.max_backups, 9);
    }

    #[test]
    fn test_rotating_logger_writes_file_and_console() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("app.log");
        let (logger, capture) = captured(
            Logger::builder().rotate_with(RotationPolicy::new(&log_path)),
        );

        logger.warning("to both");
        logger.sync();

        assert_eq!(capture.lines().len(), 1);
        let content = std::fs::read_to_string(&log_path).unwrap();
        assert!(content.contains("\twarning\t"));
        assert!(content.ends_with("\tto both\n"));
    }

    #[test]
    fn test_cloned_builders_build_independent_loggers() {
        let capture = Capture::default();
        let builder = Logger::builder()
            .level(Severity::Info)
            .console_writer(capture.clone());

        let first = builder.clone().build();
        let second = builder.build();
        second.set_level(Severity::Error);

        first.info("from first");
        second.info("from second");

        assert_eq!(first.level(), Severity::Info);
        assert_eq!(capture.lines().len(), 1);
    }

    #[test]
    fn test_debug_output() {
        let logger = Logger::builder().name("dbg").build();
        let rendered = format!("{:?}", logger);
        assert!(rendered.contains("dbg"));
        assert!(rendered.contains("Debug"));
        assert!(rendered.contains("console"));
    }
}
