//! Log record structure

use super::severity::Severity;
use chrono::{DateTime, Utc};
use std::fmt;
use std::panic::Location;

/// Source location of a log call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub file: &'static str,
    pub line: u32,
}

impl Caller {
    pub fn new(file: &'static str, line: u32) -> Self {
        Self { file, line }
    }

    /// Location of the `#[track_caller]` chain's outermost caller
    #[track_caller]
    pub fn here() -> Self {
        Self::from(Location::caller())
    }

    /// Trailing `dir/file` of the source path, without the crate-relative prefix
    pub fn short_file(&self) -> &'static str {
        let file = self.file;
        let mut separators = file.rmatch_indices(|c: char| c == '/' || c == '\\').map(|(idx, _)| idx);
        let _last = separators.next();
        match separators.next() {
            Some(idx) => &file[idx + 1..],
            None => file,
        }
    }
}

impl From<&'static Location<'static>> for Caller {
    fn from(location: &'static Location<'static>) -> Self {
        Self::new(location.file(), location.line())
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.short_file(), self.line)
    }
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: Severity,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub logger: Option<String>,
    pub caller: Option<Caller>,
    pub stacktrace: Option<String>,
}

impl LogEntry {
    pub fn new(level: Severity, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Utc::now(),
            logger: None,
            caller: None,
            stacktrace: None,
        }
    }

    pub fn with_caller(mut self, caller: Caller) -> Self {
        self.caller = Some(caller);
        self
    }

    pub fn with_logger(mut self, name: Option<&str>) -> Self {
        self.logger = name.map(str::to_string);
        self
    }

    pub fn with_stacktrace(mut self, stacktrace: impl Into<String>) -> Self {
        self.stacktrace = Some(stacktrace.into());
        self
    }
}
