//! # Rust Log Facade
//!
//! A small leveled logging facade: build a [`Logger`] once, then log from any
//! thread through plain method calls, macros, or the process-wide default.
//!
//! ## Features
//!
//! - **Five severities**: debug, info, warning, error and fatal, with a
//!   threshold that can be moved at runtime
//! - **Two formats**: tab separated text for humans, one JSON object per line
//!   for machines
//! - **Rotating files**: size bounded files with age and count based pruning
//!   and optional gzip compression
//! - **Default logger**: free functions backed by a replaceable global instance
//!
//! ## Example
//!
//! ```
//! use rust_log_facade::prelude::*;
//!
//! let logger = Logger::builder()
//!     .level(Severity::Info)
//!     .format(Format::Structured)
//!     .build();
//!
//! logger.info("service started");
//! rust_log_facade::warning!(logger, "{} requests queued", 12);
//! ```

pub mod core;
pub mod global;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        Caller, Format, IntoMessage, LevelGate, LogEntry, Logger, LoggerBuilder, LoggerError,
        LoggerMetrics, Result, Severity, Sink, TimestampFormat,
    };
    pub use crate::global::{logger, set_logger};
    pub use crate::sinks::{ConsoleSink, FanoutSink, RotatingFileSink, RotationPolicy};
}

pub use crate::core::{
    select_encoder, Caller, Encoder, EncoderOptions, Format, IntoMessage, JsonEncoder, LevelGate,
    LogEntry, Logger, LoggerBuilder, LoggerError, LoggerMetrics, Result, Severity, Sink,
    TextEncoder, TimestampFormat, FATAL_EXIT_CODE,
};
pub use crate::global::{
    debug, debugf, error, errorf, fatal, fatalf, info, infof, logger, set_logger, warning,
    warningf,
};
pub use crate::sinks::{ConsoleSink, FanoutSink, RotatingFileSink, RotationPolicy};
