//! Core logger types and traits

pub mod encoder;
pub mod error;
pub mod level_gate;
pub mod log_entry;
pub mod logger;
pub mod message;
pub mod metrics;
pub mod severity;
pub mod sink;
pub mod timestamp;

pub use encoder::{select_encoder, Encoder, EncoderOptions, Format, JsonEncoder, TextEncoder};
pub use error::{LoggerError, Result};
pub use level_gate::LevelGate;
pub use log_entry::{Caller, LogEntry};
pub use logger::{Logger, LoggerBuilder, FATAL_EXIT_CODE};
pub use message::IntoMessage;
pub use metrics::LoggerMetrics;
pub use severity::Severity;
pub use sink::Sink;
pub use timestamp::TimestampFormat;
