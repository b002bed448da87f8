//! Sink implementations

pub mod console;
pub mod fanout;
pub mod rotating_file;

pub use console::{shared_writer, ConsoleSink, SharedWriter};
pub use fanout::FanoutSink;
pub use rotating_file::{
    Backup, RotatingFileSink, RotationPolicy, DEFAULT_MAX_AGE, DEFAULT_MAX_BACKUPS,
    DEFAULT_MAX_SIZE, LOG_PATH_ENV, MEGABYTE,
};
