//! Process-wide default logger
//!
//! The free functions in this module log through a single shared [`Logger`].
//! It is created on first use with the default configuration (debug
//! threshold, text format, console plus the default rotating file) and can be
//! replaced at any time with [`set_logger`].

use crate::core::{IntoMessage, Logger};
use arc_swap::ArcSwapOption;
use once_cell::sync::Lazy;
use std::fmt;
use std::sync::Arc;

static DEFAULT_LOGGER: Lazy<ArcSwapOption<Logger>> = Lazy::new(ArcSwapOption::empty);

/// The current default logger, creating it on first access.
///
/// Concurrent first accesses agree on a single instance.
pub fn logger() -> Arc<Logger> {
    if let Some(current) = DEFAULT_LOGGER.load_full() {
        return current;
    }

    let created = Arc::new(Logger::new());
    let previous = DEFAULT_LOGGER.compare_and_swap(&None::<Arc<Logger>>, Some(Arc::clone(&created)));
    match &*previous {
        Some(winner) => Arc::clone(winner),
        None => created,
    }
}

/// Replace the default logger.
///
/// Calls already running against the previous instance finish on it; every
/// call that starts afterwards sees the new one.
///
/// # Example
/// ```
/// use rust_log_facade::prelude::*;
///
/// set_logger(Logger::builder().level(Severity::Warning).build());
/// assert_eq!(logger().level(), Severity::Warning);
/// ```
pub fn set_logger(logger: impl Into<Arc<Logger>>) {
    DEFAULT_LOGGER.store(Some(logger.into()));
}

#[track_caller]
pub fn debug<M: IntoMessage>(message: M) {
    logger().debug(message);
}

#[track_caller]
pub fn debugf(args: fmt::Arguments<'_>) {
    logger().debugf(args);
}

#[track_caller]
pub fn info<M: IntoMessage>(message: M) {
    logger().info(message);
}

#[track_caller]
pub fn infof(args: fmt::Arguments<'_>) {
    logger().infof(args);
}

#[track_caller]
pub fn warning<M: IntoMessage>(message: M) {
    logger().warning(message);
}

#[track_caller]
pub fn warningf(args: fmt::Arguments<'_>) {
    logger().warningf(args);
}

#[track_caller]
pub fn error<M: IntoMessage>(message: M) {
    logger().error(message);
}

#[track_caller]
pub fn errorf(args: fmt::Arguments<'_>) {
    logger().errorf(args);
}

/// Log a fatal record through the default logger and exit the process
#[track_caller]
pub fn fatal<M: IntoMessage>(message: M) -> ! {
    logger().fatal(message)
}

#[track_caller]
pub fn fatalf(args: fmt::Arguments<'_>) -> ! {
    logger().fatalf(args)
}
