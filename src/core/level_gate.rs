//! Runtime-adjustable minimum severity

use super::severity::Severity;
use std::sync::atomic::{AtomicU8, Ordering};

/// Minimum-severity threshold shared between a logger and whoever controls
/// its verbosity.
///
/// # Example
///
/// ```
/// use rust_log_facade::{LevelGate, Severity};
///
/// let gate = LevelGate::new(Severity::Info);
/// assert!(!gate.enabled(Severity::Debug));
///
/// gate.set(Severity::Debug);
/// assert!(gate.enabled(Severity::Debug));
/// ```
#[derive(Debug)]
pub struct LevelGate {
    threshold: AtomicU8,
}

impl LevelGate {
    pub const fn new(level: Severity) -> Self {
        Self {
            threshold: AtomicU8::new(level as u8),
        }
    }

    #[inline]
    pub fn set(&self, level: Severity) {
        self.threshold.store(level as u8, Ordering::Release);
    }

    #[inline]
    pub fn level(&self) -> Severity {
        Severity::from_u8(self.threshold.load(Ordering::Acquire))
    }

    /// `true` when a record at `level` passes the threshold
    #[inline]
    pub fn enabled(&self, level: Severity) -> bool {
        level as u8 >= self.threshold.load(Ordering::Acquire)
    }
}

impl Default for LevelGate {
    fn default() -> Self {
        Self::new(Severity::Debug)
    }
}
