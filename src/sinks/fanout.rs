//! Fan-out sink: one record, several destinations

use crate::core::{LoggerError, Result, Sink};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Writes every record to all of its branches.
///
/// A branch that fails or panics is isolated: the remaining branches still
/// receive the record, and the failure comes back as
/// [`LoggerError::PartialWrite`] for the logger to count.
pub struct FanoutSink {
    sinks: Vec<Arc<dyn Sink>>,
}

impl FanoutSink {
    pub fn new(sinks: Vec<Arc<dyn Sink>>) -> Self {
        Self { sinks }
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    fn for_each_branch(&self, op: impl Fn(&dyn Sink) -> Result<()>) -> Result<()> {
        let mut failed = Vec::new();

        for sink in &self.sinks {
            match panic::catch_unwind(AssertUnwindSafe(|| op(sink.as_ref()))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => failed.push(format!("{}: {}", sink.name(), e)),
                Err(panic_info) => {
                    let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                        s.to_string()
                    } else if let Some(s) = panic_info.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "Unknown panic".to_string()
                    };
                    failed.push(format!("{}: panicked: {}", sink.name(), panic_msg));
                }
            }
        }

        if failed.is_empty() {
            Ok(())
        } else {
            Err(LoggerError::partial_write(failed, self.sinks.len()))
        }
    }
}

impl Sink for FanoutSink {
    fn write_record(&self, record: &[u8]) -> Result<()> {
        self.for_each_branch(|sink| sink.write_record(record))
    }

    fn flush(&self) -> Result<()> {
        self.for_each_branch(|sink| sink.flush())
    }

    fn name(&self) -> &str {
        "fanout"
    }
}
