//! Console sink implementation

use crate::core::{LoggerError, Result, Sink};
use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;

/// A writer that several sinks (or several loggers) may share
pub type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// Wrap a writer so it can be shared between console sinks
pub fn shared_writer<W: Write + Send + 'static>(writer: W) -> SharedWriter {
    Arc::new(Mutex::new(Box::new(writer)))
}

/// Writes records to standard output or to a caller supplied writer.
///
/// Every record goes out in a single `write_all` under the sink's lock, so
/// lines from concurrent callers never interleave.
pub struct ConsoleSink {
    writer: SharedWriter,
    name: &'static str,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            writer: shared_writer(io::stdout()),
            name: "console",
        }
    }

    /// Console sink writing into `writer` instead of stdout
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self::with_shared(shared_writer(writer))
    }

    pub fn with_shared(writer: SharedWriter) -> Self {
        Self {
            writer,
            name: "console",
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for ConsoleSink {
    fn write_record(&self, record: &[u8]) -> Result<()> {
        let mut writer = self.writer.lock();
        writer
            .write_all(record)
            .map_err(|e| LoggerError::io_operation("writing to console", "write failed", e))
    }

    fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        self.name
    }
}
