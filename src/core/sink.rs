//! Sink trait for encoded record destinations

use super::error::Result;

/// Destination for encoded records.
///
/// Implementations serialize concurrent writers themselves; `write_record`
/// receives one complete record and must write it without interleaving.
pub trait Sink: Send + Sync {
    fn write_record(&self, record: &[u8]) -> Result<()>;
    fn flush(&self) -> Result<()>;
    fn name(&self) -> &str;
}
