//! Record encoders
//!
//! Both encoders share one field schema:
//! `timestamp, level, logger, caller, msg, stacktrace`.
//! - Text: `2025-01-08T10:30:45.123Z\tinfo\tcore/server.rs:42\tRequest processed`
//! - Structured: `{"timestamp":"2025-01-08T10:30:45.123Z","level":"info","logger":null,"caller":"core/server.rs:42","msg":"Request processed","stacktrace":null}`

use super::error::Result;
use super::log_entry::LogEntry;
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const TIMESTAMP_KEY: &str = "timestamp";
pub const LEVEL_KEY: &str = "level";
pub const LOGGER_KEY: &str = "logger";
pub const CALLER_KEY: &str = "caller";
pub const MESSAGE_KEY: &str = "msg";
pub const STACKTRACE_KEY: &str = "stacktrace";

/// Output shape of a record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// One JSON object per line
    Structured,
    /// Human-readable tab separated line (default)
    #[default]
    Text,
}

impl Format {
    /// Map a format tag to a format. Unrecognized tags fall back to `Text`.
    ///
    /// ```
    /// use rust_log_facade::Format;
    ///
    /// assert_eq!(Format::from_tag("json"), Format::Structured);
    /// assert_eq!(Format::from_tag("console"), Format::Text);
    /// assert_eq!(Format::from_tag("yaml"), Format::Text);
    /// ```
    pub fn from_tag(tag: &str) -> Self {
        tag.parse().unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Structured => "json",
            Format::Text => "console",
        }
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" | "structured" => Ok(Format::Structured),
            "console" | "text" => Ok(Format::Text),
            _ => Err(format!("Unknown log format: '{}'", s)),
        }
    }
}

impl From<&str> for Format {
    fn from(tag: &str) -> Self {
        Format::from_tag(tag)
    }
}

impl From<String> for Format {
    fn from(tag: String) -> Self {
        Format::from_tag(&tag)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings shared by both encoders
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncoderOptions {
    pub timestamp_format: TimestampFormat,
    /// Colour the level token (text only)
    pub colored: bool,
}

/// Turns a record into bytes appended to `buf`, newline terminated.
pub trait Encoder: Send + Sync {
    fn encode(&self, entry: &LogEntry, buf: &mut Vec<u8>) -> Result<()>;
    fn format(&self) -> Format;
}

/// Pick the encoder for `format`.
pub fn select_encoder(format: Format, options: EncoderOptions) -> Box<dyn Encoder> {
    match format {
        Format::Structured => Box::new(JsonEncoder::new(options)),
        Format::Text => Box::new(TextEncoder::new(options)),
    }
}

/// Escape line breaks and tabs so a message can never start a fake record
fn sanitize_message(message: &str) -> String {
    message
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

#[derive(Debug, Clone, Default)]
pub struct TextEncoder {
    options: EncoderOptions,
}

impl TextEncoder {
    pub fn new(options: EncoderOptions) -> Self {
        Self { options }
    }

    fn level_token(&self, entry: &LogEntry) -> String {
        let token = entry.level.to_str();
        #[cfg(feature = "console")]
        {
            if self.options.colored {
                use colored::Colorize;
                return token.color(entry.level.color_code()).to_string();
            }
        }
        token.to_string()
    }
}

impl Encoder for TextEncoder {
    fn encode(&self, entry: &LogEntry, buf: &mut Vec<u8>) -> Result<()> {
        let mut line = self.options.timestamp_format.format(&entry.timestamp);
        line.push('\t');
        line.push_str(&self.level_token(entry));

        if let Some(ref name) = entry.logger {
            line.push('\t');
            line.push_str(&sanitize_message(name));
        }
        if let Some(caller) = entry.caller {
            line.push('\t');
            line.push_str(&caller.to_string());
        }

        line.push('\t');
        line.push_str(&sanitize_message(&entry.message));
        line.push('\n');

        if let Some(ref stacktrace) = entry.stacktrace {
            line.push_str(stacktrace.trim_end());
            line.push('\n');
        }

        buf.extend_from_slice(line.as_bytes());
        Ok(())
    }

    fn format(&self) -> Format {
        Format::Text
    }
}

#[derive(Serialize)]
struct JsonRecord<'a> {
    timestamp: serde_json::Value,
    level: &'static str,
    logger: Option<&'a str>,
    caller: Option<String>,
    msg: &'a str,
    stacktrace: Option<&'a str>,
}

#[derive(Debug, Clone, Default)]
pub struct JsonEncoder {
    options: EncoderOptions,
}

impl JsonEncoder {
    pub fn new(options: EncoderOptions) -> Self {
        Self { options }
    }

    fn timestamp_value(&self, entry: &LogEntry) -> serde_json::Value {
        match self.options.timestamp_format {
            TimestampFormat::UnixMillis => {
                serde_json::Value::Number(entry.timestamp.timestamp_millis().into())
            }
            other => serde_json::Value::String(other.format(&entry.timestamp)),
        }
    }
}

impl Encoder for JsonEncoder {
    fn encode(&self, entry: &LogEntry, buf: &mut Vec<u8>) -> Result<()> {
        let record = JsonRecord {
            timestamp: self.timestamp_value(entry),
            level: entry.level.to_str(),
            logger: entry.logger.as_deref(),
            caller: entry.caller.map(|caller| caller.to_string()),
            msg: &entry.message,
            stacktrace: entry.stacktrace.as_deref(),
        };

        serde_json::to_writer(&mut *buf, &record)?;
        buf.push(b'\n');
        Ok(())
    }

    fn format(&self) -> Format {
        Format::Structured
    }
}
