//! Record formatting
//!
//! Provides the [`Formatter`] contract and the built-in [`TextFormatter`],
//! which renders records in one of several output formats:
//! - Text: Human-readable format (default)
//! - Json: Machine-readable JSON format
//! - Logfmt: Key-value format compatible with log aggregation tools

use super::annotation::{format_annotations, FieldValue};
use super::error::{LoggerError, Result};
use super::record::Record;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Renders a record into a single output line.
///
/// `calldepth` counts the frames between the original logging call and
/// this formatter; formatters that report call sites can use it.
pub trait Formatter: Send + Sync {
    fn format(&self, calldepth: usize, record: &Record) -> Result<String>;
}

impl<F> Formatter for F
where
    F: Fn(usize, &Record) -> Result<String> + Send + Sync,
{
    fn format(&self, calldepth: usize, record: &Record) -> Result<String> {
        self(calldepth, record)
    }
}

/// Timestamp layout used by [`TextFormatter`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// ISO 8601 with milliseconds: `2025-01-08T10:30:45.123Z`
    #[default]
    Iso8601,

    /// RFC 3339 format: `2025-01-08T10:30:45+00:00`
    Rfc3339,

    /// Unix timestamp in seconds: `1736332245`
    Unix,

    /// Unix timestamp in milliseconds: `1736332245123`
    UnixMillis,

    /// Custom strftime format, e.g. `"%d/%b/%Y:%H:%M:%S %z"`
    Custom(String),
}

impl TimestampFormat {
    /// Render `datetime`. Fails only for a `Custom` layout chrono cannot parse.
    pub fn format(&self, datetime: &DateTime<Utc>) -> Result<String> {
        Ok(match self {
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339(),
            TimestampFormat::Unix => datetime.timestamp().to_string(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::Custom(format_str) => {
                // chrono reports a bad specifier through fmt::Error
                let mut out = String::new();
                write!(out, "{}", datetime.format(format_str)).map_err(|_| {
                    LoggerError::formatter(
                        "timestamp",
                        format!("invalid strftime layout {:?}", format_str),
                    )
                })?;
                out
            }
        })
    }

    fn to_json_value(&self, datetime: &DateTime<Utc>) -> Result<serde_json::Value> {
        Ok(match self {
            TimestampFormat::Unix => datetime.timestamp().into(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().into(),
            _ => serde_json::Value::String(self.format(datetime)?),
        })
    }
}

/// Output layout for [`TextFormatter`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Example: `[2025-01-08T10:30:45.123Z] [INFO    ] net.http - Request processed req=7`
    #[default]
    Text,

    /// Example: `{"timestamp":"2025-01-08T10:30:45.123Z","level":"INFO","module":"net.http",...}`
    Json,

    /// Example: `timestamp=2025-01-08T10:30:45.123Z level=INFO module=net.http message="..."`
    Logfmt,
}

/// The default formatter.
#[derive(Debug, Clone, Default)]
pub struct TextFormatter {
    output_format: OutputFormat,
    timestamp_format: TimestampFormat,
}

impl TextFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    fn format_text(&self, record: &Record) -> Result<String> {
        let mut line = format!(
            "[{}] [{:8}] {} - {}",
            self.timestamp_format.format(&record.time)?,
            record.level,
            record.module,
            record.message()
        );
        if !record.annotations.is_empty() {
            line.push(' ');
            line.push_str(&format_annotations(&record.annotations));
        }
        Ok(line)
    }

    fn format_json(&self, record: &Record) -> Result<String> {
        let mut json_obj = serde_json::Map::new();
        json_obj.insert(
            "timestamp".to_string(),
            self.timestamp_format.to_json_value(&record.time)?,
        );
        json_obj.insert("id".to_string(), record.id.into());
        json_obj.insert("level".to_string(), record.level.to_str().into());
        json_obj.insert("module".to_string(), record.module.clone().into());
        json_obj.insert("message".to_string(), record.message().into());

        if let Some(location) = record.location() {
            json_obj.insert("file".to_string(), location.file().into());
            json_obj.insert("line".to_string(), location.line().into());
        }

        // an array keeps annotation order and repeated keys
        if !record.annotations.is_empty() {
            let annotations = record
                .annotations
                .iter()
                .map(|annotation| {
                    serde_json::json!({
                        "key": annotation.key,
                        "value": annotation.value.to_json_value(),
                    })
                })
                .collect();
            json_obj.insert(
                "annotations".to_string(),
                serde_json::Value::Array(annotations),
            );
        }

        Ok(serde_json::to_string(&json_obj)?)
    }

    fn format_logfmt(&self, record: &Record) -> Result<String> {
        let mut parts = vec![
            format!(
                "timestamp={}",
                escape_logfmt_value(&self.timestamp_format.format(&record.time)?)
            ),
            format!("level={}", record.level.to_str()),
            format!("module={}", escape_logfmt_value(&record.module)),
            // always quoted
            format!("message={}", quote_logfmt_value(record.message())),
        ];

        if let Some(location) = record.location() {
            parts.push(format!("file={}", escape_logfmt_value(location.file())));
            parts.push(format!("line={}", location.line()));
        }

        for annotation in &record.annotations {
            let value = match &annotation.value {
                FieldValue::String(s) => quote_logfmt_value(s),
                other => other.to_string(),
            };
            parts.push(format!("{}={}", escape_logfmt_key(&annotation.key), value));
        }

        Ok(parts.join(" "))
    }
}

impl Formatter for TextFormatter {
    fn format(&self, _calldepth: usize, record: &Record) -> Result<String> {
        match self.output_format {
            OutputFormat::Text => self.format_text(record),
            OutputFormat::Json => self.format_json(record),
            OutputFormat::Logfmt => self.format_logfmt(record),
        }
    }
}

fn escape_logfmt_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || *c == '.')
        .collect()
}

fn escape_logfmt_value(value: &str) -> String {
    if value.contains(' ') || value.contains('"') || value.contains('=') {
        quote_logfmt_value(value)
    } else {
        value.to_string()
    }
}

fn quote_logfmt_value(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
