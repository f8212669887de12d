//! Log record structure

use super::annotation::Annotation;
use super::arg::{render_template, Arg};
use super::error::Result;
use super::formatter::Formatter;
use super::level::Level;
use chrono::{DateTime, Utc};
use std::fmt;
use std::panic::Location;
use std::sync::{Arc, OnceLock};

/// A single log event travelling through the backend chain.
///
/// Annotators may append to `annotations` while the record is in flight.
/// The message and the formatted line are each rendered at most once and
/// then reused, so arguments that change after the first render do not
/// affect the output.
#[derive(Clone)]
pub struct Record {
    pub id: u64,
    pub time: DateTime<Utc>,
    pub module: String,
    pub level: Level,
    pub annotations: Vec<Annotation>,
    location: Option<&'static Location<'static>>,
    template: String,
    args: Vec<Arg>,
    message: OnceLock<String>,
    formatter: OnceLock<Arc<dyn Formatter>>,
    formatted: OnceLock<String>,
}

impl Record {
    pub fn new(
        id: u64,
        time: DateTime<Utc>,
        module: impl Into<String>,
        level: Level,
        template: impl Into<String>,
        args: Vec<Arg>,
    ) -> Self {
        Self {
            id,
            time,
            module: module.into(),
            level,
            annotations: Vec::new(),
            location: None,
            template: template.into(),
            args,
            message: OnceLock::new(),
            formatter: OnceLock::new(),
            formatted: OnceLock::new(),
        }
    }

    pub fn with_location(mut self, location: &'static Location<'static>) -> Self {
        self.location = Some(location);
        self
    }

    /// Source location of the logging call, when known.
    pub fn location(&self) -> Option<&'static Location<'static>> {
        self.location
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    pub fn annotate(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }

    /// The rendered message, with redactable arguments redacted.
    ///
    /// Newlines, carriage returns and tabs are escaped so one record
    /// always renders to one line.
    pub fn message(&self) -> &str {
        self.message
            .get_or_init(|| sanitize_message(&render_template(&self.template, &self.args)))
    }

    /// Attach the formatter used by [`Record::formatted`].
    ///
    /// Only the first attachment sticks; returns `false` if a formatter
    /// was already present.
    pub fn attach_formatter(&self, formatter: Arc<dyn Formatter>) -> bool {
        self.formatter.set(formatter).is_ok()
    }

    pub fn formatter(&self) -> Option<&Arc<dyn Formatter>> {
        self.formatter.get()
    }

    /// The record rendered by its attached formatter, or by the process
    /// default formatter when none was attached.
    pub fn formatted(&self, calldepth: usize) -> Result<&str> {
        if let Some(line) = self.formatted.get() {
            return Ok(line);
        }
        let line = match self.formatter.get() {
            Some(formatter) => formatter.format(calldepth + 1, self)?,
            None => crate::core::global::formatter().format(calldepth + 1, self)?,
        };
        Ok(self.formatted.get_or_init(|| line))
    }
}

fn sanitize_message(message: &str) -> String {
    message
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("id", &self.id)
            .field("time", &self.time)
            .field("module", &self.module)
            .field("level", &self.level)
            .field("annotations", &self.annotations)
            .field("message", &self.message())
            .finish()
    }
}
