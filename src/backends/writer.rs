//! Writer backend

use crate::core::{Backend, Level, LoggerError, Record, Result};
use parking_lot::Mutex;
use std::fmt;
use std::io::{self, Write};

/// Terminal sink writing one formatted line per record.
pub struct WriterBackend {
    writer: Mutex<Box<dyn Write + Send>>,
    use_colors: bool,
}

impl WriterBackend {
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            use_colors: false,
        }
    }

    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    /// Color whole lines by record level. Has no effect unless the crate
    /// is built with the `color` feature.
    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    pub fn flush(&self) -> Result<()> {
        self.writer
            .lock()
            .flush()
            .map_err(|e| LoggerError::io_operation("flushing writer", "flush failed", e))
    }

    #[cfg(feature = "color")]
    fn paint(&self, level: Level, line: &str) -> String {
        use colored::Colorize;
        if self.use_colors {
            line.color(level.color_code()).to_string()
        } else {
            line.to_string()
        }
    }

    #[cfg(not(feature = "color"))]
    fn paint(&self, _level: Level, line: &str) -> String {
        line.to_string()
    }
}

impl Backend for WriterBackend {
    fn log(&self, level: Level, calldepth: usize, record: &mut Record) -> Result<()> {
        let mut line = self.paint(level, record.formatted(calldepth + 1)?);
        line.push('\n');

        self.writer
            .lock()
            .write_all(line.as_bytes())
            .map_err(|e| {
                LoggerError::io_operation(
                    "writing record",
                    format!("record {} from '{}'", record.id, record.module),
                    e,
                )
            })
    }
}

impl fmt::Debug for WriterBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterBackend")
            .field("use_colors", &self.use_colors)
            .finish()
    }
}
