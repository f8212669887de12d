//! # modlog
//!
//! Structured logging with per-module level filtering.
//!
//! ## Features
//!
//! - **Module Levels**: exact names and glob patterns, last pattern wins
//! - **Annotations**: key/value context added by backend decorators or
//!   stacked on loggers
//! - **Redaction**: sensitive arguments render masked
//! - **Pluggable Output**: text, JSON and logfmt formatting; writer, memory
//!   and fan-out backends
//!
//! ## Example
//!
//! ```
//! use modlog::prelude::*;
//! use modlog::{args, warning};
//!
//! let memory = MemoryBackend::new(16);
//! let filter = ModuleLeveled::new(memory.clone());
//! filter.set_level(Level::Warning, "db.*");
//!
//! let logger = Logger::builder()
//!     .module("db.pool")
//!     .leveled_backend(std::sync::Arc::new(filter))
//!     .build();
//!
//! logger.info("ignored", args![]);
//! warning!(logger, "pool exhausted, password {}", Secret::new("hunter2"));
//!
//! assert_eq!(memory.messages(), vec!["pool exhausted, password *******"]);
//! ```

pub mod backends;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::backends::{MemoryBackend, MultiBackend, WriterBackend};
    pub use crate::core::{
        add_module_level, global, Annotater, Annotation, Annotator, Arg, Backend, FieldValue,
        Formatter, Level, LevelConfig, Leveled, LeveledBackend, Logger, LoggerBuilder,
        LoggerError, ModuleLeveled, OutputFormat, Record, Result, Secret, SequenceGenerator,
        TextFormatter, TimestampFormat,
    };
}

pub use backends::{MemoryBackend, MultiBackend, WriterBackend};
pub use core::global::{
    default_backend, init_for_testing, reset, set_backend, set_backends, set_formatter,
};
pub use core::{
    add_module_level, Annotater, AnnotaterChain, Annotation, Annotator, Arg, Backend, FieldValue,
    Formatter, Level, LevelConfig, LevelDirective, Leveled, LeveledBackend, Logger,
    LoggerBuilder, LoggerError, ModuleLeveled, OutputFormat, Record, Redactor, Result, Secret,
    SequenceGenerator, TextFormatter, TimestampFormat,
};
