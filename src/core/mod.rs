//! Core logger types and traits

pub mod annotation;
pub mod annotator;
pub mod arg;
pub mod backend;
pub mod config;
pub mod error;
pub mod formatter;
pub mod global;
pub mod level;
pub mod logger;
pub mod module_level;
pub mod record;
pub mod sequence;

pub use annotation::{format_annotations, Annotation, FieldValue};
pub use annotator::{Annotater, AnnotaterChain, Annotator, DynamicExtras};
pub use arg::{redact, render_template, Arg, Redactor, Secret};
pub use backend::{Backend, Leveled, LeveledBackend};
pub use config::{LevelConfig, LevelDirective};
pub use error::{LoggerError, Result};
pub use formatter::{Formatter, OutputFormat, TextFormatter, TimestampFormat};
pub use level::Level;
pub use logger::{Clock, Logger, LoggerBuilder, LOG_CALLDEPTH};
pub use module_level::{add_module_level, ModuleLeveled, DEFAULT_LEVEL};
pub use record::Record;
pub use sequence::SequenceGenerator;
