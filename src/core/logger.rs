//! Per-module logger

use super::annotator::{Annotater, AnnotaterChain};
use super::arg::{render_template, Arg};
use super::backend::{Backend, LeveledBackend};
use super::error::Result;
use super::global;
use super::level::Level;
use super::module_level::add_module_level;
use super::record::Record;
use super::sequence::SequenceGenerator;
use chrono::{DateTime, Utc};
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// calldepth handed to the backend chain by the level methods; it brings
/// the stack up to the caller of `info()`, `error()`, etc.
pub const LOG_CALLDEPTH: usize = 2;

/// Source of record timestamps.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Entry point for one module's log records.
///
/// Cloning is cheap; [`Logger::re`] derives loggers with extra context
/// without touching the original.
///
/// # Example
///
/// ```
/// use modlog::prelude::*;
/// use modlog::{args, info};
///
/// let memory = MemoryBackend::new(8);
/// let logger = Logger::builder().module("orders").backend(memory.clone()).build();
///
/// info!(logger, "order {} accepted", 42);
/// logger.warning("stock low for {}", args!["sku-9"]);
///
/// assert_eq!(memory.messages(), vec!["order 42 accepted", "stock low for sku-9"]);
/// ```
#[derive(Clone)]
pub struct Logger {
    module: String,
    output_level: Level,
    backend: Option<Arc<dyn LeveledBackend>>,
    annotater: Option<AnnotaterChain>,
    sequence: Arc<SequenceGenerator>,
    clock: Option<Clock>,
}

impl Logger {
    /// A logger for `module` using the process default backend.
    #[must_use]
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            output_level: Level::Info,
            backend: None,
            annotater: None,
            sequence: SequenceGenerator::global(),
            clock: None,
        }
    }

    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn set_module(&mut self, module: impl Into<String>) {
        self.module = module.into();
    }

    /// Level used by [`Logger::output`] and [`Logger::print`].
    pub fn output_level(&self) -> Level {
        self.output_level
    }

    pub fn set_output_level(&mut self, level: Level) {
        self.output_level = level;
    }

    pub fn set_backend(&mut self, backend: Arc<dyn LeveledBackend>) {
        self.backend = Some(backend);
    }

    /// The configured backend, or the process default one.
    pub fn backend(&self) -> Arc<dyn LeveledBackend> {
        match &self.backend {
            Some(backend) => Arc::clone(backend),
            None => global::default_backend(),
        }
    }

    pub fn annotater(&self) -> Option<&AnnotaterChain> {
        self.annotater.as_ref()
    }

    /// A copy of this logger that also runs `annotater` on every record,
    /// after any annotater already attached.
    #[must_use]
    pub fn re(&self, annotater: Arc<dyn Annotater>) -> Logger {
        let chain = match &self.annotater {
            Some(chain) => chain.then(annotater),
            None => AnnotaterChain::single(annotater),
        };
        Logger {
            annotater: Some(chain),
            ..self.clone()
        }
    }

    pub fn is_enabled_for(&self, level: Level) -> bool {
        self.backend().is_enabled_for(level, &self.module)
    }

    fn now(&self) -> DateTime<Utc> {
        match &self.clock {
            Some(clock) => clock(),
            None => global::now(),
        }
    }

    fn bare_record(
        &self,
        level: Level,
        template: String,
        args: Vec<Arg>,
        location: &'static Location<'static>,
    ) -> Record {
        Record::new(
            self.sequence.next_id(),
            self.now(),
            self.module.clone(),
            level,
            template,
            args,
        )
        .with_location(location)
    }

    fn new_record(
        &self,
        level: Level,
        template: String,
        args: Vec<Arg>,
        location: &'static Location<'static>,
    ) -> Record {
        let mut record = self.bare_record(level, template, args, location);
        if let Some(annotater) = &self.annotater {
            annotater.annotate(&mut record);
        }
        record
    }

    /// Log at `level` and return the backend chain's result.
    #[track_caller]
    pub fn log(&self, level: Level, template: impl Into<String>, args: Vec<Arg>) -> Result<()> {
        let mut record = self.new_record(level, template.into(), args, Location::caller());
        self.backend().log(level, LOG_CALLDEPTH, &mut record)
    }

    /// Like [`Logger::log`], but a failing backend is reported on stderr
    /// instead of returned.
    #[track_caller]
    pub fn emit(&self, level: Level, template: impl Into<String>, args: Vec<Arg>) {
        if let Err(e) = self.log(level, template, args) {
            eprintln!("[LOGGER ERROR] {} record for '{}' failed: {}", level, self.module, e);
        }
    }

    /// Log `message` at the output level. `calldepth` is passed to the
    /// backend chain unchanged.
    #[track_caller]
    pub fn output(&self, calldepth: usize, message: impl Into<String>) -> Result<()> {
        let mut record = self.new_record(
            self.output_level,
            "{}".to_string(),
            vec![Arg::from(message.into())],
            Location::caller(),
        );
        self.backend().log(self.output_level, calldepth, &mut record)
    }

    /// Log a template at the output level without running this logger's
    /// annotaters. The backend chain starts at calldepth `1 + adjdepth`.
    #[track_caller]
    pub fn output_fmt(
        &self,
        adjdepth: usize,
        template: impl Into<String>,
        args: Vec<Arg>,
    ) -> Result<()> {
        let mut record =
            self.bare_record(self.output_level, template.into(), args, Location::caller());
        self.backend().log(self.output_level, 1 + adjdepth, &mut record)
    }

    #[track_caller]
    pub fn print(&self, message: impl Into<String>) {
        if let Err(e) = self.output(LOG_CALLDEPTH, message) {
            eprintln!("[LOGGER ERROR] output for '{}' failed: {}", self.module, e);
        }
    }

    /// Print `args` separated by single spaces, redacting as the level
    /// methods do. Each record is already one line, so no newline is added.
    #[track_caller]
    pub fn println(&self, args: Vec<Arg>) {
        let template = vec!["{}"; args.len()].join(" ");
        let mut record = self.new_record(self.output_level, template, args, Location::caller());
        if let Err(e) = self.backend().log(self.output_level, LOG_CALLDEPTH, &mut record) {
            eprintln!("[LOGGER ERROR] output for '{}' failed: {}", self.module, e);
        }
    }

    #[track_caller]
    pub fn critical(&self, template: impl Into<String>, args: Vec<Arg>) {
        self.emit(Level::Critical, template, args);
    }

    #[track_caller]
    pub fn error(&self, template: impl Into<String>, args: Vec<Arg>) {
        self.emit(Level::Error, template, args);
    }

    #[track_caller]
    pub fn warning(&self, template: impl Into<String>, args: Vec<Arg>) {
        self.emit(Level::Warning, template, args);
    }

    #[track_caller]
    pub fn notice(&self, template: impl Into<String>, args: Vec<Arg>) {
        self.emit(Level::Notice, template, args);
    }

    #[track_caller]
    pub fn info(&self, template: impl Into<String>, args: Vec<Arg>) {
        self.emit(Level::Info, template, args);
    }

    #[track_caller]
    pub fn debug(&self, template: impl Into<String>, args: Vec<Arg>) {
        self.emit(Level::Debug, template, args);
    }

    /// Log at `Critical`, then exit the process with status 1.
    #[track_caller]
    pub fn fatal(&self, template: impl Into<String>, args: Vec<Arg>) -> ! {
        self.emit(Level::Critical, template, args);
        std::process::exit(1)
    }

    /// Log at `Critical`, then panic with the rendered message.
    #[track_caller]
    pub fn panic(&self, template: impl Into<String>, args: Vec<Arg>) -> ! {
        let message = render_template(&template.into(), &args);
        self.emit(Level::Critical, "{}", vec![Arg::from(message.clone())]);
        panic!("{}", message)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("module", &self.module)
            .field("output_level", &self.output_level)
            .field("has_backend", &self.backend.is_some())
            .field("annotater", &self.annotater)
            .finish()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use modlog::prelude::*;
///
/// let memory = MemoryBackend::new(100);
/// let logger = Logger::builder()
///     .module("api")
///     .output_level(Level::Notice)
///     .backend(memory.clone())
///     .build();
///
/// logger.print("raw line");
/// assert_eq!(memory.head().unwrap().level, Level::Notice);
/// ```
pub struct LoggerBuilder {
    module: String,
    output_level: Level,
    backend: Option<Arc<dyn LeveledBackend>>,
    annotater: Option<Arc<dyn Annotater>>,
    sequence: Option<Arc<SequenceGenerator>>,
    clock: Option<Clock>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            module: String::new(),
            output_level: Level::Info,
            backend: None,
            annotater: None,
            sequence: None,
            clock: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn output_level(mut self, level: Level) -> Self {
        self.output_level = level;
        self
    }

    /// Send records to `backend`, wrapped with module level knobs unless it
    /// already has them.
    #[must_use = "builder methods return a new value"]
    pub fn backend<B: Backend + 'static>(mut self, backend: B) -> Self {
        self.backend = Some(add_module_level(backend));
        self
    }

    /// Send records to a backend that does its own level filtering.
    #[must_use = "builder methods return a new value"]
    pub fn leveled_backend(mut self, backend: Arc<dyn LeveledBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn annotater(mut self, annotater: Arc<dyn Annotater>) -> Self {
        self.annotater = Some(annotater);
        self
    }

    /// Number records from `sequence` instead of the process-wide generator.
    #[must_use = "builder methods return a new value"]
    pub fn sequence(mut self, sequence: Arc<SequenceGenerator>) -> Self {
        self.sequence = Some(sequence);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn clock(mut self, clock: Clock) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> Logger {
        Logger {
            module: self.module,
            output_level: self.output_level,
            backend: self.backend,
            annotater: self.annotater.map(AnnotaterChain::single),
            sequence: self.sequence.unwrap_or_else(SequenceGenerator::global),
            clock: self.clock,
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::MemoryBackend;
    use crate::core::{Annotation, Leveled, LoggerError, ModuleLeveled};
    use parking_lot::Mutex;

    struct DepthRecorder {
        depths: Mutex<Vec<usize>>,
    }

    impl Backend for DepthRecorder {
        fn log(&self, _level: Level, calldepth: usize, _record: &mut Record) -> Result<()> {
            self.depths.lock().push(calldepth);
            Ok(())
        }
    }

    struct Failing;

    impl Backend for Failing {
        fn log(&self, _level: Level, _calldepth: usize, _record: &mut Record) -> Result<()> {
            Err(LoggerError::writer("sink closed"))
        }
    }

    fn memory_logger(module: &str) -> (Logger, MemoryBackend) {
        let memory = MemoryBackend::new(64);
        let logger = Logger::builder()
            .module(module)
            .backend(memory.clone())
            .sequence(Arc::new(SequenceGenerator::new()))
            .build();
        (logger, memory)
    }

    fn tag(key: &'static str) -> Arc<dyn Annotater> {
        Arc::new(move |rec: &mut Record| rec.annotate(Annotation::new(key, true)))
    }

    #[test]
    fn test_leveled_methods_stamp_records() {
        let (logger, memory) = memory_logger("core");
        logger.critical("c", vec![]);
        logger.error("e", vec![]);
        logger.warning("w", vec![]);
        logger.notice("n", vec![]);
        logger.info("i", vec![]);
        logger.debug("d", vec![]);

        let records = memory.records();
        let levels: Vec<_> = records.iter().map(|r| r.level).collect();
        assert_eq!(levels, Level::ALL.to_vec());
        let ids: Vec<_> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
        assert!(records.iter().all(|r| r.module == "core"));
    }

    #[test]
    fn test_calldepth_grows_per_stage() {
        let recorder = Arc::new(DepthRecorder {
            depths: Mutex::new(Vec::new()),
        });
        let annotator = crate::core::Annotator::new(Arc::clone(&recorder));
        let logger = Logger::builder().module("depth").backend(annotator).build();

        logger.info("x", vec![]);
        // logger 2, filter +1, annotator +1
        assert_eq!(*recorder.depths.lock(), vec![LOG_CALLDEPTH + 2]);
    }

    #[test]
    fn test_location_is_caller() {
        let (logger, memory) = memory_logger("loc");
        let line = line!() + 1;
        logger.info("here", vec![]);
        let location = memory.head().unwrap().location().unwrap();
        assert_eq!(location.line(), line);
        assert!(location.file().ends_with("logger.rs"));
    }

    #[test]
    fn test_re_orders_annotaters_and_keeps_original() {
        let (logger, memory) = memory_logger("ctx");
        let with_a = logger.re(tag("a"));
        let with_ab = with_a.re(tag("b"));

        with_ab.info("both", vec![]);
        with_a.info("one", vec![]);
        logger.info("none", vec![]);

        let records = memory.records();
        let keys = |r: &Record| r.annotations.iter().map(|a| a.key.clone()).collect::<Vec<_>>();
        assert_eq!(keys(&records[0]), vec!["a", "b"]);
        assert_eq!(keys(&records[1]), vec!["a"]);
        assert!(keys(&records[2]).is_empty());
        assert!(logger.annotater().is_none());
        assert_eq!(with_a.annotater().unwrap().len(), 1);
    }

    #[test]
    fn test_logger_annotations_precede_annotator_backend() {
        let memory = MemoryBackend::new(8);
        let annotator = crate::core::Annotator::new(memory.clone());
        annotator.add("backend", 1);
        let logger = Logger::builder()
            .module("m")
            .backend(annotator)
            .annotater(tag("logger"))
            .build();

        logger.info("x", vec![]);
        let keys: Vec<_> = memory.head().unwrap().annotations.iter().map(|a| a.key.clone()).collect();
        assert_eq!(keys, vec!["logger", "backend"]);
    }

    #[test]
    fn test_is_enabled_for_uses_module_rules() {
        let memory = MemoryBackend::new(8);
        let leveled = ModuleLeveled::new(memory.clone());
        leveled.set_level(Level::Warning, "quiet");
        let logger = Logger::builder()
            .module("quiet")
            .leveled_backend(Arc::new(leveled))
            .build();

        assert!(logger.is_enabled_for(Level::Error));
        assert!(!logger.is_enabled_for(Level::Info));
        logger.info("dropped", vec![]);
        assert!(memory.is_empty());
    }

    #[test]
    fn test_sink_error_returned_from_log() {
        let logger = Logger::builder().module("f").backend(Failing).build();
        let err = logger.log(Level::Error, "x", vec![]).unwrap_err();
        assert!(matches!(err, LoggerError::WriterError(_)));
        // fire-and-forget variant reports instead of panicking
        logger.error("x", vec![]);
    }

    #[test]
    fn test_output_uses_output_level_and_depth() {
        let recorder = Arc::new(DepthRecorder {
            depths: Mutex::new(Vec::new()),
        });
        let logger = Logger::builder().module("out").backend(Arc::clone(&recorder)).build();
        logger.output(5, "raw").unwrap();
        assert_eq!(*recorder.depths.lock(), vec![6]);

        let (mut logger, memory) = memory_logger("out");
        logger.set_output_level(Level::Warning);
        logger.print("plain {} text");
        let record = memory.head().unwrap();
        assert_eq!(record.level, Level::Warning);
        assert_eq!(record.message(), "plain {} text");
    }

    #[test]
    fn test_output_fmt_skips_annotaters() {
        let recorder = Arc::new(DepthRecorder {
            depths: Mutex::new(Vec::new()),
        });
        let logger = Logger::builder()
            .module("out")
            .backend(Arc::clone(&recorder))
            .build();
        logger.output_fmt(0, "x", vec![]).unwrap();
        logger.output_fmt(3, "x", vec![]).unwrap();
        // filter stage adds one to 1 + adjdepth
        assert_eq!(*recorder.depths.lock(), vec![2, 5]);

        let (logger, memory) = memory_logger("out");
        let logger = logger.re(tag("ctx"));
        let args = vec![Arg::from(crate::core::Secret::new("eve")), Arg::from("lan")];
        logger.output_fmt(1, "user {} from {}", args).unwrap();
        let record = memory.head().unwrap();
        assert_eq!(record.level, Level::Info);
        assert_eq!(record.message(), "user *** from lan");
        assert!(record.annotations.is_empty());
    }

    #[test]
    fn test_println_joins_with_spaces() {
        let (logger, memory) = memory_logger("out");
        let logger = logger.re(tag("ctx"));
        logger.println(vec![Arg::from("a"), Arg::from(1), Arg::from(true)]);
        logger.println(vec![]);

        let records = memory.records();
        assert_eq!(records[0].message(), "a 1 true");
        assert_eq!(records[0].annotations.len(), 1);
        assert_eq!(records[1].message(), "");
    }

    #[test]
    fn test_injected_clock() {
        let epoch = DateTime::<Utc>::UNIX_EPOCH;
        let memory = MemoryBackend::new(4);
        let logger = Logger::builder()
            .backend(memory.clone())
            .clock(Arc::new(move || epoch))
            .build();
        logger.info("t", vec![]);
        assert_eq!(memory.head().unwrap().time, epoch);
    }

    #[test]
    #[should_panic(expected = "boom 7")]
    fn test_panic_logs_then_panics() {
        let (logger, _memory) = memory_logger("p");
        logger.panic("boom {}", vec![Arg::from(7)]);
    }

    #[test]
    fn test_panic_record_is_critical() {
        let (logger, memory) = memory_logger("p");
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            logger.panic("bad {}", vec![Arg::from("state")]);
        }));
        assert!(result.is_err());
        let record = memory.head().unwrap();
        assert_eq!(record.level, Level::Critical);
        assert_eq!(record.message(), "bad state");
    }
}
