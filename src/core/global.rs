//! Process-wide defaults
//!
//! Loggers without their own backend, annotators without an inner
//! backend, and records without an attached formatter fall back to the
//! values held here. The first access installs a stderr backend that lets
//! every level through and the text formatter.

use super::backend::{Backend, Leveled, LeveledBackend};
use super::formatter::{Formatter, TextFormatter};
use super::level::Level;
use super::logger::Clock;
use super::module_level::{add_module_level, ModuleLeveled};
use super::sequence::SequenceGenerator;
use crate::backends::{MemoryBackend, MultiBackend, WriterBackend};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::{Arc, OnceLock};

/// Records kept by the backend installed by [`init_for_testing`].
pub const TESTING_MEMORY_SIZE: usize = 10240;

static BACKEND: OnceLock<RwLock<Arc<dyn LeveledBackend>>> = OnceLock::new();
static FORMATTER: OnceLock<RwLock<Arc<dyn Formatter>>> = OnceLock::new();
static CLOCK: RwLock<Option<Clock>> = parking_lot::const_rwlock(None);

fn backend_slot() -> &'static RwLock<Arc<dyn LeveledBackend>> {
    BACKEND.get_or_init(|| RwLock::new(Arc::new(stderr_backend())))
}

fn formatter_slot() -> &'static RwLock<Arc<dyn Formatter>> {
    FORMATTER.get_or_init(|| RwLock::new(default_formatter()))
}

fn stderr_backend() -> ModuleLeveled {
    let leveled = ModuleLeveled::new(WriterBackend::stderr());
    leveled.set_level(Level::Debug, "");
    leveled
}

/// The backend used by loggers that were not given one.
pub fn default_backend() -> Arc<dyn LeveledBackend> {
    Arc::clone(&backend_slot().read())
}

/// Make `backend` the process default, adding module level knobs unless
/// it already has them. Returns the leveled backend so levels can be
/// configured.
pub fn set_backend<B: Backend + 'static>(backend: B) -> Arc<dyn LeveledBackend> {
    let leveled = add_module_level(backend);
    set_leveled_backend(Arc::clone(&leveled));
    leveled
}

/// Make an already leveled backend the process default.
pub fn set_leveled_backend(backend: Arc<dyn LeveledBackend>) {
    *backend_slot().write() = backend;
}

/// Make the given backends the process default. A single backend gets
/// module level knobs; several are combined into a [`MultiBackend`].
pub fn set_backends(mut backends: Vec<Arc<dyn Backend>>) -> Arc<dyn LeveledBackend> {
    let backend: Arc<dyn LeveledBackend> = if backends.len() == 1 {
        add_module_level(backends.remove(0))
    } else {
        Arc::new(MultiBackend::new(backends))
    };
    set_leveled_backend(Arc::clone(&backend));
    backend
}

pub fn default_formatter() -> Arc<dyn Formatter> {
    Arc::new(TextFormatter::new())
}

/// The formatter used by level filters that were not given one.
pub fn formatter() -> Arc<dyn Formatter> {
    Arc::clone(&formatter_slot().read())
}

/// Replace the process default formatter.
///
/// Filters that already resolved their formatter keep it.
pub fn set_formatter(formatter: Arc<dyn Formatter>) {
    *formatter_slot().write() = formatter;
}

/// Current time as seen by loggers without their own clock.
pub fn now() -> DateTime<Utc> {
    match &*CLOCK.read() {
        Some(clock) => clock(),
        None => Utc::now(),
    }
}

/// Override the process clock; `None` restores the system clock.
pub fn set_clock(clock: Option<Clock>) {
    *CLOCK.write() = clock;
}

/// Restore every process-wide default: sequence numbering restarts, the
/// stderr backend passes all levels, the text formatter and the system
/// clock are back in place.
pub fn reset() {
    SequenceGenerator::global().reset();
    set_backend(stderr_backend());
    set_formatter(default_formatter());
    set_clock(None);
}

/// Reset, then capture records at `level` and above in memory with the
/// clock frozen at the Unix epoch.
pub fn init_for_testing(level: Level) -> MemoryBackend {
    reset();

    let memory = MemoryBackend::new(TESTING_MEMORY_SIZE);
    let leveled = set_backend(memory.clone());
    leveled.set_level(level, "");

    set_clock(Some(Arc::new(|| DateTime::<Utc>::UNIX_EPOCH)));
    memory
}
