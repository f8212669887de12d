//! Backend contract shared by sinks and decorators

use super::error::Result;
use super::level::Level;
use super::record::Record;
use std::sync::Arc;

/// A stage of the logging chain.
///
/// Terminal sinks persist or render the record. Decorators adjust it and
/// forward to the backend they wrap with `calldepth + 1`, returning the
/// inner result unchanged.
pub trait Backend: Send + Sync {
    fn log(&self, level: Level, calldepth: usize, record: &mut Record) -> Result<()>;

    /// A shared handle to this backend when it already filters by module
    /// level, so wrapping it does not add a second filter.
    fn as_leveled(&self) -> Option<Arc<dyn LeveledBackend>> {
        None
    }
}

/// Per-module level knobs.
pub trait Leveled {
    fn get_level(&self, module: &str) -> Level;
    fn set_level(&self, level: Level, module: &str);
    fn is_enabled_for(&self, level: Level, module: &str) -> bool;
}

/// A backend that also filters by module level.
pub trait LeveledBackend: Backend + Leveled {}

impl<T: Backend + Leveled> LeveledBackend for T {}

impl<B: Backend + ?Sized> Backend for Arc<B> {
    fn log(&self, level: Level, calldepth: usize, record: &mut Record) -> Result<()> {
        (**self).log(level, calldepth, record)
    }

    fn as_leveled(&self) -> Option<Arc<dyn LeveledBackend>> {
        (**self).as_leveled()
    }
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn log(&self, level: Level, calldepth: usize, record: &mut Record) -> Result<()> {
        (**self).log(level, calldepth, record)
    }

    fn as_leveled(&self) -> Option<Arc<dyn LeveledBackend>> {
        (**self).as_leveled()
    }
}
