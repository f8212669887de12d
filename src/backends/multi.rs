//! Fan-out backend

use crate::core::{add_module_level, Backend, Level, Leveled, LeveledBackend, Record, Result};
use std::fmt;
use std::sync::Arc;

/// Sends each record to several backends.
///
/// Every child gets its own copy of the record, and only when the child
/// is enabled for the record's level and module. All children are tried;
/// the last error seen is returned.
///
/// Cloning yields another handle over the same children.
#[derive(Clone)]
pub struct MultiBackend {
    backends: Vec<Arc<dyn LeveledBackend>>,
}

impl MultiBackend {
    /// Combine `backends`, adding module level knobs to each that lacks them.
    pub fn new(backends: Vec<Arc<dyn Backend>>) -> Self {
        Self {
            backends: backends
                .into_iter()
                .map(add_module_level)
                .collect(),
        }
    }

    pub fn from_leveled(backends: Vec<Arc<dyn LeveledBackend>>) -> Self {
        Self { backends }
    }

    pub fn backends(&self) -> &[Arc<dyn LeveledBackend>] {
        &self.backends
    }
}

impl Backend for MultiBackend {
    fn log(&self, level: Level, calldepth: usize, record: &mut Record) -> Result<()> {
        let mut last_err = None;
        for backend in &self.backends {
            if !backend.is_enabled_for(level, &record.module) {
                continue;
            }
            let mut copy = record.clone();
            if let Err(e) = backend.log(level, calldepth + 1, &mut copy) {
                last_err = Some(e);
            }
        }
        match last_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn as_leveled(&self) -> Option<Arc<dyn LeveledBackend>> {
        Some(Arc::new(self.clone()))
    }
}

impl Leveled for MultiBackend {
    /// The least restrictive level among the children.
    fn get_level(&self, module: &str) -> Level {
        self.backends
            .iter()
            .map(|b| b.get_level(module))
            .max()
            .unwrap_or(Level::Debug)
    }

    fn set_level(&self, level: Level, module: &str) {
        for backend in &self.backends {
            backend.set_level(level, module);
        }
    }

    fn is_enabled_for(&self, level: Level, module: &str) -> bool {
        self.backends.iter().any(|b| b.is_enabled_for(level, module))
    }
}

impl fmt::Debug for MultiBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiBackend")
            .field("backends", &self.backends.len())
            .finish()
    }
}
