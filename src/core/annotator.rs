//! Record annotation
//!
//! Two ways to attach key/value context to records:
//!
//! - [`Annotator`] is a backend decorator. It appends its static and
//!   dynamic annotations to every record passing through, then forwards.
//! - [`Annotater`] is the logger-side hook. A logger carries one
//!   [`AnnotaterChain`] and [`Logger::re`](crate::Logger::re) extends it.

use super::annotation::{Annotation, FieldValue};
use super::backend::Backend;
use super::error::Result;
use super::global;
use super::level::Level;
use super::record::Record;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Adds context to a record before it enters the backend chain.
pub trait Annotater: Send + Sync {
    fn annotate(&self, record: &mut Record);
}

impl<F> Annotater for F
where
    F: Fn(&mut Record) + Send + Sync,
{
    fn annotate(&self, record: &mut Record) {
        self(record)
    }
}

/// An ordered list of annotaters run first to last.
///
/// Extending a chain never modifies it; [`AnnotaterChain::then`] returns
/// a new chain sharing the existing stages.
#[derive(Clone, Default)]
pub struct AnnotaterChain {
    stages: Vec<Arc<dyn Annotater>>,
}

impl AnnotaterChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(annotater: Arc<dyn Annotater>) -> Self {
        Self {
            stages: vec![annotater],
        }
    }

    /// A chain running `self` and then `next`.
    #[must_use]
    pub fn then(&self, next: Arc<dyn Annotater>) -> Self {
        let mut stages = Vec::with_capacity(self.stages.len() + 1);
        stages.extend(self.stages.iter().cloned());
        stages.push(next);
        Self { stages }
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl Annotater for AnnotaterChain {
    fn annotate(&self, record: &mut Record) {
        for stage in &self.stages {
            stage.annotate(record);
        }
    }
}

impl fmt::Debug for AnnotaterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotaterChain")
            .field("stages", &self.stages.len())
            .finish()
    }
}

/// Produces annotations at log time, e.g. request scoped values.
pub type DynamicExtras = Arc<dyn Fn() -> Vec<Annotation> + Send + Sync>;

/// A backend decorator that adds annotations to records in flight.
///
/// Static annotations are kept by key (the last value added for a key
/// wins) and are appended in no particular order. Dynamic annotations
/// are computed on every record and appended after the static ones, in
/// the order produced.
///
/// # Example
///
/// ```
/// use modlog::prelude::*;
/// use std::sync::Arc;
///
/// let memory = MemoryBackend::new(16);
/// let annotator = Annotator::new(memory.clone())
///     .with_dynamic_extras(Arc::new(|| vec![Annotation::new("worker", 3)]));
/// annotator.add("service", "billing");
///
/// let logger = Logger::builder().module("billing").backend(annotator).build();
/// logger.info("invoice sent", vec![]);
///
/// let record = memory.head().unwrap();
/// assert_eq!(record.annotations[0].key, "service");
/// assert_eq!(record.annotations[1].key, "worker");
/// ```
pub struct Annotator {
    extras: RwLock<HashMap<String, Annotation>>,
    dynamic_extras: Option<DynamicExtras>,
    backend: Option<Box<dyn Backend>>,
}

impl Annotator {
    /// Annotate records and forward them to `backend`.
    pub fn new<B: Backend + 'static>(backend: B) -> Self {
        Self {
            extras: RwLock::new(HashMap::new()),
            dynamic_extras: None,
            backend: Some(Box::new(backend)),
        }
    }

    /// Annotate records and forward them to the process default backend,
    /// looked up on every record.
    pub fn to_default() -> Self {
        Self {
            extras: RwLock::new(HashMap::new()),
            dynamic_extras: None,
            backend: None,
        }
    }

    #[must_use]
    pub fn with_dynamic_extras(mut self, extras: DynamicExtras) -> Self {
        self.dynamic_extras = Some(extras);
        self
    }

    pub fn set_dynamic_extras(&mut self, extras: Option<DynamicExtras>) {
        self.dynamic_extras = extras;
    }

    /// Register a static annotation, replacing any earlier value for `key`.
    pub fn add(&self, key: impl Into<String>, value: impl Into<FieldValue>) {
        let annotation = Annotation::new(key, value);
        self.extras
            .write()
            .insert(annotation.key.clone(), annotation);
    }

    pub fn remove(&self, key: &str) {
        self.extras.write().remove(key);
    }

    /// Current static annotations.
    pub fn extras(&self) -> Vec<Annotation> {
        self.extras.read().values().cloned().collect()
    }
}

impl Annotater for Annotator {
    fn annotate(&self, record: &mut Record) {
        record
            .annotations
            .extend(self.extras.read().values().cloned());
        if let Some(dynamic) = &self.dynamic_extras {
            record.annotations.extend(dynamic());
        }
    }
}

impl Backend for Annotator {
    fn log(&self, level: Level, calldepth: usize, record: &mut Record) -> Result<()> {
        self.annotate(record);
        match &self.backend {
            Some(backend) => backend.log(level, calldepth + 1, record),
            None => global::default_backend().log(level, calldepth + 1, record),
        }
    }
}

impl fmt::Debug for Annotator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Annotator")
            .field("extras", &self.extras.read().len())
            .field("dynamic", &self.dynamic_extras.is_some())
            .field("forwards_to_default", &self.backend.is_none())
            .finish()
    }
}
