//! Record sequence numbering

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

/// Hands out unique, increasing record ids.
///
/// Loggers share the process-wide instance from [`SequenceGenerator::global`]
/// unless another generator is injected through the builder.
#[derive(Debug, Default)]
pub struct SequenceGenerator {
    last: AtomicU64,
}

impl SequenceGenerator {
    pub const fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    /// The generator shared by every logger that was not given its own.
    pub fn global() -> Arc<SequenceGenerator> {
        static GLOBAL: OnceLock<Arc<SequenceGenerator>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(SequenceGenerator::new())))
    }

    /// Allocate the next id. The first id handed out is 1.
    #[inline]
    pub fn next_id(&self) -> u64 {
        self.last.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// The most recently allocated id, 0 if none.
    #[inline]
    pub fn current(&self) -> u64 {
        self.last.load(Ordering::Relaxed)
    }

    /// Restart numbering. Ids handed out afterwards repeat earlier ones.
    pub fn reset(&self) {
        self.last.store(0, Ordering::Relaxed);
    }
}
