//! In-memory backend
//!
//! Keeps the most recent records for inspection, mostly from tests.

use crate::core::{Backend, Level, Record, Result};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

/// A ring buffer of records. Once `capacity` records are held the oldest
/// is evicted for each new one; a capacity of 0 keeps everything.
///
/// Clones share the same buffer.
#[derive(Clone)]
pub struct MemoryBackend {
    records: Arc<Mutex<VecDeque<Record>>>,
    capacity: usize,
}

impl MemoryBackend {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: Arc::new(Mutex::new(VecDeque::with_capacity(capacity.min(1024)))),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Stored records, oldest first.
    pub fn records(&self) -> Vec<Record> {
        self.records.lock().iter().cloned().collect()
    }

    /// The oldest stored record.
    pub fn head(&self) -> Option<Record> {
        self.records.lock().front().cloned()
    }

    /// The newest stored record.
    pub fn latest(&self) -> Option<Record> {
        self.records.lock().back().cloned()
    }

    /// Rendered messages, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.records
            .lock()
            .iter()
            .map(|r| r.message().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl Backend for MemoryBackend {
    fn log(&self, _level: Level, _calldepth: usize, record: &mut Record) -> Result<()> {
        // render now so stored clones share the memoized message
        record.message();

        let mut records = self.records.lock();
        if self.capacity > 0 && records.len() >= self.capacity {
            records.pop_front();
        }
        records.push_back(record.clone());
        Ok(())
    }
}

impl fmt::Debug for MemoryBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryBackend")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}
