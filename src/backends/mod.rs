//! Backend implementations

pub mod memory;
pub mod multi;
pub mod writer;

pub use memory::MemoryBackend;
pub use multi::MultiBackend;
pub use writer::WriterBackend;
