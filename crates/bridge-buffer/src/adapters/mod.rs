//! Store adapters: append-only file and in-memory.

pub mod file;
pub mod memory;

pub use file::FileBufferStore;
pub use memory::InMemoryBufferStore;
