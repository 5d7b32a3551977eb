//! Item store adapters.

mod file;
mod memory;

pub use file::FileItemStore;
pub use memory::InMemoryItemStore;
