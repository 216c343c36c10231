//! Key-value backend implementations.
//!
//! Available backends:
//! - `MemoryBackend` - In-memory storage
//! - `JsonFileBackend` - Single JSON file on disk

pub mod file;
pub mod memory;

pub use file::JsonFileBackend;
pub use memory::MemoryBackend;
