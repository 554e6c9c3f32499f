//! Key/value storage backends.
//!
//! - [`file::FileStore`]: a JSON object on disk, used by the CLI.
//! - [`memory::MemoryStore`]: process-local, used by tests.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;
