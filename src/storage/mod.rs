//! Persistent key-value storage
//!
//! Backends for the single roster blob.

pub mod kv;
pub mod memory;
pub mod file;

pub use kv::KeyValueStore;
pub use memory::MemoryStore;
pub use file::FileStore;
