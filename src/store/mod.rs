//! Store Module - durable data between renders
//!
//! Maps a binding's `target` name to the bytes last stored for it.
//! Read when bindings are resolved, written when a render finishes.
//!
//! Key types:
//! - `CacheStore`: the capability the evaluation context consumes
//! - `DataDirStore`: files under the data directory
//! - `MemoryStore`: in-memory store for tests and benches

mod cache;

pub use cache::{CacheStore, DataDirStore, MemoryStore};
