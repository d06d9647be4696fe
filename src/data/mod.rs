//! Data layer: tracker models and their persistence.
//!
//! Trackers are kept in memory and written through to a key-value store
//! backed by a local SQLite file.

mod models;
mod storage;
mod store;

pub use models::{Entry, Tracker, TrackerId};
#[cfg(test)]
pub use storage::MemoryStorage;
pub use storage::{KeyValueStore, SqliteStorage};
pub use store::TrackerStore;
