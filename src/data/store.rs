//! In-memory tracker collection with write-through persistence.

use anyhow::{Context, Result};

use super::models::{Entry, Tracker, TrackerId};
use super::storage::KeyValueStore;

/// Storage key holding the serialized tracker array
pub const STORAGE_KEY: &str = "progressTrackers";

/// Owns every tracker; each mutation rewrites the full array to storage
pub struct TrackerStore {
    storage: Box<dyn KeyValueStore>,
    trackers: Vec<Tracker>,
}

impl TrackerStore {
    /// Load trackers from storage.
    ///
    /// A missing key or an unparseable value both yield an empty collection.
    /// Only a failing storage backend is an error.
    pub fn load(storage: Box<dyn KeyValueStore>) -> Result<Self> {
        let raw = storage
            .get(STORAGE_KEY)
            .context("Failed to read trackers from storage")?;

        let trackers = match raw {
            Some(raw) => parse_trackers(&raw),
            None => Vec::new(),
        };

        tracing::info!(count = trackers.len(), "loaded trackers");

        Ok(TrackerStore { storage, trackers })
    }

    pub fn trackers(&self) -> &[Tracker] {
        &self.trackers
    }

    pub fn get(&self, id: TrackerId) -> Option<&Tracker> {
        self.trackers.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.trackers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trackers.is_empty()
    }

    /// Create a tracker with an id derived from `now_ms`, bumped past any
    /// existing id so ids stay unique when created within the same millisecond.
    pub fn create(&mut self, description: String, unit: String, now_ms: i64) -> Result<TrackerId> {
        let id = self
            .trackers
            .iter()
            .map(|t| t.id)
            .filter(|&id| id >= now_ms)
            .max()
            .map_or(now_ms, |max| max + 1);

        tracing::info!(id, %description, %unit, "creating tracker");
        self.trackers.push(Tracker::new(id, description, unit));
        self.save()?;
        Ok(id)
    }

    /// Append an entry. Returns false when the tracker does not exist.
    pub fn add_entry(&mut self, id: TrackerId, entry: Entry) -> Result<bool> {
        let Some(tracker) = self.trackers.iter_mut().find(|t| t.id == id) else {
            return Ok(false);
        };
        tracker.history.push(entry);
        tracing::debug!(id, date = %entry.date, value = entry.value, "added entry");
        self.save()?;
        Ok(true)
    }

    /// Remove a tracker. Returns false when the tracker does not exist.
    pub fn delete(&mut self, id: TrackerId) -> Result<bool> {
        let before = self.trackers.len();
        self.trackers.retain(|t| t.id != id);
        if self.trackers.len() == before {
            return Ok(false);
        }
        tracing::info!(id, "deleted tracker");
        self.save()?;
        Ok(true)
    }

    /// Rewrite the whole collection under [`STORAGE_KEY`]
    fn save(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.trackers).context("Failed to serialize trackers")?;
        self.storage
            .set(STORAGE_KEY, &json)
            .context("Failed to save trackers")
    }
}

/// Parse the persisted array; corrupt data is treated as "no data"
fn parse_trackers(raw: &str) -> Vec<Tracker> {
    match serde_json::from_str::<Vec<Tracker>>(raw) {
        Ok(trackers) => trackers,
        Err(e) => {
            tracing::warn!(error = %e, "stored trackers are unreadable, starting empty");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::storage::{MemoryStorage, SqliteStorage};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn storage_with(value: &str) -> Box<dyn KeyValueStore> {
        let mut storage = MemoryStorage::new();
        storage.set(STORAGE_KEY, value).unwrap();
        Box::new(storage)
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    #[test]
    fn test_corrupt_storage_loads_empty() {
        let store = TrackerStore::load(storage_with("{not json")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_missing_key_loads_empty() {
        let store = TrackerStore::load(Box::new(MemoryStorage::new())).unwrap();
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_load_existing_array() {
        let store = TrackerStore::load(storage_with(
            r#"[{"id":5,"description":"Weight","unit":"kg","history":[{"date":"2025-01-02","value":70}]}]"#,
        ))
        .unwrap();
        let tracker = store.get(5).unwrap();
        assert_eq!(tracker.title(), "Weight (kg)");
        assert_eq!(tracker.history, vec![Entry::new(day(2), 70.0)]);
    }

    #[test]
    fn test_create_assigns_unique_ids() {
        let mut store = TrackerStore::load(Box::new(MemoryStorage::new())).unwrap();
        let a = store.create("A".into(), "kg".into(), 1000).unwrap();
        let b = store.create("B".into(), "kg".into(), 1000).unwrap();
        let c = store.create("C".into(), "kg".into(), 5000).unwrap();
        assert_eq!((a, b, c), (1000, 1001, 5000));
    }

    #[test]
    fn test_add_entry_to_unknown_tracker_is_noop() {
        let mut store = TrackerStore::load(Box::new(MemoryStorage::new())).unwrap();
        assert!(!store.add_entry(42, Entry::new(day(1), 1.0)).unwrap());
    }

    #[test]
    fn test_delete_removes_from_storage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.db");

        let (kept, removed) = {
            let mut store = TrackerStore::load(Box::new(SqliteStorage::open(&path).unwrap())).unwrap();
            let kept = store.create("Weight".into(), "kg".into(), 1).unwrap();
            let removed = store.create("Run".into(), "km".into(), 2).unwrap();
            store.add_entry(removed, Entry::new(day(3), 5.0)).unwrap();
            assert!(store.delete(removed).unwrap());
            assert!(!store.delete(removed).unwrap());
            (kept, removed)
        };

        let reloaded = TrackerStore::load(Box::new(SqliteStorage::open(&path).unwrap())).unwrap();
        let ids: Vec<TrackerId> = reloaded.trackers().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![kept]);
        assert!(reloaded.get(removed).is_none());
    }

    #[test]
    fn test_entries_persist_in_append_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.db");

        let id = {
            let mut store = TrackerStore::load(Box::new(SqliteStorage::open(&path).unwrap())).unwrap();
            let id = store.create("Weight".into(), "kg".into(), 1).unwrap();
            store.add_entry(id, Entry::new(day(5), 71.0)).unwrap();
            store.add_entry(id, Entry::new(day(1), 70.0)).unwrap();
            id
        };

        let reloaded = TrackerStore::load(Box::new(SqliteStorage::open(&path).unwrap())).unwrap();
        let dates: Vec<NaiveDate> = reloaded.get(id).unwrap().history.iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![day(5), day(1)]);
    }
}
