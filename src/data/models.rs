//! Data models for progress trackers and their measurement history.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Tracker ids are creation timestamps in milliseconds.
pub type TrackerId = i64;

/// A named, unit-labeled series of measurements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tracker {
    pub id: TrackerId,
    pub description: String,
    pub unit: String,
    /// Append order. Use [`Tracker::sorted_history`] for display order.
    #[serde(default)]
    pub history: Vec<Entry>,
}

impl Tracker {
    pub fn new(id: TrackerId, description: String, unit: String) -> Self {
        Tracker {
            id,
            description,
            unit,
            history: Vec::new(),
        }
    }

    /// Card title, e.g. "Weight (kg)"
    pub fn title(&self) -> String {
        format!("{} ({})", self.description, self.unit)
    }

    /// History ordered ascending by date.
    ///
    /// The sort is stable, so entries sharing a date keep their arrival order
    /// and are all retained.
    pub fn sorted_history(&self) -> Vec<Entry> {
        let mut history = self.history.clone();
        history.sort_by_key(|e| e.date);
        history
    }
}

/// One (date, value) sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub date: NaiveDate,
    pub value: f64,
}

impl Entry {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Entry { date, value }
    }

    /// Date label in the persisted YYYY-MM-DD form
    pub fn date_label(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}
