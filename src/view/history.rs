//! Summary statistics and the capped-height history table.

use crate::data::Entry;

/// Summary over a date-sorted history
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryStats {
    pub average: f64,
    pub min: f64,
    pub max: f64,
    pub latest: f64,
    /// Latest minus first
    pub growth: f64,
}

impl HistoryStats {
    /// `sorted` must be ascending by date. Returns None when empty.
    pub fn compute(sorted: &[Entry]) -> Option<Self> {
        let first = sorted.first()?.value;
        let latest = sorted.last()?.value;
        let sum: f64 = sorted.iter().map(|e| e.value).sum();
        let min = sorted.iter().map(|e| e.value).fold(f64::INFINITY, f64::min);
        let max = sorted.iter().map(|e| e.value).fold(f64::NEG_INFINITY, f64::max);

        Some(HistoryStats {
            average: sum / sorted.len() as f64,
            min,
            max,
            latest,
            growth: latest - first,
        })
    }

    /// Labeled fields in display order, e.g. ("Avg", "70.00 kg")
    pub fn fields(&self, unit: &str) -> [(&'static str, String); 5] {
        [
            ("Avg", format!("{:.2} {unit}", self.average)),
            ("Min", format_value(self.min)),
            ("Max", format_value(self.max)),
            ("Latest", format_value(self.latest)),
            ("Growth", format!("{:.2}", self.growth)),
        ]
    }
}

/// Shortest decimal form of a value: 70 stays "70", 70.5 stays "70.5"
pub fn format_value(value: f64) -> String {
    format!("{value}")
}

/// Newest-first table whose body shows a fixed number of rows and scrolls
/// vertically when there are more.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryTable {
    rows: Vec<Entry>,
    visible_rows: usize,
    offset: usize,
}

impl HistoryTable {
    /// `sorted` must be ascending by date; rows are shown in reverse.
    pub fn new(sorted: &[Entry], visible_rows: usize) -> Self {
        HistoryTable {
            rows: sorted.iter().rev().copied().collect(),
            visible_rows: visible_rows.max(1),
            offset: 0,
        }
    }

    pub fn rows(&self) -> &[Entry] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn visible_rows(&self) -> usize {
        self.visible_rows
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Body scrolling is only enabled when rows exceed the window
    pub fn overflows(&self) -> bool {
        self.rows.len() > self.visible_rows
    }

    fn max_offset(&self) -> usize {
        self.rows.len().saturating_sub(self.visible_rows)
    }

    /// Scroll the body by `delta` rows. Returns whether the offset moved.
    pub fn scroll_by(&mut self, delta: isize) -> bool {
        if !self.overflows() {
            return false;
        }
        let next = self
            .offset
            .saturating_add_signed(delta)
            .min(self.max_offset());
        let changed = next != self.offset;
        self.offset = next;
        changed
    }

    /// Rows currently inside the body window
    pub fn window(&self) -> &[Entry] {
        let end = (self.offset + self.visible_rows).min(self.rows.len());
        &self.rows[self.offset..end]
    }

    /// Body rows reserved by the layout: the full window, even when fewer
    /// rows exist, so the block height only changes between empty and
    /// non-empty.
    pub fn body_height(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.visible_rows
        }
    }
}

/// Chart height balancing the rendered history block
pub fn chart_height_for(measured: f64, min: f64, max: f64) -> f64 {
    measured.max(min).min(max)
}
