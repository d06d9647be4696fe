//! Chart instances: horizontal content sizing, drawing surface and the
//! visible window of points.
//!
//! A chart's content grows wider with its point count instead of squeezing
//! points together; the viewport scrolls across it.

use chrono::NaiveDate;

use crate::data::Tracker;

/// Series longer than this are drawn with small point markers
pub const MANY_POINTS: usize = 60;

/// Upper bound on plotted samples per window after decimation
pub const DECIMATION_SAMPLES: usize = 200;

/// Headroom added above the largest value
const Y_GRACE: f64 = 0.15;

/// Horizontal logical pixels allotted per point, decreasing stepwise as the
/// series grows.
pub fn px_per_point(count: usize) -> f64 {
    match count {
        0..=30 => 60.0,
        31..=80 => 40.0,
        81..=200 => 28.0,
        _ => 18.0,
    }
}

/// Width of the scrollable chart content for `count` points
pub fn content_width(visible_width: f64, count: usize) -> f64 {
    visible_width.max(count as f64 * px_per_point(count))
}

/// Drawing surface with logical size and physical (DPR-scaled) size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub css_width: f64,
    pub css_height: f64,
    pub dpr: f64,
}

impl Surface {
    pub fn new(css_width: f64, css_height: f64, dpr: f64) -> Self {
        Surface {
            css_width,
            css_height,
            dpr: if dpr > 0.0 { dpr } else { 1.0 },
        }
    }

    pub fn pixel_width(&self) -> u32 {
        physical(self.css_width, self.dpr)
    }

    pub fn pixel_height(&self) -> u32 {
        physical(self.css_height, self.dpr)
    }
}

fn physical(css: f64, dpr: f64) -> u32 {
    ((css * dpr).floor() as u32).max(1)
}

/// One plotted sample at its horizontal content position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPoint {
    pub x: f64,
    pub value: f64,
    pub date: NaiveDate,
}

/// The slice of a chart currently inside the viewport
#[derive(Debug, Clone, PartialEq)]
pub struct ChartWindow {
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    /// Window points plus one neighbor on each side so edge segments reach
    /// the border
    pub data: Vec<(f64, f64)>,
    pub labels: Vec<String>,
    pub many_points: bool,
}

/// A built chart for one tracker. Rebuilt from scratch on every data change.
#[derive(Debug, Clone)]
pub struct ChartInstance {
    generation: u64,
    values: Vec<(NaiveDate, f64)>,
    points: Vec<ChartPoint>,
    visible_width: f64,
    content_width: f64,
    surface: Surface,
}

impl ChartInstance {
    /// Build a chart over the tracker's date-sorted history
    pub fn build(
        tracker: &Tracker,
        visible_width: f64,
        css_height: f64,
        dpr: f64,
        generation: u64,
    ) -> Self {
        let values = tracker
            .sorted_history()
            .into_iter()
            .map(|e| (e.date, e.value))
            .collect();

        let mut chart = ChartInstance {
            generation,
            values,
            points: Vec::new(),
            visible_width: 0.0,
            content_width: 0.0,
            surface: Surface::new(0.0, 0.0, dpr),
        };
        chart.resize(visible_width, css_height);
        chart
    }

    /// Recompute content width, point positions and the drawing surface
    /// for a new viewport size. Data is unchanged.
    pub fn resize(&mut self, visible_width: f64, css_height: f64) {
        let count = self.values.len();
        self.visible_width = visible_width.max(0.0);
        self.content_width = content_width(self.visible_width, count);
        self.surface = Surface::new(self.content_width, css_height.max(0.0), self.surface.dpr);

        let slot = if count == 0 {
            0.0
        } else {
            self.content_width / count as f64
        };
        self.points = self
            .values
            .iter()
            .enumerate()
            .map(|(i, &(date, value))| ChartPoint {
                x: (i as f64 + 0.5) * slot,
                value,
                date,
            })
            .collect();
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn content_width(&self) -> f64 {
        self.content_width
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    pub fn many_points(&self) -> bool {
        self.points.len() > MANY_POINTS
    }

    /// Y axis starts at zero with headroom above the maximum
    pub fn y_bounds(&self) -> [f64; 2] {
        let max = self.points.iter().map(|p| p.value).fold(0.0_f64, f64::max);
        if max <= 0.0 {
            [0.0, 1.0]
        } else {
            [0.0, max * (1.0 + Y_GRACE)]
        }
    }

    /// Points and labels visible with the viewport scrolled to `scroll_left`
    pub fn window(&self, scroll_left: f64, max_labels: usize) -> ChartWindow {
        let left = scroll_left;
        let right = scroll_left + self.visible_width.max(1.0);

        let first = self.points.iter().position(|p| p.x >= left);
        let last = self.points.iter().rposition(|p| p.x <= right);

        let (data, visible): (Vec<(f64, f64)>, &[ChartPoint]) = match (first, last) {
            (Some(first), Some(last)) if first <= last => {
                let from = first.saturating_sub(1);
                let to = (last + 1).min(self.points.len() - 1);
                let data = self.points[from..=to].iter().map(|p| (p.x, p.value)).collect();
                (data, &self.points[first..=last])
            }
            _ => (Vec::new(), &[]),
        };

        let samples = DECIMATION_SAMPLES.min(physical(self.visible_width, self.surface.dpr) as usize);
        let data = if data.len() > samples {
            lttb(&data, samples)
        } else {
            data
        };

        ChartWindow {
            x_bounds: [left, right],
            y_bounds: self.y_bounds(),
            data,
            labels: tick_labels(visible, max_labels),
            many_points: self.many_points(),
        }
    }
}

/// Evenly spaced date labels across the visible points
fn tick_labels(visible: &[ChartPoint], max_labels: usize) -> Vec<String> {
    let count = visible.len().min(max_labels);
    match count {
        0 => Vec::new(),
        1 => vec![visible[0].date.format("%Y-%m-%d").to_string()],
        _ => (0..count)
            .map(|k| {
                let idx = k * (visible.len() - 1) / (count - 1);
                visible[idx].date.format("%Y-%m-%d").to_string()
            })
            .collect(),
    }
}

/// Largest-Triangle-Three-Buckets downsampling. Keeps the first and last
/// points and picks, per bucket, the point forming the largest triangle with
/// its neighbors.
pub fn lttb(data: &[(f64, f64)], threshold: usize) -> Vec<(f64, f64)> {
    if threshold >= data.len() || threshold < 3 {
        return data.to_vec();
    }

    let mut sampled = Vec::with_capacity(threshold);
    let bucket_size = (data.len() - 2) as f64 / (threshold - 2) as f64;
    let mut a = 0;
    sampled.push(data[0]);

    for i in 0..threshold - 2 {
        // Average of the next bucket
        let next_start = ((i + 1) as f64 * bucket_size) as usize + 1;
        let next_end = (((i + 2) as f64 * bucket_size) as usize + 1).min(data.len());
        let next = &data[next_start.min(next_end - 1)..next_end];
        let avg_x = next.iter().map(|p| p.0).sum::<f64>() / next.len() as f64;
        let avg_y = next.iter().map(|p| p.1).sum::<f64>() / next.len() as f64;

        let start = (i as f64 * bucket_size) as usize + 1;
        let end = (((i + 1) as f64 * bucket_size) as usize + 1).min(data.len() - 1);

        let (ax, ay) = data[a];
        let mut best = start;
        let mut best_area = -1.0;
        for (j, &(x, y)) in data.iter().enumerate().take(end).skip(start) {
            let area = ((ax - avg_x) * (y - ay) - (ax - x) * (avg_y - ay)).abs();
            if area > best_area {
                best_area = area;
                best = j;
            }
        }

        sampled.push(data[best]);
        a = best;
    }

    sampled.push(data[data.len() - 1]);
    sampled
}
