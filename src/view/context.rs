//! Per-tracker view state.
//!
//! Each tracker owns one context holding its chart instance, scrollbar,
//! history table and the geometry measured on the last frame. Contexts are
//! created when a tracker is first shown and torn down when it is deleted.

use crate::config::Settings;
use crate::data::{Tracker, TrackerId};

use super::chart::ChartInstance;
use super::frame::{FrameQueue, FrameTask};
use super::history::{chart_height_for, HistoryStats, HistoryTable};
use super::scroll::ScrollSync;

/// Sizes measured while drawing a card, in logical pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardGeometry {
    /// Inner width of the chart viewport
    pub chart_width: f64,
    /// Length of the scrollbar track between the arrows
    pub track_width: f64,
    /// Rendered height of the stats and table block
    pub history_height: f64,
}

pub struct TrackerContext {
    id: TrackerId,
    unit: String,
    chart: Option<ChartInstance>,
    generation: u64,
    scroll: ScrollSync,
    table: HistoryTable,
    stats: Option<HistoryStats>,
    chart_height: f64,
    geometry: Option<CardGeometry>,
    settings: Settings,
}

impl TrackerContext {
    pub fn new(tracker: &Tracker, settings: &Settings, frames: &mut FrameQueue) -> Self {
        let mut ctx = TrackerContext {
            id: tracker.id,
            unit: tracker.unit.clone(),
            chart: None,
            generation: 0,
            scroll: ScrollSync::new(settings.scrollbar.clone()),
            table: HistoryTable::new(&[], settings.table.visible_rows),
            stats: None,
            chart_height: settings.chart.min_height,
            geometry: None,
            settings: settings.clone(),
        };
        ctx.render(tracker, frames);
        ctx
    }

    /// Rebuild chart, stats and table from the tracker's data.
    ///
    /// The previous chart instance is dropped before the new one is built.
    pub fn render(&mut self, tracker: &Tracker, frames: &mut FrameQueue) {
        if let Some(previous) = self.chart.take() {
            tracing::trace!(id = self.id, generation = previous.generation(), "destroying chart");
        }

        self.generation += 1;
        let visible = self.geometry.map_or(0.0, |g| g.chart_width);
        let chart = ChartInstance::build(
            tracker,
            visible,
            self.chart_height,
            self.settings.chart.dpr,
            self.generation,
        );
        tracing::debug!(
            id = self.id,
            generation = self.generation,
            points = chart.len(),
            content_width = chart.content_width(),
            surface_px = ?(chart.surface().pixel_width(), chart.surface().pixel_height()),
            "built chart"
        );
        self.scroll.set_extent(chart.content_width(), visible);
        self.chart = Some(chart);

        let sorted = tracker.sorted_history();
        self.stats = HistoryStats::compute(&sorted);
        self.table = HistoryTable::new(&sorted, self.settings.table.visible_rows);
        self.unit = tracker.unit.clone();

        frames.request(FrameTask::JumpToLatest(self.id));
        frames.request(FrameTask::SyncScrollbar(self.id));
        frames.request(FrameTask::SyncChartHeight(self.id));
    }

    /// Record the geometry of the frame being drawn. Returns whether it
    /// differs from the previous frame.
    pub fn record_geometry(&mut self, geometry: CardGeometry, frames: &mut FrameQueue) -> bool {
        if self.geometry == Some(geometry) {
            return false;
        }

        let width_changed = self
            .geometry
            .map_or(true, |g| g.chart_width != geometry.chart_width);
        self.geometry = Some(geometry);

        if width_changed {
            if let Some(chart) = self.chart.as_mut() {
                chart.resize(geometry.chart_width, self.chart_height);
                self.scroll
                    .set_extent(chart.content_width(), geometry.chart_width);
            }
        }
        self.scroll.set_track_width(geometry.track_width);

        frames.request(FrameTask::SyncScrollbar(self.id));
        frames.request(FrameTask::SyncChartHeight(self.id));
        true
    }

    /// Run one after-paint task. Returns whether anything visible changed.
    pub fn apply(&mut self, task: FrameTask, frames: &mut FrameQueue) -> bool {
        match task {
            FrameTask::JumpToLatest(_) => self.scroll.jump_to_end(),
            FrameTask::SyncScrollbar(_) => {
                let before = (self.scroll.thumb(), self.scroll.track_visible());
                self.scroll.update_metrics();
                self.scroll.sync_thumb_from_scroll();
                before != (self.scroll.thumb(), self.scroll.track_visible())
            }
            FrameTask::SyncChartHeight(_) => {
                let Some(geometry) = self.geometry else {
                    return false;
                };
                let target = chart_height_for(
                    geometry.history_height,
                    self.settings.chart.min_height,
                    self.settings.chart.max_height,
                );
                if (target - self.chart_height).abs() < f64::EPSILON {
                    return false;
                }
                tracing::trace!(id = self.id, from = self.chart_height, to = target, "chart height");
                self.chart_height = target;
                if let Some(chart) = self.chart.as_mut() {
                    chart.resize(geometry.chart_width, target);
                }
                // Settle once more after the resized frame is painted
                frames.request(FrameTask::ResizeChart(self.id));
                true
            }
            FrameTask::ResizeChart(_) => {
                if let (Some(chart), Some(geometry)) = (self.chart.as_mut(), self.geometry) {
                    chart.resize(geometry.chart_width, self.chart_height);
                    self.scroll
                        .set_extent(chart.content_width(), geometry.chart_width);
                }
                false
            }
        }
    }

    /// Release the chart and stop timers
    pub fn teardown(&mut self) {
        self.scroll.teardown();
        if let Some(chart) = self.chart.take() {
            tracing::debug!(id = self.id, generation = chart.generation(), "released chart");
        }
    }

    pub fn id(&self) -> TrackerId {
        self.id
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn chart(&self) -> Option<&ChartInstance> {
        self.chart.as_ref()
    }

    pub fn scroll(&self) -> &ScrollSync {
        &self.scroll
    }

    pub fn scroll_mut(&mut self) -> &mut ScrollSync {
        &mut self.scroll
    }

    pub fn table(&self) -> &HistoryTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut HistoryTable {
        &mut self.table
    }

    pub fn stats(&self) -> Option<&HistoryStats> {
        self.stats.as_ref()
    }

    /// Chart viewport height in logical pixels
    pub fn chart_height(&self) -> f64 {
        self.chart_height
    }

    pub fn geometry(&self) -> Option<CardGeometry> {
        self.geometry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Entry;
    use chrono::NaiveDate;

    fn tracker(values: &[f64]) -> Tracker {
        let mut tracker = Tracker::new(7, "Weight".into(), "kg".into());
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        for (i, &v) in values.iter().enumerate() {
            tracker
                .history
                .push(Entry::new(start + chrono::Days::new(i as u64), v));
        }
        tracker
    }

    fn drain(ctx: &mut TrackerContext, frames: &mut FrameQueue) {
        for _ in 0..4 {
            for task in frames.take() {
                ctx.apply(task, frames);
            }
        }
    }

    fn geometry(history_height: f64) -> CardGeometry {
        CardGeometry {
            chart_width: 640.0,
            track_width: 600.0,
            history_height,
        }
    }

    #[test]
    fn test_each_render_replaces_chart_instance() {
        let settings = Settings::default();
        let mut frames = FrameQueue::new();
        let mut t = tracker(&[70.0]);
        let mut ctx = TrackerContext::new(&t, &settings, &mut frames);
        assert_eq!(ctx.chart().unwrap().generation(), 1);

        t.history.push(Entry::new(NaiveDate::from_ymd_opt(2025, 1, 9).unwrap(), 71.0));
        ctx.render(&t, &mut frames);
        let chart = ctx.chart().unwrap();
        assert_eq!(chart.generation(), 2);
        assert_eq!(chart.len(), 2);
    }

    #[test]
    fn test_first_paint_jumps_to_latest() {
        let settings = Settings::default();
        let mut frames = FrameQueue::new();
        let values: Vec<f64> = (1..=40).map(f64::from).collect();
        let mut ctx = TrackerContext::new(&tracker(&values), &settings, &mut frames);

        ctx.record_geometry(geometry(288.0), &mut frames);
        drain(&mut ctx, &mut frames);

        // 40 points at 40px = 1600px content in a 640px viewport
        let viewport = ctx.scroll().viewport();
        assert_eq!(viewport.content_width(), 1600.0);
        assert_eq!(viewport.scroll_left(), 960.0);
        assert!(ctx.scroll().track_visible());
        let thumb = ctx.scroll().thumb();
        assert_eq!(thumb.left + thumb.width, 600.0);
    }

    #[test]
    fn test_resize_keeps_offset_and_rederives_thumb() {
        let settings = Settings::default();
        let mut frames = FrameQueue::new();
        let values: Vec<f64> = (1..=40).map(f64::from).collect();
        let mut ctx = TrackerContext::new(&tracker(&values), &settings, &mut frames);
        ctx.record_geometry(geometry(288.0), &mut frames);
        drain(&mut ctx, &mut frames);
        assert_eq!(ctx.scroll().viewport().scroll_left(), 960.0);

        // Narrower: more room to scroll, the offset stays put instead of
        // jumping to the new end
        let narrow = CardGeometry {
            chart_width: 480.0,
            ..geometry(288.0)
        };
        assert!(ctx.record_geometry(narrow, &mut frames));
        drain(&mut ctx, &mut frames);
        let viewport = ctx.scroll().viewport();
        assert_eq!(viewport.max_scroll(), 1120.0);
        assert_eq!(viewport.scroll_left(), 960.0);
        assert_eq!(ctx.chart().unwrap().content_width(), 1600.0);
        let thumb = ctx.scroll().thumb();
        // 480 of 1600 visible on a 600px track
        assert_eq!(thumb.width, 180.0);
        assert!((thumb.left - 960.0 / 1120.0 * 420.0).abs() < 1e-6);

        // Wider: the offset clamps to the smaller range
        let wide = CardGeometry {
            chart_width: 1200.0,
            ..geometry(288.0)
        };
        ctx.record_geometry(wide, &mut frames);
        drain(&mut ctx, &mut frames);
        assert_eq!(ctx.scroll().viewport().scroll_left(), 400.0);
        let thumb = ctx.scroll().thumb();
        assert_eq!(thumb.width, 450.0);
        assert_eq!(thumb.left + thumb.width, 600.0);
    }

    #[test]
    fn test_chart_height_follows_history_block() {
        let settings = Settings::default();
        let mut frames = FrameQueue::new();
        let mut ctx = TrackerContext::new(&tracker(&[1.0, 2.0]), &settings, &mut frames);

        // Not measured yet: height change is a no-op
        drain(&mut ctx, &mut frames);
        assert_eq!(ctx.chart_height(), 220.0);

        ctx.record_geometry(geometry(288.0), &mut frames);
        drain(&mut ctx, &mut frames);
        assert_eq!(ctx.chart_height(), 288.0);
        assert_eq!(ctx.chart().unwrap().surface().css_height, 288.0);

        ctx.record_geometry(geometry(2000.0), &mut frames);
        drain(&mut ctx, &mut frames);
        assert_eq!(ctx.chart_height(), 480.0);

        ctx.record_geometry(geometry(96.0), &mut frames);
        drain(&mut ctx, &mut frames);
        assert_eq!(ctx.chart_height(), 220.0);
    }

    #[test]
    fn test_content_that_fits_hides_track() {
        let settings = Settings::default();
        let mut frames = FrameQueue::new();
        let mut ctx = TrackerContext::new(&tracker(&[70.0, 72.0]), &settings, &mut frames);
        ctx.record_geometry(geometry(288.0), &mut frames);
        drain(&mut ctx, &mut frames);

        assert_eq!(ctx.chart().unwrap().content_width(), 640.0);
        assert!(!ctx.scroll().track_visible());
    }

    #[test]
    fn test_unchanged_geometry_is_ignored() {
        let settings = Settings::default();
        let mut frames = FrameQueue::new();
        let mut ctx = TrackerContext::new(&tracker(&[1.0]), &settings, &mut frames);
        assert!(ctx.record_geometry(geometry(100.0), &mut frames));
        drain(&mut ctx, &mut frames);
        assert!(!ctx.record_geometry(geometry(100.0), &mut frames));
        assert!(frames.is_empty());
    }

    #[test]
    fn test_teardown_releases_chart() {
        let settings = Settings::default();
        let mut frames = FrameQueue::new();
        let mut ctx = TrackerContext::new(&tracker(&[1.0]), &settings, &mut frames);
        ctx.teardown();
        assert!(ctx.chart().is_none());
        assert!(!ctx.scroll().is_animating());
    }
}
