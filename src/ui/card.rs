//! One tracker card: chart, scrollbar row and history block.
//!
//! Drawing a card also records its measured geometry on the tracker context,
//! which queues the after-paint work (scrollbar sync, chart height).

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders},
    Frame,
};

use super::chart::TrackerChart;
use super::history::{history_rows, HistoryView};
use super::scrollbar::{Scrollbar, ScrollbarLayout};
use super::theme::Theme;
use crate::data::TrackerId;
use crate::view::{cols_to_px, px_to_rows, rows_to_px, CardGeometry, FrameQueue, TrackerContext};

/// Screen areas of the card drawn last, kept for mouse hit-testing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardLayout {
    pub id: TrackerId,
    pub chart: Rect,
    pub scrollbar: ScrollbarLayout,
    pub history: Rect,
}

pub struct CardView<'a> {
    title: &'a str,
    max_labels: usize,
    dragging: bool,
    theme: &'a Theme,
}

impl<'a> CardView<'a> {
    pub fn new(title: &'a str, max_labels: usize, dragging: bool, theme: &'a Theme) -> Self {
        CardView {
            title,
            max_labels,
            dragging,
            theme,
        }
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        ctx: &mut TrackerContext,
        frames: &mut FrameQueue,
    ) -> CardLayout {
        let block = Block::default()
            .title(format!(" {} ", self.title))
            .borders(Borders::ALL)
            .border_style(self.theme.focused_border_style())
            .title_style(self.theme.title_style());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(px_to_rows(ctx.chart_height())), // Chart
                Constraint::Length(1),                              // Scrollbar
                Constraint::Length(history_rows(ctx.table())),      // Stats and table
                Constraint::Min(0),
            ])
            .split(inner);
        let scrollbar = ScrollbarLayout::new(chunks[1]);

        // Extents must match this frame before the chart window is taken
        ctx.record_geometry(
            CardGeometry {
                chart_width: cols_to_px(chunks[0].width),
                track_width: cols_to_px(scrollbar.track.width),
                history_height: rows_to_px(chunks[2].height),
            },
            frames,
        );

        if let Some(chart) = ctx.chart() {
            let window = chart.window(ctx.scroll().viewport().scroll_left(), self.max_labels);
            TrackerChart::new(&window, ctx.unit(), self.theme).render(frame, chunks[0]);
        }
        Scrollbar::new(ctx.scroll(), self.dragging, self.theme).render(frame, &scrollbar);
        HistoryView::new(ctx.stats(), ctx.table(), ctx.unit(), self.theme).render(frame, chunks[2]);

        CardLayout {
            id: ctx.id(),
            chart: chunks[0],
            scrollbar,
            history: chunks[2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::data::{Entry, Tracker};
    use chrono::NaiveDate;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let area = buffer.area;
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buffer[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn draw(
        terminal: &mut Terminal<TestBackend>,
        tracker: &Tracker,
        ctx: &mut TrackerContext,
        frames: &mut FrameQueue,
    ) -> CardLayout {
        let theme = Theme::default();
        let mut layout = None;
        terminal
            .draw(|f| {
                let area = f.area();
                layout = Some(
                    CardView::new(&tracker.title(), 8, false, &theme).render(f, area, ctx, frames),
                );
            })
            .unwrap();
        for task in frames.take() {
            ctx.apply(task, frames);
        }
        layout.unwrap()
    }

    #[test]
    fn test_new_tracker_card_shows_empty_state() {
        let tracker = Tracker::new(1, "Weight".into(), "kg".into());
        let mut frames = FrameQueue::new();
        let mut ctx = TrackerContext::new(&tracker, &Settings::default(), &mut frames);
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();

        let layout = draw(&mut terminal, &tracker, &mut ctx, &mut frames);
        let text = screen(&terminal);

        assert!(text.contains("Weight (kg)"));
        assert!(text.contains("No data yet."));
        // 220px minimum chart height
        assert_eq!(layout.chart.height, 7);
        assert_eq!(layout.history.height, 1);
        assert!(!ctx.scroll().track_visible());
    }

    #[test]
    fn test_first_entry_shows_stats() {
        let mut tracker = Tracker::new(1, "Weight".into(), "kg".into());
        let mut frames = FrameQueue::new();
        let mut ctx = TrackerContext::new(&tracker, &Settings::default(), &mut frames);
        let mut terminal = Terminal::new(TestBackend::new(90, 24)).unwrap();
        draw(&mut terminal, &tracker, &mut ctx, &mut frames);

        tracker
            .history
            .push(Entry::new(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(), 70.0));
        ctx.render(&tracker, &mut frames);
        let layout = draw(&mut terminal, &tracker, &mut ctx, &mut frames);
        let text = screen(&terminal);

        assert!(text.contains("Avg: 70.00 kg   Min: 70   Max: 70   Latest: 70   Growth: 0.00"));
        assert!(text.contains("2025-03-01"));
        // Stats, header and five body rows
        assert_eq!(layout.history.height, 7);
        assert_eq!(ctx.chart_height(), 224.0);
    }
}
