//! Horizontal scrollbar row: left arrow, track with thumb, right arrow.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    text::Span,
    widgets::Paragraph,
    Frame,
};

use super::theme::Theme;
use crate::view::{px_to_col, scroll::ScrollSync};

const ARROW_WIDTH: u16 = 3;

/// Screen areas of the scrollbar parts, kept for mouse hit-testing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollbarLayout {
    pub left_arrow: Rect,
    pub track: Rect,
    pub right_arrow: Rect,
}

impl ScrollbarLayout {
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(ARROW_WIDTH),
                Constraint::Min(0),
                Constraint::Length(ARROW_WIDTH),
            ])
            .split(area);
        ScrollbarLayout {
            left_arrow: chunks[0],
            track: chunks[1],
            right_arrow: chunks[2],
        }
    }
}

/// Scrollbar widget over a tracker's scroll state
pub struct Scrollbar<'a> {
    scroll: &'a ScrollSync,
    dragging: bool,
    theme: &'a Theme,
}

impl<'a> Scrollbar<'a> {
    pub fn new(scroll: &'a ScrollSync, dragging: bool, theme: &'a Theme) -> Self {
        Scrollbar {
            scroll,
            dragging,
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, layout: &ScrollbarLayout) {
        let arrow_style = if self.scroll.is_arrow_held() {
            self.theme.thumb_style(true)
        } else {
            self.theme.normal_style()
        };
        frame.render_widget(Paragraph::new(Span::styled(" ◀ ", arrow_style)), layout.left_arrow);
        frame.render_widget(Paragraph::new(Span::styled(" ▶ ", arrow_style)), layout.right_arrow);

        // No overflow: no dead scrollbar
        if !self.scroll.track_visible() {
            return;
        }
        self.render_track(frame.buffer_mut(), layout.track);
    }

    fn render_track(&self, buf: &mut Buffer, track: Rect) {
        if track.width == 0 || track.height == 0 {
            return;
        }
        let thumb = self.scroll.thumb();
        let start = px_to_col(thumb.left).min(track.width - 1);
        let end = px_to_col((thumb.left + thumb.width - 0.01).max(thumb.left)).min(track.width - 1);

        for col in 0..track.width {
            let (symbol, style) = if (start..=end).contains(&col) {
                ("█", self.theme.thumb_style(self.dragging))
            } else {
                ("─", ratatui::style::Style::default().fg(self.theme.track))
            };
            if let Some(cell) = buf.cell_mut((track.x + col, track.y)) {
                cell.set_symbol(symbol).set_style(style);
            }
        }
    }
}
