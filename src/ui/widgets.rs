//! Sidebar and status bar widgets for the tracker dashboard.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::theme::Theme;
use crate::data::Tracker;

/// Tracker list panel widget
pub struct TrackerList<'a> {
    trackers: &'a [Tracker],
    selected: usize,
    theme: &'a Theme,
}

impl<'a> TrackerList<'a> {
    pub fn new(trackers: &'a [Tracker], selected: usize, theme: &'a Theme) -> Self {
        TrackerList {
            trackers,
            selected,
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let items: Vec<ListItem> = self
            .trackers
            .iter()
            .map(|t| ListItem::new(format!("{} ({})", t.title(), t.history.len())))
            .collect();

        let (border_style, title_style) = self.theme.panel_styles(focused);
        let block = Block::default()
            .title(format!(" Trackers ({}) ", self.trackers.len()))
            .borders(Borders::ALL)
            .border_type(if focused {
                BorderType::Double
            } else {
                BorderType::Plain
            })
            .border_style(border_style)
            .title_style(title_style);

        if self.trackers.is_empty() {
            let hint = Paragraph::new("Press [n] to add a tracker")
                .style(self.theme.muted_style())
                .block(block);
            frame.render_widget(hint, area);
            return;
        }

        let list = List::new(items)
            .block(block)
            .highlight_style(self.theme.highlight_style())
            .highlight_symbol("> ");

        let mut state = ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }
}

/// Status bar widget
pub struct StatusBar<'a> {
    tracker: Option<&'a str>,
    error: Option<&'a str>,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    pub fn new(tracker: Option<&'a str>, error: Option<&'a str>, theme: &'a Theme) -> Self {
        StatusBar {
            tracker,
            error,
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let line = if let Some(e) = self.error {
            Line::from(Span::styled(format!("Error: {e}"), self.theme.error_style()))
        } else {
            let mut spans = vec![Span::styled("progress-tui", self.theme.title_style())];
            if let Some(t) = self.tracker {
                spans.push(Span::raw(format!(": {t}")));
            }
            spans.push(Span::raw(" | "));
            for (key, desc) in [("n", "New"), ("a", "Add result"), ("d", "Delete"), ("h", "Help"), ("q", "Quit")] {
                spans.push(Span::styled(format!("[{key}]"), self.theme.key_style()));
                spans.push(Span::raw(format!(" {desc} ")));
            }
            Line::from(spans)
        };

        let paragraph = Paragraph::new(line).block(Block::default().borders(Borders::TOP));

        frame.render_widget(paragraph, area);
    }
}
