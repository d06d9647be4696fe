//! Stats line and history table with a pinned header.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{
        Paragraph, Row, Scrollbar, ScrollbarOrientation, ScrollbarState, Table,
    },
    Frame,
};

use super::theme::Theme;
use crate::view::history::{format_value, HistoryStats, HistoryTable};

/// Rows the block needs: the "No data yet." line, or stats, header and the
/// body window.
pub fn history_rows(table: &HistoryTable) -> u16 {
    if table.is_empty() {
        1
    } else {
        u16::try_from(table.body_height())
            .unwrap_or(u16::MAX)
            .saturating_add(2)
    }
}

/// Stats and table for one tracker
pub struct HistoryView<'a> {
    stats: Option<&'a HistoryStats>,
    table: &'a HistoryTable,
    unit: &'a str,
    theme: &'a Theme,
}

impl<'a> HistoryView<'a> {
    pub fn new(
        stats: Option<&'a HistoryStats>,
        table: &'a HistoryTable,
        unit: &'a str,
        theme: &'a Theme,
    ) -> Self {
        HistoryView {
            stats,
            table,
            unit,
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let Some(stats) = self.stats.filter(|_| !self.table.is_empty()) else {
            frame.render_widget(Paragraph::new("No data yet.").style(self.theme.muted_style()), area);
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Stats
                Constraint::Min(0),    // Table
            ])
            .split(area);

        let mut spans = Vec::new();
        for (label, value) in stats.fields(self.unit) {
            spans.push(Span::styled(
                format!("{label}: "),
                Style::default().add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::raw(format!("{value}   ")));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), chunks[0]);

        self.render_table(frame, chunks[1]);
    }

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        let rows: Vec<Row> = self
            .table
            .window()
            .iter()
            .map(|e| Row::new(vec![e.date_label(), format_value(e.value)]))
            .collect();

        // Header stays in place while the body window moves
        let table = Table::new(rows, [Constraint::Length(12), Constraint::Min(8)]).header(
            Row::new(vec!["Date", "Value"]).style(self.theme.title_style()),
        );
        frame.render_widget(table, area);

        if self.table.overflows() {
            let body = Rect {
                y: area.y.saturating_add(1),
                height: area.height.saturating_sub(1),
                ..area
            };
            let mut state = ScrollbarState::new(self.table.rows().len() - self.table.visible_rows() + 1)
                .position(self.table.offset());
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                body,
                &mut state,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Entry;
    use chrono::NaiveDate;
    use ratatui::{backend::TestBackend, Terminal};

    fn entries(values: &[f64]) -> Vec<Entry> {
        let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| Entry::new(start + chrono::Days::new(i as u64), v))
            .collect()
    }

    fn draw(sorted: &[Entry], width: u16, height: u16) -> Vec<String> {
        let stats = HistoryStats::compute(sorted);
        let table = HistoryTable::new(sorted, 5);
        let theme = Theme::default();
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                HistoryView::new(stats.as_ref(), &table, "kg", &theme).render(f, area)
            })
            .unwrap();
        let buffer = terminal.backend().buffer();
        (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| buffer[(x, y)].symbol().to_string())
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect()
    }

    #[test]
    fn test_history_rows_saturate() {
        let sorted = entries(&[1.0, 2.0]);
        assert_eq!(history_rows(&HistoryTable::new(&[], 5)), 1);
        assert_eq!(history_rows(&HistoryTable::new(&sorted, 5)), 7);
        assert_eq!(history_rows(&HistoryTable::new(&sorted, 70_000)), u16::MAX);
    }

    #[test]
    fn test_empty_history_message() {
        let lines = draw(&[], 30, 1);
        assert_eq!(lines[0], "No data yet.");
        assert_eq!(history_rows(&HistoryTable::new(&[], 5)), 1);
    }

    #[test]
    fn test_stats_and_newest_first_rows() {
        let sorted = entries(&[70.0, 72.0]);
        let lines = draw(&sorted, 90, 7);
        assert_eq!(
            lines[0],
            "Avg: 71.00 kg   Min: 70   Max: 72   Latest: 72   Growth: 2.00"
        );
        assert!(lines[1].starts_with("Date"));
        assert!(lines[2].starts_with("2025-06-02") && lines[2].ends_with("72"));
        assert!(lines[3].starts_with("2025-06-01") && lines[3].ends_with("70"));
        assert_eq!(history_rows(&HistoryTable::new(&sorted, 5)), 7);
    }

    #[test]
    fn test_body_shows_five_rows() {
        let values: Vec<f64> = (1..=9).map(f64::from).collect();
        let lines = draw(&entries(&values), 60, 7);
        assert!(lines[2].starts_with("2025-06-09"));
        assert!(lines[6].starts_with("2025-06-05"));
    }
}
