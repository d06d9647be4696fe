//! Key and mouse bindings overlay.

use ratatui::{
    layout::{Alignment, Constraint, Rect},
    text::Line,
    widgets::{Block, Borders, Cell, Clear, Row, Table},
    Frame,
};

use super::forms::centered_rect;
use super::theme::Theme;

const BINDINGS: &[(&str, &[(&str, &str)])] = &[
    (
        "Trackers",
        &[
            ("j / ↓  k / ↑", "Select tracker"),
            ("n", "New tracker"),
            ("a", "Add today's result"),
            ("d", "Delete tracker"),
        ],
    ),
    (
        "Chart",
        &[
            ("← / →", "Step through the chart"),
            ("End", "Jump to latest"),
            ("Wheel", "Scroll chart sideways, or history rows"),
            ("Drag", "Pan the chart or move the thumb"),
        ],
    ),
    ("History", &[("PgUp / PgDn", "Page through results")]),
    ("General", &[("h / ?", "Toggle this help"), ("q", "Quit")]),
];

pub struct HelpOverlay<'a> {
    theme: &'a Theme,
}

impl<'a> HelpOverlay<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        HelpOverlay { theme }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup = centered_rect(60, 70, area);
        frame.render_widget(Clear, popup);

        let mut rows = Vec::new();
        for (section, items) in BINDINGS {
            rows.push(Row::new([Cell::from(Line::styled(*section, self.theme.title_style()))]));
            rows.extend(items.iter().map(|(key, action)| {
                Row::new([
                    Cell::from(format!("  {key}")).style(self.theme.key_style()),
                    Cell::from(*action),
                ])
            }));
            rows.push(Row::default());
        }

        let table = Table::new(rows, [Constraint::Length(16), Constraint::Fill(1)]).block(
            Block::default()
                .title(" Help ")
                .title_alignment(Alignment::Center)
                .borders(Borders::ALL)
                .border_style(self.theme.border_style())
                .title_style(self.theme.title_style())
                .style(self.theme.surface_style()),
        );
        frame.render_widget(table, popup);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_lists_every_binding() {
        let theme = Theme::default();
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                HelpOverlay::new(&theme).render(f, area)
            })
            .unwrap();
        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();

        for (section, items) in BINDINGS {
            assert!(text.contains(section), "{section}");
            for (_, action) in items.iter() {
                assert!(text.contains(action), "{action}");
            }
        }
    }
}
