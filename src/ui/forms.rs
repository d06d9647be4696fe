//! Modal dialogs: new tracker form, add-result input, delete confirmation
//! and alerts.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap},
    Frame,
};

use super::theme::Theme;
use crate::form::{FormField, TextInput, TrackerForm};

/// Popup area taking the given share of `area`, centered in both directions
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let margin_y = (100 - percent_y) / 2;
    let margin_x = (100 - percent_x) / 2;
    let [_, row, _] = Layout::vertical([
        Constraint::Percentage(margin_y),
        Constraint::Percentage(percent_y),
        Constraint::Percentage(margin_y),
    ])
    .areas(area);
    let [_, popup, _] = Layout::horizontal([
        Constraint::Percentage(margin_x),
        Constraint::Percentage(percent_x),
        Constraint::Percentage(margin_x),
    ])
    .areas(row);
    popup
}

fn input_line(input: &TextInput, focused: bool) -> String {
    if focused {
        let (before, after) = input.split_at_cursor();
        format!("{before}█{after}")
    } else {
        input.value.clone()
    }
}

fn modal_block<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .title(format!(" {title} "))
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(theme.focused_border_style())
        .title_style(theme.title_style())
        .style(theme.surface_style())
        .padding(Padding::horizontal(1))
}

fn controls(pairs: &[(&str, &str)], theme: &Theme) -> Line<'static> {
    let mut spans = Vec::new();
    for (key, desc) in pairs {
        spans.push(Span::styled(key.to_string(), theme.key_style()));
        spans.push(Span::raw(format!(": {desc}  ")));
    }
    Line::from(spans)
}

/// New tracker form popup
pub struct TrackerFormView<'a> {
    form: &'a TrackerForm,
    theme: &'a Theme,
}

impl<'a> TrackerFormView<'a> {
    pub fn new(form: &'a TrackerForm, theme: &'a Theme) -> Self {
        TrackerFormView { form, theme }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup = centered_rect(60, 60, area);
        frame.render_widget(Clear, popup);

        let block = modal_block("New tracker", self.theme);
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let custom_visible = self.form.custom_unit_visible();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),                                 // Description
                Constraint::Length(3),                                 // Unit
                Constraint::Length(if custom_visible { 3 } else { 0 }), // Custom unit
                Constraint::Min(0),
                Constraint::Length(1), // Controls
            ])
            .split(inner);

        let field = |title: &'a str, text: String, focused: bool| {
            let border = if focused {
                self.theme.focused_border_style()
            } else {
                self.theme.border_style()
            };
            Paragraph::new(text).block(
                Block::default()
                    .title(format!(" {title} "))
                    .borders(Borders::ALL)
                    .border_style(border),
            )
        };

        frame.render_widget(
            field(
                "Description",
                input_line(&self.form.description, self.form.focus == FormField::Description),
                self.form.focus == FormField::Description,
            ),
            chunks[0],
        );

        let unit_text = match self.form.selected_unit() {
            Some(unit) => format!("◂ {unit} ▸"),
            None => "◂ Select unit ▸".to_string(),
        };
        frame.render_widget(
            field("Unit", unit_text, self.form.focus == FormField::Unit),
            chunks[1],
        );

        if custom_visible {
            frame.render_widget(
                field(
                    "Custom unit",
                    input_line(&self.form.custom_unit, self.form.focus == FormField::CustomUnit),
                    self.form.focus == FormField::CustomUnit,
                ),
                chunks[2],
            );
        }

        frame.render_widget(
            Paragraph::new(controls(
                &[("Tab", "Next field"), ("←/→", "Unit"), ("Enter", "Create"), ("Esc", "Cancel")],
                self.theme,
            )),
            chunks[4],
        );
    }
}

/// Add-result input popup
pub struct EntryInputView<'a> {
    input: &'a TextInput,
    unit: &'a str,
    theme: &'a Theme,
}

impl<'a> EntryInputView<'a> {
    pub fn new(input: &'a TextInput, unit: &'a str, theme: &'a Theme) -> Self {
        EntryInputView { input, unit, theme }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup = centered_rect(50, 30, area);
        frame.render_widget(Clear, popup);

        let block = modal_block("Add result", self.theme);
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(1)])
            .split(inner);

        let text = if self.input.value.is_empty() {
            Line::from(vec![
                Span::raw("█"),
                Span::styled(format!("Enter result in {}", self.unit), self.theme.muted_style()),
            ])
        } else {
            Line::from(input_line(self.input, true))
        };
        frame.render_widget(
            Paragraph::new(text).block(
                Block::default()
                    .title(" Value ")
                    .borders(Borders::ALL)
                    .border_style(self.theme.focused_border_style()),
            ),
            chunks[0],
        );
        frame.render_widget(
            Paragraph::new(controls(&[("Enter", "Add"), ("Esc", "Cancel")], self.theme)),
            chunks[2],
        );
    }
}

/// Yes/no confirmation popup
pub struct ConfirmView<'a> {
    message: &'a str,
    theme: &'a Theme,
}

impl<'a> ConfirmView<'a> {
    pub fn new(message: &'a str, theme: &'a Theme) -> Self {
        ConfirmView { message, theme }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup = centered_rect(50, 25, area);
        frame.render_widget(Clear, popup);

        let lines = vec![
            Line::from(""),
            Line::from(self.message),
            Line::from(""),
            controls(&[("y", "Yes"), ("n/Esc", "No")], self.theme),
        ];
        let paragraph = Paragraph::new(lines)
            .block(modal_block("Confirm", self.theme))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup);
    }
}

/// Blocking alert popup; any key dismisses it
pub struct AlertView<'a> {
    message: &'a str,
    theme: &'a Theme,
}

impl<'a> AlertView<'a> {
    pub fn new(message: &'a str, theme: &'a Theme) -> Self {
        AlertView { message, theme }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup = centered_rect(50, 25, area);
        frame.render_widget(Clear, popup);

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                self.message,
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            controls(&[("Enter", "OK")], self.theme),
        ];
        let paragraph = Paragraph::new(lines)
            .block(modal_block("Alert", self.theme))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup);
    }
}
