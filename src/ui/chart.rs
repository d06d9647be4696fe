//! Line chart widget for the visible window of a tracker's history.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use super::theme::Theme;
use crate::view::chart::ChartWindow;

/// Chart widget drawing one window of a chart instance
pub struct TrackerChart<'a> {
    window: &'a ChartWindow,
    unit: &'a str,
    theme: &'a Theme,
}

impl<'a> TrackerChart<'a> {
    pub fn new(window: &'a ChartWindow, unit: &'a str, theme: &'a Theme) -> Self {
        TrackerChart {
            window,
            unit,
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if self.window.data.is_empty() {
            self.render_empty(frame, area);
            return;
        }

        let mut datasets = vec![Dataset::default()
            .name(self.unit)
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(self.theme.line))
            .data(&self.window.data)];

        // Dense series drop the point markers and keep only the line
        if !self.window.many_points {
            datasets.push(
                Dataset::default()
                    .marker(Marker::Dot)
                    .graph_type(GraphType::Scatter)
                    .style(Style::default().fg(self.theme.point))
                    .data(&self.window.data),
            );
        }

        let [y_min, y_max] = self.window.y_bounds;
        let y_labels = vec![
            Span::raw(format_value(y_min)),
            Span::raw(format_value((y_min + y_max) / 2.0)),
            Span::raw(format_value(y_max)),
        ];
        let x_labels: Vec<Span> = self.window.labels.iter().map(|l| Span::raw(l.as_str())).collect();

        let chart = Chart::new(datasets)
            .x_axis(
                Axis::default()
                    .style(self.theme.normal_style())
                    .bounds(self.window.x_bounds)
                    .labels(x_labels),
            )
            .y_axis(
                Axis::default()
                    .title(Span::styled(self.unit, Style::default().add_modifier(Modifier::DIM)))
                    .style(self.theme.normal_style())
                    .bounds(self.window.y_bounds)
                    .labels(y_labels),
            );

        frame.render_widget(chart, area);
    }

    fn render_empty(&self, frame: &mut Frame, area: Rect) {
        let message = Paragraph::new("No data yet")
            .style(Style::default().add_modifier(Modifier::DIM))
            .alignment(Alignment::Center);

        let middle = Rect {
            y: area.y + area.height / 2,
            height: area.height.min(1),
            ..area
        };
        frame.render_widget(message, middle);
    }
}

/// Format a value for display on axis labels
fn format_value(value: f64) -> String {
    if value.abs() < 0.001 && value != 0.0 {
        format!("{:.2e}", value)
    } else if value.abs() >= 10_000.0 {
        format!("{:.2e}", value)
    } else if value.abs() >= 1.0 || value == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{:.3}", value)
    }
}
