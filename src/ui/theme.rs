//! Theme configuration for the TUI.

use ratatui::style::{Color, Modifier, Style};

/// Color theme for the application
#[derive(Debug, Clone)]
pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub highlight_bg: Color,
    pub highlight_fg: Color,
    pub border: Color,
    pub title: Color,
    pub muted: Color,
    pub error: Color,
    pub line: Color,
    pub point: Color,
    pub track: Color,
    pub thumb: Color,
    pub thumb_active: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            bg: Color::Reset,
            fg: Color::White,
            highlight_bg: Color::Rgb(60, 60, 80),
            highlight_fg: Color::White,
            border: Color::Rgb(100, 100, 120),
            title: Color::Cyan,
            muted: Color::DarkGray,
            error: Color::Red,
            // Using named colors instead of RGB for better terminal compatibility
            line: Color::LightBlue,
            point: Color::Cyan,
            track: Color::DarkGray,
            thumb: Color::Gray,
            thumb_active: Color::LightBlue,
        }
    }
}

impl Theme {
    /// Base surface style used to paint widget backgrounds
    pub fn surface_style(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    /// Convenience helper returning (border_style, title_style) for focus state
    pub fn panel_styles(&self, focused: bool) -> (Style, Style) {
        if focused {
            (self.focused_border_style(), self.focused_border_style())
        } else {
            (self.border_style(), self.dimmed_title_style())
        }
    }

    /// Get style for normal text
    pub fn normal_style(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    /// Get style for highlighted/selected items
    pub fn highlight_style(&self) -> Style {
        Style::default()
            .fg(self.highlight_fg)
            .bg(self.highlight_bg)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for borders
    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    /// Get style for focused panel borders (distinct from normal borders)
    pub fn focused_border_style(&self) -> Style {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for titles
    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.title)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for unfocused/dimmed titles
    pub fn dimmed_title_style(&self) -> Style {
        Style::default()
            .fg(self.border)
            .add_modifier(Modifier::DIM)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn key_style(&self) -> Style {
        Style::default().fg(Color::Yellow)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error).add_modifier(Modifier::BOLD)
    }

    /// Thumb style; brighter while dragged
    pub fn thumb_style(&self, active: bool) -> Style {
        Style::default().fg(if active { self.thumb_active } else { self.thumb })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_and_points_are_distinct() {
        let theme = Theme::default();
        assert_ne!(theme.line, theme.point);
        assert_ne!(theme.thumb, theme.track);
    }

    #[test]
    fn test_active_thumb_stands_out() {
        let theme = Theme::default();
        assert_ne!(theme.thumb_style(true), theme.thumb_style(false));
    }

    #[test]
    fn test_panel_styles_follow_focus() {
        let theme = Theme::default();
        let (focused_border, _) = theme.panel_styles(true);
        let (border, title) = theme.panel_styles(false);
        assert_eq!(focused_border, theme.focused_border_style());
        assert_eq!(border, theme.border_style());
        assert_eq!(title, theme.dimmed_title_style());
    }
}
