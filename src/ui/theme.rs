//! Theme and styling configuration.

use std::sync::OnceLock;

use ratatui::style::{Color, Modifier, Style};

static THEME: OnceLock<Theme> = OnceLock::new();

/// Color theme for the application.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Primary foreground color.
    pub fg: Color,
    /// Dimmed text such as hints and placeholders.
    pub dim: Color,
    /// Field labels in the resume views.
    pub label: Color,
    /// Titles and focused borders.
    pub accent: Color,
    /// Unfocused borders.
    pub border: Color,
    /// Background of the selected list row.
    pub selection_bg: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            fg: Color::White,
            dim: Color::DarkGray,
            label: Color::Yellow,
            accent: Color::Cyan,
            border: Color::Gray,
            selection_bg: Color::DarkGray,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
        }
    }
}

impl Theme {
    pub fn title_style(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self, focused: bool) -> Style {
        Style::default().fg(if focused { self.accent } else { self.border })
    }

    pub fn hint_style(&self) -> Style {
        Style::default().fg(self.dim)
    }

    pub fn selection_style(&self) -> Style {
        Style::default()
            .fg(self.fg)
            .bg(self.selection_bg)
            .add_modifier(Modifier::BOLD)
    }
}

/// The active theme. Falls back to the default when none was installed.
pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}

/// Install a theme. Has no effect once a theme is in use.
pub fn init_theme(theme: Theme) {
    let _ = THEME.set(theme);
}
