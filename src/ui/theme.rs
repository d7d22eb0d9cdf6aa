//! Theme and styling configuration.
//!
//! The active theme is installed once at startup with [`init_theme`] and
//! read everywhere through [`theme`].

use std::sync::OnceLock;

use ratatui::style::Color;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Color theme for the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Primary foreground color.
    pub fg: Color,
    pub dim: Color,
    /// Titles, focused borders and the brand color.
    pub accent: Color,
    pub border: Color,
    pub border_focused: Color,
    /// Selected row background.
    pub highlight_bg: Color,
    pub header_fg: Color,
    pub input_fg: Color,
    pub input_placeholder: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            fg: Color::White,
            dim: Color::DarkGray,
            accent: Color::Cyan,
            border: Color::DarkGray,
            border_focused: Color::Yellow,
            highlight_bg: Color::DarkGray,
            header_fg: Color::Cyan,
            input_fg: Color::Yellow,
            input_placeholder: Color::DarkGray,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

/// Install the theme. Later calls are ignored.
pub fn init_theme(theme: Theme) {
    let _ = THEME.set(theme);
}

/// The active theme, the dark theme if none was installed.
pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::dark)
}
