//! Loading indicator component.
//!
//! Animated spinners for pending fetches: one in the header while any query
//! is in flight, and one in place of a table body that is still loading.

use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    widgets::Paragraph,
    Frame,
};

use crate::i18n::{Language, Text};
use crate::ui::theme::theme;

/// Spinner animation frames.
const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Alternative spinner using simple characters for compatibility.
const SIMPLE_SPINNER_FRAMES: &[&str] = &["|", "/", "-", "\\"];

/// The type of spinner to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpinnerStyle {
    /// Braille dots spinner (default).
    #[default]
    Braille,
    /// Simple ASCII spinner for compatibility.
    Simple,
}

impl SpinnerStyle {
    /// Get the frames for this spinner style.
    pub fn frames(&self) -> &'static [&'static str] {
        match self {
            SpinnerStyle::Braille => SPINNER_FRAMES,
            SpinnerStyle::Simple => SIMPLE_SPINNER_FRAMES,
        }
    }
}

/// A loading indicator with an animated spinner and a translated message.
#[derive(Debug, Clone, Default)]
pub struct LoadingIndicator {
    /// Current spinner frame index.
    spinner_state: usize,
    spinner_style: SpinnerStyle,
    /// Whether the loading indicator is active.
    active: bool,
}

impl LoadingIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the spinner style.
    pub fn with_style(mut self, style: SpinnerStyle) -> Self {
        self.spinner_style = style;
        self
    }

    /// Start the animation from the first frame. Starting an active
    /// indicator keeps its frame.
    pub fn start(&mut self) {
        if !self.active {
            self.active = true;
            self.spinner_state = 0;
        }
    }

    pub fn stop(&mut self) {
        self.active = false;
    }

    /// Start or stop depending on `active`.
    pub fn set_active(&mut self, active: bool) {
        if active {
            self.start();
        } else {
            self.stop();
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Advance the spinner animation.
    ///
    /// This should be called on each tick event.
    pub fn tick(&mut self) {
        if self.active {
            let frames = self.spinner_style.frames();
            self.spinner_state = (self.spinner_state + 1) % frames.len();
        }
    }

    /// Get the current spinner frame.
    pub fn spinner_frame(&self) -> &'static str {
        let frames = self.spinner_style.frames();
        frames[self.spinner_state % frames.len()]
    }

    /// Spinner plus "Loading..." in `lang`, empty when inactive.
    ///
    /// In Arabic the spinner trails the message so it sits at the reading
    /// end.
    pub fn text(&self, lang: Language) -> String {
        if !self.active {
            return String::new();
        }
        let message = lang.text(Text::Loading);
        if lang.is_rtl() {
            format!("{} {}", message, self.spinner_frame())
        } else {
            format!("{} {}", self.spinner_frame(), message)
        }
    }

    /// Render the loading indicator centered in the given area.
    pub fn render(&self, frame: &mut Frame, area: Rect, lang: Language) {
        if !self.active {
            return;
        }
        let paragraph = Paragraph::new(self.text(lang))
            .style(Style::default().fg(theme().accent))
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
    }
}
