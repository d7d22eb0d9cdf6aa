//! Text input component.
//!
//! A single-line text field used by the login screen, the table search box
//! and record forms. The cursor counts characters, not bytes, so Arabic
//! input edits cleanly. In right-to-left mode the text is right-aligned.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Position, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::ui::theme::theme;

/// Input mode for components that support both navigation and text input.
///
/// In `Normal` mode keys like j/k are shortcuts; in `Insert` mode every
/// character goes to the focused text input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Insert,
}

/// A text input widget.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    value: String,
    /// Cursor position in characters.
    cursor: usize,
    /// Whether to mask the input (for passwords).
    masked: bool,
    /// Placeholder text shown when empty.
    placeholder: String,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new masked input (for passwords).
    pub fn masked() -> Self {
        Self {
            masked: true,
            ..Self::default()
        }
    }

    /// Create a new input with an initial value.
    pub fn with_value(value: impl Into<String>) -> Self {
        let mut input = Self::new();
        input.set_value(value);
        input
    }

    pub fn set_placeholder(&mut self, placeholder: impl Into<String>) {
        self.placeholder = placeholder.into();
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Set the value and move cursor to end.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.len();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn len(&self) -> usize {
        self.value.chars().count()
    }

    /// Byte offset of character position `pos`.
    fn byte_index(&self, pos: usize) -> usize {
        self.value
            .char_indices()
            .nth(pos)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    /// Get the display value (masked if needed).
    pub fn display_value(&self) -> String {
        if self.masked {
            "•".repeat(self.len())
        } else {
            self.value.clone()
        }
    }

    /// Handle keyboard input.
    ///
    /// Returns true if the value changed.
    pub fn handle_input(&mut self, key: KeyEvent) -> bool {
        match (key.code, key.modifiers) {
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                let at = self.byte_index(self.cursor);
                self.value.insert(at, c);
                self.cursor += 1;
                true
            }
            (KeyCode::Backspace, _) => {
                if self.cursor == 0 {
                    return false;
                }
                self.cursor -= 1;
                let at = self.byte_index(self.cursor);
                self.value.remove(at);
                true
            }
            (KeyCode::Delete, _) => {
                if self.cursor >= self.len() {
                    return false;
                }
                let at = self.byte_index(self.cursor);
                self.value.remove(at);
                true
            }
            (KeyCode::Left, KeyModifiers::NONE) => {
                self.cursor = self.cursor.saturating_sub(1);
                false
            }
            (KeyCode::Right, KeyModifiers::NONE) => {
                self.cursor = (self.cursor + 1).min(self.len());
                false
            }
            (KeyCode::Home, _) | (KeyCode::Char('a'), KeyModifiers::CONTROL) => {
                self.cursor = 0;
                false
            }
            (KeyCode::End, _) | (KeyCode::Char('e'), KeyModifiers::CONTROL) => {
                self.cursor = self.len();
                false
            }
            // Ctrl+U clears the line
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                if self.value.is_empty() {
                    return false;
                }
                self.clear();
                true
            }
            // Ctrl+W deletes the word before the cursor
            (KeyCode::Char('w'), KeyModifiers::CONTROL) => {
                if self.cursor == 0 {
                    return false;
                }
                let chars: Vec<char> = self.value.chars().collect();
                let mut start = self.cursor;
                while start > 0 && !chars[start - 1].is_alphanumeric() {
                    start -= 1;
                }
                while start > 0 && chars[start - 1].is_alphanumeric() {
                    start -= 1;
                }
                let from = self.byte_index(start);
                let to = self.byte_index(self.cursor);
                self.value.replace_range(from..to, "");
                self.cursor = start;
                true
            }
            _ => false,
        }
    }

    /// Render the input field with a bordered label.
    pub fn render(&self, frame: &mut Frame, area: Rect, label: &str, focused: bool, rtl: bool) {
        let t = theme();
        let showing_placeholder = self.value.is_empty() && !self.placeholder.is_empty();
        let display = if showing_placeholder {
            self.placeholder.clone()
        } else {
            self.display_value()
        };

        let style = if focused {
            Style::default().fg(t.input_fg)
        } else if showing_placeholder {
            Style::default().fg(t.input_placeholder)
        } else {
            Style::default().fg(t.fg)
        };
        let border_style = if focused {
            Style::default().fg(t.border_focused)
        } else {
            Style::default().fg(t.border)
        };
        let title_style = if focused {
            Style::default()
                .fg(t.border_focused)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(t.fg)
        };

        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style);
        if !label.is_empty() {
            block = block.title(Span::styled(format!(" {} ", label), title_style));
        }
        if rtl {
            block = block.title_alignment(Alignment::Right);
        }

        let alignment = if rtl { Alignment::Right } else { Alignment::Left };
        let input = Paragraph::new(display)
            .style(style)
            .alignment(alignment)
            .block(block);
        frame.render_widget(input, area);

        if focused {
            if let Some(position) = self.cursor_position(area, rtl) {
                frame.set_cursor_position(position);
            }
        }
    }

    /// Terminal position of the cursor inside a bordered `area`.
    fn cursor_position(&self, area: Rect, rtl: bool) -> Option<Position> {
        if area.width < 3 || area.height < 3 {
            return None;
        }
        let inner_left = area.x + 1;
        let inner_right = area.x + area.width - 2;
        let x = if rtl {
            let trailing = (self.len() - self.cursor) as u16;
            inner_right.checked_sub(trailing)?
        } else {
            inner_left + self.cursor as u16
        };
        (x >= inner_left && x <= inner_right).then(|| Position::new(x, area.y + 1))
    }
}
