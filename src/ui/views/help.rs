//! Keyboard shortcut overlay.
//!
//! Opened with `?` and closed with `?`, `q` or Esc. Lists every binding
//! grouped by where it applies, scrollable when the terminal is short.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

use crate::events::{get_keybindings_grouped, KeyContext, Keybinding};
use crate::i18n::{Language, Text};
use crate::ui::theme::theme;

/// Actions that can be returned from the help view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelpAction {
    Close,
}

/// The help overlay.
pub struct HelpView {
    grouped_bindings: Vec<(KeyContext, Vec<Keybinding>)>,
    scroll: usize,
    total_lines: usize,
    /// Updated on render.
    visible_height: usize,
}

impl HelpView {
    pub fn new() -> Self {
        let grouped_bindings = get_keybindings_grouped();
        let total_lines = Self::calculate_total_lines(&grouped_bindings);

        Self {
            grouped_bindings,
            scroll: 0,
            total_lines,
            visible_height: 0,
        }
    }

    fn calculate_total_lines(grouped: &[(KeyContext, Vec<Keybinding>)]) -> usize {
        // Header and blank line, the bindings, a trailing blank line; then the footer.
        grouped.iter().map(|(_, b)| b.len() + 3).sum::<usize>() + 1
    }

    pub fn reset_scroll(&mut self) {
        self.scroll = 0;
    }

    fn max_scroll(&self) -> usize {
        self.total_lines.saturating_sub(self.visible_height)
    }

    pub fn handle_input(&mut self, key_event: KeyEvent) -> Option<HelpAction> {
        match (key_event.code, key_event.modifiers) {
            (KeyCode::Char('?'), _) | (KeyCode::Char('q'), KeyModifiers::NONE) | (KeyCode::Esc, _) => {
                Some(HelpAction::Close)
            }
            (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => {
                self.scroll = (self.scroll + 1).min(self.max_scroll());
                None
            }
            (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => {
                self.scroll = self.scroll.saturating_sub(1);
                None
            }
            (KeyCode::Char('d'), KeyModifiers::CONTROL) | (KeyCode::PageDown, _) => {
                let page_size = self.visible_height.saturating_sub(2);
                self.scroll = (self.scroll + page_size).min(self.max_scroll());
                None
            }
            (KeyCode::Char('u'), KeyModifiers::CONTROL) | (KeyCode::PageUp, _) => {
                let page_size = self.visible_height.saturating_sub(2);
                self.scroll = self.scroll.saturating_sub(page_size);
                None
            }
            (KeyCode::Char('g'), KeyModifiers::NONE) | (KeyCode::Home, _) => {
                self.scroll = 0;
                None
            }
            (KeyCode::Char('G'), _) | (KeyCode::End, _) => {
                self.scroll = self.max_scroll();
                None
            }
            // Swallow everything else while open.
            _ => None,
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, lang: Language) {
        let t = theme();
        frame.render_widget(Clear, area);

        let title = format!(" {} ", lang.pick("Keyboard shortcuts", "اختصارات لوحة المفاتيح"));
        let block = Block::default()
            .title(title)
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(t.accent));

        let inner = block.inner(area);
        frame.render_widget(block, area);
        self.visible_height = inner.height as usize;
        self.scroll = self.scroll.min(self.max_scroll());

        let alignment = if lang.is_rtl() { Alignment::Right } else { Alignment::Left };
        let paragraph = Paragraph::new(self.build_content_lines(lang))
            .scroll((self.scroll as u16, 0))
            .alignment(alignment);
        frame.render_widget(paragraph, inner);

        if self.total_lines > self.visible_height && area.width > 0 {
            let orientation = if lang.is_rtl() {
                ScrollbarOrientation::VerticalLeft
            } else {
                ScrollbarOrientation::VerticalRight
            };
            let scrollbar = Scrollbar::new(orientation)
                .begin_symbol(Some("▲"))
                .end_symbol(Some("▼"));
            let mut state = ScrollbarState::new(self.max_scroll()).position(self.scroll);
            frame.render_stateful_widget(scrollbar, area, &mut state);
        }
    }

    fn build_content_lines(&self, lang: Language) -> Vec<Line<'static>> {
        let t = theme();
        let rtl = lang.is_rtl();
        let mut lines: Vec<Line<'static>> = Vec::new();

        for (context, bindings) in &self.grouped_bindings {
            lines.push(Line::from(Span::styled(
                format!("── {} ──", context.display(lang)),
                Style::default().fg(t.warning).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(""));

            for binding in bindings {
                let key = Span::styled(
                    format!("{:>14}", binding.key),
                    Style::default().fg(t.success).add_modifier(Modifier::BOLD),
                );
                let description = Span::raw(binding.description(lang));
                // The key sits at the reading start.
                let spans = if rtl {
                    vec![description, Span::raw("  "), Span::styled(binding.key, key.style)]
                } else {
                    vec![key, Span::raw("  "), description]
                };
                lines.push(Line::from(spans));
            }
            lines.push(Line::from(""));
        }

        lines.push(Line::from(Span::styled(
            format!("[?/q/Esc] {}", lang.text(Text::Close)),
            Style::default().fg(t.dim),
        )));
        lines
    }
}

impl Default for HelpView {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_help_view_new() {
        let view = HelpView::new();
        assert_eq!(view.scroll, 0);
        assert!(!view.grouped_bindings.is_empty());
        let bindings: usize = view.grouped_bindings.iter().map(|(_, b)| b.len()).sum();
        assert_eq!(view.total_lines, bindings + view.grouped_bindings.len() * 3 + 1);
    }

    #[test]
    fn test_close_keys() {
        let mut view = HelpView::new();
        for code in [KeyCode::Char('?'), KeyCode::Char('q'), KeyCode::Esc] {
            assert_eq!(view.handle_input(press(code)), Some(HelpAction::Close));
        }
        assert_eq!(view.handle_input(press(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut view = HelpView::new();
        view.visible_height = 10;
        for _ in 0..200 {
            view.handle_input(press(KeyCode::Char('j')));
        }
        assert_eq!(view.scroll, view.max_scroll());

        for _ in 0..200 {
            view.handle_input(press(KeyCode::Char('k')));
        }
        assert_eq!(view.scroll, 0);

        view.handle_input(press(KeyCode::Char('G')));
        assert_eq!(view.scroll, view.max_scroll());
        view.reset_scroll();
        assert_eq!(view.scroll, 0);
    }

    #[test]
    fn test_content_follows_language() {
        let view = HelpView::new();
        let text = |lang| {
            view.build_content_lines(lang)
                .iter()
                .map(|l| l.to_string())
                .collect::<Vec<_>>()
                .join("\n")
        };
        assert!(text(Language::English).contains("Switch language"));
        assert!(text(Language::Arabic).contains("تبديل اللغة"));
    }

    #[test]
    fn test_render_small_terminal() {
        let mut view = HelpView::new();
        let mut terminal = Terminal::new(TestBackend::new(40, 8)).unwrap();
        terminal
            .draw(|f| view.render(f, f.area(), Language::Arabic))
            .unwrap();
        assert_eq!(view.visible_height, 6);
    }
}
