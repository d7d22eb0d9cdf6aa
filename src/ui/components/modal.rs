//! Modal dialogs: delete confirmation, critical errors and record details.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::i18n::{Language, Text};
use crate::ui::theme::theme;

/// Calculate a centered rectangle within the given area.
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}

fn dialog_block(title: &str, color: ratatui::style::Color, rtl: bool) -> Block<'static> {
    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", title),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));
    if rtl {
        block.title_alignment(Alignment::Right)
    } else {
        block
    }
}

/// Result of a confirmation dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction<T> {
    /// The user confirmed; carries the payload given to [`ConfirmDialog::show`].
    Confirm(T),
    Cancel,
}

/// A yes/no dialog guarding a destructive action.
#[derive(Debug)]
pub struct ConfirmDialog<T> {
    pending: Option<T>,
    message: String,
    /// Whether the confirm button has focus.
    confirm_focused: bool,
}

impl<T> Default for ConfirmDialog<T> {
    fn default() -> Self {
        Self {
            pending: None,
            message: String::new(),
            confirm_focused: false,
        }
    }
}

impl<T> ConfirmDialog<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for confirmation. Focus starts on Cancel.
    pub fn show(&mut self, message: impl Into<String>, payload: T) {
        self.message = message.into();
        self.pending = Some(payload);
        self.confirm_focused = false;
    }

    pub fn is_visible(&self) -> bool {
        self.pending.is_some()
    }

    pub fn hide(&mut self) {
        self.pending = None;
    }

    /// Handle keyboard input while visible.
    pub fn handle_input(&mut self, key: KeyEvent) -> Option<ConfirmAction<T>> {
        self.pending.as_ref()?;
        match (key.code, key.modifiers) {
            (KeyCode::Char('y'), KeyModifiers::NONE) => self.pending.take().map(ConfirmAction::Confirm),
            (KeyCode::Enter, _) if self.confirm_focused => {
                self.pending.take().map(ConfirmAction::Confirm)
            }
            (KeyCode::Enter, _)
            | (KeyCode::Esc, _)
            | (KeyCode::Char('n'), KeyModifiers::NONE)
            | (KeyCode::Char('q'), KeyModifiers::NONE) => {
                self.pending = None;
                Some(ConfirmAction::Cancel)
            }
            (KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab, _) => {
                self.confirm_focused = !self.confirm_focused;
                None
            }
            _ => None,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, lang: Language) {
        if !self.is_visible() {
            return;
        }
        let t = theme();
        let dialog = centered_rect(area, 50, 7);
        frame.render_widget(Clear, dialog);

        let block = dialog_block(lang.text(Text::Confirm), t.warning, lang.is_rtl());
        let inner = block.inner(dialog);
        frame.render_widget(block, dialog);

        let [message_area, _, buttons_area] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        frame.render_widget(
            Paragraph::new(self.message.as_str())
                .wrap(Wrap { trim: true })
                .alignment(Alignment::Center),
            message_area,
        );

        let button = |label: &str, focused: bool, color| {
            let style = if focused {
                Style::default()
                    .fg(t.fg)
                    .bg(color)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(color)
            };
            Span::styled(format!(" {} ", label), style)
        };
        let confirm = button(lang.text(Text::Delete), self.confirm_focused, t.error);
        let cancel = button(lang.text(Text::Cancel), !self.confirm_focused, t.dim);
        let spans = if lang.is_rtl() {
            vec![cancel, Span::raw("   "), confirm]
        } else {
            vec![confirm, Span::raw("   "), cancel]
        };
        frame.render_widget(
            Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
            buttons_area,
        );
    }
}

/// A blocking dialog for critical errors.
#[derive(Debug, Default)]
pub struct ErrorDialog {
    title: String,
    message: String,
    hint: Option<String>,
    visible: bool,
}

impl ErrorDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, title: impl Into<String>, message: impl Into<String>, hint: Option<String>) {
        self.title = title.into();
        self.message = message.into();
        self.hint = hint;
        self.visible = true;
    }

    pub fn dismiss(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, lang: Language) {
        if !self.visible {
            return;
        }
        let t = theme();
        let dialog = centered_rect(area, 60, 9);
        frame.render_widget(Clear, dialog);

        let block = dialog_block(&self.title, t.error, lang.is_rtl());
        let inner = block.inner(dialog);
        frame.render_widget(block, dialog);

        let mut lines = vec![Line::from(self.message.as_str()), Line::from("")];
        if let Some(hint) = &self.hint {
            lines.push(Line::from(Span::styled(
                hint.as_str(),
                Style::default().fg(t.warning),
            )));
        }
        lines.push(Line::from(Span::styled(
            lang.pick("Press Enter or Esc to dismiss", "اضغط Enter أو Esc للإغلاق"),
            Style::default().fg(t.dim),
        )));

        frame.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .alignment(Alignment::Center),
            inner,
        );
    }
}

/// Read-only view of one record as label / value pairs.
#[derive(Debug, Default)]
pub struct DetailDialog {
    title: String,
    fields: Vec<(String, String)>,
    visible: bool,
}

impl DetailDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, title: impl Into<String>, fields: Vec<(String, String)>) {
        self.title = title.into();
        self.fields = fields;
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Any of Esc, Enter, q or v closes the dialog. Returns whether it closed.
    pub fn handle_input(&mut self, key: KeyEvent) -> bool {
        let close = matches!(
            key.code,
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('v')
        );
        if close {
            self.visible = false;
        }
        close
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, lang: Language) {
        if !self.visible {
            return;
        }
        let t = theme();
        let height = self.fields.len() as u16 + 2;
        let dialog = centered_rect(area, 64, height);
        frame.render_widget(Clear, dialog);

        let rtl = lang.is_rtl();
        let block = dialog_block(&self.title, t.accent, rtl);
        let inner = block.inner(dialog);
        frame.render_widget(block, dialog);

        let label_width = self
            .fields
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or(0);
        let lines: Vec<Line> = self
            .fields
            .iter()
            .map(|(label, value)| {
                let label = Span::styled(
                    format!("{:>width$}", label, width = label_width),
                    Style::default().fg(t.header_fg).add_modifier(Modifier::BOLD),
                );
                let value = Span::styled(value.as_str(), Style::default().fg(t.fg));
                if rtl {
                    Line::from(vec![value, Span::raw("  "), label])
                } else {
                    Line::from(vec![label, Span::raw("  "), value])
                }
            })
            .collect();
        let alignment = if rtl { Alignment::Right } else { Alignment::Left };
        frame.render_widget(Paragraph::new(lines).alignment(alignment), inner);
    }
}
