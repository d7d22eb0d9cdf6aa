//! Modal form for creating and editing records.
//!
//! A form is an ordered list of fields followed by a submit button. Tab and
//! Shift+Tab move focus, Enter on a field advances, Enter on the submit
//! button submits and Esc cancels. Choice fields cycle with Left/Right and
//! toggles flip with Space.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::input::TextInput;
use super::modal::centered_rect;
use crate::i18n::{Language, Text};
use crate::ui::theme::theme;

/// English and Arabic text for one label.
pub type Label = (&'static str, &'static str);

/// Actions returned from the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    Submit,
    Cancel,
}

/// The editable part of a form field.
#[derive(Debug, Clone)]
pub enum FieldKind {
    Text(TextInput),
    /// Free text that must parse as a number on submit.
    Number(TextInput),
    Choice { options: Vec<Label>, index: usize },
    Toggle(bool),
}

/// One field in a [`FormDialog`].
#[derive(Debug, Clone)]
pub struct FormField {
    key: &'static str,
    label: Label,
    required: bool,
    kind: FieldKind,
}

impl FormField {
    pub fn text(key: &'static str, label: Label, value: impl Into<String>) -> Self {
        Self {
            key,
            label,
            required: false,
            kind: FieldKind::Text(TextInput::with_value(value)),
        }
    }

    pub fn number(key: &'static str, label: Label, value: f64) -> Self {
        Self {
            key,
            label,
            required: true,
            kind: FieldKind::Number(TextInput::with_value(format_number(value))),
        }
    }

    pub fn choice(key: &'static str, label: Label, options: Vec<Label>, index: usize) -> Self {
        let index = index.min(options.len().saturating_sub(1));
        Self {
            key,
            label,
            required: false,
            kind: FieldKind::Choice { options, index },
        }
    }

    pub fn toggle(key: &'static str, label: Label, value: bool) -> Self {
        Self {
            key,
            label,
            required: false,
            kind: FieldKind::Toggle(value),
        }
    }

    /// Mark the field as mandatory. Empty required fields block submission.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    fn label(&self, lang: Language) -> String {
        let label = lang.pick(self.label.0, self.label.1);
        if self.required {
            format!("{} *", label)
        } else {
            label.to_string()
        }
    }

    /// Validation message for this field, if any.
    fn problem(&self, lang: Language) -> Option<String> {
        match &self.kind {
            FieldKind::Text(input) if self.required && input.value().trim().is_empty() => Some(
                format!("{}: {}", self.label(lang), lang.pick("required", "مطلوب")),
            ),
            FieldKind::Number(input) if parse_number(input.value()).is_none() => Some(format!(
                "{}: {}",
                self.label(lang),
                lang.pick("must be a number", "يجب أن يكون رقماً")
            )),
            _ => None,
        }
    }

    fn handle_input(&mut self, key: KeyEvent) {
        match &mut self.kind {
            FieldKind::Text(input) | FieldKind::Number(input) => {
                input.handle_input(key);
            }
            FieldKind::Choice { options, index } => {
                if options.is_empty() {
                    return;
                }
                match key.code {
                    KeyCode::Right | KeyCode::Char('l') => *index = (*index + 1) % options.len(),
                    KeyCode::Left | KeyCode::Char('h') => {
                        *index = (*index + options.len() - 1) % options.len()
                    }
                    _ => {}
                }
            }
            FieldKind::Toggle(value) => {
                if matches!(key.code, KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right) {
                    *value = !*value;
                }
            }
        }
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// A modal create/edit form.
#[derive(Debug, Clone)]
pub struct FormDialog {
    title: String,
    fields: Vec<FormField>,
    /// Focused field; `fields.len()` is the submit button.
    focus: usize,
    errors: Vec<String>,
    submitting: bool,
}

impl FormDialog {
    pub fn new(title: impl Into<String>, fields: Vec<FormField>) -> Self {
        Self {
            title: title.into(),
            fields,
            focus: 0,
            errors: Vec::new(),
            submitting: false,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Replace the error list with a single message, typically from the server.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.errors = vec![message.into()];
        self.submitting = false;
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn set_submitting(&mut self, submitting: bool) {
        self.submitting = submitting;
    }

    fn field(&self, key: &str) -> Option<&FieldKind> {
        self.fields.iter().find(|f| f.key == key).map(|f| &f.kind)
    }

    /// Trimmed value of a text field, empty if absent.
    pub fn text(&self, key: &str) -> String {
        match self.field(key) {
            Some(FieldKind::Text(input)) | Some(FieldKind::Number(input)) => {
                input.value().trim().to_string()
            }
            _ => String::new(),
        }
    }

    /// Parsed value of a number field, 0 if absent or unparsable.
    pub fn number(&self, key: &str) -> f64 {
        match self.field(key) {
            Some(FieldKind::Number(input)) => parse_number(input.value()).unwrap_or(0.0),
            _ => 0.0,
        }
    }

    /// Selected index of a choice field.
    pub fn choice(&self, key: &str) -> usize {
        match self.field(key) {
            Some(FieldKind::Choice { index, .. }) => *index,
            _ => 0,
        }
    }

    pub fn toggle(&self, key: &str) -> bool {
        matches!(self.field(key), Some(FieldKind::Toggle(true)))
    }

    fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % (self.fields.len() + 1);
    }

    fn focus_prev(&mut self) {
        let len = self.fields.len() + 1;
        self.focus = (self.focus + len - 1) % len;
    }

    /// Run local validation, recording any problems. Returns true when the
    /// form may be submitted.
    pub fn validate(&mut self, lang: Language) -> bool {
        self.errors = self.fields.iter().filter_map(|f| f.problem(lang)).collect();
        self.errors.is_empty()
    }

    /// Handle keyboard input.
    ///
    /// Returns an optional action to be handled by the parent.
    pub fn handle_input(&mut self, key: KeyEvent, lang: Language) -> Option<FormAction> {
        if self.submitting {
            return None;
        }
        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) => Some(FormAction::Cancel),
            (KeyCode::Tab, KeyModifiers::NONE) | (KeyCode::Down, _) => {
                self.focus_next();
                None
            }
            (KeyCode::BackTab, _) | (KeyCode::Tab, KeyModifiers::SHIFT) | (KeyCode::Up, _) => {
                self.focus_prev();
                None
            }
            (KeyCode::Enter, _) if self.focus == self.fields.len() => {
                if self.validate(lang) {
                    self.submitting = true;
                    Some(FormAction::Submit)
                } else {
                    None
                }
            }
            (KeyCode::Enter, _) => {
                self.focus_next();
                None
            }
            _ => {
                if let Some(field) = self.fields.get_mut(self.focus) {
                    field.handle_input(key);
                }
                None
            }
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, lang: Language) {
        let t = theme();
        let rtl = lang.is_rtl();
        let height = (self.fields.len() as u16 * 3 + 6).min(area.height.saturating_sub(2));
        let width = 64u16.min(area.width.saturating_sub(4));
        let dialog = centered_rect(area, width, height);
        frame.render_widget(Clear, dialog);

        let mut block = Block::default()
            .title(Span::styled(
                format!(" {} ", self.title),
                Style::default().fg(t.accent).add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(t.accent));
        if rtl {
            block = block.title_alignment(Alignment::Right);
        }
        let inner = block.inner(dialog);
        frame.render_widget(block, dialog);

        let mut constraints: Vec<Constraint> =
            self.fields.iter().map(|_| Constraint::Length(3)).collect();
        constraints.push(Constraint::Min(1));
        constraints.push(Constraint::Length(1));
        let chunks = Layout::vertical(constraints).split(inner);

        for (i, field) in self.fields.iter().enumerate() {
            self.render_field(frame, chunks[i], field, i == self.focus, lang);
        }

        let alignment = if rtl { Alignment::Right } else { Alignment::Left };
        if !self.errors.is_empty() {
            let lines: Vec<Line> = self
                .errors
                .iter()
                .map(|e| Line::from(Span::styled(e.as_str(), Style::default().fg(t.error))))
                .collect();
            frame.render_widget(
                Paragraph::new(lines)
                    .alignment(alignment)
                    .wrap(Wrap { trim: true }),
                chunks[self.fields.len()],
            );
        }

        let focused = self.focus == self.fields.len();
        let style = if focused {
            Style::default()
                .fg(t.fg)
                .bg(t.success)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(t.success)
        };
        let label = if self.submitting {
            format!(" {} ", lang.text(Text::Loading))
        } else {
            format!(" [Enter] {} ", lang.text(Text::Save))
        };
        frame.render_widget(
            Paragraph::new(Span::styled(label, style)).alignment(Alignment::Center),
            chunks[self.fields.len() + 1],
        );
    }

    fn render_field(&self, frame: &mut Frame, area: Rect, field: &FormField, focused: bool, lang: Language) {
        let t = theme();
        let rtl = lang.is_rtl();
        let label = field.label(lang);
        let display = match &field.kind {
            FieldKind::Text(input) | FieldKind::Number(input) => {
                input.render(frame, area, &label, focused, rtl);
                return;
            }
            FieldKind::Choice { options, index } => options
                .get(*index)
                .map(|o| format!("◀ {} ▶", lang.pick(o.0, o.1)))
                .unwrap_or_default(),
            FieldKind::Toggle(value) => {
                let mark = if *value { "[x]" } else { "[ ]" };
                let text = if *value {
                    lang.pick("Yes", "نعم")
                } else {
                    lang.pick("No", "لا")
                };
                format!("{} {}", mark, text)
            }
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
            .title(Span::styled(format!(" {} ", label), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);
        if rtl {
            block = block.title_alignment(Alignment::Right);
        }
        let style = if focused {
            Style::default().fg(t.input_fg)
        } else {
            Style::default().fg(t.fg)
        };
        let alignment = if rtl { Alignment::Right } else { Alignment::Left };
        frame.render_widget(
            Paragraph::new(display)
                .style(style)
                .alignment(alignment)
                .block(block),
            area,
        );
    }
}
