//! Sign-in screen shown before any dashboard page.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::i18n::{Language, Text};
use crate::ui::components::{centered_rect, TextInput};
use crate::ui::theme::theme;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginAction {
    Submit { email: String, password: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Email,
    Password,
}

pub struct LoginView {
    email: TextInput,
    password: TextInput,
    focus: Field,
    error: Option<String>,
    submitting: bool,
}

impl LoginView {
    pub fn new(email: Option<&str>) -> Self {
        let email_input = email.map_or_else(TextInput::new, TextInput::with_value);
        // Skip straight to the password when the email is known.
        let focus = if email_input.is_empty() {
            Field::Email
        } else {
            Field::Password
        };
        Self {
            email: email_input,
            password: TextInput::masked(),
            focus,
            error: None,
            submitting: false,
        }
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.submitting = false;
        self.password.clear();
        self.focus = Field::Password;
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    fn switch_focus(&mut self) {
        self.focus = match self.focus {
            Field::Email => Field::Password,
            Field::Password => Field::Email,
        };
    }

    fn submit(&mut self, lang: Language) -> Option<LoginAction> {
        let email = self.email.value().trim().to_string();
        let password = self.password.value().to_string();
        if email.is_empty() || password.is_empty() {
            self.error = Some(
                lang.pick("Email and password are required", "البريد الإلكتروني وكلمة المرور مطلوبان")
                    .to_string(),
            );
            return None;
        }
        self.error = None;
        self.submitting = true;
        Some(LoginAction::Submit { email, password })
    }

    pub fn handle_input(&mut self, key: KeyEvent, lang: Language) -> Option<LoginAction> {
        if self.submitting {
            return None;
        }
        match (key.code, key.modifiers) {
            (KeyCode::Tab, _) | (KeyCode::BackTab, _) | (KeyCode::Down, _) | (KeyCode::Up, _) => {
                self.switch_focus();
                None
            }
            (KeyCode::Enter, _) if self.focus == Field::Email => {
                self.focus = Field::Password;
                None
            }
            (KeyCode::Enter, _) => self.submit(lang),
            (KeyCode::Char('u'), KeyModifiers::CONTROL) if self.focus == Field::Password => {
                self.password.clear();
                None
            }
            _ => {
                let input = match self.focus {
                    Field::Email => &mut self.email,
                    Field::Password => &mut self.password,
                };
                if input.handle_input(key) {
                    self.error = None;
                }
                None
            }
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, lang: Language) {
        let t = theme();
        let rtl = lang.is_rtl();
        let dialog = centered_rect(area, 56, 15);
        frame.render_widget(Clear, dialog);

        let alignment = if rtl { Alignment::Right } else { Alignment::Left };
        let block = Block::default()
            .title(Span::styled(
                format!(" {} ", lang.text(Text::AppTitle)),
                Style::default().fg(t.accent).add_modifier(Modifier::BOLD),
            ))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(t.accent));
        let inner = block.inner(dialog);
        frame.render_widget(block, dialog);

        let [heading, email_area, password_area, message_area, hint_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .areas(inner);

        frame.render_widget(
            Paragraph::new(Span::styled(
                lang.text(Text::Login),
                Style::default().fg(t.header_fg).add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center),
            heading,
        );
        self.email.render(
            frame,
            email_area,
            lang.text(Text::Email),
            self.focus == Field::Email,
            rtl,
        );
        self.password.render(
            frame,
            password_area,
            lang.text(Text::Password),
            self.focus == Field::Password,
            rtl,
        );

        let message = if self.submitting {
            Some(Span::styled(lang.text(Text::Loading), Style::default().fg(t.accent)))
        } else {
            self.error
                .as_deref()
                .map(|e| Span::styled(e, Style::default().fg(t.error)))
        };
        if let Some(message) = message {
            frame.render_widget(
                Paragraph::new(message).alignment(alignment).wrap(Wrap { trim: true }),
                message_area,
            );
        }

        frame.render_widget(
            Paragraph::new(Span::styled(lang.text(Text::LoginHint), Style::default().fg(t.dim)))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            hint_area,
        );
    }
}
