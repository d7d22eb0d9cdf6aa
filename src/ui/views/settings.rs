//! Platform settings screen.
//!
//! Shows the current settings in a form. `e` or Enter starts editing;
//! saving validates locally before anything is sent.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Rect},
    widgets::Paragraph,
    Frame,
};
use tracing::debug;

use super::{Screen, ScreenAction};
use crate::api::types::PlatformSettings;
use crate::api::ApiError;
use crate::cache::Query;
use crate::error::AppError;
use crate::events::KeyContext;
use crate::i18n::{Language, Text};
use crate::tasks::{Mutation, QueryData, QueryRequest};
use crate::ui::components::{FormAction, FormDialog, FormField, LoadingIndicator};

fn form_fields(s: &PlatformSettings) -> Vec<FormField> {
    vec![
        FormField::text("platform_name", ("Platform name", "اسم المنصة"), s.platform_name.as_str())
            .required(),
        FormField::text("support_email", ("Support email", "بريد الدعم"), s.support_email.as_str())
            .required(),
        FormField::number("delivery_fee", ("Delivery fee", "رسوم التوصيل"), s.delivery_fee),
        FormField::number(
            "min_order_amount",
            ("Minimum order", "الحد الأدنى للطلب"),
            s.min_order_amount,
        ),
        FormField::number(
            "commission_rate",
            ("Commission %", "نسبة العمولة %"),
            s.commission_rate,
        ),
        FormField::toggle(
            "maintenance_mode",
            ("Maintenance mode", "وضع الصيانة"),
            s.maintenance_mode,
        ),
    ]
}

fn from_form(form: &FormDialog) -> PlatformSettings {
    PlatformSettings {
        platform_name: form.text("platform_name"),
        support_email: form.text("support_email"),
        delivery_fee: form.number("delivery_fee"),
        min_order_amount: form.number("min_order_amount"),
        commission_rate: form.number("commission_rate"),
        maintenance_mode: form.toggle("maintenance_mode"),
    }
}

pub struct SettingsView {
    query: Query<QueryData>,
    form: Option<FormDialog>,
    editing: bool,
    loader: LoadingIndicator,
}

impl SettingsView {
    pub fn new() -> Self {
        Self {
            query: Query::new(),
            form: None,
            editing: false,
            loader: LoadingIndicator::new(),
        }
    }

    fn settings(&self) -> Option<&PlatformSettings> {
        match self.query.data() {
            Some(QueryData::Settings(s)) => Some(s),
            _ => None,
        }
    }

    /// Rebuild the form from the loaded settings, dropping any edits.
    fn revert(&mut self) {
        self.form = self
            .settings()
            .map(|s| FormDialog::new(String::new(), form_fields(s)));
        self.editing = false;
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    fn submit(&mut self, lang: Language) -> ScreenAction {
        let Some(form) = self.form.as_mut() else {
            return ScreenAction::None;
        };
        let settings = from_form(form);
        match settings.validate() {
            Ok(()) => {
                form.set_submitting(true);
                ScreenAction::Mutate(Mutation::UpdateSettings(settings))
            }
            Err(message) => {
                debug!(%message, "Settings rejected before submit");
                form.set_error(AppError::from(ApiError::Validation(message)).user_message(lang));
                ScreenAction::None
            }
        }
    }
}

impl Default for SettingsView {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen for SettingsView {
    fn title(&self) -> Text {
        Text::Settings
    }

    fn request(&self) -> Option<QueryRequest> {
        Some(QueryRequest::Settings)
    }

    fn query(&self) -> &Query<QueryData> {
        &self.query
    }

    fn query_mut(&mut self) -> &mut Query<QueryData> {
        &mut self.query
    }

    fn on_data(&mut self) {
        // A refetch must not clobber edits in progress.
        if !self.editing {
            self.revert();
        }
    }

    fn handle_key(&mut self, key: KeyEvent, lang: Language) -> ScreenAction {
        if !self.editing {
            return match (key.code, key.modifiers) {
                (KeyCode::Char('e'), KeyModifiers::NONE) | (KeyCode::Enter, _) if self.form.is_some() => {
                    self.editing = true;
                    ScreenAction::None
                }
                (KeyCode::Char('r'), KeyModifiers::NONE) => ScreenAction::Refresh,
                _ => ScreenAction::None,
            };
        }
        let Some(form) = self.form.as_mut() else {
            self.editing = false;
            return ScreenAction::None;
        };
        match form.handle_input(key, lang) {
            Some(FormAction::Submit) => self.submit(lang),
            Some(FormAction::Cancel) => {
                self.revert();
                ScreenAction::None
            }
            None => ScreenAction::None,
        }
    }

    fn mutation_finished(&mut self, result: &Result<(), ApiError>, lang: Language) {
        match result {
            Ok(()) => {
                // Fresh settings arrive with the refetch.
                self.editing = false;
                if let Some(form) = self.form.as_mut() {
                    form.set_submitting(false);
                }
            }
            Err(e) => {
                if let Some(form) = self.form.as_mut() {
                    form.set_error(AppError::from(e.clone()).user_message(lang));
                }
            }
        }
    }

    fn captures_input(&self) -> bool {
        self.editing
    }

    fn context(&self) -> KeyContext {
        if self.editing {
            KeyContext::Dialog
        } else {
            KeyContext::Global
        }
    }

    fn tick(&mut self) {
        self.loader.tick();
    }

    fn reset(&mut self) {
        self.query.reset();
        self.form = None;
        self.editing = false;
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, lang: Language) {
        self.loader.set_active(self.query.is_loading() && self.form.is_none());
        match &mut self.form {
            Some(form) => {
                let title = if self.editing {
                    format!("{} ({})", lang.text(Text::Settings), lang.text(Text::Edit))
                } else {
                    format!("{}  [e] {}", lang.text(Text::Settings), lang.text(Text::Edit))
                };
                form.set_title(title);
                form.render(frame, area, lang);
            }
            None => match self.query.error() {
                Some(e) => {
                    let message = format!(
                        "{}  {}",
                        AppError::from(e.clone()).user_message(lang),
                        lang.text(Text::Retry)
                    );
                    frame.render_widget(Paragraph::new(message).alignment(Alignment::Center), area);
                }
                None => self.loader.render(frame, area, lang),
            },
        }
    }
}
