//! Dashboard screens.
//!
//! Every routed screen implements [`Screen`]: it declares the query it wants
//! to show, receives the response through its [`Query`], and turns input
//! into [`ScreenAction`]s for the app to carry out.

mod categories;
mod coupons;
mod dashboard;
mod help;
mod login;
mod orders;
mod reports;
mod resource;
mod restaurants;
mod settings;
mod users;

use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{layout::Rect, Frame};

use crate::api::ApiError;
use crate::cache::Query;
use crate::events::{KeyBindings, KeyContext};
use crate::i18n::{Language, Text};
use crate::tasks::{Mutation, QueryData, QueryRequest};

pub use categories::CategoriesResource;
pub use coupons::CouponsResource;
pub use dashboard::DashboardView;
pub use help::{HelpAction, HelpView};
pub use login::{LoginAction, LoginView};
pub use orders::OrdersResource;
pub use reports::ReportsView;
pub use resource::{FilterControl, Resource, ResourcePage};
pub use restaurants::RestaurantsResource;
pub use settings::SettingsView;
pub use users::UsersResource;

/// What a screen asks the app to do after handling input.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenAction {
    /// Nothing for the app to do.
    None,
    /// Submit a write to the API.
    Mutate(Mutation),
    /// Drop cached data for this screen and fetch again.
    Refresh,
}

/// Options shared by every screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenOptions {
    /// Records per server request.
    pub page_limit: u32,
    /// Initial table page size.
    pub page_size: usize,
    pub keys: KeyBindings,
}

impl Default for ScreenOptions {
    fn default() -> Self {
        Self {
            page_limit: 50,
            page_size: 10,
            keys: KeyBindings::default(),
        }
    }
}

/// A routed page of the dashboard.
pub trait Screen {
    /// Sidebar and header title.
    fn title(&self) -> Text;

    /// The query this screen wants to display right now.
    fn request(&self) -> Option<QueryRequest>;

    fn query(&self) -> &Query<QueryData>;

    fn query_mut(&mut self) -> &mut Query<QueryData>;

    /// Called after the query accepted a response.
    fn on_data(&mut self) {}

    fn handle_key(&mut self, key: KeyEvent, lang: Language) -> ScreenAction;

    fn handle_mouse(&mut self, _mouse: MouseEvent, _lang: Language) -> ScreenAction {
        ScreenAction::None
    }

    /// A mutation this screen submitted finished.
    fn mutation_finished(&mut self, _result: &Result<(), ApiError>, _lang: Language) {}

    /// Whether keys should go to a text field rather than global shortcuts.
    fn captures_input(&self) -> bool {
        false
    }

    /// Key context for the footer hints.
    fn context(&self) -> KeyContext {
        KeyContext::Table
    }

    /// Advance animations.
    fn tick(&mut self) {}

    /// Back to the freshly mounted state.
    fn reset(&mut self);

    fn render(&mut self, frame: &mut Frame, area: Rect, lang: Language);
}
