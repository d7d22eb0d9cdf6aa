//! Main application state and event loop.
//!
//! This module implements The Elm Architecture (TEA) pattern: terminal
//! events and background task results update the [`App`], and
//! [`App::view`] draws it.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use tracing::{debug, error, info, trace, warn};

use crate::api::types::AdminSession;
use crate::api::{ApiError, SouqClient};
use crate::cache::{FetchPlan, QueryCache, QueryKey, QueryStatus};
use crate::config::Settings;
use crate::error::AppError;
use crate::events::{Event, KeyBindings, KeyContext};
use crate::i18n::{Language, Text};
use crate::logging::Telemetry;
use crate::tasks::{ApiMessage, MutationKind, QueryData, QueryRequest, TaskSpawner};
use crate::ui::components::{
    centered_rect, render_context_help, ErrorDialog, LoadingIndicator, Notification,
    NotificationManager, SpinnerStyle,
};
use crate::ui::theme::theme;
use crate::ui::views::{
    CategoriesResource, CouponsResource, DashboardView, HelpAction, HelpView, LoginAction,
    LoginView, OrdersResource, ReportsView, ResourcePage, RestaurantsResource, Screen,
    ScreenAction, ScreenOptions, SettingsView, UsersResource,
};

const SIDEBAR_WIDTH: u16 = 24;

/// Toasts visible at once.
const MAX_TOASTS: usize = 3;

const GREETING_DURATION: Duration = Duration::from_secs(2);

/// Resources computed from all the others. Any successful write makes them stale.
const AGGREGATES: [&str; 2] = ["dashboard", "reports"];

/// A page reachable from the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Dashboard,
    Users,
    Restaurants,
    Orders,
    Categories,
    Coupons,
    Reports,
    Settings,
}

impl Route {
    /// Sidebar order. The number key for a route is its position plus one.
    pub const ALL: [Route; 8] = [
        Route::Dashboard,
        Route::Users,
        Route::Restaurants,
        Route::Orders,
        Route::Categories,
        Route::Coupons,
        Route::Reports,
        Route::Settings,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// One screen per route, in [`Route::ALL`] order.
fn build_screens(options: ScreenOptions) -> Vec<Box<dyn Screen>> {
    vec![
        Box::new(DashboardView::new(options)),
        Box::new(ResourcePage::<UsersResource>::new(options)),
        Box::new(ResourcePage::<RestaurantsResource>::new(options)),
        Box::new(ResourcePage::<OrdersResource>::new(options)),
        Box::new(ResourcePage::<CategoriesResource>::new(options)),
        Box::new(ResourcePage::<CouponsResource>::new(options)),
        Box::new(ReportsView::new(options)),
        Box::new(SettingsView::new()),
    ]
}

fn mutation_text(kind: MutationKind) -> Text {
    match kind {
        MutationKind::Created => Text::Created,
        MutationKind::Updated => Text::Updated,
        MutationKind::Deleted => Text::Deleted,
        MutationKind::StatusChanged => Text::StatusChanged,
        MutationKind::SettingsSaved => Text::SettingsSaved,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

/// The main application struct that holds all state.
///
/// This implements the Model part of The Elm Architecture (TEA).
pub struct App {
    /// Whether the application should quit.
    should_quit: bool,
    language: Language,
    /// `None` until the admin signs in.
    session: Option<AdminSession>,
    login: LoginView,
    route: Route,
    screens: Vec<Box<dyn Screen>>,
    help: HelpView,
    show_help: bool,
    /// Panic message per route whose page crashed and awaits a reload.
    crashed: Vec<Option<String>>,
    /// Route whose screen submitted the mutation in flight.
    cache: QueryCache<QueryData>,
    client: SouqClient,
    spawner: TaskSpawner,
    /// Notification manager for toast messages.
    notifications: NotificationManager,
    /// Error dialog for critical errors.
    error_dialog: ErrorDialog,
    /// Header spinner while the current page loads.
    loading: LoadingIndicator,
    telemetry: Telemetry,
    /// Where the sidebar was last drawn, for mouse navigation.
    sidebar: Rect,
}

impl App {
    /// Create a new application instance.
    pub fn new(settings: &Settings, client: SouqClient, spawner: TaskSpawner) -> Self {
        debug!("Creating new application instance");
        let options = ScreenOptions {
            page_limit: settings.page_limit,
            page_size: settings.default_page_size,
            keys: KeyBindings::new(settings.vim_mode),
        };
        let screens = build_screens(options);
        let telemetry = Telemetry::from_settings(settings);
        debug!(telemetry = telemetry.is_enabled(), "Error reporting configured");
        Self {
            should_quit: false,
            language: settings.language,
            session: None,
            login: LoginView::new(Some(settings.admin_email.as_str())),
            route: Route::default(),
            crashed: vec![None; screens.len()],
            screens,
            help: HelpView::new(),
            show_help: false,
            cache: QueryCache::new(Duration::from_secs(settings.cache_ttl_seconds)),
            client,
            spawner,
            notifications: NotificationManager::with_max_visible(MAX_TOASTS),
            error_dialog: ErrorDialog::new(),
            loading: LoadingIndicator::new().with_style(SpinnerStyle::Simple),
            telemetry,
            sidebar: Rect::default(),
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        if language != self.language {
            info!(language = %language, "Switching language");
            self.language = language;
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    /// Enter the dashboard as `session`.
    pub fn sign_in(&mut self, session: AdminSession) {
        info!(email = %session.email, "Admin session started");
        let greeting = format!(
            "{}, {}",
            self.language.pick("Welcome", "مرحبا"),
            session.display_name
        );
        self.session = Some(session);
        self.notifications
            .push(Notification::success(greeting).with_duration(GREETING_DURATION));
        self.sync_query();
    }

    fn sign_out(&mut self) {
        let email = self.session.take().map(|s| s.email).unwrap_or_default();
        info!(email = %email, "Admin signed out");
        self.cache.clear();
        for screen in &mut self.screens {
            screen.reset();
        }
        self.crashed.iter_mut().for_each(|c| *c = None);
        self.show_help = false;
        self.route = Route::default();
        self.login = LoginView::new(Some(email.as_str()));
    }

    fn current(&self) -> &dyn Screen {
        self.screens[self.route.index()].as_ref()
    }

    fn is_crashed(&self) -> bool {
        self.crashed[self.route.index()].is_some()
    }

    /// Handle an error by showing a dialog or a toast.
    ///
    /// Critical errors open the error dialog; everything else becomes a toast.
    pub fn handle_error(&mut self, error: &AppError) {
        let lang = self.language;
        self.telemetry.capture("app", &error.to_string());
        if error.is_critical() {
            warn!(error = %error, "Critical error occurred");
            self.error_dialog.show(
                lang.text(Text::SomethingWentWrong),
                error.user_message(lang),
                error.suggested_action(lang).map(String::from),
            );
        } else {
            debug!(error = %error, "Recoverable error occurred");
            let message = if error.is_recoverable() {
                format!("{}  {}", error.user_message(lang), lang.text(Text::Retry))
            } else {
                error.user_message(lang)
            };
            self.notifications.error(message);
        }
    }

    /// Update application state based on an event.
    ///
    /// This is the Update part of The Elm Architecture (TEA).
    pub fn update(&mut self, event: Event) {
        match event {
            Event::Quit => {
                info!("Quit event received");
                self.should_quit = true;
            }
            Event::Key(key) => {
                trace!(key = ?key.code, modifiers = ?key.modifiers, "Key event");
                self.handle_key(key);
            }
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => {
                trace!(width, height, "Terminal resize event");
            }
            Event::Tick => self.handle_tick(),
        }
        self.sync_query();
    }

    /// Apply the result of a background task.
    pub fn handle_api_message(&mut self, message: ApiMessage) {
        match message {
            ApiMessage::LoggedIn(Ok(session)) => self.sign_in(session),
            ApiMessage::LoggedIn(Err(e)) => {
                warn!(error = %e, "Sign-in failed");
                self.login
                    .set_error(AppError::from(e).user_message(self.language));
            }
            ApiMessage::QueryResolved {
                key,
                ticket,
                result,
            } => {
                if !self.cache.resolve(&key, ticket, &result) {
                    return;
                }
                let current = self.route.index();
                let mut failure = None;
                for (index, screen) in self.screens.iter_mut().enumerate() {
                    if screen.query().key() != Some(&key) {
                        continue;
                    }
                    if screen.query_mut().apply(&key, ticket, result.clone()) {
                        screen.on_data();
                        if index == current {
                            failure = result.as_ref().err().cloned();
                        }
                    }
                }
                if let Some(e) = failure {
                    self.handle_error(&AppError::from(e));
                }
            }
            ApiMessage::MutationResolved {
                origin,
                resource,
                kind,
                result,
            } => self.mutation_resolved(origin, resource, kind, result),
        }
        self.sync_query();
    }

    fn mutation_resolved(
        &mut self,
        origin: Route,
        resource: &'static str,
        kind: MutationKind,
        result: Result<(), ApiError>,
    ) {
        let lang = self.language;
        match &result {
            Ok(()) => {
                info!(resource, ?kind, "Mutation applied");
                self.cache.invalidate(resource);
                for aggregate in AGGREGATES {
                    self.cache.invalidate(aggregate);
                }
                self.notifications.success(lang.text(mutation_text(kind)));
            }
            Err(e) => {
                warn!(resource, ?kind, error = %e, "Mutation failed");
                self.handle_error(&AppError::from(e.clone()));
            }
        }
        self.screens[origin.index()].mutation_finished(&result, lang);
    }

    /// Point the current screen's query at the data it asks for.
    ///
    /// Also refetches data the cache no longer holds, which is how
    /// invalidated and expired pages reload while still showing the old rows.
    fn sync_query(&mut self) {
        if !self.is_signed_in() || self.is_crashed() {
            return;
        }
        let index = self.route.index();
        let Some(request) = self.screens[index].request() else {
            return;
        };
        let key = request.key();
        let query = self.screens[index].query();
        if query.key() == Some(&key) {
            let orphaned = matches!(query.status(), QueryStatus::Success | QueryStatus::Loading)
                && self.cache.peek(&key).is_none()
                && !self.cache.is_in_flight(&key);
            if !orphaned {
                return;
            }
            debug!(key = %key, "Reloading data dropped from the cache");
        }
        let plan = self.cache.begin(&key);
        self.start_query(index, key, request, plan);
    }

    fn start_query(
        &mut self,
        index: usize,
        key: QueryKey,
        request: QueryRequest,
        plan: FetchPlan<QueryData>,
    ) {
        let fetch = match &plan {
            FetchPlan::Fetch(ticket) => Some(*ticket),
            _ => None,
        };
        let cached = matches!(plan, FetchPlan::Cached(_));
        let screen = &mut self.screens[index];
        screen.query_mut().start(key.clone(), plan);
        if cached {
            screen.on_data();
        }
        if let Some(ticket) = fetch {
            self.spawner.spawn_query(&self.client, key, ticket, request);
        }
    }

    /// Fetch the current page again, ignoring the cache.
    fn refresh(&mut self) {
        let index = self.route.index();
        let Some(request) = self.screens[index].request() else {
            return;
        };
        let key = request.key();
        debug!(key = %key, "Refreshing");
        let plan = self.cache.begin_fetch(&key);
        self.start_query(index, key, request, plan);
    }

    fn perform(&mut self, action: ScreenAction) {
        match action {
            ScreenAction::None => {}
            ScreenAction::Mutate(mutation) => {
                debug!(resource = mutation.resource(), "Submitting mutation");
                self.spawner.spawn_mutation(&self.client, self.route, mutation);
            }
            ScreenAction::Refresh => self.refresh(),
        }
    }

    fn navigate(&mut self, route: Route) {
        if route != self.route {
            debug!(from = ?self.route, to = ?route, "Navigating");
            self.route = route;
        }
    }

    /// Record a panic from the current page. The page shows a fallback until reloaded.
    fn crash(&mut self, payload: Box<dyn Any + Send>) {
        let message = panic_message(payload.as_ref());
        error!(route = ?self.route, message = %message, "Page crashed");
        let error = AppError::Panic(message.clone());
        self.telemetry.capture("boundary", &error.to_string());
        self.crashed[self.route.index()] = Some(message);
    }

    /// Remount the crashed current page.
    fn reload(&mut self) {
        let index = self.route.index();
        info!(route = ?self.route, "Reloading page");
        self.crashed[index] = None;
        self.screens[index].reset();
    }

    /// Handle keyboard input events.
    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            info!("Quit requested");
            self.should_quit = true;
            return;
        }

        // Error dialog blocks all other input.
        if self.error_dialog.is_visible() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                self.error_dialog.dismiss();
            }
            return;
        }

        if key.code == KeyCode::Char('l') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.set_language(self.language.toggle());
            return;
        }

        if !self.is_signed_in() {
            if let Some(LoginAction::Submit { email, password }) =
                self.login.handle_input(key, self.language)
            {
                info!(email = %email, "Signing in");
                self.spawner.spawn_login(&self.client, email, password);
            }
            return;
        }

        if self.show_help {
            if let Some(HelpAction::Close) = self.help.handle_input(key) {
                self.show_help = false;
            }
            return;
        }

        let crashed = self.is_crashed();
        if (crashed || !self.current().captures_input()) && self.handle_global_key(key) {
            return;
        }
        if crashed {
            if key.code == KeyCode::Char('r') {
                self.reload();
            }
            return;
        }

        let lang = self.language;
        let screen = &mut self.screens[self.route.index()];
        match panic::catch_unwind(AssertUnwindSafe(|| screen.handle_key(key, lang))) {
            Ok(action) => self.perform(action),
            Err(payload) => self.crash(payload),
        }
    }

    /// Keys that work on every page. Returns whether the key was used.
    fn handle_global_key(&mut self, key: KeyEvent) -> bool {
        match (key.code, key.modifiers) {
            (KeyCode::Char('q'), KeyModifiers::NONE) => {
                info!("Quit requested");
                self.should_quit = true;
            }
            (KeyCode::Char('?'), _) => {
                self.help.reset_scroll();
                self.show_help = true;
            }
            (KeyCode::Char('o'), KeyModifiers::CONTROL) => self.sign_out(),
            (KeyCode::Tab, _) => self.navigate(self.route.next()),
            (KeyCode::BackTab, _) => self.navigate(self.route.prev()),
            (KeyCode::Char(c @ '1'..='9'), KeyModifiers::NONE) => {
                let route = c
                    .to_digit(10)
                    .and_then(|d| Route::from_index(d as usize - 1));
                match route {
                    Some(route) => self.navigate(route),
                    None => return false,
                }
            }
            _ => return false,
        }
        true
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if !self.is_signed_in() || self.show_help || self.error_dialog.is_visible() {
            return;
        }
        if mouse.kind == MouseEventKind::Down(MouseButton::Left) {
            if let Some(route) = self.route_at(mouse.column, mouse.row) {
                self.navigate(route);
                return;
            }
        }
        if self.is_crashed() {
            return;
        }
        let lang = self.language;
        let screen = &mut self.screens[self.route.index()];
        match panic::catch_unwind(AssertUnwindSafe(|| screen.handle_mouse(mouse, lang))) {
            Ok(action) => self.perform(action),
            Err(payload) => self.crash(payload),
        }
    }

    /// The sidebar entry under a screen position.
    fn route_at(&self, column: u16, row: u16) -> Option<Route> {
        let s = self.sidebar;
        let inside = column > s.x && column + 1 < s.x + s.width && row > s.y && row + 1 < s.y + s.height;
        if !inside {
            return None;
        }
        Route::from_index(usize::from(row - s.y - 1))
    }

    fn handle_tick(&mut self) {
        self.notifications.tick();
        // Expired entries are dropped so the visible page reloads them.
        self.cache.prune();
        if self.is_signed_in() && !self.is_crashed() {
            let loading = self.current().query().is_loading();
            self.loading.set_active(loading);
            self.screens[self.route.index()].tick();
        } else {
            self.loading.set_active(self.login.is_submitting());
        }
        self.loading.tick();
    }

    /// Render the application UI.
    ///
    /// This is the View part of The Elm Architecture (TEA).
    pub fn view(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let lang = self.language;

        let [header, body, footer] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(area);

        self.render_header(frame, header);
        if self.is_signed_in() {
            self.render_body(frame, body);
        } else {
            self.login.render(frame, body, lang);
        }
        self.render_footer(frame, footer);

        // Notifications sit on top of everything except dialogs.
        self.notifications.render(frame, area, lang);

        if self.show_help {
            let dialog = centered_rect(area, 76, area.height.saturating_sub(4));
            self.help.render(frame, dialog, lang);
        }

        self.error_dialog.render(frame, area, lang);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let t = theme();
        let lang = self.language;
        let rtl = lang.is_rtl();

        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(t.border));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [start, end] =
            Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(inner);
        let (title_area, status_area) = if rtl { (end, start) } else { (start, end) };

        let title = match self.session {
            Some(_) => format!(
                "{} · {}",
                lang.text(Text::AppTitle),
                lang.text(self.current().title())
            ),
            None => lang.text(Text::AppTitle).to_string(),
        };
        frame.render_widget(
            Paragraph::new(Span::styled(
                title,
                Style::default().fg(t.accent).add_modifier(Modifier::BOLD),
            ))
            .alignment(if rtl { Alignment::Right } else { Alignment::Left }),
            title_area,
        );

        let mut status = Vec::new();
        if self.loading.is_active() {
            status.push(self.loading.spinner_frame().to_string());
        }
        if let Some(session) = &self.session {
            if !self.is_crashed() && self.current().query().data().is_some() {
                status.push(self.current().query().source().icon().to_string());
            }
            status.push(session.display_name.clone());
        }
        status.push(lang.code().to_uppercase());
        if rtl {
            status.reverse();
        }
        frame.render_widget(
            Paragraph::new(Span::styled(status.join("  "), Style::default().fg(t.dim)))
                .alignment(if rtl { Alignment::Left } else { Alignment::Right }),
            status_area,
        );
    }

    fn render_body(&mut self, frame: &mut Frame, area: Rect) {
        let rtl = self.language.is_rtl();
        // The sidebar sits on the reading-start side.
        let (sidebar, content) = if rtl {
            let [content, sidebar] =
                Layout::horizontal([Constraint::Min(1), Constraint::Length(SIDEBAR_WIDTH)])
                    .areas(area);
            (sidebar, content)
        } else {
            let [sidebar, content] =
                Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(1)])
                    .areas(area);
            (sidebar, content)
        };
        self.sidebar = sidebar;
        self.render_sidebar(frame, sidebar);
        self.render_page(frame, content);
    }

    fn render_sidebar(&self, frame: &mut Frame, area: Rect) {
        let t = theme();
        let lang = self.language;
        let rtl = lang.is_rtl();
        let alignment = if rtl { Alignment::Right } else { Alignment::Left };

        let lines: Vec<Line> = Route::ALL
            .iter()
            .zip(&self.screens)
            .map(|(&route, screen)| {
                let title = lang.text(screen.title());
                let number = route.index() + 1;
                let label = if rtl {
                    format!(" {} {} ", title, number)
                } else {
                    format!(" {} {} ", number, title)
                };
                let style = if route == self.route {
                    Style::default()
                        .fg(t.accent)
                        .bg(t.highlight_bg)
                        .add_modifier(Modifier::BOLD)
                } else if self.crashed[route.index()].is_some() {
                    Style::default().fg(t.error)
                } else {
                    Style::default().fg(t.fg)
                };
                Line::from(Span::styled(label, style))
            })
            .collect();

        let sidebar = Paragraph::new(lines).alignment(alignment).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(t.border)),
        );
        frame.render_widget(sidebar, area);
    }

    /// Draw the current page inside a panic boundary.
    fn render_page(&mut self, frame: &mut Frame, area: Rect) {
        let lang = self.language;
        let index = self.route.index();
        if self.crashed[index].is_none() {
            let screen = &mut self.screens[index];
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| screen.render(frame, area, lang)));
            match outcome {
                Ok(()) => return,
                Err(payload) => self.crash(payload),
            }
        }
        if let Some(message) = &self.crashed[index] {
            render_crash(frame, area, message, lang);
        }
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let context = if self.session.is_none() || self.show_help || self.error_dialog.is_visible() {
            KeyContext::Dialog
        } else if self.is_crashed() {
            KeyContext::Global
        } else {
            self.current().context()
        };
        render_context_help(frame, area, context, self.language);
    }
}

/// Fallback drawn in place of a page that panicked.
fn render_crash(frame: &mut Frame, area: Rect, message: &str, lang: Language) {
    let t = theme();
    let error = AppError::Panic(message.to_string());
    let mut lines = vec![
        Line::from(Span::styled(
            lang.text(Text::SomethingWentWrong),
            Style::default().fg(t.error).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled(message.to_string(), Style::default().fg(t.dim))),
    ];
    if let Some(hint) = error.suggested_action(lang) {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(hint, Style::default().fg(t.fg))));
    }
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(t.error)),
            ),
        area,
    );
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use ratatui::{backend::TestBackend, Terminal};
    use tokio::sync::mpsc::UnboundedReceiver;

    use super::*;
    use crate::api::ClientOptions;
    use crate::cache::Query;
    use crate::tasks::{create_task_channel, Mutation};

    fn test_app() -> (App, UnboundedReceiver<ApiMessage>) {
        let settings = Settings::default();
        let client = SouqClient::seeded(ClientOptions::from_settings(&settings).instant());
        let (rx, spawner) = create_task_channel();
        (App::new(&settings, client, spawner), rx)
    }

    fn session() -> AdminSession {
        AdminSession {
            email: "admin@souq.example".into(),
            display_name: "admin".into(),
        }
    }

    /// Feed task results back until nothing arrives for a while.
    async fn settle(app: &mut App, rx: &mut UnboundedReceiver<ApiMessage>) {
        while let Ok(Some(message)) =
            tokio::time::timeout(Duration::from_millis(200), rx.recv()).await
        {
            app.handle_api_message(message);
        }
    }

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn draw(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 36)).unwrap();
        terminal.draw(|f| app.view(f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    /// Panics while drawing until it is reset.
    struct Exploding {
        armed: bool,
        query: Query<QueryData>,
    }

    impl Screen for Exploding {
        fn title(&self) -> Text {
            Text::Dashboard
        }

        fn request(&self) -> Option<QueryRequest> {
            None
        }

        fn query(&self) -> &Query<QueryData> {
            &self.query
        }

        fn query_mut(&mut self) -> &mut Query<QueryData> {
            &mut self.query
        }

        fn handle_key(&mut self, _key: KeyEvent, _lang: Language) -> ScreenAction {
            ScreenAction::None
        }

        fn reset(&mut self) {
            self.armed = false;
        }

        fn render(&mut self, _frame: &mut Frame, _area: Rect, _lang: Language) {
            if self.armed {
                panic!("boom");
            }
        }
    }

    /// Counts the mutation results handed back to it.
    struct Recorder {
        finished: Rc<Cell<usize>>,
        query: Query<QueryData>,
    }

    impl Screen for Recorder {
        fn title(&self) -> Text {
            Text::Users
        }

        fn request(&self) -> Option<QueryRequest> {
            None
        }

        fn query(&self) -> &Query<QueryData> {
            &self.query
        }

        fn query_mut(&mut self) -> &mut Query<QueryData> {
            &mut self.query
        }

        fn handle_key(&mut self, _key: KeyEvent, _lang: Language) -> ScreenAction {
            ScreenAction::None
        }

        fn reset(&mut self) {}

        fn render(&mut self, _frame: &mut Frame, _area: Rect, _lang: Language) {}

        fn mutation_finished(&mut self, _result: &Result<(), ApiError>, _lang: Language) {
            self.finished.set(self.finished.get() + 1);
        }
    }

    #[tokio::test]
    async fn test_sign_in_loads_dashboard() {
        let (mut app, mut rx) = test_app();
        assert!(!app.is_signed_in());

        // Page keys are typed into the form before sign-in.
        app.update(press(KeyCode::Char('2')));
        assert_eq!(app.route(), Route::Dashboard);
        app.update(press(KeyCode::Backspace));

        for c in "admin123".chars() {
            app.update(press(KeyCode::Char(c)));
        }
        app.update(press(KeyCode::Enter));
        settle(&mut app, &mut rx).await;

        assert!(app.is_signed_in());
        assert!(app.screens[0].query().data().is_some());
        assert!(draw(&mut app).contains("Total users"));
    }

    #[tokio::test]
    async fn test_wrong_password_stays_on_login() {
        let (mut app, mut rx) = test_app();
        for c in "nope".chars() {
            app.update(press(KeyCode::Char(c)));
        }
        app.update(press(KeyCode::Enter));
        settle(&mut app, &mut rx).await;

        assert!(!app.is_signed_in());
        assert!(app.login.error().is_some());
    }

    #[tokio::test]
    async fn test_page_keys_navigate() {
        let (mut app, _rx) = test_app();
        app.sign_in(session());

        app.update(press(KeyCode::Char('4')));
        assert_eq!(app.route(), Route::Orders);
        app.update(press(KeyCode::Tab));
        assert_eq!(app.route(), Route::Categories);
        app.update(press(KeyCode::BackTab));
        app.update(press(KeyCode::BackTab));
        assert_eq!(app.route(), Route::Restaurants);
        app.update(press(KeyCode::Char('8')));
        assert_eq!(app.route(), Route::Settings);
        app.update(press(KeyCode::Char('9')));
        assert_eq!(app.route(), Route::Settings);
        app.update(press(KeyCode::Tab));
        assert_eq!(app.route(), Route::Dashboard);
    }

    #[tokio::test]
    async fn test_sidebar_click_navigates() {
        let (mut app, _rx) = test_app();
        app.sign_in(session());
        draw(&mut app);

        let sidebar = app.sidebar;
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: sidebar.x + 2,
            row: sidebar.y + 1 + Route::Coupons.index() as u16,
            modifiers: KeyModifiers::NONE,
        };
        app.update(Event::Mouse(click));
        assert_eq!(app.route(), Route::Coupons);
    }

    #[tokio::test]
    async fn test_language_toggle_mirrors_sidebar() {
        let (mut app, _rx) = test_app();
        app.sign_in(session());
        draw(&mut app);
        assert_eq!(app.sidebar.x, 0);

        app.update(ctrl('l'));
        assert_eq!(app.language(), Language::Arabic);
        let text = draw(&mut app);
        assert!(app.sidebar.x > 0);
        assert!(text.contains("لوحة"));

        app.update(ctrl('l'));
        assert_eq!(app.language(), Language::English);
    }

    #[tokio::test]
    async fn test_quit_keys() {
        let (mut app, _rx) = test_app();
        // Typed into the email or password field.
        app.update(press(KeyCode::Char('q')));
        assert!(!app.should_quit());
        app.update(ctrl('c'));
        assert!(app.should_quit());

        let (mut app, _rx) = test_app();
        app.sign_in(session());
        app.update(press(KeyCode::Char('q')));
        assert!(app.should_quit());
    }

    #[tokio::test]
    async fn test_help_overlay_takes_input() {
        let (mut app, _rx) = test_app();
        app.sign_in(session());
        app.update(press(KeyCode::Char('?')));
        assert!(app.show_help);
        app.update(press(KeyCode::Char('3')));
        assert_eq!(app.route(), Route::Dashboard);
        assert!(draw(&mut app).contains("Keyboard shortcuts"));
        app.update(press(KeyCode::Esc));
        assert!(!app.show_help);
    }

    #[tokio::test]
    async fn test_crashed_page_is_contained() {
        let (mut app, _rx) = test_app();
        app.sign_in(session());
        app.screens[0] = Box::new(Exploding {
            armed: true,
            query: Query::new(),
        });

        let text = draw(&mut app);
        assert!(text.contains("Something went wrong"));
        assert!(app.is_crashed());

        // Other pages still work.
        app.update(press(KeyCode::Char('2')));
        assert_eq!(app.route(), Route::Users);
        assert!(!draw(&mut app).contains("Something went wrong"));

        app.update(press(KeyCode::Char('1')));
        assert!(app.is_crashed());
        app.update(press(KeyCode::Char('r')));
        assert!(!app.is_crashed());
        assert!(!draw(&mut app).contains("Something went wrong"));
    }

    #[tokio::test]
    async fn test_mutation_refreshes_page_and_aggregates() {
        let (mut app, mut rx) = test_app();
        app.sign_in(session());
        app.update(press(KeyCode::Char('5')));
        settle(&mut app, &mut rx).await;

        let first = match app.current().query().data() {
            Some(QueryData::Categories(page)) => page.items[0].clone(),
            other => panic!("expected categories, got {:?}", other),
        };
        let dashboard = QueryRequest::Dashboard.key();
        assert!(app.cache.peek(&dashboard).is_some());

        app.perform(ScreenAction::Mutate(Mutation::ToggleCategory(first.id.clone())));
        settle(&mut app, &mut rx).await;

        assert!(app.cache.peek(&dashboard).is_none());
        let refreshed = match app.current().query().data() {
            Some(QueryData::Categories(page)) => page.items.iter().find(|c| c.id == first.id).cloned(),
            _ => None,
        };
        assert_eq!(refreshed.map(|c| c.is_active), Some(!first.is_active));
        assert!(app
            .notifications
            .iter()
            .any(|n| n.message == Language::English.text(Text::StatusChanged)));
    }

    #[tokio::test]
    async fn test_mutation_result_returns_to_submitting_page() {
        let (mut app, mut rx) = test_app();
        app.sign_in(session());
        let users = Rc::new(Cell::new(0));
        let categories = Rc::new(Cell::new(0));
        app.screens[Route::Users.index()] = Box::new(Recorder {
            finished: users.clone(),
            query: Query::new(),
        });
        app.screens[Route::Categories.index()] = Box::new(Recorder {
            finished: categories.clone(),
            query: Query::new(),
        });

        // Both are in flight before either answers.
        app.navigate(Route::Users);
        app.perform(ScreenAction::Mutate(Mutation::DeleteUser("u9999".into())));
        app.navigate(Route::Categories);
        app.perform(ScreenAction::Mutate(Mutation::DeleteCategory("c9999".into())));
        settle(&mut app, &mut rx).await;

        assert_eq!(users.get(), 1);
        assert_eq!(categories.get(), 1);
    }

    #[tokio::test]
    async fn test_latest_request_wins() {
        let (mut app, mut rx) = test_app();
        app.sign_in(session());
        app.update(press(KeyCode::Char('7')));
        app.update(press(KeyCode::Char('p')));
        app.update(press(KeyCode::Char('p')));
        settle(&mut app, &mut rx).await;

        let screen = app.current();
        let wanted = screen.request().unwrap().key();
        assert_eq!(screen.query().key(), Some(&wanted));
        assert!(matches!(screen.query().data(), Some(QueryData::Report(_))));
    }

    #[tokio::test]
    async fn test_critical_error_opens_dialog() {
        let (mut app, _rx) = test_app();
        app.sign_in(session());
        app.handle_error(&AppError::Api(ApiError::Unauthorized));
        assert!(app.error_dialog.is_visible());

        app.update(press(KeyCode::Char('2')));
        assert_eq!(app.route(), Route::Dashboard);
        app.update(press(KeyCode::Esc));
        assert!(!app.error_dialog.is_visible());
    }

    #[tokio::test]
    async fn test_recoverable_error_becomes_toast() {
        let (mut app, _rx) = test_app();
        let before = app.notifications.len();
        app.handle_error(&AppError::Api(ApiError::Timeout(10_000)));
        assert!(!app.error_dialog.is_visible());
        assert_eq!(app.notifications.len(), before + 1);
    }

    #[tokio::test]
    async fn test_sign_out_returns_to_login() {
        let (mut app, _rx) = test_app();
        app.sign_in(session());
        app.update(press(KeyCode::Char('3')));
        app.update(ctrl('o'));
        assert!(!app.is_signed_in());
        assert_eq!(app.route(), Route::Dashboard);
        assert_eq!(app.cache.stats().entries, 0);
    }
}
