//! Generic list page for one marketplace resource.
//!
//! A [`ResourcePage`] composes a server query (filters plus a server page of
//! records) with the interactive [`DataTable`], and owns the create/edit
//! form, the delete confirmation and the detail dialog. Everything that
//! differs between users, restaurants, orders, categories and coupons lives
//! in the [`Resource`] implementation.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::Paragraph,
    Frame,
};
use tracing::debug;

use super::{Screen, ScreenAction, ScreenOptions};
use crate::api::{ApiError, ListQuery, Page, Record};
use crate::cache::Query;
use crate::error::AppError;
use crate::events::KeyContext;
use crate::i18n::{Language, Text};
use crate::table::{search, Column, RowActions};
use crate::tasks::{Mutation, QueryData, QueryRequest};
use crate::ui::components::{
    ConfirmAction, ConfirmDialog, DataTable, DetailDialog, FormAction, FormDialog, FormField,
    Label, TableOutcome,
};
use crate::ui::theme::theme;

/// List filters of a resource.
pub type Filters<R> = <<R as Resource>::Row as Record>::Filters;

/// Everything resource-specific about a list page.
pub trait Resource: 'static {
    type Row: Record;

    const TITLE: Text;
    /// Singular noun for dialog titles.
    const NOUN: Label;
    /// Whether the page offers a create form.
    const CAN_CREATE: bool = true;

    fn columns() -> Vec<Column<Self::Row>>;

    /// Filter controls shown above the table.
    fn filter_controls() -> Vec<FilterControl>;

    /// Build the list filters from the selected option of each control.
    fn filters(selection: &[Option<usize>]) -> Filters<Self>;

    fn request(query: ListQuery<Filters<Self>>) -> QueryRequest;

    /// The page of rows inside a response for this resource.
    fn page(data: &QueryData) -> Option<&Page<Self::Row>>;

    /// Form fields, prefilled from `row` when editing.
    fn form_fields(row: Option<&Self::Row>) -> Vec<FormField>;

    /// Build a record from a submitted form. Fields the form does not edit
    /// are taken from `base`, or defaulted when creating.
    fn from_form(form: &FormDialog, base: Option<&Self::Row>) -> Self::Row;

    /// Label / value pairs for the detail dialog.
    fn details(row: &Self::Row, lang: Language) -> Vec<(String, String)>;

    /// Short human name of a row, used in the delete confirmation.
    fn name(row: &Self::Row, lang: Language) -> String;

    fn create(row: Self::Row) -> Mutation;

    fn update(id: String, row: Self::Row) -> Mutation;

    fn delete(id: String) -> Mutation;

    /// The status change `t` applies to a row, if any.
    fn toggle(row: &Self::Row) -> Option<Mutation>;
}

/// One filter dimension: an optional choice among labelled options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterControl {
    label: Label,
    options: Vec<Label>,
    selected: Option<usize>,
}

impl FilterControl {
    pub fn new(label: Label, options: Vec<Label>) -> Self {
        Self {
            label,
            options,
            selected: None,
        }
    }

    /// Build a control from an enum's variants and their labels.
    pub fn from_labels<E: Copy>(
        label: Label,
        all: &[E],
        name: impl Fn(E, Language) -> &'static str,
    ) -> Self {
        Self::new(label, options(all, name))
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// All, then each option in turn, then back to All.
    pub fn cycle_next(&mut self) {
        self.selected = match self.selected {
            None if !self.options.is_empty() => Some(0),
            Some(i) if i + 1 < self.options.len() => Some(i + 1),
            _ => None,
        };
    }

    pub fn cycle_prev(&mut self) {
        self.selected = match self.selected {
            None => self.options.len().checked_sub(1),
            Some(0) => None,
            Some(i) => Some(i - 1),
        };
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    fn display(&self, lang: Language) -> String {
        let value = match self.selected.and_then(|i| self.options.get(i)) {
            Some(option) => lang.pick(option.0, option.1),
            None => lang.text(Text::All),
        };
        format!("{}: {}", lang.pick(self.label.0, self.label.1), value)
    }
}

/// Map a selection index back to an enum variant.
pub fn pick<E: Copy>(all: &[E], selected: Option<usize>) -> Option<E> {
    selected.and_then(|i| all.get(i).copied())
}

/// Amount in riyals, currency after the number in Arabic.
pub fn money(amount: f64, lang: Language) -> String {
    match lang {
        Language::English => format!("SAR {:.2}", amount),
        Language::Arabic => format!("{:.2} ر.س", amount),
    }
}

/// Calendar date of a timestamp.
pub fn date(at: chrono::DateTime<chrono::Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

/// Yes / no in `lang`.
pub fn yes_no(value: bool, lang: Language) -> &'static str {
    if value {
        lang.pick("Yes", "نعم")
    } else {
        lang.pick("No", "لا")
    }
}

/// Choice options from an enum's variants and their labels.
pub fn options<E: Copy>(all: &[E], name: impl Fn(E, Language) -> &'static str) -> Vec<Label> {
    all.iter()
        .map(|&e| (name(e, Language::English), name(e, Language::Arabic)))
        .collect()
}

/// Message from a row of the table.
#[derive(Debug, Clone, PartialEq, Eq)]
enum RowMsg {
    View(String),
    Edit(String),
    Delete(String),
}

/// An open create or edit form.
#[derive(Debug)]
struct OpenForm {
    dialog: FormDialog,
    /// Id of the edited record, `None` when creating.
    editing: Option<String>,
}

/// List page for resource `R`.
pub struct ResourcePage<R: Resource> {
    table: DataTable<R::Row, RowMsg>,
    query: Query<QueryData>,
    filters: Vec<FilterControl>,
    focused_filter: usize,
    /// One-based server page.
    server_page: u32,
    options: ScreenOptions,
    form: Option<OpenForm>,
    confirm: ConfirmDialog<String>,
    detail: DetailDialog,
    /// Filter chips as drawn, for mouse clicks.
    filter_areas: Vec<Rect>,
}

impl<R: Resource> ResourcePage<R> {
    pub fn new(options: ScreenOptions) -> Self {
        Self {
            table: Self::build_table(options),
            query: Query::new(),
            filters: R::filter_controls(),
            focused_filter: 0,
            server_page: 1,
            options,
            form: None,
            confirm: ConfirmDialog::new(),
            detail: DetailDialog::new(),
            filter_areas: Vec::new(),
        }
    }

    fn build_table(options: ScreenOptions) -> DataTable<R::Row, RowMsg> {
        DataTable::new(R::columns(), search::all_fields::<R::Row>)
            .with_page_size(options.page_size)
            .with_key_bindings(options.keys)
            .with_actions(
                RowActions::new()
                    .on_row_click(|r: &R::Row| RowMsg::View(r.id().to_string()))
                    .on_view(|r: &R::Row| RowMsg::View(r.id().to_string()))
                    .on_edit(|r: &R::Row| RowMsg::Edit(r.id().to_string()))
                    .on_delete(|r: &R::Row| RowMsg::Delete(r.id().to_string())),
            )
    }

    fn rows(&self) -> &[R::Row] {
        self.query
            .data()
            .and_then(R::page)
            .map(|p| p.items.as_slice())
            .unwrap_or(&[])
    }

    fn find(&self, id: &str) -> Option<&R::Row> {
        self.rows().iter().find(|r| r.id() == id)
    }

    /// Server-side pagination of the current response.
    pub fn server_pagination(&self) -> Option<crate::api::types::Pagination> {
        self.query.data().and_then(R::page).map(|p| p.pagination)
    }

    pub fn server_page(&self) -> u32 {
        self.server_page
    }

    pub fn filters(&self) -> &[FilterControl] {
        &self.filters
    }

    fn dialog_open(&self) -> bool {
        self.form.is_some() || self.confirm.is_visible() || self.detail.is_visible()
    }

    fn open_form(&mut self, editing: Option<String>, lang: Language) {
        let row = editing.as_deref().and_then(|id| self.find(id));
        let verb = if row.is_some() {
            lang.text(Text::Edit)
        } else {
            lang.text(Text::Create)
        };
        let title = format!("{} {}", verb, lang.pick(R::NOUN.0, R::NOUN.1));
        let dialog = FormDialog::new(title, R::form_fields(row));
        debug!(resource = R::Row::COLLECTION, ?editing, "Opening form");
        self.form = Some(OpenForm { dialog, editing });
    }

    fn on_row(&mut self, msg: RowMsg, lang: Language) -> ScreenAction {
        match msg {
            RowMsg::View(id) => {
                if let Some(row) = self.find(&id) {
                    let title = format!("{} {}", lang.pick(R::NOUN.0, R::NOUN.1), id);
                    let fields = R::details(row, lang);
                    self.detail.show(title, fields);
                }
            }
            RowMsg::Edit(id) => self.open_form(Some(id), lang),
            RowMsg::Delete(id) => {
                if let Some(row) = self.find(&id) {
                    let message = format!("{}\n{}", lang.text(Text::ConfirmDelete), R::name(row, lang));
                    self.confirm.show(message, id);
                }
            }
        }
        ScreenAction::None
    }

    fn filters_changed(&mut self) {
        self.server_page = 1;
        debug!(resource = R::Row::COLLECTION, "Filters changed");
    }

    fn handle_form_key(&mut self, key: KeyEvent, lang: Language) -> ScreenAction {
        let Some(form) = self.form.as_mut() else {
            return ScreenAction::None;
        };
        match form.dialog.handle_input(key, lang) {
            Some(FormAction::Cancel) => {
                self.form = None;
                ScreenAction::None
            }
            Some(FormAction::Submit) => {
                let base = form.editing.as_deref().and_then(|id| {
                    self.query
                        .data()
                        .and_then(R::page)
                        .and_then(|p| p.items.iter().find(|r| r.id() == id))
                });
                let record = R::from_form(&form.dialog, base);
                let mutation = match &form.editing {
                    Some(id) => R::update(id.clone(), record),
                    None => R::create(record),
                };
                ScreenAction::Mutate(mutation)
            }
            None => ScreenAction::None,
        }
    }

    fn empty_text(&self, lang: Language) -> String {
        if let Some(error) = self.query.error() {
            return format!(
                "{}  {}",
                AppError::from(error.clone()).user_message(lang),
                lang.text(Text::Retry)
            );
        }
        if self.table.state().search().is_empty() {
            lang.text(Text::NoData).to_string()
        } else {
            lang.text(Text::NoResults).to_string()
        }
    }

    fn render_filter_bar(&mut self, frame: &mut Frame, area: Rect, lang: Language) {
        let t = theme();
        let rtl = lang.is_rtl();

        let server = match self.server_pagination() {
            Some(p) => format!(
                "{} {} {} {}  ({})",
                lang.text(Text::ServerPage),
                p.page,
                lang.text(Text::Of),
                p.total_pages.max(1),
                p.total
            ),
            None => String::new(),
        };
        let server_width = server.chars().count() as u16;

        // Chips start at the reading edge; the server page counter sits at
        // the opposite edge.
        let (chips_area, server_area) = if rtl {
            let [server_area, chips_area] =
                Layout::horizontal([Constraint::Length(server_width), Constraint::Min(0)])
                    .areas(area);
            (chips_area, server_area)
        } else {
            let [chips_area, server_area] =
                Layout::horizontal([Constraint::Min(0), Constraint::Length(server_width)])
                    .areas(area);
            (chips_area, server_area)
        };
        frame.render_widget(
            Paragraph::new(Span::styled(server, Style::default().fg(t.dim))),
            server_area,
        );

        let labels: Vec<String> = self
            .filters
            .iter()
            .map(|f| format!("[{}]", f.display(lang)))
            .collect();
        let widths: Vec<u16> = labels.iter().map(|l| l.chars().count() as u16).collect();
        let total = widths.iter().sum::<u16>() + widths.len().saturating_sub(1) as u16;

        let mut x = if rtl {
            chips_area.x + chips_area.width.saturating_sub(total)
        } else {
            chips_area.x
        };
        let order: Vec<usize> = if rtl {
            (0..labels.len()).rev().collect()
        } else {
            (0..labels.len()).collect()
        };
        self.filter_areas = vec![Rect::default(); labels.len()];
        for i in order {
            let rect = Rect::new(x, area.y, widths[i], 1).intersection(chips_area);
            let style = if i == self.focused_filter {
                Style::default().fg(t.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(t.fg)
            };
            frame.render_widget(Paragraph::new(Span::styled(labels[i].as_str(), style)), rect);
            self.filter_areas[i] = rect;
            x = x.saturating_add(widths[i] + 1);
        }
    }
}

impl<R: Resource> Screen for ResourcePage<R> {
    fn title(&self) -> Text {
        R::TITLE
    }

    fn request(&self) -> Option<QueryRequest> {
        let selection: Vec<Option<usize>> = self.filters.iter().map(|f| f.selected()).collect();
        let query = ListQuery::new(R::filters(&selection))
            .with_page(self.server_page)
            .with_limit(self.options.page_limit);
        Some(R::request(query))
    }

    fn query(&self) -> &Query<QueryData> {
        &self.query
    }

    fn query_mut(&mut self) -> &mut Query<QueryData> {
        &mut self.query
    }

    fn on_data(&mut self) {
        if let Some(key) = self.query.key() {
            self.table.sync_data_key(&key.to_string());
        }
        // The server may have fewer pages than before, e.g. after a delete.
        if let Some(p) = self.server_pagination() {
            if p.total_pages > 0 && self.server_page > p.total_pages {
                self.server_page = p.total_pages;
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent, lang: Language) -> ScreenAction {
        if self.form.is_some() {
            return self.handle_form_key(key, lang);
        }
        if self.confirm.is_visible() {
            return match self.confirm.handle_input(key) {
                Some(ConfirmAction::Confirm(id)) => ScreenAction::Mutate(R::delete(id)),
                _ => ScreenAction::None,
            };
        }
        if self.detail.is_visible() {
            self.detail.handle_input(key);
            return ScreenAction::None;
        }

        if !self.table.is_editing() {
            match (key.code, key.modifiers) {
                (KeyCode::Char('n'), KeyModifiers::NONE) if R::CAN_CREATE => {
                    self.open_form(None, lang);
                    return ScreenAction::None;
                }
                (KeyCode::Char('t'), KeyModifiers::NONE) => {
                    let rows = self.query.data().and_then(R::page).map(|p| p.items.as_slice());
                    let toggle = rows
                        .and_then(|rows| self.table.selected_row(rows))
                        .and_then(R::toggle);
                    return toggle.map_or(ScreenAction::None, ScreenAction::Mutate);
                }
                (KeyCode::Char('f'), KeyModifiers::NONE) => {
                    if let Some(filter) = self.filters.get_mut(self.focused_filter) {
                        filter.cycle_next();
                        self.filters_changed();
                    }
                    return ScreenAction::None;
                }
                (KeyCode::Char('F'), _) => {
                    if let Some(filter) = self.filters.get_mut(self.focused_filter) {
                        filter.cycle_prev();
                        self.filters_changed();
                    }
                    return ScreenAction::None;
                }
                (KeyCode::Char('c'), KeyModifiers::NONE) => {
                    if !self.filters.is_empty() {
                        self.focused_filter = (self.focused_filter + 1) % self.filters.len();
                    }
                    return ScreenAction::None;
                }
                (KeyCode::Char('x'), KeyModifiers::NONE) => {
                    self.filters.iter_mut().for_each(FilterControl::clear);
                    self.filters_changed();
                    return ScreenAction::None;
                }
                (KeyCode::Char(']'), _) => {
                    if self.server_pagination().is_some_and(|p| p.has_next()) {
                        self.server_page += 1;
                    }
                    return ScreenAction::None;
                }
                (KeyCode::Char('['), _) => {
                    let has_prev = self
                        .server_pagination()
                        .map_or(self.server_page > 1, |p| p.has_prev());
                    if has_prev {
                        self.server_page -= 1;
                    }
                    return ScreenAction::None;
                }
                (KeyCode::Char('r'), KeyModifiers::NONE) => return ScreenAction::Refresh,
                _ => {}
            }
        }

        let rows = self.query.data().and_then(R::page).map(|p| p.items.as_slice()).unwrap_or(&[]);
        match self.table.handle_key(key, rows) {
            TableOutcome::Action(msg) => self.on_row(msg, lang),
            TableOutcome::Handled | TableOutcome::Ignored => ScreenAction::None,
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent, lang: Language) -> ScreenAction {
        if self.dialog_open() {
            return ScreenAction::None;
        }
        if mouse.kind == MouseEventKind::Down(MouseButton::Left) {
            let hit = self.filter_areas.iter().position(|r| {
                mouse.column >= r.x
                    && mouse.column < r.x + r.width
                    && mouse.row >= r.y
                    && mouse.row < r.y + r.height
            });
            if let Some(index) = hit {
                self.focused_filter = index;
                self.filters[index].cycle_next();
                self.filters_changed();
                return ScreenAction::None;
            }
        }
        let rows = self.query.data().and_then(R::page).map(|p| p.items.as_slice()).unwrap_or(&[]);
        match self.table.handle_mouse(mouse, rows) {
            TableOutcome::Action(msg) => self.on_row(msg, lang),
            _ => ScreenAction::None,
        }
    }

    fn mutation_finished(&mut self, result: &Result<(), ApiError>, lang: Language) {
        match (result, self.form.as_mut()) {
            (Ok(()), Some(_)) => self.form = None,
            (Err(e), Some(form)) => form
                .dialog
                .set_error(AppError::from(e.clone()).user_message(lang)),
            _ => {}
        }
    }

    fn captures_input(&self) -> bool {
        self.dialog_open() || self.table.is_editing()
    }

    fn context(&self) -> KeyContext {
        if self.dialog_open() {
            KeyContext::Dialog
        } else if self.table.is_editing() {
            KeyContext::Table
        } else {
            KeyContext::Resource
        }
    }

    fn tick(&mut self) {
        self.table.tick();
    }

    fn reset(&mut self) {
        self.table = Self::build_table(self.options);
        self.query.reset();
        self.filters = R::filter_controls();
        self.focused_filter = 0;
        self.server_page = 1;
        self.form = None;
        self.confirm.hide();
        self.detail.hide();
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, lang: Language) {
        let [filter_area, table_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(5)]).areas(area);

        if let Some(key) = self.query.key() {
            self.table.sync_data_key(&key.to_string());
        }
        self.render_filter_bar(frame, filter_area, lang);

        let empty = self.empty_text(lang);
        let loading = self.query.is_loading();
        let rows = self.query.data().and_then(R::page).map(|p| p.items.as_slice()).unwrap_or(&[]);
        self.table.render(frame, table_area, rows, loading, lang, &empty);

        if let Some(form) = &self.form {
            form.dialog.render(frame, area, lang);
        }
        self.confirm.render(frame, area, lang);
        self.detail.render(frame, area, lang);
    }
}

#[cfg(test)]
mod tests {
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;
    use crate::api::types::{User, UserRole, UserStatus};
    use crate::api::{ClientOptions, SouqClient};
    use crate::cache::{FetchPlan, QueryCache};
    use crate::ui::views::UsersResource;

    type UsersPage = ResourcePage<UsersResource>;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    /// Run the page's request against a seeded client and apply the result.
    async fn load(page: &mut UsersPage, cache: &mut QueryCache<QueryData>, client: &SouqClient) {
        let request = page.request().unwrap();
        let key = request.key();
        let plan = cache.begin_fetch(&key);
        let FetchPlan::Fetch(ticket) = plan.clone() else {
            panic!("expected a fresh fetch");
        };
        page.query_mut().start(key.clone(), plan);
        let result = match request {
            QueryRequest::Users(q) => client.list_users(&q).await.map(QueryData::Users),
            other => panic!("unexpected request {:?}", other),
        };
        assert!(cache.resolve(&key, ticket, &result));
        assert!(page.query_mut().apply(&key, ticket, result));
        page.on_data();
    }

    fn client() -> SouqClient {
        SouqClient::seeded(ClientOptions::default().instant())
    }

    fn draw(page: &mut UsersPage, lang: Language) {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| page.render(f, f.area(), lang)).unwrap();
    }

    #[test]
    fn test_filter_control_cycles_through_all() {
        let mut control = FilterControl::new(("Status", "الحالة"), vec![("A", "أ"), ("B", "ب")]);
        assert_eq!(control.selected(), None);
        control.cycle_next();
        assert_eq!(control.selected(), Some(0));
        control.cycle_next();
        control.cycle_next();
        assert_eq!(control.selected(), None);
        control.cycle_prev();
        assert_eq!(control.selected(), Some(1));
        assert_eq!(control.display(Language::English), "Status: B");
        control.clear();
        assert_eq!(control.display(Language::English), "Status: All");
    }

    #[test]
    fn test_pick_maps_index_to_variant() {
        assert_eq!(pick(&UserStatus::ALL, Some(2)), Some(UserStatus::Suspended));
        assert_eq!(pick(&UserStatus::ALL, None), None);
        assert_eq!(pick(&UserStatus::ALL, Some(9)), None);
    }

    #[test]
    fn test_filter_change_changes_request_and_resets_server_page() {
        let mut page = UsersPage::new(ScreenOptions::default());
        let before = page.request().unwrap().key();
        page.server_page = 2;

        page.handle_key(press(KeyCode::Char('f')), Language::English);
        let after = page.request().unwrap();
        assert_ne!(after.key(), before);
        assert_eq!(page.server_page(), 1);
        match after {
            QueryRequest::Users(q) => assert_eq!(q.filters.role, Some(UserRole::ALL[0])),
            other => panic!("unexpected request {:?}", other),
        }

        // Switch to the status filter.
        page.handle_key(press(KeyCode::Char('c')), Language::English);
        page.handle_key(press(KeyCode::Char('F')), Language::English);
        match page.request().unwrap() {
            QueryRequest::Users(q) => assert_eq!(q.filters.status, Some(UserStatus::Suspended)),
            other => panic!("unexpected request {:?}", other),
        }

        page.handle_key(press(KeyCode::Char('x')), Language::English);
        assert_eq!(page.request().unwrap().key(), before);
    }

    #[tokio::test]
    async fn test_loaded_rows_render_and_server_paging() {
        let client = client();
        let mut cache = QueryCache::default();
        let options = ScreenOptions {
            page_limit: 20,
            ..ScreenOptions::default()
        };
        let mut page = UsersPage::new(options);
        load(&mut page, &mut cache, &client).await;

        assert_eq!(page.rows().len(), 20);
        let pagination = page.server_pagination().unwrap();
        assert_eq!(pagination.total, 48);
        assert_eq!(pagination.total_pages, 3);
        draw(&mut page, Language::English);

        page.handle_key(press(KeyCode::Char(']')), Language::English);
        assert_eq!(page.server_page(), 2);
        page.handle_key(press(KeyCode::Char('[')), Language::English);
        page.handle_key(press(KeyCode::Char('[')), Language::English);
        assert_eq!(page.server_page(), 1);
    }

    #[tokio::test]
    async fn test_delete_asks_for_confirmation() {
        let client = client();
        let mut cache = QueryCache::default();
        let mut page = UsersPage::new(ScreenOptions::default());
        load(&mut page, &mut cache, &client).await;
        draw(&mut page, Language::English);

        let first = page.rows()[0].id.clone();
        assert_eq!(page.handle_key(press(KeyCode::Char('d')), Language::English), ScreenAction::None);
        assert_eq!(page.context(), KeyContext::Dialog);
        assert_eq!(
            page.handle_key(press(KeyCode::Char('y')), Language::English),
            ScreenAction::Mutate(Mutation::DeleteUser(first))
        );
        assert_eq!(page.context(), KeyContext::Resource);
    }

    #[tokio::test]
    async fn test_edit_form_submits_update() {
        let client = client();
        let mut cache = QueryCache::default();
        let mut page = UsersPage::new(ScreenOptions::default());
        load(&mut page, &mut cache, &client).await;
        draw(&mut page, Language::English);

        let original: User = page.rows()[0].clone();
        page.handle_key(press(KeyCode::Char('e')), Language::English);
        assert!(page.captures_input());

        // Append to the name, then jump to the submit button.
        page.handle_key(press(KeyCode::Char('!')), Language::English);
        page.handle_key(press(KeyCode::BackTab), Language::English);
        match page.handle_key(press(KeyCode::Enter), Language::English) {
            ScreenAction::Mutate(Mutation::UpdateUser(id, user)) => {
                assert_eq!(id, original.id);
                assert_eq!(user.name, format!("{}!", original.name));
                assert_eq!(user.created_at, original.created_at);
                assert_eq!(user.orders_count, original.orders_count);
            }
            other => panic!("expected update, got {:?}", other),
        }

        page.mutation_finished(&Err(ApiError::Validation("bad".into())), Language::English);
        assert!(page.captures_input());
        page.mutation_finished(&Ok(()), Language::English);
        assert!(!page.captures_input());
    }

    #[tokio::test]
    async fn test_toggle_selected_row_status() {
        let client = client();
        let mut cache = QueryCache::default();
        let mut page = UsersPage::new(ScreenOptions::default());
        load(&mut page, &mut cache, &client).await;
        draw(&mut page, Language::English);

        let first = page.rows()[0].clone();
        assert_eq!(
            page.handle_key(press(KeyCode::Char('t')), Language::English),
            ScreenAction::Mutate(Mutation::SetUserStatus(first.id, first.status.toggled()))
        );
    }

    #[tokio::test]
    async fn test_view_opens_details() {
        let client = client();
        let mut cache = QueryCache::default();
        let mut page = UsersPage::new(ScreenOptions::default());
        load(&mut page, &mut cache, &client).await;
        draw(&mut page, Language::Arabic);

        page.handle_key(press(KeyCode::Enter), Language::Arabic);
        assert!(page.detail.is_visible());
        assert!(!page.detail.fields().is_empty());
        page.handle_key(press(KeyCode::Esc), Language::Arabic);
        assert!(!page.detail.is_visible());
    }

    #[test]
    fn test_error_shows_in_empty_text() {
        let mut page = UsersPage::new(ScreenOptions::default());
        let request = page.request().unwrap();
        let key = request.key();
        let mut cache: QueryCache<QueryData> = QueryCache::default();
        let plan = cache.begin(&key);
        let ticket = plan.ticket().unwrap();
        page.query_mut().start(key.clone(), plan);
        page.query_mut().apply(&key, ticket, Err(ApiError::Timeout(10_000)));
        assert!(page.empty_text(Language::English).contains("too long"));
        assert!(page.rows().is_empty());
        draw(&mut page, Language::English);
    }

    #[test]
    fn test_reset_restores_mount_state() {
        let mut page = UsersPage::new(ScreenOptions::default());
        page.handle_key(press(KeyCode::Char('f')), Language::English);
        page.handle_key(press(KeyCode::Char('n')), Language::English);
        assert!(page.captures_input());
        page.reset();
        assert!(!page.captures_input());
        assert!(page.filters().iter().all(|f| f.selected().is_none()));
    }
}
