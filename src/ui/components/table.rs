//! Interactive data table.
//!
//! [`DataTable`] draws rows through [`compute_view`] and turns keys and mouse
//! clicks into table state changes or row actions. It owns only the search,
//! sort and page state plus the row selection; rows are passed in on every
//! render and on every input event.
//!
//! In right-to-left mode the column order is mirrored, cells are
//! right-aligned and the pager is reversed. The geometry of the last render
//! is kept so mouse clicks resolve against what is actually on screen.
//!
//! Pages longer than the body scroll: the drawn window follows the selection.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::events::KeyBindings;
use crate::i18n::{Language, Text};
use crate::table::{compute_view, ClickTarget, Column, RowAction, RowActions, TableState, View};
use crate::ui::components::input::{InputMode, TextInput};
use crate::ui::components::loading::LoadingIndicator;
use crate::ui::theme::theme;

/// Width of one icon button in the actions column.
const ACTION_SLOT_WIDTH: u16 = 4;

/// Width of the previous / next page buttons.
const PAGER_BUTTON_WIDTH: u16 = 3;

/// What an input event did to the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableOutcome<A> {
    /// The table does not use this event.
    Ignored,
    /// The table changed its own state.
    Handled,
    /// A row callback fired.
    Action(A),
}

/// Where a screen position lands in the last rendered table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hit {
    Search,
    Header(usize),
    Row { line: usize, target: ClickTarget },
    PrevPage,
    NextPage,
    PageSize,
}

/// A column as laid out on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Data(usize),
    Actions,
}

/// Screen geometry of the last render.
#[derive(Debug, Clone, Default)]
struct Geometry {
    search: Option<Rect>,
    header_y: Option<u16>,
    columns: Vec<(Slot, Rect)>,
    body: Rect,
    /// Page line of the first drawn row.
    offset: usize,
    /// Rows on the current page, drawn or not.
    page_len: usize,
    /// Data indices of the drawn rows, top to bottom.
    rows: Vec<usize>,
    /// Action buttons, left to right.
    actions: Vec<RowAction>,
    prev: Rect,
    next: Rect,
    page_size: Rect,
}

fn contains(rect: Rect, x: u16, y: u16) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

/// Mirror `rect` horizontally inside `area`.
fn mirror(rect: Rect, area: Rect) -> Rect {
    Rect {
        x: area.x + (area.x + area.width).saturating_sub(rect.x + rect.width),
        ..rect
    }
}

/// A searchable, sortable, paginated table over rows of type `T`, emitting
/// row messages of type `A`.
pub struct DataTable<T, A> {
    state: TableState,
    columns: Vec<Column<T>>,
    actions: RowActions<T, A>,
    projection: Box<dyn Fn(&T) -> String>,
    searchable: bool,
    search: TextInput,
    mode: InputMode,
    /// Selected line within the current page.
    selected: usize,
    /// First page line drawn in the body.
    offset: usize,
    /// Column targeted by keyboard sorting.
    sort_cursor: usize,
    keys: KeyBindings,
    loader: LoadingIndicator,
    geometry: Geometry,
}

impl<T, A> DataTable<T, A> {
    /// Create a table over `columns`, searching the text `projection` returns.
    pub fn new(columns: Vec<Column<T>>, projection: impl Fn(&T) -> String + 'static) -> Self {
        Self {
            state: TableState::new(),
            columns,
            actions: RowActions::new(),
            projection: Box::new(projection),
            searchable: true,
            search: TextInput::new(),
            mode: InputMode::Normal,
            selected: 0,
            offset: 0,
            sort_cursor: 0,
            keys: KeyBindings::default(),
            loader: LoadingIndicator::new(),
            geometry: Geometry::default(),
        }
    }

    pub fn with_actions(mut self, actions: RowActions<T, A>) -> Self {
        self.actions = actions;
        self
    }

    /// Show or hide the search box.
    pub fn searchable(mut self, searchable: bool) -> Self {
        self.searchable = searchable;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.state = TableState::with_page_size(page_size);
        self
    }

    pub fn with_key_bindings(mut self, keys: KeyBindings) -> Self {
        self.keys = keys;
        self
    }

    pub fn state(&self) -> &TableState {
        &self.state
    }

    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    /// Whether the search box has keyboard focus.
    pub fn is_editing(&self) -> bool {
        self.mode == InputMode::Insert
    }

    /// Selected line within the current page.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Advance the loading spinner.
    pub fn tick(&mut self) {
        self.loader.tick();
    }

    /// Report which data set the table is showing; a new key goes back to
    /// the first page.
    pub fn sync_data_key(&mut self, key: &str) {
        if self.state.sync_data_key(key) {
            self.selected = 0;
            self.offset = 0;
        }
    }

    /// Back to the mount state: no search, unsorted, first page.
    pub fn reset(&mut self) {
        self.state.reset();
        self.search.clear();
        self.mode = InputMode::Normal;
        self.selected = 0;
        self.offset = 0;
        self.sort_cursor = 0;
    }

    /// The rows shown for the current state.
    pub fn view(&self, rows: &[T]) -> View {
        compute_view(
            rows,
            &self.columns,
            &*self.projection,
            self.state.search(),
            self.state.sort(),
            self.state.pagination(),
        )
    }

    /// The selected row, if the page has one.
    pub fn selected_row<'a>(&self, rows: &'a [T]) -> Option<&'a T> {
        let view = self.view(rows);
        view.rows.get(self.selected).and_then(|&i| rows.get(i))
    }

    /// Scroll so the selected line sits inside a body of `height` lines.
    fn scroll_to_selected(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + height {
            self.offset = self.selected + 1 - height;
        }
    }

    fn set_search(&mut self, query: String) {
        self.state.set_search(query);
        self.selected = 0;
    }

    fn sortable_columns(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_sortable())
            .map(|(i, _)| i)
            .collect()
    }

    fn toggle_sort_at(&mut self, index: usize) -> bool {
        match self.columns.get(index) {
            Some(column) if column.is_sortable() => {
                let id = column.id();
                self.state.toggle_sort(id);
                self.sort_cursor = index;
                true
            }
            _ => false,
        }
    }

    fn move_sort_cursor(&mut self) {
        let sortable = self.sortable_columns();
        if sortable.is_empty() {
            return;
        }
        let next = sortable
            .iter()
            .position(|&i| i == self.sort_cursor)
            .map(|p| (p + 1) % sortable.len())
            .unwrap_or(0);
        self.sort_cursor = sortable[next];
    }

    /// Handle a key press.
    pub fn handle_key(&mut self, key: KeyEvent, rows: &[T]) -> TableOutcome<A> {
        if self.mode == InputMode::Insert {
            match key.code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Tab => {
                    self.mode = InputMode::Normal;
                }
                _ => {
                    if self.search.handle_input(key) {
                        let query = self.search.value().to_string();
                        self.set_search(query);
                    }
                }
            }
            return TableOutcome::Handled;
        }

        let view = self.view(rows);
        self.selected = self.selected.min(view.rows.len().saturating_sub(1));

        if self.keys.is_down(&key) {
            if self.selected + 1 < view.rows.len() {
                self.selected += 1;
            }
            self.scroll_to_selected(self.geometry.body.height as usize);
            return TableOutcome::Handled;
        }
        if self.keys.is_up(&key) {
            self.selected = self.selected.saturating_sub(1);
            self.scroll_to_selected(self.geometry.body.height as usize);
            return TableOutcome::Handled;
        }
        if self.keys.is_next_page(&key) {
            self.state.next_page(view.total_pages);
            self.selected = 0;
            return TableOutcome::Handled;
        }
        if self.keys.is_prev_page(&key) {
            self.state.prev_page();
            self.selected = 0;
            return TableOutcome::Handled;
        }

        let row = view.rows.get(self.selected).and_then(|&i| rows.get(i));
        match (key.code, key.modifiers) {
            (KeyCode::Char('/'), KeyModifiers::NONE) if self.searchable => {
                self.mode = InputMode::Insert;
                TableOutcome::Handled
            }
            (KeyCode::Esc, _) if !self.state.search().is_empty() => {
                self.search.clear();
                self.state.clear_search();
                self.selected = 0;
                TableOutcome::Handled
            }
            (KeyCode::Char('s'), KeyModifiers::NONE) => {
                if !self.toggle_sort_at(self.sort_cursor) {
                    self.move_sort_cursor();
                    self.toggle_sort_at(self.sort_cursor);
                }
                TableOutcome::Handled
            }
            (KeyCode::Char('S'), _) => {
                self.move_sort_cursor();
                TableOutcome::Handled
            }
            (KeyCode::Char('z'), KeyModifiers::NONE) => {
                self.state.cycle_page_size();
                self.selected = 0;
                TableOutcome::Handled
            }
            (KeyCode::Enter, _) => self.fire(ClickTarget::Row, row),
            (KeyCode::Char(c), KeyModifiers::NONE) => {
                let action = [RowAction::View, RowAction::Edit, RowAction::Delete]
                    .into_iter()
                    .find(|a| a.key() == c);
                match action {
                    Some(action) => self.fire(ClickTarget::Action(action), row),
                    None => TableOutcome::Ignored,
                }
            }
            _ => TableOutcome::Ignored,
        }
    }

    fn fire(&self, target: ClickTarget, row: Option<&T>) -> TableOutcome<A> {
        match row.and_then(|r| self.actions.click(target, r)) {
            Some(message) => TableOutcome::Action(message),
            None => TableOutcome::Ignored,
        }
    }

    /// Handle a mouse event against the last rendered geometry.
    pub fn handle_mouse(&mut self, mouse: MouseEvent, rows: &[T]) -> TableOutcome<A> {
        match mouse.kind {
            MouseEventKind::ScrollDown => {
                if self.selected + 1 < self.geometry.page_len {
                    self.selected += 1;
                }
                self.scroll_to_selected(self.geometry.body.height as usize);
                TableOutcome::Handled
            }
            MouseEventKind::ScrollUp => {
                self.selected = self.selected.saturating_sub(1);
                self.scroll_to_selected(self.geometry.body.height as usize);
                TableOutcome::Handled
            }
            MouseEventKind::Down(MouseButton::Left) => match self.hit(mouse.column, mouse.row) {
                Some(hit) => self.click(hit, rows),
                None => TableOutcome::Ignored,
            },
            _ => TableOutcome::Ignored,
        }
    }

    fn click(&mut self, hit: Hit, rows: &[T]) -> TableOutcome<A> {
        match hit {
            Hit::Search => {
                self.mode = InputMode::Insert;
                TableOutcome::Handled
            }
            Hit::Header(index) => {
                self.mode = InputMode::Normal;
                self.toggle_sort_at(index);
                TableOutcome::Handled
            }
            Hit::Row { line, target } => {
                self.mode = InputMode::Normal;
                self.selected = line;
                let row = line
                    .checked_sub(self.geometry.offset)
                    .and_then(|drawn| self.geometry.rows.get(drawn))
                    .and_then(|&i| rows.get(i));
                match self.fire(target, row) {
                    TableOutcome::Ignored => TableOutcome::Handled,
                    outcome => outcome,
                }
            }
            Hit::PrevPage => {
                self.state.prev_page();
                self.selected = 0;
                TableOutcome::Handled
            }
            Hit::NextPage => {
                let total_pages = self.view(rows).total_pages;
                self.state.next_page(total_pages);
                self.selected = 0;
                TableOutcome::Handled
            }
            Hit::PageSize => {
                self.state.cycle_page_size();
                self.selected = 0;
                TableOutcome::Handled
            }
        }
    }

    fn hit(&self, x: u16, y: u16) -> Option<Hit> {
        let g = &self.geometry;
        if g.search.is_some_and(|r| contains(r, x, y)) {
            return Some(Hit::Search);
        }
        if contains(g.prev, x, y) {
            return Some(Hit::PrevPage);
        }
        if contains(g.next, x, y) {
            return Some(Hit::NextPage);
        }
        if contains(g.page_size, x, y) {
            return Some(Hit::PageSize);
        }

        let (slot, rect) = g
            .columns
            .iter()
            .find(|(_, r)| x >= r.x && x < r.x + r.width)?;

        if g.header_y == Some(y) {
            return match slot {
                Slot::Data(index) => Some(Hit::Header(*index)),
                Slot::Actions => None,
            };
        }

        if !contains(g.body, x, y) {
            return None;
        }
        let drawn = (y - g.body.y) as usize;
        if drawn >= g.rows.len() {
            return None;
        }
        let line = g.offset + drawn;
        let target = match slot {
            Slot::Data(_) => ClickTarget::Row,
            Slot::Actions => {
                let button = ((x - rect.x) / ACTION_SLOT_WIDTH) as usize;
                match g.actions.get(button) {
                    Some(&action) => ClickTarget::Action(action),
                    // Padding inside the actions cell belongs to no button
                    None => return None,
                }
            }
        };
        Some(Hit::Row { line, target })
    }

    /// Draw the table.
    ///
    /// While `is_loading` the body shows a spinner. When the derived view
    /// is empty the body shows `empty_text`.
    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        rows: &[T],
        is_loading: bool,
        lang: Language,
        empty_text: &str,
    ) {
        let t = theme();
        let rtl = lang.is_rtl();
        let view = self.view(rows);
        // The view falls back to the first page when the stored page is out
        // of range; keep the state in step with what is shown.
        if view.page_index != self.state.page_index() {
            self.state.set_page(view.page_index, view.total_pages);
        }
        self.selected = self.selected.min(view.rows.len().saturating_sub(1));
        self.loader.set_active(is_loading);

        let mut geometry = Geometry::default();

        let search_height = if self.searchable { 3 } else { 0 };
        let [search_area, table_area, pager_area] = Layout::vertical([
            Constraint::Length(search_height),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(area);

        if self.searchable {
            self.search.set_placeholder(lang.pick("Type / to search", "اكتب / للبحث"));
            self.search.render(
                frame,
                search_area,
                lang.text(Text::Search),
                self.is_editing(),
                rtl,
            );
            geometry.search = Some(search_area);
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(t.border));
        let inner = block.inner(table_area);
        frame.render_widget(block, table_area);

        let slots = self.layout_columns(inner, rtl);
        geometry.actions = self.actions.available();
        if rtl {
            geometry.actions.reverse();
        }

        if inner.height > 0 {
            let header_y = inner.y;
            geometry.header_y = Some(header_y);
            for (slot, rect) in &slots {
                let cell = Rect::new(rect.x, header_y, rect.width, 1);
                let (text, style) = self.header_cell(*slot, lang);
                let alignment = if rtl { Alignment::Right } else { Alignment::Left };
                frame.render_widget(Paragraph::new(text).style(style).alignment(alignment), cell);
            }
        }

        let body = Rect {
            y: inner.y + 1.min(inner.height),
            height: inner.height.saturating_sub(1),
            ..inner
        };
        geometry.body = body;

        if is_loading {
            let center = Rect {
                y: body.y + body.height / 2,
                height: 1.min(body.height),
                ..body
            };
            self.loader.render(frame, center, lang);
        } else if view.is_empty() {
            let center = Rect {
                y: body.y + body.height / 2,
                height: 1.min(body.height),
                ..body
            };
            frame.render_widget(
                Paragraph::new(empty_text)
                    .style(Style::default().fg(t.dim))
                    .alignment(Alignment::Center),
                center,
            );
        } else {
            let height = body.height as usize;
            // Keep the window full when the page got shorter.
            self.offset = self.offset.min(view.rows.len().saturating_sub(height));
            self.scroll_to_selected(height);
            geometry.offset = self.offset;
            for (line, &index) in view.rows.iter().enumerate().skip(self.offset).take(height) {
                let y = body.y + (line - self.offset) as u16;
                let selected = line == self.selected;
                let row_style = if selected {
                    Style::default()
                        .bg(t.highlight_bg)
                        .fg(t.fg)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(t.fg)
                };
                frame.render_widget(
                    Block::default().style(row_style),
                    Rect::new(body.x, y, body.width, 1),
                );
                for (slot, rect) in &slots {
                    let cell = Rect::new(rect.x, y, rect.width, 1);
                    match slot {
                        Slot::Data(i) => {
                            let text = self.columns[*i].cell_text(&rows[index], lang);
                            let alignment = if rtl { Alignment::Right } else { Alignment::Left };
                            frame.render_widget(
                                Paragraph::new(text).style(row_style).alignment(alignment),
                                cell,
                            );
                        }
                        Slot::Actions => {
                            for (n, action) in geometry.actions.iter().enumerate() {
                                let button = Rect::new(
                                    cell.x + n as u16 * ACTION_SLOT_WIDTH,
                                    y,
                                    ACTION_SLOT_WIDTH.min(cell.width.saturating_sub(n as u16 * ACTION_SLOT_WIDTH)),
                                    1,
                                );
                                frame.render_widget(
                                    Paragraph::new(action.icon())
                                        .style(row_style.fg(action_color(*action)))
                                        .alignment(Alignment::Center),
                                    button,
                                );
                            }
                        }
                    }
                }
                geometry.rows.push(index);
            }
        }

        geometry.page_len = view.rows.len();
        geometry.columns = slots;
        self.render_pager(frame, pager_area, &view, lang, &mut geometry);
        self.geometry = geometry;
    }

    /// Column rectangles in display order.
    fn layout_columns(&self, inner: Rect, rtl: bool) -> Vec<(Slot, Rect)> {
        let mut slots: Vec<Slot> = (0..self.columns.len()).map(Slot::Data).collect();
        let mut constraints: Vec<Constraint> = self
            .columns
            .iter()
            .map(|c| Constraint::Fill(c.width_weight()))
            .collect();
        if self.actions.has_actions_column() {
            slots.push(Slot::Actions);
            constraints.push(Constraint::Length(
                self.actions.available().len() as u16 * ACTION_SLOT_WIDTH,
            ));
        }
        let row = Rect { height: 1, ..inner };
        let rects = Layout::horizontal(constraints).spacing(1).split(row);
        slots
            .into_iter()
            .zip(rects.iter())
            .map(|(slot, rect)| (slot, if rtl { mirror(*rect, row) } else { *rect }))
            .collect()
    }

    fn header_cell(&self, slot: Slot, lang: Language) -> (String, Style) {
        let t = theme();
        let base = Style::default()
            .fg(t.header_fg)
            .add_modifier(Modifier::BOLD);
        match slot {
            Slot::Actions => (lang.text(Text::Actions).to_string(), base),
            Slot::Data(index) => {
                let column = &self.columns[index];
                let label = column.header(lang);
                let text = match self.state.sort().direction_of(column.id()) {
                    Some(direction) if lang.is_rtl() => format!("{} {}", direction.indicator(), label),
                    Some(direction) => format!("{} {}", label, direction.indicator()),
                    None => label.to_string(),
                };
                let style = if index == self.sort_cursor && column.is_sortable() {
                    base.add_modifier(Modifier::UNDERLINED)
                } else {
                    base
                };
                (text, style)
            }
        }
    }

    fn render_pager(
        &self,
        frame: &mut Frame,
        area: Rect,
        view: &View,
        lang: Language,
        geometry: &mut Geometry,
    ) {
        let t = theme();
        let size_label = format!("{}: {}", lang.text(Text::PageSize), view.page_size);
        let size_width = size_label.chars().count() as u16 + 2;
        let [info_area, size_area, prev_area, next_area] = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(size_width),
            Constraint::Length(PAGER_BUTTON_WIDTH),
            Constraint::Length(PAGER_BUTTON_WIDTH),
        ])
        .areas(area);

        let page = if view.total_pages == 0 { 0 } else { view.page_index + 1 };
        let info = format!(
            "{} {}–{} {} {}  ·  {} {} {} {}",
            lang.text(Text::Rows),
            view.first_row(),
            view.last_row(),
            lang.text(Text::Of),
            view.total,
            lang.text(Text::Page),
            page,
            lang.text(Text::Of),
            view.total_pages,
        );

        let rtl = lang.is_rtl();
        let place = |r: Rect| if rtl { mirror(r, area) } else { r };
        let (info_area, size_area) = (place(info_area), place(size_area));
        // Arrows point the reading direction
        let (prev_area, next_area, prev_icon, next_icon) = if rtl {
            (place(prev_area), place(next_area), " ▶", " ◀")
        } else {
            (prev_area, next_area, " ◀", " ▶")
        };

        let alignment = if rtl { Alignment::Right } else { Alignment::Left };
        frame.render_widget(
            Paragraph::new(info)
                .style(Style::default().fg(t.dim))
                .alignment(alignment),
            info_area,
        );
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                size_label,
                Style::default().fg(t.accent),
            )))
            .alignment(Alignment::Center),
            size_area,
        );
        let button = |enabled: bool| {
            if enabled {
                Style::default().fg(t.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(t.dim)
            }
        };
        frame.render_widget(
            Paragraph::new(prev_icon).style(button(view.page_index > 0)),
            prev_area,
        );
        frame.render_widget(
            Paragraph::new(next_icon).style(button(view.page_index + 1 < view.total_pages)),
            next_area,
        );

        geometry.prev = prev_area;
        geometry.next = next_area;
        geometry.page_size = size_area;
    }
}

fn action_color(action: RowAction) -> ratatui::style::Color {
    let t = theme();
    match action {
        RowAction::View => t.accent,
        RowAction::Edit => t.warning,
        RowAction::Delete => t.error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::search::all_fields;
    use crate::table::{CellValue, SortDirection};
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};
    use serde::Serialize;

    #[derive(Debug, Clone, PartialEq, Serialize)]
    struct Row {
        id: String,
        name: String,
        orders: i64,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Msg {
        Open(String),
        Edit(String),
        Delete(String),
    }

    fn rows(n: usize) -> Vec<Row> {
        (0..n)
            .map(|i| Row {
                id: format!("u{}", i + 1),
                name: format!("Customer {:02}", i + 1),
                orders: (i % 7) as i64,
            })
            .collect()
    }

    fn table() -> DataTable<Row, Msg> {
        let columns = vec![
            Column::new("name", ("Name", "الاسم"), |r: &Row| CellValue::from(r.name.clone())),
            Column::new("orders", ("Orders", "الطلبات"), |r: &Row| CellValue::from(r.orders)),
        ];
        DataTable::new(columns, all_fields).with_actions(
            RowActions::new()
                .on_row_click(|r: &Row| Msg::Open(r.id.clone()))
                .on_edit(|r: &Row| Msg::Edit(r.id.clone()))
                .on_delete(|r: &Row| Msg::Delete(r.id.clone())),
        )
    }

    fn draw(table: &mut DataTable<Row, Msg>, data: &[Row], lang: Language, loading: bool) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal
            .draw(|f| table.render(f, f.area(), data, loading, lang, "Nothing here"))
            .unwrap();
        terminal.backend().buffer().clone()
    }

    fn line(buffer: &Buffer, y: u16) -> String {
        (0..buffer.area.width)
            .map(|x| buffer.content[buffer.index_of(x, y)].symbol().to_string())
            .collect()
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn left_click(x: u16, y: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: x,
            row: y,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_render_header_rows_and_pager() {
        let data = rows(25);
        let mut t = table();
        let buffer = draw(&mut t, &data, Language::English, false);

        let header_y = t.geometry.header_y.unwrap();
        assert!(line(&buffer, header_y).contains("Name"));
        assert!(line(&buffer, header_y).contains("Actions"));
        assert!(line(&buffer, t.geometry.body.y).contains("Customer 01"));
        assert_eq!(t.geometry.rows.len(), 10);
        assert!(line(&buffer, 19).contains("Page 1 of 3"));
    }

    #[test]
    fn test_long_page_scrolls_with_selection() {
        let data = rows(25);
        let mut t = table().with_page_size(25);
        draw(&mut t, &data, Language::English, false);
        let body = t.geometry.body;
        assert_eq!(t.geometry.page_len, 25);
        assert_eq!(t.geometry.rows.len(), body.height as usize);

        for _ in 0..20 {
            t.handle_key(press(KeyCode::Char('j')), &data);
        }
        let buffer = draw(&mut t, &data, Language::English, false);
        let last = body.y + body.height - 1;
        assert!(line(&buffer, last).contains("Customer 21"));
        assert!(!line(&buffer, body.y).contains("Customer 01"));
        assert_eq!(
            t.handle_key(press(KeyCode::Char('d')), &data),
            TableOutcome::Action(Msg::Delete("u21".to_string()))
        );

        // Clicks land on the scrolled rows
        let name = t.geometry.columns.iter().find(|(s, _)| *s == Slot::Data(0)).unwrap().1;
        let first = t.geometry.rows[0];
        let outcome = t.handle_mouse(left_click(name.x + 1, body.y), &data);
        assert_eq!(outcome, TableOutcome::Action(Msg::Open(data[first].id.clone())));
        assert_eq!(t.selected(), t.geometry.offset);

        for _ in 0..30 {
            t.handle_key(press(KeyCode::Char('j')), &data);
        }
        let buffer = draw(&mut t, &data, Language::English, false);
        assert!(line(&buffer, last).contains("Customer 25"));
        assert_eq!(t.selected_row(&data).map(|r| r.id.as_str()), Some("u25"));
    }

    #[test]
    fn test_rtl_puts_first_column_on_the_right() {
        let data = rows(3);
        let mut t = table();
        draw(&mut t, &data, Language::Arabic, false);

        let name = t.geometry.columns.iter().find(|(s, _)| *s == Slot::Data(0)).unwrap().1;
        let actions = t.geometry.columns.iter().find(|(s, _)| *s == Slot::Actions).unwrap().1;
        assert!(name.x > actions.x);
    }

    #[test]
    fn test_loading_and_empty_placeholders() {
        let mut t = table();
        let buffer = draw(&mut t, &[], Language::English, true);
        let body = t.geometry.body;
        assert!(line(&buffer, body.y + body.height / 2).contains("Loading..."));

        let buffer = draw(&mut t, &[], Language::English, false);
        assert!(line(&buffer, body.y + body.height / 2).contains("Nothing here"));
        assert!(t.geometry.rows.is_empty());
    }

    #[test]
    fn test_click_delete_icon_fires_delete_only() {
        let data = rows(3);
        let mut t = table();
        draw(&mut t, &data, Language::English, false);

        let actions = t.geometry.columns.iter().find(|(s, _)| *s == Slot::Actions).unwrap().1;
        // Edit is the first button, delete the second
        let x = actions.x + ACTION_SLOT_WIDTH + 1;
        let y = t.geometry.body.y + 1;
        let outcome = t.handle_mouse(left_click(x, y), &data);
        assert_eq!(outcome, TableOutcome::Action(Msg::Delete("u2".to_string())));
        assert_eq!(t.selected(), 1);
    }

    #[test]
    fn test_click_row_outside_icons_opens_row() {
        let data = rows(3);
        let mut t = table();
        draw(&mut t, &data, Language::Arabic, false);

        let name = t.geometry.columns.iter().find(|(s, _)| *s == Slot::Data(0)).unwrap().1;
        let outcome = t.handle_mouse(left_click(name.x + 1, t.geometry.body.y), &data);
        assert_eq!(outcome, TableOutcome::Action(Msg::Open("u1".to_string())));
    }

    #[test]
    fn test_header_click_cycles_sort() {
        let data = rows(5);
        let mut t = table();
        draw(&mut t, &data, Language::English, false);

        let orders = t.geometry.columns.iter().find(|(s, _)| *s == Slot::Data(1)).unwrap().1;
        let header_y = t.geometry.header_y.unwrap();

        t.handle_mouse(left_click(orders.x, header_y), &data);
        assert_eq!(t.state().sort().current(), Some(("orders", SortDirection::Ascending)));
        t.handle_mouse(left_click(orders.x, header_y), &data);
        assert_eq!(t.state().sort().current(), Some(("orders", SortDirection::Descending)));
        t.handle_mouse(left_click(orders.x, header_y), &data);
        assert_eq!(t.state().sort().current(), None);
    }

    #[test]
    fn test_pager_buttons_change_page() {
        let data = rows(25);
        let mut t = table();
        draw(&mut t, &data, Language::English, false);

        let next = t.geometry.next;
        t.handle_mouse(left_click(next.x + 1, next.y), &data);
        assert_eq!(t.state().page_index(), 1);

        let size = t.geometry.page_size;
        t.handle_mouse(left_click(size.x + 1, size.y), &data);
        assert_eq!(t.state().page_size(), 25);
        assert_eq!(t.state().page_index(), 0);
    }

    #[test]
    fn test_typing_search_resets_page() {
        let data = rows(25);
        let mut t = table();
        t.handle_key(press(KeyCode::Char('l')), &data);
        t.handle_key(press(KeyCode::Char('l')), &data);
        assert_eq!(t.state().page_index(), 2);

        t.handle_key(press(KeyCode::Char('/')), &data);
        assert!(t.is_editing());
        for c in "customer 1".chars() {
            t.handle_key(press(KeyCode::Char(c)), &data);
        }
        t.handle_key(press(KeyCode::Enter), &data);

        assert!(!t.is_editing());
        assert_eq!(t.state().page_index(), 0);
        // Customer 10 through Customer 19
        assert_eq!(t.view(&data).total, 10);
    }

    #[test]
    fn test_keyboard_row_actions_use_selection() {
        let data = rows(4);
        let mut t = table();
        t.handle_key(press(KeyCode::Char('j')), &data);
        t.handle_key(press(KeyCode::Char('j')), &data);
        assert_eq!(
            t.handle_key(press(KeyCode::Char('e')), &data),
            TableOutcome::Action(Msg::Edit("u3".to_string()))
        );
        assert_eq!(
            t.handle_key(press(KeyCode::Enter), &data),
            TableOutcome::Action(Msg::Open("u3".to_string()))
        );
        // No view callback was registered
        assert_eq!(t.handle_key(press(KeyCode::Char('v')), &data), TableOutcome::Ignored);
        assert_eq!(t.selected_row(&data).map(|r| r.id.as_str()), Some("u3"));
    }

    #[test]
    fn test_keyboard_sort_and_unknown_keys() {
        let data = rows(5);
        let mut t = table();
        t.handle_key(press(KeyCode::Char('S')), &data);
        t.handle_key(press(KeyCode::Char('s')), &data);
        assert_eq!(t.state().sort().current(), Some(("orders", SortDirection::Ascending)));
        assert_eq!(t.handle_key(press(KeyCode::Char('x')), &data), TableOutcome::Ignored);
    }

    #[test]
    fn test_shrinking_data_falls_back_to_first_page() {
        let data = rows(25);
        let mut t = table();
        t.handle_key(press(KeyCode::Char('l')), &data);
        t.handle_key(press(KeyCode::Char('l')), &data);

        let fewer = rows(4);
        draw(&mut t, &fewer, Language::English, false);
        assert_eq!(t.state().page_index(), 0);
        assert_eq!(t.geometry.rows.len(), 4);
    }

    #[test]
    fn test_new_data_key_resets_page() {
        let data = rows(25);
        let mut t = table();
        t.sync_data_key("users?page=1");
        t.handle_key(press(KeyCode::PageDown), &data);
        assert_eq!(t.state().page_index(), 1);

        t.sync_data_key("users?page=2");
        assert_eq!(t.state().page_index(), 0);
    }
}
