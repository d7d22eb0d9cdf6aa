//! Dashboard home screen: headline numbers and the latest orders.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::resource::{money, Resource};
use super::{OrdersResource, Screen, ScreenAction, ScreenOptions};
use crate::api::types::{DashboardStats, Order};
use crate::cache::Query;
use crate::error::AppError;
use crate::i18n::{Language, Text};
use crate::table::search;
use crate::tasks::{QueryData, QueryRequest};
use crate::ui::components::DataTable;
use crate::ui::theme::theme;

/// Columns of the recent orders table, a subset of the orders page.
const RECENT_COLUMNS: [&str; 5] = ["number", "customer", "restaurant", "total", "status"];

const CARDS: [Text; 6] = [
    Text::TotalUsers,
    Text::TotalRestaurants,
    Text::TotalOrders,
    Text::TotalRevenue,
    Text::PendingOrders,
    Text::ActiveCoupons,
];

/// Draw one headline number in a bordered card.
pub(super) fn stat_card(frame: &mut Frame, area: Rect, label: &str, value: String, lang: Language) {
    let t = theme();
    let alignment = if lang.is_rtl() { Alignment::Right } else { Alignment::Left };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(t.border))
        .title(Span::styled(format!(" {} ", label), Style::default().fg(t.dim)))
        .title_alignment(alignment);
    let value = Paragraph::new(Line::from(Span::styled(
        value,
        Style::default().fg(t.accent).add_modifier(Modifier::BOLD),
    )))
    .alignment(alignment)
    .block(block);
    frame.render_widget(value, area);
}

/// Lay out `count` equal cards in a row, first card at the reading start.
pub(super) fn card_slots(area: Rect, count: usize, lang: Language) -> Vec<Rect> {
    let constraints = vec![Constraint::Ratio(1, count.max(1) as u32); count];
    let mut slots = Layout::horizontal(constraints).split(area).to_vec();
    if lang.is_rtl() {
        slots.reverse();
    }
    slots
}

pub struct DashboardView {
    query: Query<QueryData>,
    recent: DataTable<Order, ()>,
    options: ScreenOptions,
}

impl DashboardView {
    pub fn new(options: ScreenOptions) -> Self {
        Self {
            query: Query::new(),
            recent: Self::build_table(options),
            options,
        }
    }

    fn build_table(options: ScreenOptions) -> DataTable<Order, ()> {
        let columns = OrdersResource::columns()
            .into_iter()
            .filter(|c| RECENT_COLUMNS.contains(&c.id()))
            .collect();
        DataTable::new(columns, search::all_fields)
            .searchable(false)
            .with_page_size(options.page_size)
            .with_key_bindings(options.keys)
    }

    fn stats(&self) -> Option<&DashboardStats> {
        match self.query.data() {
            Some(QueryData::Dashboard(stats)) => Some(stats),
            _ => None,
        }
    }

    fn recent_orders(&self) -> &[Order] {
        self.stats().map(|s| s.recent_orders.as_slice()).unwrap_or_default()
    }

    fn cards(&self, lang: Language) -> Vec<(Text, String)> {
        let Some(s) = self.stats() else {
            return CARDS.iter().map(|&label| (label, "-".to_string())).collect();
        };
        let values = [
            s.total_users.to_string(),
            s.total_restaurants.to_string(),
            s.total_orders.to_string(),
            money(s.total_revenue, lang),
            s.pending_orders.to_string(),
            s.active_coupons.to_string(),
        ];
        CARDS.into_iter().zip(values).collect()
    }
}

impl Screen for DashboardView {
    fn title(&self) -> Text {
        Text::Dashboard
    }

    fn request(&self) -> Option<QueryRequest> {
        Some(QueryRequest::Dashboard)
    }

    fn query(&self) -> &Query<QueryData> {
        &self.query
    }

    fn query_mut(&mut self) -> &mut Query<QueryData> {
        &mut self.query
    }

    fn on_data(&mut self) {
        self.recent.sync_data_key(&self.query.revision().to_string());
    }

    fn handle_key(&mut self, key: KeyEvent, _lang: Language) -> ScreenAction {
        if key.code == KeyCode::Char('r') && key.modifiers == KeyModifiers::NONE {
            return ScreenAction::Refresh;
        }
        let rows = match self.query.data() {
            Some(QueryData::Dashboard(stats)) => stats.recent_orders.as_slice(),
            _ => &[],
        };
        self.recent.handle_key(key, rows);
        ScreenAction::None
    }

    fn handle_mouse(&mut self, mouse: MouseEvent, _lang: Language) -> ScreenAction {
        let rows = match self.query.data() {
            Some(QueryData::Dashboard(stats)) => stats.recent_orders.as_slice(),
            _ => &[],
        };
        self.recent.handle_mouse(mouse, rows);
        ScreenAction::None
    }

    fn tick(&mut self) {
        self.recent.tick();
    }

    fn reset(&mut self) {
        self.query.reset();
        self.recent = Self::build_table(self.options);
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, lang: Language) {
        let t = theme();
        let [top, middle, title_area, table_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(4),
        ])
        .areas(area);

        let cards = self.cards(lang);
        let (first, second) = cards.split_at(3);
        for (row, row_area) in [(first, top), (second, middle)] {
            for ((label, value), slot) in row.iter().zip(card_slots(row_area, row.len(), lang)) {
                stat_card(frame, slot, lang.text(*label), value.clone(), lang);
            }
        }

        let alignment = if lang.is_rtl() { Alignment::Right } else { Alignment::Left };
        frame.render_widget(
            Paragraph::new(Span::styled(
                lang.text(Text::RecentOrders),
                Style::default().fg(t.header_fg).add_modifier(Modifier::BOLD),
            ))
            .alignment(alignment),
            title_area,
        );

        let empty = match self.query.error() {
            Some(e) => format!(
                "{}  {}",
                AppError::from(e.clone()).user_message(lang),
                lang.text(Text::Retry)
            ),
            None => lang.text(Text::NoData).to_string(),
        };
        let loading = self.query.is_loading();
        let rows = match self.query.data() {
            Some(QueryData::Dashboard(stats)) => stats.recent_orders.as_slice(),
            _ => &[],
        };
        self.recent.render(frame, table_area, rows, loading, lang, &empty);
    }
}

#[cfg(test)]
mod tests {
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;
    use crate::api::{ClientOptions, SouqClient};
    use crate::cache::{FetchPlan, Ticket};

    fn screen_text(view: &mut DashboardView, lang: Language) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| view.render(f, f.area(), lang)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content.iter().map(|c| c.symbol()).collect()
    }

    #[tokio::test]
    async fn test_renders_stats_and_recent_orders() {
        let client = SouqClient::seeded(ClientOptions::default().instant());
        let mut view = DashboardView::new(ScreenOptions::default());
        let key = view.request().unwrap().key();
        let ticket = Ticket::new(1);
        view.query_mut().start(key.clone(), FetchPlan::Fetch(ticket));
        assert!(view.query().is_loading());

        let stats = client.get_dashboard_stats().await.map(QueryData::Dashboard);
        assert!(view.query_mut().apply(&key, ticket, stats));
        view.on_data();

        let first_order = view.recent_orders()[0].order_number.clone();
        let text = screen_text(&mut view, Language::English);
        assert!(text.contains("Total users"));
        assert!(text.contains("Recent orders"));
        assert!(text.contains(&first_order));
    }

    #[test]
    fn test_placeholders_before_data() {
        let view = DashboardView::new(ScreenOptions::default());
        let cards = view.cards(Language::English);
        assert!(cards.iter().all(|(_, v)| v == "-"));
        assert!(view.recent_orders().is_empty());
    }

    #[test]
    fn test_refresh_key() {
        let mut view = DashboardView::new(ScreenOptions::default());
        let key = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE);
        assert_eq!(view.handle_key(key, Language::English), ScreenAction::Refresh);
    }

    #[test]
    fn test_card_order_mirrors_in_arabic() {
        let area = Rect::new(0, 0, 90, 3);
        let ltr = card_slots(area, 3, Language::English);
        let rtl = card_slots(area, 3, Language::Arabic);
        assert!(ltr[0].x < ltr[2].x);
        assert!(rtl[0].x > rtl[2].x);
    }
}
