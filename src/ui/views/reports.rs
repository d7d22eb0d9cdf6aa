//! Sales reports over a selectable period.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, RenderDirection, Sparkline},
    Frame,
};

use super::dashboard::{card_slots, stat_card};
use super::resource::money;
use super::{Screen, ScreenAction, ScreenOptions};
use crate::api::types::{Report, ReportPeriod, ReportQuery, RestaurantPerformance};
use crate::cache::Query;
use crate::error::AppError;
use crate::i18n::{Language, Text};
use crate::table::{search, CellValue, Column};
use crate::tasks::{QueryData, QueryRequest};
use crate::ui::components::DataTable;
use crate::ui::theme::theme;

fn top_columns() -> Vec<Column<RestaurantPerformance>> {
    vec![
        Column::new("name", ("Restaurant", "المطعم"), |r: &RestaurantPerformance| {
            CellValue::from(r.name.as_str())
        })
        .width(3),
        Column::new("orders", ("Orders", "الطلبات"), |r: &RestaurantPerformance| {
            CellValue::from(r.orders)
        }),
        Column::new("revenue", ("Revenue", "الإيرادات"), |r: &RestaurantPerformance| {
            CellValue::from(r.revenue)
        })
        .render(|r, lang| money(r.revenue, lang))
        .width(2),
    ]
}

pub struct ReportsView {
    period: ReportPeriod,
    query: Query<QueryData>,
    top: DataTable<RestaurantPerformance, ()>,
    options: ScreenOptions,
}

impl ReportsView {
    pub fn new(options: ScreenOptions) -> Self {
        Self {
            period: ReportPeriod::default(),
            query: Query::new(),
            top: Self::build_table(options),
            options,
        }
    }

    fn build_table(options: ScreenOptions) -> DataTable<RestaurantPerformance, ()> {
        DataTable::new(top_columns(), search::all_fields)
            .searchable(false)
            .with_page_size(options.page_size)
            .with_key_bindings(options.keys)
    }

    pub fn period(&self) -> ReportPeriod {
        self.period
    }

    fn report(&self) -> Option<&Report> {
        match self.query.data() {
            Some(QueryData::Report(report)) => Some(report),
            _ => None,
        }
    }

    /// Daily revenue in whole riyals, oldest first.
    fn revenue_series(&self) -> Vec<u64> {
        self.report()
            .map(|r| r.daily.iter().map(|d| d.revenue.max(0.0).round() as u64).collect())
            .unwrap_or_default()
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, lang: Language) {
        let t = theme();
        let spans = vec![
            Span::styled(
                format!("{}: ", lang.text(Text::Period)),
                Style::default().fg(t.dim),
            ),
            Span::styled(
                self.period.label(lang),
                Style::default().fg(t.accent).add_modifier(Modifier::BOLD),
            ),
            Span::styled("  [p]", Style::default().fg(t.dim)),
        ];
        let alignment = if lang.is_rtl() { Alignment::Right } else { Alignment::Left };
        frame.render_widget(Paragraph::new(Line::from(spans)).alignment(alignment), area);
    }
}

impl Screen for ReportsView {
    fn title(&self) -> Text {
        Text::Reports
    }

    fn request(&self) -> Option<QueryRequest> {
        Some(QueryRequest::Report(ReportQuery {
            period: self.period,
        }))
    }

    fn query(&self) -> &Query<QueryData> {
        &self.query
    }

    fn query_mut(&mut self) -> &mut Query<QueryData> {
        &mut self.query
    }

    fn on_data(&mut self) {
        if let Some(key) = self.query.key() {
            self.top.sync_data_key(&key.to_string());
        }
    }

    fn handle_key(&mut self, key: KeyEvent, _lang: Language) -> ScreenAction {
        match (key.code, key.modifiers) {
            (KeyCode::Char('p'), KeyModifiers::NONE) => {
                self.period = self.period.next();
                ScreenAction::None
            }
            (KeyCode::Char('r'), KeyModifiers::NONE) => ScreenAction::Refresh,
            _ => {
                let rows = match self.query.data() {
                    Some(QueryData::Report(r)) => r.top_restaurants.as_slice(),
                    _ => &[],
                };
                self.top.handle_key(key, rows);
                ScreenAction::None
            }
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent, _lang: Language) -> ScreenAction {
        let rows = match self.query.data() {
            Some(QueryData::Report(r)) => r.top_restaurants.as_slice(),
            _ => &[],
        };
        self.top.handle_mouse(mouse, rows);
        ScreenAction::None
    }

    fn tick(&mut self) {
        self.top.tick();
    }

    fn reset(&mut self) {
        self.period = ReportPeriod::default();
        self.query.reset();
        self.top = Self::build_table(self.options);
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, lang: Language) {
        let t = theme();
        let [header, cards_area, chart_area, table_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(7),
            Constraint::Min(4),
        ])
        .areas(area);

        self.render_header(frame, header, lang);

        let dash = || "-".to_string();
        let report = self.report();
        let cards = [
            (Text::Revenue, report.map_or_else(dash, |r| money(r.revenue, lang))),
            (Text::Orders, report.map_or_else(dash, |r| r.orders.to_string())),
            (Text::NewUsers, report.map_or_else(dash, |r| r.new_users.to_string())),
            (
                Text::AverageOrder,
                report.map_or_else(dash, |r| money(r.average_order_value, lang)),
            ),
        ];
        for ((label, value), slot) in cards.into_iter().zip(card_slots(cards_area, 4, lang)) {
            stat_card(frame, slot, lang.text(label), value, lang);
        }

        // Time runs toward the reading end.
        let direction = if lang.is_rtl() {
            RenderDirection::RightToLeft
        } else {
            RenderDirection::LeftToRight
        };
        let alignment = if lang.is_rtl() { Alignment::Right } else { Alignment::Left };
        let series = self.revenue_series();
        let chart = Sparkline::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(t.border))
                    .title(format!(" {} ", lang.text(Text::Revenue)))
                    .title_alignment(alignment),
            )
            .data(&series)
            .direction(direction)
            .style(Style::default().fg(t.success));
        frame.render_widget(chart, chart_area);

        let empty = match self.query.error() {
            Some(e) => format!(
                "{}  {}",
                AppError::from(e.clone()).user_message(lang),
                lang.text(Text::Retry)
            ),
            None => lang.text(Text::NoData).to_string(),
        };
        let [title_area, table_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(3)]).areas(table_area);
        frame.render_widget(
            Paragraph::new(Span::styled(
                lang.text(Text::TopRestaurants),
                Style::default().fg(t.header_fg).add_modifier(Modifier::BOLD),
            ))
            .alignment(alignment),
            title_area,
        );
        let loading = self.query.is_loading();
        let rows = match self.query.data() {
            Some(QueryData::Report(r)) => r.top_restaurants.as_slice(),
            _ => &[],
        };
        self.top.render(frame, table_area, rows, loading, lang, &empty);
    }
}

#[cfg(test)]
mod tests {
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;
    use crate::api::{ClientOptions, SouqClient};
    use crate::cache::{FetchPlan, Ticket};

    fn press(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[test]
    fn test_period_key_changes_request() {
        let mut view = ReportsView::new(ScreenOptions::default());
        let week = view.request().unwrap().key();
        assert_eq!(view.handle_key(press('p'), Language::English), ScreenAction::None);
        assert_eq!(view.period(), ReportPeriod::Month);
        assert_ne!(view.request().unwrap().key(), week);

        view.handle_key(press('p'), Language::English);
        view.handle_key(press('p'), Language::English);
        assert_eq!(view.period(), ReportPeriod::Week);
        assert_eq!(view.request().unwrap().key(), week);
    }

    #[tokio::test]
    async fn test_report_loads_and_renders() {
        let client = SouqClient::seeded(ClientOptions::default().instant());
        let mut view = ReportsView::new(ScreenOptions::default());
        view.handle_key(press('p'), Language::English);

        let request = view.request().unwrap();
        let key = request.key();
        let ticket = Ticket::new(7);
        view.query_mut().start(key.clone(), FetchPlan::Fetch(ticket));
        let report = client
            .get_report(ReportQuery {
                period: ReportPeriod::Month,
            })
            .await
            .map(QueryData::Report);
        assert!(view.query_mut().apply(&key, ticket, report));
        view.on_data();

        assert_eq!(view.revenue_series().len(), 30);

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal
            .draw(|f| view.render(f, f.area(), Language::English))
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Last 30 days"));
        assert!(text.contains("Top restaurants"));
    }

    #[test]
    fn test_reset_restores_default_period() {
        let mut view = ReportsView::new(ScreenOptions::default());
        view.handle_key(press('p'), Language::English);
        view.reset();
        assert_eq!(view.period(), ReportPeriod::Week);
    }
}
