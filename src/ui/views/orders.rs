//! Orders page.

use chrono::Utc;

use super::resource::{date, money, options, pick, FilterControl, Filters, Resource};
use crate::api::types::{Order, OrderFilters, OrderStatus, PaymentMethod};
use crate::api::{ListQuery, Page};
use crate::i18n::{Language, Text};
use crate::table::{CellValue, Column};
use crate::tasks::{Mutation, QueryData, QueryRequest};
use crate::ui::components::{FormDialog, FormField, Label};

/// Customer orders.
pub struct OrdersResource;

impl Resource for OrdersResource {
    type Row = Order;

    const TITLE: Text = Text::Orders;
    const NOUN: Label = ("order", "طلب");

    fn columns() -> Vec<Column<Order>> {
        vec![
            Column::new("number", ("Order", "رقم الطلب"), |o: &Order| {
                CellValue::from(o.order_number.as_str())
            }),
            Column::new("customer", ("Customer", "العميل"), |o: &Order| {
                CellValue::from(o.customer_name.as_str())
            })
            .width(2),
            Column::new("restaurant", ("Restaurant", "المطعم"), |o: &Order| {
                CellValue::from(o.restaurant_name.as_str())
            })
            .width(2),
            Column::new("items", ("Items", "الأصناف"), |o: &Order| CellValue::from(o.items_count)),
            Column::new("total", ("Total", "الإجمالي"), |o: &Order| CellValue::from(o.total))
                .render(|o, lang| money(o.total, lang)),
            Column::new("status", ("Status", "الحالة"), |o: &Order| {
                CellValue::from(o.status.label(Language::English))
            })
            // Workflow order rather than alphabetical.
            .compare_by(|a, b| {
                let rank = |s: OrderStatus| OrderStatus::ALL.iter().position(|&x| x == s);
                rank(a.status).cmp(&rank(b.status))
            })
            .render(|o, lang| o.status.label(lang).to_string()),
            Column::new("payment", ("Payment", "الدفع"), |o: &Order| {
                CellValue::from(o.payment_method.label(Language::English))
            })
            .render(|o, lang| o.payment_method.label(lang).to_string()),
            Column::new("date", ("Date", "التاريخ"), |o: &Order| CellValue::from(o.created_at))
                .render(|o, _| date(o.created_at)),
        ]
    }

    fn filter_controls() -> Vec<FilterControl> {
        vec![
            FilterControl::from_labels(("Status", "الحالة"), &OrderStatus::ALL, OrderStatus::label),
            FilterControl::from_labels(("Payment", "الدفع"), &PaymentMethod::ALL, PaymentMethod::label),
        ]
    }

    fn filters(selection: &[Option<usize>]) -> Filters<Self> {
        OrderFilters {
            status: pick(&OrderStatus::ALL, selection.first().copied().flatten()),
            payment_method: pick(&PaymentMethod::ALL, selection.get(1).copied().flatten()),
        }
    }

    fn request(query: ListQuery<OrderFilters>) -> QueryRequest {
        QueryRequest::Orders(query)
    }

    fn page(data: &QueryData) -> Option<&Page<Order>> {
        match data {
            QueryData::Orders(page) => Some(page),
            _ => None,
        }
    }

    fn form_fields(row: Option<&Order>) -> Vec<FormField> {
        let status = row
            .and_then(|o| OrderStatus::ALL.iter().position(|&s| s == o.status))
            .unwrap_or(0);
        let payment = row
            .and_then(|o| PaymentMethod::ALL.iter().position(|&p| p == o.payment_method))
            .unwrap_or(0);
        vec![
            FormField::text("customer", ("Customer", "العميل"), row.map_or("", |o| o.customer_name.as_str()))
                .required(),
            FormField::text(
                "restaurant",
                ("Restaurant", "المطعم"),
                row.map_or("", |o| o.restaurant_name.as_str()),
            )
            .required(),
            FormField::number("items", ("Items", "الأصناف"), row.map_or(1.0, |o| f64::from(o.items_count))),
            FormField::number("total", ("Total", "الإجمالي"), row.map_or(0.0, |o| o.total)),
            FormField::choice("status", ("Status", "الحالة"), options(&OrderStatus::ALL, OrderStatus::label), status),
            FormField::choice(
                "payment",
                ("Payment", "الدفع"),
                options(&PaymentMethod::ALL, PaymentMethod::label),
                payment,
            ),
        ]
    }

    fn from_form(form: &FormDialog, base: Option<&Order>) -> Order {
        Order {
            id: base.map(|o| o.id.clone()).unwrap_or_default(),
            // Left empty on create; the API numbers new orders.
            order_number: base.map(|o| o.order_number.clone()).unwrap_or_default(),
            customer_name: form.text("customer"),
            restaurant_name: form.text("restaurant"),
            items_count: form.number("items").max(0.0).round() as u32,
            total: form.number("total"),
            status: OrderStatus::ALL
                .get(form.choice("status"))
                .copied()
                .unwrap_or(OrderStatus::Pending),
            payment_method: PaymentMethod::ALL
                .get(form.choice("payment"))
                .copied()
                .unwrap_or(PaymentMethod::Cash),
            created_at: base.map_or_else(Utc::now, |o| o.created_at),
        }
    }

    fn details(o: &Order, lang: Language) -> Vec<(String, String)> {
        vec![
            (lang.pick("Order", "رقم الطلب").into(), o.order_number.clone()),
            (lang.pick("Customer", "العميل").into(), o.customer_name.clone()),
            (lang.pick("Restaurant", "المطعم").into(), o.restaurant_name.clone()),
            (lang.pick("Items", "الأصناف").into(), o.items_count.to_string()),
            (lang.pick("Total", "الإجمالي").into(), money(o.total, lang)),
            (lang.pick("Status", "الحالة").into(), o.status.label(lang).into()),
            (lang.pick("Payment", "الدفع").into(), o.payment_method.label(lang).into()),
            (lang.pick("Placed", "تاريخ الطلب").into(), o.created_at.format("%Y-%m-%d %H:%M").to_string()),
        ]
    }

    fn name(o: &Order, _lang: Language) -> String {
        o.order_number.clone()
    }

    fn create(order: Order) -> Mutation {
        Mutation::CreateOrder(order)
    }

    fn update(id: String, order: Order) -> Mutation {
        Mutation::UpdateOrder(id, order)
    }

    fn delete(id: String) -> Mutation {
        Mutation::DeleteOrder(id)
    }

    /// Moves the order one step along the delivery workflow.
    fn toggle(o: &Order) -> Option<Mutation> {
        o.status
            .advanced()
            .map(|next| Mutation::SetOrderStatus(o.id.clone(), next))
    }
}
