//! Users page.

use chrono::Utc;

use super::resource::{date, money, options, pick, FilterControl, Filters, Resource};
use crate::api::types::{User, UserFilters, UserRole, UserStatus};
use crate::api::{ListQuery, Page};
use crate::i18n::{Language, Text};
use crate::table::{CellValue, Column};
use crate::tasks::{Mutation, QueryData, QueryRequest};
use crate::ui::components::{FormDialog, FormField, Label};

/// Marketplace accounts.
pub struct UsersResource;

impl Resource for UsersResource {
    type Row = User;

    const TITLE: Text = Text::Users;
    const NOUN: Label = ("user", "مستخدم");

    fn columns() -> Vec<Column<User>> {
        vec![
            Column::new("name", ("Name", "الاسم"), |u: &User| CellValue::from(u.name.as_str())).width(2),
            Column::new("email", ("Email", "البريد"), |u: &User| CellValue::from(u.email.as_str())).width(3),
            Column::new("role", ("Role", "الدور"), |u: &User| CellValue::from(u.role.label(Language::English)))
                .render(|u, lang| u.role.label(lang).to_string()),
            Column::new("status", ("Status", "الحالة"), |u: &User| {
                CellValue::from(u.status.label(Language::English))
            })
            .render(|u, lang| u.status.label(lang).to_string()),
            Column::new("orders", ("Orders", "الطلبات"), |u: &User| CellValue::from(u.orders_count)),
            Column::new("spent", ("Spent", "الإنفاق"), |u: &User| CellValue::from(u.total_spent))
                .render(|u, lang| money(u.total_spent, lang)),
            Column::new("joined", ("Joined", "تاريخ التسجيل"), |u: &User| CellValue::from(u.created_at))
                .render(|u, _| date(u.created_at)),
        ]
    }

    fn filter_controls() -> Vec<FilterControl> {
        vec![
            FilterControl::from_labels(("Role", "الدور"), &UserRole::ALL, UserRole::label),
            FilterControl::from_labels(("Status", "الحالة"), &UserStatus::ALL, UserStatus::label),
        ]
    }

    fn filters(selection: &[Option<usize>]) -> Filters<Self> {
        UserFilters {
            role: pick(&UserRole::ALL, selection.first().copied().flatten()),
            status: pick(&UserStatus::ALL, selection.get(1).copied().flatten()),
        }
    }

    fn request(query: ListQuery<UserFilters>) -> QueryRequest {
        QueryRequest::Users(query)
    }

    fn page(data: &QueryData) -> Option<&Page<User>> {
        match data {
            QueryData::Users(page) => Some(page),
            _ => None,
        }
    }

    fn form_fields(row: Option<&User>) -> Vec<FormField> {
        let role = row
            .and_then(|u| UserRole::ALL.iter().position(|&r| r == u.role))
            .unwrap_or(0);
        let status = row
            .and_then(|u| UserStatus::ALL.iter().position(|&s| s == u.status))
            .unwrap_or(0);
        vec![
            FormField::text("name", ("Name", "الاسم"), row.map_or("", |u| u.name.as_str())).required(),
            FormField::text("email", ("Email", "البريد الإلكتروني"), row.map_or("", |u| u.email.as_str()))
                .required(),
            FormField::text("phone", ("Phone", "الهاتف"), row.map_or("", |u| u.phone.as_str())),
            FormField::choice("role", ("Role", "الدور"), options(&UserRole::ALL, UserRole::label), role),
            FormField::choice(
                "status",
                ("Status", "الحالة"),
                options(&UserStatus::ALL, UserStatus::label),
                status,
            ),
        ]
    }

    fn from_form(form: &FormDialog, base: Option<&User>) -> User {
        User {
            id: base.map(|u| u.id.clone()).unwrap_or_default(),
            name: form.text("name"),
            email: form.text("email"),
            phone: form.text("phone"),
            role: UserRole::ALL[form.choice("role").min(UserRole::ALL.len() - 1)],
            status: UserStatus::ALL[form.choice("status").min(UserStatus::ALL.len() - 1)],
            orders_count: base.map_or(0, |u| u.orders_count),
            total_spent: base.map_or(0.0, |u| u.total_spent),
            created_at: base.map_or_else(Utc::now, |u| u.created_at),
        }
    }

    fn details(u: &User, lang: Language) -> Vec<(String, String)> {
        vec![
            (lang.pick("Name", "الاسم").into(), u.name.clone()),
            (lang.pick("Email", "البريد").into(), u.email.clone()),
            (lang.pick("Phone", "الهاتف").into(), u.phone.clone()),
            (lang.pick("Role", "الدور").into(), u.role.label(lang).into()),
            (lang.pick("Status", "الحالة").into(), u.status.label(lang).into()),
            (lang.pick("Orders", "الطلبات").into(), u.orders_count.to_string()),
            (lang.pick("Total spent", "إجمالي الإنفاق").into(), money(u.total_spent, lang)),
            (lang.pick("Joined", "تاريخ التسجيل").into(), date(u.created_at)),
        ]
    }

    fn name(u: &User, _lang: Language) -> String {
        u.name.clone()
    }

    fn create(user: User) -> Mutation {
        Mutation::CreateUser(user)
    }

    fn update(id: String, user: User) -> Mutation {
        Mutation::UpdateUser(id, user)
    }

    fn delete(id: String) -> Mutation {
        Mutation::DeleteUser(id)
    }

    fn toggle(u: &User) -> Option<Mutation> {
        Some(Mutation::SetUserStatus(u.id.clone(), u.status.toggled()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters_from_selection() {
        let filters = UsersResource::filters(&[Some(1), None]);
        assert_eq!(filters.role, Some(UserRole::ALL[1]));
        assert_eq!(filters.status, None);
        assert_eq!(UsersResource::filters(&[]), UserFilters::default());
    }

    #[test]
    fn test_create_form_defaults() {
        let mut form = FormDialog::new("New user", UsersResource::form_fields(None));
        assert!(!form.validate(Language::English));

        let user = UsersResource::from_form(&form, None);
        assert!(user.id.is_empty());
        assert_eq!(user.role, UserRole::ALL[0]);
        assert_eq!(user.status, UserStatus::ALL[0]);
        assert_eq!(user.orders_count, 0);
    }

    #[test]
    fn test_sort_by_spent_is_numeric() {
        let columns = UsersResource::columns();
        let spent = columns.iter().find(|c| c.id() == "spent").unwrap();
        let mut a = UsersResource::from_form(
            &FormDialog::new("", UsersResource::form_fields(None)),
            None,
        );
        let mut b = a.clone();
        a.total_spent = 9.0;
        b.total_spent = 10.0;
        assert_eq!(spent.compare(&a, &b), std::cmp::Ordering::Less);
        assert_eq!(spent.cell_text(&b, Language::English), "SAR 10.00");
    }
}
