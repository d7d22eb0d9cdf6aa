//! Restaurants page.

use chrono::Utc;

use super::resource::{date, options, pick, yes_no, FilterControl, Filters, Resource};
use crate::api::seed::category_names;
use crate::api::types::{Restaurant, RestaurantFilters, RestaurantStatus};
use crate::api::{ListQuery, Page};
use crate::i18n::{Language, Text};
use crate::table::{CellValue, Column};
use crate::tasks::{Mutation, QueryData, QueryRequest};
use crate::ui::components::{FormDialog, FormField, Label};

fn categories() -> Vec<Label> {
    category_names().collect()
}

/// Arabic name of a category, the stored English name if unknown.
fn category_label(name: &str, lang: Language) -> String {
    category_names()
        .find(|(en, _)| en.eq_ignore_ascii_case(name))
        .map(|(en, ar)| lang.pick(en, ar).to_string())
        .unwrap_or_else(|| name.to_string())
}

/// Restaurants listed on the marketplace.
pub struct RestaurantsResource;

impl Resource for RestaurantsResource {
    type Row = Restaurant;

    const TITLE: Text = Text::Restaurants;
    const NOUN: Label = ("restaurant", "مطعم");

    fn columns() -> Vec<Column<Restaurant>> {
        vec![
            Column::new("name", ("Name", "الاسم"), |r: &Restaurant| CellValue::from(r.name.as_str()))
                .render(|r, lang| r.display_name(lang).to_string())
                .width(2),
            Column::new("owner", ("Owner", "المالك"), |r: &Restaurant| {
                CellValue::from(r.owner_name.as_str())
            })
            .width(2),
            Column::new("category", ("Category", "التصنيف"), |r: &Restaurant| {
                CellValue::from(r.category.as_str())
            })
            .render(|r, lang| category_label(&r.category, lang)),
            Column::new("city", ("City", "المدينة"), |r: &Restaurant| CellValue::from(r.city.as_str())),
            Column::new("rating", ("Rating", "التقييم"), |r: &Restaurant| CellValue::from(r.rating))
                .render(|r, _| format!("★ {:.1}", r.rating)),
            Column::new("status", ("Status", "الحالة"), |r: &Restaurant| {
                CellValue::from(r.status.label(Language::English))
            })
            .render(|r, lang| r.status.label(lang).to_string()),
            Column::new("featured", ("Featured", "مميز"), |r: &Restaurant| CellValue::from(r.is_featured))
                .render(|r, lang| yes_no(r.is_featured, lang).to_string()),
            Column::new("orders", ("Orders", "الطلبات"), |r: &Restaurant| CellValue::from(r.orders_count)),
        ]
    }

    fn filter_controls() -> Vec<FilterControl> {
        vec![
            FilterControl::from_labels(("Status", "الحالة"), &RestaurantStatus::ALL, RestaurantStatus::label),
            FilterControl::new(("Category", "التصنيف"), categories()),
        ]
    }

    fn filters(selection: &[Option<usize>]) -> Filters<Self> {
        let categories = categories();
        RestaurantFilters {
            status: pick(&RestaurantStatus::ALL, selection.first().copied().flatten()),
            category: pick(&categories, selection.get(1).copied().flatten()).map(|c| c.0.to_string()),
        }
    }

    fn request(query: ListQuery<RestaurantFilters>) -> QueryRequest {
        QueryRequest::Restaurants(query)
    }

    fn page(data: &QueryData) -> Option<&Page<Restaurant>> {
        match data {
            QueryData::Restaurants(page) => Some(page),
            _ => None,
        }
    }

    fn form_fields(row: Option<&Restaurant>) -> Vec<FormField> {
        let category = row
            .and_then(|r| {
                category_names().position(|(en, _)| en.eq_ignore_ascii_case(&r.category))
            })
            .unwrap_or(0);
        let status = row
            .and_then(|r| RestaurantStatus::ALL.iter().position(|&s| s == r.status))
            .unwrap_or(0);
        vec![
            FormField::text("name", ("Name", "الاسم"), row.map_or("", |r| r.name.as_str())).required(),
            FormField::text("name_ar", ("Arabic name", "الاسم بالعربية"), row.map_or("", |r| r.name_ar.as_str())),
            FormField::text("owner", ("Owner", "المالك"), row.map_or("", |r| r.owner_name.as_str())).required(),
            FormField::choice("category", ("Category", "التصنيف"), categories(), category),
            FormField::text("city", ("City", "المدينة"), row.map_or("", |r| r.city.as_str())),
            FormField::number("rating", ("Rating (0-5)", "التقييم (0-5)"), row.map_or(0.0, |r| r.rating)),
            FormField::choice(
                "status",
                ("Status", "الحالة"),
                options(&RestaurantStatus::ALL, RestaurantStatus::label),
                status,
            ),
            FormField::toggle("featured", ("Featured", "مميز"), row.is_some_and(|r| r.is_featured)),
        ]
    }

    fn from_form(form: &FormDialog, base: Option<&Restaurant>) -> Restaurant {
        let categories = categories();
        let category = categories
            .get(form.choice("category"))
            .map(|c| c.0.to_string())
            .unwrap_or_default();
        let status = RestaurantStatus::ALL
            .get(form.choice("status"))
            .copied()
            .unwrap_or(RestaurantStatus::Pending);
        Restaurant {
            id: base.map(|r| r.id.clone()).unwrap_or_default(),
            name: form.text("name"),
            name_ar: form.text("name_ar"),
            owner_name: form.text("owner"),
            category,
            city: form.text("city"),
            rating: form.number("rating"),
            status,
            is_featured: form.toggle("featured"),
            orders_count: base.map_or(0, |r| r.orders_count),
            created_at: base.map_or_else(Utc::now, |r| r.created_at),
        }
    }

    fn details(r: &Restaurant, lang: Language) -> Vec<(String, String)> {
        vec![
            (lang.pick("Name", "الاسم").into(), r.name.clone()),
            (lang.pick("Arabic name", "الاسم بالعربية").into(), r.name_ar.clone()),
            (lang.pick("Owner", "المالك").into(), r.owner_name.clone()),
            (lang.pick("Category", "التصنيف").into(), category_label(&r.category, lang)),
            (lang.pick("City", "المدينة").into(), r.city.clone()),
            (lang.pick("Rating", "التقييم").into(), format!("{:.1}", r.rating)),
            (lang.pick("Status", "الحالة").into(), r.status.label(lang).into()),
            (lang.pick("Featured", "مميز").into(), yes_no(r.is_featured, lang).into()),
            (lang.pick("Orders", "الطلبات").into(), r.orders_count.to_string()),
            (lang.pick("Listed", "تاريخ الإضافة").into(), date(r.created_at)),
        ]
    }

    fn name(r: &Restaurant, lang: Language) -> String {
        r.display_name(lang).to_string()
    }

    fn create(restaurant: Restaurant) -> Mutation {
        Mutation::CreateRestaurant(restaurant)
    }

    fn update(id: String, restaurant: Restaurant) -> Mutation {
        Mutation::UpdateRestaurant(id, restaurant)
    }

    fn delete(id: String) -> Mutation {
        Mutation::DeleteRestaurant(id)
    }

    fn toggle(r: &Restaurant) -> Option<Mutation> {
        Some(Mutation::SetRestaurantStatus(r.id.clone(), r.status.toggled()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_filter_uses_english_name() {
        let filters = RestaurantsResource::filters(&[None, Some(1)]);
        assert_eq!(filters.category.as_deref(), Some("Burgers"));
        assert_eq!(filters.status, None);
    }

    #[test]
    fn test_category_label_translates() {
        assert_eq!(category_label("pizza", Language::Arabic), "بيتزا");
        assert_eq!(category_label("Fusion", Language::Arabic), "Fusion");
    }

    #[test]
    fn test_form_round_trip_keeps_unedited_fields() {
        let fields = RestaurantsResource::form_fields(None);
        let mut form = FormDialog::new("", fields);
        assert!(!form.validate(Language::English));
        let created = RestaurantsResource::from_form(&form, None);
        assert_eq!(created.category, "Pizza");
        assert_eq!(created.status, RestaurantStatus::Open);
        assert!(!created.is_featured);

        let mut existing = created.clone();
        existing.id = "r3".into();
        existing.orders_count = 42;
        let form = FormDialog::new("", RestaurantsResource::form_fields(Some(&existing)));
        let edited = RestaurantsResource::from_form(&form, Some(&existing));
        assert_eq!(edited, existing);
    }
}
