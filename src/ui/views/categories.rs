//! Categories page.

use super::resource::{pick, yes_no, FilterControl, Filters, Resource};
use crate::api::types::{Category, CategoryFilters};
use crate::api::{ListQuery, Page};
use crate::i18n::{Language, Text};
use crate::table::{CellValue, Column};
use crate::tasks::{Mutation, QueryData, QueryRequest};
use crate::ui::components::{FormDialog, FormField, Label};

const ACTIVE_OPTIONS: [bool; 2] = [true, false];

fn active_filter() -> FilterControl {
    FilterControl::new(
        ("Active", "الحالة"),
        vec![("Active", "نشط"), ("Inactive", "غير نشط")],
    )
}

/// Cuisine categories.
pub struct CategoriesResource;

impl Resource for CategoriesResource {
    type Row = Category;

    const TITLE: Text = Text::Categories;
    const NOUN: Label = ("category", "تصنيف");

    fn columns() -> Vec<Column<Category>> {
        vec![
            Column::new("order", ("#", "#"), |c: &Category| CellValue::from(c.sort_order)),
            Column::new("name", ("Name", "الاسم"), |c: &Category| CellValue::from(c.name.as_str()))
                .render(|c, lang| c.display_name(lang).to_string())
                .width(2),
            Column::new("description", ("Description", "الوصف"), |c: &Category| {
                CellValue::from(c.description.as_str())
            })
            .width(4),
            Column::new("restaurants", ("Restaurants", "المطاعم"), |c: &Category| {
                CellValue::from(c.restaurants_count)
            }),
            Column::new("active", ("Active", "نشط"), |c: &Category| CellValue::from(c.is_active))
                .render(|c, lang| yes_no(c.is_active, lang).to_string()),
        ]
    }

    fn filter_controls() -> Vec<FilterControl> {
        vec![active_filter()]
    }

    fn filters(selection: &[Option<usize>]) -> Filters<Self> {
        CategoryFilters {
            is_active: pick(&ACTIVE_OPTIONS, selection.first().copied().flatten()),
        }
    }

    fn request(query: ListQuery<CategoryFilters>) -> QueryRequest {
        QueryRequest::Categories(query)
    }

    fn page(data: &QueryData) -> Option<&Page<Category>> {
        match data {
            QueryData::Categories(page) => Some(page),
            _ => None,
        }
    }

    fn form_fields(row: Option<&Category>) -> Vec<FormField> {
        vec![
            FormField::text("name", ("Name", "الاسم"), row.map_or("", |c| c.name.as_str())).required(),
            FormField::text("name_ar", ("Arabic name", "الاسم بالعربية"), row.map_or("", |c| c.name_ar.as_str())),
            FormField::text(
                "description",
                ("Description", "الوصف"),
                row.map_or("", |c| c.description.as_str()),
            ),
            FormField::number("sort_order", ("Sort order", "الترتيب"), row.map_or(0.0, |c| f64::from(c.sort_order))),
            FormField::toggle("active", ("Active", "نشط"), row.map_or(true, |c| c.is_active)),
        ]
    }

    fn from_form(form: &FormDialog, base: Option<&Category>) -> Category {
        Category {
            id: base.map(|c| c.id.clone()).unwrap_or_default(),
            name: form.text("name"),
            name_ar: form.text("name_ar"),
            description: form.text("description"),
            restaurants_count: base.map_or(0, |c| c.restaurants_count),
            is_active: form.toggle("active"),
            sort_order: form.number("sort_order").max(0.0).round() as u32,
        }
    }

    fn details(c: &Category, lang: Language) -> Vec<(String, String)> {
        vec![
            (lang.pick("Name", "الاسم").into(), c.name.clone()),
            (lang.pick("Arabic name", "الاسم بالعربية").into(), c.name_ar.clone()),
            (lang.pick("Description", "الوصف").into(), c.description.clone()),
            (lang.pick("Restaurants", "المطاعم").into(), c.restaurants_count.to_string()),
            (lang.pick("Active", "نشط").into(), yes_no(c.is_active, lang).into()),
            (lang.pick("Sort order", "الترتيب").into(), c.sort_order.to_string()),
        ]
    }

    fn name(c: &Category, lang: Language) -> String {
        c.display_name(lang).to_string()
    }

    fn create(category: Category) -> Mutation {
        Mutation::CreateCategory(category)
    }

    fn update(id: String, category: Category) -> Mutation {
        Mutation::UpdateCategory(id, category)
    }

    fn delete(id: String) -> Mutation {
        Mutation::DeleteCategory(id)
    }

    fn toggle(c: &Category) -> Option<Mutation> {
        Some(Mutation::ToggleCategory(c.id.clone()))
    }
}
