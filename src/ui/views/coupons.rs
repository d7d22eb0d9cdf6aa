//! Coupons page.

use chrono::{Duration, NaiveDate, Utc};

use super::resource::{date, money, options, pick, yes_no, FilterControl, Filters, Resource};
use crate::api::types::{Coupon, CouponFilters, DiscountType};
use crate::api::{ListQuery, Page};
use crate::i18n::{Language, Text};
use crate::table::{CellValue, Column};
use crate::tasks::{Mutation, QueryData, QueryRequest};
use crate::ui::components::{FormDialog, FormField, Label};

const ACTIVE_OPTIONS: [bool; 2] = [true, false];

/// Default lifetime of a new coupon.
const DEFAULT_VALIDITY_DAYS: i64 = 30;

/// Promotional coupons.
pub struct CouponsResource;

impl Resource for CouponsResource {
    type Row = Coupon;

    const TITLE: Text = Text::Coupons;
    const NOUN: Label = ("coupon", "كوبون");

    fn columns() -> Vec<Column<Coupon>> {
        vec![
            Column::new("code", ("Code", "الرمز"), |c: &Coupon| CellValue::from(c.code.as_str())).width(2),
            Column::new("discount", ("Discount", "الخصم"), |c: &Coupon| CellValue::from(c.discount_value))
                .render(|c, _| c.discount_text()),
            Column::new("type", ("Type", "النوع"), |c: &Coupon| {
                CellValue::from(c.discount_type.label(Language::English))
            })
            .render(|c, lang| c.discount_type.label(lang).to_string()),
            Column::new("min_order", ("Min. order", "الحد الأدنى"), |c: &Coupon| CellValue::from(c.min_order))
                .render(|c, lang| money(c.min_order, lang)),
            Column::new("usage", ("Used", "الاستخدام"), |c: &Coupon| CellValue::from(c.used_count))
                .render(|c, _| format!("{}/{}", c.used_count, c.usage_limit)),
            Column::new("expires", ("Expires", "ينتهي"), |c: &Coupon| CellValue::from(c.expires_at))
                .render(|c, _| date(c.expires_at)),
            Column::new("active", ("Active", "نشط"), |c: &Coupon| CellValue::from(c.is_active))
                .render(|c, lang| yes_no(c.is_active, lang).to_string()),
        ]
    }

    fn filter_controls() -> Vec<FilterControl> {
        vec![
            FilterControl::new(("Active", "الحالة"), vec![("Active", "نشط"), ("Inactive", "غير نشط")]),
            FilterControl::from_labels(("Type", "النوع"), &DiscountType::ALL, DiscountType::label),
        ]
    }

    fn filters(selection: &[Option<usize>]) -> Filters<Self> {
        CouponFilters {
            is_active: pick(&ACTIVE_OPTIONS, selection.first().copied().flatten()),
            discount_type: pick(&DiscountType::ALL, selection.get(1).copied().flatten()),
        }
    }

    fn request(query: ListQuery<CouponFilters>) -> QueryRequest {
        QueryRequest::Coupons(query)
    }

    fn page(data: &QueryData) -> Option<&Page<Coupon>> {
        match data {
            QueryData::Coupons(page) => Some(page),
            _ => None,
        }
    }

    fn form_fields(row: Option<&Coupon>) -> Vec<FormField> {
        let discount_type = row
            .and_then(|c| DiscountType::ALL.iter().position(|&d| d == c.discount_type))
            .unwrap_or(0);
        let expires = row
            .map(|c| c.expires_at)
            .unwrap_or_else(|| Utc::now() + Duration::days(DEFAULT_VALIDITY_DAYS));
        vec![
            FormField::text("code", ("Code", "الرمز"), row.map_or("", |c| c.code.as_str())).required(),
            FormField::choice(
                "type",
                ("Type", "النوع"),
                options(&DiscountType::ALL, DiscountType::label),
                discount_type,
            ),
            FormField::number("value", ("Discount", "الخصم"), row.map_or(10.0, |c| c.discount_value)),
            FormField::number("min_order", ("Min. order", "الحد الأدنى"), row.map_or(0.0, |c| c.min_order)),
            FormField::number(
                "usage_limit",
                ("Usage limit", "حد الاستخدام"),
                row.map_or(100.0, |c| f64::from(c.usage_limit)),
            ),
            FormField::text("expires", ("Expires (YYYY-MM-DD)", "ينتهي (YYYY-MM-DD)"), date(expires)),
            FormField::toggle("active", ("Active", "نشط"), row.map_or(true, |c| c.is_active)),
        ]
    }

    fn from_form(form: &FormDialog, base: Option<&Coupon>) -> Coupon {
        let fallback = base
            .map(|c| c.expires_at)
            .unwrap_or_else(|| Utc::now() + Duration::days(DEFAULT_VALIDITY_DAYS));
        // An unparsable date keeps the previous expiry.
        let expires_at = NaiveDate::parse_from_str(&form.text("expires"), "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(23, 59, 59))
            .map(|dt| dt.and_utc())
            .unwrap_or(fallback);
        Coupon {
            id: base.map(|c| c.id.clone()).unwrap_or_default(),
            code: form.text("code").to_uppercase(),
            discount_type: DiscountType::ALL
                .get(form.choice("type"))
                .copied()
                .unwrap_or(DiscountType::Percentage),
            discount_value: form.number("value"),
            min_order: form.number("min_order"),
            usage_limit: form.number("usage_limit").max(0.0).round() as u32,
            used_count: base.map_or(0, |c| c.used_count),
            expires_at,
            is_active: form.toggle("active"),
        }
    }

    fn details(c: &Coupon, lang: Language) -> Vec<(String, String)> {
        vec![
            (lang.pick("Code", "الرمز").into(), c.code.clone()),
            (lang.pick("Discount", "الخصم").into(), c.discount_text()),
            (lang.pick("Type", "النوع").into(), c.discount_type.label(lang).into()),
            (lang.pick("Min. order", "الحد الأدنى").into(), money(c.min_order, lang)),
            (
                lang.pick("Usage", "الاستخدام").into(),
                format!("{}/{}", c.used_count, c.usage_limit),
            ),
            (lang.pick("Expires", "ينتهي").into(), date(c.expires_at)),
            (lang.pick("Active", "نشط").into(), yes_no(c.is_active, lang).into()),
            (
                lang.pick("Redeemable now", "قابل للاستخدام الآن").into(),
                yes_no(c.is_redeemable(Utc::now()), lang).into(),
            ),
        ]
    }

    fn name(c: &Coupon, _lang: Language) -> String {
        c.code.clone()
    }

    fn create(coupon: Coupon) -> Mutation {
        Mutation::CreateCoupon(coupon)
    }

    fn update(id: String, coupon: Coupon) -> Mutation {
        Mutation::UpdateCoupon(id, coupon)
    }

    fn delete(id: String) -> Mutation {
        Mutation::DeleteCoupon(id)
    }

    fn toggle(c: &Coupon) -> Option<Mutation> {
        Some(Mutation::ToggleCoupon(c.id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, TimeZone};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::*;

    #[test]
    fn test_code_is_upper_cased() {
        let mut form = FormDialog::new("", CouponsResource::form_fields(None));
        for c in "save5".chars() {
            form.handle_input(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE), Language::English);
        }
        let coupon = CouponsResource::from_form(&form, None);
        assert_eq!(coupon.code, "SAVE5");
        assert_eq!(coupon.discount_value, 10.0);
        assert_eq!(coupon.usage_limit, 100);
        assert!(coupon.is_active);
    }

    #[test]
    fn test_expiry_round_trips_through_form() {
        let base = Coupon {
            id: "cp1".into(),
            code: "VIP50".into(),
            discount_type: DiscountType::Fixed,
            discount_value: 50.0,
            min_order: 200.0,
            usage_limit: 10,
            used_count: 3,
            expires_at: Utc.with_ymd_and_hms(2026, 3, 1, 23, 59, 59).unwrap(),
            is_active: true,
        };
        let form = FormDialog::new("", CouponsResource::form_fields(Some(&base)));
        let edited = CouponsResource::from_form(&form, Some(&base));
        assert_eq!(edited, base);
        assert_eq!(edited.expires_at.month(), 3);
    }
}
