//! Marketplace request and response types.
//!
//! These model the records behind each dashboard screen together with the
//! list request / paged response envelope shared by every resource.

use chrono::{DateTime, NaiveDate, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use super::repository::{Record, RecordFilter};
use crate::i18n::Language;

/// Default number of records per list page.
pub const DEFAULT_LIMIT: u32 = 10;

// ============================================================================
// List envelope
// ============================================================================

/// A list request: resource-specific filters plus search and paging.
///
/// `page` is one-based. Missing or zero values fall back to page 1 and
/// [`DEFAULT_LIMIT`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery<F> {
    /// Resource-specific filters.
    #[serde(flatten)]
    pub filters: F,
    /// Free-text search over the resource's text fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// One-based page number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Page size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl<F> ListQuery<F> {
    /// Create a query for the given filters, first page, default limit.
    pub fn new(filters: F) -> Self {
        Self {
            filters,
            search: None,
            page: None,
            limit: None,
        }
    }

    /// Set the search text. Blank text clears it.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = if search.trim().is_empty() {
            None
        } else {
            Some(search)
        };
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The effective one-based page.
    pub fn page_or_default(&self) -> u32 {
        self.page.filter(|&p| p > 0).unwrap_or(1)
    }

    /// The effective page size.
    pub fn limit_or_default(&self) -> u32 {
        self.limit.filter(|&l| l > 0).unwrap_or(DEFAULT_LIMIT)
    }
}

/// Paging metadata of a list response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// One-based page number.
    pub page: u32,
    /// Requested page size.
    pub limit: u32,
    /// Matching records after filtering, before slicing.
    pub total: u32,
    /// `ceil(total / limit)`.
    pub total_pages: u32,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total: u32) -> Self {
        let limit = limit.max(1);
        Self {
            page,
            limit,
            total,
            total_pages: total.div_ceil(limit),
        }
    }

    /// Whether a later page exists.
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Whether an earlier page exists.
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

/// One page of records.
///
/// Serializes as `{ "<collection>": [...], "pagination": {...} }`, e.g.
/// `{ "users": [...], "pagination": {...} }`.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    /// An empty first page.
    pub fn empty(limit: u32) -> Self {
        Self {
            items: Vec::new(),
            pagination: Pagination::new(1, limit, 0),
        }
    }
}

impl<T: Record> Serialize for Page<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(T::COLLECTION, &self.items)?;
        map.serialize_entry("pagination", &self.pagination)?;
        map.end()
    }
}

fn contains_ci(field: &str, needle_lower: &str) -> bool {
    field.to_lowercase().contains(needle_lower)
}

fn is_email(value: &str) -> bool {
    let value = value.trim();
    match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    }
}

// ============================================================================
// Users
// ============================================================================

/// Role of a marketplace account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UserRole {
    Customer,
    RestaurantOwner,
    Driver,
    Admin,
}

impl UserRole {
    pub const ALL: [UserRole; 4] = [
        UserRole::Customer,
        UserRole::RestaurantOwner,
        UserRole::Driver,
        UserRole::Admin,
    ];

    pub fn label(self, lang: Language) -> &'static str {
        match self {
            UserRole::Customer => lang.pick("Customer", "عميل"),
            UserRole::RestaurantOwner => lang.pick("Restaurant owner", "صاحب مطعم"),
            UserRole::Driver => lang.pick("Driver", "سائق"),
            UserRole::Admin => lang.pick("Admin", "مسؤول"),
        }
    }
}

/// Account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UserStatus {
    Active,
    Inactive,
    Suspended,
}

impl UserStatus {
    pub const ALL: [UserStatus; 3] = [UserStatus::Active, UserStatus::Inactive, UserStatus::Suspended];

    pub fn label(self, lang: Language) -> &'static str {
        match self {
            UserStatus::Active => lang.pick("Active", "نشط"),
            UserStatus::Inactive => lang.pick("Inactive", "غير نشط"),
            UserStatus::Suspended => lang.pick("Suspended", "موقوف"),
        }
    }

    /// Status after an admin toggle: active accounts get suspended, every
    /// other account gets reactivated.
    pub fn toggled(self) -> Self {
        match self {
            UserStatus::Active => UserStatus::Suspended,
            UserStatus::Inactive | UserStatus::Suspended => UserStatus::Active,
        }
    }
}

/// A marketplace account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub orders_count: u32,
    pub total_spent: f64,
    pub created_at: DateTime<Utc>,
}

/// Filters for the user list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
}

impl RecordFilter<User> for UserFilters {
    fn matches(&self, user: &User) -> bool {
        self.role.map_or(true, |r| user.role == r) && self.status.map_or(true, |s| user.status == s)
    }
}

impl Record for User {
    const COLLECTION: &'static str = "users";
    const ID_PREFIX: &'static str = "u";
    type Filters = UserFilters;

    fn id(&self) -> &str {
        &self.id
    }

    fn assign_id(&mut self, id: String) {
        self.id = id;
    }

    fn matches_search(&self, needle_lower: &str) -> bool {
        [&self.name, &self.email, &self.phone]
            .iter()
            .any(|f| contains_ci(f, needle_lower))
    }

    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name cannot be empty".to_string());
        }
        if !is_email(&self.email) {
            return Err(format!("'{}' is not a valid email address", self.email));
        }
        if self.total_spent < 0.0 {
            return Err("total spent cannot be negative".to_string());
        }
        Ok(())
    }
}

// ============================================================================
// Restaurants
// ============================================================================

/// Listing status of a restaurant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RestaurantStatus {
    Open,
    Closed,
    Pending,
    Suspended,
}

impl RestaurantStatus {
    pub const ALL: [RestaurantStatus; 4] = [
        RestaurantStatus::Open,
        RestaurantStatus::Closed,
        RestaurantStatus::Pending,
        RestaurantStatus::Suspended,
    ];

    pub fn label(self, lang: Language) -> &'static str {
        match self {
            RestaurantStatus::Open => lang.pick("Open", "مفتوح"),
            RestaurantStatus::Closed => lang.pick("Closed", "مغلق"),
            RestaurantStatus::Pending => lang.pick("Pending approval", "بانتظار الموافقة"),
            RestaurantStatus::Suspended => lang.pick("Suspended", "موقوف"),
        }
    }

    /// Status after an admin toggle: pending restaurants get approved, open
    /// ones get suspended, the rest are reopened.
    pub fn toggled(self) -> Self {
        match self {
            RestaurantStatus::Open => RestaurantStatus::Suspended,
            RestaurantStatus::Pending | RestaurantStatus::Closed | RestaurantStatus::Suspended => {
                RestaurantStatus::Open
            }
        }
    }
}

/// A restaurant listed on the marketplace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    pub name_ar: String,
    pub owner_name: String,
    pub category: String,
    pub city: String,
    pub rating: f64,
    pub status: RestaurantStatus,
    pub is_featured: bool,
    pub orders_count: u32,
    pub created_at: DateTime<Utc>,
}

impl Restaurant {
    /// Name in the display language.
    pub fn display_name(&self, lang: Language) -> &str {
        lang.pick(&self.name, &self.name_ar)
    }
}

/// Filters for the restaurant list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RestaurantStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl RecordFilter<Restaurant> for RestaurantFilters {
    fn matches(&self, r: &Restaurant) -> bool {
        self.status.map_or(true, |s| r.status == s)
            && self
                .category
                .as_deref()
                .map_or(true, |c| r.category.eq_ignore_ascii_case(c))
    }
}

impl Record for Restaurant {
    const COLLECTION: &'static str = "restaurants";
    const ID_PREFIX: &'static str = "r";
    type Filters = RestaurantFilters;

    fn id(&self) -> &str {
        &self.id
    }

    fn assign_id(&mut self, id: String) {
        self.id = id;
    }

    fn matches_search(&self, needle_lower: &str) -> bool {
        [&self.name, &self.name_ar, &self.owner_name, &self.city]
            .iter()
            .any(|f| contains_ci(f, needle_lower))
    }

    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name cannot be empty".to_string());
        }
        if !(0.0..=5.0).contains(&self.rating) {
            return Err(format!("rating {} must be between 0 and 5", self.rating));
        }
        Ok(())
    }
}

// ============================================================================
// Orders
// ============================================================================

/// Fulfilment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    OnTheWay,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::OnTheWay,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn label(self, lang: Language) -> &'static str {
        match self {
            OrderStatus::Pending => lang.pick("Pending", "قيد الانتظار"),
            OrderStatus::Confirmed => lang.pick("Confirmed", "مؤكد"),
            OrderStatus::Preparing => lang.pick("Preparing", "قيد التحضير"),
            OrderStatus::OnTheWay => lang.pick("On the way", "في الطريق"),
            OrderStatus::Delivered => lang.pick("Delivered", "تم التوصيل"),
            OrderStatus::Cancelled => lang.pick("Cancelled", "ملغي"),
        }
    }

    /// The next step of the delivery workflow, `None` once finished.
    pub fn advanced(self) -> Option<Self> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Confirmed),
            OrderStatus::Confirmed => Some(OrderStatus::Preparing),
            OrderStatus::Preparing => Some(OrderStatus::OnTheWay),
            OrderStatus::OnTheWay => Some(OrderStatus::Delivered),
            OrderStatus::Delivered | OrderStatus::Cancelled => None,
        }
    }

    /// Whether the order still counts towards revenue.
    pub fn is_billable(self) -> bool {
        !matches!(self, OrderStatus::Cancelled)
    }
}

/// How an order was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaymentMethod {
    Cash,
    Card,
    Wallet,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [PaymentMethod::Cash, PaymentMethod::Card, PaymentMethod::Wallet];

    pub fn label(self, lang: Language) -> &'static str {
        match self {
            PaymentMethod::Cash => lang.pick("Cash", "نقدي"),
            PaymentMethod::Card => lang.pick("Card", "بطاقة"),
            PaymentMethod::Wallet => lang.pick("Wallet", "محفظة"),
        }
    }
}

/// A customer order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub order_number: String,
    pub customer_name: String,
    pub restaurant_name: String,
    pub items_count: u32,
    pub total: f64,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<Utc>,
}

/// Filters for the order list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
}

impl RecordFilter<Order> for OrderFilters {
    fn matches(&self, o: &Order) -> bool {
        self.status.map_or(true, |s| o.status == s)
            && self.payment_method.map_or(true, |p| o.payment_method == p)
    }
}

impl Record for Order {
    const COLLECTION: &'static str = "orders";
    const ID_PREFIX: &'static str = "o";
    type Filters = OrderFilters;

    fn id(&self) -> &str {
        &self.id
    }

    fn assign_id(&mut self, id: String) {
        self.id = id;
    }

    fn matches_search(&self, needle_lower: &str) -> bool {
        [&self.order_number, &self.customer_name, &self.restaurant_name]
            .iter()
            .any(|f| contains_ci(f, needle_lower))
    }

    fn validate(&self) -> Result<(), String> {
        if self.customer_name.trim().is_empty() {
            return Err("customer name cannot be empty".to_string());
        }
        if self.restaurant_name.trim().is_empty() {
            return Err("restaurant name cannot be empty".to_string());
        }
        if self.items_count == 0 {
            return Err("an order needs at least one item".to_string());
        }
        if self.total < 0.0 {
            return Err("total cannot be negative".to_string());
        }
        Ok(())
    }
}

// ============================================================================
// Categories
// ============================================================================

/// A cuisine category restaurants are grouped under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub name_ar: String,
    pub description: String,
    pub restaurants_count: u32,
    pub is_active: bool,
    pub sort_order: u32,
}

impl Category {
    pub fn display_name(&self, lang: Language) -> &str {
        lang.pick(&self.name, &self.name_ar)
    }
}

/// Filters for the category list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl RecordFilter<Category> for CategoryFilters {
    fn matches(&self, c: &Category) -> bool {
        self.is_active.map_or(true, |a| c.is_active == a)
    }
}

impl Record for Category {
    const COLLECTION: &'static str = "categories";
    const ID_PREFIX: &'static str = "c";
    type Filters = CategoryFilters;

    fn id(&self) -> &str {
        &self.id
    }

    fn assign_id(&mut self, id: String) {
        self.id = id;
    }

    fn matches_search(&self, needle_lower: &str) -> bool {
        [&self.name, &self.name_ar, &self.description]
            .iter()
            .any(|f| contains_ci(f, needle_lower))
    }

    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name cannot be empty".to_string());
        }
        Ok(())
    }
}

// ============================================================================
// Coupons
// ============================================================================

/// How a coupon discount is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiscountType {
    Percentage,
    Fixed,
}

impl DiscountType {
    pub const ALL: [DiscountType; 2] = [DiscountType::Percentage, DiscountType::Fixed];

    pub fn label(self, lang: Language) -> &'static str {
        match self {
            DiscountType::Percentage => lang.pick("Percentage", "نسبة مئوية"),
            DiscountType::Fixed => lang.pick("Fixed amount", "مبلغ ثابت"),
        }
    }
}

/// A promotional coupon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub id: String,
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    pub min_order: f64,
    pub usage_limit: u32,
    pub used_count: u32,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
}

impl Coupon {
    /// Whether the coupon can still be redeemed at `now`.
    pub fn is_redeemable(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.expires_at > now && self.used_count < self.usage_limit
    }

    /// Discount display, e.g. `15%` or `20 SAR`.
    pub fn discount_text(&self) -> String {
        match self.discount_type {
            DiscountType::Percentage => format!("{:.0}%", self.discount_value),
            DiscountType::Fixed => format!("{:.2} SAR", self.discount_value),
        }
    }
}

/// Filters for the coupon list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_type: Option<DiscountType>,
}

impl RecordFilter<Coupon> for CouponFilters {
    fn matches(&self, c: &Coupon) -> bool {
        self.is_active.map_or(true, |a| c.is_active == a)
            && self.discount_type.map_or(true, |d| c.discount_type == d)
    }
}

impl Record for Coupon {
    const COLLECTION: &'static str = "coupons";
    const ID_PREFIX: &'static str = "cp";
    type Filters = CouponFilters;

    fn id(&self) -> &str {
        &self.id
    }

    fn assign_id(&mut self, id: String) {
        self.id = id;
    }

    fn matches_search(&self, needle_lower: &str) -> bool {
        contains_ci(&self.code, needle_lower)
    }

    fn validate(&self) -> Result<(), String> {
        if self.code.trim().is_empty() {
            return Err("coupon code cannot be empty".to_string());
        }
        if !self.code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) {
            return Err(format!(
                "coupon code '{}' may only contain A-Z and 0-9",
                self.code
            ));
        }
        if self.discount_value <= 0.0 {
            return Err("discount must be greater than zero".to_string());
        }
        if self.discount_type == DiscountType::Percentage && self.discount_value > 100.0 {
            return Err("a percentage discount cannot exceed 100".to_string());
        }
        if self.min_order < 0.0 {
            return Err("minimum order cannot be negative".to_string());
        }
        Ok(())
    }
}

// ============================================================================
// Platform settings, dashboard and reports
// ============================================================================

/// Marketplace-wide settings edited from the settings screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformSettings {
    pub platform_name: String,
    pub support_email: String,
    pub delivery_fee: f64,
    pub min_order_amount: f64,
    pub commission_rate: f64,
    pub maintenance_mode: bool,
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            platform_name: "Souq".to_string(),
            support_email: "support@souq.example".to_string(),
            delivery_fee: 10.0,
            min_order_amount: 25.0,
            commission_rate: 15.0,
            maintenance_mode: false,
        }
    }
}

impl PlatformSettings {
    pub fn validate(&self) -> Result<(), String> {
        if self.platform_name.trim().is_empty() {
            return Err("platform name cannot be empty".to_string());
        }
        if !is_email(&self.support_email) {
            return Err(format!(
                "'{}' is not a valid email address",
                self.support_email
            ));
        }
        if self.delivery_fee < 0.0 || self.min_order_amount < 0.0 {
            return Err("fees cannot be negative".to_string());
        }
        if !(0.0..=100.0).contains(&self.commission_rate) {
            return Err("commission rate must be between 0 and 100".to_string());
        }
        Ok(())
    }
}

/// Headline numbers for the dashboard screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: u32,
    pub total_restaurants: u32,
    pub total_orders: u32,
    pub total_revenue: f64,
    pub pending_orders: u32,
    pub active_coupons: u32,
    pub recent_orders: Vec<Order>,
}

/// Time window of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReportPeriod {
    #[default]
    Week,
    Month,
    Year,
}

impl ReportPeriod {
    pub const ALL: [ReportPeriod; 3] = [ReportPeriod::Week, ReportPeriod::Month, ReportPeriod::Year];

    /// Length of the window in days.
    pub fn days(self) -> i64 {
        match self {
            ReportPeriod::Week => 7,
            ReportPeriod::Month => 30,
            ReportPeriod::Year => 365,
        }
    }

    pub fn label(self, lang: Language) -> &'static str {
        match self {
            ReportPeriod::Week => lang.pick("Last 7 days", "آخر 7 أيام"),
            ReportPeriod::Month => lang.pick("Last 30 days", "آخر 30 يوما"),
            ReportPeriod::Year => lang.pick("Last 12 months", "آخر 12 شهرا"),
        }
    }

    pub fn next(self) -> Self {
        match self {
            ReportPeriod::Week => ReportPeriod::Month,
            ReportPeriod::Month => ReportPeriod::Year,
            ReportPeriod::Year => ReportPeriod::Week,
        }
    }
}

/// Report request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    pub period: ReportPeriod,
}

/// Revenue contributed by one restaurant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantPerformance {
    pub name: String,
    pub orders: u32,
    pub revenue: f64,
}

/// Orders and revenue of one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub orders: u32,
    pub revenue: f64,
}

/// Sales report over a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub period: ReportPeriod,
    pub revenue: f64,
    pub orders: u32,
    pub new_users: u32,
    pub average_order_value: f64,
    pub top_restaurants: Vec<RestaurantPerformance>,
    pub daily: Vec<DailyPoint>,
}

/// The signed-in administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSession {
    pub email: String,
    pub display_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_user() -> User {
        User {
            id: "u1".to_string(),
            name: "Ali Hassan".to_string(),
            email: "ali@example.com".to_string(),
            phone: "+966500000001".to_string(),
            role: UserRole::Customer,
            status: UserStatus::Active,
            orders_count: 3,
            total_spent: 120.5,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_pagination_total_pages() {
        assert_eq!(Pagination::new(1, 10, 25).total_pages, 3);
        assert_eq!(Pagination::new(1, 10, 30).total_pages, 3);
        assert_eq!(Pagination::new(1, 10, 0).total_pages, 0);
        assert_eq!(Pagination::new(1, 0, 5).limit, 1);
    }

    #[test]
    fn test_pagination_navigation_flags() {
        let p = Pagination::new(2, 10, 25);
        assert!(p.has_next());
        assert!(p.has_prev());
        let last = Pagination::new(3, 10, 25);
        assert!(!last.has_next());
    }

    #[test]
    fn test_list_query_defaults() {
        let q: ListQuery<UserFilters> = ListQuery::default();
        assert_eq!(q.page_or_default(), 1);
        assert_eq!(q.limit_or_default(), DEFAULT_LIMIT);
        let q = q.with_page(0).with_limit(0);
        assert_eq!(q.page_or_default(), 1);
        assert_eq!(q.limit_or_default(), DEFAULT_LIMIT);
    }

    #[test]
    fn test_list_query_serializes_flat() {
        let q = ListQuery::new(UserFilters {
            role: Some(UserRole::Driver),
            status: None,
        })
        .with_search("ali")
        .with_page(2)
        .with_limit(20);
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"role": "driver", "search": "ali", "page": 2, "limit": 20})
        );
    }

    #[test]
    fn test_blank_search_is_dropped() {
        let q = ListQuery::new(UserFilters::default()).with_search("   ");
        assert_eq!(q.search, None);
    }

    #[test]
    fn test_page_serializes_under_collection_name() {
        let page = Page {
            items: vec![sample_user()],
            pagination: Pagination::new(1, 10, 1),
        };
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["users"][0]["id"], "u1");
        assert_eq!(json["users"][0]["ordersCount"], 3);
        assert_eq!(json["pagination"]["totalPages"], 1);
    }

    #[test]
    fn test_user_validation() {
        let mut user = sample_user();
        assert!(user.validate().is_ok());
        user.email = "not-an-email".to_string();
        assert!(user.validate().unwrap_err().contains("valid email"));
        user.email = "a@b.co".to_string();
        user.name = "  ".to_string();
        assert!(user.validate().unwrap_err().contains("name"));
    }

    #[test]
    fn test_user_filters() {
        let user = sample_user();
        assert!(UserFilters::default().matches(&user));
        let drivers = UserFilters {
            role: Some(UserRole::Driver),
            status: None,
        };
        assert!(!drivers.matches(&user));
    }

    #[test]
    fn test_user_status_toggle() {
        assert_eq!(UserStatus::Active.toggled(), UserStatus::Suspended);
        assert_eq!(UserStatus::Suspended.toggled(), UserStatus::Active);
    }

    #[test]
    fn test_order_workflow() {
        assert_eq!(OrderStatus::Pending.advanced(), Some(OrderStatus::Confirmed));
        assert_eq!(OrderStatus::OnTheWay.advanced(), Some(OrderStatus::Delivered));
        assert_eq!(OrderStatus::Delivered.advanced(), None);
        assert_eq!(OrderStatus::Cancelled.advanced(), None);
        assert!(!OrderStatus::Cancelled.is_billable());
    }

    #[test]
    fn test_coupon_validation() {
        let mut coupon = Coupon {
            id: "cp1".to_string(),
            code: "WELCOME10".to_string(),
            discount_type: DiscountType::Percentage,
            discount_value: 10.0,
            min_order: 30.0,
            usage_limit: 100,
            used_count: 4,
            expires_at: Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(),
            is_active: true,
        };
        assert!(coupon.validate().is_ok());
        assert_eq!(coupon.discount_text(), "10%");
        coupon.discount_value = 150.0;
        assert!(coupon.validate().is_err());
        coupon.discount_value = 10.0;
        coupon.code = "welcome".to_string();
        assert!(coupon.validate().is_err());
    }

    #[test]
    fn test_coupon_redeemable() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let coupon = Coupon {
            id: "cp1".to_string(),
            code: "SAVE5".to_string(),
            discount_type: DiscountType::Fixed,
            discount_value: 5.0,
            min_order: 0.0,
            usage_limit: 1,
            used_count: 1,
            expires_at: Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(),
            is_active: true,
        };
        assert!(!coupon.is_redeemable(now));
    }

    #[test]
    fn test_restaurant_rating_range() {
        let r = Restaurant {
            id: "r1".to_string(),
            name: "Al Sham".to_string(),
            name_ar: "الشام".to_string(),
            owner_name: "Omar".to_string(),
            category: "Syrian".to_string(),
            city: "Riyadh".to_string(),
            rating: 5.5,
            status: RestaurantStatus::Open,
            is_featured: false,
            orders_count: 0,
            created_at: Utc::now(),
        };
        assert!(r.validate().is_err());
        assert_eq!(r.display_name(Language::Arabic), "الشام");
    }

    #[test]
    fn test_settings_validation() {
        let mut settings = PlatformSettings::default();
        assert!(settings.validate().is_ok());
        settings.commission_rate = 120.0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_report_period_cycle() {
        assert_eq!(ReportPeriod::Week.next(), ReportPeriod::Month);
        assert_eq!(ReportPeriod::Year.next(), ReportPeriod::Week);
        assert_eq!(ReportPeriod::Month.days(), 30);
    }
}
