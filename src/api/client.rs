//! Marketplace API client.
//!
//! The client answers every request from in-memory repositories after an
//! artificial network delay, so the dashboard behaves the way it would
//! against a real backend: responses arrive late, out of order, and may
//! time out.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use rand::Rng;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use super::error::{ApiError, Result};
use super::repository::{Record, RecordFilter, Repository};
use super::seed::{self, Fixtures};
use super::types::{
    AdminSession, Category, CategoryFilters, Coupon, CouponFilters, DailyPoint, DashboardStats,
    ListQuery, Order, OrderFilters, OrderStatus, Page, Pagination, PlatformSettings, Report,
    ReportQuery, Restaurant, RestaurantFilters, RestaurantPerformance, RestaurantStatus, User,
    UserFilters, UserStatus,
};
use crate::config::Settings;

/// Number of orders shown on the dashboard.
const RECENT_ORDERS: usize = 5;

/// Number of restaurants in a report's ranking.
const TOP_RESTAURANTS: usize = 5;

/// Behaviour of the simulated network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// Where real requests would go. Only logged.
    pub base_url: String,
    /// Shortest simulated round trip.
    pub min_latency: Duration,
    /// Longest simulated round trip.
    pub max_latency: Duration,
    /// Requests slower than this fail with [`ApiError::Timeout`].
    pub timeout: Duration,
    /// Credentials accepted by [`SouqClient::login`].
    pub admin_email: String,
    pub admin_password: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl ClientOptions {
    /// Build options from application settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            base_url: settings.api_base_url.clone(),
            min_latency: Duration::from_millis(settings.min_latency_ms),
            max_latency: Duration::from_millis(settings.max_latency_ms),
            timeout: Duration::from_millis(settings.api_timeout_ms),
            admin_email: settings.admin_email.clone(),
            admin_password: settings.admin_password.clone(),
        }
    }

    /// No artificial delay.
    pub fn instant(mut self) -> Self {
        self.min_latency = Duration::ZERO;
        self.max_latency = Duration::ZERO;
        self
    }

    /// Fixed artificial delay.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.min_latency = latency;
        self.max_latency = latency;
        self
    }
}

/// One repository per resource.
#[derive(Debug, Clone, Default)]
pub struct Repositories {
    pub users: Arc<Repository<User>>,
    pub restaurants: Arc<Repository<Restaurant>>,
    pub orders: Arc<Repository<Order>>,
    pub categories: Arc<Repository<Category>>,
    pub coupons: Arc<Repository<Coupon>>,
    pub settings: Arc<RwLock<PlatformSettings>>,
}

impl Repositories {
    pub fn from_fixtures(fixtures: Fixtures) -> Self {
        Self {
            users: Arc::new(Repository::new(fixtures.users)),
            restaurants: Arc::new(Repository::new(fixtures.restaurants)),
            orders: Arc::new(Repository::new(fixtures.orders)),
            categories: Arc::new(Repository::new(fixtures.categories)),
            coupons: Arc::new(Repository::new(fixtures.coupons)),
            settings: Arc::new(RwLock::new(fixtures.settings)),
        }
    }
}

/// Slice one page out of an already filtered collection.
pub fn paginate<T>(items: Vec<T>, page: u32, limit: u32) -> Page<T> {
    let page = page.max(1);
    let limit = limit.max(1);
    let total = items.len() as u32;
    let start = ((page - 1) as usize).saturating_mul(limit as usize);
    let items = items.into_iter().skip(start).take(limit as usize).collect();
    Page {
        items,
        pagination: Pagination::new(page, limit, total),
    }
}

/// The marketplace API client.
///
/// Cheap to clone; clones share the same repositories.
#[derive(Debug, Clone)]
pub struct SouqClient {
    repos: Repositories,
    options: ClientOptions,
}

impl SouqClient {
    /// Create a client over the given repositories.
    pub fn new(repos: Repositories, options: ClientOptions) -> Self {
        info!(base_url = %options.base_url, "Creating marketplace client");
        Self { repos, options }
    }

    /// Create a client over freshly generated fixture data.
    pub fn seeded(options: ClientOptions) -> Self {
        Self::new(
            Repositories::from_fixtures(seed::generate(Utc::now())),
            options,
        )
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn repositories(&self) -> &Repositories {
        &self.repos
    }

    fn pick_latency(&self) -> Duration {
        let min = self.options.min_latency;
        let max = self.options.max_latency.max(min);
        if max.is_zero() {
            return Duration::ZERO;
        }
        let (min_ms, max_ms) = (min.as_millis() as u64, max.as_millis() as u64);
        Duration::from_millis(rand::rng().random_range(min_ms..=max_ms))
    }

    /// Run `work` after the simulated round trip, bounded by the timeout.
    async fn call<T>(&self, op: &'static str, work: impl Future<Output = Result<T>>) -> Result<T> {
        let latency = self.pick_latency();
        let timeout = self.options.timeout;
        let request = async {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            work.await
        };
        match tokio::time::timeout(timeout, request).await {
            Ok(result) => {
                if let Err(e) = &result {
                    debug!(op, error = %e, "Request failed");
                }
                result
            }
            Err(_) => {
                warn!(op, timeout_ms = timeout.as_millis() as u64, "Request timed out");
                Err(ApiError::Timeout(timeout.as_millis() as u64))
            }
        }
    }

    async fn list<T: Record>(repo: &Repository<T>, query: &ListQuery<T::Filters>) -> Page<T> {
        let needle = query
            .search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());
        let matched = repo
            .filtered(|r| {
                query.filters.matches(r) && needle.as_deref().map_or(true, |n| r.matches_search(n))
            })
            .await;
        paginate(matched, query.page_or_default(), query.limit_or_default())
    }

    async fn get<T: Record>(repo: &Repository<T>, id: &str) -> Result<T> {
        repo.get(id)
            .await
            .ok_or_else(|| ApiError::NotFound(format!("{} {}", T::COLLECTION, id)))
    }

    async fn create<T: Record>(repo: &Repository<T>, record: T) -> Result<T> {
        record.validate().map_err(ApiError::Validation)?;
        let created = repo.insert(record).await;
        info!(collection = T::COLLECTION, id = created.id(), "Created record");
        Ok(created)
    }

    async fn update<T: Record>(repo: &Repository<T>, id: &str, record: T) -> Result<T> {
        record.validate().map_err(ApiError::Validation)?;
        let updated = repo
            .replace(id, record)
            .await
            .ok_or_else(|| ApiError::NotFound(format!("{} {}", T::COLLECTION, id)))?;
        info!(collection = T::COLLECTION, id, "Updated record");
        Ok(updated)
    }

    async fn delete<T: Record>(repo: &Repository<T>, id: &str) -> Result<()> {
        if repo.remove(id).await {
            info!(collection = T::COLLECTION, id, "Deleted record");
            Ok(())
        } else {
            Err(ApiError::NotFound(format!("{} {}", T::COLLECTION, id)))
        }
    }

    async fn modify<T: Record>(
        repo: &Repository<T>,
        id: &str,
        change: impl FnOnce(&mut T) -> Result<()>,
    ) -> Result<T> {
        repo.update_with(id, |record| {
            change(record)?;
            record.validate().map_err(ApiError::Validation)
        })
        .await
        .unwrap_or_else(|| Err(ApiError::NotFound(format!("{} {}", T::COLLECTION, id))))
    }

    // ========================================================================
    // Session
    // ========================================================================

    /// Check admin credentials.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AdminSession> {
        self.call("login", async {
            let email_ok = email.trim().eq_ignore_ascii_case(&self.options.admin_email);
            if !email_ok || password != self.options.admin_password {
                warn!("Rejected admin credentials");
                return Err(ApiError::Unauthorized);
            }
            let display_name = email
                .split('@')
                .next()
                .filter(|s| !s.is_empty())
                .unwrap_or("admin")
                .to_string();
            info!("Admin signed in");
            Ok(AdminSession {
                email: email.trim().to_lowercase(),
                display_name,
            })
        })
        .await
    }

    // ========================================================================
    // Users
    // ========================================================================

    #[instrument(skip(self))]
    pub async fn list_users(&self, query: &ListQuery<UserFilters>) -> Result<Page<User>> {
        self.call("list_users", async { Ok(Self::list(&self.repos.users, query).await) })
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, id: &str) -> Result<User> {
        self.call("get_user", Self::get(&self.repos.users, id)).await
    }

    async fn ensure_unique_email(&self, email: &str, except_id: Option<&str>) -> Result<()> {
        let taken = self
            .repos
            .users
            .filtered(|u| u.email.eq_ignore_ascii_case(email.trim()) && Some(u.id.as_str()) != except_id)
            .await;
        if taken.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(format!("email '{}' is already registered", email)))
        }
    }

    #[instrument(skip(self, user), fields(name = %user.name))]
    pub async fn create_user(&self, user: User) -> Result<User> {
        self.call("create_user", async {
            self.ensure_unique_email(&user.email, None).await?;
            Self::create(&self.repos.users, user).await
        })
        .await
    }

    #[instrument(skip(self, user))]
    pub async fn update_user(&self, id: &str, user: User) -> Result<User> {
        self.call("update_user", async {
            self.ensure_unique_email(&user.email, Some(id)).await?;
            Self::update(&self.repos.users, id, user).await
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: &str) -> Result<()> {
        self.call("delete_user", Self::delete(&self.repos.users, id)).await
    }

    #[instrument(skip(self))]
    pub async fn set_user_status(&self, id: &str, status: UserStatus) -> Result<User> {
        self.call(
            "set_user_status",
            Self::modify(&self.repos.users, id, |u| {
                u.status = status;
                Ok(())
            }),
        )
        .await
    }

    // ========================================================================
    // Restaurants
    // ========================================================================

    #[instrument(skip(self))]
    pub async fn list_restaurants(
        &self,
        query: &ListQuery<RestaurantFilters>,
    ) -> Result<Page<Restaurant>> {
        self.call("list_restaurants", async {
            Ok(Self::list(&self.repos.restaurants, query).await)
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_restaurant(&self, id: &str) -> Result<Restaurant> {
        self.call("get_restaurant", Self::get(&self.repos.restaurants, id))
            .await
    }

    #[instrument(skip(self, restaurant), fields(name = %restaurant.name))]
    pub async fn create_restaurant(&self, restaurant: Restaurant) -> Result<Restaurant> {
        self.call(
            "create_restaurant",
            Self::create(&self.repos.restaurants, restaurant),
        )
        .await
    }

    #[instrument(skip(self, restaurant))]
    pub async fn update_restaurant(&self, id: &str, restaurant: Restaurant) -> Result<Restaurant> {
        self.call(
            "update_restaurant",
            Self::update(&self.repos.restaurants, id, restaurant),
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn delete_restaurant(&self, id: &str) -> Result<()> {
        self.call("delete_restaurant", Self::delete(&self.repos.restaurants, id))
            .await
    }

    #[instrument(skip(self))]
    pub async fn set_restaurant_status(
        &self,
        id: &str,
        status: RestaurantStatus,
    ) -> Result<Restaurant> {
        self.call(
            "set_restaurant_status",
            Self::modify(&self.repos.restaurants, id, |r| {
                r.status = status;
                Ok(())
            }),
        )
        .await
    }

    // ========================================================================
    // Orders
    // ========================================================================

    #[instrument(skip(self))]
    pub async fn list_orders(&self, query: &ListQuery<OrderFilters>) -> Result<Page<Order>> {
        self.call("list_orders", async { Ok(Self::list(&self.repos.orders, query).await) })
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_order(&self, id: &str) -> Result<Order> {
        self.call("get_order", Self::get(&self.repos.orders, id)).await
    }

    #[instrument(skip(self, order))]
    pub async fn create_order(&self, mut order: Order) -> Result<Order> {
        self.call("create_order", async {
            if order.order_number.trim().is_empty() {
                let next = 1001 + self.repos.orders.len().await;
                order.order_number = format!("ORD-{}", next);
            }
            Self::create(&self.repos.orders, order).await
        })
        .await
    }

    #[instrument(skip(self, order))]
    pub async fn update_order(&self, id: &str, order: Order) -> Result<Order> {
        self.call("update_order", Self::update(&self.repos.orders, id, order))
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete_order(&self, id: &str) -> Result<()> {
        self.call("delete_order", Self::delete(&self.repos.orders, id)).await
    }

    /// Move an order to `status`. Finished orders cannot change.
    #[instrument(skip(self))]
    pub async fn set_order_status(&self, id: &str, status: OrderStatus) -> Result<Order> {
        self.call(
            "set_order_status",
            Self::modify(&self.repos.orders, id, |o| {
                if matches!(o.status, OrderStatus::Delivered | OrderStatus::Cancelled)
                    && o.status != status
                {
                    return Err(ApiError::Validation(format!(
                        "order {} is already {:?} and cannot change",
                        o.order_number, o.status
                    )));
                }
                o.status = status;
                Ok(())
            }),
        )
        .await
    }

    // ========================================================================
    // Categories
    // ========================================================================

    #[instrument(skip(self))]
    pub async fn list_categories(
        &self,
        query: &ListQuery<CategoryFilters>,
    ) -> Result<Page<Category>> {
        self.call("list_categories", async {
            Ok(Self::list(&self.repos.categories, query).await)
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_category(&self, id: &str) -> Result<Category> {
        self.call("get_category", Self::get(&self.repos.categories, id))
            .await
    }

    #[instrument(skip(self, category), fields(name = %category.name))]
    pub async fn create_category(&self, category: Category) -> Result<Category> {
        self.call("create_category", Self::create(&self.repos.categories, category))
            .await
    }

    #[instrument(skip(self, category))]
    pub async fn update_category(&self, id: &str, category: Category) -> Result<Category> {
        self.call(
            "update_category",
            Self::update(&self.repos.categories, id, category),
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: &str) -> Result<()> {
        self.call("delete_category", Self::delete(&self.repos.categories, id))
            .await
    }

    #[instrument(skip(self))]
    pub async fn toggle_category(&self, id: &str) -> Result<Category> {
        self.call(
            "toggle_category",
            Self::modify(&self.repos.categories, id, |c| {
                c.is_active = !c.is_active;
                Ok(())
            }),
        )
        .await
    }

    // ========================================================================
    // Coupons
    // ========================================================================

    #[instrument(skip(self))]
    pub async fn list_coupons(&self, query: &ListQuery<CouponFilters>) -> Result<Page<Coupon>> {
        self.call("list_coupons", async { Ok(Self::list(&self.repos.coupons, query).await) })
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_coupon(&self, id: &str) -> Result<Coupon> {
        self.call("get_coupon", Self::get(&self.repos.coupons, id)).await
    }

    async fn ensure_unique_code(&self, code: &str, except_id: Option<&str>) -> Result<()> {
        let taken = self
            .repos
            .coupons
            .filtered(|c| c.code == code && Some(c.id.as_str()) != except_id)
            .await;
        if taken.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(format!("coupon code '{}' already exists", code)))
        }
    }

    #[instrument(skip(self, coupon), fields(code = %coupon.code))]
    pub async fn create_coupon(&self, coupon: Coupon) -> Result<Coupon> {
        self.call("create_coupon", async {
            self.ensure_unique_code(&coupon.code, None).await?;
            Self::create(&self.repos.coupons, coupon).await
        })
        .await
    }

    #[instrument(skip(self, coupon))]
    pub async fn update_coupon(&self, id: &str, coupon: Coupon) -> Result<Coupon> {
        self.call("update_coupon", async {
            self.ensure_unique_code(&coupon.code, Some(id)).await?;
            Self::update(&self.repos.coupons, id, coupon).await
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn delete_coupon(&self, id: &str) -> Result<()> {
        self.call("delete_coupon", Self::delete(&self.repos.coupons, id)).await
    }

    #[instrument(skip(self))]
    pub async fn toggle_coupon(&self, id: &str) -> Result<Coupon> {
        self.call(
            "toggle_coupon",
            Self::modify(&self.repos.coupons, id, |c| {
                c.is_active = !c.is_active;
                Ok(())
            }),
        )
        .await
    }

    // ========================================================================
    // Settings, dashboard and reports
    // ========================================================================

    #[instrument(skip(self))]
    pub async fn get_settings(&self) -> Result<PlatformSettings> {
        self.call("get_settings", async {
            Ok(self.repos.settings.read().await.clone())
        })
        .await
    }

    #[instrument(skip(self, settings))]
    pub async fn update_settings(&self, settings: PlatformSettings) -> Result<PlatformSettings> {
        self.call("update_settings", async {
            settings.validate().map_err(ApiError::Validation)?;
            *self.repos.settings.write().await = settings.clone();
            info!("Updated platform settings");
            Ok(settings)
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_dashboard_stats(&self) -> Result<DashboardStats> {
        self.call("get_dashboard_stats", async {
            let now = Utc::now();
            let orders = self.repos.orders.all().await;
            let active_coupons = self
                .repos
                .coupons
                .filtered(|c| c.is_redeemable(now))
                .await
                .len();
            Ok(DashboardStats {
                total_users: self.repos.users.len().await as u32,
                total_restaurants: self.repos.restaurants.len().await as u32,
                total_orders: orders.len() as u32,
                total_revenue: orders
                    .iter()
                    .filter(|o| o.status.is_billable())
                    .map(|o| o.total)
                    .sum(),
                pending_orders: orders
                    .iter()
                    .filter(|o| o.status == OrderStatus::Pending)
                    .count() as u32,
                active_coupons: active_coupons as u32,
                recent_orders: orders.into_iter().take(RECENT_ORDERS).collect(),
            })
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_report(&self, query: ReportQuery) -> Result<Report> {
        self.call("get_report", async {
            let now = Utc::now();
            let since = now - ChronoDuration::days(query.period.days());
            let orders = self
                .repos
                .orders
                .filtered(|o| o.created_at > since && o.status.is_billable())
                .await;
            let new_users = self.repos.users.filtered(|u| u.created_at > since).await.len();

            let revenue: f64 = orders.iter().map(|o| o.total).sum();
            let average_order_value = if orders.is_empty() {
                0.0
            } else {
                revenue / orders.len() as f64
            };

            let mut by_restaurant: HashMap<&str, (u32, f64)> = HashMap::new();
            for o in &orders {
                let entry = by_restaurant.entry(o.restaurant_name.as_str()).or_default();
                entry.0 += 1;
                entry.1 += o.total;
            }
            let mut top_restaurants: Vec<RestaurantPerformance> = by_restaurant
                .into_iter()
                .map(|(name, (orders, revenue))| RestaurantPerformance {
                    name: name.to_string(),
                    orders,
                    revenue,
                })
                .collect();
            top_restaurants.sort_by(|a, b| {
                b.revenue
                    .total_cmp(&a.revenue)
                    .then_with(|| a.name.cmp(&b.name))
            });
            top_restaurants.truncate(TOP_RESTAURANTS);

            let today = now.date_naive();
            let daily = (0..query.period.days())
                .rev()
                .map(|back| {
                    let date = today - ChronoDuration::days(back);
                    let day: Vec<&Order> = orders
                        .iter()
                        .filter(|o| o.created_at.date_naive() == date)
                        .collect();
                    DailyPoint {
                        date,
                        orders: day.len() as u32,
                        revenue: day.iter().map(|o| o.total).sum(),
                    }
                })
                .collect();

            Ok(Report {
                period: query.period,
                revenue,
                orders: orders.len() as u32,
                new_users: new_users as u32,
                average_order_value,
                top_restaurants,
                daily,
            })
        })
        .await
    }
}
