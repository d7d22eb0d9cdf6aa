//! Async task management for non-blocking API operations.
//!
//! This module provides a way to execute async operations in background tasks
//! while keeping the UI responsive. It uses tokio channels to communicate
//! results back to the main event loop.
//!
//! # Architecture
//!
//! The task system follows a simple pattern:
//! 1. A screen asks for data or submits a change
//! 2. Instead of awaiting inline, the app spawns a background task via `TaskSpawner`
//! 3. The main loop continues rendering and handling events
//! 4. When the task completes, it sends an `ApiMessage` through the channel
//! 5. The main loop polls the channel with `try_recv()` and handles results
//!
//! Query results carry the key and ticket they were requested with, so the
//! main loop can drop responses that arrive after the screen moved on.

use tokio::sync::mpsc;
use tracing::debug;

use crate::api::types::{
    AdminSession, Category, CategoryFilters, Coupon, CouponFilters, DashboardStats, Order,
    OrderFilters, OrderStatus, PlatformSettings, Report, ReportQuery, Restaurant,
    RestaurantFilters, RestaurantStatus, User, UserFilters, UserStatus,
};
use crate::api::{ApiError, ListQuery, Page, SouqClient};
use crate::app::Route;
use crate::cache::{QueryKey, Ticket};

/// A read request, one variant per fetch function.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryRequest {
    Users(ListQuery<UserFilters>),
    Restaurants(ListQuery<RestaurantFilters>),
    Orders(ListQuery<OrderFilters>),
    Categories(ListQuery<CategoryFilters>),
    Coupons(ListQuery<CouponFilters>),
    Dashboard,
    Report(ReportQuery),
    Settings,
}

impl QueryRequest {
    /// Resource name used for cache keys and invalidation.
    pub fn resource(&self) -> &'static str {
        match self {
            QueryRequest::Users(_) => "users",
            QueryRequest::Restaurants(_) => "restaurants",
            QueryRequest::Orders(_) => "orders",
            QueryRequest::Categories(_) => "categories",
            QueryRequest::Coupons(_) => "coupons",
            QueryRequest::Dashboard => "dashboard",
            QueryRequest::Report(_) => "reports",
            QueryRequest::Settings => "settings",
        }
    }

    /// The cache key identifying this request.
    pub fn key(&self) -> QueryKey {
        let resource = self.resource();
        match self {
            QueryRequest::Users(q) => QueryKey::new(resource, q),
            QueryRequest::Restaurants(q) => QueryKey::new(resource, q),
            QueryRequest::Orders(q) => QueryKey::new(resource, q),
            QueryRequest::Categories(q) => QueryKey::new(resource, q),
            QueryRequest::Coupons(q) => QueryKey::new(resource, q),
            QueryRequest::Report(q) => QueryKey::new(resource, q),
            QueryRequest::Dashboard | QueryRequest::Settings => QueryKey::bare(resource),
        }
    }

    async fn run(self, client: &SouqClient) -> Result<QueryData, ApiError> {
        Ok(match self {
            QueryRequest::Users(q) => QueryData::Users(client.list_users(&q).await?),
            QueryRequest::Restaurants(q) => {
                QueryData::Restaurants(client.list_restaurants(&q).await?)
            }
            QueryRequest::Orders(q) => QueryData::Orders(client.list_orders(&q).await?),
            QueryRequest::Categories(q) => QueryData::Categories(client.list_categories(&q).await?),
            QueryRequest::Coupons(q) => QueryData::Coupons(client.list_coupons(&q).await?),
            QueryRequest::Dashboard => QueryData::Dashboard(client.get_dashboard_stats().await?),
            QueryRequest::Report(q) => QueryData::Report(client.get_report(q).await?),
            QueryRequest::Settings => QueryData::Settings(client.get_settings().await?),
        })
    }
}

/// A fetched response, one variant per fetch function.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryData {
    Users(Page<User>),
    Restaurants(Page<Restaurant>),
    Orders(Page<Order>),
    Categories(Page<Category>),
    Coupons(Page<Coupon>),
    Dashboard(DashboardStats),
    Report(Report),
    Settings(PlatformSettings),
}

/// What a mutation did, for the confirmation toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Created,
    Updated,
    Deleted,
    StatusChanged,
    SettingsSaved,
}

/// A write request.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    CreateUser(User),
    UpdateUser(String, User),
    DeleteUser(String),
    SetUserStatus(String, UserStatus),
    CreateRestaurant(Restaurant),
    UpdateRestaurant(String, Restaurant),
    DeleteRestaurant(String),
    SetRestaurantStatus(String, RestaurantStatus),
    CreateOrder(Order),
    UpdateOrder(String, Order),
    DeleteOrder(String),
    SetOrderStatus(String, OrderStatus),
    CreateCategory(Category),
    UpdateCategory(String, Category),
    DeleteCategory(String),
    ToggleCategory(String),
    CreateCoupon(Coupon),
    UpdateCoupon(String, Coupon),
    DeleteCoupon(String),
    ToggleCoupon(String),
    UpdateSettings(PlatformSettings),
}

impl Mutation {
    /// Resource whose cached queries become stale on success.
    pub fn resource(&self) -> &'static str {
        use Mutation::*;
        match self {
            CreateUser(_) | UpdateUser(..) | DeleteUser(_) | SetUserStatus(..) => "users",
            CreateRestaurant(_)
            | UpdateRestaurant(..)
            | DeleteRestaurant(_)
            | SetRestaurantStatus(..) => "restaurants",
            CreateOrder(_) | UpdateOrder(..) | DeleteOrder(_) | SetOrderStatus(..) => "orders",
            CreateCategory(_) | UpdateCategory(..) | DeleteCategory(_) | ToggleCategory(_) => {
                "categories"
            }
            CreateCoupon(_) | UpdateCoupon(..) | DeleteCoupon(_) | ToggleCoupon(_) => "coupons",
            UpdateSettings(_) => "settings",
        }
    }

    pub fn kind(&self) -> MutationKind {
        use Mutation::*;
        match self {
            CreateUser(_) | CreateRestaurant(_) | CreateOrder(_) | CreateCategory(_)
            | CreateCoupon(_) => MutationKind::Created,
            UpdateUser(..) | UpdateRestaurant(..) | UpdateOrder(..) | UpdateCategory(..)
            | UpdateCoupon(..) => MutationKind::Updated,
            DeleteUser(_) | DeleteRestaurant(_) | DeleteOrder(_) | DeleteCategory(_)
            | DeleteCoupon(_) => MutationKind::Deleted,
            SetUserStatus(..) | SetRestaurantStatus(..) | SetOrderStatus(..)
            | ToggleCategory(_) | ToggleCoupon(_) => MutationKind::StatusChanged,
            UpdateSettings(_) => MutationKind::SettingsSaved,
        }
    }

    async fn run(self, client: &SouqClient) -> Result<(), ApiError> {
        use Mutation::*;
        match self {
            CreateUser(u) => client.create_user(u).await.map(drop),
            UpdateUser(id, u) => client.update_user(&id, u).await.map(drop),
            DeleteUser(id) => client.delete_user(&id).await,
            SetUserStatus(id, s) => client.set_user_status(&id, s).await.map(drop),
            CreateRestaurant(r) => client.create_restaurant(r).await.map(drop),
            UpdateRestaurant(id, r) => client.update_restaurant(&id, r).await.map(drop),
            DeleteRestaurant(id) => client.delete_restaurant(&id).await,
            SetRestaurantStatus(id, s) => client.set_restaurant_status(&id, s).await.map(drop),
            CreateOrder(o) => client.create_order(o).await.map(drop),
            UpdateOrder(id, o) => client.update_order(&id, o).await.map(drop),
            DeleteOrder(id) => client.delete_order(&id).await,
            SetOrderStatus(id, s) => client.set_order_status(&id, s).await.map(drop),
            CreateCategory(c) => client.create_category(c).await.map(drop),
            UpdateCategory(id, c) => client.update_category(&id, c).await.map(drop),
            DeleteCategory(id) => client.delete_category(&id).await,
            ToggleCategory(id) => client.toggle_category(&id).await.map(drop),
            CreateCoupon(c) => client.create_coupon(c).await.map(drop),
            UpdateCoupon(id, c) => client.update_coupon(&id, c).await.map(drop),
            DeleteCoupon(id) => client.delete_coupon(&id).await,
            ToggleCoupon(id) => client.toggle_coupon(&id).await.map(drop),
            UpdateSettings(s) => client.update_settings(s).await.map(drop),
        }
    }
}

/// Messages sent from background tasks to the main event loop.
///
/// Each variant represents the result of an async operation. The main loop
/// matches on these to update application state appropriately.
#[derive(Debug)]
pub enum ApiMessage {
    /// Sign-in result
    LoggedIn(Result<AdminSession, ApiError>),

    /// A query finished
    QueryResolved {
        key: QueryKey,
        ticket: Ticket,
        result: Result<QueryData, ApiError>,
    },

    /// A mutation finished
    MutationResolved {
        /// Page that submitted the mutation.
        origin: Route,
        resource: &'static str,
        kind: MutationKind,
        result: Result<(), ApiError>,
    },
}

/// Spawns background tasks for async operations.
///
/// This struct holds a channel sender and provides methods to spawn
/// various types of async operations. Each method clones the necessary
/// data and spawns a tokio task that sends its result through the channel.
#[derive(Clone)]
pub struct TaskSpawner {
    tx: mpsc::UnboundedSender<ApiMessage>,
}

impl TaskSpawner {
    /// Create a new TaskSpawner with the given channel sender.
    pub fn new(tx: mpsc::UnboundedSender<ApiMessage>) -> Self {
        Self { tx }
    }

    /// Spawn a task to check admin credentials.
    pub fn spawn_login(&self, client: &SouqClient, email: String, password: String) {
        let tx = self.tx.clone();
        let client = client.clone();
        tokio::spawn(async move {
            let result = client.login(&email, &password).await;
            let _ = tx.send(ApiMessage::LoggedIn(result));
        });
    }

    /// Spawn a task to run `request`, answering under `key` and `ticket`.
    pub fn spawn_query(
        &self,
        client: &SouqClient,
        key: QueryKey,
        ticket: Ticket,
        request: QueryRequest,
    ) {
        let tx = self.tx.clone();
        let client = client.clone();
        debug!(key = %key, ticket = %ticket, "Spawning query");
        tokio::spawn(async move {
            let result = request.run(&client).await;
            let _ = tx.send(ApiMessage::QueryResolved {
                key,
                ticket,
                result,
            });
        });
    }

    /// Spawn a task to apply `mutation` submitted from `origin`.
    pub fn spawn_mutation(&self, client: &SouqClient, origin: Route, mutation: Mutation) {
        let tx = self.tx.clone();
        let client = client.clone();
        let resource = mutation.resource();
        let kind = mutation.kind();
        debug!(resource, ?kind, ?origin, "Spawning mutation");
        tokio::spawn(async move {
            let result = mutation.run(&client).await;
            let _ = tx.send(ApiMessage::MutationResolved {
                origin,
                resource,
                kind,
                result,
            });
        });
    }
}

/// Create a new task channel and spawner.
///
/// Returns a tuple of (receiver, spawner). The receiver should be polled
/// in the main event loop, and the spawner should be used to spawn tasks.
pub fn create_task_channel() -> (mpsc::UnboundedReceiver<ApiMessage>, TaskSpawner) {
    let (tx, rx) = mpsc::unbounded_channel();
    (rx, TaskSpawner::new(tx))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::api::ClientOptions;
    use crate::cache::{Query, QueryCache};

    fn instant_client() -> SouqClient {
        SouqClient::seeded(ClientOptions::default().instant())
    }

    #[test]
    fn test_request_keys_differ_by_page() {
        let p1 = QueryRequest::Users(ListQuery::default().with_page(1));
        let p2 = QueryRequest::Users(ListQuery::default().with_page(2));
        assert_ne!(p1.key(), p2.key());
        assert_eq!(p1.key(), p1.clone().key());
        assert_eq!(p1.key().resource(), "users");
        assert_eq!(QueryRequest::Settings.key().resource(), "settings");
    }

    #[test]
    fn test_mutation_metadata() {
        let m = Mutation::ToggleCoupon("cp1".to_string());
        assert_eq!(m.resource(), "coupons");
        assert_eq!(m.kind(), MutationKind::StatusChanged);
        let m = Mutation::DeleteOrder("o1".to_string());
        assert_eq!(m.kind(), MutationKind::Deleted);
    }

    #[tokio::test]
    async fn test_spawn_query_reports_key_and_ticket() {
        let (mut rx, spawner) = create_task_channel();
        let client = instant_client();
        let request = QueryRequest::Categories(ListQuery::default());
        let key = request.key();
        spawner.spawn_query(&client, key.clone(), Ticket::new(4), request);

        match rx.recv().await {
            Some(ApiMessage::QueryResolved {
                key: got,
                ticket,
                result: Ok(QueryData::Categories(page)),
            }) => {
                assert_eq!(got, key);
                assert_eq!(ticket, Ticket::new(4));
                assert_eq!(page.pagination.total, 8);
            }
            other => panic!("Expected categories, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_spawn_login_failure() {
        let (mut rx, spawner) = create_task_channel();
        spawner.spawn_login(&instant_client(), "nobody@example.com".into(), "x".into());
        assert!(matches!(
            rx.recv().await,
            Some(ApiMessage::LoggedIn(Err(ApiError::Unauthorized)))
        ));
    }

    #[tokio::test]
    async fn test_spawn_mutation_reports_resource() {
        let (mut rx, spawner) = create_task_channel();
        let client = instant_client();
        let id = client.repositories().categories.all().await[0].id.clone();
        spawner.spawn_mutation(&client, Route::Categories, Mutation::ToggleCategory(id));
        match rx.recv().await {
            Some(ApiMessage::MutationResolved {
                origin,
                resource,
                kind,
                result,
            }) => {
                assert_eq!(origin, Route::Categories);
                assert_eq!(resource, "categories");
                assert_eq!(kind, MutationKind::StatusChanged);
                assert!(result.is_ok());
            }
            other => panic!("Expected mutation result, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failed_mutation_is_reported() {
        let (mut rx, spawner) = create_task_channel();
        spawner.spawn_mutation(
            &instant_client(),
            Route::Users,
            Mutation::DeleteUser("u9999".to_string()),
        );
        assert!(matches!(
            rx.recv().await,
            Some(ApiMessage::MutationResolved {
                result: Err(ApiError::NotFound(_)),
                ..
            })
        ));
    }

    /// Page 1 is slow, page 2 is fast; the user flips to page 2 before page 1
    /// answers. The screen must end up showing page 2.
    #[tokio::test(start_paused = true)]
    async fn test_overlapping_fetches_keep_latest_page() {
        let (mut rx, spawner) = create_task_channel();
        let slow = SouqClient::seeded(
            ClientOptions::default().with_latency(Duration::from_millis(800)),
        );
        let fast = SouqClient::new(
            slow.repositories().clone(),
            ClientOptions::default().with_latency(Duration::from_millis(300)),
        );

        let mut cache: QueryCache<QueryData> = QueryCache::default();
        let mut query: Query<QueryData> = Query::new();

        let page1 = QueryRequest::Users(ListQuery::default().with_page(1));
        let k1 = page1.key();
        let plan = cache.begin(&k1);
        let t1 = plan.ticket().unwrap();
        query.start(k1.clone(), plan);
        spawner.spawn_query(&slow, k1, t1, page1);

        let page2 = QueryRequest::Users(ListQuery::default().with_page(2));
        let k2 = page2.key();
        let plan = cache.begin(&k2);
        let t2 = plan.ticket().unwrap();
        query.start(k2.clone(), plan);
        spawner.spawn_query(&fast, k2.clone(), t2, page2);

        let mut arrivals = Vec::new();
        for _ in 0..2 {
            if let Some(ApiMessage::QueryResolved { key, ticket, result }) = rx.recv().await {
                arrivals.push(ticket);
                if cache.resolve(&key, ticket, &result) {
                    query.apply(&key, ticket, result);
                }
            }
        }

        assert_eq!(arrivals, vec![t2, t1]);
        assert_eq!(query.key(), Some(&k2));
        match query.data() {
            Some(QueryData::Users(page)) => assert_eq!(page.pagination.page, 2),
            other => panic!("Expected users page 2, got {:?}", other),
        }
    }
}
