//! Consumer-side query state.
//!
//! A [`Query`] belongs to one screen and tracks the key it currently shows.
//! Responses for any other key, or for a fetch the query is no longer
//! waiting on, are ignored.

use tracing::debug;

use super::{CacheStatus, FetchPlan, QueryKey, Ticket};
use crate::api::ApiError;

/// Lifecycle of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// Nothing requested yet.
    Idle,
    Loading,
    Success,
    Error,
}

/// `{data, isLoading, error}` for one screen.
#[derive(Debug, Clone)]
pub struct Query<T> {
    key: Option<QueryKey>,
    awaiting: Option<Ticket>,
    data: Option<T>,
    error: Option<ApiError>,
    status: QueryStatus,
    source: CacheStatus,
    /// Bumped each time new data is applied.
    revision: u64,
}

impl<T> Default for Query<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Query<T> {
    pub fn new() -> Self {
        Self {
            key: None,
            awaiting: None,
            data: None,
            error: None,
            status: QueryStatus::Idle,
            source: CacheStatus::Fresh,
            revision: 0,
        }
    }

    /// The key whose data this query shows.
    pub fn key(&self) -> Option<&QueryKey> {
        self.key.as_ref()
    }

    /// Switch to `key` and follow the cache's plan for it.
    pub fn start(&mut self, key: QueryKey, plan: FetchPlan<T>) {
        debug!(key = %key, "Query started");
        self.key = Some(key);
        match plan {
            FetchPlan::Cached(data) => {
                self.awaiting = None;
                self.store(data, CacheStatus::FromCache);
            }
            FetchPlan::Join(ticket) | FetchPlan::Fetch(ticket) => {
                self.awaiting = Some(ticket);
                self.status = QueryStatus::Loading;
            }
        }
    }

    /// Apply a response. Returns false if it was for a stale key or ticket
    /// and has been ignored.
    pub fn apply(&mut self, key: &QueryKey, ticket: Ticket, result: Result<T, ApiError>) -> bool {
        if self.key.as_ref() != Some(key) || self.awaiting != Some(ticket) {
            debug!(key = %key, ticket = %ticket, "Ignoring stale response");
            return false;
        }
        self.awaiting = None;
        match result {
            Ok(data) => self.store(data, CacheStatus::Fresh),
            Err(e) => {
                self.data = None;
                self.error = Some(e);
                self.status = QueryStatus::Error;
                self.revision += 1;
            }
        }
        true
    }

    fn store(&mut self, data: T, source: CacheStatus) {
        self.data = Some(data);
        self.error = None;
        self.status = QueryStatus::Success;
        self.source = source;
        self.revision += 1;
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    pub fn status(&self) -> QueryStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Loading
    }

    /// Where the current data came from.
    pub fn source(&self) -> CacheStatus {
        self.source
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Forget the key so the next refresh starts from scratch.
    pub fn reset(&mut self) {
        *self = Self {
            revision: self.revision + 1,
            ..Self::new()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::QueryCache;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Params {
        page: u32,
    }

    fn key(page: u32) -> QueryKey {
        QueryKey::new("users", &Params { page })
    }

    #[test]
    fn test_late_response_for_previous_key_is_ignored() {
        let mut cache: QueryCache<&str> = QueryCache::default();
        let mut query: Query<&str> = Query::new();

        let k1 = key(1);
        let plan = cache.begin(&k1);
        let t1 = plan.ticket().unwrap();
        query.start(k1.clone(), plan);

        let k2 = key(2);
        let plan = cache.begin(&k2);
        let t2 = plan.ticket().unwrap();
        query.start(k2.clone(), plan);

        // Page 2 resolves first, then the slow page 1 response lands.
        assert!(cache.resolve::<ApiError>(&k2, t2, &Ok("page two")));
        assert!(query.apply(&k2, t2, Ok("page two")));
        assert!(cache.resolve::<ApiError>(&k1, t1, &Ok("page one")));
        assert!(!query.apply(&k1, t1, Ok("page one")));

        assert_eq!(query.data(), Some(&"page two"));
        assert_eq!(query.key(), Some(&k2));
        assert_eq!(query.status(), QueryStatus::Success);
    }

    #[test]
    fn test_cached_plan_is_immediate() {
        let mut query: Query<u32> = Query::new();
        query.start(key(1), FetchPlan::Cached(5));
        assert_eq!(query.data(), Some(&5));
        assert_eq!(query.source(), CacheStatus::FromCache);
        assert!(!query.is_loading());
    }

    #[test]
    fn test_switching_to_cached_key_drops_pending_response() {
        let mut query: Query<u32> = Query::new();
        query.start(key(2), FetchPlan::Fetch(Ticket::new(9)));
        query.start(key(1), FetchPlan::Cached(1));
        assert!(!query.apply(&key(2), Ticket::new(9), Ok(2)));
        assert_eq!(query.data(), Some(&1));
    }

    #[test]
    fn test_response_for_old_ticket_of_same_key_is_ignored() {
        let mut query: Query<u32> = Query::new();
        query.start(key(1), FetchPlan::Fetch(Ticket::new(1)));
        query.start(key(1), FetchPlan::Fetch(Ticket::new(2)));
        assert!(!query.apply(&key(1), Ticket::new(1), Ok(10)));
        assert!(query.is_loading());
        assert!(query.apply(&key(1), Ticket::new(2), Ok(20)));
        assert_eq!(query.data(), Some(&20));
    }

    #[test]
    fn test_error_clears_data() {
        let mut query: Query<u32> = Query::new();
        query.start(key(1), FetchPlan::Cached(1));
        query.start(key(2), FetchPlan::Fetch(Ticket::new(3)));
        assert!(query.apply(&key(2), Ticket::new(3), Err(ApiError::Timeout(100))));
        assert_eq!(query.status(), QueryStatus::Error);
        assert!(query.data().is_none());
        assert_eq!(query.error(), Some(&ApiError::Timeout(100)));
    }

    #[test]
    fn test_revision_advances_on_new_data() {
        let mut query: Query<u32> = Query::new();
        let before = query.revision();
        query.start(key(1), FetchPlan::Cached(1));
        assert!(query.revision() > before);
        let after_data = query.revision();
        query.reset();
        assert!(query.revision() > after_data);
        assert_eq!(query.status(), QueryStatus::Idle);
    }
}
