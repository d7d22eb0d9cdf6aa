//! Request-keyed query caching.
//!
//! This module keeps fetched results in memory, keyed by the request that
//! produced them. Features include:
//! - Configurable TTL (time-to-live)
//! - Coalescing of concurrent fetches for the same key
//! - Tickets that identify which fetch a response belongs to, so late
//!   responses for superseded fetches can be dropped
//! - Per-resource invalidation after mutations

mod query;

pub use query::{Query, QueryStatus};

use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, trace};

/// Default cache TTL in seconds.
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 60;

/// Cache status indicating data freshness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// Data was freshly fetched from the API.
    Fresh,
    /// Data was served from cache (still valid).
    FromCache,
}

impl CacheStatus {
    /// Get the display icon for the cache status.
    pub fn icon(&self) -> &'static str {
        match self {
            CacheStatus::Fresh => "●",
            CacheStatus::FromCache => "○",
        }
    }
}

/// Identity of one distinct request: the resource plus every parameter
/// (filters, search, page, limit) in serialized form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    resource: &'static str,
    params: String,
}

impl QueryKey {
    /// Build a key from serializable request parameters.
    pub fn new(resource: &'static str, params: &impl Serialize) -> Self {
        let params = serde_json::to_string(params).unwrap_or_default();
        Self { resource, params }
    }

    /// Key for a request without parameters.
    pub fn bare(resource: &'static str) -> Self {
        Self {
            resource,
            params: String::new(),
        }
    }

    pub fn resource(&self) -> &'static str {
        self.resource
    }

    pub fn params(&self) -> &str {
        &self.params
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.params.is_empty() {
            write!(f, "{}", self.resource)
        } else {
            write!(f, "{}?{}", self.resource, self.params)
        }
    }
}

/// Identifies one fetch. Responses carry the ticket they were issued with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

impl Ticket {
    /// Ticket with an explicit number, for requests built outside a cache.
    pub fn new(n: u64) -> Self {
        Self(n)
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A cache entry with metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The cached data.
    pub data: T,
    /// When the entry was cached.
    pub cached_at: Instant,
}

impl<T> CacheEntry<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Instant::now(),
        }
    }

    /// Check if the entry is older than `ttl`.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.age() >= ttl
    }

    /// Get the age of the cache entry.
    pub fn age(&self) -> Duration {
        self.cached_at.elapsed()
    }
}

/// What the caller should do to obtain data for a key.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchPlan<T> {
    /// A valid cached value exists.
    Cached(T),
    /// A fetch for this key is already running; wait for its ticket.
    Join(Ticket),
    /// Start a new fetch and resolve it with this ticket.
    Fetch(Ticket),
}

impl<T> FetchPlan<T> {
    /// The ticket to wait for, if any.
    pub fn ticket(&self) -> Option<Ticket> {
        match self {
            FetchPlan::Cached(_) => None,
            FetchPlan::Join(t) | FetchPlan::Fetch(t) => Some(*t),
        }
    }
}

/// Cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Requests answered from a valid entry.
    pub hits: u64,
    /// Requests that started a fetch.
    pub misses: u64,
    /// Requests that joined a fetch already in flight.
    pub coalesced: u64,
    /// Responses dropped because their fetch was superseded.
    pub superseded: u64,
    /// Entries currently stored.
    pub entries: usize,
}

/// In-memory query cache.
///
/// At most one fetch per key is in flight at a time. A response is stored
/// only if it carries the ticket of the fetch currently in flight for its
/// key; invalidation forgets in-flight fetches so their responses are
/// dropped when they arrive.
#[derive(Debug)]
pub struct QueryCache<T> {
    ttl: Duration,
    entries: HashMap<QueryKey, CacheEntry<T>>,
    in_flight: HashMap<QueryKey, Ticket>,
    next_ticket: u64,
    stats: CacheStats,
}

impl<T: Clone> Default for QueryCache<T> {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_CACHE_TTL_SECONDS))
    }
}

impl<T: Clone> QueryCache<T> {
    /// Create a cache whose entries stay valid for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
            in_flight: HashMap::new(),
            next_ticket: 1,
            stats: CacheStats::default(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn issue(&mut self, key: &QueryKey) -> Ticket {
        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        self.in_flight.insert(key.clone(), ticket);
        self.stats.misses += 1;
        debug!(key = %key, ticket = %ticket, "Starting fetch");
        ticket
    }

    /// Decide how to obtain data for `key`.
    pub fn begin(&mut self, key: &QueryKey) -> FetchPlan<T> {
        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired(self.ttl) {
                self.stats.hits += 1;
                trace!(key = %key, "Cache hit");
                return FetchPlan::Cached(entry.data.clone());
            }
        }
        self.begin_fetch(key)
    }

    /// Like [`begin`](Self::begin) but ignores any cached value.
    pub fn begin_fetch(&mut self, key: &QueryKey) -> FetchPlan<T> {
        if let Some(ticket) = self.in_flight.get(key) {
            self.stats.coalesced += 1;
            trace!(key = %key, ticket = %ticket, "Joining in-flight fetch");
            return FetchPlan::Join(*ticket);
        }
        FetchPlan::Fetch(self.issue(key))
    }

    /// Record the outcome of the fetch identified by `ticket`.
    ///
    /// Returns false when the fetch was superseded, in which case nothing is
    /// stored and the response should be dropped.
    pub fn resolve<E>(&mut self, key: &QueryKey, ticket: Ticket, result: &Result<T, E>) -> bool {
        if self.in_flight.get(key) != Some(&ticket) {
            self.stats.superseded += 1;
            debug!(key = %key, ticket = %ticket, "Dropping superseded response");
            return false;
        }
        self.in_flight.remove(key);
        if let Ok(data) = result {
            self.entries.insert(key.clone(), CacheEntry::new(data.clone()));
        }
        true
    }

    /// The cached value for `key`, even if expired.
    pub fn peek(&self, key: &QueryKey) -> Option<&T> {
        self.entries.get(key).map(|e| &e.data)
    }

    pub fn is_in_flight(&self, key: &QueryKey) -> bool {
        self.in_flight.contains_key(key)
    }

    /// Forget every entry and in-flight fetch of `resource`.
    pub fn invalidate(&mut self, resource: &str) {
        let before = self.entries.len();
        self.entries.retain(|k, _| k.resource != resource);
        self.in_flight.retain(|k, _| k.resource != resource);
        debug!(
            resource,
            removed = before - self.entries.len(),
            "Invalidated cached queries"
        );
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.in_flight.clear();
        debug!("Cleared query cache");
    }

    /// Remove expired entries.
    pub fn prune(&mut self) {
        let ttl = self.ttl;
        self.entries.retain(|_, e| !e.is_expired(ttl));
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            ..self.stats
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Params {
        page: u32,
        search: Option<&'static str>,
    }

    fn key(page: u32) -> QueryKey {
        QueryKey::new("users", &Params { page, search: None })
    }

    #[test]
    fn test_query_key_identity() {
        assert_eq!(key(1), key(1));
        assert_ne!(key(1), key(2));
        assert_ne!(
            QueryKey::new("users", &Params { page: 1, search: None }),
            QueryKey::new("orders", &Params { page: 1, search: None })
        );
        assert_eq!(key(1).to_string(), r#"users?{"page":1,"search":null}"#);
        assert_eq!(QueryKey::bare("settings").to_string(), "settings");
    }

    #[test]
    fn test_cache_status_icon() {
        assert_eq!(CacheStatus::Fresh.icon(), "●");
        assert_eq!(CacheStatus::FromCache.icon(), "○");
    }

    #[test]
    fn test_first_request_fetches_then_hits() {
        let mut cache: QueryCache<u32> = QueryCache::default();
        let ticket = match cache.begin(&key(1)) {
            FetchPlan::Fetch(t) => t,
            other => panic!("Expected Fetch, got {:?}", other),
        };
        assert!(cache.resolve::<()>(&key(1), ticket, &Ok(7)));
        assert_eq!(cache.begin(&key(1)), FetchPlan::Cached(7));
        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
    }

    #[test]
    fn test_concurrent_requests_are_coalesced() {
        let mut cache: QueryCache<u32> = QueryCache::default();
        let first = cache.begin(&key(1));
        let second = cache.begin(&key(1));
        assert!(matches!(first, FetchPlan::Fetch(_)));
        assert_eq!(second, FetchPlan::Join(first.ticket().unwrap()));
        assert_eq!(cache.stats().coalesced, 1);
    }

    #[test]
    fn test_different_keys_fetch_independently() {
        let mut cache: QueryCache<u32> = QueryCache::default();
        let a = cache.begin(&key(1)).ticket().unwrap();
        let b = cache.begin(&key(2)).ticket().unwrap();
        assert_ne!(a, b);
        assert!(cache.is_in_flight(&key(1)));
        assert!(cache.is_in_flight(&key(2)));
    }

    #[test]
    fn test_errors_are_not_cached() {
        let mut cache: QueryCache<u32> = QueryCache::default();
        let ticket = cache.begin(&key(1)).ticket().unwrap();
        assert!(cache.resolve(&key(1), ticket, &Err("boom")));
        assert!(cache.peek(&key(1)).is_none());
        assert!(matches!(cache.begin(&key(1)), FetchPlan::Fetch(_)));
    }

    #[test]
    fn test_invalidate_drops_entries_and_in_flight() {
        let mut cache: QueryCache<u32> = QueryCache::default();
        let t1 = cache.begin(&key(1)).ticket().unwrap();
        cache.resolve::<()>(&key(1), t1, &Ok(1));
        let t2 = cache.begin(&key(2)).ticket().unwrap();
        let other = QueryKey::bare("settings");
        let t3 = cache.begin(&other).ticket().unwrap();
        cache.resolve::<()>(&other, t3, &Ok(3));

        cache.invalidate("users");

        assert!(cache.peek(&key(1)).is_none());
        assert_eq!(cache.peek(&other), Some(&3));
        // The response of the forgotten fetch is dropped.
        assert!(!cache.resolve::<()>(&key(2), t2, &Ok(2)));
        assert!(cache.peek(&key(2)).is_none());
        assert_eq!(cache.stats().superseded, 1);
    }

    #[test]
    fn test_refetch_after_invalidate_supersedes_old_ticket() {
        let mut cache: QueryCache<u32> = QueryCache::default();
        let old = cache.begin(&key(1)).ticket().unwrap();
        cache.invalidate("users");
        let new = cache.begin(&key(1)).ticket().unwrap();
        assert_ne!(old, new);

        assert!(cache.resolve::<()>(&key(1), new, &Ok(20)));
        assert!(!cache.resolve::<()>(&key(1), old, &Ok(10)));
        assert_eq!(cache.peek(&key(1)), Some(&20));
    }

    #[test]
    fn test_zero_ttl_never_hits() {
        let mut cache: QueryCache<u32> = QueryCache::new(Duration::ZERO);
        let t = cache.begin(&key(1)).ticket().unwrap();
        cache.resolve::<()>(&key(1), t, &Ok(1));
        assert!(matches!(cache.begin(&key(1)), FetchPlan::Fetch(_)));
        cache.prune();
        assert_eq!(cache.stats().entries, 0);
    }

    #[test]
    fn test_begin_fetch_ignores_valid_entry() {
        let mut cache: QueryCache<u32> = QueryCache::default();
        let t = cache.begin(&key(1)).ticket().unwrap();
        cache.resolve::<()>(&key(1), t, &Ok(1));
        assert!(matches!(cache.begin_fetch(&key(1)), FetchPlan::Fetch(_)));
        // Still coalesces with itself.
        assert!(matches!(cache.begin_fetch(&key(1)), FetchPlan::Join(_)));
    }

    #[test]
    fn test_cache_entry_age() {
        let entry = CacheEntry::new("test");
        assert!(!entry.is_expired(Duration::from_secs(60)));
        assert!(entry.age() < Duration::from_secs(5));
    }
}
