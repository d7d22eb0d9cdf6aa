//! In-memory record repositories.
//!
//! Each resource has exactly one [`Repository`], created when the client is
//! built and shared behind an `Arc`. Writes are last-write-wins: there is no
//! version check between a read and a later replace.

use std::fmt::Debug;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::trace;

/// A record stored in a repository.
pub trait Record: Clone + Debug + Serialize + Send + Sync + 'static {
    /// Name of the collection in list responses (`"users"`).
    const COLLECTION: &'static str;
    /// Prefix of generated ids (`"u"` gives `u1`, `u2`, ...).
    const ID_PREFIX: &'static str;
    /// Resource-specific list filters.
    type Filters: RecordFilter<Self>;

    fn id(&self) -> &str;

    fn assign_id(&mut self, id: String);

    /// Server-side search over the record's text fields.
    ///
    /// `needle_lower` is already lower-cased.
    fn matches_search(&self, needle_lower: &str) -> bool;

    /// Check the record before it is stored.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Resource-specific list filter.
pub trait RecordFilter<T>: Clone + Debug + Default + Serialize + Send + Sync + 'static {
    fn matches(&self, record: &T) -> bool;
}

#[derive(Debug)]
struct Store<T> {
    rows: Vec<T>,
    next_id: u64,
}

/// Ordered in-memory collection of one record type.
#[derive(Debug)]
pub struct Repository<T> {
    store: RwLock<Store<T>>,
}

impl<T: Record> Default for Repository<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T: Record> Repository<T> {
    /// Create a repository holding `rows`, newest first.
    ///
    /// Generated ids continue after the highest numeric id already present.
    pub fn new(rows: Vec<T>) -> Self {
        let next_id = rows
            .iter()
            .filter_map(|r| r.id().strip_prefix(T::ID_PREFIX)?.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        Self {
            store: RwLock::new(Store { rows, next_id }),
        }
    }

    /// Snapshot of every record.
    pub async fn all(&self) -> Vec<T> {
        self.store.read().await.rows.clone()
    }

    /// Records accepted by `predicate`, in storage order.
    pub async fn filtered(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        self.store
            .read()
            .await
            .rows
            .iter()
            .filter(|r| predicate(r))
            .cloned()
            .collect()
    }

    pub async fn get(&self, id: &str) -> Option<T> {
        self.store.read().await.rows.iter().find(|r| r.id() == id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Insert a record at the front with a freshly generated id.
    pub async fn insert(&self, mut record: T) -> T {
        let mut store = self.store.write().await;
        let id = format!("{}{}", T::ID_PREFIX, store.next_id);
        store.next_id += 1;
        record.assign_id(id);
        trace!(collection = T::COLLECTION, id = record.id(), "Inserted record");
        store.rows.insert(0, record.clone());
        record
    }

    /// Replace the record with `id`, keeping its position and id.
    pub async fn replace(&self, id: &str, mut record: T) -> Option<T> {
        let mut store = self.store.write().await;
        let slot = store.rows.iter_mut().find(|r| r.id() == id)?;
        record.assign_id(id.to_string());
        *slot = record.clone();
        trace!(collection = T::COLLECTION, id, "Replaced record");
        Some(record)
    }

    /// Apply `change` to a copy of the record with `id` and store it if
    /// `change` succeeds.
    pub async fn update_with<E>(
        &self,
        id: &str,
        change: impl FnOnce(&mut T) -> Result<(), E>,
    ) -> Option<Result<T, E>> {
        let mut store = self.store.write().await;
        let slot = store.rows.iter_mut().find(|r| r.id() == id)?;
        let mut updated = slot.clone();
        if let Err(e) = change(&mut updated) {
            return Some(Err(e));
        }
        *slot = updated.clone();
        trace!(collection = T::COLLECTION, id, "Updated record");
        Some(Ok(updated))
    }

    /// Remove the record with `id`. Returns false if it did not exist.
    pub async fn remove(&self, id: &str) -> bool {
        let mut store = self.store.write().await;
        let before = store.rows.len();
        store.rows.retain(|r| r.id() != id);
        let removed = store.rows.len() != before;
        if removed {
            trace!(collection = T::COLLECTION, id, "Removed record");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{Category, CategoryFilters};

    fn category(id: &str, name: &str) -> Category {
        Category {
            id: id.to_string(),
            name: name.to_string(),
            name_ar: String::new(),
            description: String::new(),
            restaurants_count: 0,
            is_active: true,
            sort_order: 0,
        }
    }

    #[test]
    fn test_insert_generates_ids_after_existing() {
        let repo = Repository::new(vec![category("c7", "Pizza"), category("c2", "Burgers")]);
        let created = tokio_test::block_on(repo.insert(category("", "Sushi")));
        assert_eq!(created.id, "c8");
        let all = tokio_test::block_on(repo.all());
        assert_eq!(all[0].name, "Sushi");
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_replace_is_last_write_wins() {
        let repo = Repository::new(vec![category("c1", "Pizza")]);
        let stale = repo.get("c1").await.unwrap();

        let mut first = stale.clone();
        first.name = "Pizza & Pasta".to_string();
        repo.replace("c1", first).await.unwrap();

        let mut second = stale;
        second.description = "Italian".to_string();
        repo.replace("c1", second).await.unwrap();

        let stored = repo.get("c1").await.unwrap();
        assert_eq!(stored.name, "Pizza");
        assert_eq!(stored.description, "Italian");
    }

    #[tokio::test]
    async fn test_replace_missing_returns_none() {
        let repo: Repository<Category> = Repository::default();
        assert!(repo.replace("c1", category("c1", "x")).await.is_none());
    }

    #[tokio::test]
    async fn test_update_with_failure_leaves_record_unchanged() {
        let repo = Repository::new(vec![category("c1", "Pizza")]);
        let result = repo
            .update_with("c1", |c| {
                c.name.clear();
                Err::<(), _>("rejected")
            })
            .await;
        assert_eq!(result, Some(Err("rejected")));
        assert_eq!(repo.get("c1").await.unwrap().name, "Pizza");
    }

    #[tokio::test]
    async fn test_remove() {
        let repo = Repository::new(vec![category("c1", "Pizza"), category("c2", "Burgers")]);
        assert!(repo.remove("c1").await);
        assert!(!repo.remove("c1").await);
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_filtered_keeps_order() {
        let mut inactive = category("c2", "Burgers");
        inactive.is_active = false;
        let repo = Repository::new(vec![category("c1", "Pizza"), inactive, category("c3", "Sushi")]);
        let filters = CategoryFilters { is_active: Some(true) };
        let active = repo.filtered(|c| filters.matches(c)).await;
        let names: Vec<_> = active.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Pizza", "Sushi"]);
    }
}
