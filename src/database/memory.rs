use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::database::models::Series;
use crate::database::store::{DataError, SeriesStore};
use crate::filter::Filter;
use crate::query::ScopedFilter;

/// In-process document collection implementing [`SeriesStore`].
///
/// Documents are kept in storage layout and decoded on every read, so a
/// malformed document surfaces as [`DataError::DecodeFailure`] just like a bad
/// row would. Cloning shares the underlying collection.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: Arc<RwLock<Vec<Value>>>,
    unavailable: Arc<AtomicBool>,
    latency: Option<Duration>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every read, e.g. to exercise query deadlines
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make every read fail with a lookup failure until reset
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn insert(&self, series: &Series) {
        self.insert_document(series.to_document()).await;
    }

    /// Insert a raw storage document without validating it
    pub async fn insert_document(&self, document: Value) {
        self.documents.write().await.push(document);
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    async fn ready(&self) -> Result<(), DataError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DataError::LookupFailure("memory store unavailable".to_string()));
        }
        Ok(())
    }

    /// Matching documents in filter order, window applied
    async fn select(&self, filter: &Filter) -> Vec<Value> {
        let mut matched: Vec<Value> = {
            let documents = self.documents.read().await;
            documents.iter().filter(|doc| filter.matches(doc)).cloned().collect()
        };
        matched.sort_by(|a, b| filter.compare(a, b));

        let offset = filter.offset_value().map(to_usize).unwrap_or(0);
        let limit = filter.limit_value().map(to_usize).unwrap_or(usize::MAX);
        matched.into_iter().skip(offset).take(limit).collect()
    }
}

fn to_usize(n: i64) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}

fn decode(document: Value) -> Result<Series, DataError> {
    serde_json::from_value(document).map_err(|e| DataError::DecodeFailure(e.to_string()))
}

#[async_trait]
impl SeriesStore for MemoryStore {
    async fn find(&self, filter: &ScopedFilter) -> Result<Vec<Series>, DataError> {
        self.ready().await?;
        self.select(filter.filter()).await.into_iter().map(decode).collect()
    }

    async fn count(&self, filter: &ScopedFilter) -> Result<i64, DataError> {
        self.ready().await?;
        let documents = self.documents.read().await;
        let count = documents.iter().filter(|doc| filter.filter().matches(doc)).count();
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }

    async fn find_one(&self, filter: &ScopedFilter) -> Result<Option<Series>, DataError> {
        self.ready().await?;
        self.select(filter.filter()).await.into_iter().next().map(decode).transpose()
    }

    async fn health(&self) -> Result<(), DataError> {
        self.ready().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::OwnerIdentity;

    async fn store_with(owner: &str, n: usize) -> MemoryStore {
        let store = MemoryStore::new();
        for i in 0..n {
            let mut series = Series::new(owner, format!("S{}", i), "watching", "drama", 3.0);
            series.created_at = chrono::DateTime::from_timestamp(1_700_000_000 + i as i64, 0).unwrap();
            store.insert(&series).await;
        }
        store
    }

    #[tokio::test]
    async fn window_is_applied_after_ordering() {
        let store = store_with("u1", 5).await;
        let scope = ScopedFilter::for_owner(&OwnerIdentity::new("u1")).unwrap().window(3, 10).unwrap();

        let found = store.find(&scope).await.unwrap();
        let names: Vec<_> = found.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["S3", "S4"]);
        assert_eq!(store.count(&scope).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn count_only_sees_owner() {
        let store = store_with("u1", 3).await;
        store.insert(&Series::new("u2", "Other", "done", "drama", 3.0)).await;
        assert_eq!(store.len().await, 4);

        let scope = ScopedFilter::for_owner(&OwnerIdentity::new("u2")).unwrap();
        assert_eq!(store.count(&scope).await.unwrap(), 1);
        let found = store.find(&scope).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].owner, "u2");
    }

    #[tokio::test]
    async fn malformed_document_is_decode_failure() {
        let store = MemoryStore::new();
        assert!(store.is_empty().await);
        store.insert_document(serde_json::json!({ "user_id": "u1", "name": "no id" })).await;

        let scope = ScopedFilter::for_owner(&OwnerIdentity::new("u1")).unwrap();
        assert!(matches!(store.find(&scope).await, Err(DataError::DecodeFailure(_))));
        assert!(matches!(store.find_one(&scope).await, Err(DataError::DecodeFailure(_))));
        // counting does not decode
        assert_eq!(store.count(&scope).await.unwrap(), 1);
    }
}
