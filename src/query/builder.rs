use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::auth::OwnerIdentity;
use crate::database::models::Series;
use crate::database::store::{DataError, SeriesStore};

use super::scope::{ScopedFilter, SeriesParams, SeriesQuery};

/// One page of a listing plus the numbers needed to page through the rest
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPage {
    pub docs: Vec<Series>,
    pub total: i64,
    pub offset: i64,
    pub limit: i64,
    pub page: i64,
    pub pages: i64,
}

/// Runs owner-scoped lookups against a store, each bounded by a deadline
#[derive(Clone)]
pub struct ScopedQueryBuilder {
    store: Arc<dyn SeriesStore>,
    timeout: Duration,
}

impl std::fmt::Debug for ScopedQueryBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedQueryBuilder").field("timeout", &self.timeout).finish_non_exhaustive()
    }
}

impl ScopedQueryBuilder {
    pub fn new(store: Arc<dyn SeriesStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// List the owner's series matching the raw listing parameters
    pub async fn build_and_run(&self, owner: &OwnerIdentity, params: &SeriesParams) -> Result<SeriesPage, DataError> {
        let query = SeriesQuery::from_params(owner.clone(), params);
        self.run(&query).await
    }

    pub async fn run(&self, query: &SeriesQuery) -> Result<SeriesPage, DataError> {
        let scope = query.scope()?;

        // Page and total are independent reads over the same filter
        let (docs, total) = tokio::try_join!(
            self.bounded("find", self.store.find(&scope)),
            self.bounded("count", self.store.count(&scope)),
        )?;

        ensure_owned(&query.owner, &docs)?;

        let pagination = query.pagination;
        tracing::debug!(
            owner = %query.owner,
            total,
            returned = docs.len(),
            page = pagination.page,
            "Listed series"
        );

        Ok(SeriesPage {
            docs,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
            page: pagination.page,
            pages: pagination.total_pages(total),
        })
    }

    /// Point lookup that only sees the owner's records.
    ///
    /// A malformed id, a missing record and another owner's record are all `NotFound`.
    pub async fn find_owned(&self, owner: &OwnerIdentity, id: &str) -> Result<Series, DataError> {
        let Ok(id) = Uuid::parse_str(id) else {
            tracing::debug!("Invalid series id {:?}", id);
            return Err(DataError::NotFound);
        };

        let scope = ScopedFilter::for_owner(owner)?.record(id)?.window(0, 1)?;
        let series = self
            .bounded("find_one", self.store.find_one(&scope))
            .await?
            .ok_or(DataError::NotFound)?;

        ensure_owned(owner, std::slice::from_ref(&series))?;
        Ok(series)
    }

    pub async fn health(&self) -> Result<(), DataError> {
        self.bounded("health", self.store.health()).await
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = Result<T, DataError>>,
    ) -> Result<T, DataError> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!("Store {} exceeded deadline of {:?}", operation, self.timeout);
                Err(DataError::LookupFailure(format!("{} timed out after {:?}", operation, self.timeout)))
            }
        }
    }
}

/// A store must never hand back another owner's record
fn ensure_owned(owner: &OwnerIdentity, docs: &[Series]) -> Result<(), DataError> {
    if let Some(foreign) = docs.iter().find(|doc| doc.owner != owner.as_str()) {
        tracing::error!(owner = %owner, record = %foreign.id, "Store returned a record outside the owner scope");
        return Err(DataError::LookupFailure("store returned a record outside the owner scope".to_string()));
    }
    Ok(())
}
