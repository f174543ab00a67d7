use async_trait::async_trait;
use sqlx::{postgres::PgRow, FromRow, PgPool};

use crate::database::manager::DatabaseManager;
use crate::database::models::Series;
use crate::database::query_builder::QueryBuilder;
use crate::database::store::{DataError, SeriesStore};
use crate::query::ScopedFilter;

/// PostgreSQL-backed series store
#[derive(Debug, Clone)]
pub struct SeriesRepository {
    pool: PgPool,
}

impl SeriesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn lookup_failure(err: sqlx::Error) -> DataError {
    DataError::LookupFailure(err.to_string())
}

fn decode_row(row: &PgRow) -> Result<Series, DataError> {
    Series::from_row(row).map_err(|e| DataError::DecodeFailure(e.to_string()))
}

#[async_trait]
impl SeriesStore for SeriesRepository {
    async fn find(&self, filter: &ScopedFilter) -> Result<Vec<Series>, DataError> {
        let sql = filter.filter().to_sql();
        tracing::debug!(owner = %filter.owner(), "series find: {}", sql.query);
        let rows = QueryBuilder::new(&self.pool).select_all(&sql).await.map_err(lookup_failure)?;
        rows.iter().map(decode_row).collect()
    }

    async fn count(&self, filter: &ScopedFilter) -> Result<i64, DataError> {
        let sql = filter.filter().to_count_sql();
        tracing::debug!(owner = %filter.owner(), "series count: {}", sql.query);
        QueryBuilder::new(&self.pool).count(&sql).await.map_err(lookup_failure)
    }

    async fn find_one(&self, filter: &ScopedFilter) -> Result<Option<Series>, DataError> {
        let sql = filter.filter().to_sql();
        let row = QueryBuilder::new(&self.pool).select_optional(&sql).await.map_err(lookup_failure)?;
        row.as_ref().map(decode_row).transpose()
    }

    async fn health(&self) -> Result<(), DataError> {
        DatabaseManager::health_check(&self.pool)
            .await
            .map_err(|e| DataError::LookupFailure(e.to_string()))
    }
}
