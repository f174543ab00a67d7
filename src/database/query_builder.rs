use sqlx::{postgres::{PgArguments, PgRow}, PgPool, Postgres, Row};

use crate::filter::{FilterValue, SqlResult};

/// Runs rendered filter SQL against a pool. Rows are returned undecoded so
/// callers can tell lookup failures apart from decode failures.
pub struct QueryBuilder<'a> {
    pool: &'a PgPool,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn select_all(&self, sql_result: &SqlResult) -> Result<Vec<PgRow>, sqlx::Error> {
        let q = bind_params(sqlx::query(&sql_result.query), &sql_result.params);
        q.fetch_all(self.pool).await
    }

    pub async fn select_optional(&self, sql_result: &SqlResult) -> Result<Option<PgRow>, sqlx::Error> {
        let q = bind_params(sqlx::query(&sql_result.query), &sql_result.params);
        q.fetch_optional(self.pool).await
    }

    pub async fn count(&self, sql_result: &SqlResult) -> Result<i64, sqlx::Error> {
        let q = bind_params(sqlx::query(&sql_result.query), &sql_result.params);
        let row = q.fetch_one(self.pool).await?;
        row.try_get("count")
    }
}

fn bind_params<'q>(
    mut q: sqlx::query::Query<'q, Postgres, PgArguments>,
    params: &'q [FilterValue],
) -> sqlx::query::Query<'q, Postgres, PgArguments> {
    for p in params {
        q = match p {
            FilterValue::Text(s) => q.bind(s.as_str()),
            FilterValue::Float(f) => q.bind(*f),
            FilterValue::Uuid(u) => q.bind(*u),
        };
    }
    q
}
