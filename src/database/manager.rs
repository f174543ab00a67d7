use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from DatabaseManager
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Schema setup failed: {0}")]
    MigrationError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

const CREATE_SERIES_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS "series" (
        "id"         UUID PRIMARY KEY,
        "name"       TEXT NOT NULL,
        "status"     TEXT NOT NULL DEFAULT '',
        "genre"      TEXT NOT NULL DEFAULT '',
        "comments"   TEXT NOT NULL DEFAULT '',
        "rate"       DOUBLE PRECISION NOT NULL DEFAULT 0,
        "user_id"    TEXT NOT NULL,
        "created_at" TIMESTAMPTZ NOT NULL DEFAULT now()
    )
"#;

const CREATE_SERIES_OWNER_INDEX: &str = r#"
    CREATE INDEX IF NOT EXISTS "series_user_id_created_at_idx"
        ON "series" ("user_id", "created_at", "id")
"#;

/// Connection bootstrap for the record store
pub struct DatabaseManager;

impl DatabaseManager {
    /// Open a connection pool sized and bounded by configuration
    pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        let url = config.url.as_deref().ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;

        info!("Connected to database at {}", Self::redacted_url(url)?);
        Ok(pool)
    }

    /// Create the series table and its owner index if missing
    pub async fn ensure_schema(pool: &PgPool) -> Result<(), DatabaseError> {
        for statement in [CREATE_SERIES_TABLE, CREATE_SERIES_OWNER_INDEX] {
            sqlx::query(statement)
                .execute(pool)
                .await
                .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;
        }
        info!("Series schema is up to date");
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    /// Connection URL safe for logs: password removed
    pub fn redacted_url(database_url: &str) -> Result<String, DatabaseError> {
        let mut url = url::Url::parse(database_url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        if url.password().is_some() {
            url.set_password(Some("***")).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        }
        Ok(url.into())
    }
}
