use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::FromRow;
use uuid::Uuid;

/// Table / collection holding series records
pub const SERIES_TABLE: &str = "series";

/// Storage column names shared by the SQL and document stores
pub mod columns {
    pub const ID: &str = "id";
    pub const OWNER: &str = "user_id";
    pub const GENRE: &str = "genre";
    pub const RATE: &str = "rate";
    pub const CREATED_AT: &str = "created_at";
}

/// A catalog entry owned by exactly one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Series {
    pub id: Uuid,
    pub name: String,
    pub status: String,
    pub genre: String,
    #[serde(default)]
    pub comments: String,
    pub rate: f64,
    #[serde(rename = "user", alias = "user_id")]
    #[sqlx(rename = "user_id")]
    pub owner: String,
    #[serde(rename = "createdAt", alias = "created_at")]
    pub created_at: DateTime<Utc>,
}

impl Series {
    pub fn new(
        owner: impl Into<String>,
        name: impl Into<String>,
        status: impl Into<String>,
        genre: impl Into<String>,
        rate: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            status: status.into(),
            genre: genre.into(),
            comments: String::new(),
            rate,
            owner: owner.into(),
            // stores keep microsecond precision
            created_at: Utc::now().trunc_subsecs(6),
        }
    }

    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = comments.into();
        self
    }

    /// Storage-layout document (column names, fixed-width timestamps)
    pub fn to_document(&self) -> Value {
        json!({
            (columns::ID): self.id,
            "name": self.name,
            "status": self.status,
            (columns::GENRE): self.genre,
            "comments": self.comments,
            (columns::RATE): self.rate,
            (columns::OWNER): self.owner,
            (columns::CREATED_AT): self.created_at.to_rfc3339_opts(SecondsFormat::Micros, true),
        })
    }
}
