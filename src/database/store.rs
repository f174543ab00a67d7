use async_trait::async_trait;
use thiserror::Error;

use crate::database::models::Series;
use crate::filter::FilterError;
use crate::query::ScopedFilter;

/// Data-stage failures. Any of them aborts the whole operation; no partial pages.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DataError {
    #[error("Record lookup failed: {0}")]
    LookupFailure(String),

    #[error("Record could not be decoded: {0}")]
    DecodeFailure(String),

    #[error("Record not found")]
    NotFound,
}

impl From<FilterError> for DataError {
    fn from(err: FilterError) -> Self {
        DataError::LookupFailure(format!("invalid filter: {}", err))
    }
}

/// Read access to the series collection.
///
/// Every method takes a [`ScopedFilter`], so implementations can only be asked
/// for records of a single owner.
#[async_trait]
pub trait SeriesStore: Send + Sync {
    /// Windowed fetch honoring the filter's order, offset and limit
    async fn find(&self, filter: &ScopedFilter) -> Result<Vec<Series>, DataError>;

    /// Number of records matching the filter, ignoring its window
    async fn count(&self, filter: &ScopedFilter) -> Result<i64, DataError>;

    /// First matching record, if any
    async fn find_one(&self, filter: &ScopedFilter) -> Result<Option<Series>, DataError>;

    async fn health(&self) -> Result<(), DataError>;
}
