//! Owner-scoped, paginated series lookups.
//!
//! Raw request parameters become a [`SeriesQuery`], which renders to a
//! [`ScopedFilter`]: a store filter that always carries the owner equality.
//! [`ScopedQueryBuilder`] runs it against a [`SeriesStore`](crate::database::SeriesStore).

pub mod builder;
pub mod pagination;
pub mod scope;

pub use builder::{ScopedQueryBuilder, SeriesPage};
pub use pagination::{Pagination, DEFAULT_LIMIT, DEFAULT_PAGE};
pub use scope::{ScopedFilter, SeriesParams, SeriesQuery};
