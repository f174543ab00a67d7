use axum::extract::{Extension, Path, RawQuery, State};

use crate::app::AppState;
use crate::auth::OwnerIdentity;
use crate::database::Series;
use crate::middleware::{ApiResponse, ApiResult};
use crate::query::{SeriesPage, SeriesParams};

/// GET /series - list the caller's series
///
/// Query: `page`, `limit`, `genre`, `rate` (all optional). Invalid paging
/// falls back to page 1 / limit 10; an unparseable `rate` is ignored. A
/// repeated key takes its first value.
///
/// ```json
/// {
///   "success": true,
///   "data": { "docs": [...], "total": 23, "offset": 10, "limit": 10, "page": 2, "pages": 3 }
/// }
/// ```
pub async fn series_list(
    State(state): State<AppState>,
    Extension(owner): Extension<OwnerIdentity>,
    RawQuery(query): RawQuery,
) -> ApiResult<SeriesPage> {
    let params = SeriesParams::from_query(query.as_deref());
    let page = state.series.build_and_run(&owner, &params).await?;
    Ok(ApiResponse::success(page))
}

/// GET /serie/:id - show one of the caller's series
///
/// Another user's record is reported exactly like a missing one (404).
pub async fn series_get(
    State(state): State<AppState>,
    Extension(owner): Extension<OwnerIdentity>,
    Path(id): Path<String>,
) -> ApiResult<Series> {
    let series = state.series.find_owned(&owner, &id).await?;
    Ok(ApiResponse::success(series))
}
