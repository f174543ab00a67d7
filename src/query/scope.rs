use uuid::Uuid;

use crate::auth::OwnerIdentity;
use crate::database::models::{columns, SERIES_TABLE};
use crate::filter::{Filter, FilterError, SortDirection};

use super::pagination::Pagination;

/// Untrusted listing parameters as they arrive on the query string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeriesParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub genre: Option<String>,
    pub rate: Option<String>,
}

impl SeriesParams {
    /// Parse a raw query string. Never fails: the first occurrence of a key
    /// wins and unknown keys are ignored.
    pub fn from_query(raw: Option<&str>) -> Self {
        let mut params = Self::default();
        for (key, value) in url::form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
            let slot = match key.as_ref() {
                "page" => &mut params.page,
                "limit" => &mut params.limit,
                "genre" => &mut params.genre,
                "rate" => &mut params.rate,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        params
    }
}

/// Sanitized listing request for one owner
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesQuery {
    pub owner: OwnerIdentity,
    pub genre: Option<String>,
    pub rate: Option<f64>,
    pub pagination: Pagination,
}

impl SeriesQuery {
    /// Lenient: bad paging falls back to defaults, an empty genre or unparseable rate is dropped.
    pub fn from_params(owner: OwnerIdentity, params: &SeriesParams) -> Self {
        let genre = params.genre.as_deref().filter(|g| !g.is_empty()).map(str::to_string);

        let rate = params.rate.as_deref().and_then(|raw| match raw.parse::<f64>() {
            Ok(rate) if rate.is_finite() => Some(rate),
            _ => {
                if !raw.is_empty() {
                    tracing::debug!("Ignoring unparseable rate filter {:?}", raw);
                }
                None
            }
        });

        Self {
            owner,
            genre,
            rate,
            pagination: Pagination::resolve(params.page.as_deref(), params.limit.as_deref()),
        }
    }

    pub fn scope(&self) -> Result<ScopedFilter, FilterError> {
        let mut scope = ScopedFilter::for_owner(&self.owner)?;
        if let Some(genre) = &self.genre {
            scope = scope.genre(genre)?;
        }
        if let Some(rate) = self.rate {
            scope = scope.rate(rate)?;
        }
        scope.window(self.pagination.offset, self.pagination.limit)
    }
}

/// A series filter that always constrains on one owner.
///
/// The owner condition is added on construction and there is no way to remove
/// it, which is what keeps one user's records out of another user's results.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopedFilter {
    owner: OwnerIdentity,
    filter: Filter,
}

impl ScopedFilter {
    /// Owner-only filter, ordered oldest first with id as tiebreak
    pub fn for_owner(owner: &OwnerIdentity) -> Result<Self, FilterError> {
        let mut filter = Filter::new(SERIES_TABLE)?;
        filter
            .where_eq(columns::OWNER, owner.as_str())?
            .order(columns::CREATED_AT, SortDirection::Asc)?
            .order(columns::ID, SortDirection::Asc)?;
        Ok(Self { owner: owner.clone(), filter })
    }

    pub fn genre(mut self, genre: &str) -> Result<Self, FilterError> {
        self.filter.where_eq(columns::GENRE, genre)?;
        Ok(self)
    }

    pub fn rate(mut self, rate: f64) -> Result<Self, FilterError> {
        self.filter.where_eq(columns::RATE, rate)?;
        Ok(self)
    }

    pub fn record(mut self, id: Uuid) -> Result<Self, FilterError> {
        self.filter.where_eq(columns::ID, id)?;
        Ok(self)
    }

    pub fn window(mut self, offset: i64, limit: i64) -> Result<Self, FilterError> {
        self.filter.limit(limit, Some(offset))?;
        Ok(self)
    }

    pub fn owner(&self) -> &OwnerIdentity {
        &self.owner
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterValue;

    fn params(page: &str, limit: &str, genre: &str, rate: &str) -> SeriesParams {
        let opt = |s: &str| if s.is_empty() { None } else { Some(s.to_string()) };
        SeriesParams { page: opt(page), limit: opt(limit), genre: opt(genre), rate: opt(rate) }
    }

    #[test]
    fn query_string_keeps_first_value_per_key() {
        let p = SeriesParams::from_query(Some("page=2&page=3&limit=5&rate=4.5&rate=x&genre=sci%20fi&sort=name"));
        assert_eq!(p, params("2", "5", "sci fi", "4.5"));

        assert_eq!(SeriesParams::from_query(None), SeriesParams::default());
        assert_eq!(SeriesParams::from_query(Some("")), SeriesParams::default());
        assert_eq!(SeriesParams::from_query(Some("&&=x&page")).page.as_deref(), Some(""));
    }

    #[test]
    fn owner_condition_is_always_first() {
        let owner = OwnerIdentity::new("u1");
        let query = SeriesQuery::from_params(owner, &SeriesParams::default());
        let scope = query.scope().unwrap();

        let first = &scope.filter().conditions()[0];
        assert_eq!(first.column, columns::OWNER);
        assert_eq!(first.data, FilterValue::from("u1"));
        assert_eq!(scope.filter().conditions().len(), 1);
        assert_eq!(scope.owner().as_str(), "u1");
    }

    #[test]
    fn genre_and_rate_add_equality() {
        let query = SeriesQuery::from_params(OwnerIdentity::new("u1"), &params("2", "5", "drama", "4.5"));
        assert_eq!(query.genre.as_deref(), Some("drama"));
        assert_eq!(query.rate, Some(4.5));

        let sql = query.scope().unwrap().filter().to_sql();
        assert_eq!(
            sql.query,
            "SELECT * FROM \"series\" WHERE \"user_id\" = $1 AND \"genre\" = $2 AND \"rate\" = $3 \
             ORDER BY \"created_at\" ASC, \"id\" ASC LIMIT 5 OFFSET 5"
        );
        assert_eq!(
            sql.params,
            vec![FilterValue::from("u1"), FilterValue::from("drama"), FilterValue::Float(4.5)]
        );
    }

    #[test]
    fn unparseable_rate_is_dropped() {
        for raw in ["abc", "", "NaN", "inf", "4,5"] {
            let query = SeriesQuery::from_params(OwnerIdentity::new("u1"), &params("", "", "", raw));
            assert_eq!(query.rate, None, "rate {:?}", raw);
        }
        let query = SeriesQuery::from_params(OwnerIdentity::new("u1"), &params("", "", "", "3"));
        assert_eq!(query.rate, Some(3.0));
    }

    #[test]
    fn empty_genre_is_dropped() {
        let mut p = SeriesParams::default();
        p.genre = Some(String::new());
        let query = SeriesQuery::from_params(OwnerIdentity::new("u1"), &p);
        assert_eq!(query.genre, None);
        assert_eq!(query.scope().unwrap().filter().conditions().len(), 1);
    }

    #[test]
    fn default_window_when_paging_invalid() {
        let query = SeriesQuery::from_params(OwnerIdentity::new("u1"), &params("0", "5", "", ""));
        let scope = query.scope().unwrap();
        assert_eq!(scope.filter().offset_value(), Some(0));
        assert_eq!(scope.filter().limit_value(), Some(10));
    }
}
