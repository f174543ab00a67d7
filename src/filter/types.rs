use serde_json::Value;
use uuid::Uuid;

/// Typed value bound into an equality condition
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Float(f64),
    Uuid(Uuid),
}

impl FilterValue {
    /// Compare against a field of a JSON document
    pub fn matches(&self, field: &Value) -> bool {
        match (self, field) {
            (FilterValue::Text(expected), Value::String(actual)) => expected == actual,
            (FilterValue::Float(expected), Value::Number(actual)) => actual.as_f64() == Some(*expected),
            (FilterValue::Uuid(expected), Value::String(actual)) => {
                Uuid::parse_str(actual).map(|u| u == *expected).unwrap_or(false)
            }
            _ => false,
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Text(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::Text(s)
    }
}

impl From<f64> for FilterValue {
    fn from(f: f64) -> Self {
        FilterValue::Float(f)
    }
}

impl From<Uuid> for FilterValue {
    fn from(u: Uuid) -> Self {
        FilterValue::Uuid(u)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterWhereInfo {
    pub column: String,
    pub data: FilterValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterOrderInfo {
    pub column: String,
    pub sort: SortDirection,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<FilterValue>,
}
