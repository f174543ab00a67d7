use serde_json::Value;

use super::types::{FilterValue, FilterWhereInfo};

/// Renders equality conditions to SQL, or evaluates them against documents
pub struct FilterWhere {
    param_values: Vec<FilterValue>,
    param_index: usize,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    /// Conditions are joined with AND; an empty list yields `1=1`
    pub fn generate(conditions: &[FilterWhereInfo], starting_param_index: usize) -> (String, Vec<FilterValue>) {
        let mut filter_where = Self::new(starting_param_index);
        filter_where.build(conditions)
    }

    /// Every condition must hold on the document; missing fields never match
    pub fn matches(conditions: &[FilterWhereInfo], document: &Value) -> bool {
        conditions.iter().all(|condition| {
            document
                .get(&condition.column)
                .map(|field| condition.data.matches(field))
                .unwrap_or(false)
        })
    }

    fn build(&mut self, conditions: &[FilterWhereInfo]) -> (String, Vec<FilterValue>) {
        let sql_conditions: Vec<String> = conditions
            .iter()
            .map(|condition| format!("\"{}\" = {}", condition.column, self.param(condition.data.clone())))
            .collect();

        let where_clause = if sql_conditions.is_empty() { "1=1".to_string() } else { sql_conditions.join(" AND ") };
        (where_clause, std::mem::take(&mut self.param_values))
    }

    fn param(&mut self, value: FilterValue) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn eq(column: &str, data: FilterValue) -> FilterWhereInfo {
        FilterWhereInfo { column: column.to_string(), data }
    }

    #[test]
    fn numbers_placeholders_in_order() {
        let (sql, params) = FilterWhere::generate(
            &[eq("user_id", "u1".into()), eq("genre", "drama".into()), eq("rate", FilterValue::Float(4.5))],
            0,
        );
        assert_eq!(sql, "\"user_id\" = $1 AND \"genre\" = $2 AND \"rate\" = $3");
        assert_eq!(params, vec![FilterValue::from("u1"), FilterValue::from("drama"), FilterValue::Float(4.5)]);
    }

    #[test]
    fn respects_starting_index() {
        let (sql, _) = FilterWhere::generate(&[eq("genre", "drama".into())], 2);
        assert_eq!(sql, "\"genre\" = $3");
    }

    #[test]
    fn empty_conditions_match_everything() {
        let (sql, params) = FilterWhere::generate(&[], 0);
        assert_eq!(sql, "1=1");
        assert!(params.is_empty());
        assert!(FilterWhere::matches(&[], &json!({})));
    }

    #[test]
    fn document_matching_is_typed() {
        let doc = json!({ "user_id": "u1", "genre": "drama", "rate": 4.5 });
        assert!(FilterWhere::matches(&[eq("user_id", "u1".into()), eq("rate", FilterValue::Float(4.5))], &doc));
        assert!(!FilterWhere::matches(&[eq("rate", "4.5".into())], &doc));
        assert!(!FilterWhere::matches(&[eq("user_id", "u2".into())], &doc));
        assert!(!FilterWhere::matches(&[eq("status", "watching".into())], &doc));
    }
}
