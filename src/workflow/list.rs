use std::collections::HashMap;

use serde_json::Value;

use super::descriptor::{equals, FieldKind, ListFilter, ListSpec};
use crate::database::{Database, DatabaseError, Row};

/// Joined, sorted projection with at most one filter applied.
pub struct ListWorkflow<'a> {
    spec: &'a ListSpec,
}

impl<'a> ListWorkflow<'a> {
    pub fn new(spec: &'a ListSpec) -> Self {
        Self { spec }
    }

    /// The first declared filter whose parameter carries a non-blank value
    pub fn active_filter<'q>(&self, query: &'q HashMap<String, String>) -> Option<(&ListFilter, &'q str)> {
        self.spec.filters.iter().find_map(|filter| {
            query
                .get(filter.param)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(|v| (filter, v))
        })
    }

    pub fn statement(&self, query: &HashMap<String, String>) -> (String, Vec<Value>) {
        match self.active_filter(query) {
            Some((filter, value)) => (
                format!(
                    "{} WHERE {} ORDER BY {}",
                    self.spec.select,
                    equals(filter.column, 1, FieldKind::Id),
                    self.spec.order_by
                ),
                vec![FieldKind::Id.normalize(&Value::String(value.to_string()))],
            ),
            None => (format!("{} ORDER BY {}", self.spec.select, self.spec.order_by), vec![]),
        }
    }

    pub async fn run(&self, db: &dyn Database, query: &HashMap<String, String>) -> Result<Vec<Row>, DatabaseError> {
        let (sql, params) = self.statement(query);
        db.execute(&sql, &params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{FLIGHTS, RESULTS, TOURNAMENT_YEARS};
    use crate::testing::MockDatabase;
    use serde_json::json;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn unfiltered_lists_keep_the_fixed_order() {
        let (sql, params) = ListWorkflow::new(&TOURNAMENT_YEARS.list).statement(&HashMap::new());
        assert!(sql.ends_with("ORDER BY ty.year DESC"));
        assert!(!sql.contains("WHERE"));
        assert!(params.is_empty());
    }

    #[test]
    fn filter_restricts_by_foreign_key() {
        let (sql, params) = ListWorkflow::new(&FLIGHTS.list).statement(&query(&[("tournamentYearId", "1")]));
        assert!(sql.contains("WHERE f.tournament_year_id::text = $1::text ORDER BY"));
        assert_eq!(params, vec![json!("1")]);
    }

    #[test]
    fn blank_filters_are_ignored() {
        let (sql, params) = ListWorkflow::new(&FLIGHTS.list).statement(&query(&[("tournamentYearId", "  ")]));
        assert!(!sql.contains("WHERE"));
        assert!(params.is_empty());
    }

    #[test]
    fn first_declared_filter_wins() {
        let workflow = ListWorkflow::new(&RESULTS.list);
        let q = query(&[("tournamentYearId", "ty-1"), ("teamId", "t-1")]);
        let (filter, value) = workflow.active_filter(&q).unwrap();
        assert_eq!(filter.param, "teamId");
        assert_eq!(value, "t-1");
    }

    #[test]
    fn unknown_parameters_do_not_filter() {
        let (sql, _) = ListWorkflow::new(&FLIGHTS.list).statement(&query(&[("name", "A Flight")]));
        assert!(!sql.contains("WHERE"));
    }

    #[tokio::test]
    async fn empty_results_are_not_an_error() {
        let db = MockDatabase::new().empty();
        let rows = ListWorkflow::new(&FLIGHTS.list).run(&db, &HashMap::new()).await.unwrap();
        assert!(rows.is_empty());
    }
}
