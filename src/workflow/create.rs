use serde_json::Value;

use super::descriptor::{equals, placeholder, CreateSpec, FieldKind, ParentRef, UniqueKey};
use super::error::WorkflowError;
use super::shape;
use crate::database::{Database, DatabaseError, Row};
use crate::middleware::AuthUser;

/// Authorization → shape and value types → parent existence → uniqueness → insert.
///
/// Each step is its own round trip and the chain stops at the first
/// failure. The storage layer carries the same foreign keys and unique
/// indexes, and violations raised by the INSERT map back to the same
/// 404/409 outcomes.
pub struct CreateWorkflow<'a> {
    spec: &'a CreateSpec,
}

impl<'a> CreateWorkflow<'a> {
    pub fn new(spec: &'a CreateSpec) -> Self {
        Self { spec }
    }

    #[tracing::instrument(skip_all, fields(table = self.spec.table))]
    pub async fn run(&self, db: &dyn Database, principal: Option<&AuthUser>, body: &Value) -> Result<Row, WorkflowError> {
        if principal.is_none() {
            return Err(WorkflowError::Unauthorized);
        }

        shape::validate_required(body, self.spec.required).map_err(WorkflowError::InvalidShape)?;

        for field in self.spec.fields {
            if shape::is_present(body, field.key) {
                field.check(&body[field.key]).map_err(WorkflowError::InvalidShape)?;
            }
        }

        for parent in self.spec.parents {
            self.check_parent(db, parent, body).await?;
        }

        if let Some(unique) = &self.spec.unique {
            self.check_unique(db, unique, body).await?;
        }

        self.insert(db, body).await
    }

    async fn check_parent(&self, db: &dyn Database, parent: &ParentRef, body: &Value) -> Result<(), WorkflowError> {
        if parent.optional && !shape::is_present(body, parent.key) {
            return Ok(());
        }

        let id = FieldKind::Id.normalize(body.get(parent.key).unwrap_or(&Value::Null));
        let sql = format!("SELECT id FROM \"{}\" WHERE {}", parent.table, equals("id", 1, FieldKind::Id));
        let rows = db.execute(&sql, &[id]).await?;

        if rows.is_empty() {
            tracing::debug!(parent = parent.table, "Referenced parent does not exist");
            return Err(WorkflowError::NotFound(parent.not_found_message()));
        }
        Ok(())
    }

    async fn check_unique(&self, db: &dyn Database, unique: &UniqueKey, body: &Value) -> Result<(), WorkflowError> {
        let mut conditions = Vec::with_capacity(unique.keys.len());
        let mut params = Vec::with_capacity(unique.keys.len());

        for (i, key) in unique.keys.iter().enumerate() {
            let field = self
                .spec
                .field(key)
                .ok_or_else(|| DatabaseError::QueryError(format!("unique key '{}' is not a column of {}", key, self.spec.table)))?;
            conditions.push(equals(&format!("\"{}\"", field.column), i + 1, field.kind));
            params.push(field.kind.normalize(body.get(field.key).unwrap_or(&Value::Null)));
        }

        let sql = format!(
            "SELECT id FROM \"{}\" WHERE {} LIMIT 1",
            self.spec.table,
            conditions.join(" AND ")
        );
        let rows = db.execute(&sql, &params).await?;

        if !rows.is_empty() {
            tracing::debug!(table = self.spec.table, "Natural key already taken");
            return Err(WorkflowError::Conflict(unique.message.to_string()));
        }
        Ok(())
    }

    /// `INSERT ... RETURNING *` over every declared column; absent keys bind NULL
    pub fn insert_statement(&self, body: &Value) -> (String, Vec<Value>) {
        let mut columns = Vec::with_capacity(self.spec.fields.len());
        let mut values = Vec::with_capacity(self.spec.fields.len());
        let mut params = Vec::with_capacity(self.spec.fields.len());

        for (i, field) in self.spec.fields.iter().enumerate() {
            columns.push(format!("\"{}\"", field.column));

            let expr = placeholder(i + 1, field.kind);
            values.push(match field.default {
                Some(default) => format!("COALESCE({}, {})", expr, default),
                None => expr,
            });

            params.push(if shape::is_present(body, field.key) {
                field.kind.normalize(&body[field.key])
            } else {
                Value::Null
            });
        }

        let sql = format!(
            "INSERT INTO \"{}\" ({}) VALUES ({}) RETURNING *",
            self.spec.table,
            columns.join(", "),
            values.join(", ")
        );
        (sql, params)
    }

    async fn insert(&self, db: &dyn Database, body: &Value) -> Result<Row, WorkflowError> {
        let (sql, params) = self.insert_statement(body);

        match db.execute(&sql, &params).await {
            Ok(rows) => rows.into_iter().next().ok_or_else(|| {
                DatabaseError::QueryError(format!("INSERT INTO {} returned no row", self.spec.table)).into()
            }),
            Err(DatabaseError::ForeignKeyViolation { constraint }) => {
                match self.parent_for_constraint(constraint.as_deref()) {
                    Some(parent) => Err(WorkflowError::NotFound(parent.not_found_message())),
                    None => Err(DatabaseError::ForeignKeyViolation { constraint }.into()),
                }
            }
            Err(DatabaseError::UniqueViolation { constraint }) => match &self.spec.unique {
                Some(unique) => Err(WorkflowError::Conflict(unique.message.to_string())),
                None => Err(DatabaseError::UniqueViolation { constraint }.into()),
            },
            Err(err) => Err(err.into()),
        }
    }

    fn parent_for_constraint(&self, constraint: Option<&str>) -> Option<&ParentRef> {
        let constraint = constraint?;
        self.spec
            .parents
            .iter()
            .find(|p| p.constraint_name(self.spec.table) == constraint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{CONTEST_RESULTS, PLAYERS, RESULTS, TEAMS, TOURNAMENT_YEARS};
    use crate::testing::MockDatabase;
    use serde_json::json;

    fn admin() -> AuthUser {
        AuthUser { id: "admin-1".to_string(), email: None }
    }

    #[tokio::test]
    async fn unauthenticated_requests_never_reach_the_database() {
        let db = MockDatabase::new();
        let body = json!({ "teamId": "1", "position": 1, "score": 72.5 });

        let err = CreateWorkflow::new(&RESULTS.create).run(&db, None, &body).await.unwrap_err();

        assert!(matches!(err, WorkflowError::Unauthorized));
        assert_eq!(db.call_count(), 0);
    }

    #[tokio::test]
    async fn missing_fields_name_every_required_key() {
        let db = MockDatabase::new();
        let body = json!({ "name": "Team C" });

        let err = CreateWorkflow::new(&TEAMS.create).run(&db, Some(&admin()), &body).await.unwrap_err();

        match err {
            WorkflowError::InvalidShape(msg) => assert_eq!(msg, "Missing required fields: name and flightId"),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(db.call_count(), 0);
    }

    #[tokio::test]
    async fn mistyped_values_are_rejected_before_any_query() {
        let db = MockDatabase::new();

        let err = CreateWorkflow::new(&TOURNAMENT_YEARS.create)
            .run(&db, Some(&admin()), &json!({ "year": true }))
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::InvalidShape(msg) if msg == "Field 'year' must be an integer"));
        assert_eq!(db.call_count(), 0);
    }

    #[tokio::test]
    async fn parent_ids_are_matched_in_lowercase() {
        let db = MockDatabase::new().empty();
        let body = json!({ "teamId": "3F2A0C4E-9B1D-4C44-8E6A-0F6B1B2C3D4E", "position": 1, "score": 70 });

        CreateWorkflow::new(&RESULTS.create).run(&db, Some(&admin()), &body).await.unwrap_err();

        assert_eq!(db.executed()[0].params, vec![json!("3f2a0c4e-9b1d-4c44-8e6a-0f6b1b2c3d4e")]);
    }

    #[tokio::test]
    async fn first_missing_parent_short_circuits() {
        let db = MockDatabase::new().empty();
        let body = json!({ "contestId": "c-1", "playerId": "p-1", "result": 212 });

        let err = CreateWorkflow::new(&CONTEST_RESULTS.create)
            .run(&db, Some(&admin()), &body)
            .await
            .unwrap_err();

        match err {
            WorkflowError::NotFound(msg) => assert_eq!(msg, "Contest not found"),
            other => panic!("unexpected outcome: {:?}", other),
        }
        let executed = db.executed();
        assert_eq!(executed.len(), 1);
        assert!(executed[0].sql.contains("FROM \"contests\""));
        assert_eq!(executed[0].params, vec![json!("c-1")]);
    }

    #[tokio::test]
    async fn later_parents_are_checked_after_earlier_ones_pass() {
        let db = MockDatabase::new().returning(vec![json!({ "id": "c-1" })]).empty();
        let body = json!({ "contestId": "c-1", "playerId": "p-9", "result": 212 });

        let err = CreateWorkflow::new(&CONTEST_RESULTS.create)
            .run(&db, Some(&admin()), &body)
            .await
            .unwrap_err();

        match err {
            WorkflowError::NotFound(msg) => assert_eq!(msg, "Player not found"),
            other => panic!("unexpected outcome: {:?}", other),
        }
        let executed = db.executed();
        assert_eq!(executed.len(), 2);
        assert!(executed[1].sql.contains("FROM \"players\""));
    }

    #[tokio::test]
    async fn conflicting_natural_key_skips_the_insert() {
        let db = MockDatabase::new()
            .returning(vec![json!({ "id": "1" })])
            .returning(vec![json!({ "id": "r-1" })]);
        let body = json!({ "teamId": "1", "position": 1, "score": 72.5 });

        let err = CreateWorkflow::new(&RESULTS.create).run(&db, Some(&admin()), &body).await.unwrap_err();

        match err {
            WorkflowError::Conflict(msg) => assert_eq!(msg, "Result already exists for this team"),
            other => panic!("unexpected outcome: {:?}", other),
        }
        let executed = db.executed();
        assert_eq!(executed.len(), 2);
        assert!(executed.iter().all(|s| !s.sql.starts_with("INSERT")));
    }

    #[tokio::test]
    async fn composite_unique_key_binds_both_columns() {
        let db = MockDatabase::new()
            .returning(vec![json!({ "id": "c-1" })])
            .returning(vec![json!({ "id": "p-1" })])
            .returning(vec![json!({ "id": "cr-1" })]);
        let body = json!({ "contestId": "c-1", "playerId": "p-1", "result": 3.5 });

        let err = CreateWorkflow::new(&CONTEST_RESULTS.create)
            .run(&db, Some(&admin()), &body)
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::Conflict(_)));
        let unique_check = &db.executed()[2];
        assert!(unique_check.sql.contains("\"contest_id\"::text = $1::text AND \"player_id\"::text = $2::text"));
        assert_eq!(unique_check.params, vec![json!("c-1"), json!("p-1")]);
    }

    #[tokio::test]
    async fn successful_create_returns_the_inserted_row() {
        let row = json!({
            "id": "ty-1",
            "year": 2025,
            "created_at": "2025-03-01T12:00:00Z",
            "updated_at": "2025-03-01T12:00:00Z"
        });
        let db = MockDatabase::new().empty().returning(vec![row.clone()]);

        let created = CreateWorkflow::new(&TOURNAMENT_YEARS.create)
            .run(&db, Some(&admin()), &json!({ "year": 2025 }))
            .await
            .unwrap();

        assert_eq!(Value::Object(created), row);
        let executed = db.executed();
        assert_eq!(executed.len(), 2);
        assert_eq!(
            executed[1].sql,
            "INSERT INTO \"tournament_years\" (\"year\") VALUES ($1::integer) RETURNING *"
        );
        assert_eq!(executed[1].params, vec![json!(2025)]);
    }

    #[tokio::test]
    async fn optional_parent_is_skipped_when_absent() {
        let db = MockDatabase::new().returning(vec![json!({ "id": "p-1", "name": "Ann", "team_id": null })]);

        CreateWorkflow::new(&PLAYERS.create)
            .run(&db, Some(&admin()), &json!({ "name": "Ann", "teamId": "" }))
            .await
            .unwrap();

        let executed = db.executed();
        assert_eq!(executed.len(), 1);
        assert!(executed[0].sql.starts_with("INSERT INTO \"players\""));
        assert_eq!(executed[0].params, vec![json!("Ann"), Value::Null]);
    }

    #[test]
    fn defaults_apply_to_absent_columns() {
        let workflow = CreateWorkflow::new(&RESULTS.create);
        let (sql, params) = workflow.insert_statement(&json!({ "teamId": 4, "position": 2, "score": 70 }));

        assert_eq!(
            sql,
            "INSERT INTO \"results\" (\"team_id\", \"position\", \"score\", \"purse\") \
             VALUES ($1::uuid, $2::integer, $3::numeric, COALESCE($4::numeric, 0)) RETURNING *"
        );
        assert_eq!(params, vec![json!("4"), json!(2), json!(70), Value::Null]);
    }

    #[tokio::test]
    async fn foreign_key_violation_on_insert_maps_to_not_found() {
        let db = MockDatabase::new()
            .returning(vec![json!({ "id": "1" })])
            .empty()
            .failing(DatabaseError::ForeignKeyViolation { constraint: Some("results_team_id_fkey".to_string()) });
        let body = json!({ "teamId": "1", "position": 1, "score": 72.5 });

        let err = CreateWorkflow::new(&RESULTS.create).run(&db, Some(&admin()), &body).await.unwrap_err();

        match err {
            WorkflowError::NotFound(msg) => assert_eq!(msg, "Team not found"),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn unique_violation_on_insert_maps_to_conflict() {
        let db = MockDatabase::new()
            .empty()
            .failing(DatabaseError::UniqueViolation { constraint: Some("tournament_years_year_key".to_string()) });

        let err = CreateWorkflow::new(&TOURNAMENT_YEARS.create)
            .run(&db, Some(&admin()), &json!({ "year": 2025 }))
            .await
            .unwrap_err();

        match err {
            WorkflowError::Conflict(msg) => assert_eq!(msg, "Tournament year already exists"),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn database_failures_abort_as_internal() {
        let db = MockDatabase::new().failing(DatabaseError::QueryError("connection reset".to_string()));
        let body = json!({ "name": "Team C", "flightId": "f-1" });

        let err = CreateWorkflow::new(&TEAMS.create).run(&db, Some(&admin()), &body).await.unwrap_err();

        assert!(matches!(err, WorkflowError::Internal(_)));
        assert_eq!(db.call_count(), 1);
    }
}
