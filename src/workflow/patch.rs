use serde_json::Value;

use super::descriptor::{equals, placeholder, Field, FieldKind, PatchSpec};
use super::error::WorkflowError;
use crate::database::{Database, Row};
use crate::middleware::AuthUser;

/// The (field, value) pairs a request actually supplied
#[derive(Debug)]
pub struct PatchPlan {
    pub changes: Vec<(&'static Field, Value)>,
}

impl PatchPlan {
    pub fn touches(&self, key: &str) -> bool {
        self.changes.iter().any(|(field, _)| field.key == key)
    }

    pub fn value(&self, key: &str) -> Option<&Value> {
        self.changes.iter().find(|(field, _)| field.key == key).map(|(_, v)| v)
    }
}

/// Sparse-field update restricted to a whitelist of columns.
pub struct PatchWorkflow {
    spec: &'static PatchSpec,
}

impl PatchWorkflow {
    pub fn new(spec: &'static PatchSpec) -> Self {
        Self { spec }
    }

    /// Authorization and whitelist validation; no database access.
    pub fn plan(&self, principal: Option<&AuthUser>, body: &Value) -> Result<PatchPlan, WorkflowError> {
        if principal.is_none() {
            return Err(WorkflowError::Unauthorized);
        }

        let object = body
            .as_object()
            .ok_or_else(|| WorkflowError::InvalidShape("Request body must be a JSON object".to_string()))?;

        let mut changes = Vec::with_capacity(object.len());
        for (key, value) in object {
            let field = self
                .spec
                .updatable
                .iter()
                .find(|f| f.key == key)
                .ok_or_else(|| WorkflowError::InvalidShape(format!("Field '{}' cannot be updated", key)))?;
            let value = blank_to_null(field.kind.normalize(value));
            if value.is_null() && !field.nullable {
                return Err(WorkflowError::InvalidShape(format!("Field '{}' cannot be empty", key)));
            }
            field.check(&value).map_err(WorkflowError::InvalidShape)?;
            changes.push((field, value));
        }

        if changes.is_empty() {
            return Err(WorkflowError::InvalidShape("No fields to update".to_string()));
        }
        Ok(PatchPlan { changes })
    }

    pub fn statement(&self, id: &str, plan: &PatchPlan) -> (String, Vec<Value>) {
        let mut assignments = Vec::with_capacity(plan.changes.len() + 1);
        let mut params = Vec::with_capacity(plan.changes.len() + 1);

        for (i, (field, value)) in plan.changes.iter().enumerate() {
            assignments.push(format!("\"{}\" = {}", field.column, placeholder(i + 1, field.kind)));
            params.push(value.clone());
        }
        assignments.push("\"updated_at\" = now()".to_string());

        let id_index = params.len() + 1;
        params.push(FieldKind::Id.normalize(&Value::String(id.to_string())));

        let sql = format!(
            "UPDATE \"{}\" SET {} WHERE {} RETURNING *",
            self.spec.table,
            assignments.join(", "),
            equals("id", id_index, FieldKind::Id)
        );
        (sql, params)
    }

    pub async fn apply(&self, db: &dyn Database, id: &str, plan: &PatchPlan) -> Result<Row, WorkflowError> {
        let (sql, params) = self.statement(id, plan);
        let rows = db.execute(&sql, &params).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| WorkflowError::NotFound(self.spec.not_found.to_string()))
    }

    #[tracing::instrument(skip_all, fields(table = self.spec.table, id = %id))]
    pub async fn run(&self, db: &dyn Database, principal: Option<&AuthUser>, id: &str, body: &Value) -> Result<Row, WorkflowError> {
        let plan = self.plan(principal, body)?;
        self.apply(db, id, &plan).await
    }
}

fn blank_to_null(value: Value) -> Value {
    match value {
        Value::String(s) if s.trim().is_empty() => Value::Null,
        other => other,
    }
}
