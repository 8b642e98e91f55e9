use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{postgres::PgArguments, PgPool, Row as _};

use super::executor::{Database, Row};
use super::manager::DatabaseError;
use crate::config::DatabaseConfig;

/// `Database` over a Postgres pool.
///
/// Statements are wrapped in a CTE and projected through `row_to_json`, so
/// plain selects and `... RETURNING` writes come back in the same shape.
#[derive(Clone)]
pub struct PgDatabase {
    pool: PgPool,
    log_queries: bool,
    slow_query_threshold: Option<Duration>,
}

impl PgDatabase {
    pub fn new(pool: PgPool, config: &DatabaseConfig) -> Self {
        Self {
            pool,
            log_queries: config.enable_query_logging,
            slow_query_threshold: config
                .enable_slow_query_warning
                .then(|| Duration::from_millis(config.slow_query_threshold_ms)),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

pub(crate) fn wrap_statement(sql: &str) -> String {
    format!("WITH t AS ({}) SELECT row_to_json(t) AS row FROM t", sql.trim().trim_end_matches(';'))
}

#[async_trait]
impl Database for PgDatabase {
    async fn execute(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, DatabaseError> {
        let wrapped = wrap_statement(sql);
        if self.log_queries {
            tracing::debug!(sql = %sql, params = ?params, "executing statement");
        }

        let mut q = sqlx::query(&wrapped);
        for p in params {
            q = bind_param(q, p);
        }

        let started = Instant::now();
        let rows = q.fetch_all(&self.pool).await?;
        let elapsed = started.elapsed();

        if let Some(threshold) = self.slow_query_threshold {
            if elapsed > threshold {
                tracing::warn!(elapsed_ms = elapsed.as_millis() as u64, sql = %sql, "slow query");
            }
        }

        rows.into_iter()
            .map(|row| match row.try_get::<Value, _>("row")? {
                Value::Object(map) => Ok(map),
                other => Err(DatabaseError::QueryError(format!("expected a JSON object row, got {}", other))),
            })
            .collect()
    }
}

fn bind_param<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &'q Value,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s.as_str()),
        Value::Array(_) | Value::Object(_) => q.bind(sqlx::types::Json(v)),
    }
}
