use async_trait::async_trait;
use serde_json::{Map, Value};

use super::manager::DatabaseError;

/// A single result row, keyed by column name.
pub type Row = Map<String, Value>;

/// Parameterized statement execution.
///
/// Every statement is issued as its own round trip. Implementations must
/// bind `params` positionally (`$1`, `$2`, ...) and never splice them into
/// the statement text. Statements with a `RETURNING` clause yield the
/// affected rows; anything else yields the selected rows.
#[async_trait]
pub trait Database: Send + Sync {
    async fn execute(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, DatabaseError>;
}
