//! Database trait definition

use crate::error::DbResult;
use async_trait::async_trait;

/// One result row: column label to value.
///
/// Labels are whatever the SELECT list produced (for gather queries, the
/// `alias.column` labels generated by the query builder).
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Query executor used by the gather engine.
///
/// Implementations must be Send + Sync for async operation. Retries and
/// cancellation, if any, belong to the implementation.
#[async_trait]
pub trait Database: Send + Sync {
    /// Execute multiple SQL statements
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Run a query and return every row as a flat label-to-value map
    async fn query_rows(&self, sql: &str) -> DbResult<Vec<Row>>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
