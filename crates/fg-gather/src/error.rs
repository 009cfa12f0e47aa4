//! Error types for fg-gather

use fg_core::CoreError;
use fg_db::DbError;
use fg_sql::SqlError;
use thiserror::Error;

/// Gather errors
#[derive(Error, Debug)]
pub enum GatherError {
    /// A foreign-key column holds something other than null or a
    /// non-negative number (G001). Never subject to the invalid-reference
    /// policy.
    #[error("[G001] Invalid reference value in table '{table}', id {id}, edge '{edge}' (column '{column}'): expected null or a non-negative number, found {value}")]
    InvalidReferenceValue {
        table: String,
        id: i64,
        edge: String,
        column: String,
        value: String,
    },

    /// A foreign-key value points at a row absent from the fetched set (G002)
    #[error("[G002] Missing referenced row: table '{table}', id {id}, edge '{edge}' references '{referenced_table}' key {referenced_value}, which was not found")]
    MissingReferencedRow {
        table: String,
        id: i64,
        edge: String,
        referenced_table: String,
        referenced_value: String,
    },

    /// Exactly one row was requested but none matched (G003)
    #[error("[G003] Expected exactly one '{table}' row, found none")]
    MissingResult { table: String },

    /// A fetched primary key is not an integer (G004)
    #[error("[G004] Invalid primary key in '{table}.{column}': expected an integer, found {value}")]
    InvalidPrimaryKey {
        table: String,
        column: String,
        value: String,
    },

    /// Requested depth is above the configured guard (G005)
    #[error("[G005] Requested gather depth {requested} exceeds the maximum of {max}")]
    DepthLimitExceeded { requested: u32, max: u32 },

    /// Schema or configuration error
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Query building error (including duplicate aliases)
    #[error(transparent)]
    Sql(#[from] SqlError),

    /// Query execution error
    #[error(transparent)]
    Db(#[from] DbError),
}

/// Result type alias for GatherError
pub type GatherResult<T> = Result<T, GatherError>;
