//! Error types for fg-core

use thiserror::Error;

/// Core error type for fkgather
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Configuration file not found
    #[error("[C001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// C002: Invalid configuration value
    #[error("[C002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// C003: A name (table, column, edge) was empty
    #[error("[C003] Empty {context}")]
    EmptyName { context: String },

    /// C004: Table registered twice
    #[error("[C004] Duplicate table: {table}")]
    DuplicateTable { table: String },

    /// C005: Table declared without columns
    #[error("[C005] Table '{table}' must declare at least one column")]
    EmptyColumns { table: String },

    /// C006: Column listed twice on the same table
    #[error("[C006] Duplicate column '{column}' on table '{table}'")]
    DuplicateColumn { table: String, column: String },

    /// C007: Reference to a table that is not registered
    #[error("[C007] Unknown table: {table}")]
    UnknownTable { table: String },

    /// C008: Reference to a column the table does not declare
    #[error("[C008] Unknown column '{column}' on table '{table}'")]
    UnknownColumn { table: String, column: String },

    /// C009: Foreign-key edge name reused within one table
    #[error("[C009] Duplicate foreign key '{edge}' on table '{table}'")]
    DuplicateEdge { table: String, edge: String },

    /// C010: Foreign-key edge name collides with a column of the same table
    #[error("[C010] Foreign key '{edge}' on table '{table}' has the same name as a column")]
    EdgeShadowsColumn { table: String, edge: String },

    /// C011: Unrecognised invalid-reference policy name
    #[error("[C011] Unknown invalid-reference policy '{value}' (expected one of: omit, throw, null, keep)")]
    InvalidPolicy { value: String },

    /// C012: IO error with file path context
    #[error("[C012] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// C013: YAML parse error
    #[error("[C013] Config parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// C014: Column or foreign key named like a serialised model key
    #[error("[C014] '{name}' on table '{table}' is reserved (depth and table are model keys)")]
    ReservedName { table: String, name: String },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
