//! Error types for fg-sql

use thiserror::Error;

/// SQL building and validation errors
#[derive(Error, Debug)]
pub enum SqlError {
    /// SQL parse error (S001)
    #[error("[S001] SQL parse error at line {line}, column {column}: {message}")]
    ParseError {
        message: String,
        line: usize,
        column: usize,
    },

    /// Empty predicate text (S002)
    #[error("[S002] Filter predicate is empty")]
    EmptyPredicate,

    /// Alias used twice in one query (S003)
    #[error("[S003] Duplicate alias '{0}'")]
    DuplicateAlias(String),

    /// Join or selection refers to an alias that was never introduced (S004)
    #[error("[S004] Unknown alias '{0}'")]
    UnknownAlias(String),

    /// Unknown dialect name (S005)
    #[error("[S005] Unknown SQL dialect: {0}")]
    UnknownDialect(String),
}

/// Result type alias for SqlError
pub type SqlResult<T> = Result<T, SqlError>;
