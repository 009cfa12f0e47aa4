//! fg-sql - SQL layer for fkgather
//!
//! This crate renders the single SELECT a gather call executes: a root table,
//! a list of LEFT JOIN steps under unique aliases, `alias.column` labelled
//! selections, and a caller-supplied filter predicate validated with
//! sqlparser-rs before any I/O.

pub mod dialect;
pub mod error;
pub mod predicate;
pub mod select;

pub use dialect::{dialect_from_name, DuckDbDialect, PostgresDialect, SqlDialect};
pub use error::{SqlError, SqlResult};
pub use predicate::{Literal, Predicate};
pub use select::{column_label, JoinStep, SelectQuery};
