//! fg-db - Database abstraction layer for fkgather
//!
//! This crate provides the `Database` trait the gather engine executes its
//! single planned query through, and a DuckDB implementation of it.

pub mod duckdb;
pub mod error;
pub mod traits;

pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use traits::{Database, Row};
