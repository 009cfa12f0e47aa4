//! fg-core - Core library for fkgather
//!
//! This crate provides the schema registry and foreign-key graph consumed by
//! the gather engine, the builder that produces it, the gather depth and
//! invalid-reference policy types, and `fkgather.yml` configuration parsing.

pub mod config;
pub mod depth;
pub mod error;
mod names;
pub mod policy;
pub mod schema;

pub use config::{
    DatabaseConfig, Dialect, ForeignKeyConfig, GatherConfig, ReferenceTarget, TableConfig,
};
pub use depth::GatherDepth;
pub use error::{CoreError, CoreResult};
pub use names::{EdgeName, TableName};
pub use policy::InvalidReferencePolicy;
pub use schema::{ForeignKeyDef, ForeignKeyEdge, SchemaBuilder, SchemaRegistry, TableSchema};
