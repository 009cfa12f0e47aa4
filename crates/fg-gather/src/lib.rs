//! fg-gather - Foreign-key gathering engine for fkgather
//!
//! Fetches a row together with every row reachable from it through declared
//! foreign keys, up to a depth bound, in one query, and rebuilds the result
//! as nested, depth-annotated models:
//!
//! - [`planner`] - walks the foreign-key graph and emits the LEFT JOIN plan
//! - [`row_parser`] - splits flat result rows into per-alias models
//! - [`collection`] - indexes fetched rows by table and primary key
//! - [`reconstruct`] - rebuilds nested models under an invalid-reference policy
//! - [`result`] - shapes the output as at-most-one, exactly-one, or many
//! - [`gatherer`] - runs the whole pipeline against a [`fg_db::Database`]

pub mod collection;
pub mod error;
pub mod gatherer;
pub mod model;
pub mod planner;
mod policy;
pub mod reconstruct;
pub mod result;
pub mod row_parser;

pub use collection::ModelCollection;
pub use error::{GatherError, GatherResult};
pub use gatherer::{GatherRequest, Gatherer};
pub use model::{FlatModel, GatheredModel};
pub use planner::{AliasedTable, JoinPlan};
pub use reconstruct::Reconstructor;
pub use result::{Cardinality, Gathered, Payload};
pub use row_parser::{parse_rows, ParsedRow};
