//! CLI command implementations

pub(crate) mod common;
pub(crate) mod gather;
pub(crate) mod plan;
pub(crate) mod schema;
