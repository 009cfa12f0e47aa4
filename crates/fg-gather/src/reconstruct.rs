//! Rebuilding nested models from a model collection
//!
//! Reconstruction is depth-first over the declared edges of each table. The
//! depth counter is the only thing bounding cyclic graphs; a row reached
//! along two paths is rebuilt twice, independently, and the two copies may
//! carry different depth annotations.

use crate::collection::ModelCollection;
use crate::error::{GatherError, GatherResult};
use crate::model::{integer_key, FlatModel, GatheredModel};
use crate::policy::{resolve, MissingReference, Resolution};
use fg_core::{ForeignKeyEdge, GatherDepth, InvalidReferencePolicy, SchemaRegistry};
use serde_json::Value;

/// Rebuilds gathered models from already-fetched rows. Performs no I/O.
#[derive(Debug, Clone, Copy)]
pub struct Reconstructor<'a> {
    registry: &'a SchemaRegistry,
    collection: &'a ModelCollection,
    policy: InvalidReferencePolicy,
}

impl<'a> Reconstructor<'a> {
    pub fn new(
        registry: &'a SchemaRegistry,
        collection: &'a ModelCollection,
        policy: InvalidReferencePolicy,
    ) -> Self {
        Self {
            registry,
            collection,
            policy,
        }
    }

    pub fn policy(&self) -> InvalidReferencePolicy {
        self.policy
    }

    /// Rebuild the collection's `(table, id)` row; `Ok(None)` when the row
    /// is not in the collection or was dropped by the policy.
    pub fn reconstruct_id(
        &self,
        table: &str,
        id: i64,
        depth: GatherDepth,
    ) -> GatherResult<Option<GatheredModel>> {
        match self.collection.get(table, id) {
            Some(model) => self.reconstruct(model, depth),
            None => Ok(None),
        }
    }

    /// Rebuild `model` with its foreign-key slots resolved `depth` levels
    /// deep.
    ///
    /// Returns `Ok(None)` when a missing reference anywhere in the subtree
    /// makes the `omit` or `null` policy drop the model.
    pub fn reconstruct(
        &self,
        model: &FlatModel,
        depth: GatherDepth,
    ) -> GatherResult<Option<GatheredModel>> {
        let Some(child_depth) = depth.child() else {
            return Ok(Some(GatheredModel::from(model.clone())));
        };

        let schema = self.registry.require_table(model.table())?;
        let mut references = Vec::with_capacity(schema.edges().len());

        for edge in schema.edges() {
            let Some((referenced_value, key)) = reference_value(model, edge)? else {
                references.push((edge.name.clone(), None));
                continue;
            };

            match key.and_then(|key| self.lookup(edge, key)) {
                Some(referenced) => match self.reconstruct(referenced, child_depth)? {
                    Some(nested) => references.push((edge.name.clone(), Some(nested))),
                    None => return Ok(None),
                },
                None => {
                    let missing = MissingReference {
                        table: model.table(),
                        id: model.id(),
                        edge: &edge.name,
                        referenced_table: &edge.to_table,
                        referenced_value,
                    };
                    match resolve(self.policy, &missing)? {
                        Resolution::DropModel => return Ok(None),
                        Resolution::FillNull => references.push((edge.name.clone(), None)),
                    }
                }
            }
        }

        Ok(Some(GatheredModel::new(model, depth, references)))
    }

    fn lookup(&self, edge: &ForeignKeyEdge, value: i64) -> Option<&'a FlatModel> {
        let targets_primary_key = self
            .registry
            .table(&edge.to_table)
            .is_some_and(|target| target.primary_key() == edge.to_column);
        if targets_primary_key {
            self.collection.get(&edge.to_table, value)
        } else {
            self.collection
                .find_by_column(&edge.to_table, &edge.to_column, value)
        }
    }
}

/// The value held by `edge`'s column and its integer key, or `None` when no
/// row is expected (null, absent, or zero).
///
/// A non-negative number that is not an integer key still expects a row; it
/// comes back without a key, so it can only resolve as missing.
fn reference_value<'m>(
    model: &'m FlatModel,
    edge: &ForeignKeyEdge,
) -> GatherResult<Option<(&'m Value, Option<i64>)>> {
    let value = match model.get(&edge.from_column) {
        None | Some(Value::Null) => return Ok(None),
        Some(value) => value,
    };
    if !value.as_f64().is_some_and(|n| n >= 0.0) {
        return Err(GatherError::InvalidReferenceValue {
            table: model.table().to_string(),
            id: model.id(),
            edge: edge.name.to_string(),
            column: edge.from_column.clone(),
            value: value.to_string(),
        });
    }
    match integer_key(value) {
        Some(0) => Ok(None),
        key => Ok(Some((value, key))),
    }
}

#[cfg(test)]
#[path = "reconstruct_test.rs"]
mod tests;
