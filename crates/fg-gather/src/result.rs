//! Result shaping: at most one, exactly one, or many

use crate::collection::ModelCollection;
use crate::error::{GatherError, GatherResult};
use crate::model::GatheredModel;
use fg_core::{GatherDepth, TableName};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// How many models a gather call hands back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cardinality {
    /// The first model, or nothing
    #[default]
    One,
    /// The first model; no match is an error
    OneStrict,
    /// Every model
    Some,
}

impl Cardinality {
    pub fn as_str(self) -> &'static str {
        match self {
            Cardinality::One => "one",
            Cardinality::OneStrict => "one-strict",
            Cardinality::Some => "some",
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cardinality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "one" => Ok(Cardinality::One),
            "one-strict" | "one_strict" | "onestrict" => Ok(Cardinality::OneStrict),
            "some" | "many" => Ok(Cardinality::Some),
            other => Err(format!(
                "unknown cardinality '{other}' (expected one, one-strict, or some)"
            )),
        }
    }
}

/// The models a gather call produced, shaped by [`Cardinality`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    OneOrNone(Option<GatheredModel>),
    One(GatheredModel),
    Some(Vec<GatheredModel>),
}

impl Payload {
    /// Shape `models`, which must already exclude dropped models.
    pub fn wrap(
        table: &str,
        cardinality: Cardinality,
        models: Vec<GatheredModel>,
    ) -> GatherResult<Self> {
        match cardinality {
            Cardinality::One => Ok(Payload::OneOrNone(models.into_iter().next())),
            Cardinality::OneStrict => models
                .into_iter()
                .next()
                .map(Payload::One)
                .ok_or_else(|| GatherError::MissingResult {
                    table: table.to_string(),
                }),
            Cardinality::Some => Ok(Payload::Some(models)),
        }
    }

    pub fn cardinality(&self) -> Cardinality {
        match self {
            Payload::OneOrNone(_) => Cardinality::One,
            Payload::One(_) => Cardinality::OneStrict,
            Payload::Some(_) => Cardinality::Some,
        }
    }

    /// The first model, if any.
    pub fn first(&self) -> Option<&GatheredModel> {
        match self {
            Payload::OneOrNone(model) => model.as_ref(),
            Payload::One(model) => Some(model),
            Payload::Some(models) => models.first(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Payload::OneOrNone(model) => usize::from(model.is_some()),
            Payload::One(_) => 1,
            Payload::Some(models) => models.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_vec(self) -> Vec<GatheredModel> {
        match self {
            Payload::OneOrNone(model) => model.into_iter().collect(),
            Payload::One(model) => vec![model],
            Payload::Some(models) => models,
        }
    }
}

/// Outcome of a gather call: the shaped payload plus every row fetched, for
/// follow-up reconstruction without another query.
#[derive(Debug, Clone)]
pub struct Gathered {
    table: TableName,
    depth: GatherDepth,
    payload: Payload,
    collection: ModelCollection,
}

impl Gathered {
    pub(crate) fn new(
        table: TableName,
        depth: GatherDepth,
        payload: Payload,
        collection: ModelCollection,
    ) -> Self {
        Self {
            table,
            depth,
            payload,
            collection,
        }
    }

    pub fn table(&self) -> &TableName {
        &self.table
    }

    pub fn depth(&self) -> GatherDepth {
        self.depth
    }

    pub fn cardinality(&self) -> Cardinality {
        self.payload.cardinality()
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn collection(&self) -> &ModelCollection {
        &self.collection
    }

    /// The first model, if any.
    pub fn first(&self) -> Option<&GatheredModel> {
        self.payload.first()
    }

    pub fn into_parts(self) -> (Payload, ModelCollection) {
        (self.payload, self.collection)
    }

    pub fn into_collection(self) -> ModelCollection {
        self.collection
    }
}
