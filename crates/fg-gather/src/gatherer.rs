//! The gather pipeline
//!
//! One call plans the joins, renders one SELECT, runs it, indexes the rows,
//! and rebuilds the root models. Everything that can fail for reasons other
//! than the data (unknown table, unknown column, bad raw predicate, depth
//! above the guard, duplicate alias) fails before the query is issued.

use crate::collection::ModelCollection;
use crate::error::{GatherError, GatherResult};
use crate::model::GatheredModel;
use crate::planner::JoinPlan;
use crate::reconstruct::Reconstructor;
use crate::result::{Cardinality, Gathered, Payload};
use crate::row_parser::parse_rows;
use fg_core::{GatherConfig, GatherDepth, InvalidReferencePolicy, SchemaRegistry};
use fg_db::Database;
use fg_sql::{dialect_from_name, DuckDbDialect, Predicate, SqlDialect};
use std::collections::HashSet;
use std::sync::Arc;

/// Parameters of one gather call. Anything left unset falls back to the
/// [`Gatherer`]'s defaults.
#[derive(Debug, Clone)]
pub struct GatherRequest {
    table: String,
    depth: Option<GatherDepth>,
    filter: Option<Predicate>,
    id: Option<i64>,
    on_invalid_reference: Option<InvalidReferencePolicy>,
    collection: Option<ModelCollection>,
}

impl GatherRequest {
    /// Gather rows of `table`.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            depth: None,
            filter: None,
            id: None,
            on_invalid_reference: None,
            collection: None,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Number of foreign-key hops to resolve.
    pub fn depth(mut self, depth: impl Into<GatherDepth>) -> Self {
        self.depth = Some(depth.into());
        self
    }

    /// Restrict root rows. Repeated calls are combined with AND.
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.filter = Some(match self.filter.take() {
            Some(existing) => existing.and(predicate),
            None => predicate,
        });
        self
    }

    /// Restrict root rows to the one whose primary key is `id`.
    pub fn id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn on_invalid_reference(mut self, policy: InvalidReferencePolicy) -> Self {
        self.on_invalid_reference = Some(policy);
        self
    }

    /// Index fetched rows into `collection` instead of a fresh one. The
    /// extended collection comes back in the result.
    pub fn with_collection(mut self, collection: ModelCollection) -> Self {
        self.collection = Some(collection);
        self
    }

    fn predicate(&self, registry: &SchemaRegistry) -> GatherResult<Option<Predicate>> {
        let by_id = match self.id {
            Some(id) => {
                let schema = registry.require_table(&self.table)?;
                Some(Predicate::eq(schema.primary_key(), id))
            }
            None => None,
        };
        Ok(match (self.filter.clone(), by_id) {
            (Some(filter), Some(by_id)) => Some(filter.and(by_id)),
            (filter, by_id) => filter.or(by_id),
        })
    }
}

/// Runs gather calls against one database and schema.
pub struct Gatherer {
    db: Arc<dyn Database>,
    registry: Arc<SchemaRegistry>,
    dialect: Box<dyn SqlDialect>,
    default_depth: GatherDepth,
    max_depth: Option<GatherDepth>,
    default_policy: InvalidReferencePolicy,
}

impl Gatherer {
    /// Create a gatherer with the DuckDB dialect, depth 3, no depth guard,
    /// and the `omit` policy.
    pub fn new(db: Arc<dyn Database>, registry: impl Into<Arc<SchemaRegistry>>) -> Self {
        Self {
            db,
            registry: registry.into(),
            dialect: Box::new(DuckDbDialect::new()),
            default_depth: GatherDepth::DEFAULT,
            max_depth: None,
            default_policy: InvalidReferencePolicy::default(),
        }
    }

    /// Create a gatherer from a loaded configuration.
    pub fn from_config(db: Arc<dyn Database>, config: &GatherConfig) -> GatherResult<Self> {
        let registry = config.schema_registry()?;
        let dialect = dialect_from_name(&config.dialect.to_string())?;
        Ok(Self {
            db,
            registry: Arc::new(registry),
            dialect,
            default_depth: config.default_depth,
            max_depth: config.max_depth,
            default_policy: config.on_invalid_reference,
        })
    }

    pub fn with_dialect(mut self, dialect: Box<dyn SqlDialect>) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn with_default_depth(mut self, depth: impl Into<GatherDepth>) -> Self {
        self.default_depth = depth.into();
        self
    }

    /// Reject requests deeper than `depth`.
    pub fn with_max_depth(mut self, depth: impl Into<GatherDepth>) -> Self {
        self.max_depth = Some(depth.into());
        self
    }

    pub fn with_default_policy(mut self, policy: InvalidReferencePolicy) -> Self {
        self.default_policy = policy;
        self
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn dialect(&self) -> &dyn SqlDialect {
        self.dialect.as_ref()
    }

    pub fn default_depth(&self) -> GatherDepth {
        self.default_depth
    }

    pub fn max_depth(&self) -> Option<GatherDepth> {
        self.max_depth
    }

    pub fn default_policy(&self) -> InvalidReferencePolicy {
        self.default_policy
    }

    fn resolve_depth(&self, requested: Option<GatherDepth>) -> GatherResult<GatherDepth> {
        let depth = requested.unwrap_or(self.default_depth);
        match self.max_depth {
            Some(max) if depth > max => Err(GatherError::DepthLimitExceeded {
                requested: depth.get(),
                max: max.get(),
            }),
            _ => Ok(depth),
        }
    }

    /// Plan the joins a gather of `table` would make.
    pub fn plan(&self, table: &str, depth: Option<GatherDepth>) -> GatherResult<JoinPlan> {
        let depth = self.resolve_depth(depth)?;
        JoinPlan::build(&self.registry, table, depth)
    }

    /// The SQL `request` would execute, without executing it.
    pub fn plan_sql(&self, request: &GatherRequest) -> GatherResult<String> {
        let plan = self.plan(&request.table, request.depth)?;
        self.render(&plan, request)
    }

    fn render(&self, plan: &JoinPlan, request: &GatherRequest) -> GatherResult<String> {
        let predicate = request.predicate(&self.registry)?;
        let query = plan.to_query(&self.registry, predicate.as_ref())?;
        Ok(query.to_sql(self.dialect.as_ref())?)
    }

    /// Fetch the matching root rows with everything they reference up to the
    /// requested depth, in one query.
    pub async fn gather(
        &self,
        request: GatherRequest,
        cardinality: Cardinality,
    ) -> GatherResult<Gathered> {
        let policy = request
            .on_invalid_reference
            .unwrap_or(self.default_policy);
        let plan = self.plan(&request.table, request.depth)?;
        let sql = self.render(&plan, &request)?;

        log::debug!(
            "Gathering '{}' at depth {} on {}:\n{}",
            request.table,
            plan.depth(),
            self.db.db_type(),
            sql
        );
        let rows = self.db.query_rows(&sql).await?;
        log::debug!("Query returned {} row(s)", rows.len());

        let mut collection = request.collection.unwrap_or_default();
        let parsed = parse_rows(&rows, &plan, &self.registry, &mut collection)?;

        let root_alias = &plan.root().alias;
        let reconstructor = Reconstructor::new(&self.registry, &collection, policy);
        let mut seen = HashSet::new();
        let mut models = Vec::new();
        for row in &parsed {
            let Some(root) = row.get(root_alias) else {
                continue;
            };
            if !seen.insert(root.id()) {
                continue;
            }
            if let Some(model) = reconstructor.reconstruct(root, plan.depth())? {
                models.push(model);
            }
        }

        let dropped = seen.len() - models.len();
        if dropped > 0 {
            log::debug!("{dropped} root model(s) dropped by the '{policy}' policy");
        }

        let payload = Payload::wrap(&request.table, cardinality, models)?;
        Ok(Gathered::new(
            plan.root().table.clone(),
            plan.depth(),
            payload,
            collection,
        ))
    }

    /// [`gather`](Self::gather) with [`Cardinality::One`].
    pub async fn gather_one(&self, request: GatherRequest) -> GatherResult<Gathered> {
        self.gather(request, Cardinality::One).await
    }

    /// [`gather`](Self::gather) with [`Cardinality::OneStrict`].
    pub async fn gather_one_strict(&self, request: GatherRequest) -> GatherResult<Gathered> {
        self.gather(request, Cardinality::OneStrict).await
    }

    /// [`gather`](Self::gather) with [`Cardinality::Some`].
    pub async fn gather_some(&self, request: GatherRequest) -> GatherResult<Gathered> {
        self.gather(request, Cardinality::Some).await
    }

    /// Rebuild `(table, id)` from an existing collection without a query.
    ///
    /// Rows the collection lacks count as missing references, so a shallower
    /// earlier gather may leave the rebuilt model dropped or filled with
    /// nulls.
    pub fn rebuild(
        &self,
        table: &str,
        id: i64,
        depth: Option<GatherDepth>,
        policy: Option<InvalidReferencePolicy>,
        collection: &ModelCollection,
    ) -> GatherResult<Option<GatheredModel>> {
        let depth = self.resolve_depth(depth)?;
        self.registry.require_table(table)?;
        let policy = policy.unwrap_or(self.default_policy);
        Reconstructor::new(&self.registry, collection, policy).reconstruct_id(table, id, depth)
    }
}

#[cfg(test)]
#[path = "gatherer_test.rs"]
mod tests;
