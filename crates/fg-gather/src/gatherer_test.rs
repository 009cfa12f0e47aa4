use super::*;
use async_trait::async_trait;
use fg_core::{CoreError, SchemaBuilder};
use fg_db::{DbResult, Row};
use fg_sql::{PostgresDialect, SqlError};
use serde_json::{json, Value};
use std::sync::Mutex;

/// Returns canned rows and records every query it is asked to run.
#[derive(Default)]
struct CannedDatabase {
    rows: Vec<Row>,
    queries: Mutex<Vec<String>>,
}

impl CannedDatabase {
    fn with_rows(rows: Vec<Value>) -> Arc<Self> {
        let rows = rows
            .into_iter()
            .filter_map(|row| match row {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect();
        Arc::new(Self {
            rows,
            queries: Mutex::new(Vec::new()),
        })
    }

    fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Database for CannedDatabase {
    async fn execute_batch(&self, _sql: &str) -> DbResult<()> {
        Ok(())
    }

    async fn query_rows(&self, sql: &str) -> DbResult<Vec<Row>> {
        self.queries.lock().unwrap().push(sql.to_string());
        Ok(self.rows.clone())
    }

    fn db_type(&self) -> &'static str {
        "canned"
    }
}

fn registry() -> SchemaRegistry {
    SchemaBuilder::new()
        .table("media_item", ["id", "url"])
        .table("user", ["id", "name", "avatar_img_id"])
        .nullable_foreign_key("user", "avatar_img", "avatar_img_id", "media_item")
        .build()
        .unwrap()
}

fn alice_rows() -> Vec<Value> {
    vec![json!({
        "user.id": 5, "user.name": "Alice", "user.avatar_img_id": 1,
        "fk1.id": 1, "fk1.url": "a.png"
    })]
}

#[tokio::test]
async fn test_gather_issues_one_query() {
    let db = CannedDatabase::with_rows(alice_rows());
    let gatherer = Gatherer::new(db.clone(), registry());

    let gathered = gatherer
        .gather_one(GatherRequest::new("user").id(5))
        .await
        .unwrap();

    let user = gathered.first().unwrap();
    assert_eq!(user.depth(), GatherDepth::DEFAULT);
    assert_eq!(user.reference("avatar_img").unwrap().id(), 1);
    assert_eq!(gathered.collection().len(), 2);

    let queries = db.queries();
    assert_eq!(queries.len(), 1);
    assert!(queries[0].ends_with(r#"WHERE "user"."id" = 5"#));
}

#[tokio::test]
async fn test_duplicate_root_rows_collapse() {
    let mut rows = alice_rows();
    rows.extend(alice_rows());
    let db = CannedDatabase::with_rows(rows);
    let gatherer = Gatherer::new(db, registry());

    let gathered = gatherer
        .gather_some(GatherRequest::new("user"))
        .await
        .unwrap();
    assert_eq!(gathered.payload().len(), 1);
}

#[tokio::test]
async fn test_depth_guard_runs_before_query() {
    let db = CannedDatabase::with_rows(alice_rows());
    let gatherer = Gatherer::new(db.clone(), registry()).with_max_depth(2u32);

    let err = gatherer
        .gather_one(GatherRequest::new("user").depth(5u32))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        GatherError::DepthLimitExceeded { requested: 5, max: 2 }
    ));
    assert!(db.queries().is_empty());

    // the default depth (3) is also above the guard
    assert!(gatherer.plan("user", None).is_err());
    assert!(gatherer.plan("user", Some(GatherDepth::new(2))).is_ok());
}

#[tokio::test]
async fn test_unknown_filter_column_runs_before_query() {
    let db = CannedDatabase::with_rows(alice_rows());
    let gatherer = Gatherer::new(db.clone(), registry());

    let err = gatherer
        .gather_some(GatherRequest::new("user").filter(Predicate::eq("email", "x")))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        GatherError::Core(CoreError::UnknownColumn { .. })
    ));
    assert!(db.queries().is_empty());
}

#[tokio::test]
async fn test_bad_raw_filter_runs_before_query() {
    let db = CannedDatabase::with_rows(alice_rows());
    let gatherer = Gatherer::new(db.clone(), registry());

    let err = gatherer
        .gather_some(GatherRequest::new("user").filter(Predicate::raw("id = = 1")))
        .await
        .unwrap_err();
    assert!(matches!(err, GatherError::Sql(SqlError::ParseError { .. })));
    assert!(db.queries().is_empty());
}

#[tokio::test]
async fn test_one_strict_without_rows() {
    let db = CannedDatabase::with_rows(vec![]);
    let gatherer = Gatherer::new(db, registry());

    let err = gatherer
        .gather_one_strict(GatherRequest::new("user").id(1))
        .await
        .unwrap_err();
    assert!(matches!(err, GatherError::MissingResult { .. }));
}

#[tokio::test]
async fn test_supplied_collection_is_extended() {
    let db = CannedDatabase::with_rows(alice_rows());
    let gatherer = Gatherer::new(db, registry());

    let first = gatherer
        .gather_one(GatherRequest::new("user").id(5).depth(0u32))
        .await
        .unwrap();
    assert_eq!(first.collection().len(), 2);

    let mut seed = ModelCollection::new();
    seed.insert(crate::model::FlatModel::new(
        "media_item".into(),
        42,
        Row::new(),
    ));
    let second = gatherer
        .gather_one(GatherRequest::new("user").with_collection(seed))
        .await
        .unwrap();
    assert_eq!(second.collection().len(), 3);
    assert!(second.collection().contains("media_item", 42));
}

#[test]
fn test_plan_sql_combines_filter_and_id() {
    let db = CannedDatabase::with_rows(vec![]);
    let gatherer = Gatherer::new(db, registry()).with_dialect(Box::new(PostgresDialect::new()));

    let sql = gatherer
        .plan_sql(
            &GatherRequest::new("user")
                .depth(1u32)
                .filter(Predicate::is_null("avatar_img_id"))
                .id(6),
        )
        .unwrap();
    assert!(sql.contains(r#"LEFT JOIN "media_item" AS "fk1""#));
    assert!(sql.ends_with(r#"WHERE ("user"."avatar_img_id" IS NULL) AND ("user"."id" = 6)"#));
}

#[test]
fn test_rebuild_from_collection() {
    let db = CannedDatabase::with_rows(vec![]);
    let gatherer = Gatherer::new(db, registry());

    let mut collection = ModelCollection::new();
    let mut parsed_rows = Vec::new();
    for row in alice_rows() {
        if let Value::Object(map) = row {
            parsed_rows.push(map);
        }
    }
    let plan = gatherer.plan("user", Some(GatherDepth::new(1))).unwrap();
    parse_rows(&parsed_rows, &plan, gatherer.registry(), &mut collection).unwrap();

    let user = gatherer
        .rebuild("user", 5, Some(GatherDepth::new(1)), None, &collection)
        .unwrap()
        .unwrap();
    assert_eq!(user.reference("avatar_img").unwrap().get("url"), Some(&json!("a.png")));

    assert!(matches!(
        gatherer.rebuild("comment", 1, None, None, &collection),
        Err(GatherError::Core(CoreError::UnknownTable { .. }))
    ));
}

#[test]
fn test_from_config() {
    let config = GatherConfig::from_yaml(
        r#"
name: blog
dialect: postgres
default_depth: 1
max_depth: 2
on_invalid_reference: keep
tables:
  - name: media_item
    columns: [id, url]
  - name: user
    columns: [id, name, avatar_img_id]
    foreign_keys:
      - name: avatar_img
        column: avatar_img_id
        references: { table: media_item }
        nullable: true
"#,
    )
    .unwrap();
    let gatherer = Gatherer::from_config(CannedDatabase::with_rows(vec![]), &config).unwrap();

    assert_eq!(gatherer.dialect().name(), "postgres");
    assert_eq!(gatherer.default_depth(), GatherDepth::new(1));
    assert_eq!(gatherer.max_depth(), Some(GatherDepth::new(2)));
    assert_eq!(gatherer.default_policy(), InvalidReferencePolicy::Keep);
    assert_eq!(gatherer.registry().edges("user").len(), 1);
}
