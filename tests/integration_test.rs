use rsql_query::access::{EntityStore, Value};
use rsql_query::catalog::{FieldMetadata, FieldType};
use rsql_query::config::QueryConfig;
use rsql_query::executor::{MemoryBackend, QueryExecutor, Row};
use rsql_query::expression::{
    ComparisonOperator, Expression, ExpressionError, ExpressionResult, SchemaPath,
};
use rsql_query::fixtures;
use rsql_query::handler::{CoercionContext, StringHandler, TypeHandler, TypedValue};
use rsql_query::query::Query;
use std::sync::Arc;
use std::thread;

const CARS: u64 = 50;

struct Fixture {
    config: QueryConfig,
    backend: MemoryBackend,
}

impl Fixture {
    fn new() -> anyhow::Result<Self> {
        Self::with_config(|catalog| Ok(QueryConfig::new(catalog)))
    }

    fn with_config(
        build: impl FnOnce(Arc<rsql_query::catalog::Catalog>) -> anyhow::Result<QueryConfig>,
    ) -> anyhow::Result<Self> {
        let catalog = Arc::new(fixtures::catalog()?);
        let store = Arc::new(EntityStore::new());
        fixtures::seed_cars(&store, CARS, 2024);
        Ok(Self {
            config: build(catalog.clone())?,
            backend: MemoryBackend::new(catalog, store),
        })
    }

    fn count(&self, filter: &str) -> anyhow::Result<usize> {
        let request = Query::select_from("Car").filter(filter).build(&self.config)?;
        Ok(self.backend.fetch(&request)?.len())
    }

    fn ids(&self, filter: &str) -> anyhow::Result<Vec<i64>> {
        let request = Query::select("(id)")
            .from("Car")
            .filter(filter)
            .sort("(id.asc)")
            .build(&self.config)?;
        Ok(self
            .backend
            .fetch(&request)?
            .iter()
            .filter_map(|row| row.values().first().and_then(Value::as_i64))
            .collect())
    }
}

fn names(rows: &[Row]) -> Vec<String> {
    rows.iter()
        .filter_map(|row| row.values().first().and_then(Value::as_str).map(String::from))
        .collect()
}

#[test]
fn test_not_empty_matches_every_car() -> anyhow::Result<()> {
    let fixture = Fixture::new()?;
    assert_eq!(fixture.count("description=notempty=''")?, 50);
    assert_eq!(fixture.count("")?, 50);
    Ok(())
}

#[test]
fn test_nested_collection_contains() -> anyhow::Result<()> {
    let fixture = Fixture::new()?;
    assert_eq!(fixture.count("engine.screws.name=con='name'")?, 50);
    assert_eq!(fixture.count("engine.screws.name=con='Eszti'")?, 0);
    assert_eq!(fixture.count("engine.screws.name=conic='NAME'")?, 50);
    assert_eq!(fixture.count("screws[0].size=ge=1")?, 50);
    Ok(())
}

#[test]
fn test_membership_and_comparison() -> anyhow::Result<()> {
    let fixture = Fixture::new()?;
    assert_eq!(fixture.ids("id=in=(3,6,9)")?, vec![3, 6, 9]);
    assert_eq!(fixture.ids("id=gt=47")?, vec![48, 49, 50]);
    assert_eq!(fixture.ids("id<3")?, vec![1, 2]);
    assert_eq!(fixture.ids("id=le=2,id=ge=49")?, vec![1, 2, 49, 50]);
    assert_eq!(fixture.count("id=out=(1,2,3)")?, 47);
    assert_eq!(fixture.ids("name=eqic=car7")?, vec![7]);
    assert_eq!(fixture.ids("name=like=Car4_;id=lt=43")?, vec![40, 41, 42]);
    Ok(())
}

#[test]
fn test_boolean_and_date_filters() -> anyhow::Result<()> {
    let fixture = Fixture::new()?;
    let active = fixture.count("active=istrue=''")?;
    let inactive = fixture.count("active=isfalse=''")?;
    assert_eq!(active + inactive, 50);
    assert_eq!(fixture.count("active==true")?, active);

    // Generated dates start at 2020-01-01
    assert_eq!(fixture.count("mfgdt=after=2019-12-31")?, 50);
    assert_eq!(fixture.count("mfgdt=before=2020-01-01")?, 0);
    assert_eq!(fixture.count("mfgdt=ge='2020-01-01 00:00:00'")?, 50);
    Ok(())
}

#[test]
fn test_empty_literal_is_null() -> anyhow::Result<()> {
    let fixture = Fixture::new()?;
    assert_eq!(fixture.count("mfgdt==''")?, 0);
    assert_eq!(fixture.count("name!=''")?, 50);
    Ok(())
}

#[test]
fn test_enum_constants() -> anyhow::Result<()> {
    let fixture = Fixture::new()?;
    assert_eq!(
        fixture.count("screws.screwType=in=(PHILLIPS,FLAT,TORX,HEX)")?,
        50
    );

    let err = Query::select_from("Car")
        .filter("screws.screwType==SQUARE")
        .build(&fixture.config)
        .unwrap_err();
    assert!(matches!(err.kind(), ExpressionError::ValueParse { .. }));
    Ok(())
}

#[test]
fn test_select_sort_and_page() -> anyhow::Result<()> {
    let fixture = Fixture::new()?;
    let request = Query::select("(name,description)")
        .from("Car")
        .filter("engine.screws.name=con='name'")
        .sort("(id.desc)")
        .page(1, 15)
        .build(&fixture.config)?;
    assert_eq!(request.offset, Some(15));
    assert_eq!(request.size, Some(15));

    let rows = fixture.backend.fetch(&request)?;
    assert_eq!(rows.len(), 15);
    assert!(rows.iter().all(|row| row.values().len() == 2));

    let names = names(&rows);
    assert_eq!(names.first().map(String::as_str), Some("Car35"));
    assert_eq!(names.last().map(String::as_str), Some("Car21"));

    // The same window written as a page string and as a limit
    for request in [
        Query::select("(name,description)")
            .from("Car")
            .unfiltered()
            .sort("(id.desc)")
            .page_str("(1,15)")
            .build(&fixture.config)?,
        Query::select("(name,description)")
            .from("Car")
            .unfiltered()
            .sort("(id.desc)")
            .limit_str("(15,15)")
            .build(&fixture.config)?,
    ] {
        assert_eq!(fixture.backend.fetch(&request)?, rows);
    }
    Ok(())
}

#[test]
fn test_explained_request() -> anyhow::Result<()> {
    let fixture = Fixture::new()?;
    let request = Query::select("(name)")
        .from("Car")
        .filter("id==1")
        .sort("(id.desc)")
        .limit(0, 5)
        .build(&fixture.config)?;
    assert_eq!(
        request.to_string(),
        "SELECT car.name FROM Car car WHERE (car.id = 1) ORDER BY car.id DESC LIMIT 5 OFFSET 0"
    );
    Ok(())
}

#[test]
fn test_unknown_operator() -> anyhow::Result<()> {
    let fixture = Fixture::new()?;
    let err = Query::select_from("Car")
        .filter("name=bogus=x")
        .build(&fixture.config)
        .unwrap_err();
    assert_eq!(
        err.kind(),
        &ExpressionError::UnknownOperator {
            symbol: "=bogus=".to_string()
        }
    );
    assert_eq!(err.selector.as_deref(), Some("name"));
    Ok(())
}

struct NotEmptyHandler;

impl TypeHandler for NotEmptyHandler {
    fn name(&self) -> &str {
        "custom-not-empty"
    }

    fn supports(&self, field_type: &FieldType) -> bool {
        *field_type == FieldType::String
    }

    fn coerce(
        &self,
        values: &[String],
        metadata: &FieldMetadata,
        ctx: &CoercionContext<'_>,
    ) -> ExpressionResult<TypedValue> {
        StringHandler.coerce(values, metadata, ctx)
    }

    fn build_expression(
        &self,
        path: &SchemaPath,
        value: &TypedValue,
        operator: &ComparisonOperator,
    ) -> Option<Expression> {
        if *operator == ComparisonOperator::new("=customnotempty=") {
            Some(Expression::is_not_empty(Expression::path(path.clone())))
        } else {
            StringHandler.build_expression(path, value, operator)
        }
    }
}

#[test]
fn test_custom_operator_and_handler() -> anyhow::Result<()> {
    let fixture = Fixture::with_config(|catalog| {
        Ok(QueryConfig::builder(catalog)
            .operator(ComparisonOperator::new("=customnotempty="))
            .handler(Arc::new(NotEmptyHandler))
            .build()?)
    })?;
    assert_eq!(fixture.count("description=customnotempty=''")?, 50);
    // Built-in operators still reach the fallback rules
    assert_eq!(fixture.ids("name==Car2")?, vec![2]);

    let plain = Fixture::new()?;
    let err = plain.count("description=customnotempty=''").unwrap_err();
    assert!(err.to_string().contains("Unknown operator: =customnotempty="));
    Ok(())
}

#[test]
fn test_illegal_operator_symbol_rejected_at_build() -> anyhow::Result<()> {
    let catalog = Arc::new(fixtures::catalog()?);
    let result = QueryConfig::builder(catalog)
        .operator(ComparisonOperator::new("notAnOperator"))
        .build();
    assert!(matches!(
        result.map_err(|e| e.source),
        Err(ExpressionError::IllegalOperatorSyntax { .. })
    ));
    Ok(())
}

#[test]
fn test_concurrent_compilation() -> anyhow::Result<()> {
    let config = Arc::new(QueryConfig::new(Arc::new(fixtures::catalog()?)));

    let handles: Vec<_> = (1..=8)
        .map(|i| {
            let config = Arc::clone(&config);
            thread::spawn(move || {
                Query::select_from("Car")
                    .filter(format!("id=={};engine.screws.name=con=x", i))
                    .build(&config)
                    .map(|request| request.to_string())
            })
        })
        .collect();

    for (i, handle) in (1..=8).zip(handles) {
        let rendered = handle
            .join()
            .map_err(|_| anyhow::anyhow!("compiler thread panicked"))??;
        assert!(rendered.contains(&format!("(car.id = {})", i)));
    }
    Ok(())
}

#[test]
fn test_rows_serialize_to_json() -> anyhow::Result<()> {
    let fixture = Fixture::new()?;
    let request = Query::select("(id,name)")
        .from("Car")
        .filter("id=le=2")
        .sort("(id.asc)")
        .build(&fixture.config)?;
    let json = serde_json::to_value(fixture.backend.fetch(&request)?)?;
    assert_eq!(json, serde_json::json!([[1, "Car1"], [2, "Car2"]]));
    Ok(())
}
