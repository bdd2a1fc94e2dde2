//! Executor layer for query execution.
//!
//! This module implements the Volcano-style iterator model over in-memory
//! entity records. Each executor produces rows one at a time via the
//! `next()` method, and the planner stacks them into a pipeline for one
//! [`QueryRequest`]: scan, filter, sort, window and projection.

use crate::access::{EntityStore, Record, Value};
use crate::catalog::Catalog;
use crate::planner::Planner;
use crate::query::QueryRequest;
use anyhow::Result;
use log::debug;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

pub mod filter;
pub mod projection;
pub mod scan;
pub mod sort;
pub mod window;

// Re-export executors
pub use filter::FilterExecutor;
pub use projection::ProjectionExecutor;
pub use scan::ScanExecutor;
pub use sort::SortExecutor;
pub use window::WindowExecutor;

/// One result row: a whole root record, or projected column values
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Row {
    Record(Record),
    Tuple(Vec<Value>),
}

impl Row {
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Row::Record(record) => Some(record),
            Row::Tuple(_) => None,
        }
    }

    /// Projected values; empty for a whole record
    pub fn values(&self) -> &[Value] {
        match self {
            Row::Record(_) => &[],
            Row::Tuple(values) => values,
        }
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Row::Record(record) => write!(f, "{}", record),
            Row::Tuple(values) => write!(f, "{}", Value::List(values.clone())),
        }
    }
}

/// Trait for all query executors
pub trait Executor: Send {
    /// Initialize the executor. This must be called before `next()`.
    fn init(&mut self) -> Result<()>;

    /// Get the next row from the executor.
    /// Returns None when there are no more rows.
    fn next(&mut self) -> Result<Option<Row>>;

    /// Get the output schema of this executor
    fn output_schema(&self) -> &[ColumnInfo];
}

/// Information about a column in the output schema
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub name: String,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Runs assembled query requests
pub trait QueryExecutor {
    fn fetch(&self, request: &QueryRequest) -> Result<Vec<Row>>;

    /// First row of the request, if any
    fn fetch_one(&self, request: &QueryRequest) -> Result<Option<Row>> {
        let mut single = request.clone();
        single.size = Some(1);
        Ok(self.fetch(&single)?.into_iter().next())
    }
}

/// Query execution over an [`EntityStore`]
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    catalog: Arc<Catalog>,
    store: Arc<EntityStore>,
}

impl MemoryBackend {
    pub fn new(catalog: Arc<Catalog>, store: Arc<EntityStore>) -> Self {
        Self { catalog, store }
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Column names of the rows `request` produces
    pub fn columns(&self, request: &QueryRequest) -> Result<Vec<ColumnInfo>> {
        let mut executor = Planner::new(&self.catalog, self.store.clone()).plan(request)?;
        executor.init()?;
        Ok(executor.output_schema().to_vec())
    }
}

impl QueryExecutor for MemoryBackend {
    fn fetch(&self, request: &QueryRequest) -> Result<Vec<Row>> {
        let mut executor = Planner::new(&self.catalog, self.store.clone()).plan(request)?;
        executor.init()?;

        let mut rows = Vec::new();
        while let Some(row) = executor.next()? {
            rows.push(row);
        }
        debug!("Fetched {} rows of {}", rows.len(), request.entity);
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QueryConfig;
    use crate::fixtures;
    use crate::query::Query;

    fn backend() -> Result<(QueryConfig, MemoryBackend)> {
        let catalog = Arc::new(fixtures::catalog()?);
        let store = Arc::new(EntityStore::new());
        fixtures::seed_cars(&store, 10, 7);
        Ok((
            QueryConfig::new(catalog.clone()),
            MemoryBackend::new(catalog, store),
        ))
    }

    #[test]
    fn test_column_info_creation() {
        let col = ColumnInfo::new("id");
        assert_eq!(col.name, "id");
    }

    #[test]
    fn test_row_accessors() {
        let row = Row::Tuple(vec![Value::Int64(1), Value::from("a")]);
        assert!(row.as_record().is_none());
        assert_eq!(row.values().len(), 2);
        assert_eq!(row.to_string(), "(1, 'a')");

        let row = Row::Record(Record::new("Car").with("id", 1i64));
        assert!(row.as_record().is_some());
        assert!(row.values().is_empty());
    }

    #[test]
    fn test_fetch_and_fetch_one() -> Result<()> {
        let (config, backend) = backend()?;

        let request = Query::select_from("Car").filter("id=le=3").build(&config)?;
        assert_eq!(backend.fetch(&request)?.len(), 3);

        let request = Query::select("(name)")
            .from("Car")
            .unfiltered()
            .sort("(id.desc)")
            .build(&config)?;
        let row = backend.fetch_one(&request)?;
        assert_eq!(row, Some(Row::Tuple(vec![Value::from("Car10")])));

        let request = Query::select_from("Car").filter("id==99").build(&config)?;
        assert!(backend.fetch_one(&request)?.is_none());
        Ok(())
    }

    #[test]
    fn test_columns() -> Result<()> {
        let (config, backend) = backend()?;
        let request = Query::select("(name,description)")
            .from("Car")
            .unfiltered()
            .build(&config)?;
        let names: Vec<String> = backend.columns(&request)?.into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["name", "description"]);
        Ok(())
    }
}
