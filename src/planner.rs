//! Query planner for the in-memory backend.
//!
//! Turns a compiled [`QueryRequest`] into an executor pipeline:
//!
//! ```text
//! Scan(entity) -> Filter(predicate) -> Sort(ordering) -> Window(offset, size) -> Projection
//! ```
//!
//! Stages that the request does not need are left out.

use crate::access::EntityStore;
use crate::catalog::Catalog;
use crate::executor::{
    ColumnInfo, Executor, FilterExecutor, ProjectionExecutor, ScanExecutor, SortExecutor,
    WindowExecutor,
};
use crate::query::QueryRequest;
use anyhow::{bail, Result};
use log::trace;
use std::sync::Arc;

/// Builds executor pipelines for query requests
pub struct Planner<'a> {
    catalog: &'a Catalog,
    store: Arc<EntityStore>,
}

impl<'a> Planner<'a> {
    pub fn new(catalog: &'a Catalog, store: Arc<EntityStore>) -> Self {
        Self { catalog, store }
    }

    pub fn plan(&self, request: &QueryRequest) -> Result<Box<dyn Executor>> {
        if self.catalog.get_type(&request.entity).is_none() {
            bail!("Entity type '{}' not found", request.entity);
        }

        let columns = self
            .catalog
            .all_fields(&request.entity)
            .into_iter()
            .map(|field| ColumnInfo::new(field.name.clone()))
            .collect();
        let mut executor: Box<dyn Executor> = Box::new(ScanExecutor::new(
            self.store.clone(),
            request.entity.clone(),
            columns,
        ));
        trace!("Plan: scan {}", request.entity);

        if let Some(predicate) = &request.predicate {
            trace!("Plan: filter {}", predicate);
            executor = Box::new(FilterExecutor::new(executor, predicate.clone()));
        }

        if !request.ordering.is_empty() {
            trace!("Plan: sort on {} keys", request.ordering.len());
            executor = Box::new(SortExecutor::new(executor, request.ordering.clone()));
        }

        if request.offset.is_some() || request.size.is_some() {
            trace!("Plan: window offset {:?} size {:?}", request.offset, request.size);
            executor = Box::new(WindowExecutor::from_bounds(
                executor,
                request.offset,
                request.size,
            ));
        }

        if let Some(expressions) = request.projection.expressions() {
            trace!("Plan: project {} columns", expressions.len());
            executor = Box::new(ProjectionExecutor::new(executor, expressions));
        }

        Ok(executor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Value;
    use crate::executor::Row;
    use crate::fixtures;
    use crate::query::{Projection, QueryRequest};

    fn setup() -> Result<(Catalog, Arc<EntityStore>)> {
        let catalog = fixtures::catalog()?;
        let store = Arc::new(EntityStore::new());
        fixtures::seed_cars(&store, 6, 1);
        Ok((catalog, store))
    }

    fn request(entity: &str) -> QueryRequest {
        QueryRequest {
            entity: entity.to_string(),
            predicate: None,
            projection: Projection::Root,
            ordering: Vec::new(),
            offset: None,
            size: None,
        }
    }

    fn run(executor: &mut dyn Executor) -> Result<Vec<Row>> {
        executor.init()?;
        let mut rows = Vec::new();
        while let Some(row) = executor.next()? {
            rows.push(row);
        }
        Ok(rows)
    }

    #[test]
    fn test_plain_scan() -> Result<()> {
        let (catalog, store) = setup()?;
        let mut executor = Planner::new(&catalog, store).plan(&request("Car"))?;
        let rows = run(executor.as_mut())?;
        assert_eq!(rows.len(), 6);

        let names: Vec<&str> = executor
            .output_schema()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names.first(), Some(&"id"));
        assert!(names.contains(&"screws"));
        Ok(())
    }

    #[test]
    fn test_window_only() -> Result<()> {
        let (catalog, store) = setup()?;
        let planner = Planner::new(&catalog, store);

        let mut req = request("Car");
        req.offset = Some(4);
        assert_eq!(run(planner.plan(&req)?.as_mut())?.len(), 2);

        req.offset = None;
        req.size = Some(u64::MAX);
        assert_eq!(run(planner.plan(&req)?.as_mut())?.len(), 6);
        Ok(())
    }

    #[test]
    fn test_projection_last() -> Result<()> {
        let (catalog, store) = setup()?;
        let mut req = request("Car");
        req.projection = Projection::Paths(vec![crate::expression::SchemaPath::root("Car")
            .property("id", crate::catalog::TypeClass::Numeric)]);
        req.size = Some(2);

        let rows = run(Planner::new(&catalog, store).plan(&req)?.as_mut())?;
        assert_eq!(
            rows,
            vec![
                Row::Tuple(vec![Value::Int64(1)]),
                Row::Tuple(vec![Value::Int64(2)]),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_unknown_entity() -> Result<()> {
        let (catalog, store) = setup()?;
        let result = Planner::new(&catalog, store).plan(&request("Boat"));
        assert!(result.is_err());
        Ok(())
    }
}
