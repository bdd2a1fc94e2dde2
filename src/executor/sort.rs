//! In-memory sort over compiled order specifications.
//!
//! All child rows are pulled and keyed at `init()`. NULL sorts below every
//! other value, so it comes first ascending and last descending. Keys of
//! unrelated kinds compare equal and keep their input order.

use crate::access::Value;
use crate::compiler::{OrderSpec, SortOrder};
use crate::executor::{ColumnInfo, Executor, Row};
use crate::expression::{Expression, ExpressionEvaluator};
use anyhow::{bail, Context, Result};
use std::cmp::Ordering;
use std::vec;

pub struct SortExecutor {
    child: Box<dyn Executor>,
    ordering: Vec<OrderSpec>,
    output_schema: Vec<ColumnInfo>,
    sorted: vec::IntoIter<Row>,
    initialized: bool,
}

impl SortExecutor {
    pub fn new(child: Box<dyn Executor>, ordering: Vec<OrderSpec>) -> Self {
        Self {
            child,
            ordering,
            output_schema: Vec::new(),
            sorted: Vec::new().into_iter(),
            initialized: false,
        }
    }

    fn sort_key(&self, row: &Row) -> Result<Vec<Value>> {
        let Some(record) = row.as_record() else {
            bail!("Sort expects whole records, got a projected row");
        };
        let evaluator = ExpressionEvaluator::new(record);
        self.ordering
            .iter()
            .map(|spec| {
                evaluator
                    .project(&Expression::path(spec.path.clone()))
                    .with_context(|| format!("Failed to evaluate sort key {}", spec.path))
            })
            .collect()
    }
}

fn ascending(a: &Value, b: &Value) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.compare(b).unwrap_or(Ordering::Equal),
    }
}

fn compare_keys(a: &[Value], b: &[Value], ordering: &[OrderSpec]) -> Ordering {
    a.iter()
        .zip(b)
        .zip(ordering)
        .map(|((x, y), spec)| match spec.order {
            SortOrder::Asc => ascending(x, y),
            SortOrder::Desc => ascending(x, y).reverse(),
        })
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}

impl Executor for SortExecutor {
    fn init(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }

        self.child.init()?;
        self.output_schema = self.child.output_schema().to_vec();

        let mut keyed = Vec::new();
        while let Some(row) = self.child.next()? {
            let key = self.sort_key(&row)?;
            keyed.push((key, row));
        }
        // Stable, so equal keys keep the child's order
        keyed.sort_by(|(a, _), (b, _)| compare_keys(a, b, &self.ordering));
        self.sorted = keyed
            .into_iter()
            .map(|(_, row)| row)
            .collect::<Vec<_>>()
            .into_iter();

        self.initialized = true;
        Ok(())
    }

    fn next(&mut self) -> Result<Option<Row>> {
        if !self.initialized {
            bail!("Executor not initialized. Call init() first.");
        }
        Ok(self.sorted.next())
    }

    fn output_schema(&self) -> &[ColumnInfo] {
        &self.output_schema
    }
}
