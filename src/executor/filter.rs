//! Filter executor implementation.
//!
//! Passes through the records of its child for which the compiled predicate
//! is TRUE. Rows where the predicate is FALSE or UNKNOWN are dropped.

use crate::executor::{ColumnInfo, Executor, Row};
use crate::expression::{evaluate_predicate, Expression};
use anyhow::{bail, Context, Result};

/// Executor that filters rows based on a predicate
pub struct FilterExecutor {
    /// Child executor that produces rows
    child: Box<dyn Executor>,
    /// Predicate to evaluate against each record
    predicate: Expression,
    /// Output schema (same as child's schema)
    output_schema: Vec<ColumnInfo>,
    /// Whether the executor has been initialized
    initialized: bool,
}

impl FilterExecutor {
    /// Create a new filter executor
    ///
    /// # Arguments
    /// * `child` - The child executor that produces rows
    /// * `predicate` - The predicate a record must satisfy
    pub fn new(child: Box<dyn Executor>, predicate: Expression) -> Self {
        Self {
            child,
            predicate,
            output_schema: Vec::new(),
            initialized: false,
        }
    }
}

impl Executor for FilterExecutor {
    fn init(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }

        // Initialize child executor
        self.child.init()?;

        // Copy the child's output schema
        self.output_schema = self.child.output_schema().to_vec();

        self.initialized = true;
        Ok(())
    }

    fn next(&mut self) -> Result<Option<Row>> {
        if !self.initialized {
            bail!("Executor not initialized. Call init() first.");
        }

        while let Some(row) = self.child.next()? {
            let Some(record) = row.as_record() else {
                bail!("Filter expects whole records, got a projected row");
            };
            let matched = evaluate_predicate(&self.predicate, record)
                .with_context(|| format!("Failed to evaluate {}", self.predicate))?;
            if matched {
                return Ok(Some(row));
            }
        }

        Ok(None)
    }

    fn output_schema(&self) -> &[ColumnInfo] {
        &self.output_schema
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::access::{Record, Value};
    use crate::catalog::TypeClass;
    use crate::expression::SchemaPath;

    /// Mock executor for testing that produces a fixed set of rows
    pub(crate) struct MockExecutor {
        rows: Vec<Row>,
        schema: Vec<ColumnInfo>,
        current: usize,
        initialized: bool,
    }

    impl MockExecutor {
        pub(crate) fn new(rows: Vec<Row>, schema: Vec<ColumnInfo>) -> Self {
            Self {
                rows,
                schema,
                current: 0,
                initialized: false,
            }
        }
    }

    impl Executor for MockExecutor {
        fn init(&mut self) -> Result<()> {
            self.initialized = true;
            self.current = 0; // Reset current position on init
            Ok(())
        }

        fn next(&mut self) -> Result<Option<Row>> {
            if !self.initialized {
                bail!("Not initialized");
            }

            let row = self.rows.get(self.current).cloned();
            if row.is_some() {
                self.current += 1;
            }
            Ok(row)
        }

        fn output_schema(&self) -> &[ColumnInfo] {
            &self.schema
        }
    }

    /// Cars with ids 1..=5; car 3 has no name
    pub(crate) fn create_test_data() -> (Vec<Row>, Vec<ColumnInfo>) {
        let schema = vec![ColumnInfo::new("id"), ColumnInfo::new("name")];
        let rows = (1..=5i64)
            .map(|id| {
                let mut record = Record::new("Car").with("id", id);
                if id != 3 {
                    record.set("name", format!("Car{}", id));
                }
                Row::Record(record)
            })
            .collect();
        (rows, schema)
    }

    fn path(name: &str, class: TypeClass) -> Expression {
        Expression::path(SchemaPath::root("Car").property(name, class))
    }

    fn ids(executor: &mut dyn Executor) -> Result<Vec<i64>> {
        let mut ids = Vec::new();
        while let Some(row) = executor.next()? {
            if let Some(id) = row.as_record().and_then(|r| r.get("id").as_i64()) {
                ids.push(id);
            }
        }
        Ok(ids)
    }

    #[test]
    fn test_filter_basic() -> Result<()> {
        let (rows, schema) = create_test_data();
        let mock_executor = Box::new(MockExecutor::new(rows, schema.clone()));

        // id > 2
        let predicate = Expression::gt(path("id", TypeClass::Numeric), Expression::literal(Value::Int64(2)));
        let mut filter = FilterExecutor::new(mock_executor, predicate);
        filter.init()?;

        assert_eq!(filter.output_schema(), &schema[..]);
        assert_eq!(ids(&mut filter)?, vec![3, 4, 5]);
        Ok(())
    }

    #[test]
    fn test_filter_drops_unknown() -> Result<()> {
        let (rows, schema) = create_test_data();

        // NOT (name LIKE 'Car%') is UNKNOWN for the car without a name
        let predicate = Expression::not_expr(Expression::like(
            path("name", TypeClass::String),
            Expression::literal(Value::from("Car1%")),
        ));
        let mut filter = FilterExecutor::new(Box::new(MockExecutor::new(rows, schema)), predicate);
        filter.init()?;

        assert_eq!(ids(&mut filter)?, vec![2, 4, 5]);
        Ok(())
    }

    #[test]
    fn test_filter_rejects_projected_rows() -> Result<()> {
        let rows = vec![Row::Tuple(vec![Value::Int64(1)])];
        let predicate = Expression::is_null(path("id", TypeClass::Numeric));
        let mut filter = FilterExecutor::new(
            Box::new(MockExecutor::new(rows, vec![ColumnInfo::new("id")])),
            predicate,
        );
        filter.init()?;
        assert!(filter.next().is_err());
        Ok(())
    }

    #[test]
    fn test_filter_not_initialized() {
        let (rows, schema) = create_test_data();
        let mut filter = FilterExecutor::new(
            Box::new(MockExecutor::new(rows, schema)),
            Expression::is_null(path("id", TypeClass::Numeric)),
        );
        assert!(filter.next().is_err());
    }
}
