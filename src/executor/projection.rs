//! Projection executor implementation.
//!
//! Turns whole records from the child into tuples holding one value per
//! projected expression. Paths name their column after the last property;
//! any other expression is named by its rendering.

use crate::executor::{ColumnInfo, Executor, Row};
use crate::expression::{Expression, ExpressionEvaluator};
use anyhow::{bail, Context, Result};

/// Executor that projects expressions over child records
pub struct ProjectionExecutor {
    /// Child executor that produces records
    child: Box<dyn Executor>,
    /// Expressions evaluated for each record, in output order
    expressions: Vec<Expression>,
    /// Output schema (one column per expression)
    output_schema: Vec<ColumnInfo>,
    /// Whether the executor has been initialized
    initialized: bool,
}

impl ProjectionExecutor {
    /// Create a new projection executor
    ///
    /// # Arguments
    /// * `child` - The child executor that produces records
    /// * `expressions` - Column expressions in output order
    pub fn new(child: Box<dyn Executor>, expressions: Vec<Expression>) -> Self {
        Self {
            child,
            expressions,
            output_schema: Vec::new(),
            initialized: false,
        }
    }

    fn column_name(expr: &Expression) -> String {
        match expr {
            Expression::Path(path) => path.leaf_name().to_string(),
            other => other.to_string(),
        }
    }
}

impl Executor for ProjectionExecutor {
    fn init(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }

        self.child.init()?;

        if self.expressions.is_empty() {
            bail!("Projection requires at least one expression");
        }

        self.output_schema = self
            .expressions
            .iter()
            .map(|expr| ColumnInfo::new(Self::column_name(expr)))
            .collect();

        self.initialized = true;
        Ok(())
    }

    fn next(&mut self) -> Result<Option<Row>> {
        if !self.initialized {
            bail!("Executor not initialized. Call init() first.");
        }

        let Some(row) = self.child.next()? else {
            return Ok(None);
        };
        let Some(record) = row.as_record() else {
            bail!("Projection expects whole records, got an already projected row");
        };

        let evaluator = ExpressionEvaluator::new(record);
        let values = self
            .expressions
            .iter()
            .map(|expr| {
                evaluator
                    .project(expr)
                    .with_context(|| format!("Failed to project {}", expr))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Some(Row::Tuple(values)))
    }

    fn output_schema(&self) -> &[ColumnInfo] {
        &self.output_schema
    }
}
