//! Compilation settings.
//!
//! A [`QueryConfig`] bundles the catalog with the operator aliases, type
//! handlers and date format a compilation uses. It is immutable once built
//! and can be shared across threads behind an `Arc`.

use crate::catalog::Catalog;
use crate::expression::{CompilationError, ComparisonOperator, OperatorRegistry};
use crate::handler::{CoercionContext, HandlerRegistry, TypeHandler};
use log::debug;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct QueryConfig {
    catalog: Arc<Catalog>,
    date_format: Option<String>,
    operators: OperatorRegistry,
    handlers: HandlerRegistry,
}

impl QueryConfig {
    pub fn builder(catalog: Arc<Catalog>) -> QueryConfigBuilder {
        QueryConfigBuilder {
            catalog,
            date_format: None,
            operators: Vec::new(),
            handlers: Vec::new(),
        }
    }

    /// Built-in operators and handlers only
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            date_format: None,
            operators: OperatorRegistry::new(),
            handlers: HandlerRegistry::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn date_format(&self) -> Option<&str> {
        self.date_format.as_deref()
    }

    pub fn operators(&self) -> &OperatorRegistry {
        &self.operators
    }

    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    pub fn coercion_context(&self) -> CoercionContext<'_> {
        CoercionContext {
            date_format: self.date_format(),
            handlers: &self.handlers,
            catalog: &self.catalog,
        }
    }
}

pub struct QueryConfigBuilder {
    catalog: Arc<Catalog>,
    date_format: Option<String>,
    operators: Vec<ComparisonOperator>,
    handlers: Vec<Arc<dyn TypeHandler>>,
}

impl QueryConfigBuilder {
    /// chrono `strftime` pattern used for date literals
    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = Some(format.into());
        self
    }

    pub fn operator(mut self, operator: ComparisonOperator) -> Self {
        self.operators.push(operator);
        self
    }

    pub fn operators(mut self, operators: impl IntoIterator<Item = ComparisonOperator>) -> Self {
        self.operators.extend(operators);
        self
    }

    /// Custom handlers run before the built-ins, in registration order
    pub fn handler(mut self, handler: Arc<dyn TypeHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn handlers(mut self, handlers: impl IntoIterator<Item = Arc<dyn TypeHandler>>) -> Self {
        self.handlers.extend(handlers);
        self
    }

    pub fn build(self) -> Result<QueryConfig, CompilationError> {
        OperatorRegistry::validate(&self.operators)?;

        let mut operators = OperatorRegistry::new();
        operators.merge(&self.operators);

        let mut handlers = HandlerRegistry::new();
        handlers.prepend(self.handlers);

        debug!(
            "Query config: {} operator aliases, handlers {:?}",
            operators.symbols().len(),
            handlers.names()
        );

        Ok(QueryConfig {
            catalog: self.catalog,
            date_format: self.date_format,
            operators,
            handlers,
        })
    }
}
