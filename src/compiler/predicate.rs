//! Filter compilation.
//!
//! Each comparison goes through operator lookup, selector resolution, path
//! building, literal coercion and finally predicate construction by the
//! handler of the leaf field. Logical nodes fold their children left to right.

use crate::catalog::SchemaResolver;
use crate::compiler::build_path_chain;
use crate::config::QueryConfig;
use crate::expression::{CompilationError, Expression, ExpressionError, ExpressionResult};
use crate::rsql::{self, LogicalKind, Node};
use log::debug;

pub struct PredicateCompiler<'a> {
    config: &'a QueryConfig,
    root: &'a str,
}

impl<'a> PredicateCompiler<'a> {
    /// Compiler for filters on the entity type `root`
    pub fn new(config: &'a QueryConfig, root: &'a str) -> Self {
        Self { config, root }
    }

    /// Parse and compile a filter string
    pub fn compile_str(&self, filter: &str) -> Result<Expression, CompilationError> {
        let node = rsql::parse(filter)?;
        let predicate = self.compile(&node)?;
        debug!("Compiled filter '{}' on {} to {}", filter, self.root, predicate);
        Ok(predicate)
    }

    pub fn compile(&self, node: &Node) -> Result<Expression, CompilationError> {
        match node {
            Node::Comparison {
                selector,
                operator,
                arguments,
            } => self
                .compile_comparison(selector, operator, arguments)
                .map_err(|e| CompilationError::at(e, selector.as_str(), operator.as_str(), arguments)),
            Node::Logical { kind, children } => {
                let (first, rest) = children.split_first().ok_or_else(|| {
                    ExpressionError::InvalidArgument(format!("{:?} node without children", kind))
                })?;
                let mut predicate = self.compile(first)?;
                for child in rest {
                    let next = self.compile(child)?;
                    predicate = match kind {
                        LogicalKind::And => Expression::and(predicate, next),
                        LogicalKind::Or => Expression::or(predicate, next),
                    };
                }
                Ok(predicate)
            }
        }
    }

    fn compile_comparison(
        &self,
        selector: &str,
        symbol: &str,
        arguments: &[String],
    ) -> ExpressionResult<Expression> {
        let operator = self.config.operators().lookup(symbol)?;

        let resolver = SchemaResolver::new(self.config.catalog());
        let chain = resolver.resolve(self.root, selector)?;
        let handlers = self.config.handlers();
        let path = build_path_chain(&chain, handlers)?;

        let leaf = chain.leaf();
        let handler = handlers.lookup(&leaf.field_type)?;
        let value = handler.coerce(arguments, leaf, &self.config.coercion_context())?;

        handler
            .build_expression(&path, &value, operator)
            .ok_or_else(|| ExpressionError::PredicateBuild {
                selector: selector.to_string(),
                operator: symbol.to_string(),
                arguments: arguments.to_vec(),
            })
    }
}
