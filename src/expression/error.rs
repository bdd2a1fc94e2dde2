//! Error types for predicate compilation and evaluation.

use thiserror::Error;

/// Errors raised while resolving, coercing, compiling or evaluating a query
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpressionError {
    /// Selector segment not found on the resolved type or its supertypes
    #[error("Can't resolve field '{segment}' on type {owner} (selector '{selector}')")]
    FieldResolution {
        selector: String,
        owner: String,
        segment: String,
    },

    /// Selector is malformed or indexes a non-collection segment
    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// No handler accepts the field type
    #[error("Type is not supported: {type_name}")]
    TypeNotSupported { type_name: String },

    /// Custom operator alias fails the operator symbol grammar
    #[error("Invalid operator symbol: '{symbol}'")]
    IllegalOperatorSyntax { symbol: String },

    /// Literal can't be coerced to the field type
    #[error("Can't parse value '{literal}' for field '{field}': {reason}")]
    ValueParse {
        literal: String,
        field: String,
        reason: String,
    },

    /// Operator alias has no registered mapping
    #[error("Unknown operator: {symbol}")]
    UnknownOperator { symbol: String },

    /// Resolved handler has no rule for this operator
    #[error(
        "Can't build predicate with selector: {selector} operator: {operator} value: [{}]",
        .arguments.join(", ")
    )]
    PredicateBuild {
        selector: String,
        operator: String,
        arguments: Vec<String>,
    },

    /// Filter text could not be parsed
    #[error("Syntax error at position {position}: {message}")]
    Syntax { position: usize, message: String },

    /// Malformed sort, select, limit or page argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Can't find entity with name: {0}")]
    EntityNotFound(String),

    /// Operands of an evaluated operator have incompatible kinds
    #[error("Invalid operand types for operator {operator}: left={left}, right={right}")]
    InvalidOperandTypes {
        operator: String,
        left: String,
        right: String,
    },
}

/// Result type for expression operations
pub type ExpressionResult<T> = Result<T, ExpressionError>;

/// Top-level compilation failure.
///
/// Wraps the underlying cause together with the comparison that was being
/// compiled when it happened, if any.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Query compilation failed: {source}")]
pub struct CompilationError {
    pub selector: Option<String>,
    pub operator: Option<String>,
    pub arguments: Vec<String>,
    #[source]
    pub source: ExpressionError,
}

impl CompilationError {
    pub fn new(source: ExpressionError) -> Self {
        Self {
            selector: None,
            operator: None,
            arguments: Vec::new(),
            source,
        }
    }

    /// Attach the comparison being compiled
    pub fn at(
        source: ExpressionError,
        selector: impl Into<String>,
        operator: impl Into<String>,
        arguments: &[String],
    ) -> Self {
        Self {
            selector: Some(selector.into()),
            operator: Some(operator.into()),
            arguments: arguments.to_vec(),
            source,
        }
    }

    pub fn kind(&self) -> &ExpressionError {
        &self.source
    }
}

impl From<ExpressionError> for CompilationError {
    fn from(source: ExpressionError) -> Self {
        Self::new(source)
    }
}
