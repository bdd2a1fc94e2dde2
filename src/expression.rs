//! Predicate expressions and the operator vocabulary.
//!
//! This module provides:
//! - Error kinds shared by every compilation stage
//! - Comparison operators, their aliases and the operator registry
//! - Schema paths addressing nested properties
//! - The compiled predicate tree and its evaluation against records

pub mod comparison;
pub mod error;
pub mod eval;
pub mod expr;
pub mod operator;
pub mod path;

pub use comparison::{validate_symbol, BuiltinOperator, ComparisonOperator, OperatorRegistry};
pub use error::{CompilationError, ExpressionError, ExpressionResult};
pub use eval::{evaluate_predicate, like_match, ExpressionEvaluator};
pub use expr::{Expression, Literal};
pub use operator::{BinaryOperator, UnaryOperator};
pub use path::{PathStep, SchemaPath};
