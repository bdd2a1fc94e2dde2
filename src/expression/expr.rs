//! Compiled predicate tree.

use crate::access::Value;
use crate::expression::operator::{BinaryOperator, UnaryOperator};
use crate::expression::SchemaPath;
use std::fmt;

/// Literal value in an expression
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub value: Value,
}

impl Literal {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    pub fn null() -> Self {
        Self { value: Value::Null }
    }

    pub fn bool(val: bool) -> Self {
        Self {
            value: Value::Boolean(val),
        }
    }

    pub fn string(val: impl Into<String>) -> Self {
        Self {
            value: Value::String(val.into()),
        }
    }
}

/// Expression tree node
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Literal constant value
    Literal(Literal),

    /// Property reachable from the root entity
    Path(SchemaPath),

    /// Binary operation
    BinaryOp {
        op: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },

    /// Unary operation
    UnaryOp {
        op: UnaryOperator,
        operand: Box<Expression>,
    },

    /// Membership in a literal list
    In {
        expr: Box<Expression>,
        list: Vec<Value>,
        negated: bool,
    },
}

impl Expression {
    /// Create a literal expression
    pub fn literal(value: Value) -> Self {
        Expression::Literal(Literal::new(value))
    }

    /// Create a path expression
    pub fn path(path: SchemaPath) -> Self {
        Expression::Path(path)
    }

    /// Create a binary operation expression
    pub fn binary_op(op: BinaryOperator, left: Expression, right: Expression) -> Self {
        Expression::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Create a unary operation expression
    pub fn unary_op(op: UnaryOperator, operand: Expression) -> Self {
        Expression::UnaryOp {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn and(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::And, left, right)
    }

    pub fn or(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Or, left, right)
    }

    pub fn not_expr(operand: Expression) -> Self {
        Self::unary_op(UnaryOperator::Not, operand)
    }

    pub fn eq(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Eq, left, right)
    }

    pub fn ne(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Ne, left, right)
    }

    pub fn lt(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Lt, left, right)
    }

    pub fn le(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Le, left, right)
    }

    pub fn gt(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Gt, left, right)
    }

    pub fn ge(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Ge, left, right)
    }

    /// SQL LIKE with `%` and `_` wildcards
    pub fn like(left: Expression, pattern: Expression) -> Self {
        Self::binary_op(BinaryOperator::Like, left, pattern)
    }

    pub fn starts_with(left: Expression, prefix: Expression) -> Self {
        Self::binary_op(BinaryOperator::StartsWith, left, prefix)
    }

    pub fn ends_with(left: Expression, suffix: Expression) -> Self {
        Self::binary_op(BinaryOperator::EndsWith, left, suffix)
    }

    pub fn contains(left: Expression, needle: Expression) -> Self {
        Self::binary_op(BinaryOperator::Contains, left, needle)
    }

    pub fn is_null(operand: Expression) -> Self {
        Self::unary_op(UnaryOperator::IsNull, operand)
    }

    pub fn is_not_null(operand: Expression) -> Self {
        Self::unary_op(UnaryOperator::IsNotNull, operand)
    }

    pub fn is_empty(operand: Expression) -> Self {
        Self::unary_op(UnaryOperator::IsEmpty, operand)
    }

    pub fn is_not_empty(operand: Expression) -> Self {
        Self::unary_op(UnaryOperator::IsNotEmpty, operand)
    }

    pub fn is_true(operand: Expression) -> Self {
        Self::unary_op(UnaryOperator::IsTrue, operand)
    }

    pub fn is_false(operand: Expression) -> Self {
        Self::unary_op(UnaryOperator::IsFalse, operand)
    }

    pub fn lower(operand: Expression) -> Self {
        Self::unary_op(UnaryOperator::Lower, operand)
    }

    pub fn in_list(expr: Expression, list: Vec<Value>) -> Self {
        Expression::In {
            expr: Box::new(expr),
            list,
            negated: false,
        }
    }

    pub fn not_in_list(expr: Expression, list: Vec<Value>) -> Self {
        Expression::In {
            expr: Box::new(expr),
            list,
            negated: true,
        }
    }

    /// Check if this expression is a constant (contains no paths)
    pub fn is_constant(&self) -> bool {
        match self {
            Expression::Literal(_) => true,
            Expression::Path(_) => false,
            Expression::BinaryOp { left, right, .. } => left.is_constant() && right.is_constant(),
            Expression::UnaryOp { operand, .. } => operand.is_constant(),
            Expression::In { expr, .. } => expr.is_constant(),
        }
    }

    /// Paths referenced anywhere in this expression, in visiting order
    pub fn paths(&self) -> Vec<&SchemaPath> {
        let mut out = Vec::new();
        self.collect_paths(&mut out);
        out
    }

    fn collect_paths<'a>(&'a self, out: &mut Vec<&'a SchemaPath>) {
        match self {
            Expression::Literal(_) => {}
            Expression::Path(path) => out.push(path),
            Expression::BinaryOp { left, right, .. } => {
                left.collect_paths(out);
                right.collect_paths(out);
            }
            Expression::UnaryOp { operand, .. } => operand.collect_paths(out),
            Expression::In { expr, .. } => expr.collect_paths(out),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(lit) => write!(f, "{}", lit.value),
            Expression::Path(path) => write!(f, "{}", path),
            Expression::BinaryOp { op, left, right } => {
                write!(f, "({} {} {})", left, op.as_str(), right)
            }
            Expression::UnaryOp { op, operand } => match op {
                UnaryOperator::Lower => write!(f, "LOWER({})", operand),
                op if op.is_postfix() => write!(f, "{} {}", operand, op.as_str()),
                op => write!(f, "{} {}", op.as_str(), operand),
            },
            Expression::In {
                expr,
                list,
                negated,
            } => {
                let keyword = if *negated { "NOT IN" } else { "IN" };
                write!(f, "{} {} {}", expr, keyword, Value::List(list.clone()))
            }
        }
    }
}
