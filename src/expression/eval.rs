//! Expression evaluation against entity records.
//!
//! Paths are evaluated to a list of candidate values: one per reachable
//! value, several when the path fans out over a collection, none when the
//! traversal runs through a NULL relation or an empty collection. A
//! comparison holds when it holds for some candidate.
//!
//! Predicates use three-valued logic. `None` is UNKNOWN, which a filter
//! treats as not matching.

use crate::access::{Record, Value};
use crate::expression::{
    BinaryOperator, Expression, ExpressionError, ExpressionResult, PathStep, SchemaPath,
    UnaryOperator,
};
use std::cmp::Ordering;

/// Evaluator for expressions over one root record
pub struct ExpressionEvaluator<'a> {
    record: &'a Record,
}

impl<'a> ExpressionEvaluator<'a> {
    pub fn new(record: &'a Record) -> Self {
        Self { record }
    }

    /// Evaluate a boolean expression
    pub fn test(&self, expr: &Expression) -> ExpressionResult<Option<bool>> {
        match expr {
            Expression::BinaryOp { op, left, right } if op.is_logical() => {
                let l = self.test(left)?;
                let r = self.test(right)?;
                Ok(match op {
                    BinaryOperator::And => and3(l, r),
                    _ => or3(l, r),
                })
            }

            Expression::BinaryOp { op, left, right } => {
                let lefts = self.values(left)?;
                let rights = self.values(right)?;
                let mut result = None;
                let mut seen = false;
                for l in &lefts {
                    for r in &rights {
                        let outcome = compare_pair(*op, l, r)?;
                        result = if seen { or3(result, outcome) } else { outcome };
                        seen = true;
                    }
                }
                Ok(result)
            }

            Expression::UnaryOp {
                op: UnaryOperator::Not,
                operand,
            } => Ok(self.test(operand)?.map(|b| !b)),

            Expression::UnaryOp {
                op: UnaryOperator::Lower,
                ..
            } => Err(ExpressionError::InvalidOperandTypes {
                operator: UnaryOperator::Lower.as_str().to_string(),
                left: "string".to_string(),
                right: "boolean".to_string(),
            }),

            Expression::UnaryOp { op, operand } => {
                let candidates = self.values(operand)?;
                any_of(candidates.iter().map(|v| unary_check(*op, v)))
            }

            Expression::In {
                expr,
                list,
                negated,
            } => {
                let candidates = self.values(expr)?;
                any_of(candidates.iter().map(|v| {
                    if v.is_null() {
                        return Ok(None);
                    }
                    let found = list
                        .iter()
                        .any(|item| v.compare(item) == Some(Ordering::Equal));
                    Ok(Some(found != *negated))
                }))
            }

            Expression::Literal(lit) => match &lit.value {
                Value::Boolean(b) => Ok(Some(*b)),
                Value::Null => Ok(None),
                other => Err(not_boolean(other)),
            },

            Expression::Path(_) => {
                let candidates = self.values(expr)?;
                any_of(candidates.iter().map(|v| match v {
                    Value::Boolean(b) => Ok(Some(*b)),
                    Value::Null => Ok(None),
                    other => Err(not_boolean(other)),
                }))
            }
        }
    }

    /// Evaluate an expression to its candidate values
    pub fn values(&self, expr: &Expression) -> ExpressionResult<Vec<Value>> {
        match expr {
            Expression::Literal(lit) => Ok(vec![lit.value.clone()]),
            Expression::Path(path) => Ok(self.resolve_path(path).into_iter().cloned().collect()),
            Expression::UnaryOp {
                op: UnaryOperator::Lower,
                operand,
            } => self
                .values(operand)?
                .into_iter()
                .map(lower)
                .collect(),
            other => {
                let value = match self.test(other)? {
                    Some(b) => Value::Boolean(b),
                    None => Value::Null,
                };
                Ok(vec![value])
            }
        }
    }

    /// Evaluate an expression to a single value for projection or sorting.
    ///
    /// No candidate yields NULL; several candidates yield a list.
    pub fn project(&self, expr: &Expression) -> ExpressionResult<Value> {
        let mut values = self.values(expr)?;
        Ok(match values.len() {
            0 => Value::Null,
            1 => values.remove(0),
            _ => Value::List(values),
        })
    }

    fn resolve_path(&self, path: &SchemaPath) -> Vec<&'a Value> {
        let mut current: Vec<Step<'a>> = vec![Step::Root(self.record)];
        for step in path.steps() {
            let mut next = Vec::new();
            for candidate in current {
                match (step, candidate.as_record()) {
                    (PathStep::Property(name), Some(record)) => {
                        next.push(Step::Value(record.get(name)))
                    }
                    (PathStep::Any, _) => {
                        if let Step::Value(Value::List(items)) = candidate {
                            next.extend(items.iter().map(Step::Value));
                        }
                    }
                    (PathStep::Index(i), _) => {
                        if let Step::Value(Value::List(items)) = candidate {
                            if let Some(item) = items.get(*i) {
                                next.push(Step::Value(item));
                            }
                        }
                    }
                    _ => {}
                }
            }
            current = next;
        }
        current
            .into_iter()
            .filter_map(|step| match step {
                Step::Value(value) => Some(value),
                Step::Root(_) => None,
            })
            .collect()
    }
}

#[derive(Clone, Copy)]
enum Step<'a> {
    Root(&'a Record),
    Value(&'a Value),
}

impl<'a> Step<'a> {
    fn as_record(&self) -> Option<&'a Record> {
        match *self {
            Step::Root(record) => Some(record),
            Step::Value(Value::Record(record)) => Some(record),
            Step::Value(_) => None,
        }
    }
}

/// Evaluate a predicate as a filter condition: UNKNOWN does not match
pub fn evaluate_predicate(expr: &Expression, record: &Record) -> ExpressionResult<bool> {
    Ok(ExpressionEvaluator::new(record).test(expr)? == Some(true))
}

fn and3(l: Option<bool>, r: Option<bool>) -> Option<bool> {
    match (l, r) {
        (Some(false), _) | (_, Some(false)) => Some(false),
        (Some(true), Some(true)) => Some(true),
        _ => None,
    }
}

fn or3(l: Option<bool>, r: Option<bool>) -> Option<bool> {
    match (l, r) {
        (Some(true), _) | (_, Some(true)) => Some(true),
        (Some(false), Some(false)) => Some(false),
        _ => None,
    }
}

/// OR over candidate outcomes; no candidates is UNKNOWN
fn any_of<I>(outcomes: I) -> ExpressionResult<Option<bool>>
where
    I: Iterator<Item = ExpressionResult<Option<bool>>>,
{
    let mut result = None;
    let mut seen = false;
    for outcome in outcomes {
        let outcome = outcome?;
        result = if seen { or3(result, outcome) } else { outcome };
        seen = true;
    }
    Ok(result)
}

fn unary_check(op: UnaryOperator, value: &Value) -> ExpressionResult<Option<bool>> {
    Ok(match op {
        UnaryOperator::IsNull => Some(value.is_null()),
        UnaryOperator::IsNotNull => Some(!value.is_null()),
        UnaryOperator::IsEmpty | UnaryOperator::IsNotEmpty => {
            let empty = match value {
                Value::Null => return Ok(None),
                Value::String(s) => s.is_empty(),
                Value::List(items) => items.is_empty(),
                other => {
                    return Err(ExpressionError::InvalidOperandTypes {
                        operator: op.as_str().to_string(),
                        left: other.kind().to_string(),
                        right: "none".to_string(),
                    })
                }
            };
            Some(empty == (op == UnaryOperator::IsEmpty))
        }
        UnaryOperator::IsTrue | UnaryOperator::IsFalse => match value {
            Value::Null => None,
            Value::Boolean(b) => Some(*b == (op == UnaryOperator::IsTrue)),
            other => return Err(not_boolean(other)),
        },
        UnaryOperator::Not | UnaryOperator::Lower => {
            return Err(ExpressionError::InvalidOperandTypes {
                operator: op.as_str().to_string(),
                left: value.kind().to_string(),
                right: "none".to_string(),
            })
        }
    })
}

fn compare_pair(op: BinaryOperator, left: &Value, right: &Value) -> ExpressionResult<Option<bool>> {
    if left.is_null() || right.is_null() {
        return Ok(None);
    }

    if op.is_string_match() {
        let (text, pattern) = match (string_view(left), string_view(right)) {
            (Some(text), Some(pattern)) => (text, pattern),
            _ => return Err(mismatch(op, left, right)),
        };
        return Ok(Some(match op {
            BinaryOperator::Like => like_match(&text, &pattern),
            BinaryOperator::StartsWith => text.starts_with(pattern.as_str()),
            BinaryOperator::EndsWith => text.ends_with(pattern.as_str()),
            _ => text.contains(pattern.as_str()),
        }));
    }

    let ordering = left
        .compare(right)
        .ok_or_else(|| mismatch(op, left, right))?;
    Ok(Some(match op {
        BinaryOperator::Eq => ordering == Ordering::Equal,
        BinaryOperator::Ne => ordering != Ordering::Equal,
        BinaryOperator::Lt => ordering == Ordering::Less,
        BinaryOperator::Le => ordering != Ordering::Greater,
        BinaryOperator::Gt => ordering == Ordering::Greater,
        BinaryOperator::Ge => ordering != Ordering::Less,
        _ => return Err(mismatch(op, left, right)),
    }))
}

fn string_view(value: &Value) -> Option<String> {
    match value {
        Value::String(s) | Value::Enum(s) => Some(s.clone()),
        Value::Char(c) => Some(c.to_string()),
        _ => None,
    }
}

fn lower(value: Value) -> ExpressionResult<Value> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::String(s) => Ok(Value::String(s.to_lowercase())),
        Value::Char(c) => Ok(Value::Char(c.to_lowercase().next().unwrap_or(c))),
        other => Err(ExpressionError::InvalidOperandTypes {
            operator: UnaryOperator::Lower.as_str().to_string(),
            left: other.kind().to_string(),
            right: "none".to_string(),
        }),
    }
}

fn mismatch(op: BinaryOperator, left: &Value, right: &Value) -> ExpressionError {
    ExpressionError::InvalidOperandTypes {
        operator: op.as_str().to_string(),
        left: left.kind().to_string(),
        right: right.kind().to_string(),
    }
}

fn not_boolean(value: &Value) -> ExpressionError {
    ExpressionError::InvalidOperandTypes {
        operator: "predicate".to_string(),
        left: value.kind().to_string(),
        right: "boolean".to_string(),
    }
}

/// SQL LIKE: `%` matches any run of characters, `_` exactly one
pub fn like_match(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();

    // matches[j]: pattern[..i] matches text[..j]
    let mut matches = vec![false; text.len() + 1];
    matches[0] = true;
    for p in &pattern {
        let mut next = vec![false; text.len() + 1];
        match p {
            '%' => {
                let mut any = false;
                for j in 0..=text.len() {
                    any |= matches[j];
                    next[j] = any;
                }
            }
            _ => {
                for j in 1..=text.len() {
                    next[j] = matches[j - 1] && (*p == '_' || *p == text[j - 1]);
                }
            }
        }
        matches = next;
    }
    matches[text.len()]
}
