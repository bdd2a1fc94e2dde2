//! Numeric fields.
//!
//! Literals are parsed as `i64` unless they carry a fraction or exponent
//! or overflow `i64` on a float field, then narrowed to the declared width. A literal that does not fit the
//! field is a parse error rather than a silently truncated value.

use crate::access::{NumericWidth, Value};
use crate::catalog::{FieldMetadata, FieldType};
use crate::expression::{
    BuiltinOperator, ComparisonOperator, Expression, ExpressionResult, SchemaPath,
};
use crate::handler::{
    base_expression, coerce_each, parse_error, CoercionContext, TypeHandler, TypedValue,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct NumericHandler;

fn looks_fractional(literal: &str) -> bool {
    literal.contains(['.', 'e', 'E'])
}

fn narrow(literal: &str, width: NumericWidth, metadata: &FieldMetadata) -> ExpressionResult<Value> {
    let literal = literal.trim();
    if !looks_fractional(literal) {
        match literal.parse::<i64>() {
            Ok(n) => return narrow_integer(literal, n, width, metadata),
            Err(e) if width.is_integral() => {
                return Err(parse_error(literal, metadata, format!("{}", e)))
            }
            // Whole numbers past i64 still fit a float field
            Err(_) => {}
        }
    }

    let n: f64 = literal
        .parse()
        .map_err(|e| parse_error(literal, metadata, format!("{}", e)))?;
    if !n.is_finite() {
        return Err(parse_error(literal, metadata, "number is not finite"));
    }
    // i64::MAX as f64 rounds up to 2^63, which is already out of range
    match width {
        NumericWidth::Float64 => Ok(Value::Float64(n)),
        NumericWidth::Float32 if n.abs() <= f32::MAX as f64 => Ok(Value::Float32(n as f32)),
        NumericWidth::Float32 => Err(parse_error(literal, metadata, "out of range for f32")),
        _ if n.fract() != 0.0 => Err(parse_error(
            literal,
            metadata,
            format!("fractional value for {} field", width.as_str()),
        )),
        _ if n >= i64::MIN as f64 && n < i64::MAX as f64 => {
            narrow_integer(literal, n as i64, width, metadata)
        }
        _ => Err(parse_error(
            literal,
            metadata,
            format!("out of range for {}", width.as_str()),
        )),
    }
}

fn narrow_integer(
    literal: &str,
    n: i64,
    width: NumericWidth,
    metadata: &FieldMetadata,
) -> ExpressionResult<Value> {
    let out_of_range = |_| parse_error(literal, metadata, format!("out of range for {}", width.as_str()));
    Ok(match width {
        NumericWidth::Int8 => Value::Int8(i8::try_from(n).map_err(out_of_range)?),
        NumericWidth::Int16 => Value::Int16(i16::try_from(n).map_err(out_of_range)?),
        NumericWidth::Int32 => Value::Int32(i32::try_from(n).map_err(out_of_range)?),
        NumericWidth::Int64 => Value::Int64(n),
        NumericWidth::Float32 => Value::Float32(n as f32),
        NumericWidth::Float64 => Value::Float64(n as f64),
    })
}

/// Ordering comparisons shared by the numeric and date handlers
pub(crate) fn ordering_expression(
    path: &SchemaPath,
    value: &TypedValue,
    operator: &ComparisonOperator,
) -> Option<Expression> {
    let target = Expression::path(path.clone());
    let literal = Expression::literal(value.as_single()?.clone());
    if *operator == BuiltinOperator::Greater {
        Some(Expression::gt(target, literal))
    } else if *operator == BuiltinOperator::GreaterOrEquals {
        Some(Expression::ge(target, literal))
    } else if *operator == BuiltinOperator::LessThan {
        Some(Expression::lt(target, literal))
    } else if *operator == BuiltinOperator::LessThanOrEquals {
        Some(Expression::le(target, literal))
    } else {
        None
    }
}

impl TypeHandler for NumericHandler {
    fn name(&self) -> &str {
        "numeric"
    }

    fn supports(&self, field_type: &FieldType) -> bool {
        matches!(field_type, FieldType::Numeric(_))
    }

    fn coerce(
        &self,
        values: &[String],
        metadata: &FieldMetadata,
        _ctx: &CoercionContext<'_>,
    ) -> ExpressionResult<TypedValue> {
        let width = match metadata.field_type {
            FieldType::Numeric(width) => width,
            _ => NumericWidth::Float64,
        };
        coerce_each(values, |literal| narrow(literal, width, metadata))
    }

    fn build_expression(
        &self,
        path: &SchemaPath,
        value: &TypedValue,
        operator: &ComparisonOperator,
    ) -> Option<Expression> {
        ordering_expression(path, value, operator)
            .or_else(|| base_expression(path, value, operator))
    }
}
