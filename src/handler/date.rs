//! Date and date-time fields.
//!
//! A configured chrono pattern takes precedence. Without one the handler
//! tries a fixed list of common layouts, then RFC 3339, and finally treats
//! the literal as epoch milliseconds.

use crate::access::Value;
use crate::catalog::{FieldMetadata, FieldType};
use crate::expression::{
    BuiltinOperator, ComparisonOperator, Expression, ExpressionResult, SchemaPath,
};
use crate::handler::numeric::ordering_expression;
use crate::handler::{
    base_expression, coerce_each, parse_error, CoercionContext, TypeHandler, TypedValue,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

const FALLBACK_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const FALLBACK_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y"];

#[derive(Debug, Clone, Copy, Default)]
pub struct DateHandler;

fn parse_with(literal: &str, format: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(literal, format).ok().or_else(|| {
        NaiveDate::parse_from_str(literal, format)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    })
}

/// Parse a date literal into a timestamp
pub fn parse_date_time(literal: &str, format: Option<&str>) -> Option<NaiveDateTime> {
    let parsed = match format {
        Some(format) => parse_with(literal, format),
        None => FALLBACK_DATE_TIME_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(literal, format).ok())
            .or_else(|| {
                FALLBACK_DATE_FORMATS.iter().find_map(|format| {
                    NaiveDate::parse_from_str(literal, format)
                        .ok()
                        .and_then(|date| date.and_hms_opt(0, 0, 0))
                })
            })
            .or_else(|| {
                DateTime::parse_from_rfc3339(literal)
                    .ok()
                    .map(|dt| dt.naive_utc())
            }),
    };
    parsed.or_else(|| {
        literal
            .parse::<i64>()
            .ok()
            .and_then(DateTime::from_timestamp_millis)
            .map(|dt| dt.naive_utc())
    })
}

impl TypeHandler for DateHandler {
    fn name(&self) -> &str {
        "date"
    }

    fn supports(&self, field_type: &FieldType) -> bool {
        matches!(field_type, FieldType::Date | FieldType::DateTime)
    }

    fn coerce(
        &self,
        values: &[String],
        metadata: &FieldMetadata,
        ctx: &CoercionContext<'_>,
    ) -> ExpressionResult<TypedValue> {
        coerce_each(values, |literal| {
            let parsed = parse_date_time(literal.trim(), ctx.date_format).ok_or_else(|| {
                let reason = match ctx.date_format {
                    Some(format) => format!("does not match date format '{}'", format),
                    None => "not a recognised date or epoch milliseconds".to_string(),
                };
                parse_error(literal, metadata, reason)
            })?;
            Ok(Value::DateTime(parsed))
        })
    }

    fn build_expression(
        &self,
        path: &SchemaPath,
        value: &TypedValue,
        operator: &ComparisonOperator,
    ) -> Option<Expression> {
        let target = || Expression::path(path.clone());
        let literal = || value.as_single().map(|v| Expression::literal(v.clone()));
        if *operator == BuiltinOperator::Before {
            Some(Expression::lt(target(), literal()?))
        } else if *operator == BuiltinOperator::After {
            Some(Expression::gt(target(), literal()?))
        } else {
            ordering_expression(path, value, operator)
                .or_else(|| base_expression(path, value, operator))
        }
    }
}
