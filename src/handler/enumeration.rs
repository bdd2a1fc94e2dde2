use crate::access::Value;
use crate::catalog::{FieldMetadata, FieldType};
use crate::expression::{ComparisonOperator, Expression, ExpressionResult, SchemaPath};
use crate::handler::{
    base_expression, coerce_each, parse_error, CoercionContext, TypeHandler, TypedValue,
};

/// Enum fields, matched case-sensitively against the catalog's constants
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumHandler;

impl TypeHandler for EnumHandler {
    fn name(&self) -> &str {
        "enum"
    }

    fn supports(&self, field_type: &FieldType) -> bool {
        matches!(field_type, FieldType::Enum(_))
    }

    fn coerce(
        &self,
        values: &[String],
        metadata: &FieldMetadata,
        ctx: &CoercionContext<'_>,
    ) -> ExpressionResult<TypedValue> {
        let enum_info = match &metadata.field_type {
            FieldType::Enum(name) => ctx.catalog.get_enum(name),
            _ => None,
        };
        coerce_each(values, |literal| match enum_info {
            Some(info) if info.contains(literal) => Ok(Value::Enum(literal.to_string())),
            Some(info) => Err(parse_error(
                literal,
                metadata,
                format!("not a constant of {}", info.name),
            )),
            None => Err(parse_error(
                literal,
                metadata,
                format!("unknown enum type {}", metadata.field_type),
            )),
        })
    }

    fn build_expression(
        &self,
        path: &SchemaPath,
        value: &TypedValue,
        operator: &ComparisonOperator,
    ) -> Option<Expression> {
        base_expression(path, value, operator)
    }
}
