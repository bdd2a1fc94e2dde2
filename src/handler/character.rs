use crate::access::Value;
use crate::catalog::{FieldMetadata, FieldType};
use crate::expression::{ComparisonOperator, Expression, ExpressionResult, SchemaPath};
use crate::handler::{base_expression, coerce_each, CoercionContext, TypeHandler, TypedValue};

/// Single-character fields; a literal contributes its first character
#[derive(Debug, Clone, Copy, Default)]
pub struct CharacterHandler;

impl TypeHandler for CharacterHandler {
    fn name(&self) -> &str {
        "character"
    }

    fn supports(&self, field_type: &FieldType) -> bool {
        *field_type == FieldType::Char
    }

    fn coerce(
        &self,
        values: &[String],
        _metadata: &FieldMetadata,
        _ctx: &CoercionContext<'_>,
    ) -> ExpressionResult<TypedValue> {
        coerce_each(values, |literal| {
            Ok(literal.chars().next().map_or(Value::Null, Value::Char))
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
