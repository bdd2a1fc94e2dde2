//! String fields.

use crate::access::Value;
use crate::catalog::{FieldMetadata, FieldType};
use crate::expression::{
    BuiltinOperator, ComparisonOperator, Expression, ExpressionResult, SchemaPath,
};
use crate::handler::{base_expression, coerce_each, CoercionContext, TypeHandler, TypedValue};

#[derive(Debug, Clone, Copy, Default)]
pub struct StringHandler;

impl StringHandler {
    /// String matching rules shared with handlers that wrap this one.
    ///
    /// Ignore-case variants compare the lower-cased path with the
    /// lower-cased literal.
    pub fn string_expression(
        path: &SchemaPath,
        value: &TypedValue,
        operator: &ComparisonOperator,
    ) -> Option<Expression> {
        let target = || Expression::path(path.clone());
        let literal = || value.as_single().map(|v| Expression::literal(v.clone()));
        let lowered = || Expression::lower(target());
        let lowered_literal = || literal().map(Expression::lower);

        if *operator == BuiltinOperator::EqualsIgnoreCase {
            Some(Expression::eq(lowered(), lowered_literal()?))
        } else if *operator == BuiltinOperator::NotEqualsIgnoreCase {
            Some(Expression::ne(lowered(), lowered_literal()?))
        } else if *operator == BuiltinOperator::Like {
            Some(Expression::like(target(), literal()?))
        } else if *operator == BuiltinOperator::NotLike {
            Some(Expression::not_expr(Expression::like(target(), literal()?)))
        } else if *operator == BuiltinOperator::LikeIgnoreCase {
            Some(Expression::like(lowered(), lowered_literal()?))
        } else if *operator == BuiltinOperator::StartsWith {
            Some(Expression::starts_with(target(), literal()?))
        } else if *operator == BuiltinOperator::StartsWithIgnoreCase {
            Some(Expression::starts_with(lowered(), lowered_literal()?))
        } else if *operator == BuiltinOperator::EndsWith {
            Some(Expression::ends_with(target(), literal()?))
        } else if *operator == BuiltinOperator::EndsWithIgnoreCase {
            Some(Expression::ends_with(lowered(), lowered_literal()?))
        } else if *operator == BuiltinOperator::Contains {
            Some(Expression::contains(target(), literal()?))
        } else if *operator == BuiltinOperator::ContainsIgnoreCase {
            Some(Expression::contains(lowered(), lowered_literal()?))
        } else if *operator == BuiltinOperator::IsEmpty {
            Some(Expression::is_empty(target()))
        } else if *operator == BuiltinOperator::IsNotEmpty {
            Some(Expression::is_not_empty(target()))
        } else {
            None
        }
    }
}

impl TypeHandler for StringHandler {
    fn name(&self) -> &str {
        "string"
    }

    fn supports(&self, field_type: &FieldType) -> bool {
        *field_type == FieldType::String
    }

    fn coerce(
        &self,
        values: &[String],
        _metadata: &FieldMetadata,
        _ctx: &CoercionContext<'_>,
    ) -> ExpressionResult<TypedValue> {
        coerce_each(values, |literal| Ok(Value::from(literal)))
    }

    fn build_expression(
        &self,
        path: &SchemaPath,
        value: &TypedValue,
        operator: &ComparisonOperator,
    ) -> Option<Expression> {
        Self::string_expression(path, value, operator)
            .or_else(|| base_expression(path, value, operator))
    }
}
