use crate::access::Value;
use crate::catalog::{FieldMetadata, FieldType};
use crate::expression::{
    BuiltinOperator, ComparisonOperator, Expression, ExpressionResult, SchemaPath,
};
use crate::handler::{
    base_expression, coerce_each, parse_error, CoercionContext, TypeHandler, TypedValue,
};

/// Boolean fields. Only `true` and `false` are accepted, in any case.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanHandler;

impl TypeHandler for BooleanHandler {
    fn name(&self) -> &str {
        "boolean"
    }

    fn supports(&self, field_type: &FieldType) -> bool {
        *field_type == FieldType::Boolean
    }

    fn coerce(
        &self,
        values: &[String],
        metadata: &FieldMetadata,
        _ctx: &CoercionContext<'_>,
    ) -> ExpressionResult<TypedValue> {
        coerce_each(values, |literal| {
            if literal.eq_ignore_ascii_case("true") {
                Ok(Value::Boolean(true))
            } else if literal.eq_ignore_ascii_case("false") {
                Ok(Value::Boolean(false))
            } else {
                Err(parse_error(literal, metadata, "expected true or false"))
            }
        })
    }

    fn build_expression(
        &self,
        path: &SchemaPath,
        value: &TypedValue,
        operator: &ComparisonOperator,
    ) -> Option<Expression> {
        if *operator == BuiltinOperator::IsTrue {
            Some(Expression::is_true(Expression::path(path.clone())))
        } else if *operator == BuiltinOperator::IsFalse {
            Some(Expression::is_false(Expression::path(path.clone())))
        } else {
            base_expression(path, value, operator)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, TypeClass};
    use crate::expression::ExpressionError;
    use crate::handler::HandlerRegistry;

    #[test]
    fn test_coercion() -> ExpressionResult<()> {
        let catalog = Catalog::default();
        let handlers = HandlerRegistry::new();
        let ctx = CoercionContext {
            date_format: None,
            handlers: &handlers,
            catalog: &catalog,
        };
        let metadata = FieldMetadata::new("active", FieldType::Boolean, "Car");
        let coerce = |literal: &str| BooleanHandler.coerce(&[literal.to_string()], &metadata, &ctx);

        assert_eq!(coerce("TRUE")?, TypedValue::Single(Value::Boolean(true)));
        assert_eq!(coerce("false")?, TypedValue::Single(Value::Boolean(false)));
        assert_eq!(coerce("")?, TypedValue::Single(Value::Null));
        assert!(matches!(coerce("yes"), Err(ExpressionError::ValueParse { .. })));
        assert!(matches!(coerce("1"), Err(ExpressionError::ValueParse { .. })));
        Ok(())
    }

    #[test]
    fn test_truth_operators() {
        let path = SchemaPath::root("Car").property("active", TypeClass::Boolean);
        let value = TypedValue::Single(Value::Null);

        let expr = BooleanHandler
            .build_expression(&path, &value, &BuiltinOperator::IsTrue.into())
            .unwrap();
        assert_eq!(expr.to_string(), "car.active IS TRUE");

        let expr = BooleanHandler
            .build_expression(&path, &value, &BuiltinOperator::IsFalse.into())
            .unwrap();
        assert_eq!(expr.to_string(), "car.active IS FALSE");

        let expr = BooleanHandler
            .build_expression(
                &path,
                &TypedValue::Single(Value::Boolean(true)),
                &BuiltinOperator::Equals.into(),
            )
            .unwrap();
        assert_eq!(expr.to_string(), "(car.active = true)");
    }
}
