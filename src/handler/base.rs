//! Catch-all handler.

use crate::catalog::{FieldMetadata, FieldType};
use crate::expression::{ComparisonOperator, Expression, ExpressionResult, SchemaPath};
use crate::handler::{base_expression, CoercionContext, TypeHandler, TypedValue};

/// Accepts every field type; literals stay raw strings
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseHandler;

impl TypeHandler for BaseHandler {
    fn name(&self) -> &str {
        "base"
    }

    fn supports(&self, _field_type: &FieldType) -> bool {
        true
    }

    fn coerce(
        &self,
        values: &[String],
        _metadata: &FieldMetadata,
        _ctx: &CoercionContext<'_>,
    ) -> ExpressionResult<TypedValue> {
        Ok(TypedValue::from_strings(values))
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Value;
    use crate::catalog::{Catalog, TypeClass};
    use crate::expression::BuiltinOperator;
    use crate::handler::HandlerRegistry;

    #[test]
    fn test_supports_everything() {
        for field_type in [
            FieldType::String,
            FieldType::entity("Engine"),
            FieldType::Custom("Uuid".to_string()),
            FieldType::Collection(None),
        ] {
            assert!(BaseHandler.supports(&field_type));
        }
    }

    #[test]
    fn test_raw_coercion_and_equality() -> ExpressionResult<()> {
        let catalog = Catalog::default();
        let handlers = HandlerRegistry::new();
        let ctx = CoercionContext {
            date_format: None,
            handlers: &handlers,
            catalog: &catalog,
        };
        let metadata = FieldMetadata::new("code", FieldType::Custom("Uuid".into()), "Part");

        let value = BaseHandler.coerce(&["abc-1".to_string()], &metadata, &ctx)?;
        assert_eq!(value, TypedValue::Single(Value::from("abc-1")));

        let path = SchemaPath::root("Part").property("code", TypeClass::Composite);
        let expr = BaseHandler
            .build_expression(&path, &value, &BuiltinOperator::Equals.into())
            .unwrap();
        assert_eq!(expr.to_string(), "(part.code = 'abc-1')");

        assert!(BaseHandler
            .build_expression(&path, &value, &BuiltinOperator::Greater.into())
            .is_none());
        Ok(())
    }
}
