//! Type handlers.
//!
//! A handler knows how to address, coerce and compare the values of one
//! family of field types. The registry keeps handlers in precedence order
//! and dispatches by first match: caller handlers first, then the built-ins
//! (string, character, numeric, date/time, boolean, list, set, collection,
//! enum) and finally the catch-all base handler that accepts every type.

pub mod base;
pub mod boolean;
pub mod character;
pub mod collection;
pub mod date;
pub mod enumeration;
pub mod numeric;
pub mod string;

use crate::access::Value;
use crate::catalog::{Catalog, FieldMetadata, FieldType};
use crate::expression::{
    BuiltinOperator, ComparisonOperator, Expression, ExpressionError, ExpressionResult,
    SchemaPath,
};
use log::trace;
use std::fmt;
use std::sync::Arc;

pub use base::BaseHandler;
pub use boolean::BooleanHandler;
pub use character::CharacterHandler;
pub use collection::{CollectionHandler, CollectionKind};
pub use date::DateHandler;
pub use enumeration::EnumHandler;
pub use numeric::NumericHandler;
pub use string::StringHandler;

/// Coerced comparison argument: one value, or an ordered list for several literals
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Single(Value),
    List(Vec<Value>),
}

impl TypedValue {
    /// One value becomes `Single`, anything else a `List`
    pub fn from_values(mut values: Vec<Value>) -> Self {
        if values.len() == 1 {
            TypedValue::Single(values.remove(0))
        } else {
            TypedValue::List(values)
        }
    }

    /// Raw literals kept as strings
    pub fn from_strings(values: &[String]) -> Self {
        Self::from_values(values.iter().map(|s| Value::String(s.clone())).collect())
    }

    pub fn as_single(&self) -> Option<&Value> {
        match self {
            TypedValue::Single(value) => Some(value),
            TypedValue::List(_) => None,
        }
    }

    /// Every value in order; a single value is a one-element list
    pub fn to_list(&self) -> Vec<Value> {
        match self {
            TypedValue::Single(value) => vec![value.clone()],
            TypedValue::List(values) => values.clone(),
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Single(value) => write!(f, "{}", value),
            TypedValue::List(values) => write!(f, "{}", Value::List(values.clone())),
        }
    }
}

/// Read-only state a handler may consult while coercing literals
#[derive(Clone, Copy)]
pub struct CoercionContext<'a> {
    /// chrono `strftime` pattern for date literals
    pub date_format: Option<&'a str>,
    pub handlers: &'a HandlerRegistry,
    pub catalog: &'a Catalog,
}

/// Type-specific path building, literal coercion and predicate construction
pub trait TypeHandler: Send + Sync {
    /// Short name for logs and diagnostics
    fn name(&self) -> &str;

    fn supports(&self, field_type: &FieldType) -> bool;

    /// Extend `parent` with the segment described by `metadata`
    fn build_path(&self, metadata: &FieldMetadata, parent: &SchemaPath) -> SchemaPath {
        parent.property(&metadata.name, metadata.classification())
    }

    /// Convert raw literals into typed values for the field
    fn coerce(
        &self,
        values: &[String],
        metadata: &FieldMetadata,
        ctx: &CoercionContext<'_>,
    ) -> ExpressionResult<TypedValue>;

    /// Build the predicate, or `None` when the operator has no rule for this type
    fn build_expression(
        &self,
        path: &SchemaPath,
        value: &TypedValue,
        operator: &ComparisonOperator,
    ) -> Option<Expression>;
}

/// Coerce every literal with `convert`, mapping an empty literal to NULL
pub fn coerce_each<F>(values: &[String], mut convert: F) -> ExpressionResult<TypedValue>
where
    F: FnMut(&str) -> ExpressionResult<Value>,
{
    let converted = values
        .iter()
        .map(|literal| {
            if literal.is_empty() {
                Ok(Value::Null)
            } else {
                convert(literal)
            }
        })
        .collect::<ExpressionResult<Vec<_>>>()?;
    Ok(TypedValue::from_values(converted))
}

pub(crate) fn parse_error(literal: &str, metadata: &FieldMetadata, reason: impl Into<String>) -> ExpressionError {
    ExpressionError::ValueParse {
        literal: literal.to_string(),
        field: metadata.name.clone(),
        reason: reason.into(),
    }
}

/// Rules every handler falls back to: equality, membership and NULL checks
pub fn base_expression(
    path: &SchemaPath,
    value: &TypedValue,
    operator: &ComparisonOperator,
) -> Option<Expression> {
    let target = Expression::path(path.clone());
    if *operator == BuiltinOperator::Equals {
        match value.as_single()? {
            Value::Null => Some(Expression::is_null(target)),
            v => Some(Expression::eq(target, Expression::literal(v.clone()))),
        }
    } else if *operator == BuiltinOperator::NotEquals {
        match value.as_single()? {
            Value::Null => Some(Expression::is_not_null(target)),
            v => Some(Expression::ne(target, Expression::literal(v.clone()))),
        }
    } else if *operator == BuiltinOperator::In {
        Some(Expression::in_list(target, value.to_list()))
    } else if *operator == BuiltinOperator::NotIn {
        Some(Expression::not_in_list(target, value.to_list()))
    } else if *operator == BuiltinOperator::IsNull {
        Some(Expression::is_null(target))
    } else if *operator == BuiltinOperator::IsNotNull {
        Some(Expression::is_not_null(target))
    } else {
        None
    }
}

/// Ordered handler list with first-match dispatch
#[derive(Clone)]
pub struct HandlerRegistry {
    handlers: Vec<Arc<dyn TypeHandler>>,
}

impl HandlerRegistry {
    /// Registry holding the built-in handlers, catch-all last
    pub fn new() -> Self {
        let handlers: Vec<Arc<dyn TypeHandler>> = vec![
            Arc::new(StringHandler),
            Arc::new(CharacterHandler),
            Arc::new(NumericHandler),
            Arc::new(DateHandler),
            Arc::new(BooleanHandler),
            Arc::new(CollectionHandler::new(CollectionKind::List)),
            Arc::new(CollectionHandler::new(CollectionKind::Set)),
            Arc::new(CollectionHandler::new(CollectionKind::Generic)),
            Arc::new(EnumHandler),
            Arc::new(BaseHandler),
        ];
        Self { handlers }
    }

    /// Registry without any handler, not even the catch-all
    pub fn empty() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Built-ins preceded by `custom`, which keeps its order
    pub fn with_custom(custom: Vec<Arc<dyn TypeHandler>>) -> Self {
        let mut registry = Self::new();
        registry.prepend(custom);
        registry
    }

    /// Insert handlers ahead of every handler already registered
    pub fn prepend(&mut self, handlers: Vec<Arc<dyn TypeHandler>>) {
        self.handlers.splice(0..0, handlers);
    }

    /// First handler that supports the type
    pub fn lookup(&self, field_type: &FieldType) -> ExpressionResult<&dyn TypeHandler> {
        let handler = self
            .handlers
            .iter()
            .find(|handler| handler.supports(field_type))
            .ok_or_else(|| ExpressionError::TypeNotSupported {
                type_name: field_type.to_string(),
            })?;
        trace!("Type {} handled by {}", field_type, handler.name());
        Ok(handler.as_ref())
    }

    pub fn names(&self) -> Vec<&str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::NumericWidth;
    use crate::catalog::TypeClass;

    struct Shouting;

    impl TypeHandler for Shouting {
        fn name(&self) -> &str {
            "shouting"
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
            Ok(TypedValue::from_values(
                values.iter().map(|v| Value::String(v.to_uppercase())).collect(),
            ))
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

    #[test]
    fn test_builtin_order_and_catch_all() -> ExpressionResult<()> {
        let registry = HandlerRegistry::new();
        assert_eq!(
            registry.names(),
            vec![
                "string",
                "character",
                "numeric",
                "date",
                "boolean",
                "list",
                "set",
                "collection",
                "enum",
                "base"
            ]
        );

        assert_eq!(registry.lookup(&FieldType::String)?.name(), "string");
        assert_eq!(
            registry.lookup(&FieldType::Numeric(NumericWidth::Int8))?.name(),
            "numeric"
        );
        assert_eq!(registry.lookup(&FieldType::DateTime)?.name(), "date");
        assert_eq!(
            registry.lookup(&FieldType::list_of(FieldType::String))?.name(),
            "list"
        );
        assert_eq!(registry.lookup(&FieldType::Set(None))?.name(), "set");
        assert_eq!(registry.lookup(&FieldType::Collection(None))?.name(), "collection");
        assert_eq!(registry.lookup(&FieldType::enumeration("ScrewType"))?.name(), "enum");
        assert_eq!(registry.lookup(&FieldType::entity("Engine"))?.name(), "base");
        assert_eq!(registry.lookup(&FieldType::Custom("Uuid".into()))?.name(), "base");
        Ok(())
    }

    #[test]
    fn test_custom_handler_takes_precedence() -> ExpressionResult<()> {
        let registry = HandlerRegistry::with_custom(vec![Arc::new(Shouting)]);
        assert_eq!(registry.len(), 11);
        assert_eq!(registry.lookup(&FieldType::String)?.name(), "shouting");
        assert_eq!(registry.lookup(&FieldType::Char)?.name(), "character");
        Ok(())
    }

    #[test]
    fn test_prepend_keeps_caller_order() {
        let mut registry = HandlerRegistry::new();
        registry.prepend(vec![Arc::new(Shouting), Arc::new(BaseHandler)]);
        assert_eq!(&registry.names()[..3], &["shouting", "base", "string"]);
    }

    #[test]
    fn test_empty_registry() {
        let registry = HandlerRegistry::empty();
        assert!(registry.is_empty());
        assert!(matches!(
            registry.lookup(&FieldType::String),
            Err(ExpressionError::TypeNotSupported { .. })
        ));
    }

    #[test]
    fn test_typed_value() {
        let single = TypedValue::from_values(vec![Value::Int64(1)]);
        assert_eq!(single, TypedValue::Single(Value::Int64(1)));
        assert_eq!(single.to_list(), vec![Value::Int64(1)]);

        let list = TypedValue::from_strings(&["a".to_string(), "b".to_string()]);
        assert!(list.as_single().is_none());
        assert_eq!(list.to_string(), "('a', 'b')");
    }

    #[test]
    fn test_coerce_each_maps_empty_to_null() -> ExpressionResult<()> {
        let values = vec!["".to_string(), "x".to_string()];
        let typed = coerce_each(&values, |s| Ok(Value::from(s)))?;
        assert_eq!(typed, TypedValue::List(vec![Value::Null, Value::from("x")]));
        Ok(())
    }

    #[test]
    fn test_base_expression_rules() {
        let path = SchemaPath::root("Car").property("id", TypeClass::Numeric);
        let one = TypedValue::Single(Value::Int64(1));
        let op = |b: BuiltinOperator| ComparisonOperator::from(b);

        let expr = base_expression(&path, &one, &op(BuiltinOperator::Equals)).unwrap();
        assert_eq!(expr.to_string(), "(car.id = 1)");

        let expr = base_expression(&path, &TypedValue::Single(Value::Null), &op(BuiltinOperator::Equals)).unwrap();
        assert_eq!(expr.to_string(), "car.id IS NULL");

        let expr = base_expression(&path, &one, &op(BuiltinOperator::In)).unwrap();
        assert_eq!(expr.to_string(), "car.id IN (1)");

        let expr = base_expression(&path, &one, &op(BuiltinOperator::IsNotNull)).unwrap();
        assert_eq!(expr.to_string(), "car.id IS NOT NULL");

        let pair = TypedValue::List(vec![Value::Int64(1), Value::Int64(2)]);
        assert!(base_expression(&path, &pair, &op(BuiltinOperator::Equals)).is_none());
        assert!(base_expression(&path, &one, &op(BuiltinOperator::Like)).is_none());
        assert!(base_expression(&path, &one, &ComparisonOperator::new("=custom=")).is_none());
    }
}
