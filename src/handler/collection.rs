//! List, set and generic collection fields.
//!
//! Paths through a collection fan out over its elements unless the selector
//! segment carries an index. Literals are coerced by the handler of the
//! declared element type, or kept raw when the element type is unknown.

use crate::catalog::{FieldMetadata, FieldType, TypeClass};
use crate::expression::{ComparisonOperator, Expression, ExpressionResult, SchemaPath};
use crate::handler::{base_expression, CoercionContext, TypeHandler, TypedValue};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    List,
    Set,
    /// Any collection that is neither a list nor a set
    Generic,
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionKind::List => write!(f, "list"),
            CollectionKind::Set => write!(f, "set"),
            CollectionKind::Generic => write!(f, "collection"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CollectionHandler {
    kind: CollectionKind,
}

impl CollectionHandler {
    pub fn new(kind: CollectionKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> CollectionKind {
        self.kind
    }
}

impl TypeHandler for CollectionHandler {
    fn name(&self) -> &str {
        match self.kind {
            CollectionKind::List => "list",
            CollectionKind::Set => "set",
            CollectionKind::Generic => "collection",
        }
    }

    fn supports(&self, field_type: &FieldType) -> bool {
        matches!(
            (self.kind, field_type),
            (CollectionKind::List, FieldType::List(_))
                | (CollectionKind::Set, FieldType::Set(_))
                | (CollectionKind::Generic, FieldType::Collection(_))
        )
    }

    fn build_path(&self, metadata: &FieldMetadata, parent: &SchemaPath) -> SchemaPath {
        let element_class = metadata
            .element_type()
            .map_or(TypeClass::Composite, FieldType::classification);
        let collection = parent.property(&metadata.name, TypeClass::Composite);
        match metadata.index {
            Some(index) => collection.index(index, element_class),
            None => collection.any(element_class),
        }
    }

    fn coerce(
        &self,
        values: &[String],
        metadata: &FieldMetadata,
        ctx: &CoercionContext<'_>,
    ) -> ExpressionResult<TypedValue> {
        match metadata.element_of() {
            Some(element) => ctx
                .handlers
                .lookup(&element.field_type)?
                .coerce(values, &element, ctx),
            None => Ok(TypedValue::from_strings(values)),
        }
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
