//! Field information and declared field types.

use crate::access::NumericWidth;
use std::fmt;

/// Classification tag used to pick path kinds and comparison rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeClass {
    String,
    Character,
    Numeric,
    Boolean,
    DateTime,
    Enum,
    Composite,
}

/// Declared type of an entity field
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    String,
    Char,
    Boolean,
    Numeric(NumericWidth),
    /// Calendar date, stored as midnight of that day
    Date,
    DateTime,
    /// Enum type by name
    Enum(String),
    /// Single-valued relation to another entity type
    Entity(String),
    List(Option<Box<FieldType>>),
    Set(Option<Box<FieldType>>),
    /// Collection that is neither a list nor a set
    Collection(Option<Box<FieldType>>),
    /// Opaque application type, only reachable by custom handlers or the catch-all
    Custom(String),
}

impl FieldType {
    pub fn list_of(element: FieldType) -> Self {
        FieldType::List(Some(Box::new(element)))
    }

    pub fn set_of(element: FieldType) -> Self {
        FieldType::Set(Some(Box::new(element)))
    }

    pub fn entity(name: impl Into<String>) -> Self {
        FieldType::Entity(name.into())
    }

    pub fn enumeration(name: impl Into<String>) -> Self {
        FieldType::Enum(name.into())
    }

    pub fn classification(&self) -> TypeClass {
        match self {
            FieldType::String => TypeClass::String,
            FieldType::Char => TypeClass::Character,
            FieldType::Boolean => TypeClass::Boolean,
            FieldType::Numeric(_) => TypeClass::Numeric,
            FieldType::Date | FieldType::DateTime => TypeClass::DateTime,
            FieldType::Enum(_) => TypeClass::Enum,
            FieldType::Entity(_)
            | FieldType::List(_)
            | FieldType::Set(_)
            | FieldType::Collection(_)
            | FieldType::Custom(_) => TypeClass::Composite,
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(
            self,
            FieldType::List(_) | FieldType::Set(_) | FieldType::Collection(_)
        )
    }

    /// Declared element type of a collection
    pub fn element_type(&self) -> Option<&FieldType> {
        match self {
            FieldType::List(element) | FieldType::Set(element) | FieldType::Collection(element) => {
                element.as_deref()
            }
            _ => None,
        }
    }

    /// Name of the entity a selector continues into after this type
    pub fn navigable_entity(&self) -> Option<&str> {
        match self {
            FieldType::Entity(name) => Some(name),
            other => match other.element_type() {
                Some(FieldType::Entity(name)) => Some(name),
                _ => None,
            },
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::String => write!(f, "String"),
            FieldType::Char => write!(f, "Char"),
            FieldType::Boolean => write!(f, "Boolean"),
            FieldType::Numeric(width) => write!(f, "{}", width.as_str()),
            FieldType::Date => write!(f, "Date"),
            FieldType::DateTime => write!(f, "DateTime"),
            FieldType::Enum(name) | FieldType::Entity(name) | FieldType::Custom(name) => {
                write!(f, "{}", name)
            }
            FieldType::List(element) => fmt_collection(f, "List", element),
            FieldType::Set(element) => fmt_collection(f, "Set", element),
            FieldType::Collection(element) => fmt_collection(f, "Collection", element),
        }
    }
}

fn fmt_collection(
    f: &mut fmt::Formatter<'_>,
    kind: &str,
    element: &Option<Box<FieldType>>,
) -> fmt::Result {
    match element {
        Some(element) => write!(f, "{}<{}>", kind, element),
        None => write!(f, "{}", kind),
    }
}

/// A named field declared on an entity type
#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
    pub name: String,
    pub field_type: FieldType,
}

impl FieldInfo {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert_eq!(FieldType::String.classification(), TypeClass::String);
        assert_eq!(FieldType::Char.classification(), TypeClass::Character);
        assert_eq!(
            FieldType::Numeric(NumericWidth::Int32).classification(),
            TypeClass::Numeric
        );
        assert_eq!(FieldType::Date.classification(), TypeClass::DateTime);
        assert_eq!(
            FieldType::enumeration("ScrewType").classification(),
            TypeClass::Enum
        );
        assert_eq!(
            FieldType::list_of(FieldType::String).classification(),
            TypeClass::Composite
        );
    }

    #[test]
    fn test_collection_element() {
        let screws = FieldType::list_of(FieldType::entity("Screw"));
        assert!(screws.is_collection());
        assert_eq!(screws.element_type(), Some(&FieldType::entity("Screw")));
        assert_eq!(screws.navigable_entity(), Some("Screw"));

        let raw = FieldType::Collection(None);
        assert!(raw.is_collection());
        assert_eq!(raw.element_type(), None);
        assert_eq!(raw.navigable_entity(), None);

        assert!(!FieldType::entity("Engine").is_collection());
        assert_eq!(FieldType::entity("Engine").navigable_entity(), Some("Engine"));
        assert_eq!(FieldType::String.navigable_entity(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            FieldType::list_of(FieldType::entity("Screw")).to_string(),
            "List<Screw>"
        );
        assert_eq!(FieldType::Set(None).to_string(), "Set");
        assert_eq!(FieldType::Numeric(NumericWidth::Int64).to_string(), "i64");
    }
}
