//! Entity and enum type descriptors.

use crate::catalog::field_info::{FieldInfo, FieldType};

/// Description of one entity type: its own fields and an optional supertype
#[derive(Debug, Clone, PartialEq)]
pub struct TypeInfo {
    pub name: String,
    pub supertype: Option<String>,
    pub fields: Vec<FieldInfo>,
}

impl TypeInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            supertype: None,
            fields: Vec::new(),
        }
    }

    pub fn extends(mut self, supertype: impl Into<String>) -> Self {
        self.supertype = Some(supertype.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.push(FieldInfo::new(name, field_type));
        self
    }

    /// Field declared directly on this type (supertypes not searched)
    pub fn get_field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// An enum type and its constant names
#[derive(Debug, Clone, PartialEq)]
pub struct EnumInfo {
    pub name: String,
    pub constants: Vec<String>,
}

impl EnumInfo {
    pub fn new<I, S>(name: impl Into<String>, constants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            constants: constants.into_iter().map(Into::into).collect(),
        }
    }

    /// Case-sensitive constant lookup
    pub fn contains(&self, constant: &str) -> bool {
        self.constants.iter().any(|c| c == constant)
    }
}
