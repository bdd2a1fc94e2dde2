//! Schema catalog.
//!
//! The catalog is the explicit, static description of every entity type,
//! its fields and supertype link, plus the enum types fields may refer to.
//! It is built once at startup, validated, and shared read-only afterwards.

pub mod field_info;
pub mod resolver;
pub mod type_info;

use anyhow::{bail, Result};
use log::debug;
use std::collections::{HashMap, HashSet};

pub use field_info::{FieldInfo, FieldType, TypeClass};
pub use resolver::{FieldChain, FieldMetadata, SchemaResolver};
pub use type_info::{EnumInfo, TypeInfo};

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    types: HashMap<String, TypeInfo>,
    enums: HashMap<String, EnumInfo>,
}

impl Catalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    pub fn get_type(&self, name: &str) -> Option<&TypeInfo> {
        self.types.get(name)
    }

    pub fn get_enum(&self, name: &str) -> Option<&EnumInfo> {
        self.enums.get(name)
    }

    /// Entity type names in sorted order
    pub fn list_types(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Find a field on a type, walking the supertype chain.
    ///
    /// Returns the type that declares the field together with the field.
    pub fn find_field(&self, type_name: &str, field: &str) -> Option<(&TypeInfo, &FieldInfo)> {
        let mut current = self.types.get(type_name);
        while let Some(info) = current {
            if let Some(found) = info.get_field(field) {
                return Some((info, found));
            }
            current = info
                .supertype
                .as_deref()
                .and_then(|name| self.types.get(name));
        }
        None
    }

    /// Every field visible on a type, own fields after inherited ones
    pub fn all_fields(&self, type_name: &str) -> Vec<&FieldInfo> {
        let mut chain = Vec::new();
        let mut current = self.types.get(type_name);
        while let Some(info) = current {
            chain.push(info);
            current = info
                .supertype
                .as_deref()
                .and_then(|name| self.types.get(name));
        }
        chain
            .into_iter()
            .rev()
            .flat_map(|info| info.fields.iter())
            .collect()
    }
}

/// Collects type descriptors and validates them into a [`Catalog`]
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    types: Vec<TypeInfo>,
    enums: Vec<EnumInfo>,
}

impl CatalogBuilder {
    pub fn entity(mut self, info: TypeInfo) -> Self {
        self.types.push(info);
        self
    }

    pub fn enumeration(mut self, info: EnumInfo) -> Self {
        self.enums.push(info);
        self
    }

    pub fn build(self) -> Result<Catalog> {
        let mut catalog = Catalog::default();

        for info in self.enums {
            if catalog.enums.contains_key(&info.name) {
                bail!("Enum '{}' is declared twice", info.name);
            }
            catalog.enums.insert(info.name.clone(), info);
        }
        for info in self.types {
            if catalog.types.contains_key(&info.name) || catalog.enums.contains_key(&info.name) {
                bail!("Type '{}' is declared twice", info.name);
            }
            catalog.types.insert(info.name.clone(), info);
        }

        for info in catalog.types.values() {
            if let Some(supertype) = &info.supertype {
                if !catalog.types.contains_key(supertype) {
                    bail!(
                        "Type '{}' extends unknown type '{}'",
                        info.name,
                        supertype
                    );
                }
            }
            for field in &info.fields {
                catalog.check_references(&info.name, &field.name, &field.field_type)?;
            }
        }

        for name in catalog.types.keys() {
            let mut seen = HashSet::new();
            let mut current = Some(name.as_str());
            while let Some(type_name) = current {
                if !seen.insert(type_name) {
                    bail!("Supertype cycle detected at type '{}'", type_name);
                }
                current = catalog
                    .types
                    .get(type_name)
                    .and_then(|info| info.supertype.as_deref());
            }
        }

        debug!(
            "Catalog built with {} entity types and {} enum types",
            catalog.types.len(),
            catalog.enums.len()
        );
        Ok(catalog)
    }
}

impl Catalog {
    fn check_references(&self, owner: &str, field: &str, field_type: &FieldType) -> Result<()> {
        match field_type {
            FieldType::Entity(name) if !self.types.contains_key(name) => {
                bail!(
                    "Field '{}.{}' refers to unknown entity type '{}'",
                    owner,
                    field,
                    name
                )
            }
            FieldType::Enum(name) if !self.enums.contains_key(name) => {
                bail!(
                    "Field '{}.{}' refers to unknown enum type '{}'",
                    owner,
                    field,
                    name
                )
            }
            other => match other.element_type() {
                Some(element) => self.check_references(owner, field, element),
                None => Ok(()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::NumericWidth;

    fn vehicle_catalog() -> Result<Catalog> {
        Catalog::builder()
            .entity(TypeInfo::new("BaseEntity").field("id", FieldType::Numeric(NumericWidth::Int64)))
            .entity(
                TypeInfo::new("Car")
                    .extends("BaseEntity")
                    .field("name", FieldType::String)
                    .field("engine", FieldType::entity("Engine")),
            )
            .entity(
                TypeInfo::new("Engine")
                    .extends("BaseEntity")
                    .field("kind", FieldType::enumeration("Kind")),
            )
            .enumeration(EnumInfo::new("Kind", ["PETROL", "DIESEL"]))
            .build()
    }

    #[test]
    fn test_find_field_walks_supertypes() -> Result<()> {
        let catalog = vehicle_catalog()?;

        let (owner, field) = catalog.find_field("Car", "name").unwrap();
        assert_eq!(owner.name, "Car");
        assert_eq!(field.field_type, FieldType::String);

        let (owner, field) = catalog.find_field("Car", "id").unwrap();
        assert_eq!(owner.name, "BaseEntity");
        assert_eq!(field.field_type, FieldType::Numeric(NumericWidth::Int64));

        assert!(catalog.find_field("Car", "colour").is_none());
        assert!(catalog.find_field("Boat", "id").is_none());
        Ok(())
    }

    #[test]
    fn test_all_fields_and_listing() -> Result<()> {
        let catalog = vehicle_catalog()?;
        let names: Vec<&str> = catalog
            .all_fields("Car")
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["id", "name", "engine"]);
        assert_eq!(catalog.list_types(), vec!["BaseEntity", "Car", "Engine"]);
        assert!(catalog.get_enum("Kind").is_some());
        Ok(())
    }

    #[test]
    fn test_unknown_supertype_rejected() {
        let result = Catalog::builder()
            .entity(TypeInfo::new("Car").extends("Vehicle"))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_references_rejected() {
        let result = Catalog::builder()
            .entity(TypeInfo::new("Car").field("parts", FieldType::list_of(FieldType::entity("Part"))))
            .build();
        assert!(result.is_err());

        let result = Catalog::builder()
            .entity(TypeInfo::new("Car").field("kind", FieldType::enumeration("Kind")))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_supertype_cycle_rejected() {
        let result = Catalog::builder()
            .entity(TypeInfo::new("A").extends("B"))
            .entity(TypeInfo::new("B").extends("A"))
            .build();
        let err = result.unwrap_err();
        assert!(err.to_string().contains("cycle"));
    }

    #[test]
    fn test_duplicate_type_rejected() {
        let result = Catalog::builder()
            .entity(TypeInfo::new("Car"))
            .entity(TypeInfo::new("Car"))
            .build();
        assert!(result.is_err());
    }
}
