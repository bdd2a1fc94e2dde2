//! Schema paths: typed addresses of nested properties.

use crate::catalog::TypeClass;
use std::fmt;

/// One navigation step below the root alias
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathStep {
    /// Named property of the current record
    Property(String),
    /// Every element of the current collection
    Any,
    /// One element of the current collection
    Index(usize),
}

/// Address of a value reachable from a root entity, e.g. `car.engine.screws[*].name`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaPath {
    root: String,
    steps: Vec<PathStep>,
    class: TypeClass,
}

impl SchemaPath {
    /// Root path for an entity type. The alias is the lower-cased type name.
    pub fn root(entity: &str) -> Self {
        Self {
            root: entity.to_lowercase(),
            steps: Vec::new(),
            class: TypeClass::Composite,
        }
    }

    /// Child path addressing a property of this path
    pub fn property(&self, name: impl Into<String>, class: TypeClass) -> Self {
        let mut steps = self.steps.clone();
        steps.push(PathStep::Property(name.into()));
        Self {
            root: self.root.clone(),
            steps,
            class,
        }
    }

    /// Fan out over every element of the collection this path addresses
    pub fn any(mut self, element_class: TypeClass) -> Self {
        self.steps.push(PathStep::Any);
        self.class = element_class;
        self
    }

    /// Address one element of the collection this path addresses
    pub fn index(mut self, index: usize, element_class: TypeClass) -> Self {
        self.steps.push(PathStep::Index(index));
        self.class = element_class;
        self
    }

    pub fn alias(&self) -> &str {
        &self.root
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    pub fn class(&self) -> TypeClass {
        self.class
    }

    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }

    /// Name of the last property step, used as a projection column name
    pub fn leaf_name(&self) -> &str {
        self.steps
            .iter()
            .rev()
            .find_map(|step| match step {
                PathStep::Property(name) => Some(name.as_str()),
                _ => None,
            })
            .unwrap_or(&self.root)
    }

    /// Whether evaluating this path may yield more than one value
    pub fn is_multi_valued(&self) -> bool {
        self.steps.iter().any(|step| matches!(step, PathStep::Any))
    }
}

impl fmt::Display for SchemaPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)?;
        for step in &self.steps {
            match step {
                PathStep::Property(name) => write!(f, ".{}", name)?,
                PathStep::Any => write!(f, "[*]")?,
                PathStep::Index(i) => write!(f, "[{}]", i)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_alias() {
        let root = SchemaPath::root("Car");
        assert_eq!(root.alias(), "car");
        assert!(root.is_root());
        assert_eq!(root.to_string(), "car");
        assert_eq!(root.leaf_name(), "car");
    }

    #[test]
    fn test_nested_path() {
        let path = SchemaPath::root("Car")
            .property("engine", TypeClass::Composite)
            .property("screws", TypeClass::Composite)
            .any(TypeClass::Composite)
            .property("name", TypeClass::String);

        assert_eq!(path.to_string(), "car.engine.screws[*].name");
        assert_eq!(path.steps().len(), 4);
        assert_eq!(path.class(), TypeClass::String);
        assert_eq!(path.leaf_name(), "name");
        assert!(path.is_multi_valued());
    }

    #[test]
    fn test_indexed_path() {
        let path = SchemaPath::root("Car")
            .property("screws", TypeClass::Composite)
            .index(2, TypeClass::Composite)
            .property("size", TypeClass::Numeric);

        assert_eq!(path.to_string(), "car.screws[2].size");
        assert!(!path.is_multi_valued());
    }

    #[test]
    fn test_property_does_not_mutate_parent() {
        let parent = SchemaPath::root("Car");
        let child = parent.property("name", TypeClass::String);
        assert!(parent.is_root());
        assert_eq!(child.steps(), &[PathStep::Property("name".to_string())]);
    }
}
