//! Selector resolution.
//!
//! A selector such as `engine.screws[0].name` is resolved segment by segment
//! against the catalog. Each segment yields one [`FieldMetadata`] node; the
//! nodes live in a [`FieldChain`] arena and refer to their parent by index.

use crate::catalog::{Catalog, FieldType, TypeClass};
use crate::expression::{ExpressionError, ExpressionResult};
use log::trace;

/// Resolved metadata for one selector segment
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMetadata {
    /// Segment name, without any index suffix
    pub name: String,
    /// Element index carried by the segment, e.g. `screws[2]`
    pub index: Option<usize>,
    pub field_type: FieldType,
    /// Type that declares the field (may be a supertype of the resolved type)
    pub owner: String,
    /// Position of the parent node in the owning chain
    pub parent: Option<usize>,
}

impl FieldMetadata {
    pub fn new(name: impl Into<String>, field_type: FieldType, owner: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            index: None,
            field_type,
            owner: owner.into(),
            parent: None,
        }
    }

    pub fn is_collection(&self) -> bool {
        self.field_type.is_collection()
    }

    pub fn element_type(&self) -> Option<&FieldType> {
        self.field_type.element_type()
    }

    pub fn classification(&self) -> TypeClass {
        self.field_type.classification()
    }

    /// Metadata describing one element of a collection field.
    ///
    /// Used when element values are coerced by the element type's handler.
    pub fn element_of(&self) -> Option<FieldMetadata> {
        self.element_type().map(|element| FieldMetadata {
            name: self.name.clone(),
            index: None,
            field_type: element.clone(),
            owner: self.owner.clone(),
            parent: self.parent,
        })
    }
}

/// Ordered metadata nodes for one selector, root segment first
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChain {
    selector: String,
    root: String,
    nodes: Vec<FieldMetadata>,
}

impl FieldChain {
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Root entity type the selector was resolved against
    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[FieldMetadata] {
        &self.nodes
    }

    /// Last segment of the selector. A resolved chain is never empty.
    pub fn leaf(&self) -> &FieldMetadata {
        &self.nodes[self.nodes.len() - 1]
    }

    pub fn parent_of(&self, node: &FieldMetadata) -> Option<&FieldMetadata> {
        node.parent.and_then(|i| self.nodes.get(i))
    }
}

/// Resolves selectors against a catalog snapshot
pub struct SchemaResolver<'a> {
    catalog: &'a Catalog,
}

impl<'a> SchemaResolver<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    pub fn resolve(&self, root: &str, selector: &str) -> ExpressionResult<FieldChain> {
        if self.catalog.get_type(root).is_none() {
            return Err(ExpressionError::EntityNotFound(root.to_string()));
        }
        if selector.trim().is_empty() {
            return Err(invalid(selector, "selector is empty"));
        }

        let mut nodes: Vec<FieldMetadata> = Vec::new();
        let mut current = root.to_string();

        for (position, segment) in selector.split('.').enumerate() {
            let (name, index) = parse_segment(selector, segment)?;

            if position > 0 {
                let previous = &nodes[position - 1];
                current = match previous.field_type.navigable_entity() {
                    Some(entity) => entity.to_string(),
                    None => {
                        return Err(ExpressionError::FieldResolution {
                            selector: selector.to_string(),
                            owner: previous.field_type.to_string(),
                            segment: name.to_string(),
                        })
                    }
                };
            }

            let (owner, field) = self.catalog.find_field(&current, name).ok_or_else(|| {
                ExpressionError::FieldResolution {
                    selector: selector.to_string(),
                    owner: current.clone(),
                    segment: name.to_string(),
                }
            })?;

            if index.is_some() && !field.field_type.is_collection() {
                return Err(invalid(
                    selector,
                    &format!("segment '{}' is not a collection and can't be indexed", name),
                ));
            }

            trace!(
                "Resolved segment '{}' of '{}' to {} declared on {}",
                name,
                selector,
                field.field_type,
                owner.name
            );

            nodes.push(FieldMetadata {
                name: name.to_string(),
                index,
                field_type: field.field_type.clone(),
                owner: owner.name.clone(),
                parent: position.checked_sub(1),
            });
        }

        Ok(FieldChain {
            selector: selector.to_string(),
            root: root.to_string(),
            nodes,
        })
    }
}

fn invalid(selector: &str, reason: &str) -> ExpressionError {
    ExpressionError::InvalidSelector {
        selector: selector.to_string(),
        reason: reason.to_string(),
    }
}

/// Split `name[N]` into its name and optional index
fn parse_segment<'s>(selector: &str, segment: &'s str) -> ExpressionResult<(&'s str, Option<usize>)> {
    let (name, index) = match segment.find('[') {
        Some(open) => {
            let digits = segment[open + 1..]
                .strip_suffix(']')
                .ok_or_else(|| invalid(selector, &format!("unclosed index in '{}'", segment)))?;
            let index = digits
                .parse::<usize>()
                .map_err(|_| invalid(selector, &format!("bad index '{}' in '{}'", digits, segment)))?;
            (&segment[..open], Some(index))
        }
        None => (segment, None),
    };

    if name.is_empty() {
        return Err(invalid(selector, "empty segment"));
    }
    if !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(invalid(selector, &format!("bad segment '{}'", segment)));
    }
    Ok((name, index))
}
