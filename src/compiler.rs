//! Compilers from request strings to typed query parts.
//!
//! This module provides:
//! - The predicate compiler folding a filter node tree into one expression
//! - The sort compiler producing ordered path specifications
//! - The select compiler producing projection paths
//! - Limit and page pair parsing

pub mod paging;
pub mod predicate;
pub mod select;
pub mod sort;

pub use paging::{parse_pair, Window};
pub use predicate::PredicateCompiler;
pub use select::SelectCompiler;
pub use sort::{OrderSpec, SortCompiler, SortOrder};

use crate::catalog::FieldChain;
use crate::expression::{ExpressionResult, SchemaPath};
use crate::handler::HandlerRegistry;

/// Extend the root path segment by segment, each through its own type handler
pub fn build_path_chain(chain: &FieldChain, handlers: &HandlerRegistry) -> ExpressionResult<SchemaPath> {
    let mut path = SchemaPath::root(chain.root());
    for node in chain.nodes() {
        let handler = handlers.lookup(&node.field_type)?;
        path = handler.build_path(node, &path);
    }
    Ok(path)
}

/// Strip one pair of surrounding parentheses, if present
pub(crate) fn unwrap_parens(input: &str) -> &str {
    let trimmed = input.trim();
    trimmed
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SchemaResolver;
    use crate::fixtures;

    #[test]
    fn test_path_chain_through_relations() -> anyhow::Result<()> {
        let catalog = fixtures::catalog()?;
        let handlers = HandlerRegistry::new();
        let resolver = SchemaResolver::new(&catalog);

        let chain = resolver.resolve("Car", "engine.screws.name")?;
        let path = build_path_chain(&chain, &handlers)?;
        assert_eq!(path.to_string(), "car.engine.screws[*].name");

        let chain = resolver.resolve("Car", "screws[1].size")?;
        let path = build_path_chain(&chain, &handlers)?;
        assert_eq!(path.to_string(), "car.screws[1].size");
        Ok(())
    }

    #[test]
    fn test_unwrap_parens() {
        assert_eq!(unwrap_parens("(a,b)"), "a,b");
        assert_eq!(unwrap_parens(" a,b "), "a,b");
        assert_eq!(unwrap_parens("(a"), "(a");
    }
}
