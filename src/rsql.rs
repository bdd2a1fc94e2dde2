//! RSQL/FIQL filter grammar.
//!
//! Turns a filter string such as `name==Car1;engine.screws.size=gt=5` into
//! the comparison/logical node tree consumed by the predicate compiler.
//! Operators are only checked for shape here; alias lookup is left to the
//! compiler so that custom operators need no parser changes.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::{LogicalKind, Node};
pub use lexer::Lexer;
pub use parser::Parser;
pub use token::Token;

use crate::expression::ExpressionResult;

/// Parse a filter string into its node tree
pub fn parse(input: &str) -> ExpressionResult<Node> {
    Parser::new(input)?.parse()
}
