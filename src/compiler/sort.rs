//! Sort string compilation.
//!
//! Accepts `(path.dir,path.dir,...)` with optional parentheses, where `dir`
//! is `asc` or `desc` in any case. A path given twice keeps its last
//! direction, and the resulting specifications come out ordered by selector
//! rather than by their position in the input. Paths must yield one value
//! per row, so a collection segment needs an explicit `[N]` index.

use crate::catalog::SchemaResolver;
use crate::compiler::{build_path_chain, unwrap_parens};
use crate::config::QueryConfig;
use crate::expression::{CompilationError, ExpressionError, ExpressionResult, SchemaPath};
use log::debug;
use std::collections::BTreeMap;
use std::fmt;

/// Sort order for a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    fn parse(direction: &str) -> Option<Self> {
        if direction.eq_ignore_ascii_case("asc") {
            Some(SortOrder::Asc)
        } else if direction.eq_ignore_ascii_case("desc") {
            Some(SortOrder::Desc)
        } else {
            None
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "ASC"),
            SortOrder::Desc => write!(f, "DESC"),
        }
    }
}

/// One ordering key
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSpec {
    pub path: SchemaPath,
    pub order: SortOrder,
}

impl OrderSpec {
    pub fn new(path: SchemaPath, order: SortOrder) -> Self {
        Self { path, order }
    }

    pub fn asc(path: SchemaPath) -> Self {
        Self::new(path, SortOrder::Asc)
    }

    pub fn desc(path: SchemaPath) -> Self {
        Self::new(path, SortOrder::Desc)
    }
}

impl fmt::Display for OrderSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.path, self.order)
    }
}

pub struct SortCompiler<'a> {
    config: &'a QueryConfig,
    root: &'a str,
}

impl<'a> SortCompiler<'a> {
    pub fn new(config: &'a QueryConfig, root: &'a str) -> Self {
        Self { config, root }
    }

    pub fn compile_str(&self, sort: &str) -> Result<Vec<OrderSpec>, CompilationError> {
        let compact: String = sort.chars().filter(|c| !c.is_whitespace()).collect();
        let body = unwrap_parens(&compact);

        let mut keys: BTreeMap<&str, SortOrder> = BTreeMap::new();
        for entry in body.split(',').filter(|entry| !entry.is_empty()) {
            let (selector, order) = split_entry(entry)?;
            keys.insert(selector, order);
        }

        let resolver = SchemaResolver::new(self.config.catalog());
        let specs = keys
            .into_iter()
            .map(|(selector, order)| {
                let chain = resolver.resolve(self.root, selector)?;
                let path = build_path_chain(&chain, self.config.handlers())?;
                if path.is_multi_valued() {
                    return Err(ExpressionError::InvalidArgument(format!(
                        "cannot sort by '{}': it crosses a collection without an index",
                        selector
                    )));
                }
                Ok(OrderSpec::new(path, order))
            })
            .collect::<ExpressionResult<Vec<_>>>()?;

        debug!(
            "Compiled sort '{}' on {} to [{}]",
            sort,
            self.root,
            specs
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(specs)
    }
}

/// Split `path.dir` at its last dot
fn split_entry(entry: &str) -> ExpressionResult<(&str, SortOrder)> {
    let invalid = || {
        ExpressionError::InvalidArgument(format!(
            "sort entry '{}' must look like path.asc or path.desc",
            entry
        ))
    };
    let (selector, direction) = entry.rsplit_once('.').ok_or_else(invalid)?;
    if selector.is_empty() {
        return Err(invalid());
    }
    let order = SortOrder::parse(direction).ok_or_else(invalid)?;
    Ok((selector, order))
}
