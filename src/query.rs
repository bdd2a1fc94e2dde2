//! Query assembly.
//!
//! A staged builder walks select, from and where in that order, then takes
//! optional ordering and paging before compiling everything against a
//! [`QueryConfig`] into a [`QueryRequest`]:
//!
//! ```ignore
//! let request = Query::select("(name,description)")
//!     .from("Car")
//!     .filter("engine.screws.name=con='name'")
//!     .sort("(id.desc)")
//!     .page(1, 15)
//!     .build(&config)?;
//! ```

use crate::compiler::{OrderSpec, PredicateCompiler, SelectCompiler, SortCompiler, Window};
use crate::config::QueryConfig;
use crate::expression::{CompilationError, Expression, ExpressionError, SchemaPath};
use log::debug;
use std::fmt;

/// Result shape of a query
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// Whole root records
    Root,
    Paths(Vec<SchemaPath>),
    Expressions(Vec<Expression>),
}

impl Projection {
    /// Column expressions, or `None` for whole records
    pub fn expressions(&self) -> Option<Vec<Expression>> {
        match self {
            Projection::Root => None,
            Projection::Paths(paths) => Some(paths.iter().cloned().map(Expression::path).collect()),
            Projection::Expressions(exprs) => Some(exprs.clone()),
        }
    }
}

/// Everything the execution side needs to run one query
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub entity: String,
    pub predicate: Option<Expression>,
    pub projection: Projection,
    pub ordering: Vec<OrderSpec>,
    pub offset: Option<u64>,
    pub size: Option<u64>,
}

impl fmt::Display for QueryRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SELECT ")?;
        match self.projection.expressions() {
            None => write!(f, "*")?,
            Some(exprs) => {
                let columns: Vec<String> = exprs.iter().map(ToString::to_string).collect();
                write!(f, "{}", columns.join(", "))?;
            }
        }
        write!(f, " FROM {} {}", self.entity, self.entity.to_lowercase())?;
        if let Some(predicate) = &self.predicate {
            write!(f, " WHERE {}", predicate)?;
        }
        if !self.ordering.is_empty() {
            let keys: Vec<String> = self.ordering.iter().map(ToString::to_string).collect();
            write!(f, " ORDER BY {}", keys.join(", "))?;
        }
        if let Some(size) = self.size {
            write!(f, " LIMIT {}", size)?;
        }
        if let Some(offset) = self.offset {
            write!(f, " OFFSET {}", offset)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum SelectInput {
    Root,
    Text(String),
    Expressions(Vec<Expression>),
}

#[derive(Debug, Clone)]
enum FilterInput {
    None,
    Text(String),
    Compiled(Expression),
}

#[derive(Debug, Clone)]
enum SortInput {
    Text(String),
    Compiled(Vec<OrderSpec>),
}

#[derive(Debug, Clone)]
enum WindowInput {
    Limit(String),
    Page(String),
    PageNumber(u64, u64),
    Resolved(Window),
}

/// Entry point of the staged builder
pub struct Query;

impl Query {
    /// Project the top-level fields named in `(field1,field2,...)`
    pub fn select(select: impl Into<String>) -> SelectStage {
        SelectStage {
            select: SelectInput::Text(select.into()),
        }
    }

    /// Project raw expressions; overrides any field selection
    pub fn select_expressions(expressions: Vec<Expression>) -> SelectStage {
        SelectStage {
            select: SelectInput::Expressions(expressions),
        }
    }

    /// Whole root records of `entity`
    pub fn select_from(entity: impl Into<String>) -> WhereStage {
        SelectStage {
            select: SelectInput::Root,
        }
        .from(entity)
    }
}

pub struct SelectStage {
    select: SelectInput,
}

impl SelectStage {
    pub fn from(self, entity: impl Into<String>) -> WhereStage {
        WhereStage {
            entity: entity.into(),
            select: self.select,
        }
    }
}

pub struct WhereStage {
    entity: String,
    select: SelectInput,
}

impl WhereStage {
    /// Filter with an RSQL string; a blank string keeps every row
    pub fn filter(self, filter: impl Into<String>) -> QueryBuilder {
        let filter = filter.into();
        if filter.trim().is_empty() {
            self.unfiltered()
        } else {
            self.finish(FilterInput::Text(filter))
        }
    }

    /// Filter with an already compiled predicate
    pub fn predicate(self, predicate: Expression) -> QueryBuilder {
        self.finish(FilterInput::Compiled(predicate))
    }

    pub fn unfiltered(self) -> QueryBuilder {
        self.finish(FilterInput::None)
    }

    fn finish(self, filter: FilterInput) -> QueryBuilder {
        QueryBuilder {
            entity: self.entity,
            select: self.select,
            filter,
            sort: None,
            window: None,
            offset: None,
            size: None,
        }
    }
}

/// Final stage: ordering, paging and compilation
pub struct QueryBuilder {
    entity: String,
    select: SelectInput,
    filter: FilterInput,
    sort: Option<SortInput>,
    window: Option<WindowInput>,
    offset: Option<u64>,
    size: Option<u64>,
}

impl QueryBuilder {
    /// Order by `(path.dir,...)`
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(SortInput::Text(sort.into()));
        self
    }

    pub fn order_by(mut self, ordering: Vec<OrderSpec>) -> Self {
        self.sort = Some(SortInput::Compiled(ordering));
        self
    }

    pub fn limit(mut self, offset: u64, size: u64) -> Self {
        self.window = Some(WindowInput::Resolved(Window::limit(offset, size)));
        self
    }

    /// Limit given as `(offset,size)`
    pub fn limit_str(mut self, limit: impl Into<String>) -> Self {
        self.window = Some(WindowInput::Limit(limit.into()));
        self
    }

    /// Zero-based page; the offset is `number * size`
    pub fn page(mut self, number: u64, size: u64) -> Self {
        self.window = Some(WindowInput::PageNumber(number, size));
        self
    }

    /// Page given as `(pageNumber,pageSize)`
    pub fn page_str(mut self, page: impl Into<String>) -> Self {
        self.window = Some(WindowInput::Page(page.into()));
        self
    }

    /// Overrides the offset of any limit or page
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Overrides the size of any limit or page
    pub fn size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn build(self, config: &QueryConfig) -> Result<QueryRequest, CompilationError> {
        let entity = self.entity.as_str();
        if config.catalog().get_type(entity).is_none() {
            return Err(ExpressionError::EntityNotFound(self.entity.clone()).into());
        }

        let predicate = match self.filter {
            FilterInput::None => None,
            FilterInput::Text(filter) => {
                Some(PredicateCompiler::new(config, entity).compile_str(&filter)?)
            }
            FilterInput::Compiled(predicate) => Some(predicate),
        };

        let projection = match self.select {
            SelectInput::Root => Projection::Root,
            SelectInput::Text(select) => {
                let paths = SelectCompiler::new(config, entity).compile_str(&select)?;
                if paths.is_empty() {
                    Projection::Root
                } else {
                    Projection::Paths(paths)
                }
            }
            SelectInput::Expressions(exprs) => Projection::Expressions(exprs),
        };

        let ordering = match self.sort {
            None => Vec::new(),
            Some(SortInput::Text(sort)) => SortCompiler::new(config, entity).compile_str(&sort)?,
            Some(SortInput::Compiled(ordering)) => ordering,
        };

        let window = match self.window {
            None => None,
            Some(WindowInput::Limit(limit)) => Some(Window::parse_limit(&limit)?),
            Some(WindowInput::Page(page)) => Some(Window::parse_page(&page)?),
            Some(WindowInput::PageNumber(number, size)) => Some(Window::page(number, size)?),
            Some(WindowInput::Resolved(window)) => Some(window),
        };

        let request = QueryRequest {
            entity: self.entity.clone(),
            predicate,
            projection,
            ordering,
            offset: self.offset.or(window.map(|w| w.offset)),
            size: self.size.or(window.map(|w| w.size)),
        };
        debug!("Assembled query: {}", request);
        Ok(request)
    }
}
