//! Access layer for entity-oriented data.
//!
//! This module provides the data the execution side works with:
//!
//! - **Value**: Type-safe representation of field values, literals included
//! - **Record**: One entity instance, a named bag of field values
//! - **EntityStore**: In-memory tables of records keyed by entity name
//!
//! Compiled predicates never touch this layer directly; only the executors
//! and the predicate evaluator read records.

pub mod record;
pub mod store;
pub mod value;

pub use record::Record;
pub use store::EntityStore;
pub use value::{NumericWidth, Value};
