pub mod access;
pub mod catalog;
pub mod compiler;
pub mod config;
pub mod executor;
pub mod expression;
pub mod fixtures;
pub mod handler;
pub mod planner;
pub mod query;
pub mod rsql;
