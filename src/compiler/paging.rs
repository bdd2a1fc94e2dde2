//! Limit and page pairs.
//!
//! Both are written `(a,b)`: a limit is `(offset,size)`, a page is
//! `(pageNumber,pageSize)` with zero-based page numbers.

use crate::compiler::unwrap_parens;
use crate::expression::{ExpressionError, ExpressionResult};

/// Row window selected by a limit or a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: u64,
    pub size: u64,
}

impl Window {
    pub fn limit(offset: u64, size: u64) -> Self {
        Self { offset, size }
    }

    pub fn page(number: u64, size: u64) -> ExpressionResult<Self> {
        let offset = number.checked_mul(size).ok_or_else(|| {
            ExpressionError::InvalidArgument(format!("page {} of size {} overflows", number, size))
        })?;
        Ok(Self { offset, size })
    }

    pub fn parse_limit(input: &str) -> ExpressionResult<Self> {
        let (offset, size) = parse_pair(input)?;
        Ok(Self::limit(offset, size))
    }

    pub fn parse_page(input: &str) -> ExpressionResult<Self> {
        let (number, size) = parse_pair(input)?;
        Self::page(number, size)
    }
}

/// Parse `(a,b)` into exactly two non-negative integers
pub fn parse_pair(input: &str) -> ExpressionResult<(u64, u64)> {
    let invalid = || {
        ExpressionError::InvalidArgument(format!(
            "'{}' must contain exactly two non-negative integers",
            input
        ))
    };

    let numbers = unwrap_parens(input)
        .split(',')
        .map(|token| token.trim().parse::<u64>().map_err(|_| invalid()))
        .collect::<ExpressionResult<Vec<_>>>()?;

    match numbers.as_slice() {
        [first, second] => Ok((*first, *second)),
        _ => Err(invalid()),
    }
}
