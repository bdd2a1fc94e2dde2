//! Offset/size window over a child executor.
//!
//! Rows are numbered as they are pulled from the child; only positions in
//! `offset..offset + size` are passed on. Without a size the window is
//! open-ended.

use crate::executor::{ColumnInfo, Executor, Row};
use anyhow::{bail, Result};

pub struct WindowExecutor {
    child: Box<dyn Executor>,
    offset: usize,
    size: Option<usize>,
    /// Child rows consumed so far
    position: usize,
    output_schema: Vec<ColumnInfo>,
    initialized: bool,
}

impl WindowExecutor {
    pub fn new(child: Box<dyn Executor>, offset: usize, size: Option<usize>) -> Self {
        Self {
            child,
            offset,
            size,
            position: 0,
            output_schema: Vec::new(),
            initialized: false,
        }
    }

    /// Window from request bounds; values past `usize::MAX` saturate
    pub fn from_bounds(child: Box<dyn Executor>, offset: Option<u64>, size: Option<u64>) -> Self {
        let saturate = |n: u64| usize::try_from(n).unwrap_or(usize::MAX);
        Self::new(child, offset.map_or(0, saturate), size.map(saturate))
    }

    fn end(&self) -> Option<usize> {
        self.size.map(|size| self.offset.saturating_add(size))
    }
}

impl Executor for WindowExecutor {
    fn init(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }

        self.child.init()?;
        self.output_schema = self.child.output_schema().to_vec();
        self.position = 0;

        self.initialized = true;
        Ok(())
    }

    fn next(&mut self) -> Result<Option<Row>> {
        if !self.initialized {
            bail!("Executor not initialized. Call init() first.");
        }

        loop {
            if self.end().is_some_and(|end| self.position >= end) {
                return Ok(None);
            }
            let Some(row) = self.child.next()? else {
                return Ok(None);
            };
            self.position += 1;
            if self.position > self.offset {
                return Ok(Some(row));
            }
        }
    }

    fn output_schema(&self) -> &[ColumnInfo] {
        &self.output_schema
    }
}
