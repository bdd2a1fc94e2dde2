//! Scan executor implementation.
//!
//! Reads every record of one entity table. The table is snapshotted at
//! `init()`, so rows inserted while the scan runs are not seen.

use crate::access::{EntityStore, Record};
use crate::executor::{ColumnInfo, Executor, Row};
use anyhow::{bail, Result};
use std::sync::Arc;

/// Executor that yields the records of one entity
pub struct ScanExecutor {
    /// Store holding the entity tables
    store: Arc<EntityStore>,
    /// Root entity name
    entity: String,
    /// Output schema (one column per visible field)
    output_schema: Vec<ColumnInfo>,
    /// Snapshot taken at init
    records: Vec<Record>,
    /// Current position in records
    current_position: usize,
    /// Whether the executor has been initialized
    initialized: bool,
}

impl ScanExecutor {
    /// Create a new scan executor
    ///
    /// # Arguments
    /// * `store` - The store to read from
    /// * `entity` - The entity table to scan
    /// * `output_schema` - Field columns of the entity
    pub fn new(store: Arc<EntityStore>, entity: impl Into<String>, output_schema: Vec<ColumnInfo>) -> Self {
        Self {
            store,
            entity: entity.into(),
            output_schema,
            records: Vec::new(),
            current_position: 0,
            initialized: false,
        }
    }
}

impl Executor for ScanExecutor {
    fn init(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }

        self.records = self.store.scan(&self.entity);
        self.current_position = 0;

        self.initialized = true;
        Ok(())
    }

    fn next(&mut self) -> Result<Option<Row>> {
        if !self.initialized {
            bail!("Executor not initialized. Call init() first.");
        }

        match self.records.get(self.current_position) {
            Some(record) => {
                self.current_position += 1;
                Ok(Some(Row::Record(record.clone())))
            }
            None => Ok(None),
        }
    }

    fn output_schema(&self) -> &[ColumnInfo] {
        &self.output_schema
    }
}
