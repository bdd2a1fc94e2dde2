//! In-memory entity tables.

use crate::access::Record;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Thread-safe tables of records, one per root entity name.
///
/// Scans hand out a snapshot, so a running query never observes
/// concurrent inserts.
#[derive(Debug, Default)]
pub struct EntityStore {
    tables: RwLock<HashMap<String, Vec<Record>>>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record to the table named after its type
    pub fn insert(&self, record: Record) {
        let mut tables = self.tables.write();
        tables
            .entry(record.type_name().to_string())
            .or_default()
            .push(record);
    }

    pub fn scan(&self, entity: &str) -> Vec<Record> {
        let tables = self.tables.read();
        tables.get(entity).cloned().unwrap_or_default()
    }

    pub fn len(&self, entity: &str) -> usize {
        self.tables.read().get(entity).map_or(0, Vec::len)
    }

    pub fn is_empty(&self, entity: &str) -> bool {
        self.len(entity) == 0
    }
}
