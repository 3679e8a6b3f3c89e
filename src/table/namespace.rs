// Named collection of indexed tables.

use crate::common::DataType;
use crate::error::{FerryError, Result};
use crate::table::indexed_table::{IndexedTable, TableSchema};
use std::collections::HashMap;

/// Tables grouped under one namespace, keyed by table name.
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    tables: HashMap<String, IndexedTable>,
}

impl Namespace {
    pub fn new() -> Self {
        Self {
            tables: HashMap::new(),
        }
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    pub fn contains_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Create an empty table from its declared schema.
    pub fn add_table(&mut self, schema: TableSchema) -> Result<()> {
        if self.tables.contains_key(&schema.name) {
            return Err(FerryError::invalid_argument(
                "table with the given name already exists",
            ));
        }
        self.tables
            .insert(schema.name.clone(), IndexedTable::new(schema));
        Ok(())
    }

    pub fn table(&self, name: &str) -> Result<&IndexedTable> {
        self.tables
            .get(name)
            .ok_or_else(|| FerryError::invalid_argument("table with the given name not found"))
    }

    pub fn table_mut(&mut self, name: &str) -> Result<&mut IndexedTable> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| FerryError::invalid_argument("table with the given name not found"))
    }

    pub fn add_column(&mut self, table: &str, column: &str, data_type: DataType) -> Result<()> {
        self.table_mut(table)?.add_column(column, data_type)
    }

    /// Replace a table wholesale, e.g. after loading one from a file.
    pub fn attach(&mut self, table: IndexedTable) {
        self.tables.insert(table.name().to_string(), table);
    }
}
