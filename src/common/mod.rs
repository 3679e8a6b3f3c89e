// # Common Types
//
// Shared identifiers and the table value model used across FerryDB modules.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Type Aliases - Shared Identifiers
// ============================================================================

/// Dense internal handle assigned to a vertex on insertion.
///
/// Slots are stable for the life of an in-memory graph but are renumbered by
/// a save/load cycle; the external vertex id is the only durable identity.
pub type VertexSlot = u64;

/// Internal number assigned to an edge on insertion
pub type EdgeSlot = u64;

// ============================================================================
// Table Value Model
// ============================================================================

/// Declared type of a table column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    /// 64-bit signed integer
    Int,

    /// 64-bit floating point
    Float,

    /// Variable-length string (UTF-8)
    Str,
}

impl DataType {
    /// Check whether a raw string value can represent this type.
    pub fn accepts(&self, raw: &str) -> bool {
        match self {
            DataType::Int => raw.parse::<i64>().is_ok(),
            DataType::Float => raw.parse::<f64>().is_ok(),
            DataType::Str => true,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            DataType::Int => "INT",
            DataType::Float => "FLOAT",
            DataType::Str => "STRING",
        }
    }
}

/// A single table row: column name mapped to its string value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub data: HashMap<String, String>,
}

impl TableRow {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    /// Set a column value, replacing any previous one.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.data.insert(column.into(), value.into());
        self
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.data.get(column).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
