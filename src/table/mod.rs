//! # Indexed Table
//!
//! A key-to-row mapping indexed by a typed primary column, with a binary
//! codec that writes rows index-first in declared column order. The schema
//! never goes to disk; readers supply it at decode time.

pub mod indexed_table;
pub mod namespace;

pub use indexed_table::{ColumnDef, IndexedTable, TableSchema};
pub use namespace::Namespace;
