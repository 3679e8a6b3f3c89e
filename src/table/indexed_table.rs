// # Indexed Table
//
// A mapping from an index-column value to a row of string fields, with a
// declared column-type schema. The serialized form is a row count followed
// by the rows, each written index-first then schema columns in declared
// order; the schema itself never goes to disk, so the reader must supply
// one that matches the byte stream.

use crate::common::{DataType, TableRow};
use crate::error::{FerryError, Result};
use crate::serial::buffer::SerializedBuffer;
use crate::serial::contract::Serializable;
use crate::serial::cursor::{ByteReader, ByteWriter};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A non-index column: name plus declared type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: DataType,
}

/// Declared shape of a table: index column plus ordered value columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub index_column: String,
    pub index_type: DataType,
    pub columns: Vec<ColumnDef>,
}

impl TableSchema {
    pub fn new(
        name: impl Into<String>,
        index_column: impl Into<String>,
        index_type: DataType,
    ) -> Self {
        Self {
            name: name.into(),
            index_column: index_column.into(),
            index_type,
            columns: Vec::new(),
        }
    }

    /// Append a value column in declared order.
    pub fn with_column(mut self, name: impl Into<String>, data_type: DataType) -> Self {
        self.columns.push(ColumnDef {
            name: name.into(),
            data_type,
        });
        self
    }

    fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|column| column.name == name)
    }
}

/// A table of string rows keyed by a typed primary column.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedTable {
    schema: TableSchema,
    rows: HashMap<String, TableRow>,
}

impl IndexedTable {
    pub fn new(schema: TableSchema) -> Self {
        Self {
            schema,
            rows: HashMap::new(),
        }
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    pub fn name(&self) -> &str {
        &self.schema.name
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row_exists(&self, index_value: &str) -> bool {
        self.rows.contains_key(index_value)
    }

    /// Insert a row under a unique index value of the declared index type.
    /// Declared columns the row omits are filled with the empty string.
    pub fn insert_row(&mut self, index_value: &str, row: TableRow) -> Result<()> {
        self.check_index_type(index_value)?;
        if self.rows.contains_key(index_value) {
            return Err(FerryError::invalid_argument("index value must be unique"));
        }
        let row = self.normalize_row(row)?;
        self.rows.insert(index_value.to_string(), row);
        Ok(())
    }

    pub fn update_row(&mut self, index_value: &str, row: TableRow) -> Result<()> {
        if !self.rows.contains_key(index_value) {
            return Err(FerryError::invalid_argument("index value not found"));
        }
        let row = self.normalize_row(row)?;
        self.rows.insert(index_value.to_string(), row);
        Ok(())
    }

    pub fn delete_row(&mut self, index_value: &str) -> Result<()> {
        match self.rows.remove(index_value) {
            Some(_) => Ok(()),
            None => Err(FerryError::invalid_argument("index value not found")),
        }
    }

    pub fn get_row(&self, index_value: &str) -> Result<&TableRow> {
        self.rows
            .get(index_value)
            .ok_or_else(|| FerryError::invalid_argument("index value not found"))
    }

    /// Remove every row; the declared schema stays.
    pub fn drop_table(&mut self) {
        self.rows.clear();
    }

    /// Declare a new value column and fill it with the empty string in
    /// every existing row.
    pub fn add_column(&mut self, name: &str, data_type: DataType) -> Result<()> {
        if name == self.schema.index_column || self.schema.column(name).is_some() {
            return Err(FerryError::invalid_argument(
                "column already exists in the table",
            ));
        }
        self.schema.columns.push(ColumnDef {
            name: name.to_string(),
            data_type,
        });
        for row in self.rows.values_mut() {
            row.set(name, "");
        }
        Ok(())
    }

    pub fn remove_column(&mut self, name: &str) -> Result<()> {
        if name == self.schema.index_column {
            return Err(FerryError::invalid_argument("cannot remove the index column"));
        }
        let position = self
            .schema
            .columns
            .iter()
            .position(|column| column.name == name)
            .ok_or_else(|| FerryError::invalid_argument("column not found"))?;
        self.schema.columns.remove(position);
        for row in self.rows.values_mut() {
            row.data.remove(name);
        }
        Ok(())
    }

    fn check_index_type(&self, index_value: &str) -> Result<()> {
        if !self.schema.index_type.accepts(index_value) {
            return Err(FerryError::invalid_argument(format!(
                "index value {:?} is not a valid {}",
                index_value,
                self.schema.index_type.type_name()
            )));
        }
        Ok(())
    }

    // Rows are stored with exactly the declared columns: omitted columns
    // backfill to "", undeclared columns are a caller fault (they would
    // silently vanish across a save/load otherwise).
    fn normalize_row(&self, mut row: TableRow) -> Result<TableRow> {
        for key in row.data.keys() {
            if self.schema.column(key).is_none() {
                return Err(FerryError::invalid_argument(format!(
                    "column {key:?} is not declared in the table"
                )));
            }
        }
        for column in &self.schema.columns {
            row.data.entry(column.name.clone()).or_default();
        }
        Ok(row)
    }

    // ------------------------------------------------------------------
    // Codec
    // ------------------------------------------------------------------

    fn field_size(value: &str, data_type: DataType) -> usize {
        match data_type {
            DataType::Int | DataType::Float => 8,
            DataType::Str => 8 + value.len(),
        }
    }

    fn write_field(
        writer: &mut ByteWriter<'_>,
        value: &str,
        data_type: DataType,
        column: &str,
    ) -> Result<()> {
        match data_type {
            DataType::Int => {
                let parsed: i64 = value.parse().map_err(|_| {
                    FerryError::encode_failed(format!(
                        "value {value:?} in INT column {column:?}"
                    ))
                })?;
                writer.put_bytes(&parsed.to_le_bytes())
            }
            DataType::Float => {
                let parsed: f64 = value.parse().map_err(|_| {
                    FerryError::encode_failed(format!(
                        "value {value:?} in FLOAT column {column:?}"
                    ))
                })?;
                writer.put_bytes(&parsed.to_le_bytes())
            }
            DataType::Str => {
                writer.put_u64(value.len() as u64)?;
                writer.put_bytes(value.as_bytes())
            }
        }
    }

    fn read_field(reader: &mut ByteReader<'_>, data_type: DataType) -> Result<String> {
        match data_type {
            DataType::Int => {
                let bytes = reader.get_bytes(8)?;
                let mut raw = [0u8; 8];
                raw.copy_from_slice(bytes);
                Ok(i64::from_le_bytes(raw).to_string())
            }
            DataType::Float => {
                let bytes = reader.get_bytes(8)?;
                let mut raw = [0u8; 8];
                raw.copy_from_slice(bytes);
                Ok(f64::from_le_bytes(raw).to_string())
            }
            DataType::Str => {
                let len = reader.get_u64()? as usize;
                let bytes = reader.get_bytes(len)?;
                String::from_utf8(bytes.to_vec())
                    .map_err(|_| FerryError::corrupted("string field is not valid UTF-8"))
            }
        }
    }

    /// Decode rows previously produced by `serialize` into a table carrying
    /// the given schema. The byte stream has no schema of its own; a reader
    /// whose declared column order or types disagree with the stream fails
    /// with a corruption error.
    pub fn deserialize_with_schema(
        schema: TableSchema,
        buffer: &SerializedBuffer<'_>,
    ) -> Result<Self> {
        let bytes = buffer.as_slice();
        if bytes.is_empty() {
            return Err(FerryError::NoDeserializableData);
        }

        let mut reader = ByteReader::new(bytes);
        let row_count = reader.get_u64()?;
        let mut table = IndexedTable::new(schema);
        for _ in 0..row_count {
            let index_value = Self::read_field(&mut reader, table.schema.index_type)?;
            let mut row = TableRow::new();
            for column in &table.schema.columns {
                let value = Self::read_field(&mut reader, column.data_type)?;
                row.set(column.name.clone(), value);
            }
            if table.rows.insert(index_value.clone(), row).is_some() {
                return Err(FerryError::corrupted(format!(
                    "index value {index_value:?} appears twice"
                )));
            }
        }
        if reader.remaining() != 0 {
            return Err(FerryError::corrupted(format!(
                "{} bytes remain after the last row",
                reader.remaining()
            )));
        }
        Ok(table)
    }
}

impl Serializable for IndexedTable {
    fn serialized_size(&self) -> usize {
        let rows: usize = self
            .rows
            .iter()
            .map(|(index_value, row)| {
                let mut size = Self::field_size(index_value, self.schema.index_type);
                for column in &self.schema.columns {
                    let value = row.get(&column.name).unwrap_or("");
                    size += Self::field_size(value, column.data_type);
                }
                size
            })
            .sum();
        8 + rows
    }

    fn serialize(&self) -> Result<SerializedBuffer<'static>> {
        let size = self.serialized_size();
        let mut block = vec![0u8; size];
        let mut writer = ByteWriter::new(&mut block);

        writer.put_u64(self.rows.len() as u64)?;
        for (index_value, row) in &self.rows {
            Self::write_field(
                &mut writer,
                index_value,
                self.schema.index_type,
                &self.schema.index_column,
            )?;
            for column in &self.schema.columns {
                let value = row.get(&column.name).ok_or_else(|| {
                    FerryError::NoSerializableData(format!(
                        "row {index_value:?} is missing column {:?}",
                        column.name
                    ))
                })?;
                Self::write_field(&mut writer, value, column.data_type, &column.name)?;
            }
        }
        if writer.position() != size {
            return Err(FerryError::encode_failed(format!(
                "encoded {} bytes where {} were sized",
                writer.position(),
                size
            )));
        }
        Ok(SerializedBuffer::from_vec(block))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee_schema() -> TableSchema {
        TableSchema::new("EmployeeTable", "ID", DataType::Int)
            .with_column("Name", DataType::Str)
            .with_column("Age", DataType::Int)
            .with_column("Salary", DataType::Float)
    }

    fn employee_table() -> IndexedTable {
        let mut table = IndexedTable::new(employee_schema());
        let mut alice = TableRow::new();
        alice.set("Name", "Alice").set("Age", "30").set("Salary", "50000");
        table.insert_row("1", alice).unwrap();

        let mut bob = TableRow::new();
        bob.set("Name", "Bob").set("Age", "40").set("Salary", "60000");
        table.insert_row("2", bob).unwrap();
        table
    }

    #[test]
    fn test_insert_and_get() {
        let table = employee_table();
        assert_eq!(table.row_count(), 2);
        assert!(table.row_exists("1"));
        assert_eq!(table.get_row("1").unwrap().get("Name"), Some("Alice"));
        assert!(table.get_row("3").is_err());
    }

    #[test]
    fn test_duplicate_index_rejected() {
        let mut table = employee_table();
        let err = table.insert_row("1", TableRow::new()).unwrap_err();
        assert!(matches!(err, FerryError::InvalidArgument(_)));
        assert_eq!(table.get_row("1").unwrap().get("Name"), Some("Alice"));
    }

    #[test]
    fn test_index_type_validation() {
        let mut table = IndexedTable::new(employee_schema());
        let err = table.insert_row("not-a-number", TableRow::new()).unwrap_err();
        assert!(matches!(err, FerryError::InvalidArgument(_)));
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_undeclared_column_rejected() {
        let mut table = IndexedTable::new(employee_schema());
        let mut row = TableRow::new();
        row.set("Nickname", "Al");
        assert!(table.insert_row("1", row).is_err());
    }

    #[test]
    fn test_update_and_delete() {
        let mut table = employee_table();
        let mut row = TableRow::new();
        row.set("Name", "Alicia");
        table.update_row("1", row).unwrap();
        assert_eq!(table.get_row("1").unwrap().get("Name"), Some("Alicia"));
        // Omitted columns backfill to the empty string.
        assert_eq!(table.get_row("1").unwrap().get("Age"), Some(""));

        table.delete_row("2").unwrap();
        assert!(!table.row_exists("2"));
        assert!(table.delete_row("2").is_err());
        assert!(table.update_row("2", TableRow::new()).is_err());
    }

    #[test]
    fn test_add_column_backfills_rows() {
        let mut table = employee_table();
        table.add_column("Dept", DataType::Str).unwrap();
        assert_eq!(table.get_row("1").unwrap().get("Dept"), Some(""));
        assert!(table.add_column("Dept", DataType::Str).is_err());
        assert!(table.add_column("ID", DataType::Int).is_err());
    }

    #[test]
    fn test_remove_column() {
        let mut table = employee_table();
        table.remove_column("Age").unwrap();
        assert_eq!(table.get_row("1").unwrap().get("Age"), None);
        assert!(table.remove_column("Age").is_err());
        assert!(table.remove_column("ID").is_err());
    }

    #[test]
    fn test_drop_table_keeps_schema() {
        let mut table = employee_table();
        table.drop_table();
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.schema().columns.len(), 3);
    }

    #[test]
    fn test_round_trip() {
        let table = employee_table();
        let buffer = table.serialize().unwrap();
        assert_eq!(buffer.len(), table.serialized_size());

        let loaded = IndexedTable::deserialize_with_schema(employee_schema(), &buffer).unwrap();
        assert_eq!(loaded, table);
        assert_eq!(loaded.get_row("2").unwrap().get("Salary"), Some("60000"));
    }

    #[test]
    fn test_empty_table_round_trip() {
        let table = IndexedTable::new(employee_schema());
        let buffer = table.serialize().unwrap();
        assert_eq!(buffer.len(), 8);
        let loaded = IndexedTable::deserialize_with_schema(employee_schema(), &buffer).unwrap();
        assert_eq!(loaded.row_count(), 0);
    }

    #[test]
    fn test_schema_disagreement_is_corruption() {
        let table = employee_table();
        let buffer = table.serialize().unwrap();

        // Same columns, but Salary read as a length-prefixed string: the
        // float bits decode as an absurd length and overrun the buffer.
        let wrong = TableSchema::new("EmployeeTable", "ID", DataType::Int)
            .with_column("Name", DataType::Str)
            .with_column("Age", DataType::Int)
            .with_column("Salary", DataType::Str);
        let err = IndexedTable::deserialize_with_schema(wrong, &buffer).unwrap_err();
        assert!(matches!(err, FerryError::DeserializableDataCorrupted(_)));
    }

    #[test]
    fn test_truncated_stream_is_corruption() {
        let table = employee_table();
        let mut block = table.serialize().unwrap().as_slice().to_vec();
        block.pop();
        let err =
            IndexedTable::deserialize_with_schema(employee_schema(), &SerializedBuffer::from_vec(block))
                .unwrap_err();
        assert!(matches!(err, FerryError::DeserializableDataCorrupted(_)));
    }

    #[test]
    fn test_unencodable_int_value() {
        let mut table = IndexedTable::new(
            TableSchema::new("T", "ID", DataType::Int).with_column("Count", DataType::Int),
        );
        let mut row = TableRow::new();
        row.set("Count", "many");
        table.insert_row("1", row).unwrap();

        let err = table.serialize().unwrap_err();
        assert!(matches!(err, FerryError::SerializableDataCorrupted(_)));
    }
}
