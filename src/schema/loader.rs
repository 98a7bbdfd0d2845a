//! Table definition loader
//!
//! Reads table definitions from JSON files at startup:
//! - One file per table, `<dir>/<anything>.json`
//! - Field numbers are assigned from declaration order
//! - A malformed file fails the whole load

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::errors::{SchemaError, SchemaResult};
use super::field::FieldDescriptor;
use super::table::{IndexDef, TableMetadata};
use super::types::ColumnType;
use crate::observability::{log_event_with_fields, PlannerEvent};

/// On-disk field definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    /// Column name, defaults to the field name
    #[serde(default)]
    pub column: Option<String>,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default)]
    pub partition_key: bool,
    #[serde(default)]
    pub lob: bool,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
}

fn default_nullable() -> bool {
    true
}

/// On-disk table definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDef {
    pub name: String,
    pub fields: Vec<FieldDef>,
    #[serde(default)]
    pub indexes: Vec<IndexDef>,
}

impl TableDef {
    /// Builds validated metadata from this definition.
    pub fn into_metadata(self) -> SchemaResult<TableMetadata> {
        let fields = self
            .fields
            .into_iter()
            .enumerate()
            .map(|(number, def)| {
                let mut field = FieldDescriptor::new(number, def.name, def.column_type);
                if let Some(column) = def.column {
                    field = field.with_column(column);
                }
                if def.primary_key {
                    field = field.primary_key();
                } else {
                    field = field.nullable(def.nullable);
                }
                if def.partition_key {
                    field = field.partition_key();
                }
                if def.lob {
                    field = field.lob();
                }
                field
            })
            .collect();

        TableMetadata::new(self.name, fields, self.indexes)
    }
}

/// Loads table definitions from a directory and keeps them by table name.
pub struct TableLoader {
    dir: PathBuf,
    tables: HashMap<String, Arc<TableMetadata>>,
}

impl TableLoader {
    /// Creates a loader for the given definitions directory.
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            tables: HashMap::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Loads every `*.json` file in the directory, in file-name order.
    ///
    /// A missing directory loads nothing.
    pub fn load_all(&mut self) -> SchemaResult<()> {
        if !self.dir.exists() {
            return Ok(());
        }

        let entries = fs::read_dir(&self.dir).map_err(|e| {
            SchemaError::malformed(
                self.dir.display().to_string(),
                format!("Failed to read directory: {}", e),
            )
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                SchemaError::malformed(
                    self.dir.display().to_string(),
                    format!("Failed to read directory entry: {}", e),
                )
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        for path in paths {
            self.load_file(&path)?;
        }
        Ok(())
    }

    /// Loads a single definition file.
    pub fn load_file(&mut self, path: &Path) -> SchemaResult<Arc<TableMetadata>> {
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::malformed(path.display().to_string(), format!("Failed to read file: {}", e))
        })?;

        let def: TableDef = serde_json::from_str(&content).map_err(|e| {
            SchemaError::malformed(path.display().to_string(), format!("Invalid JSON: {}", e))
        })?;

        self.register(def.into_metadata()?)
    }

    /// Registers metadata built in memory.
    pub fn register(&mut self, table: TableMetadata) -> SchemaResult<Arc<TableMetadata>> {
        if self.tables.contains_key(table.name()) {
            return Err(SchemaError::DuplicateTable(table.name().to_string()));
        }

        let field_count = table.fields().len().to_string();
        let index_count = table.indexes().len().to_string();
        log_event_with_fields(
            PlannerEvent::TableRegistered,
            &[
                ("fields", field_count.as_str()),
                ("indexes", index_count.as_str()),
                ("table", table.name()),
            ],
        );

        let table = Arc::new(table);
        self.tables.insert(table.name().to_string(), Arc::clone(&table));
        Ok(table)
    }

    /// Shared handle to a registered table
    pub fn get(&self, name: &str) -> Option<Arc<TableMetadata>> {
        self.tables.get(name).cloned()
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORDERS: &str = r#"{
        "name": "orders",
        "fields": [
            {"name": "id", "type": "long", "primary_key": true},
            {"name": "customer", "type": "int", "column": "customer_id"},
            {"name": "placed", "type": "timestamp", "nullable": false}
        ],
        "indexes": [
            {"name": "idx_customer", "columns": ["customer_id", "placed"]}
        ]
    }"#;

    #[test]
    fn test_definition_to_metadata() {
        let def: TableDef = serde_json::from_str(ORDERS).unwrap();
        let table = def.into_metadata().unwrap();

        assert_eq!(table.name(), "orders");
        assert_eq!(table.fields().len(), 3);
        assert_eq!(table.field("customer").unwrap().column(), "customer_id");
        assert_eq!(table.field("customer").unwrap().field_number(), 1);
        assert!(!table.field("placed").unwrap().is_nullable());
        assert_eq!(table.indexes().len(), 2);
        assert!(!table.indexes()[1].unique);
    }

    #[test]
    fn test_register_rejects_duplicate() {
        let mut loader = TableLoader::new(Path::new("/nonexistent"));
        let def: TableDef = serde_json::from_str(ORDERS).unwrap();
        loader.register(def.clone().into_metadata().unwrap()).unwrap();
        let err = loader.register(def.into_metadata().unwrap()).unwrap_err();
        assert_eq!(err, SchemaError::DuplicateTable("orders".into()));
    }

    #[test]
    fn test_missing_dir_loads_nothing() {
        let mut loader = TableLoader::new(Path::new("/nonexistent/tables"));
        loader.load_all().unwrap();
        assert_eq!(loader.table_count(), 0);
    }
}
