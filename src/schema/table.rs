//! Table metadata
//!
//! The immutable per-table view the planner reads: field descriptors in
//! field-number order and the static index list in declaration order.
//! The primary key, when the table has one, is always index ordinal 0.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::errors::{SchemaError, SchemaResult};
use super::field::FieldDescriptor;

/// Name given to the index derived from primary-key fields
pub const PRIMARY_INDEX_NAME: &str = "PRIMARY";

/// Static definition of one index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDef {
    /// Index name, unique per table
    pub name: String,
    /// Column names in key order
    pub columns: Vec<String>,
    /// Whether the full key identifies at most one row
    #[serde(default)]
    pub unique: bool,
}

impl IndexDef {
    /// Ordered (non-unique) index over `columns`
    pub fn ordered(name: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            name: name.into(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            unique: false,
        }
    }

    /// Unique index over `columns`
    pub fn unique(name: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            unique: true,
            ..Self::ordered(name, columns)
        }
    }

    /// True for the index derived from the primary key
    pub fn is_primary(&self) -> bool {
        self.name == PRIMARY_INDEX_NAME
    }
}

/// Registered table: fields plus indexes, validated and cross-linked.
#[derive(Debug, Clone)]
pub struct TableMetadata {
    name: String,
    fields: Vec<FieldDescriptor>,
    indexes: Vec<IndexDef>,
    by_name: HashMap<String, usize>,
    by_column: HashMap<String, usize>,
}

impl TableMetadata {
    /// Validates and registers a table.
    ///
    /// Field numbers must run 0..n in order. If any field is a primary key
    /// a unique `PRIMARY` index over those columns is placed first; every
    /// field descriptor learns the names of the indexes covering it.
    pub fn new(
        name: impl Into<String>,
        mut fields: Vec<FieldDescriptor>,
        declared: Vec<IndexDef>,
    ) -> SchemaResult<Self> {
        let name = name.into();
        let mut by_name = HashMap::new();
        let mut by_column = HashMap::new();

        for (expected, field) in fields.iter().enumerate() {
            if field.field_number() != expected {
                return Err(SchemaError::FieldNumberGap {
                    table: name.clone(),
                    field: field.name().to_string(),
                    expected,
                    found: field.field_number(),
                });
            }
            if by_name.insert(field.name().to_string(), expected).is_some() {
                return Err(SchemaError::DuplicateField {
                    table: name.clone(),
                    field: field.name().to_string(),
                });
            }
            if by_column.insert(field.column().to_string(), expected).is_some() {
                return Err(SchemaError::DuplicateColumn {
                    table: name.clone(),
                    column: field.column().to_string(),
                });
            }
        }

        let pk_columns: Vec<&str> = fields
            .iter()
            .filter(|f| f.is_primary_key())
            .map(|f| f.column())
            .collect();

        let mut indexes = Vec::with_capacity(declared.len() + 1);
        if !pk_columns.is_empty() {
            indexes.push(IndexDef::unique(PRIMARY_INDEX_NAME, &pk_columns));
        }
        indexes.extend(declared);

        for (i, index) in indexes.iter().enumerate() {
            if indexes[..i].iter().any(|other| other.name == index.name) {
                return Err(SchemaError::DuplicateIndex {
                    table: name.clone(),
                    index: index.name.clone(),
                });
            }
            if index.columns.is_empty() {
                return Err(SchemaError::EmptyIndex {
                    table: name.clone(),
                    index: index.name.clone(),
                });
            }
            for (pos, column) in index.columns.iter().enumerate() {
                if index.columns[..pos].contains(column) {
                    return Err(SchemaError::RepeatedIndexColumn {
                        table: name.clone(),
                        index: index.name.clone(),
                        column: column.clone(),
                    });
                }
                let Some(&field) = by_column.get(column) else {
                    return Err(SchemaError::UnknownIndexColumn {
                        table: name.clone(),
                        index: index.name.clone(),
                        column: column.clone(),
                    });
                };
                fields[field].add_index(&index.name);
            }
        }

        Ok(Self {
            name,
            fields,
            indexes,
            by_name,
            by_column,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field descriptors in field-number order
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Indexes in ordinal order (primary key first when present)
    pub fn indexes(&self) -> &[IndexDef] {
        &self.indexes
    }

    /// Looks up a field by property name
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.by_name.get(name).map(|&n| &self.fields[n])
    }

    /// Looks up a field by storage column name
    pub fn field_by_column(&self, column: &str) -> Option<&FieldDescriptor> {
        self.by_column.get(column).map(|&n| &self.fields[n])
    }

    /// Looks up a field by field number
    pub fn field_by_number(&self, field_number: usize) -> Option<&FieldDescriptor> {
        self.fields.get(field_number)
    }

    /// The primary key index, if the table has primary-key fields
    pub fn primary_key(&self) -> Option<&IndexDef> {
        self.indexes.first().filter(|i| i.is_primary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnType;

    fn fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new(0, "id", ColumnType::Long).primary_key(),
            FieldDescriptor::new(1, "b", ColumnType::Int),
            FieldDescriptor::new(2, "c", ColumnType::Int).with_column("c_col"),
        ]
    }

    #[test]
    fn test_primary_index_is_first() {
        let table = TableMetadata::new("t", fields(), vec![IndexDef::ordered("idx_bc", &["b", "c_col"])]).unwrap();

        assert_eq!(table.indexes().len(), 2);
        assert_eq!(table.indexes()[0].name, PRIMARY_INDEX_NAME);
        assert!(table.indexes()[0].unique);
        assert_eq!(table.primary_key().map(|i| i.columns.clone()), Some(vec!["id".to_string()]));
    }

    #[test]
    fn test_fields_learn_index_membership() {
        let table = TableMetadata::new("t", fields(), vec![IndexDef::ordered("idx_bc", &["b", "c_col"])]).unwrap();

        assert_eq!(table.field("c").unwrap().index_names(), &["idx_bc".to_string()]);
        assert_eq!(table.field("id").unwrap().index_names(), &[PRIMARY_INDEX_NAME.to_string()]);
        assert_eq!(table.field_by_column("c_col").unwrap().name(), "c");
    }

    #[test]
    fn test_unknown_index_column_rejected() {
        let err = TableMetadata::new("t", fields(), vec![IndexDef::ordered("bad", &["c"])]).unwrap_err();
        assert_eq!(err.code(), "SCHEMA_UNKNOWN_INDEX_COLUMN");
    }

    #[test]
    fn test_field_number_gap_rejected() {
        let fields = vec![
            FieldDescriptor::new(0, "a", ColumnType::Int),
            FieldDescriptor::new(2, "b", ColumnType::Int),
        ];
        let err = TableMetadata::new("t", fields, vec![]).unwrap_err();
        assert_eq!(err.code(), "SCHEMA_FIELD_NUMBER_GAP");
    }

    #[test]
    fn test_duplicate_index_rejected() {
        let err = TableMetadata::new(
            "t",
            fields(),
            vec![IndexDef::ordered("i", &["b"]), IndexDef::unique("i", &["c_col"])],
        )
        .unwrap_err();
        assert_eq!(err.code(), "SCHEMA_DUPLICATE_INDEX");
    }

    #[test]
    fn test_table_without_primary_key() {
        let fields = vec![FieldDescriptor::new(0, "a", ColumnType::Int)];
        let table = TableMetadata::new("t", fields, vec![]).unwrap();
        assert!(table.primary_key().is_none());
        assert!(table.indexes().is_empty());
    }
}
