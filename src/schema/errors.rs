//! Schema error types
//!
//! Raised while registering table metadata. A table that fails validation
//! is never handed to the planner.

use thiserror::Error;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Table metadata errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Two fields share a name
    #[error("Table '{table}' declares field '{field}' twice")]
    DuplicateField { table: String, field: String },

    /// Two fields map to the same column
    #[error("Table '{table}' maps column '{column}' twice")]
    DuplicateColumn { table: String, column: String },

    /// Field numbers must be 0..n in declaration order
    #[error("Table '{table}' field '{field}' has number {found}, expected {expected}")]
    FieldNumberGap {
        table: String,
        field: String,
        expected: usize,
        found: usize,
    },

    /// Two indexes share a name
    #[error("Table '{table}' declares index '{index}' twice")]
    DuplicateIndex { table: String, index: String },

    /// Index declares no columns
    #[error("Index '{index}' on table '{table}' has no columns")]
    EmptyIndex { table: String, index: String },

    /// Index references a column the table does not map
    #[error("Index '{index}' on table '{table}' references unknown column '{column}'")]
    UnknownIndexColumn {
        table: String,
        index: String,
        column: String,
    },

    /// Index lists the same column twice
    #[error("Index '{index}' on table '{table}' repeats column '{column}'")]
    RepeatedIndexColumn {
        table: String,
        index: String,
        column: String,
    },

    /// Definition file could not be read or parsed
    #[error("Malformed table definition '{path}': {reason}")]
    Malformed { path: String, reason: String },

    /// Table registered twice
    #[error("Table '{0}' is already registered")]
    DuplicateTable(String),
}

impl SchemaError {
    /// Create a malformed-definition error
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        SchemaError::Malformed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::DuplicateField { .. } => "SCHEMA_DUPLICATE_FIELD",
            SchemaError::DuplicateColumn { .. } => "SCHEMA_DUPLICATE_COLUMN",
            SchemaError::FieldNumberGap { .. } => "SCHEMA_FIELD_NUMBER_GAP",
            SchemaError::DuplicateIndex { .. } => "SCHEMA_DUPLICATE_INDEX",
            SchemaError::EmptyIndex { .. } => "SCHEMA_EMPTY_INDEX",
            SchemaError::UnknownIndexColumn { .. } => "SCHEMA_UNKNOWN_INDEX_COLUMN",
            SchemaError::RepeatedIndexColumn { .. } => "SCHEMA_REPEATED_INDEX_COLUMN",
            SchemaError::Malformed { .. } => "SCHEMA_MALFORMED",
            SchemaError::DuplicateTable(_) => "SCHEMA_DUPLICATE_TABLE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SchemaError::UnknownIndexColumn {
            table: "t".into(),
            index: "idx_b".into(),
            column: "zz".into(),
        };
        let display = err.to_string();
        assert!(display.contains("idx_b"));
        assert!(display.contains("zz"));
        assert_eq!(err.code(), "SCHEMA_UNKNOWN_INDEX_COLUMN");
    }
}
