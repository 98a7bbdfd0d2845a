//! Value handler errors

use thiserror::Error;

use crate::schema::ColumnType;

/// Result type for value handler operations
pub type ValueResult<T> = Result<T, ValueError>;

/// Errors raised when a row slot is accessed incorrectly
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// Field number is not a slot of this handler
    #[error("Field number {field} out of range (handler has {count} fields)")]
    FieldOutOfRange { field: usize, count: usize },

    /// Accessor type does not match the field's column type
    #[error("Field {field} holds {expected}, accessed as {actual}")]
    TypeMismatch {
        field: usize,
        expected: ColumnType,
        actual: ColumnType,
    },
}

impl ValueError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ValueError::FieldOutOfRange { .. } => "VALUE_FIELD_OUT_OF_RANGE",
            ValueError::TypeMismatch { .. } => "VALUE_TYPE_MISMATCH",
        }
    }
}
