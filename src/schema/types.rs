//! Column type definitions
//!
//! Supported column types:
//! - boolean
//! - byte, short, int, long: signed integers of 8, 16, 32, 64 bits
//! - float, double: 32- and 64-bit floating point
//! - string: UTF-8 string
//! - bytes: opaque binary
//! - date, timestamp: calendar date and date-time without zone

use std::fmt;

use serde::{Deserialize, Serialize};

/// Storage type of a persistent field.
///
/// Fixed per field at registration time; every typed accessor and every
/// parameter conversion dispatches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    String,
    Bytes,
    Date,
    Timestamp,
}

impl ColumnType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            ColumnType::Boolean => "boolean",
            ColumnType::Byte => "byte",
            ColumnType::Short => "short",
            ColumnType::Int => "int",
            ColumnType::Long => "long",
            ColumnType::Float => "float",
            ColumnType::Double => "double",
            ColumnType::String => "string",
            ColumnType::Bytes => "bytes",
            ColumnType::Date => "date",
            ColumnType::Timestamp => "timestamp",
        }
    }

    /// Returns true for the signed integer types
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            ColumnType::Byte | ColumnType::Short | ColumnType::Int | ColumnType::Long
        )
    }

    /// Returns true if values of this type can be compared with `LIKE`
    pub fn supports_like(&self) -> bool {
        matches!(self, ColumnType::String)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}
