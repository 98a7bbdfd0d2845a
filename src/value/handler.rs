//! Per-row value handler
//!
//! Holds one typed slot per persistent field plus a modified bitset and a
//! null bitset. Created when a row is materialized from a result or
//! instantiated by the application; dropped when the row is persisted or
//! discarded.

use chrono::{NaiveDate, NaiveDateTime};

use super::bits::FieldBits;
use super::errors::{ValueError, ValueResult};
use super::types::Value;
use crate::schema::{ColumnType, TableMetadata};

/// Generates a typed getter/setter pair for one column type.
///
/// Getters check the declared column type so a field is never read through
/// the wrong accessor.
macro_rules! typed_accessors {
    ($($variant:ident => $get:ident, $set:ident, $ty:ty;)*) => {
        $(
            #[doc = concat!("Reads a `", stringify!($variant), "` field; `None` when null or unset.")]
            pub fn $get(&self, field: usize) -> ValueResult<Option<$ty>> {
                self.check_type(field, ColumnType::$variant)?;
                match &self.slots[field] {
                    Some(Value::$variant(v)) => Ok(Some(v.clone())),
                    _ => Ok(None),
                }
            }

            #[doc = concat!("Writes a `", stringify!($variant), "` field and marks it modified.")]
            pub fn $set(&mut self, field: usize, value: $ty) -> ValueResult<()> {
                self.set(field, Value::$variant(value))
            }
        )*
    };
}

/// Typed, per-row field storage indexed by field number.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueHandler {
    types: Vec<ColumnType>,
    slots: Vec<Option<Value>>,
    modified: FieldBits,
    nulls: FieldBits,
}

impl ValueHandler {
    /// Creates a handler with one unset slot per column type, in field-number order.
    pub fn new(types: Vec<ColumnType>) -> Self {
        let count = types.len();
        Self {
            types,
            slots: vec![None; count],
            modified: FieldBits::new(count),
            nulls: FieldBits::new(count),
        }
    }

    /// Creates a handler shaped for every field of `table`.
    pub fn for_table(table: &TableMetadata) -> Self {
        Self::new(table.fields().iter().map(|f| f.column_type()).collect())
    }

    /// Number of field slots
    pub fn field_count(&self) -> usize {
        self.slots.len()
    }

    /// Declared column type of `field`
    pub fn column_type(&self, field: usize) -> ValueResult<ColumnType> {
        self.check_field(field)?;
        Ok(self.types[field])
    }

    /// Reads a slot regardless of its type. `None` when null or unset.
    pub fn get(&self, field: usize) -> ValueResult<Option<&Value>> {
        self.check_field(field)?;
        Ok(self.slots[field].as_ref())
    }

    /// Writes a slot. The value's type must equal the field's column type.
    pub fn set(&mut self, field: usize, value: Value) -> ValueResult<()> {
        self.check_type(field, value.column_type())?;
        self.slots[field] = Some(value);
        self.nulls.clear(field);
        self.modified.set(field);
        Ok(())
    }

    /// Writes an explicit null and marks the field modified.
    pub fn set_null(&mut self, field: usize) -> ValueResult<()> {
        self.check_field(field)?;
        self.slots[field] = None;
        self.nulls.set(field);
        self.modified.set(field);
        Ok(())
    }

    /// True when the field holds no value, whether never written or set null.
    pub fn is_null(&self, field: usize) -> ValueResult<bool> {
        self.check_field(field)?;
        Ok(self.slots[field].is_none())
    }

    /// True when the field was written, including an explicit null.
    pub fn is_loaded(&self, field: usize) -> ValueResult<bool> {
        self.check_field(field)?;
        Ok(self.slots[field].is_some() || self.nulls.get(field))
    }

    pub fn is_modified(&self, field: usize) -> ValueResult<bool> {
        self.check_field(field)?;
        Ok(self.modified.get(field))
    }

    /// Marks a field modified without changing its value.
    pub fn mark_modified(&mut self, field: usize) -> ValueResult<()> {
        self.check_field(field)?;
        self.modified.set(field);
        Ok(())
    }

    /// Clears every modified bit, typically after the row is persisted.
    pub fn reset_modified(&mut self) {
        self.modified.clear_all();
    }

    /// Modified field numbers in ascending order
    pub fn modified_fields(&self) -> Vec<usize> {
        self.modified.iter().collect()
    }

    typed_accessors! {
        Boolean => get_boolean, set_boolean, bool;
        Byte => get_byte, set_byte, i8;
        Short => get_short, set_short, i16;
        Int => get_int, set_int, i32;
        Long => get_long, set_long, i64;
        Float => get_float, set_float, f32;
        Double => get_double, set_double, f64;
        String => get_string, set_string, String;
        Bytes => get_bytes, set_bytes, Vec<u8>;
        Date => get_date, set_date, NaiveDate;
        Timestamp => get_timestamp, set_timestamp, NaiveDateTime;
    }

    fn check_field(&self, field: usize) -> ValueResult<()> {
        if field < self.slots.len() {
            Ok(())
        } else {
            Err(ValueError::FieldOutOfRange {
                field,
                count: self.slots.len(),
            })
        }
    }

    fn check_type(&self, field: usize, actual: ColumnType) -> ValueResult<()> {
        self.check_field(field)?;
        let expected = self.types[field];
        if expected == actual {
            Ok(())
        } else {
            Err(ValueError::TypeMismatch {
                field,
                expected,
                actual,
            })
        }
    }
}
