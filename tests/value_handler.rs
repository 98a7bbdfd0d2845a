//! Value Handler Tests
//!
//! Verifies per-row storage shaped by table metadata:
//! - Slots follow field numbers
//! - Typed accessors reject the wrong column type
//! - Writes track modified fields, nulls read back as None

use chrono::NaiveDate;

use accesspath::schema::{ColumnType, FieldDescriptor, IndexDef, TableMetadata};
use accesspath::value::{Value, ValueError, ValueHandler};

// =============================================================================
// Helper Functions
// =============================================================================

fn events() -> TableMetadata {
    TableMetadata::new(
        "events",
        vec![
            FieldDescriptor::new(0, "id", ColumnType::Long).primary_key(),
            FieldDescriptor::new(1, "kind", ColumnType::Byte),
            FieldDescriptor::new(2, "day", ColumnType::Date),
            FieldDescriptor::new(3, "payload", ColumnType::Bytes).lob(),
        ],
        vec![IndexDef::ordered("idx_day", &["day"])],
    )
    .unwrap()
}

// =============================================================================
// Handler Tests
// =============================================================================

/// Handler has one slot per field, all unset
#[test]
fn test_handler_for_table() {
    let row = ValueHandler::for_table(&events());
    assert_eq!(row.field_count(), 4);
    assert_eq!(row.column_type(2).unwrap(), ColumnType::Date);
    for field in 0..4 {
        assert!(row.is_null(field).unwrap());
        assert!(!row.is_loaded(field).unwrap());
    }
}

/// Typed round trip through the slot of each field
#[test]
fn test_typed_accessors() {
    let day = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    let mut row = ValueHandler::for_table(&events());
    row.set_long(0, 7).unwrap();
    row.set_byte(1, -3).unwrap();
    row.set_date(2, day).unwrap();
    row.set_bytes(3, vec![1, 2, 3]).unwrap();

    assert_eq!(row.get_long(0).unwrap(), Some(7));
    assert_eq!(row.get_byte(1).unwrap(), Some(-3));
    assert_eq!(row.get_date(2).unwrap(), Some(day));
    assert_eq!(row.get(3).unwrap(), Some(&Value::Bytes(vec![1, 2, 3])));
}

/// Accessing a field through the wrong type is an error
#[test]
fn test_type_mismatch() {
    let mut row = ValueHandler::for_table(&events());
    let err = row.set_int(0, 1).unwrap_err();
    assert_eq!(
        err,
        ValueError::TypeMismatch {
            field: 0,
            expected: ColumnType::Long,
            actual: ColumnType::Int,
        }
    );
    assert_eq!(err.code(), "VALUE_TYPE_MISMATCH");
    assert!(row.get_string(1).is_err());
    assert!(row.modified_fields().is_empty());
}

/// Field numbers past the table are rejected
#[test]
fn test_out_of_range() {
    let row = ValueHandler::for_table(&events());
    let err = row.get(4).unwrap_err();
    assert_eq!(err, ValueError::FieldOutOfRange { field: 4, count: 4 });
}

/// Modified bits track writes until reset
#[test]
fn test_modified_tracking() {
    let mut row = ValueHandler::for_table(&events());
    row.set_long(0, 1).unwrap();
    row.set_null(2).unwrap();

    assert_eq!(row.modified_fields(), vec![0, 2]);
    assert!(row.is_loaded(2).unwrap());
    assert!(row.is_null(2).unwrap());
    assert_eq!(row.get_date(2).unwrap(), None);

    row.reset_modified();
    assert!(row.modified_fields().is_empty());
    row.mark_modified(3).unwrap();
    assert!(row.is_modified(3).unwrap());
}

/// Overwriting a null clears it
#[test]
fn test_null_then_value() {
    let mut row = ValueHandler::for_table(&events());
    row.set_null(1).unwrap();
    row.set_byte(1, 9).unwrap();
    assert!(!row.is_null(1).unwrap());
    assert_eq!(row.get_byte(1).unwrap(), Some(9));
}
