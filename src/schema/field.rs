//! Field descriptors
//!
//! One descriptor per persistent field, created when the table is
//! registered and shared read-only by every query compiled against it.
//! A descriptor knows which indexes include its column, marks bounds on
//! those indexes during planning, and pushes typed values into storage
//! operations at execution time.

use crate::executor::{BoundType, IndexOperation, ScanFilterSink};
use crate::planner::{CandidateIndexes, ColumnBounds, EqualPin, InPin, PlanError, PlanResult, RangePin, RangeSide};
use crate::predicate::CompareOp;
use crate::value::Value;

use super::types::ColumnType;

/// Static metadata for one persistent field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    field_number: usize,
    name: String,
    column: String,
    column_type: ColumnType,
    primary_key: bool,
    partition_key: bool,
    lob: bool,
    nullable: bool,
    index_names: Vec<String>,
}

impl FieldDescriptor {
    /// Creates a nullable, non-key field whose column shares its name.
    pub fn new(field_number: usize, name: impl Into<String>, column_type: ColumnType) -> Self {
        let name = name.into();
        Self {
            field_number,
            column: name.clone(),
            name,
            column_type,
            primary_key: false,
            partition_key: false,
            lob: false,
            nullable: true,
            index_names: Vec::new(),
        }
    }

    /// Maps the field to a differently named column
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }

    /// Marks the field as part of the primary key (implies not null)
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    /// Marks the field as part of the partition (distribution) key
    pub fn partition_key(mut self) -> Self {
        self.partition_key = true;
        self
    }

    /// Marks the field as a large object column
    pub fn lob(mut self) -> Self {
        self.lob = true;
        self
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn field_number(&self) -> usize {
        self.field_number
    }

    /// Property name used by predicates
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Storage column name used by indexes and operations
    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    pub fn is_partition_key(&self) -> bool {
        self.partition_key
    }

    pub fn is_lob(&self) -> bool {
        self.lob
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Names of the indexes that include this field's column
    pub fn index_names(&self) -> &[String] {
        &self.index_names
    }

    pub(crate) fn add_index(&mut self, index: &str) {
        if !self.index_names.iter().any(|n| n == index) {
            self.index_names.push(index.to_string());
        }
    }

    // ---------------------------------------------------------------------
    // Bound marking (planning time)
    // ---------------------------------------------------------------------

    /// Records an equality pin on this column in every candidate index that contains it.
    pub fn mark_equal_bound(&self, candidates: &mut CandidateIndexes, pin: EqualPin) {
        self.for_each_column_bounds(candidates, |bounds| {
            bounds.mark_equal(pin.clone());
        });
    }

    /// Records one side of a range on this column in every candidate index that contains it.
    pub fn mark_range_bound(&self, candidates: &mut CandidateIndexes, side: RangeSide, pin: RangePin) {
        self.for_each_column_bounds(candidates, |bounds| {
            bounds.mark_range(side, pin.clone());
        });
    }

    /// Records both sides of a BETWEEN; either both land on a column or neither does.
    pub fn mark_between_bound(&self, candidates: &mut CandidateIndexes, lower: RangePin, upper: RangePin) {
        self.for_each_column_bounds(candidates, |bounds| {
            bounds.mark_between(lower.clone(), upper.clone());
        });
    }

    /// Records an IN-list pin on this column in every candidate index that contains it.
    pub fn mark_in_bound(&self, candidates: &mut CandidateIndexes, pin: InPin) {
        self.for_each_column_bounds(candidates, |bounds| {
            bounds.mark_in(pin.clone());
        });
    }

    fn for_each_column_bounds<F>(&self, candidates: &mut CandidateIndexes, mut f: F)
    where
        F: FnMut(&mut ColumnBounds),
    {
        for index_name in &self.index_names {
            let Some(ordinal) = candidates.ordinal_of(index_name) else {
                continue;
            };
            let index = candidates.get_mut(ordinal);
            if let Some(position) = index.position_of(&self.column) {
                f(index.bounds_mut(position));
            }
        }
    }

    // ---------------------------------------------------------------------
    // Operation building (execution time)
    // ---------------------------------------------------------------------

    /// Converts a runtime parameter to this field's column type.
    pub fn convert(&self, value: &Value) -> PlanResult<Value> {
        value
            .coerce_to(self.column_type)
            .ok_or_else(|| PlanError::ParameterType {
                field: self.name.clone(),
                expected: self.column_type,
                actual: value.column_type(),
            })
    }

    /// Pushes an equality key value into an index or key operation.
    pub fn operation_equal<O>(&self, op: &mut O, value: &Value) -> PlanResult<()>
    where
        O: IndexOperation + ?Sized,
    {
        let value = self.convert(value)?;
        op.equal(&self.column, &value);
        Ok(())
    }

    /// Pushes one scan bound into an index operation.
    pub fn operation_set_bound<O>(&self, op: &mut O, bound: BoundType, value: &Value) -> PlanResult<()>
    where
        O: IndexOperation + ?Sized,
    {
        let value = self.convert(value)?;
        op.set_bound(&self.column, bound, &value);
        Ok(())
    }

    /// Pushes one comparison into a scan filter.
    pub fn operation_compare<S>(&self, sink: &mut S, cmp: CompareOp, value: &Value) -> PlanResult<()>
    where
        S: ScanFilterSink + ?Sized,
    {
        // LIKE patterns are strings whatever the column type
        let value = if cmp.is_like() {
            match value {
                Value::String(_) => value.clone(),
                other => {
                    return Err(PlanError::ParameterType {
                        field: self.name.clone(),
                        expected: ColumnType::String,
                        actual: other.column_type(),
                    })
                }
            }
        } else {
            self.convert(value)?
        };
        sink.compare(cmp, &self.column, &value);
        Ok(())
    }

    /// Pushes a null test into a scan filter.
    pub fn operation_null_test<S>(&self, sink: &mut S, is_null: bool)
    where
        S: ScanFilterSink + ?Sized,
    {
        if is_null {
            sink.is_null(&self.column);
        } else {
            sink.is_not_null(&self.column);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::{OperationCall, RecordingOperation};

    #[test]
    fn test_builder_flags() {
        let f = FieldDescriptor::new(0, "id", ColumnType::Long)
            .with_column("ID")
            .primary_key()
            .partition_key();
        assert_eq!(f.name(), "id");
        assert_eq!(f.column(), "ID");
        assert!(f.is_primary_key());
        assert!(f.is_partition_key());
        assert!(!f.is_nullable());
        assert!(!f.is_lob());
    }

    #[test]
    fn test_operation_equal_converts_to_column_type() {
        let f = FieldDescriptor::new(0, "id", ColumnType::Long);
        let mut op = RecordingOperation::new();
        f.operation_equal(&mut op, &Value::Int(5)).unwrap();
        assert_eq!(
            op.calls(),
            &[OperationCall::Equal {
                column: "id".into(),
                value: Value::Long(5),
            }]
        );
    }

    #[test]
    fn test_operation_rejects_wrong_type() {
        let f = FieldDescriptor::new(1, "name", ColumnType::String);
        let mut op = RecordingOperation::new();
        let err = f
            .operation_set_bound(&mut op, BoundType::Ge, &Value::Int(1))
            .unwrap_err();
        assert_eq!(err.code(), "PLAN_PARAMETER_TYPE");
        assert!(op.calls().is_empty());
    }

    #[test]
    fn test_operation_compare_and_null_test() {
        let f = FieldDescriptor::new(2, "age", ColumnType::Short);
        let mut op = RecordingOperation::new();
        f.operation_compare(&mut op, CompareOp::LessThan, &Value::Int(30)).unwrap();
        f.operation_null_test(&mut op, false);
        assert_eq!(
            op.calls(),
            &[
                OperationCall::Compare {
                    op: CompareOp::LessThan,
                    column: "age".into(),
                    value: Value::Short(30),
                },
                OperationCall::IsNotNull {
                    column: "age".into(),
                },
            ]
        );
    }

    #[test]
    fn test_like_pattern_must_be_string() {
        let f = FieldDescriptor::new(1, "name", ColumnType::String);
        let mut op = RecordingOperation::new();
        let err = f
            .operation_compare(&mut op, CompareOp::NotLike, &Value::Int(5))
            .unwrap_err();
        assert_eq!(
            err,
            PlanError::ParameterType {
                field: "name".into(),
                expected: ColumnType::String,
                actual: ColumnType::Int,
            }
        );
        assert!(op.calls().is_empty());

        f.operation_compare(&mut op, CompareOp::Like, &Value::from("B%")).unwrap();
        assert_eq!(op.filter_leaf_count(), 1);
    }
}
