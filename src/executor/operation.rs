//! Storage operation interfaces
//!
//! The execution layer hands the access path an operation to drive. Index
//! bounds go through [`IndexOperation`], residual filter nodes through
//! [`ScanFilterSink`]. Group boundaries are explicit, so every `begin` is
//! matched by exactly one `end`.

use std::fmt;

use crate::predicate::CompareOp;
use crate::value::Value;

use super::filter::Group;

/// How a column value constrains an index scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundType {
    Eq,
    Ge,
    Gt,
    Le,
    Lt,
}

impl BoundType {
    /// Lower bound of a range, `Gt` when strict
    pub fn lower(strict: bool) -> Self {
        if strict {
            BoundType::Gt
        } else {
            BoundType::Ge
        }
    }

    /// Upper bound of a range, `Lt` when strict
    pub fn upper(strict: bool) -> Self {
        if strict {
            BoundType::Lt
        } else {
            BoundType::Le
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BoundType::Eq => "EQ",
            BoundType::Ge => "GE",
            BoundType::Gt => "GT",
            BoundType::Le => "LE",
            BoundType::Lt => "LT",
        }
    }
}

impl fmt::Display for BoundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receives key values and scan bounds.
pub trait IndexOperation {
    /// Equality on one key column
    fn equal(&mut self, column: &str, value: &Value);

    /// One bound of the scan range on one key column
    fn set_bound(&mut self, column: &str, bound: BoundType, value: &Value);

    /// Closes range `range_no` of a multi-range scan
    fn end_bound(&mut self, range_no: usize);
}

/// Receives the residual scan filter, depth first.
pub trait ScanFilterSink {
    fn begin(&mut self, group: Group);

    fn compare(&mut self, op: CompareOp, column: &str, value: &Value);

    fn is_null(&mut self, column: &str);

    fn is_not_null(&mut self, column: &str);

    fn end(&mut self);
}

/// One call made on a [`RecordingOperation`]
#[derive(Debug, Clone, PartialEq)]
pub enum OperationCall {
    Equal {
        column: String,
        value: Value,
    },
    SetBound {
        column: String,
        bound: BoundType,
        value: Value,
    },
    EndBound {
        range: usize,
    },
    Begin {
        group: Group,
    },
    Compare {
        op: CompareOp,
        column: String,
        value: Value,
    },
    IsNull {
        column: String,
    },
    IsNotNull {
        column: String,
    },
    End,
}

impl fmt::Display for OperationCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationCall::Equal { column, value } => write!(f, "equal({}, {})", column, value),
            OperationCall::SetBound { column, bound, value } => {
                write!(f, "set_bound({}, {}, {})", column, bound, value)
            }
            OperationCall::EndBound { range } => write!(f, "end_bound({})", range),
            OperationCall::Begin { group } => write!(f, "begin({})", group),
            OperationCall::Compare { op, column, value } => {
                write!(f, "compare({} {} {})", column, op, value)
            }
            OperationCall::IsNull { column } => write!(f, "is_null({})", column),
            OperationCall::IsNotNull { column } => write!(f, "is_not_null({})", column),
            OperationCall::End => f.write_str("end()"),
        }
    }
}

/// Operation that records every call it receives.
///
/// Also used to stage an access path's calls so a conversion failure
/// surfaces before anything reaches the real operation.
#[derive(Debug, Clone, Default)]
pub struct RecordingOperation {
    calls: Vec<OperationCall>,
}

impl RecordingOperation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[OperationCall] {
        &self.calls
    }

    pub fn into_calls(self) -> Vec<OperationCall> {
        self.calls
    }

    /// Number of filter comparisons and null tests recorded
    pub fn filter_leaf_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| {
                matches!(
                    c,
                    OperationCall::Compare { .. } | OperationCall::IsNull { .. } | OperationCall::IsNotNull { .. }
                )
            })
            .count()
    }

    /// Re-issues every recorded call, in order, on `target`.
    pub fn replay<O>(&self, target: &mut O)
    where
        O: IndexOperation + ScanFilterSink + ?Sized,
    {
        for call in &self.calls {
            match call {
                OperationCall::Equal { column, value } => target.equal(column, value),
                OperationCall::SetBound { column, bound, value } => target.set_bound(column, *bound, value),
                OperationCall::EndBound { range } => target.end_bound(*range),
                OperationCall::Begin { group } => target.begin(*group),
                OperationCall::Compare { op, column, value } => target.compare(*op, column, value),
                OperationCall::IsNull { column } => target.is_null(column),
                OperationCall::IsNotNull { column } => target.is_not_null(column),
                OperationCall::End => target.end(),
            }
        }
    }
}

impl IndexOperation for RecordingOperation {
    fn equal(&mut self, column: &str, value: &Value) {
        self.calls.push(OperationCall::Equal {
            column: column.to_string(),
            value: value.clone(),
        });
    }

    fn set_bound(&mut self, column: &str, bound: BoundType, value: &Value) {
        self.calls.push(OperationCall::SetBound {
            column: column.to_string(),
            bound,
            value: value.clone(),
        });
    }

    fn end_bound(&mut self, range_no: usize) {
        self.calls.push(OperationCall::EndBound { range: range_no });
    }
}

impl ScanFilterSink for RecordingOperation {
    fn begin(&mut self, group: Group) {
        self.calls.push(OperationCall::Begin { group });
    }

    fn compare(&mut self, op: CompareOp, column: &str, value: &Value) {
        self.calls.push(OperationCall::Compare {
            op,
            column: column.to_string(),
            value: value.clone(),
        });
    }

    fn is_null(&mut self, column: &str) {
        self.calls.push(OperationCall::IsNull {
            column: column.to_string(),
        });
    }

    fn is_not_null(&mut self, column: &str) {
        self.calls.push(OperationCall::IsNotNull {
            column: column.to_string(),
        });
    }

    fn end(&mut self) {
        self.calls.push(OperationCall::End);
    }
}
