//! Residual filter evaluation
//!
//! Evaluates a scan filter against one materialized row, the way a scan
//! applies it to each candidate row.
//!
//! Comparisons against null are unknown, whatever the operator; only
//! `IS NULL` / `IS NOT NULL` see null as a value. Unknown propagates
//! through groups with SQL three-valued logic, so a negated leaf and the
//! NAND/NOR group it came from agree on null rows. A row matches only when
//! the filter is true.

use std::cmp::Ordering;

use crate::planner::{PlanError, PlanResult};
use crate::predicate::CompareOp;
use crate::schema::ColumnType;
use crate::value::{Value, ValueHandler};

use super::filter::{FilterNode, Group, ScanFilter};
use super::params::Parameters;

/// Evaluates scan filters against rows
pub struct FilterEvaluator;

impl FilterEvaluator {
    /// Checks if `row` satisfies `filter` with `params` bound
    pub fn matches(filter: &ScanFilter, row: &ValueHandler, params: &Parameters) -> PlanResult<bool> {
        Ok(Self::evaluate(filter.root(), row, params)? == Some(true))
    }

    /// `None` is unknown
    fn evaluate(node: &FilterNode, row: &ValueHandler, params: &Parameters) -> PlanResult<Option<bool>> {
        match node {
            FilterNode::Group { group, children } => {
                let mut results = Vec::with_capacity(children.len());
                for child in children {
                    results.push(Self::evaluate(child, row, params)?);
                }
                let conjunction = all(&results);
                let disjunction = any(&results);
                Ok(match group {
                    Group::And => conjunction,
                    Group::Or => disjunction,
                    Group::Nand => conjunction.map(|r| !r),
                    Group::Nor => disjunction.map(|r| !r),
                })
            }
            FilterNode::Compare {
                field,
                column,
                op,
                param,
            } => {
                let expected = params.scalar(*param)?;
                if op.is_like() {
                    Self::check_pattern(column, expected)?;
                }
                let Some(actual) = row.get(*field)? else {
                    return Ok(None);
                };
                if op.is_like() {
                    return Ok(actual.like(expected).map(|m| m == (*op == CompareOp::Like)));
                }
                let expected = Self::convert(column, expected, actual)?;
                Ok(Self::compare(*op, actual.compare(&expected)))
            }
            FilterNode::InList {
                field,
                column,
                param,
                negated,
            } => {
                let candidates = params.list(*param)?;
                let Some(actual) = row.get(*field)? else {
                    return Ok(None);
                };
                let mut found = false;
                for candidate in candidates {
                    let candidate = Self::convert(column, candidate, actual)?;
                    if actual.compare(&candidate) == Some(Ordering::Equal) {
                        found = true;
                        break;
                    }
                }
                Ok(Some(found != *negated))
            }
            FilterNode::IsNull { field, .. } => Ok(Some(row.is_null(*field)?)),
            FilterNode::IsNotNull { field, .. } => Ok(Some(!row.is_null(*field)?)),
        }
    }

    /// Converts a parameter to the row value's type, as the field descriptor
    /// would before pushing it to storage.
    fn convert(column: &str, value: &Value, actual: &Value) -> PlanResult<Value> {
        value
            .coerce_to(actual.column_type())
            .ok_or_else(|| PlanError::ParameterType {
                field: column.to_string(),
                expected: actual.column_type(),
                actual: value.column_type(),
            })
    }

    /// LIKE patterns must be strings
    fn check_pattern(column: &str, pattern: &Value) -> PlanResult<()> {
        match pattern {
            Value::String(_) => Ok(()),
            other => Err(PlanError::ParameterType {
                field: column.to_string(),
                expected: ColumnType::String,
                actual: other.column_type(),
            }),
        }
    }

    fn compare(op: CompareOp, ordering: Option<Ordering>) -> Option<bool> {
        let ordering = ordering?;
        Some(match op {
            CompareOp::Equal => ordering == Ordering::Equal,
            CompareOp::NotEqual => ordering != Ordering::Equal,
            CompareOp::LessThan => ordering == Ordering::Less,
            CompareOp::LessEqual => ordering != Ordering::Greater,
            CompareOp::GreaterThan => ordering == Ordering::Greater,
            CompareOp::GreaterEqual => ordering != Ordering::Less,
            CompareOp::Like | CompareOp::NotLike => return None,
        })
    }
}

/// Three-valued AND: false wins, then unknown
fn all(results: &[Option<bool>]) -> Option<bool> {
    if results.contains(&Some(false)) {
        Some(false)
    } else if results.contains(&None) {
        None
    } else {
        Some(true)
    }
}

/// Three-valued OR: true wins, then unknown
fn any(results: &[Option<bool>]) -> Option<bool> {
    if results.contains(&Some(true)) {
        Some(true)
    } else if results.contains(&None) {
        None
    } else {
        Some(false)
    }
}
