//! Planner error types
//!
//! Error codes:
//! - PLAN_UNSUPPORTED_PREDICATE: node shape the compiler cannot translate
//! - PLAN_UNKNOWN_FIELD: predicate names a field the table does not have
//! - PLAN_PARAMETER_COUNT_MISMATCH: runtime values do not match the compiled count
//! - PLAN_PARAMETER_TYPE: runtime value cannot convert to the field's column type
//! - PLAN_PARAMETER_SHAPE: list given for a scalar slot or the reverse
//! - PLAN_INVALID_CONFIG: planner configuration could not be read
//!
//! All of these are raised before any storage operation is issued. Falling
//! back to a table scan is never an error.

use thiserror::Error;

use crate::predicate::ParamId;
use crate::schema::{ColumnType, SchemaError};
use crate::value::ValueError;

/// Result type for planner operations
pub type PlanResult<T> = Result<T, PlanError>;

/// Planning and binding errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    /// Predicate shape cannot be compiled
    #[error("Unsupported predicate: {0}")]
    UnsupportedPredicate(String),

    /// Field reference does not resolve
    #[error("Table '{table}' has no field '{field}'")]
    UnknownField { table: String, field: String },

    /// Wrong number of runtime values
    #[error("Expected {expected} parameters, got {actual}")]
    ParameterCountMismatch { expected: usize, actual: usize },

    /// Runtime value has the wrong type for its field
    #[error("Parameter for field '{field}' is {actual}, expected {expected}")]
    ParameterType {
        field: String,
        expected: ColumnType,
        actual: ColumnType,
    },

    /// Runtime value has the wrong shape for its slot
    #[error("Parameter {param} must be {expected}")]
    ParameterShape { param: ParamId, expected: &'static str },

    /// Planner configuration is unreadable or malformed
    #[error("Invalid planner config: {reason}")]
    InvalidConfig { reason: String },

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Value(#[from] ValueError),
}

impl PlanError {
    /// Create an unsupported-predicate error
    pub fn unsupported(reason: impl Into<String>) -> Self {
        PlanError::UnsupportedPredicate(reason.into())
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            PlanError::UnsupportedPredicate(_) => "PLAN_UNSUPPORTED_PREDICATE",
            PlanError::UnknownField { .. } => "PLAN_UNKNOWN_FIELD",
            PlanError::ParameterCountMismatch { .. } => "PLAN_PARAMETER_COUNT_MISMATCH",
            PlanError::ParameterType { .. } => "PLAN_PARAMETER_TYPE",
            PlanError::ParameterShape { .. } => "PLAN_PARAMETER_SHAPE",
            PlanError::InvalidConfig { .. } => "PLAN_INVALID_CONFIG",
            PlanError::Schema(e) => e.code(),
            PlanError::Value(e) => e.code(),
        }
    }

    /// True for errors decided from predicate shape and metadata alone
    pub fn is_compile_time(&self) -> bool {
        matches!(
            self,
            PlanError::UnsupportedPredicate(_) | PlanError::UnknownField { .. } | PlanError::Schema(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(PlanError::unsupported("x").code(), "PLAN_UNSUPPORTED_PREDICATE");
        assert_eq!(
            PlanError::ParameterCountMismatch { expected: 2, actual: 1 }.code(),
            "PLAN_PARAMETER_COUNT_MISMATCH"
        );
    }

    #[test]
    fn test_error_display() {
        let err = PlanError::ParameterCountMismatch { expected: 3, actual: 1 };
        assert_eq!(err.to_string(), "Expected 3 parameters, got 1");

        let err = PlanError::ParameterShape {
            param: ParamId(2),
            expected: "a list",
        };
        assert_eq!(err.to_string(), "Parameter ?2 must be a list");
    }

    #[test]
    fn test_wrapped_codes_pass_through() {
        let err: PlanError = SchemaError::DuplicateTable("t".into()).into();
        assert_eq!(err.code(), "SCHEMA_DUPLICATE_TABLE");
        assert!(err.is_compile_time());
    }
}
