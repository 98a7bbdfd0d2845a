//! Comparison operators

use std::fmt;

use serde::{Deserialize, Serialize};

/// Operator of a leaf comparison `field <op> ?`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    Equal,
    NotEqual,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
    Like,
    NotLike,
}

impl CompareOp {
    /// The operator that holds exactly when this one does not
    pub fn negate(self) -> Self {
        match self {
            CompareOp::Equal => CompareOp::NotEqual,
            CompareOp::NotEqual => CompareOp::Equal,
            CompareOp::LessThan => CompareOp::GreaterEqual,
            CompareOp::LessEqual => CompareOp::GreaterThan,
            CompareOp::GreaterThan => CompareOp::LessEqual,
            CompareOp::GreaterEqual => CompareOp::LessThan,
            CompareOp::Like => CompareOp::NotLike,
            CompareOp::NotLike => CompareOp::Like,
        }
    }

    /// Returns true for `<`, `<=`, `>`, `>=`
    pub fn is_range(self) -> bool {
        matches!(
            self,
            CompareOp::LessThan | CompareOp::LessEqual | CompareOp::GreaterThan | CompareOp::GreaterEqual
        )
    }

    /// Returns true for `<` and `>`
    pub fn is_strict(self) -> bool {
        matches!(self, CompareOp::LessThan | CompareOp::GreaterThan)
    }

    pub fn is_like(self) -> bool {
        matches!(self, CompareOp::Like | CompareOp::NotLike)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Equal => "=",
            CompareOp::NotEqual => "<>",
            CompareOp::LessThan => "<",
            CompareOp::LessEqual => "<=",
            CompareOp::GreaterThan => ">",
            CompareOp::GreaterEqual => ">=",
            CompareOp::Like => "LIKE",
            CompareOp::NotLike => "NOT LIKE",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [CompareOp; 8] = [
        CompareOp::Equal,
        CompareOp::NotEqual,
        CompareOp::LessThan,
        CompareOp::LessEqual,
        CompareOp::GreaterThan,
        CompareOp::GreaterEqual,
        CompareOp::Like,
        CompareOp::NotLike,
    ];

    #[test]
    fn test_negation_is_involution() {
        for op in ALL {
            assert_eq!(op.negate().negate(), op);
            assert_ne!(op.negate(), op);
        }
    }

    #[test]
    fn test_range_negation_flips_direction() {
        assert_eq!(CompareOp::LessThan.negate(), CompareOp::GreaterEqual);
        assert_eq!(CompareOp::GreaterThan.negate(), CompareOp::LessEqual);
        assert!(CompareOp::GreaterThan.is_strict());
        assert!(!CompareOp::GreaterEqual.is_strict());
        assert!(!CompareOp::NotEqual.is_range());
    }
}
