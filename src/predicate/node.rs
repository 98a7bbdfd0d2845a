//! Predicate AST as delivered by the parser
//!
//! Node kinds and arities:
//! - `Comparison`: field, placeholder
//! - `Between`: field, low placeholder, high placeholder
//! - `In`: field, list placeholder
//! - `IsNull` / `IsNotNull`: field
//! - `Not` / `Parens`: one predicate
//! - `And` / `Or`: two predicates
//! - `Placeholder` / `FieldRef`: operands only, never predicates

use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use super::ops::CompareOp;

/// Placeholder parameter id, assigned in source order at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParamId(pub u32);

impl fmt::Display for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.0)
    }
}

/// Discriminant of a [`PredicateNode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Comparison,
    Between,
    In,
    IsNull,
    IsNotNull,
    Not,
    And,
    Or,
    Parens,
    Placeholder,
    FieldRef,
}

/// One node of a parsed predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PredicateNode {
    Comparison {
        op: CompareOp,
        left: Box<PredicateNode>,
        right: Box<PredicateNode>,
    },
    Between {
        operand: Box<PredicateNode>,
        low: Box<PredicateNode>,
        high: Box<PredicateNode>,
    },
    In {
        operand: Box<PredicateNode>,
        list: Box<PredicateNode>,
    },
    IsNull {
        operand: Box<PredicateNode>,
    },
    IsNotNull {
        operand: Box<PredicateNode>,
    },
    Not {
        child: Box<PredicateNode>,
    },
    And {
        left: Box<PredicateNode>,
        right: Box<PredicateNode>,
    },
    Or {
        left: Box<PredicateNode>,
        right: Box<PredicateNode>,
    },
    Parens {
        child: Box<PredicateNode>,
    },
    Placeholder {
        id: ParamId,
    },
    FieldRef {
        name: String,
    },
}

impl PredicateNode {
    pub fn kind(&self) -> NodeKind {
        match self {
            PredicateNode::Comparison { .. } => NodeKind::Comparison,
            PredicateNode::Between { .. } => NodeKind::Between,
            PredicateNode::In { .. } => NodeKind::In,
            PredicateNode::IsNull { .. } => NodeKind::IsNull,
            PredicateNode::IsNotNull { .. } => NodeKind::IsNotNull,
            PredicateNode::Not { .. } => NodeKind::Not,
            PredicateNode::And { .. } => NodeKind::And,
            PredicateNode::Or { .. } => NodeKind::Or,
            PredicateNode::Parens { .. } => NodeKind::Parens,
            PredicateNode::Placeholder { .. } => NodeKind::Placeholder,
            PredicateNode::FieldRef { .. } => NodeKind::FieldRef,
        }
    }

    /// Children in source order
    pub fn children(&self) -> Vec<&PredicateNode> {
        match self {
            PredicateNode::Comparison { left, right, .. }
            | PredicateNode::And { left, right }
            | PredicateNode::Or { left, right } => vec![&**left, &**right],
            PredicateNode::Between { operand, low, high } => vec![&**operand, &**low, &**high],
            PredicateNode::In { operand, list } => vec![&**operand, &**list],
            PredicateNode::IsNull { operand } | PredicateNode::IsNotNull { operand } => vec![&**operand],
            PredicateNode::Not { child } | PredicateNode::Parens { child } => vec![&**child],
            PredicateNode::Placeholder { .. } | PredicateNode::FieldRef { .. } => Vec::new(),
        }
    }

    /// Distinct placeholder ids reachable from this node
    pub fn param_ids(&self) -> BTreeSet<ParamId> {
        let mut ids = BTreeSet::new();
        self.collect_params(&mut ids);
        ids
    }

    /// Number of parameters this subtree binds
    pub fn param_count(&self) -> usize {
        self.param_ids().len()
    }

    fn collect_params(&self, ids: &mut BTreeSet<ParamId>) {
        if let PredicateNode::Placeholder { id } = self {
            ids.insert(*id);
        }
        for child in self.children() {
            child.collect_params(ids);
        }
    }

    pub fn and(self, other: PredicateNode) -> PredicateNode {
        PredicateNode::And {
            left: Box::new(self),
            right: Box::new(other),
        }
    }

    pub fn or(self, other: PredicateNode) -> PredicateNode {
        PredicateNode::Or {
            left: Box::new(self),
            right: Box::new(other),
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> PredicateNode {
        PredicateNode::Not { child: Box::new(self) }
    }

    pub fn parens(self) -> PredicateNode {
        PredicateNode::Parens { child: Box::new(self) }
    }
}

impl fmt::Display for PredicateNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredicateNode::Comparison { op, left, right } => write!(f, "{} {} {}", left, op, right),
            PredicateNode::Between { operand, low, high } => {
                write!(f, "{} BETWEEN {} AND {}", operand, low, high)
            }
            PredicateNode::In { operand, list } => write!(f, "{} IN {}", operand, list),
            PredicateNode::IsNull { operand } => write!(f, "{} IS NULL", operand),
            PredicateNode::IsNotNull { operand } => write!(f, "{} IS NOT NULL", operand),
            PredicateNode::Not { child } => write!(f, "NOT {}", child),
            PredicateNode::And { left, right } => write!(f, "{} AND {}", left, right),
            PredicateNode::Or { left, right } => write!(f, "{} OR {}", left, right),
            PredicateNode::Parens { child } => write!(f, "({})", child),
            PredicateNode::Placeholder { id } => write!(f, "{}", id),
            PredicateNode::FieldRef { name } => f.write_str(name),
        }
    }
}

/// A parsed predicate reused across executions of one prepared query shape.
///
/// The parameter count is computed on first use and cached.
#[derive(Debug)]
pub struct PredicateTree {
    root: PredicateNode,
    param_count: OnceLock<usize>,
}

impl PredicateTree {
    pub fn new(root: PredicateNode) -> Self {
        Self {
            root,
            param_count: OnceLock::new(),
        }
    }

    pub fn root(&self) -> &PredicateNode {
        &self.root
    }

    /// Number of distinct placeholders in the tree
    pub fn param_count(&self) -> usize {
        *self.param_count.get_or_init(|| self.root.param_count())
    }
}

impl From<PredicateNode> for PredicateTree {
    fn from(root: PredicateNode) -> Self {
        Self::new(root)
    }
}

impl Clone for PredicateTree {
    fn clone(&self) -> Self {
        Self::new(self.root.clone())
    }
}
