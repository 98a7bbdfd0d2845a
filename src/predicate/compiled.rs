//! Compiled predicate
//!
//! The table-resolved form of a predicate tree: fields are field numbers,
//! operands are parameter ids, and every leaf carries a [`LeafId`] so the
//! planner can tell which leaves an index consumed.

use std::collections::BTreeSet;

use super::node::ParamId;
use super::ops::CompareOp;

/// Identity of one leaf within a compiled predicate, numbered in source order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LeafId(pub usize);

/// Boolean expression over table fields and parameter slots.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `field <op> ?`
    Compare {
        leaf: LeafId,
        field: usize,
        op: CompareOp,
        param: ParamId,
    },
    /// `field BETWEEN ? AND ?`, inclusive at both ends
    Between {
        leaf: LeafId,
        field: usize,
        low: ParamId,
        high: ParamId,
    },
    /// `field IN ?` against a list-valued parameter
    In {
        leaf: LeafId,
        field: usize,
        param: ParamId,
    },
    IsNull {
        leaf: LeafId,
        field: usize,
    },
    IsNotNull {
        leaf: LeafId,
        field: usize,
    },
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    /// Conjunction, flattening nested ANDs and keeping left-to-right order.
    pub fn and(self, other: Predicate) -> Predicate {
        let mut operands = self.into_operands(true);
        operands.extend(other.into_operands(true));
        Predicate::And(operands)
    }

    /// Disjunction, flattening nested ORs and keeping left-to-right order.
    pub fn or(self, other: Predicate) -> Predicate {
        let mut operands = self.into_operands(false);
        operands.extend(other.into_operands(false));
        Predicate::Or(operands)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Predicate {
        Predicate::Not(Box::new(self))
    }

    fn into_operands(self, conjunction: bool) -> Vec<Predicate> {
        match self {
            Predicate::And(operands) if conjunction => operands,
            Predicate::Or(operands) if !conjunction => operands,
            other => vec![other],
        }
    }

    /// Leaf identity, `None` for boolean nodes
    pub fn leaf_id(&self) -> Option<LeafId> {
        match self {
            Predicate::Compare { leaf, .. }
            | Predicate::Between { leaf, .. }
            | Predicate::In { leaf, .. }
            | Predicate::IsNull { leaf, .. }
            | Predicate::IsNotNull { leaf, .. } => Some(*leaf),
            _ => None,
        }
    }

    /// Field number of a leaf, `None` for boolean nodes
    pub fn field(&self) -> Option<usize> {
        match self {
            Predicate::Compare { field, .. }
            | Predicate::Between { field, .. }
            | Predicate::In { field, .. }
            | Predicate::IsNull { field, .. }
            | Predicate::IsNotNull { field, .. } => Some(*field),
            _ => None,
        }
    }

    /// Every leaf id in this subtree
    pub fn leaves(&self) -> BTreeSet<LeafId> {
        let mut out = BTreeSet::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves(&self, out: &mut BTreeSet<LeafId>) {
        match self {
            Predicate::And(operands) | Predicate::Or(operands) => {
                operands.iter().for_each(|p| p.collect_leaves(out));
            }
            Predicate::Not(inner) => inner.collect_leaves(out),
            leaf => {
                if let Some(id) = leaf.leaf_id() {
                    out.insert(id);
                }
            }
        }
    }

    /// Parameters bound to IN-lists, which take list values
    pub fn list_params(&self) -> BTreeSet<ParamId> {
        match self {
            Predicate::In { param, .. } => BTreeSet::from([*param]),
            Predicate::And(operands) | Predicate::Or(operands) => {
                operands.iter().flat_map(Predicate::list_params).collect()
            }
            Predicate::Not(inner) => inner.list_params(),
            _ => BTreeSet::new(),
        }
    }

    /// Operands of a top-level AND, or the predicate itself
    pub fn conjuncts(&self) -> Vec<&Predicate> {
        match self {
            Predicate::And(operands) => operands.iter().collect(),
            other => vec![other],
        }
    }

    /// If this is an OR whose operands are all `field = ?` on one field,
    /// returns that field and the (leaf, parameter) of each operand.
    pub fn equality_disjunction(&self) -> Option<(usize, Vec<(LeafId, ParamId)>)> {
        let Predicate::Or(operands) = self else {
            return None;
        };

        let mut field_number = None;
        let mut terms = Vec::with_capacity(operands.len());
        for operand in operands {
            match operand {
                Predicate::Compare {
                    leaf,
                    field,
                    op: CompareOp::Equal,
                    param,
                } => {
                    if *field_number.get_or_insert(*field) != *field {
                        return None;
                    }
                    terms.push((*leaf, *param));
                }
                _ => return None,
            }
        }

        field_number.map(|f| (f, terms))
    }

    /// Removes the given conjuncts from a top-level AND.
    ///
    /// Returns `None` when nothing remains.
    pub fn without_conjuncts(&self, consumed: &BTreeSet<LeafId>) -> Option<Predicate> {
        let keep = |p: &Predicate| {
            let leaves = p.leaves();
            leaves.is_empty() || !leaves.is_subset(consumed)
        };

        match self {
            Predicate::And(operands) => {
                let mut remaining: Vec<Predicate> = operands.iter().filter(|p| keep(*p)).cloned().collect();
                match remaining.len() {
                    0 => None,
                    1 => remaining.pop(),
                    _ => Some(Predicate::And(remaining)),
                }
            }
            other if keep(other) => Some(other.clone()),
            _ => None,
        }
    }
}
