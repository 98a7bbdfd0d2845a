//! Scan filter tree
//!
//! The residual predicate lowered into comparison leaves joined by explicit
//! groups. Lowering pushes NOT down the tree:
//! - NOT over a comparison becomes the negated operator
//! - NOT over AND becomes a NAND group, NOT over OR a NOR group
//! - NOT over NOT cancels
//! - BETWEEN becomes `>= low AND <= high` (negated: NAND)
//! - IN becomes an OR of equalities (negated: NOR), expanded once the list
//!   length is known
//!
//! The root is always a group; a single residual leaf sits in an AND.

use std::fmt;

use crate::planner::{PlanError, PlanResult};
use crate::predicate::{CompareOp, ParamId, Predicate};
use crate::schema::{FieldDescriptor, SchemaError, TableMetadata};

use super::operation::ScanFilterSink;
use super::params::Parameters;

/// Boolean group marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    And,
    Or,
    /// NOT (all children)
    Nand,
    /// NOT (any child)
    Nor,
}

impl Group {
    pub fn as_str(&self) -> &'static str {
        match self {
            Group::And => "AND",
            Group::Or => "OR",
            Group::Nand => "NAND",
            Group::Nor => "NOR",
        }
    }

    pub fn is_negated(&self) -> bool {
        matches!(self, Group::Nand | Group::Nor)
    }

    /// True for AND and NAND, whose children are combined conjunctively
    fn is_conjunctive(&self) -> bool {
        matches!(self, Group::And | Group::Nand)
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One node of a scan filter tree
#[derive(Debug, Clone, PartialEq)]
pub enum FilterNode {
    Group {
        group: Group,
        children: Vec<FilterNode>,
    },
    Compare {
        field: usize,
        column: String,
        op: CompareOp,
        param: ParamId,
    },
    /// `column IN ?`, or `NOT IN` when negated
    InList {
        field: usize,
        column: String,
        param: ParamId,
        negated: bool,
    },
    IsNull {
        field: usize,
        column: String,
    },
    IsNotNull {
        field: usize,
        column: String,
    },
}

impl FilterNode {
    /// Comparison and null-test leaves; an IN-list counts once
    pub fn leaf_count(&self) -> usize {
        match self {
            FilterNode::Group { children, .. } => children.iter().map(FilterNode::leaf_count).sum(),
            _ => 1,
        }
    }

    /// Group markers, this node included
    pub fn group_count(&self) -> usize {
        match self {
            FilterNode::Group { children, .. } => 1 + children.iter().map(FilterNode::group_count).sum::<usize>(),
            _ => 0,
        }
    }

    fn group(group: Group, lowered: Vec<FilterNode>) -> FilterNode {
        let mut children = Vec::with_capacity(lowered.len());
        for child in lowered {
            match child {
                // AND inside AND/NAND and OR inside OR/NOR add nothing
                FilterNode::Group {
                    group: inner,
                    children: grandchildren,
                } if !inner.is_negated() && inner.is_conjunctive() == group.is_conjunctive() => {
                    children.extend(grandchildren);
                }
                other => children.push(other),
            }
        }
        FilterNode::Group { group, children }
    }

    fn emit<S>(&self, table: &TableMetadata, params: &Parameters, sink: &mut S) -> PlanResult<()>
    where
        S: ScanFilterSink + ?Sized,
    {
        match self {
            FilterNode::Group { group, children } => {
                sink.begin(*group);
                for child in children {
                    child.emit(table, params, sink)?;
                }
                sink.end();
            }
            FilterNode::Compare { field, op, param, .. } => {
                let value = params.scalar(*param)?;
                descriptor(table, *field)?.operation_compare(sink, *op, value)?;
            }
            FilterNode::InList {
                field,
                param,
                negated,
                ..
            } => {
                let descriptor = descriptor(table, *field)?;
                sink.begin(if *negated { Group::Nor } else { Group::Or });
                for value in params.list(*param)? {
                    descriptor.operation_compare(sink, CompareOp::Equal, value)?;
                }
                sink.end();
            }
            FilterNode::IsNull { field, .. } => descriptor(table, *field)?.operation_null_test(sink, true),
            FilterNode::IsNotNull { field, .. } => descriptor(table, *field)?.operation_null_test(sink, false),
        }
        Ok(())
    }
}

impl fmt::Display for FilterNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterNode::Group { group, children } => {
                write!(f, "{}(", group)?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", child)?;
                }
                f.write_str(")")
            }
            FilterNode::Compare { column, op, param, .. } => write!(f, "{} {} {}", column, op, param),
            FilterNode::InList {
                column,
                param,
                negated,
                ..
            } => {
                let op = if *negated { "NOT IN" } else { "IN" };
                write!(f, "{} {} {}", column, op, param)
            }
            FilterNode::IsNull { column, .. } => write!(f, "{} IS NULL", column),
            FilterNode::IsNotNull { column, .. } => write!(f, "{} IS NOT NULL", column),
        }
    }
}

pub(super) fn descriptor(table: &TableMetadata, field: usize) -> PlanResult<&FieldDescriptor> {
    table.field_by_number(field).ok_or_else(|| {
        PlanError::from(SchemaError::malformed(
            table.name(),
            format!("no field number {}", field),
        ))
    })
}

/// Residual filter evaluated per row during a scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanFilter {
    root: FilterNode,
}

impl ScanFilter {
    /// Lowers a compiled predicate against `table`.
    pub fn lower(predicate: &Predicate, table: &TableMetadata) -> PlanResult<Self> {
        let lowering = Lowering { table };
        let root = match lowering.lower(predicate, false)? {
            group @ FilterNode::Group { .. } => group,
            leaf => FilterNode::Group {
                group: Group::And,
                children: vec![leaf],
            },
        };
        Ok(Self { root })
    }

    pub fn root(&self) -> &FilterNode {
        &self.root
    }

    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    pub fn group_count(&self) -> usize {
        self.root.group_count()
    }

    /// Drives `sink` through the tree with `params` substituted.
    pub fn emit<S>(&self, table: &TableMetadata, params: &Parameters, sink: &mut S) -> PlanResult<()>
    where
        S: ScanFilterSink + ?Sized,
    {
        self.root.emit(table, params, sink)
    }
}

impl fmt::Display for ScanFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}

struct Lowering<'a> {
    table: &'a TableMetadata,
}

impl Lowering<'_> {
    fn lower(&self, predicate: &Predicate, negated: bool) -> PlanResult<FilterNode> {
        let node = match predicate {
            Predicate::Compare { field, op, param, .. } => FilterNode::Compare {
                field: *field,
                column: self.column(*field)?,
                op: if negated { op.negate() } else { *op },
                param: *param,
            },
            Predicate::Between { field, low, high, .. } => {
                let column = self.column(*field)?;
                let bounds = vec![
                    FilterNode::Compare {
                        field: *field,
                        column: column.clone(),
                        op: CompareOp::GreaterEqual,
                        param: *low,
                    },
                    FilterNode::Compare {
                        field: *field,
                        column,
                        op: CompareOp::LessEqual,
                        param: *high,
                    },
                ];
                FilterNode::group(if negated { Group::Nand } else { Group::And }, bounds)
            }
            Predicate::In { field, param, .. } => FilterNode::InList {
                field: *field,
                column: self.column(*field)?,
                param: *param,
                negated,
            },
            Predicate::IsNull { field, .. } | Predicate::IsNotNull { field, .. } => {
                let is_null = matches!(predicate, Predicate::IsNull { .. }) != negated;
                let column = self.column(*field)?;
                if is_null {
                    FilterNode::IsNull { field: *field, column }
                } else {
                    FilterNode::IsNotNull { field: *field, column }
                }
            }
            Predicate::And(operands) => {
                let children = self.lower_all(operands)?;
                FilterNode::group(if negated { Group::Nand } else { Group::And }, children)
            }
            Predicate::Or(operands) => {
                let children = self.lower_all(operands)?;
                FilterNode::group(if negated { Group::Nor } else { Group::Or }, children)
            }
            Predicate::Not(inner) => return self.lower(inner, !negated),
        };
        Ok(node)
    }

    fn lower_all(&self, operands: &[Predicate]) -> PlanResult<Vec<FilterNode>> {
        operands.iter().map(|p| self.lower(p, false)).collect()
    }

    fn column(&self, field: usize) -> PlanResult<String> {
        Ok(descriptor(self.table, field)?.column().to_string())
    }
}
