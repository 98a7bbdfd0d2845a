//! Predicate compilation
//!
//! Resolves a parsed [`PredicateNode`] tree against a table:
//! - field references become field numbers
//! - placeholders keep the ids assigned at parse time
//! - parentheses disappear
//! - AND/OR combine left to right, NOT stays structural
//!
//! A leaf whose left side is not a field reference, or whose right side is
//! not a placeholder, is rejected as unsupported.

use std::collections::BTreeSet;

use super::compiled::{LeafId, Predicate};
use super::node::{ParamId, PredicateNode, PredicateTree};
use crate::planner::{PlanError, PlanResult};
use crate::schema::{FieldDescriptor, TableMetadata};

/// A predicate compiled against one table.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPredicate {
    predicate: Predicate,
    params: Vec<ParamId>,
    leaf_count: usize,
}

impl CompiledPredicate {
    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    /// Distinct parameter ids in ascending order; position is the binding slot.
    pub fn params(&self) -> &[ParamId] {
        &self.params
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }
}

/// Compiles `tree` against `table`.
pub fn compile(tree: &PredicateTree, table: &TableMetadata) -> PlanResult<CompiledPredicate> {
    let mut compiler = Compiler {
        table,
        next_leaf: 0,
        params: BTreeSet::new(),
    };
    let predicate = compiler.compile_node(tree.root())?;

    debug_assert_eq!(compiler.params.len(), tree.param_count());

    Ok(CompiledPredicate {
        predicate,
        params: compiler.params.into_iter().collect(),
        leaf_count: compiler.next_leaf,
    })
}

struct Compiler<'a> {
    table: &'a TableMetadata,
    next_leaf: usize,
    params: BTreeSet<ParamId>,
}

impl<'a> Compiler<'a> {
    fn compile_node(&mut self, node: &PredicateNode) -> PlanResult<Predicate> {
        match node {
            PredicateNode::Comparison { op, left, right } => {
                let field = self.field_operand(left)?;
                if op.is_like() && !field.column_type().supports_like() {
                    return Err(PlanError::unsupported(format!(
                        "{} on {} field '{}'",
                        op,
                        field.column_type(),
                        field.name()
                    )));
                }
                let field = field.field_number();
                let param = self.param_operand(right)?;
                Ok(Predicate::Compare {
                    leaf: self.next_leaf(),
                    field,
                    op: *op,
                    param,
                })
            }
            PredicateNode::Between { operand, low, high } => {
                let field = self.field_operand(operand)?.field_number();
                let low = self.param_operand(low)?;
                let high = self.param_operand(high)?;
                Ok(Predicate::Between {
                    leaf: self.next_leaf(),
                    field,
                    low,
                    high,
                })
            }
            PredicateNode::In { operand, list } => {
                let field = self.field_operand(operand)?.field_number();
                let param = self.param_operand(list)?;
                Ok(Predicate::In {
                    leaf: self.next_leaf(),
                    field,
                    param,
                })
            }
            PredicateNode::IsNull { operand } => {
                let field = self.field_operand(operand)?.field_number();
                Ok(Predicate::IsNull {
                    leaf: self.next_leaf(),
                    field,
                })
            }
            PredicateNode::IsNotNull { operand } => {
                let field = self.field_operand(operand)?.field_number();
                Ok(Predicate::IsNotNull {
                    leaf: self.next_leaf(),
                    field,
                })
            }
            PredicateNode::And { left, right } => {
                let left = self.compile_node(left)?;
                let right = self.compile_node(right)?;
                Ok(left.and(right))
            }
            PredicateNode::Or { left, right } => {
                let left = self.compile_node(left)?;
                let right = self.compile_node(right)?;
                Ok(left.or(right))
            }
            PredicateNode::Not { child } => Ok(self.compile_node(child)?.not()),
            PredicateNode::Parens { child } => self.compile_node(child),
            PredicateNode::Placeholder { id } => Err(PlanError::unsupported(format!(
                "parameter {} used as a predicate",
                id
            ))),
            PredicateNode::FieldRef { name } => Err(PlanError::unsupported(format!(
                "field '{}' used as a predicate",
                name
            ))),
        }
    }

    fn field_operand(&self, node: &PredicateNode) -> PlanResult<&'a FieldDescriptor> {
        match strip_parens(node) {
            PredicateNode::FieldRef { name } => self
                .table
                .field(name)
                .ok_or_else(|| PlanError::UnknownField {
                    table: self.table.name().to_string(),
                    field: name.clone(),
                }),
            other => Err(PlanError::unsupported(format!(
                "left-hand side '{}' is not a field reference",
                other
            ))),
        }
    }

    fn param_operand(&mut self, node: &PredicateNode) -> PlanResult<ParamId> {
        match strip_parens(node) {
            PredicateNode::Placeholder { id } => {
                self.params.insert(*id);
                Ok(*id)
            }
            other => Err(PlanError::unsupported(format!(
                "right-hand side '{}' is not a parameter",
                other
            ))),
        }
    }

    fn next_leaf(&mut self) -> LeafId {
        let id = LeafId(self.next_leaf);
        self.next_leaf += 1;
        id
    }
}

fn strip_parens(mut node: &PredicateNode) -> &PredicateNode {
    while let PredicateNode::Parens { child } = node {
        node = child.as_ref();
    }
    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::{CompareOp, ParseContext};
    use crate::schema::{ColumnType, FieldDescriptor, IndexDef};

    fn table() -> TableMetadata {
        TableMetadata::new(
            "t",
            vec![
                FieldDescriptor::new(0, "a", ColumnType::Int).primary_key(),
                FieldDescriptor::new(1, "b", ColumnType::Int),
                FieldDescriptor::new(2, "c", ColumnType::String),
            ],
            vec![IndexDef::ordered("idx_bc", &["b", "c"])],
        )
        .unwrap()
    }

    #[test]
    fn test_compile_resolves_fields_and_params() {
        let mut ctx = ParseContext::new();
        let tree = PredicateTree::new(ctx.equal("b").and(ctx.compare("c", CompareOp::GreaterThan)));
        let compiled = compile(&tree, &table()).unwrap();

        assert_eq!(compiled.param_count(), 2);
        assert_eq!(compiled.params(), &[ParamId(0), ParamId(1)]);
        assert_eq!(compiled.leaf_count(), 2);
        assert_eq!(
            compiled.predicate(),
            &Predicate::And(vec![
                Predicate::Compare {
                    leaf: LeafId(0),
                    field: 1,
                    op: CompareOp::Equal,
                    param: ParamId(0),
                },
                Predicate::Compare {
                    leaf: LeafId(1),
                    field: 2,
                    op: CompareOp::GreaterThan,
                    param: ParamId(1),
                },
            ])
        );
    }

    #[test]
    fn test_parens_are_transparent() {
        let mut ctx = ParseContext::new();
        let plain = PredicateTree::new(ctx.equal("a"));
        ctx.reset_id();
        let wrapped = PredicateTree::new(ctx.equal("a").parens().parens());

        let t = table();
        assert_eq!(compile(&plain, &t).unwrap(), compile(&wrapped, &t).unwrap());
    }

    #[test]
    fn test_not_between_stays_structural() {
        let mut ctx = ParseContext::new();
        let tree = PredicateTree::new(ctx.between("b").not());
        let compiled = compile(&tree, &table()).unwrap();

        assert_eq!(compiled.param_count(), 2);
        assert!(matches!(
            compiled.predicate(),
            Predicate::Not(inner) if matches!(**inner, Predicate::Between { .. })
        ));
    }

    #[test]
    fn test_lhs_must_be_field() {
        let mut ctx = ParseContext::new();
        let node = PredicateNode::Comparison {
            op: CompareOp::Equal,
            left: Box::new(ctx.placeholder()),
            right: Box::new(ctx.placeholder()),
        };
        let err = compile(&PredicateTree::new(node), &table()).unwrap_err();
        assert_eq!(err.code(), "PLAN_UNSUPPORTED_PREDICATE");
    }

    #[test]
    fn test_rhs_must_be_placeholder() {
        let ctx = ParseContext::new();
        let node = PredicateNode::Comparison {
            op: CompareOp::Equal,
            left: Box::new(ctx.field("a")),
            right: Box::new(ctx.field("b")),
        };
        let err = compile(&PredicateTree::new(node), &table()).unwrap_err();
        assert_eq!(err.code(), "PLAN_UNSUPPORTED_PREDICATE");
    }

    #[test]
    fn test_unknown_field() {
        let mut ctx = ParseContext::new();
        let err = compile(&PredicateTree::new(ctx.equal("zz")), &table()).unwrap_err();
        assert_eq!(err.code(), "PLAN_UNKNOWN_FIELD");
    }

    #[test]
    fn test_like_requires_string_field() {
        let mut ctx = ParseContext::new();
        let tree = PredicateTree::new(ctx.compare("b", CompareOp::Like));
        assert!(compile(&tree, &table()).is_err());

        ctx.reset_id();
        let tree = PredicateTree::new(ctx.compare("c", CompareOp::Like));
        assert!(compile(&tree, &table()).is_ok());
    }

    #[test]
    fn test_bare_placeholder_rejected() {
        let mut ctx = ParseContext::new();
        let err = compile(&PredicateTree::new(ctx.placeholder()), &table()).unwrap_err();
        assert_eq!(err.code(), "PLAN_UNSUPPORTED_PREDICATE");
    }
}
