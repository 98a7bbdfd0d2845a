//! Bound marking
//!
//! Walks the top-level conjuncts of a compiled predicate and asks each
//! field descriptor to pin its column in the candidate indexes.
//!
//! Only conjuncts can narrow an index scan:
//! - `=` pins equality, `<`/`<=` an upper bound, `>`/`>=` a lower bound
//! - BETWEEN pins both sides inclusively
//! - IN pins an IN-list
//! - an OR of equalities on one field pins an IN-list when promotion is on
//!
//! Everything else (NOT, `<>`, LIKE, null tests, other ORs) marks nothing
//! and is left for the residual filter.

use crate::predicate::{CompareOp, Predicate};
use crate::schema::TableMetadata;

use super::candidate::{CandidateIndexes, EqualPin, InPin, InSource, RangePin, RangeSide};

/// What a marking pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkSummary {
    /// Conjuncts that produced a pin
    pub marked: usize,
    /// Field numbers whose equality disjunction became an IN-list
    pub promoted_fields: Vec<usize>,
}

/// Marks candidate-index bounds for one table.
pub struct BoundMarker<'a> {
    table: &'a TableMetadata,
    promote_disjunctions: bool,
}

impl<'a> BoundMarker<'a> {
    pub fn new(table: &'a TableMetadata, promote_disjunctions: bool) -> Self {
        Self {
            table,
            promote_disjunctions,
        }
    }

    /// Records every pin the predicate's conjuncts imply.
    pub fn mark(&self, predicate: &Predicate, candidates: &mut CandidateIndexes) -> MarkSummary {
        let mut summary = MarkSummary::default();

        for conjunct in predicate.conjuncts() {
            if self.mark_conjunct(conjunct, candidates, &mut summary) {
                summary.marked += 1;
            }
        }

        summary
    }

    fn mark_conjunct(
        &self,
        conjunct: &Predicate,
        candidates: &mut CandidateIndexes,
        summary: &mut MarkSummary,
    ) -> bool {
        match conjunct {
            Predicate::Compare {
                leaf,
                field,
                op,
                param,
            } => {
                let Some(descriptor) = self.table.field_by_number(*field) else {
                    return false;
                };
                let (leaf, param) = (*leaf, *param);
                match op {
                    CompareOp::Equal => {
                        descriptor.mark_equal_bound(candidates, EqualPin { leaf, param });
                    }
                    CompareOp::LessThan | CompareOp::LessEqual => {
                        let pin = RangePin {
                            leaf,
                            param,
                            strict: op.is_strict(),
                        };
                        descriptor.mark_range_bound(candidates, RangeSide::Upper, pin);
                    }
                    CompareOp::GreaterThan | CompareOp::GreaterEqual => {
                        let pin = RangePin {
                            leaf,
                            param,
                            strict: op.is_strict(),
                        };
                        descriptor.mark_range_bound(candidates, RangeSide::Lower, pin);
                    }
                    CompareOp::NotEqual | CompareOp::Like | CompareOp::NotLike => return false,
                }
                true
            }
            Predicate::Between {
                leaf,
                field,
                low,
                high,
            } => {
                let Some(descriptor) = self.table.field_by_number(*field) else {
                    return false;
                };
                let lower = RangePin {
                    leaf: *leaf,
                    param: *low,
                    strict: false,
                };
                let upper = RangePin {
                    leaf: *leaf,
                    param: *high,
                    strict: false,
                };
                descriptor.mark_between_bound(candidates, lower, upper);
                true
            }
            Predicate::In { leaf, field, param } => {
                let Some(descriptor) = self.table.field_by_number(*field) else {
                    return false;
                };
                let pin = InPin {
                    leaves: vec![*leaf],
                    source: InSource::List(*param),
                };
                descriptor.mark_in_bound(candidates, pin);
                true
            }
            Predicate::Or(_) if self.promote_disjunctions => {
                let Some((field, terms)) = conjunct.equality_disjunction() else {
                    return false;
                };
                let Some(descriptor) = self.table.field_by_number(field) else {
                    return false;
                };
                let pin = InPin {
                    leaves: terms.iter().map(|(leaf, _)| *leaf).collect(),
                    source: InSource::AnyOf(terms.iter().map(|(_, param)| *param).collect()),
                };
                descriptor.mark_in_bound(candidates, pin);
                summary.promoted_fields.push(field);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::{compile, LeafId, ParamId, ParseContext, PredicateTree};
    use crate::schema::{ColumnType, FieldDescriptor, IndexDef};

    fn table() -> TableMetadata {
        TableMetadata::new(
            "t",
            vec![
                FieldDescriptor::new(0, "a", ColumnType::Int).primary_key(),
                FieldDescriptor::new(1, "b", ColumnType::Int),
                FieldDescriptor::new(2, "c", ColumnType::Int),
            ],
            vec![IndexDef::ordered("idx_bc", &["b", "c"])],
        )
        .unwrap()
    }

    fn marked(tree: PredicateTree, promote: bool) -> (CandidateIndexes, MarkSummary) {
        let t = table();
        let compiled = compile(&tree, &t).unwrap();
        let mut candidates = CandidateIndexes::from_table(&t);
        let summary = BoundMarker::new(&t, promote).mark(compiled.predicate(), &mut candidates);
        (candidates, summary)
    }

    #[test]
    fn test_equal_and_range_pins() {
        let mut ctx = ParseContext::new();
        let tree = PredicateTree::new(ctx.equal("b").and(ctx.compare("c", CompareOp::LessThan)));
        let (candidates, summary) = marked(tree, true);

        let idx = candidates.get(candidates.ordinal_of("idx_bc").unwrap());
        assert_eq!(
            idx.bounds(0).equal,
            Some(EqualPin {
                leaf: LeafId(0),
                param: ParamId(0)
            })
        );
        assert_eq!(
            idx.bounds(1).upper,
            Some(RangePin {
                leaf: LeafId(1),
                param: ParamId(1),
                strict: true
            })
        );
        assert!(idx.bounds(1).lower.is_none());
        assert_eq!(summary.marked, 2);
    }

    #[test]
    fn test_or_is_not_marked_without_promotion() {
        let mut ctx = ParseContext::new();
        let tree = PredicateTree::new(ctx.equal("b").or(ctx.equal("b")));
        let (candidates, summary) = marked(tree, false);

        assert!(candidates.iter().all(|c| c.usable_prefix().length == 0));
        assert_eq!(summary.marked, 0);
    }

    #[test]
    fn test_equality_disjunction_promoted_to_in() {
        let mut ctx = ParseContext::new();
        let tree = PredicateTree::new(ctx.equal("b").or(ctx.equal("b")));
        let (candidates, summary) = marked(tree, true);

        let idx = candidates.get(candidates.ordinal_of("idx_bc").unwrap());
        assert_eq!(
            idx.bounds(0).in_list,
            Some(InPin {
                leaves: vec![LeafId(0), LeafId(1)],
                source: InSource::AnyOf(vec![ParamId(0), ParamId(1)]),
            })
        );
        assert_eq!(summary.promoted_fields, vec![1]);
    }

    #[test]
    fn test_not_and_not_equal_mark_nothing() {
        let mut ctx = ParseContext::new();
        let tree = PredicateTree::new(
            ctx.equal("b")
                .not()
                .and(ctx.compare("c", CompareOp::NotEqual))
                .and(ctx.is_null("a")),
        );
        let (candidates, summary) = marked(tree, true);
        assert!(candidates.iter().all(|c| c.usable_prefix().length == 0));
        assert_eq!(summary.marked, 0);
    }
}
