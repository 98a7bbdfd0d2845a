//! Access-path construction
//!
//! Turns the selector's winner into bound directives, in key order:
//! - `EQ` for every leading equality column
//! - for the trailing column, either an IN-list (multi-range scan) or its
//!   lower and/or upper bound
//!
//! Every conjunct whose leaves the directives fully consume is dropped from
//! the residual; everything else is lowered into the scan filter.

use std::collections::BTreeSet;

use crate::planner::{CandidateIndex, CandidateIndexes, InSource, PlanResult, RangePin, Selection};
use crate::predicate::{CompiledPredicate, LeafId};
use crate::schema::{SchemaError, TableMetadata};

use super::access_path::{AccessPath, BoundDirective, BoundSource};
use super::filter::ScanFilter;
use super::operation::BoundType;

/// Builds an [`AccessPath`] for one table.
pub struct AccessPathBuilder<'a> {
    table: &'a TableMetadata,
}

impl<'a> AccessPathBuilder<'a> {
    pub fn new(table: &'a TableMetadata) -> Self {
        Self { table }
    }

    pub fn build(
        &self,
        compiled: &CompiledPredicate,
        candidates: &CandidateIndexes,
        selection: &Selection,
    ) -> PlanResult<AccessPath> {
        let mut consumed = BTreeSet::new();
        let (index, bounds) = match selection.index {
            Some(ordinal) => {
                let winner = candidates.get(ordinal);
                let bounds = self.directives(winner, selection, &mut consumed)?;
                (Some(winner.name().to_string()), bounds)
            }
            None => (None, Vec::new()),
        };

        let filter = compiled
            .predicate()
            .without_conjuncts(&consumed)
            .map(|residual| ScanFilter::lower(&residual, self.table))
            .transpose()?;

        Ok(AccessPath::new(
            self.table.name(),
            index,
            selection.scan_type,
            bounds,
            filter,
            compiled.params().to_vec(),
            compiled.predicate().list_params(),
        ))
    }

    fn directives(
        &self,
        winner: &CandidateIndex,
        selection: &Selection,
        consumed: &mut BTreeSet<LeafId>,
    ) -> PlanResult<Vec<BoundDirective>> {
        let score = selection.score;
        let mut directives = Vec::with_capacity(score.length + 1);

        for position in 0..score.equal_columns {
            let Some(pin) = &winner.bounds(position).equal else {
                continue;
            };
            consumed.insert(pin.leaf);
            directives.push(self.directive(winner, position, BoundType::Eq, BoundSource::Param(pin.param))?);
        }

        if !score.has_trailing_column() {
            return Ok(directives);
        }

        let position = score.equal_columns;
        let bounds = winner.bounds(position);

        if let Some(pin) = &bounds.in_list {
            consumed.extend(pin.leaves.iter().copied());
            let source = match &pin.source {
                InSource::List(param) => BoundSource::InList(*param),
                InSource::AnyOf(params) => BoundSource::AnyOf(params.clone()),
            };
            directives.push(self.directive(winner, position, BoundType::Eq, source)?);
            return Ok(directives);
        }

        let mut push_range = |pin: &RangePin, bound: BoundType| -> PlanResult<()> {
            consumed.insert(pin.leaf);
            directives.push(self.directive(winner, position, bound, BoundSource::Param(pin.param))?);
            Ok(())
        };
        if let Some(pin) = &bounds.lower {
            push_range(pin, BoundType::lower(pin.strict))?;
        }
        if let Some(pin) = &bounds.upper {
            push_range(pin, BoundType::upper(pin.strict))?;
        }

        Ok(directives)
    }

    fn directive(
        &self,
        winner: &CandidateIndex,
        position: usize,
        bound_type: BoundType,
        source: BoundSource,
    ) -> PlanResult<BoundDirective> {
        let column = &winner.columns()[position];
        let field = self
            .table
            .field_by_column(column)
            .ok_or_else(|| SchemaError::UnknownIndexColumn {
                table: self.table.name().to_string(),
                index: winner.name().to_string(),
                column: column.clone(),
            })?;

        Ok(BoundDirective {
            field_number: field.field_number(),
            column: column.clone(),
            bound_type,
            source,
        })
    }
}
