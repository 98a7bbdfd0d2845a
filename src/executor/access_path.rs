//! Access path
//!
//! The immutable result of planning one predicate against one table:
//! - which index to read (or none, for a table scan)
//! - the bound directives for that index, in key order
//! - the residual scan filter
//! - the parameter slots runtime values must fill
//!
//! Binding and applying are separate steps. `bind` checks count and shape;
//! `apply` converts every value to its column type before the first call
//! reaches the caller's operation, so a rejected value issues nothing.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::observability::{log_event_with_fields, PlannerEvent};
use crate::planner::{PlanError, PlanResult, ScanType};
use crate::predicate::ParamId;
use crate::schema::TableMetadata;
use crate::value::Value;

use super::filter::{descriptor, ScanFilter};
use super::operation::{BoundType, IndexOperation, RecordingOperation, ScanFilterSink};
use super::params::{ParamValue, Parameters};

/// Where a bound directive's value comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundSource {
    /// One scalar parameter
    Param(ParamId),
    /// Every element of a list parameter, one scan range each
    InList(ParamId),
    /// One scalar parameter per range, from a promoted disjunction
    AnyOf(Vec<ParamId>),
}

impl BoundSource {
    /// True when the directive expands into several scan ranges
    pub fn is_multi_range(&self) -> bool {
        !matches!(self, BoundSource::Param(_))
    }
}

impl fmt::Display for BoundSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundSource::Param(id) => write!(f, "{}", id),
            BoundSource::InList(id) => write!(f, "IN {}", id),
            BoundSource::AnyOf(ids) => {
                let ids: Vec<String> = ids.iter().map(ToString::to_string).collect();
                write!(f, "ANY({})", ids.join(", "))
            }
        }
    }
}

/// One bound on one index column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundDirective {
    pub field_number: usize,
    pub column: String,
    pub bound_type: BoundType,
    pub source: BoundSource,
}

impl fmt::Display for BoundDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.column, self.bound_type, self.source)
    }
}

/// Compiled plan for reading one table.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessPath {
    table: String,
    index: Option<String>,
    scan_type: ScanType,
    bounds: Vec<BoundDirective>,
    filter: Option<ScanFilter>,
    params: Vec<ParamId>,
    list_params: BTreeSet<ParamId>,
}

impl AccessPath {
    pub(crate) fn new(
        table: &str,
        index: Option<String>,
        scan_type: ScanType,
        bounds: Vec<BoundDirective>,
        filter: Option<ScanFilter>,
        params: Vec<ParamId>,
        list_params: BTreeSet<ParamId>,
    ) -> Self {
        Self {
            table: table.to_string(),
            index,
            scan_type,
            bounds,
            filter,
            params,
            list_params,
        }
    }

    /// Full scan with no filter and no parameters
    pub fn unfiltered(table: &str) -> Self {
        Self::new(
            table,
            None,
            ScanType::TableScan,
            Vec::new(),
            None,
            Vec::new(),
            BTreeSet::new(),
        )
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Chosen index name, `None` for a table scan
    pub fn index(&self) -> Option<&str> {
        self.index.as_deref()
    }

    pub fn scan_type(&self) -> ScanType {
        self.scan_type
    }

    /// Bound directives in index key order
    pub fn bounds(&self) -> &[BoundDirective] {
        &self.bounds
    }

    /// Residual filter, `None` when the index consumes every leaf
    pub fn filter(&self) -> Option<&ScanFilter> {
        self.filter.as_ref()
    }

    /// Number of filter leaves (comparisons and null tests)
    pub fn filter_leaf_count(&self) -> usize {
        self.filter.as_ref().map_or(0, ScanFilter::leaf_count)
    }

    /// Parameter slots in binding order
    pub fn params(&self) -> &[ParamId] {
        &self.params
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// True for a multi-range scan driven by an IN-list
    pub fn is_multi_range(&self) -> bool {
        self.bounds.last().is_some_and(|d| d.source.is_multi_range())
    }

    /// Validates runtime values against the parameter slots.
    ///
    /// `values[i]` fills `params()[i]`. IN-list slots take lists, every
    /// other slot a scalar.
    pub fn bind(&self, values: Vec<ParamValue>) -> PlanResult<Parameters> {
        let result = self.check_values(&values);
        if let Err(err) = &result {
            let expected = self.params.len().to_string();
            let actual = values.len().to_string();
            log_event_with_fields(
                PlannerEvent::ParametersRejected,
                &[
                    ("actual", actual.as_str()),
                    ("code", err.code()),
                    ("expected", expected.as_str()),
                    ("table", self.table.as_str()),
                ],
            );
        }
        result?;

        Ok(Parameters::new(
            self.params.iter().copied().zip(values).collect::<BTreeMap<_, _>>(),
        ))
    }

    fn check_values(&self, values: &[ParamValue]) -> PlanResult<()> {
        if values.len() != self.params.len() {
            return Err(PlanError::ParameterCountMismatch {
                expected: self.params.len(),
                actual: values.len(),
            });
        }

        for (id, value) in self.params.iter().zip(values) {
            let wants_list = self.list_params.contains(id);
            if wants_list != value.is_list() {
                return Err(PlanError::ParameterShape {
                    param: *id,
                    expected: if wants_list { "a list" } else { "a scalar" },
                });
            }
            // An empty list would leave a multi-range scan with no ranges
            if matches!(value, ParamValue::List(list) if list.is_empty()) {
                return Err(PlanError::ParameterShape {
                    param: *id,
                    expected: "a non-empty list",
                });
            }
        }
        Ok(())
    }

    /// Drives `op` with this path's key values, bounds and filter.
    ///
    /// Calls are staged and only replayed onto `op` once every value has
    /// converted; on error `op` receives nothing.
    pub fn apply<O>(&self, table: &TableMetadata, params: &Parameters, op: &mut O) -> PlanResult<()>
    where
        O: IndexOperation + ScanFilterSink + ?Sized,
    {
        if table.name() != self.table {
            return Err(PlanError::unsupported(format!(
                "access path for table '{}' applied to table '{}'",
                self.table,
                table.name()
            )));
        }
        if params.len() != self.params.len() {
            return Err(PlanError::ParameterCountMismatch {
                expected: self.params.len(),
                actual: params.len(),
            });
        }

        let mut staged = RecordingOperation::new();
        self.emit_bounds(table, params, &mut staged)?;
        if let Some(filter) = &self.filter {
            filter.emit(table, params, &mut staged)?;
        }

        staged.replay(op);
        Ok(())
    }

    fn emit_bounds(&self, table: &TableMetadata, params: &Parameters, op: &mut RecordingOperation) -> PlanResult<()> {
        let (prefix, trailing) = match self.bounds.split_last() {
            Some((last, prefix)) if last.source.is_multi_range() => (prefix, Some(last)),
            _ => (self.bounds.as_slice(), None),
        };

        let Some(trailing) = trailing else {
            for directive in prefix {
                Self::emit_directive(table, params, directive, op)?;
            }
            return Ok(());
        };

        let values: Vec<&Value> = match &trailing.source {
            BoundSource::Param(id) => vec![params.scalar(*id)?],
            BoundSource::InList(id) => params.list(*id)?.iter().collect(),
            BoundSource::AnyOf(ids) => ids
                .iter()
                .map(|id| params.scalar(*id))
                .collect::<PlanResult<_>>()?,
        };

        if values.is_empty() {
            let param = match &trailing.source {
                BoundSource::Param(id) | BoundSource::InList(id) => *id,
                BoundSource::AnyOf(ids) => ids.first().copied().unwrap_or(ParamId(0)),
            };
            return Err(PlanError::ParameterShape {
                param,
                expected: "a non-empty list",
            });
        }

        let field = descriptor(table, trailing.field_number)?;
        for (range_no, value) in values.into_iter().enumerate() {
            for directive in prefix {
                Self::emit_directive(table, params, directive, op)?;
            }
            field.operation_equal(op, value)?;
            op.end_bound(range_no);
        }
        Ok(())
    }

    fn emit_directive(
        table: &TableMetadata,
        params: &Parameters,
        directive: &BoundDirective,
        op: &mut RecordingOperation,
    ) -> PlanResult<()> {
        let BoundSource::Param(id) = &directive.source else {
            return Err(PlanError::unsupported(format!(
                "multi-range bound on non-trailing column '{}'",
                directive.column
            )));
        };
        let field = descriptor(table, directive.field_number)?;
        let value = params.scalar(*id)?;
        match directive.bound_type {
            BoundType::Eq => field.operation_equal(op, value),
            bound => field.operation_set_bound(op, bound, value),
        }
    }
}
