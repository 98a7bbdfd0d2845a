//! Query planner
//!
//! Produces deterministic access paths for one registered table.
//!
//! Planning order (strict):
//! 1. Compile the predicate tree against the table
//! 2. Snapshot the table's indexes as fresh candidates
//! 3. Mark bounds from the predicate's conjuncts
//! 4. Select the winning index (or a table scan)
//! 5. Build bound directives and the residual filter
//!
//! The table metadata is shared read-only; all per-plan state lives on the
//! stack of one `plan` call, so a planner can serve concurrent callers.

use std::sync::Arc;

use crate::executor::{AccessPath, AccessPathBuilder, ParamValue, Parameters};
use crate::observability::{log_event_with_fields, PlannerEvent, PlannerMetrics};
use crate::predicate::{compile, PredicateTree};
use crate::schema::TableMetadata;

use super::bounds::BoundMarker;
use super::candidate::CandidateIndexes;
use super::config::PlannerConfig;
use super::errors::PlanResult;
use super::explain::ExplainPlan;
use super::selector::{IndexSelector, ScanType};

/// Plans predicates against one table
#[derive(Debug, Clone)]
pub struct QueryPlanner {
    table: Arc<TableMetadata>,
    config: PlannerConfig,
    metrics: Arc<PlannerMetrics>,
}

impl QueryPlanner {
    /// Creates a planner with its own metrics
    pub fn new(table: Arc<TableMetadata>, config: PlannerConfig) -> Self {
        Self::with_metrics(table, config, Arc::new(PlannerMetrics::new()))
    }

    /// Creates a planner that reports into shared metrics
    pub fn with_metrics(table: Arc<TableMetadata>, config: PlannerConfig, metrics: Arc<PlannerMetrics>) -> Self {
        Self { table, config, metrics }
    }

    pub fn table(&self) -> &TableMetadata {
        &self.table
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn metrics(&self) -> &PlannerMetrics {
        &self.metrics
    }

    /// Plans a predicate, returning an immutable access path or error.
    ///
    /// This method is deterministic: same tree and table, same path.
    pub fn plan(&self, tree: &PredicateTree) -> PlanResult<AccessPath> {
        match self.build_path(tree) {
            Ok(path) => {
                self.record_plan(&path);
                Ok(path)
            }
            Err(err) => {
                self.metrics.increment_plans_rejected();
                let reason = err.to_string();
                log_event_with_fields(
                    PlannerEvent::PlanRejected,
                    &[
                        ("code", err.code()),
                        ("reason", reason.as_str()),
                        ("table", self.table.name()),
                    ],
                );
                Err(err)
            }
        }
    }

    /// Access path for a query with no predicate
    pub fn plan_unfiltered(&self) -> AccessPath {
        let path = AccessPath::unfiltered(self.table.name());
        self.record_plan(&path);
        path
    }

    /// Binds runtime values to a planned path, counting rejections.
    pub fn bind(&self, path: &AccessPath, values: Vec<ParamValue>) -> PlanResult<Parameters> {
        path.bind(values).inspect_err(|_| self.metrics.increment_parameters_rejected())
    }

    /// Plans `tree` and describes the outcome without failing.
    pub fn explain(&self, tree: &PredicateTree) -> ExplainPlan {
        match self.plan(tree) {
            Ok(path) => ExplainPlan::from_access_path(&path),
            Err(err) => ExplainPlan::from_error(self.table.name(), &err),
        }
    }

    fn build_path(&self, tree: &PredicateTree) -> PlanResult<AccessPath> {
        let table = self.table.as_ref();
        let compiled = compile(tree, table)?;

        let mut candidates = CandidateIndexes::from_table(table);
        let summary =
            BoundMarker::new(table, self.config.promote_disjunctions).mark(compiled.predicate(), &mut candidates);

        if self.config.trace_planning {
            for field in &summary.promoted_fields {
                let name = table.field_by_number(*field).map_or("", |f| f.name());
                log_event_with_fields(
                    PlannerEvent::DisjunctionPromoted,
                    &[("field", name), ("table", table.name())],
                );
            }
        }

        let selection = IndexSelector::new(self.config.prefer_primary_key).select(&candidates);
        AccessPathBuilder::new(table).build(&compiled, &candidates, &selection)
    }

    fn record_plan(&self, path: &AccessPath) {
        self.metrics.increment_plans_compiled();
        match path.scan_type() {
            ScanType::PrimaryKeyLookup | ScanType::UniqueLookup => self.metrics.increment_key_lookups(),
            ScanType::IndexScan => self.metrics.increment_index_scans(),
            ScanType::TableScan => self.metrics.increment_table_scans(),
        }

        if !self.config.trace_planning {
            return;
        }

        let bounds = path.bounds().len().to_string();
        let filter_leaves = path.filter_leaf_count().to_string();
        let params = path.param_count().to_string();
        let event = if path.scan_type() == ScanType::TableScan {
            PlannerEvent::TableScanFallback
        } else {
            PlannerEvent::PlanCompiled
        };
        log_event_with_fields(
            event,
            &[
                ("bounds", bounds.as_str()),
                ("filter_leaves", filter_leaves.as_str()),
                ("index", path.index().unwrap_or("-")),
                ("params", params.as_str()),
                ("scan_type", path.scan_type().as_str()),
                ("table", path.table()),
            ],
        );
    }
}
