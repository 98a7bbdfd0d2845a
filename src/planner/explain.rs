//! Explain plan output
//!
//! Produces deterministic, human-readable explain output.

use std::fmt;

use crate::executor::AccessPath;

use super::errors::PlanError;

/// Explain plan output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplainPlan {
    /// Whether planning succeeded
    pub accepted: bool,
    pub table: String,
    /// Selected index (if any)
    pub selected_index: Option<String>,
    /// Scan type description
    pub scan_type: Option<String>,
    /// Bound directives in key order
    pub bounds: Vec<String>,
    /// Rendered residual filter
    pub filter: Option<String>,
    /// Parameters the path binds
    pub param_count: usize,
    /// Rejection reason (if rejected)
    pub rejection_reason: Option<String>,
    /// Rejection error code (if rejected)
    pub rejection_code: Option<String>,
}

impl ExplainPlan {
    /// Creates an explain plan from an access path
    pub fn from_access_path(path: &AccessPath) -> Self {
        Self {
            accepted: true,
            table: path.table().to_string(),
            selected_index: path.index().map(str::to_string),
            scan_type: Some(path.scan_type().as_str().to_string()),
            bounds: path.bounds().iter().map(ToString::to_string).collect(),
            filter: path.filter().map(ToString::to_string),
            param_count: path.param_count(),
            rejection_reason: None,
            rejection_code: None,
        }
    }

    /// Creates an explain plan from a planning error
    pub fn from_error(table: &str, err: &PlanError) -> Self {
        Self {
            accepted: false,
            table: table.to_string(),
            selected_index: None,
            scan_type: None,
            bounds: Vec::new(),
            filter: None,
            param_count: 0,
            rejection_reason: Some(err.to_string()),
            rejection_code: Some(err.code().to_string()),
        }
    }
}

impl fmt::Display for ExplainPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== EXPLAIN PLAN ===")?;
        writeln!(f, "Table: {}", self.table)?;

        if !self.accepted {
            writeln!(f, "Status: REJECTED")?;
            if let Some(code) = &self.rejection_code {
                writeln!(f, "Error Code: {}", code)?;
            }
            if let Some(reason) = &self.rejection_reason {
                writeln!(f, "Reason: {}", reason)?;
            }
            return Ok(());
        }

        writeln!(f, "Status: ACCEPTED")?;
        if let Some(scan) = &self.scan_type {
            writeln!(f, "Scan Type: {}", scan)?;
        }
        writeln!(f, "Index: {}", self.selected_index.as_deref().unwrap_or("-"))?;
        if !self.bounds.is_empty() {
            writeln!(f, "Bounds:")?;
            for bound in &self.bounds {
                writeln!(f, "  - {}", bound)?;
            }
        }
        writeln!(f, "Filter: {}", self.filter.as_deref().unwrap_or("-"))?;
        writeln!(f, "Parameters: {}", self.param_count)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::planner::{PlannerConfig, QueryPlanner};
    use crate::predicate::{CompareOp, ParseContext, PredicateTree};
    use crate::schema::{ColumnType, FieldDescriptor, IndexDef, TableMetadata};

    fn planner() -> QueryPlanner {
        let table = TableMetadata::new(
            "t",
            vec![
                FieldDescriptor::new(0, "b", ColumnType::Int),
                FieldDescriptor::new(1, "c", ColumnType::Int),
            ],
            vec![IndexDef::ordered("idx_bc", &["b", "c"])],
        )
        .unwrap();
        QueryPlanner::new(Arc::new(table), PlannerConfig::default())
    }

    #[test]
    fn test_explain_accepted_plan() {
        let mut ctx = ParseContext::new();
        let tree = PredicateTree::new(ctx.compare("b", CompareOp::GreaterThan).and(ctx.equal("c")));
        let explain = planner().explain(&tree);

        assert!(explain.accepted);
        assert_eq!(explain.selected_index.as_deref(), Some("idx_bc"));
        assert_eq!(explain.bounds, vec!["b GT ?0".to_string()]);
        assert_eq!(explain.filter.as_deref(), Some("AND(c = ?1)"));

        let output = explain.to_string();
        assert!(output.contains("Scan Type: INDEX_SCAN"));
        assert!(output.contains("  - b GT ?0"));
        assert!(output.contains("Parameters: 2"));
    }

    #[test]
    fn test_explain_rejected_plan() {
        let mut ctx = ParseContext::new();
        let explain = planner().explain(&PredicateTree::new(ctx.equal("missing")));

        assert!(!explain.accepted);
        assert_eq!(explain.rejection_code.as_deref(), Some("PLAN_UNKNOWN_FIELD"));
        assert!(explain.to_string().contains("REJECTED"));
    }

    #[test]
    fn test_explain_deterministic() {
        let mut ctx = ParseContext::new();
        let tree = PredicateTree::new(ctx.equal("b"));
        let p = planner();
        assert_eq!(p.explain(&tree).to_string(), p.explain(&tree).to_string());
    }
}
