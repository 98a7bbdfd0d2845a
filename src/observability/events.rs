//! Planner events
//!
//! Events are explicit and typed; each carries its own severity.

use std::fmt;

use super::logger::Severity;

/// Observable events in table registration and planning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannerEvent {
    /// Table metadata registered
    TableRegistered,
    /// Predicate planned onto an index
    PlanCompiled,
    /// Predicate rejected at compile time
    PlanRejected,
    /// No index usable; full table scan chosen
    TableScanFallback,
    /// Equality disjunction treated as an IN-list
    DisjunctionPromoted,
    /// Runtime values rejected at bind time
    ParametersRejected,
}

impl PlannerEvent {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            PlannerEvent::TableRegistered => "TABLE_REGISTERED",
            PlannerEvent::PlanCompiled => "PLAN_COMPILED",
            PlannerEvent::PlanRejected => "PLAN_REJECTED",
            PlannerEvent::TableScanFallback => "TABLE_SCAN_FALLBACK",
            PlannerEvent::DisjunctionPromoted => "DISJUNCTION_PROMOTED",
            PlannerEvent::ParametersRejected => "PARAMETERS_REJECTED",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            PlannerEvent::TableRegistered => Severity::Info,
            PlannerEvent::PlanCompiled | PlannerEvent::TableScanFallback | PlannerEvent::DisjunctionPromoted => {
                Severity::Trace
            }
            PlannerEvent::PlanRejected | PlannerEvent::ParametersRejected => Severity::Warn,
        }
    }
}

impl fmt::Display for PlannerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
