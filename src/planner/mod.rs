//! Candidate Index Selector subsystem
//!
//! The planner produces deterministic, purely structural access paths: it
//! reads the predicate's shape and the table's index list, never data or
//! statistics.
//!
//! # Index Selection Priority (strict order)
//!
//! 1. Unique index with every column equality-pinned (primary key first)
//! 2. Longest usable prefix: equality columns, then one range/IN column
//! 3. Fewest unbound columns, then declaration order
//! 4. Full table scan
//!
//! # Invariants
//!
//! - Candidate bound state is fresh per plan and never shared
//! - Only a prefix contiguous from column 0 is credited
//! - Falling back to a table scan is never an error

mod bounds;
mod candidate;
mod config;
mod errors;
mod explain;
mod planner;
mod selector;

pub use bounds::{BoundMarker, MarkSummary};
pub use candidate::{
    CandidateIndex, CandidateIndexes, ColumnBounds, EqualPin, InPin, InSource, PrefixScore, RangePin, RangeSide,
};
pub use config::PlannerConfig;
pub use errors::{PlanError, PlanResult};
pub use explain::ExplainPlan;
pub use planner::QueryPlanner;
pub use selector::{IndexSelector, ScanType, Selection};
