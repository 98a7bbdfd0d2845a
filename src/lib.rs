//! accesspath - compiles query predicates into index access paths
//!
//! A predicate tree delivered by a parser is compiled against a table's
//! field and index metadata into:
//!
//! - the index to use (or a full table scan)
//! - the bound directives to hand that index
//! - a residual scan filter for everything the index cannot satisfy
//!
//! Planning is purely structural: no statistics, no cost model.

pub mod executor;
pub mod observability;
pub mod planner;
pub mod predicate;
pub mod schema;
pub mod value;
