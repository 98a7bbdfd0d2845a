//! Access-Path Builder subsystem
//!
//! Consumes the selector's winner and produces the access path the
//! execution layer runs.
//!
//! # Execution Flow (strict order)
//!
//! 1. Build: bound directives for the winning index, residual scan filter
//! 2. Bind: check runtime values against the parameter slots
//! 3. Apply: convert every value, then drive the storage operation
//!
//! # Invariants
//!
//! - Bound directives follow index key order
//! - Every `begin(group)` is matched by one `end()`
//! - A rejected parameter issues no storage call

mod access_path;
mod builder;
mod evaluator;
mod filter;
mod operation;
mod params;

pub use access_path::{AccessPath, BoundDirective, BoundSource};
pub use builder::AccessPathBuilder;
pub use evaluator::FilterEvaluator;
pub use filter::{FilterNode, Group, ScanFilter};
pub use operation::{BoundType, IndexOperation, OperationCall, RecordingOperation, ScanFilterSink};
pub use params::{ParamValue, Parameters};
