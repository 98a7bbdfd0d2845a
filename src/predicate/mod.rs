//! Predicate Tree subsystem
//!
//! The parsed predicate AST, the context that numbers its placeholders,
//! and compilation into a table-resolved [`Predicate`].
//!
//! # Invariants
//!
//! - Every leaf comparison has one field reference and its placeholder(s)
//! - Placeholder ids come from the parse and are never renumbered
//! - The parameter count is the number of distinct placeholder ids

mod compile;
mod compiled;
mod context;
mod node;
mod ops;

pub use compile::{compile, CompiledPredicate};
pub use compiled::{LeafId, Predicate};
pub use context::ParseContext;
pub use node::{NodeKind, ParamId, PredicateNode, PredicateTree};
pub use ops::CompareOp;
