//! Value Handler subsystem
//!
//! Per-row typed storage keyed by field number. Every field descriptor,
//! compiled predicate and result row agrees on the same field numbers, so a
//! materialized row populates exactly the slots the planner reasoned about.
//!
//! # Invariants
//!
//! - Reading an unset or null slot yields `None`, never a stale value
//! - Every write sets the field's modified bit
//! - Slots only accept values of the field's column type

mod bits;
mod errors;
mod handler;
mod types;

pub use bits::FieldBits;
pub use errors::{ValueError, ValueResult};
pub use handler::ValueHandler;
pub use types::Value;
