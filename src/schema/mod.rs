//! Table metadata subsystem
//!
//! Field descriptors and the static index list, registered once per table
//! and shared read-only by every query compiled against it.
//!
//! # Invariants
//!
//! - Field numbers run 0..n in declaration order
//! - Every index column maps to exactly one field
//! - The primary key, when present, is index ordinal 0

mod errors;
mod field;
mod loader;
mod table;
mod types;

pub use errors::{SchemaError, SchemaResult};
pub use field::FieldDescriptor;
pub use loader::{FieldDef, TableDef, TableLoader};
pub use table::{IndexDef, TableMetadata, PRIMARY_INDEX_NAME};
pub use types::ColumnType;
