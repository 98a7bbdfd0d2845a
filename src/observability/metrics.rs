//! Planner metrics
//!
//! - Counters only, monotonic
//! - Reset only when the registry is created
//! - Thread-safe but lock-free

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Planning counters shared by every planner that reports into them.
///
/// Uses Relaxed ordering; counters are independent of each other.
#[derive(Debug, Default)]
pub struct PlannerMetrics {
    /// Access paths produced
    plans_compiled: AtomicU64,
    /// Predicates rejected at compile time
    plans_rejected: AtomicU64,
    /// Paths that are exact key lookups
    key_lookups: AtomicU64,
    /// Paths that scan an index prefix
    index_scans: AtomicU64,
    /// Paths that scan the whole table
    table_scans: AtomicU64,
    /// Bind calls rejected for count or shape
    parameters_rejected: AtomicU64,
}

impl PlannerMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_plans_compiled(&self) {
        self.plans_compiled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_plans_rejected(&self) {
        self.plans_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_key_lookups(&self) {
        self.key_lookups.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_index_scans(&self) {
        self.index_scans.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_table_scans(&self) {
        self.table_scans.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_parameters_rejected(&self) {
        self.parameters_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            plans_compiled: self.plans_compiled.load(Ordering::Relaxed),
            plans_rejected: self.plans_rejected.load(Ordering::Relaxed),
            key_lookups: self.key_lookups.load(Ordering::Relaxed),
            index_scans: self.index_scans.load(Ordering::Relaxed),
            table_scans: self.table_scans.load(Ordering::Relaxed),
            parameters_rejected: self.parameters_rejected.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time copy of the planner counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub plans_compiled: u64,
    pub plans_rejected: u64,
    pub key_lookups: u64,
    pub index_scans: u64,
    pub table_scans: u64,
    pub parameters_rejected: u64,
}

impl MetricsSnapshot {
    /// Snapshot as a JSON object, keys in declaration order
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
