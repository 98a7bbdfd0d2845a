//! Observability subsystem
//!
//! - Structured logging (JSON lines)
//! - Planner counters
//! - Typed planner events
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on planning
//! 3. No async or background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```
//! use accesspath::observability::{log_event_with_fields, PlannerEvent, PlannerMetrics};
//!
//! log_event_with_fields(PlannerEvent::TableRegistered, &[("table", "orders")]);
//!
//! let metrics = PlannerMetrics::new();
//! metrics.increment_plans_compiled();
//! assert_eq!(metrics.snapshot().plans_compiled, 1);
//! ```

mod events;
mod logger;
mod metrics;

pub use events::PlannerEvent;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsSnapshot, PlannerMetrics};

/// Log a planner event at its own severity
pub fn log_event(event: PlannerEvent) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log a planner event with fields
pub fn log_event_with_fields(event: PlannerEvent, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
