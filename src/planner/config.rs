//! Planner configuration
//!
//! Loaded from JSON; every field is optional and falls back to its default.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{PlanError, PlanResult};

/// Planner configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Treat `f = ? OR f = ? ...` as an IN-list bound (default: true)
    #[serde(default = "default_promote_disjunctions")]
    pub promote_disjunctions: bool,

    /// Log every accepted plan at TRACE (default: false)
    #[serde(default)]
    pub trace_planning: bool,

    /// Prefer the primary key when several unique indexes are fully pinned
    /// (default: true)
    #[serde(default = "default_prefer_primary_key")]
    pub prefer_primary_key: bool,
}

fn default_promote_disjunctions() -> bool {
    true
}

fn default_prefer_primary_key() -> bool {
    true
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            promote_disjunctions: default_promote_disjunctions(),
            trace_planning: false,
            prefer_primary_key: default_prefer_primary_key(),
        }
    }
}

impl PlannerConfig {
    pub fn from_json(json: &str) -> PlanResult<Self> {
        serde_json::from_str(json).map_err(|e| PlanError::InvalidConfig {
            reason: e.to_string(),
        })
    }

    pub fn from_file(path: &Path) -> PlanResult<Self> {
        let json = fs::read_to_string(path).map_err(|e| PlanError::InvalidConfig {
            reason: format!("{}: {}", path.display(), e),
        })?;
        Self::from_json(&json)
    }

    /// Config with planning traces switched on
    pub fn traced() -> Self {
        Self {
            trace_planning: true,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PlannerConfig::default();
        assert!(config.promote_disjunctions);
        assert!(!config.trace_planning);
        assert!(config.prefer_primary_key);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = PlannerConfig::from_json(r#"{"promote_disjunctions": false}"#).unwrap();
        assert!(!config.promote_disjunctions);
        assert!(config.prefer_primary_key);
        assert_eq!(PlannerConfig::from_json("{}").unwrap(), PlannerConfig::default());
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = PlannerConfig::from_json(r#"{"trace_planning": "yes"}"#).unwrap_err();
        assert_eq!(err.code(), "PLAN_INVALID_CONFIG");
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planner.json");
        fs::write(&path, r#"{"trace_planning": true}"#).unwrap();

        assert_eq!(PlannerConfig::from_file(&path).unwrap(), PlannerConfig::traced());
        assert!(PlannerConfig::from_file(&dir.path().join("missing.json")).is_err());
    }
}
