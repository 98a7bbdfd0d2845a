//! Candidate index selection
//!
//! Selection priority (strict order):
//! 1. A unique index with every column equality-pinned (exact key lookup),
//!    the primary key first when several qualify
//! 2. The highest usable-prefix score, equality columns weighted above a
//!    trailing range/IN column of the same length
//! 3. On a score tie, fewer unbound columns, then declaration order
//! 4. No index scoring above zero: full table scan
//!
//! Selection reads the marked candidates only; it never looks at data.

use std::fmt;

use super::candidate::{CandidateIndex, CandidateIndexes, PrefixScore};

/// How the chosen access path reads the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanType {
    /// Exact primary key lookup
    PrimaryKeyLookup,
    /// Exact lookup on another unique index
    UniqueLookup,
    /// Bounded scan over an index prefix
    IndexScan,
    /// Full table scan
    TableScan,
}

impl ScanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanType::PrimaryKeyLookup => "PK_LOOKUP",
            ScanType::UniqueLookup => "UNIQUE_LOOKUP",
            ScanType::IndexScan => "INDEX_SCAN",
            ScanType::TableScan => "TABLE_SCAN",
        }
    }

    /// True for the exact-key lookups of step 1
    pub fn is_key_lookup(&self) -> bool {
        matches!(self, ScanType::PrimaryKeyLookup | ScanType::UniqueLookup)
    }
}

impl fmt::Display for ScanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Ordinal of the winning candidate, `None` for a table scan
    pub index: Option<usize>,
    pub scan_type: ScanType,
    pub score: PrefixScore,
}

impl Selection {
    pub fn table_scan() -> Self {
        Self {
            index: None,
            scan_type: ScanType::TableScan,
            score: PrefixScore::default(),
        }
    }
}

/// Picks the winning index from a marked candidate set.
#[derive(Debug, Clone, Copy)]
pub struct IndexSelector {
    prefer_primary_key: bool,
}

impl IndexSelector {
    pub fn new(prefer_primary_key: bool) -> Self {
        Self { prefer_primary_key }
    }

    pub fn select(&self, candidates: &CandidateIndexes) -> Selection {
        if let Some(lookup) = self.select_key_lookup(candidates) {
            let scan_type = if lookup.is_primary() {
                ScanType::PrimaryKeyLookup
            } else {
                ScanType::UniqueLookup
            };
            return Selection {
                index: Some(lookup.ordinal()),
                scan_type,
                score: lookup.usable_prefix(),
            };
        }

        let mut best: Option<(&CandidateIndex, PrefixScore)> = None;
        for candidate in candidates.iter() {
            let score = candidate.usable_prefix();
            if score.length == 0 {
                continue;
            }

            let better = match best {
                None => true,
                Some((current, current_score)) => {
                    score > current_score
                        || (score == current_score
                            && candidate.remaining_columns(score) < current.remaining_columns(current_score))
                }
            };
            if better {
                best = Some((candidate, score));
            }
        }

        match best {
            Some((winner, score)) => Selection {
                index: Some(winner.ordinal()),
                scan_type: ScanType::IndexScan,
                score,
            },
            None => Selection::table_scan(),
        }
    }

    fn select_key_lookup<'c>(&self, candidates: &'c CandidateIndexes) -> Option<&'c CandidateIndex> {
        let mut hits = candidates
            .iter()
            .filter(|c| c.is_unique() && !c.columns().is_empty() && c.is_fully_equal());

        if self.prefer_primary_key {
            let hits: Vec<_> = hits.collect();
            hits.iter().find(|c| c.is_primary()).or_else(|| hits.first()).copied()
        } else {
            hits.next()
        }
    }
}

impl Default for IndexSelector {
    fn default() -> Self {
        Self::new(true)
    }
}
