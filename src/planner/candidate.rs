//! Candidate indexes
//!
//! A fresh snapshot of the table's indexes is taken for every compilation.
//! Each index records, per column position, which predicate leaves pin it
//! (equality, lower/upper range bound, IN-list). Field descriptors write the
//! pins by index ordinal; the selector only reads them.

use crate::predicate::{LeafId, ParamId};
use crate::schema::{IndexDef, TableMetadata};

/// Equality pin: `column = ?`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EqualPin {
    pub leaf: LeafId,
    pub param: ParamId,
}

/// One side of a range: `column >(=) ?` or `column <(=) ?`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangePin {
    pub leaf: LeafId,
    pub param: ParamId,
    pub strict: bool,
}

/// Where the values of an IN-list pin come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InSource {
    /// One list-valued parameter (`column IN ?`)
    List(ParamId),
    /// One scalar parameter per operand of an equality disjunction
    AnyOf(Vec<ParamId>),
}

/// IN-list pin. A disjunction is consumed only when all its leaves are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InPin {
    pub leaves: Vec<LeafId>,
    pub source: InSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSide {
    Lower,
    Upper,
}

/// Pins recorded on one index column. The first pin of each kind wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnBounds {
    pub equal: Option<EqualPin>,
    pub lower: Option<RangePin>,
    pub upper: Option<RangePin>,
    pub in_list: Option<InPin>,
}

impl ColumnBounds {
    pub fn mark_equal(&mut self, pin: EqualPin) -> bool {
        if self.equal.is_some() {
            return false;
        }
        self.equal = Some(pin);
        true
    }

    pub fn mark_range(&mut self, side: RangeSide, pin: RangePin) -> bool {
        let slot = match side {
            RangeSide::Lower => &mut self.lower,
            RangeSide::Upper => &mut self.upper,
        };
        if slot.is_some() {
            return false;
        }
        *slot = Some(pin);
        true
    }

    /// Marks both sides or neither.
    pub fn mark_between(&mut self, lower: RangePin, upper: RangePin) -> bool {
        if self.lower.is_some() || self.upper.is_some() {
            return false;
        }
        self.lower = Some(lower);
        self.upper = Some(upper);
        true
    }

    pub fn mark_in(&mut self, pin: InPin) -> bool {
        if self.in_list.is_some() {
            return false;
        }
        self.in_list = Some(pin);
        true
    }

    pub fn is_equal(&self) -> bool {
        self.equal.is_some()
    }

    pub fn has_range(&self) -> bool {
        self.lower.is_some() || self.upper.is_some()
    }

    pub fn has_in(&self) -> bool {
        self.in_list.is_some()
    }
}

/// How much of an index's key a predicate constrains.
///
/// Ordered by length, then by the number of equality columns, so a key
/// equality-pinned to length N beats N-1 equalities plus a range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct PrefixScore {
    /// Contiguous leading columns usable for the scan
    pub length: usize,
    /// Leading columns pinned by equality
    pub equal_columns: usize,
}

impl PrefixScore {
    /// True when the last usable column is a range or IN-list column
    pub fn has_trailing_column(&self) -> bool {
        self.length > self.equal_columns
    }
}

/// Per-compilation view of one table index.
#[derive(Debug, Clone)]
pub struct CandidateIndex {
    ordinal: usize,
    name: String,
    columns: Vec<String>,
    unique: bool,
    primary: bool,
    bounds: Vec<ColumnBounds>,
}

impl CandidateIndex {
    pub fn from_def(ordinal: usize, def: &IndexDef) -> Self {
        Self {
            ordinal,
            name: def.name.clone(),
            columns: def.columns.clone(),
            unique: def.unique,
            primary: def.is_primary(),
            bounds: vec![ColumnBounds::default(); def.columns.len()],
        }
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn is_unique(&self) -> bool {
        self.unique
    }

    pub fn is_primary(&self) -> bool {
        self.primary
    }

    /// Key position of `column`, if the index contains it
    pub fn position_of(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn bounds(&self, position: usize) -> &ColumnBounds {
        &self.bounds[position]
    }

    pub fn bounds_mut(&mut self, position: usize) -> &mut ColumnBounds {
        &mut self.bounds[position]
    }

    /// Leading equality columns, then at most one range or IN column.
    /// The first unpinned column ends the prefix.
    pub fn usable_prefix(&self) -> PrefixScore {
        let equal_columns = self.bounds.iter().take_while(|b| b.is_equal()).count();
        let trailing = self
            .bounds
            .get(equal_columns)
            .is_some_and(|b| b.has_range() || b.has_in());

        PrefixScore {
            length: equal_columns + usize::from(trailing),
            equal_columns,
        }
    }

    /// True when every key column is equality-pinned
    pub fn is_fully_equal(&self) -> bool {
        self.bounds.iter().all(ColumnBounds::is_equal)
    }

    /// Key columns left unconstrained by `score`
    pub fn remaining_columns(&self, score: PrefixScore) -> usize {
        self.columns.len() - score.length
    }
}

/// Arena of candidate indexes addressed by ordinal (declaration order).
#[derive(Debug, Clone)]
pub struct CandidateIndexes {
    indexes: Vec<CandidateIndex>,
}

impl CandidateIndexes {
    /// Fresh, unpinned snapshot of the table's indexes.
    pub fn from_table(table: &TableMetadata) -> Self {
        Self {
            indexes: table
                .indexes()
                .iter()
                .enumerate()
                .map(|(ordinal, def)| CandidateIndex::from_def(ordinal, def))
                .collect(),
        }
    }

    pub fn ordinal_of(&self, name: &str) -> Option<usize> {
        self.indexes.iter().position(|i| i.name == name)
    }

    /// # Panics
    ///
    /// If `ordinal` did not come from this arena.
    pub fn get(&self, ordinal: usize) -> &CandidateIndex {
        &self.indexes[ordinal]
    }

    /// # Panics
    ///
    /// If `ordinal` did not come from this arena.
    pub fn get_mut(&mut self, ordinal: usize) -> &mut CandidateIndex {
        &mut self.indexes[ordinal]
    }

    pub fn iter(&self) -> impl Iterator<Item = &CandidateIndex> {
        self.indexes.iter()
    }

    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }
}
