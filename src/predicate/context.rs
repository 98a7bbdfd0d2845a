//! Parse context
//!
//! Placeholder ids are handed out by the context a parse runs in, never by
//! process-wide state, so independent parses can run side by side and
//! number their parameters identically.

use super::node::{ParamId, PredicateNode};
use super::ops::CompareOp;

/// State threaded through one parse: the next placeholder id.
///
/// Ids increase monotonically and are never reused until [`reset_id`]
/// starts a new independent statement.
///
/// [`reset_id`]: ParseContext::reset_id
#[derive(Debug, Default)]
pub struct ParseContext {
    next_id: u32,
}

impl ParseContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restarts numbering for a new statement.
    pub fn reset_id(&mut self) {
        self.next_id = 0;
    }

    /// Allocates the next placeholder id.
    pub fn next_param(&mut self) -> ParamId {
        let id = ParamId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Number of ids allocated since the last reset
    pub fn allocated(&self) -> usize {
        self.next_id as usize
    }

    pub fn placeholder(&mut self) -> PredicateNode {
        PredicateNode::Placeholder { id: self.next_param() }
    }

    pub fn field(&self, name: impl Into<String>) -> PredicateNode {
        PredicateNode::FieldRef { name: name.into() }
    }

    /// `field <op> ?`
    pub fn compare(&mut self, field: &str, op: CompareOp) -> PredicateNode {
        PredicateNode::Comparison {
            op,
            left: Box::new(self.field(field)),
            right: Box::new(self.placeholder()),
        }
    }

    /// `field = ?`
    pub fn equal(&mut self, field: &str) -> PredicateNode {
        self.compare(field, CompareOp::Equal)
    }

    /// `field BETWEEN ? AND ?`, low bound numbered first
    pub fn between(&mut self, field: &str) -> PredicateNode {
        let operand = Box::new(self.field(field));
        let low = Box::new(self.placeholder());
        let high = Box::new(self.placeholder());
        PredicateNode::Between { operand, low, high }
    }

    /// `field IN ?` with one list-valued parameter
    pub fn in_list(&mut self, field: &str) -> PredicateNode {
        PredicateNode::In {
            operand: Box::new(self.field(field)),
            list: Box::new(self.placeholder()),
        }
    }

    pub fn is_null(&self, field: &str) -> PredicateNode {
        PredicateNode::IsNull {
            operand: Box::new(self.field(field)),
        }
    }

    pub fn is_not_null(&self, field: &str) -> PredicateNode {
        PredicateNode::IsNotNull {
            operand: Box::new(self.field(field)),
        }
    }
}
