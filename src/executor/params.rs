//! Bound runtime parameters

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::planner::{PlanError, PlanResult};
use crate::predicate::ParamId;
use crate::value::Value;

/// Runtime value for one parameter slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Scalar(Value),
    /// Value list for `field IN ?`
    List(Vec<Value>),
}

impl ParamValue {
    pub fn is_list(&self) -> bool {
        matches!(self, ParamValue::List(_))
    }
}

impl From<Value> for ParamValue {
    fn from(value: Value) -> Self {
        ParamValue::Scalar(value)
    }
}

impl From<Vec<Value>> for ParamValue {
    fn from(values: Vec<Value>) -> Self {
        ParamValue::List(values)
    }
}

/// Parameter values keyed by placeholder id, validated against one access path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    values: BTreeMap<ParamId, ParamValue>,
}

impl Parameters {
    pub(crate) fn new(values: BTreeMap<ParamId, ParamValue>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, id: ParamId) -> Option<&ParamValue> {
        self.values.get(&id)
    }

    /// Scalar value of `id`
    pub fn scalar(&self, id: ParamId) -> PlanResult<&Value> {
        match self.values.get(&id) {
            Some(ParamValue::Scalar(value)) => Ok(value),
            Some(ParamValue::List(_)) => Err(PlanError::ParameterShape {
                param: id,
                expected: "a scalar",
            }),
            None => Err(PlanError::ParameterCountMismatch {
                expected: self.values.len() + 1,
                actual: self.values.len(),
            }),
        }
    }

    /// List value of `id`
    pub fn list(&self, id: ParamId) -> PlanResult<&[Value]> {
        match self.values.get(&id) {
            Some(ParamValue::List(values)) => Ok(values),
            Some(ParamValue::Scalar(_)) => Err(PlanError::ParameterShape {
                param: id,
                expected: "a list",
            }),
            None => Err(PlanError::ParameterCountMismatch {
                expected: self.values.len() + 1,
                actual: self.values.len(),
            }),
        }
    }
}
