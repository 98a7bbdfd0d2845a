//! Typed field values
//!
//! One variant per [`ColumnType`]. Values never coerce implicitly: a
//! conversion to a field's column type goes through [`Value::coerce_to`],
//! which only performs lossless conversions.

use std::cmp::Ordering;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::schema::ColumnType;

/// A single typed value held in a row slot or bound to a parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Value {
    Boolean(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
}

impl Value {
    /// Returns the column type this value belongs to
    pub fn column_type(&self) -> ColumnType {
        match self {
            Value::Boolean(_) => ColumnType::Boolean,
            Value::Byte(_) => ColumnType::Byte,
            Value::Short(_) => ColumnType::Short,
            Value::Int(_) => ColumnType::Int,
            Value::Long(_) => ColumnType::Long,
            Value::Float(_) => ColumnType::Float,
            Value::Double(_) => ColumnType::Double,
            Value::String(_) => ColumnType::String,
            Value::Bytes(_) => ColumnType::Bytes,
            Value::Date(_) => ColumnType::Date,
            Value::Timestamp(_) => ColumnType::Timestamp,
        }
    }

    /// Converts this value to `target`, or returns `None` if the conversion
    /// would lose information or is not defined.
    ///
    /// Integers convert between widths when the value fits; integers and
    /// floats widen to double; a date widens to midnight of that day.
    pub fn coerce_to(&self, target: ColumnType) -> Option<Value> {
        if self.column_type() == target {
            return Some(self.clone());
        }

        if let Some(i) = self.as_i64() {
            return match target {
                ColumnType::Byte => i8::try_from(i).ok().map(Value::Byte),
                ColumnType::Short => i16::try_from(i).ok().map(Value::Short),
                ColumnType::Int => i32::try_from(i).ok().map(Value::Int),
                ColumnType::Long => Some(Value::Long(i)),
                ColumnType::Double => match self {
                    Value::Long(_) => None,
                    _ => i32::try_from(i).ok().map(|v| Value::Double(f64::from(v))),
                },
                _ => None,
            };
        }

        match (self, target) {
            (Value::Float(f), ColumnType::Double) => Some(Value::Double(f64::from(*f))),
            (Value::Date(d), ColumnType::Timestamp) => d.and_hms_opt(0, 0, 0).map(Value::Timestamp),
            _ => None,
        }
    }

    /// Compares two values of the same column type.
    ///
    /// Returns `None` across types and for unordered floats.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
            (Value::Byte(a), Value::Byte(b)) => Some(a.cmp(b)),
            (Value::Short(a), Value::Short(b)) => Some(a.cmp(b)),
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Long(a), Value::Long(b)) => Some(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Double(a), Value::Double(b)) => a.partial_cmp(b),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Bytes(a), Value::Bytes(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// SQL `LIKE` match: `%` matches any run of characters, `_` exactly one.
    ///
    /// Returns `None` unless both sides are strings.
    pub fn like(&self, pattern: &Value) -> Option<bool> {
        match (self, pattern) {
            (Value::String(s), Value::String(p)) => {
                let text: Vec<char> = s.chars().collect();
                let pat: Vec<char> = p.chars().collect();
                Some(like_match(&text, &pat))
            }
            _ => None,
        }
    }

    fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Byte(v) => Some(i64::from(*v)),
            Value::Short(v) => Some(i64::from(*v)),
            Value::Int(v) => Some(i64::from(*v)),
            Value::Long(v) => Some(*v),
            _ => None,
        }
    }
}

/// Iterative wildcard match with single-star backtracking.
fn like_match(text: &[char], pat: &[char]) -> bool {
    let (mut t, mut p) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pat.len() && pat[p] == '%' {
            star = Some((p, t));
            p += 1;
        } else if p < pat.len() && (pat[p] == '_' || pat[p] == text[t]) {
            t += 1;
            p += 1;
        } else if let Some((sp, st)) = star {
            p = sp + 1;
            t = st + 1;
            star = Some((sp, st + 1));
        } else {
            return false;
        }
    }

    pat[p..].iter().all(|c| *c == '%')
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(v) => write!(f, "{}", v),
            Value::Byte(v) => write!(f, "{}", v),
            Value::Short(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Long(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::String(v) => write!(f, "'{}'", v),
            Value::Bytes(v) => write!(f, "<{} bytes>", v.len()),
            Value::Date(v) => write!(f, "{}", v),
            Value::Timestamp(v) => write!(f, "{}", v),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Long(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}
