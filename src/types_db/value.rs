use crate::sql::execution::expressions::join_predicate::ComparisonOp;
use crate::types_db::type_id::TypeId;
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::fmt::{Display, Formatter};

/// A typed scalar held in a tuple slot.
///
/// `Eq` and `Hash` are derived together, so two values that compare equal
/// always hash equal. The hash join's bucket lookup depends on this. Values of
/// different variants are never equal, even when the payloads coincide.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
pub enum Value {
    Boolean(bool),
    Integer(i32),
    BigInt(i64),
    VarChar(String),
    Char(String),
}

impl Value {
    pub fn new<T: Into<Value>>(value: T) -> Self {
        value.into()
    }

    /// Builds a fixed-length string value.
    pub fn new_char(value: &str) -> Self {
        Value::Char(value.to_string())
    }

    pub fn get_type_id(&self) -> TypeId {
        match self {
            Value::Boolean(_) => TypeId::Boolean,
            Value::Integer(_) => TypeId::Integer,
            Value::BigInt(_) => TypeId::BigInt,
            Value::VarChar(_) => TypeId::VarChar,
            Value::Char(_) => TypeId::Char,
        }
    }

    pub fn as_integer(&self) -> Option<i32> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::VarChar(s) | Value::Char(s) => Some(s),
            _ => None,
        }
    }

    fn partial_cmp_same_type(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::BigInt(a), Value::BigInt(b)) => Some(a.cmp(b)),
            (Value::VarChar(a), Value::VarChar(b)) => Some(a.cmp(b)),
            (Value::Char(a), Value::Char(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Evaluates `self op other`. Operands of different types never satisfy
    /// any operator, `NotEquals` included.
    pub fn compare(&self, op: ComparisonOp, other: &Value) -> bool {
        let Some(ordering) = self.partial_cmp_same_type(other) else {
            return false;
        };
        match op {
            ComparisonOp::Equals => ordering == Ordering::Equal,
            ComparisonOp::NotEquals => ordering != Ordering::Equal,
            ComparisonOp::GreaterThan => ordering == Ordering::Greater,
            ComparisonOp::GreaterThanOrEq => ordering != Ordering::Less,
            ComparisonOp::LessThan => ordering == Ordering::Less,
            ComparisonOp::LessThanOrEq => ordering != Ordering::Greater,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::BigInt(i)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::VarChar(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::VarChar(s.to_string())
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::BigInt(i) => write!(f, "{}", i),
            Value::VarChar(s) | Value::Char(s) => write!(f, "{}", s),
        }
    }
}
