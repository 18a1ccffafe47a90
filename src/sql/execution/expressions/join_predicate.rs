use crate::storage::table::tuple::Tuple;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    Equals,
    NotEquals,
    GreaterThan,
    GreaterThanOrEq,
    LessThan,
    LessThanOrEq,
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            ComparisonOp::Equals => "=",
            ComparisonOp::NotEquals => "<>",
            ComparisonOp::GreaterThan => ">",
            ComparisonOp::GreaterThanOrEq => ">=",
            ComparisonOp::LessThan => "<",
            ComparisonOp::LessThanOrEq => "<=",
        };
        write!(f, "{}", symbol)
    }
}

/// Compares field `field1` of a left tuple with field `field2` of a right tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinPredicate {
    field1: usize,
    op: ComparisonOp,
    field2: usize,
}

impl JoinPredicate {
    pub fn new(field1: usize, op: ComparisonOp, field2: usize) -> Self {
        Self { field1, op, field2 }
    }

    /// Shorthand for `left[field1] = right[field2]`.
    pub fn equals(field1: usize, field2: usize) -> Self {
        Self::new(field1, ComparisonOp::Equals, field2)
    }

    pub fn get_field1(&self) -> usize {
        self.field1
    }

    pub fn get_field2(&self) -> usize {
        self.field2
    }

    pub fn get_operator(&self) -> ComparisonOp {
        self.op
    }

    /// Returns false when either side's slot is unset.
    pub fn filter(&self, left: &Tuple, right: &Tuple) -> bool {
        match (left.get_value(self.field1), right.get_value(self.field2)) {
            (Some(l), Some(r)) => l.compare(self.op, r),
            _ => false,
        }
    }
}

impl fmt::Display for JoinPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {} #{}", self.field1, self.op, self.field2)
    }
}
