//! Lookup operators.
//!
//! An [`Op`] is the part of a lookup key after the final `__`, as in
//! `score__gte`. A key without a recognized suffix is an exact match.

use std::cmp::Ordering;
use std::fmt;

/// Comparison operator of a [`Lookup`](crate::Lookup).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Op {
    /// Equal. Valid for all types.
    #[default]
    Exact,

    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,

    /// String contains substring.
    Contains,
    /// String starts with prefix.
    StartsWith,
    /// String ends with suffix.
    EndsWith,
    /// String matches regular expression.
    Regex,

    /// Value is one of a list.
    In,
    /// Field is (or is not) null, depending on a boolean operand.
    IsNull,
}

impl Op {
    const ALL: [Op; 11] = [
        Op::Exact,
        Op::Gt,
        Op::Gte,
        Op::Lt,
        Op::Lte,
        Op::Contains,
        Op::StartsWith,
        Op::EndsWith,
        Op::Regex,
        Op::In,
        Op::IsNull,
    ];

    /// Looks up an operator by its suffix name.
    pub fn from_suffix(suffix: &str) -> Option<Op> {
        Op::ALL.into_iter().find(|op| op.as_str() == suffix)
    }

    /// Returns `true` for operators that compare against an ordering.
    pub fn is_ordering_op(self) -> bool {
        matches!(self, Op::Exact | Op::Gt | Op::Gte | Op::Lt | Op::Lte)
    }

    /// Returns `true` for operators that only apply to strings.
    pub fn is_string_op(self) -> bool {
        matches!(
            self,
            Op::Contains | Op::StartsWith | Op::EndsWith | Op::Regex
        )
    }

    /// Evaluates an ordering-based operator given `field.cmp(operand)`.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            Op::Exact => ordering == Ordering::Equal,
            Op::Gt => ordering == Ordering::Greater,
            Op::Gte => ordering != Ordering::Less,
            Op::Lt => ordering == Ordering::Less,
            Op::Lte => ordering != Ordering::Greater,
            _ => false,
        }
    }

    /// Returns the suffix name of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Exact => "exact",
            Op::Gt => "gt",
            Op::Gte => "gte",
            Op::Lt => "lt",
            Op::Lte => "lte",
            Op::Contains => "contains",
            Op::StartsWith => "startswith",
            Op::EndsWith => "endswith",
            Op::Regex => "regex",
            Op::In => "in",
            Op::IsNull => "isnull",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
