//! Keyword-style lookups passed to `filter` and `exclude`.
//!
//! A [`Lookup`] is built from a key such as `"score__gte"` and an operand.
//! A [`Filter`] is a conjunction of lookups. Filters are handed to each
//! source as-is; a source that understands them narrows itself, any other
//! source declines with [`Unsupported`] and is kept unchanged.
//!
//! ```
//! use standout_chain::{Filter, Op};
//!
//! let filter = Filter::new()
//!     .and("score__gte", 3i64)
//!     .and("name__startswith", "a")
//!     .and("team", "red");
//!
//! assert_eq!(filter.lookups()[0].op, Op::Gte);
//! assert_eq!(filter.lookups()[2].op, Op::Exact);
//! ```

use std::cmp::Ordering;

use regex::Regex;

use crate::error::{Result, Unsupported};
use crate::op::Op;
use crate::ordering::compare_values;
use crate::value::{FieldAccess, Number, Scalar, Timestamp, Value};

/// Right-hand side of a lookup.
#[derive(Debug, Clone)]
pub enum Operand {
    /// A single value.
    Scalar(Scalar),
    /// A list of values, for `in`.
    List(Vec<Scalar>),
    /// Compiled regular expression, for `regex`.
    Regex(Regex),
}

impl Operand {
    /// Short description of the operand's shape, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Operand::Scalar(value) => value.as_value().type_name(),
            Operand::List(_) => "list",
            Operand::Regex(_) => "regex",
        }
    }
}

impl From<Scalar> for Operand {
    fn from(value: Scalar) -> Self {
        Operand::Scalar(value)
    }
}

macro_rules! operand_from {
    ($($t:ty),+) => {
        $(
            impl From<$t> for Operand {
                fn from(value: $t) -> Self {
                    Operand::Scalar(Scalar::from(value))
                }
            }
        )+
    };
}

operand_from!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);
operand_from!(bool, String, &str, Timestamp, Number);

impl<S: Into<Scalar>> From<Vec<S>> for Operand {
    fn from(values: Vec<S>) -> Self {
        values.into_iter().collect()
    }
}

impl<S: Into<Scalar>> FromIterator<S> for Operand {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Operand::List(iter.into_iter().map(Into::into).collect())
    }
}

/// A single field comparison.
#[derive(Debug, Clone)]
pub struct Lookup {
    /// The field to read.
    pub field: String,
    /// How to compare.
    pub op: Op,
    /// What to compare against.
    pub operand: Operand,
}

impl Lookup {
    /// Parses `key` into field and operator.
    ///
    /// The text after the last `__` selects the operator when it names one;
    /// otherwise the whole key is the field and the operator is `exact`.
    pub fn new(key: &str, operand: impl Into<Operand>) -> Self {
        let (field, op) = match key.rsplit_once("__") {
            Some((field, suffix)) => match Op::from_suffix(suffix) {
                Some(op) => (field, op),
                None => (key, Op::Exact),
            },
            None => (key, Op::Exact),
        };
        Lookup {
            field: field.to_owned(),
            op,
            operand: operand.into(),
        }
    }

    /// Builds a regex lookup, compiling `pattern`.
    pub fn regex(field: &str, pattern: &str) -> Result<Self> {
        Ok(Lookup {
            field: field.to_owned(),
            op: Op::Regex,
            operand: Operand::Regex(Regex::new(pattern)?),
        })
    }

    /// Checks that the operand shape suits the operator.
    pub fn check(&self) -> std::result::Result<(), Unsupported> {
        let ok = match (self.op, &self.operand) {
            (Op::In, Operand::List(_)) => true,
            (Op::Regex, Operand::Regex(_)) => true,
            (Op::IsNull, Operand::Scalar(Scalar::Bool(_))) => true,
            (op, Operand::Scalar(Scalar::String(_))) if op.is_string_op() => op != Op::Regex,
            (op, Operand::Scalar(_)) => op.is_ordering_op(),
            _ => false,
        };
        if ok {
            Ok(())
        } else {
            Err(Unsupported::InvalidArgument(format!(
                "'{}' lookup on '{}' cannot take a {} operand",
                self.op,
                self.field,
                self.operand.type_name()
            )))
        }
    }

    /// Evaluates this lookup against a field value.
    ///
    /// Null fields only ever satisfy `exact` against a null operand and
    /// `isnull=true`.
    pub fn matches(&self, value: &Value<'_>) -> bool {
        match (self.op, &self.operand) {
            (Op::IsNull, Operand::Scalar(Scalar::Bool(want))) => value.is_none() == *want,
            (Op::In, Operand::List(items)) => items.iter().any(|item| {
                compare_values(value, &item.as_value()) == Some(Ordering::Equal)
            }),
            (Op::Regex, Operand::Regex(re)) => value.as_str().is_some_and(|s| re.is_match(s)),
            (Op::Exact, Operand::Scalar(operand)) => {
                compare_values(value, &operand.as_value()) == Some(Ordering::Equal)
            }
            (op, Operand::Scalar(operand)) if op.is_ordering_op() => {
                let operand = operand.as_value();
                if value.is_none() || operand.is_none() {
                    return false;
                }
                compare_values(value, &operand).is_some_and(|ord| op.eval_ordering(ord))
            }
            (op, Operand::Scalar(Scalar::String(pattern))) => match value.as_str() {
                Some(s) => match op {
                    Op::Contains => s.contains(pattern.as_str()),
                    Op::StartsWith => s.starts_with(pattern.as_str()),
                    Op::EndsWith => s.ends_with(pattern.as_str()),
                    _ => false,
                },
                None => false,
            },
            _ => false,
        }
    }
}

/// A conjunction of lookups.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    lookups: Vec<Lookup>,
}

impl Filter {
    /// Creates an empty filter, which matches everything.
    pub fn new() -> Self {
        Filter::default()
    }

    /// Adds a lookup parsed from `key`.
    pub fn and(mut self, key: &str, operand: impl Into<Operand>) -> Self {
        self.lookups.push(Lookup::new(key, operand));
        self
    }

    /// Adds a regex lookup.
    ///
    /// Returns an error if the pattern is invalid.
    pub fn and_regex(mut self, field: &str, pattern: &str) -> Result<Self> {
        self.lookups.push(Lookup::regex(field, pattern)?);
        Ok(self)
    }

    /// Adds a prebuilt lookup.
    pub fn with(mut self, lookup: Lookup) -> Self {
        self.lookups.push(lookup);
        self
    }

    /// Returns the lookups.
    pub fn lookups(&self) -> &[Lookup] {
        &self.lookups
    }

    /// Returns `true` if this filter has no lookups.
    pub fn is_empty(&self) -> bool {
        self.lookups.is_empty()
    }

    /// Validates this filter against the fields of `T`.
    pub fn check<T: FieldAccess>(&self) -> std::result::Result<(), Unsupported> {
        for lookup in &self.lookups {
            if !T::has_field(&lookup.field) {
                return Err(Unsupported::UnknownField(lookup.field.clone()));
            }
            lookup.check()?;
        }
        Ok(())
    }

    /// Tests whether `item` satisfies every lookup.
    pub fn matches<T: FieldAccess + ?Sized>(&self, item: &T) -> bool {
        self.lookups
            .iter()
            .all(|lookup| lookup.matches(&item.field_value(&lookup.field)))
    }
}
