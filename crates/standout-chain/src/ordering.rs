//! Ordering clauses and comparison keys.
//!
//! [`OrderBy`] names a field and a [`Dir`]. [`Key`] is what a chain's key
//! extractor produces for each element: a tuple of scalars compared
//! lexicographically, each part honoring its own direction.

use std::cmp::Ordering;
use std::fmt;

use crate::value::{FieldAccess, Scalar, Timestamp, Value};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Applies this direction to an ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }
}

/// A single ordering clause: a field and a direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// The field to sort by.
    pub field: String,
    /// The sort direction.
    pub dir: Dir,
}

impl OrderBy {
    /// Ascending ordering on `field`.
    pub fn asc(field: impl Into<String>) -> Self {
        OrderBy {
            field: field.into(),
            dir: Dir::Asc,
        }
    }

    /// Descending ordering on `field`.
    pub fn desc(field: impl Into<String>) -> Self {
        OrderBy {
            field: field.into(),
            dir: Dir::Desc,
        }
    }

    /// Parses a field spec where a leading `-` requests descending order.
    ///
    /// ```
    /// use standout_chain::{Dir, OrderBy};
    ///
    /// assert_eq!(OrderBy::parse("-score"), OrderBy::desc("score"));
    /// assert_eq!(OrderBy::parse("name").dir, Dir::Asc);
    /// ```
    pub fn parse(spec: &str) -> Self {
        match spec.strip_prefix('-') {
            Some(field) => OrderBy::desc(field),
            None => OrderBy::asc(spec),
        }
    }

    /// Reads this ordering's field from `item` as one key part.
    pub fn key_part<T: FieldAccess + ?Sized>(&self, item: &T) -> (Scalar, Dir) {
        (item.field_value(&self.field).to_scalar(), self.dir)
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.dir {
            Dir::Asc => write!(f, "{}", self.field),
            Dir::Desc => write!(f, "-{}", self.field),
        }
    }
}

impl From<&str> for OrderBy {
    fn from(spec: &str) -> Self {
        OrderBy::parse(spec)
    }
}

/// Compares two values of the same type.
///
/// Returns `None` if the types don't match or comparison is not possible (NaN).
/// `None` values sort after everything else.
pub fn compare_values(a: &Value<'_>, b: &Value<'_>) -> Option<Ordering> {
    match (a, b) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Number(a), Value::Number(b)) => a.compare(*b),
        (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
        (Value::Enum(a), Value::Enum(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),

        (Value::None, Value::None) => Some(Ordering::Equal),
        (Value::None, _) => Some(Ordering::Greater),
        (_, Value::None) => Some(Ordering::Less),

        _ => None,
    }
}

/// Total order over values, used to sort and merge by key.
///
/// Values of the same type compare naturally, with NaN after every other
/// number. Mixed types are ranked bool, number, timestamp, enum, string, and
/// `None` comes last.
pub fn total_order(a: &Value<'_>, b: &Value<'_>) -> Ordering {
    match (a, b) {
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => a.total_cmp(*b),
        (Value::Timestamp(a), Value::Timestamp(b)) => a.cmp(b),
        (Value::Enum(a), Value::Enum(b)) => a.cmp(b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn type_rank(value: &Value<'_>) -> u8 {
    match value {
        Value::Bool(_) => 0,
        Value::Number(_) => 1,
        Value::Timestamp(_) => 2,
        Value::Enum(_) => 3,
        Value::String(_) => 4,
        Value::None => 5,
    }
}

/// Comparison key produced by a chain's key extractor.
///
/// Parts are compared in order with [`total_order`]; the first unequal part
/// decides. Descending parts compare reversed, which works for every field
/// type rather than only for numbers.
///
/// ```
/// use standout_chain::{Dir, Key, Scalar};
///
/// let a = Key::from(1i64);
/// let b = Key::from(2i64);
/// assert!(a < b);
///
/// let hi = Key::new(vec![(Scalar::from(3i64), Dir::Desc)]);
/// let lo = Key::new(vec![(Scalar::from(1i64), Dir::Desc)]);
/// assert!(hi < lo);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Key {
    parts: Vec<(Scalar, Dir)>,
}

impl Key {
    /// Builds a key from `(value, direction)` parts.
    pub fn new(parts: Vec<(Scalar, Dir)>) -> Self {
        Key { parts }
    }

    /// Returns the key parts.
    pub fn parts(&self) -> &[(Scalar, Dir)] {
        &self.parts
    }

    /// Builds a composite key for `item` from a list of orderings.
    pub fn from_orderings<T: FieldAccess + ?Sized>(item: &T, orderings: &[OrderBy]) -> Self {
        Key {
            parts: orderings.iter().map(|o| o.key_part(item)).collect(),
        }
    }
}

impl From<Scalar> for Key {
    fn from(value: Scalar) -> Self {
        Key {
            parts: vec![(value, Dir::Asc)],
        }
    }
}

macro_rules! key_from {
    ($($t:ty),+) => {
        $(
            impl From<$t> for Key {
                fn from(value: $t) -> Self {
                    Key::from(Scalar::from(value))
                }
            }
        )+
    };
}

key_from!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);
key_from!(bool, String, &str, Timestamp);

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        for ((a, dir), (b, _)) in self.parts.iter().zip(&other.parts) {
            match total_order(&a.as_value(), &b.as_value()) {
                Ordering::Equal => continue,
                ordering => return dir.apply(ordering),
            }
        }
        self.parts.len().cmp(&other.parts.len())
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Key {}
