//! Field values used for lookups and ordering keys.
//!
//! [`Value`] borrows from the element it was read from and is what
//! [`FieldAccess`] returns. [`Scalar`] is its owned counterpart, stored in
//! lookups and ordering keys so they can outlive the element.

use std::cmp::Ordering;

/// Field value borrowed from an element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    /// String value (borrowed).
    String(&'a str),
    /// Numeric value.
    Number(Number),
    /// Timestamp value (milliseconds since Unix epoch).
    Timestamp(Timestamp),
    /// Enum discriminant value.
    Enum(u32),
    /// Boolean value.
    Bool(bool),
    /// Field is null or not present.
    None,
}

impl<'a> Value<'a> {
    /// Returns `true` if this is a `None` value.
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Copies this value into an owned [`Scalar`].
    pub fn to_scalar(&self) -> Scalar {
        match *self {
            Value::String(s) => Scalar::String(s.to_owned()),
            Value::Number(n) => Scalar::Number(n),
            Value::Timestamp(t) => Scalar::Timestamp(t),
            Value::Enum(d) => Scalar::Enum(d),
            Value::Bool(b) => Scalar::Bool(b),
            Value::None => Scalar::None,
        }
    }

    /// Name of the variant, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Number(_) => "number",
            Value::Timestamp(_) => "timestamp",
            Value::Enum(_) => "enum",
            Value::Bool(_) => "bool",
            Value::None => "none",
        }
    }
}

/// Owned field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Number(Number),
    Timestamp(Timestamp),
    Enum(u32),
    Bool(bool),
    None,
}

impl Scalar {
    /// Borrows this scalar as a [`Value`].
    pub fn as_value(&self) -> Value<'_> {
        match self {
            Scalar::String(s) => Value::String(s),
            Scalar::Number(n) => Value::Number(*n),
            Scalar::Timestamp(t) => Value::Timestamp(*t),
            Scalar::Enum(d) => Value::Enum(*d),
            Scalar::Bool(b) => Value::Bool(*b),
            Scalar::None => Value::None,
        }
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::String(s)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::String(s.to_owned())
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl From<Timestamp> for Scalar {
    fn from(t: Timestamp) -> Self {
        Scalar::Timestamp(t)
    }
}

impl From<Number> for Scalar {
    fn from(n: Number) -> Self {
        Scalar::Number(n)
    }
}

impl<'a> From<Value<'a>> for Scalar {
    fn from(v: Value<'a>) -> Self {
        v.to_scalar()
    }
}

/// Numeric value.
///
/// Mixed signed and unsigned integers compare exactly; anything involving
/// a float goes through `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    I64(i64),
    U64(u64),
    F64(f64),
}

impl Number {
    /// Converts the number to f64 for comparison.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    /// Compares two numbers, handling mixed variants.
    ///
    /// Returns `None` when either side is NaN.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::I64(a), Number::I64(b)) => Some(a.cmp(&b)),
            (Number::U64(a), Number::U64(b)) => Some(a.cmp(&b)),
            (Number::I64(a), Number::U64(b)) => Some(i128::from(a).cmp(&i128::from(b))),
            (Number::U64(a), Number::I64(b)) => Some(i128::from(a).cmp(&i128::from(b))),
            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }

    /// Total order over numbers, for sorting.
    ///
    /// Integers and floats compare exactly across variants, `-0.0` equals
    /// `0.0`, and NaN sorts after every other number.
    pub fn total_cmp(self, other: Number) -> Ordering {
        match (self, other) {
            (Number::F64(a), Number::F64(b)) => match (a.is_nan(), b.is_nan()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            },
            (Number::F64(_), _) => other.total_cmp(self).reverse(),
            (int, Number::F64(f)) => int
                .exact_int()
                .map_or(Ordering::Equal, |n| int_cmp_float(n, f)),
            (a, b) => match (a.exact_int(), b.exact_int()) {
                (Some(a), Some(b)) => a.cmp(&b),
                _ => Ordering::Equal,
            },
        }
    }

    fn exact_int(self) -> Option<i128> {
        match self {
            Number::I64(n) => Some(i128::from(n)),
            Number::U64(n) => Some(i128::from(n)),
            Number::F64(_) => None,
        }
    }
}

/// Compares an integer that fits in 65 bits against a float, exactly.
fn int_cmp_float(int: i128, float: f64) -> Ordering {
    const LIMIT: f64 = 18_446_744_073_709_551_616.0; // 2^64

    if float.is_nan() || float >= LIMIT {
        return Ordering::Less;
    }
    if float < -LIMIT {
        return Ordering::Greater;
    }
    let whole = float.trunc();
    match int.cmp(&(whole as i128)) {
        Ordering::Equal if float > whole => Ordering::Less,
        Ordering::Equal if float < whole => Ordering::Greater,
        ordering => ordering,
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

macro_rules! number_from {
    ($variant:ident as $wide:ty: $($t:ty),+) => {
        $(
            impl From<$t> for Number {
                fn from(n: $t) -> Self {
                    Number::$variant(n as $wide)
                }
            }

            impl From<$t> for Scalar {
                fn from(n: $t) -> Self {
                    Scalar::Number(Number::from(n))
                }
            }
        )+
    };
}

number_from!(I64 as i64: i8, i16, i32, i64, isize);
number_from!(U64 as u64: u8, u16, u32, u64, usize);
number_from!(F64 as f64: f32, f64);

/// Milliseconds since Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Creates a timestamp from milliseconds since Unix epoch.
    pub fn from_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    /// Creates a timestamp from seconds since Unix epoch.
    pub fn from_secs(secs: i64) -> Self {
        Timestamp(secs.saturating_mul(1000))
    }
}

/// Named field access on elements.
///
/// Required by [`Chain::order_by`](crate::Chain::order_by) and by the
/// [`Records`](crate::Records) source to evaluate lookups.
///
/// ```
/// use standout_chain::{FieldAccess, Value, Number};
///
/// struct Player {
///     name: String,
///     score: i64,
/// }
///
/// impl FieldAccess for Player {
///     fn field_names() -> &'static [&'static str] {
///         &["name", "score"]
///     }
///
///     fn field_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "name" => Value::String(&self.name),
///             "score" => Value::Number(Number::I64(self.score)),
///             _ => Value::None,
///         }
///     }
/// }
/// ```
pub trait FieldAccess {
    /// Every field name [`field_value`](Self::field_value) understands.
    fn field_names() -> &'static [&'static str]
    where
        Self: Sized;

    /// Returns the value of `field`, or [`Value::None`] when absent or null.
    fn field_value(&self, field: &str) -> Value<'_>;

    /// Returns `true` if `field` is one of [`field_names`](Self::field_names).
    fn has_field(field: &str) -> bool
    where
        Self: Sized,
    {
        Self::field_names().contains(&field)
    }
}
