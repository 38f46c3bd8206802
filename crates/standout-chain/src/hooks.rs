//! Per-chain strategy hooks.
//!
//! Each chain carries a [`Predicate`], a [`Transform`] and a
//! [`KeyExtractor`]. They are cheap to clone (an `Arc` each) so every chain
//! derived from another can start from the same hooks and replace only the
//! one it needs.

use std::fmt;
use std::sync::Arc;

use crate::ordering::Key;

type PredicateFn<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;
type TransformFn<T, U> = Arc<dyn Fn(T) -> U + Send + Sync>;
pub(crate) type KeyFn<T> = Arc<dyn Fn(&T) -> Key + Send + Sync>;

/// Decides whether an element is part of the chain.
pub enum Predicate<T> {
    /// Every element passes.
    Always,
    /// Elements pass when the function returns `true`.
    Where(PredicateFn<T>),
}

impl<T> Predicate<T> {
    /// Wraps a function.
    pub fn new(f: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        Predicate::Where(Arc::new(f))
    }

    /// Evaluates the predicate.
    pub fn test(&self, value: &T) -> bool {
        match self {
            Predicate::Always => true,
            Predicate::Where(f) => f(value),
        }
    }

    /// Returns `true` for the default predicate.
    pub fn is_always(&self) -> bool {
        matches!(self, Predicate::Always)
    }
}

impl<T> Default for Predicate<T> {
    fn default() -> Self {
        Predicate::Always
    }
}

impl<T> Clone for Predicate<T> {
    fn clone(&self) -> Self {
        match self {
            Predicate::Always => Predicate::Always,
            Predicate::Where(f) => Predicate::Where(Arc::clone(f)),
        }
    }
}

impl<T> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Always => f.write_str("Predicate::Always"),
            Predicate::Where(_) => f.write_str("Predicate::Where(..)"),
        }
    }
}

/// Maps surviving elements just before they are yielded.
pub struct Transform<T, U> {
    f: TransformFn<T, U>,
}

impl<T, U> Transform<T, U> {
    /// Wraps a function.
    pub fn new(f: impl Fn(T) -> U + Send + Sync + 'static) -> Self {
        Transform { f: Arc::new(f) }
    }

    /// Applies the transform.
    pub fn apply(&self, value: T) -> U {
        (self.f)(value)
    }
}

impl<T: 'static> Transform<T, T> {
    /// The identity transform.
    pub fn identity() -> Self {
        Transform::new(|value| value)
    }
}

impl<T, U> Clone for Transform<T, U> {
    fn clone(&self) -> Self {
        Transform {
            f: Arc::clone(&self.f),
        }
    }
}

impl<T, U> fmt::Debug for Transform<T, U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Transform(..)")
    }
}

/// Produces the comparison key used for merged traversal.
///
/// `Unset` is the marker for "no ordering": a chain whose extractor is unset
/// concatenates its sources instead of merging them.
pub enum KeyExtractor<T> {
    /// No ordering.
    Unset,
    /// Order by the returned key.
    By(KeyFn<T>),
}

impl<T> KeyExtractor<T> {
    /// Wraps a function returning anything convertible to a [`Key`].
    pub fn new<K: Into<Key>>(f: impl Fn(&T) -> K + Send + Sync + 'static) -> Self {
        KeyExtractor::By(Arc::new(move |value: &T| f(value).into()))
    }

    /// Returns `true` unless this is [`KeyExtractor::Unset`].
    pub fn is_set(&self) -> bool {
        matches!(self, KeyExtractor::By(_))
    }

    /// Computes the key of `value`, or `None` when unset.
    pub fn key(&self, value: &T) -> Option<Key> {
        match self {
            KeyExtractor::Unset => None,
            KeyExtractor::By(f) => Some(f(value)),
        }
    }
}

impl<T> Default for KeyExtractor<T> {
    fn default() -> Self {
        KeyExtractor::Unset
    }
}

impl<T> Clone for KeyExtractor<T> {
    fn clone(&self) -> Self {
        match self {
            KeyExtractor::Unset => KeyExtractor::Unset,
            KeyExtractor::By(f) => KeyExtractor::By(Arc::clone(f)),
        }
    }
}

impl<T> fmt::Debug for KeyExtractor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyExtractor::Unset => f.write_str("KeyExtractor::Unset"),
            KeyExtractor::By(_) => f.write_str("KeyExtractor::By(..)"),
        }
    }
}
