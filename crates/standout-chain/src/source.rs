//! Sources a [`Chain`](crate::Chain) draws elements from.
//!
//! The [`Source`] trait is the capability contract between a chain and the
//! sequences behind it. Only [`elements`](Source::elements) is required.
//! Every other method reports absence by default: `None` for the size
//! probes, [`Unsupported::Missing`] for the pushed-down operations. A chain
//! probes these and quietly falls back when a source declines.
//!
//! Three sources ship with the crate:
//!
//! - `Vec<T>`: restartable, reports its length, nothing else.
//! - [`Records`]: an in-memory record set that also counts, filters,
//!   excludes and sorts by field.
//! - [`Once`]: wraps a single-use iterator; yields on the first traversal
//!   only.

use std::sync::{Arc, Mutex, PoisonError};

use crate::error::Unsupported;
use crate::lookup::Filter;
use crate::ordering::{Key, OrderBy};
use crate::value::FieldAccess;

/// Shared handle to a source.
pub type SourceRef<T> = Arc<dyn Source<T>>;

/// Outcome of a pushed-down operation.
pub type Pushed<T> = std::result::Result<SourceRef<T>, Unsupported>;

/// An ordered sequence of `T` with optional collective operations.
///
/// # Implementation Guidelines
///
/// - [`elements`](Self::elements) should start a fresh traversal on every
///   call if the source is meant to be iterated more than once.
/// - [`count`](Self::count) is the cheap aggregate (e.g. a stored total);
///   [`length`](Self::length) is the generic size. A chain asks `count`
///   first, then `length`, then walks the elements.
/// - The operations return a *new* source. Return `Err` when the source
///   cannot honor the argument; the chain keeps the original source.
///
/// # Example
///
/// ```
/// use standout_chain::Source;
///
/// struct Evens(u32);
///
/// impl Source<u32> for Evens {
///     fn name(&self) -> &'static str { "evens" }
///
///     fn elements(&self) -> Box<dyn Iterator<Item = u32> + '_> {
///         Box::new((0..self.0).map(|n| n * 2))
///     }
///
///     fn length(&self) -> Option<usize> {
///         Some(self.0 as usize)
///     }
/// }
/// ```
pub trait Source<T>: Send + Sync {
    /// Short name used in log output.
    fn name(&self) -> &'static str {
        "source"
    }

    /// Starts a traversal.
    fn elements(&self) -> Box<dyn Iterator<Item = T> + '_>;

    /// Cheap aggregate size, if the source keeps one.
    fn count(&self) -> Option<usize> {
        None
    }

    /// Generic size, if known without traversal.
    fn length(&self) -> Option<usize> {
        None
    }

    /// Narrows the source to elements matching `filter`.
    fn filter(&self, _filter: &Filter) -> Pushed<T> {
        Err(Unsupported::Missing)
    }

    /// Narrows the source to elements not matching `filter`.
    fn exclude(&self, _filter: &Filter) -> Pushed<T> {
        Err(Unsupported::Missing)
    }

    /// Reorders the source by `orderings`.
    fn order_by(&self, _orderings: &[OrderBy]) -> Pushed<T> {
        Err(Unsupported::Missing)
    }
}

impl<T: Clone + Send + Sync> Source<T> for Vec<T> {
    fn name(&self) -> &'static str {
        "vec"
    }

    fn elements(&self) -> Box<dyn Iterator<Item = T> + '_> {
        Box::new(self.as_slice().iter().cloned())
    }

    fn length(&self) -> Option<usize> {
        Some(self.len())
    }
}

/// In-memory record set supporting every pushed-down operation.
///
/// Lookups and orderings are validated against
/// [`FieldAccess::field_names`]; naming an unknown field makes the
/// operation decline with [`Unsupported::UnknownField`].
#[derive(Debug)]
pub struct Records<T> {
    items: Arc<[T]>,
}

impl<T> Clone for Records<T> {
    fn clone(&self) -> Self {
        Records {
            items: Arc::clone(&self.items),
        }
    }
}

impl<T> Records<T> {
    /// Creates a record set.
    pub fn new(items: Vec<T>) -> Self {
        Records {
            items: items.into(),
        }
    }

    /// Returns the records.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T> FromIterator<T> for Records<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Records::new(iter.into_iter().collect())
    }
}

impl<T> Records<T>
where
    T: FieldAccess + Clone + Send + Sync + 'static,
{
    fn retain(&self, keep: impl Fn(&T) -> bool) -> SourceRef<T> {
        let kept: Records<T> = self.items.iter().filter(|item| keep(*item)).cloned().collect();
        Arc::new(kept)
    }
}

impl<T> Source<T> for Records<T>
where
    T: FieldAccess + Clone + Send + Sync + 'static,
{
    fn name(&self) -> &'static str {
        "records"
    }

    fn elements(&self) -> Box<dyn Iterator<Item = T> + '_> {
        Box::new(self.items.iter().cloned())
    }

    fn count(&self) -> Option<usize> {
        Some(self.items.len())
    }

    fn filter(&self, filter: &Filter) -> Pushed<T> {
        filter.check::<T>()?;
        Ok(self.retain(|item| filter.matches(item)))
    }

    fn exclude(&self, filter: &Filter) -> Pushed<T> {
        filter.check::<T>()?;
        if filter.is_empty() {
            return Ok(Arc::new(self.clone()));
        }
        Ok(self.retain(|item| !filter.matches(item)))
    }

    fn order_by(&self, orderings: &[OrderBy]) -> Pushed<T> {
        if let Some(unknown) = orderings.iter().find(|o| !T::has_field(&o.field)) {
            return Err(Unsupported::UnknownField(unknown.field.clone()));
        }
        let mut sorted: Vec<(Key, T)> = self
            .items
            .iter()
            .map(|item| (Key::from_orderings(item, orderings), item.clone()))
            .collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(Arc::new(Records::new(
            sorted.into_iter().map(|(_, item)| item).collect(),
        )))
    }
}

/// Single-use source over an iterator.
///
/// The first traversal takes the iterator; later traversals are empty.
/// Sizing such a chain consumes it, since there is no way to count without
/// walking.
pub struct Once<I> {
    inner: Mutex<Option<I>>,
}

impl<I: Iterator> Once<I> {
    /// Wraps `iter`.
    pub fn new(iter: impl IntoIterator<IntoIter = I>) -> Self {
        Once {
            inner: Mutex::new(Some(iter.into_iter())),
        }
    }

    /// Returns `true` once the iterator has been taken.
    pub fn is_spent(&self) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

impl<T, I> Source<T> for Once<I>
where
    I: Iterator<Item = T> + Send,
{
    fn name(&self) -> &'static str {
        "once"
    }

    fn elements(&self) -> Box<dyn Iterator<Item = T> + '_> {
        let taken = self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        Box::new(taken.into_iter().flatten())
    }
}
