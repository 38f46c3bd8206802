//! The [`Chain`] combinator.

use std::fmt;
use std::ops::RangeBounds;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::bounds::Bounds;
use crate::error::{ChainError, Result};
use crate::hooks::{KeyExtractor, Predicate, Transform};
use crate::iter::{Iter, Raw, Stream};
use crate::lookup::Filter;
use crate::ordering::{Key, OrderBy};
use crate::source::{Pushed, Source, SourceRef};
use crate::value::FieldAccess;

/// Several sources served lazily as one sequence.
///
/// A chain never materializes its sources. Iterating pulls from them on
/// demand; [`count`](Self::count) uses the sources' own sizes when it can;
/// [`slice`](Self::slice) and friends return new chains sharing the same
/// sources.
///
/// Three hooks shape the output:
///
/// - the predicate decides which elements take part at all;
/// - the key extractor, when set, switches from concatenation to a k-way
///   merge (each source must already be sorted by that key);
/// - the transform maps elements just before they are yielded, and only
///   for elements that survive filtering and bounds.
///
/// # Example
///
/// ```
/// use standout_chain::Chain;
///
/// let chain = Chain::new()
///     .source(vec![1, 3, 5])
///     .source(vec![2, 4, 6])
///     .with_key(|n: &i32| *n);
///
/// assert_eq!(chain.iter().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5, 6]);
/// assert_eq!(chain.count(), 6);
///
/// let middle = chain.slice(Some(1), Some(4), None).unwrap();
/// assert_eq!(middle.iter().collect::<Vec<_>>(), vec![2, 3, 4]);
/// ```
pub struct Chain<T, U = T> {
    sources: Vec<SourceRef<T>>,
    predicate: Predicate<T>,
    transform: Transform<T, U>,
    key: KeyExtractor<T>,
    bounds: Bounds,
}

impl<T: 'static> Chain<T, T> {
    /// Creates a chain with no sources and default hooks.
    pub fn new() -> Self {
        Chain {
            sources: Vec::new(),
            predicate: Predicate::Always,
            transform: Transform::identity(),
            key: KeyExtractor::Unset,
            bounds: Bounds::default(),
        }
    }
}

impl<T: 'static> Default for Chain<T, T> {
    fn default() -> Self {
        Chain::new()
    }
}

impl<T, S> FromIterator<S> for Chain<T, T>
where
    T: 'static,
    S: Source<T> + 'static,
{
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Chain::new(), |chain, source| chain.source(source))
    }
}

impl<T, U> Clone for Chain<T, U> {
    fn clone(&self) -> Self {
        self.copy_with(self.sources.clone())
    }
}

impl<T, U> Chain<T, U> {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Appends a source.
    pub fn source(self, source: impl Source<T> + 'static) -> Self {
        self.source_ref(Arc::new(source))
    }

    /// Appends an already shared source.
    pub fn source_ref(mut self, source: SourceRef<T>) -> Self {
        self.sources.push(source);
        self
    }

    /// Replaces the predicate.
    pub fn with_predicate(mut self, f: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        self.predicate = Predicate::new(f);
        self
    }

    /// Installs a key extractor, switching to merged traversal.
    pub fn with_key<K: Into<Key>>(mut self, f: impl Fn(&T) -> K + Send + Sync + 'static) -> Self {
        self.key = KeyExtractor::new(f);
        self
    }

    /// Clears the key extractor, switching back to concatenation.
    pub fn without_key(mut self) -> Self {
        self.key = KeyExtractor::Unset;
        self
    }

    /// Replaces the transform.
    pub fn with_transform<V>(self, f: impl Fn(T) -> V + Send + Sync + 'static) -> Chain<T, V> {
        Chain {
            sources: self.sources,
            predicate: self.predicate,
            transform: Transform::new(f),
            key: self.key,
            bounds: self.bounds,
        }
    }

    /// Returns a copy drawing from `sources` instead, keeping hooks and bounds.
    pub fn copy_with(&self, sources: Vec<SourceRef<T>>) -> Self {
        Chain {
            sources,
            predicate: self.predicate.clone(),
            transform: self.transform.clone(),
            key: self.key.clone(),
            bounds: self.bounds,
        }
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Returns the sources in registration order.
    pub fn sources(&self) -> &[SourceRef<T>] {
        &self.sources
    }

    /// Returns the current bounds.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Returns `true` when a key extractor is installed.
    pub fn is_ordered(&self) -> bool {
        self.key.is_set()
    }

    // ========================================================================
    // Iteration
    // ========================================================================

    /// Iterates the chain.
    pub fn iter(&self) -> Iter<'_, T, U> {
        Iter::new(self.raw(), &self.transform)
    }

    /// Iterates with bounds applied but without the transform.
    fn raw(&self) -> Raw<'_, T> {
        Raw::new(
            Stream::new(&self.sources, &self.predicate, &self.key),
            self.bounds,
        )
    }

    // ========================================================================
    // Length
    // ========================================================================

    /// Number of elements a full iteration yields.
    ///
    /// With the default predicate and no bounds this is the sum of each
    /// source's own size (its `count`, else its `length`, else a walk over
    /// that source). Otherwise the whole chain is traversed.
    pub fn count(&self) -> usize {
        if self.predicate.is_always() && self.bounds.is_unbounded() {
            trace!(sources = self.sources.len(), "counting by source sizes");
            return self.sources.iter().map(|s| source_size(s.as_ref())).sum();
        }
        trace!(bounds = ?self.bounds, "counting by traversal");
        self.raw().count()
    }

    /// Returns `true` if the chain yields at least one element.
    ///
    /// Computed from [`count`](Self::count), so it costs a full count.
    pub fn exists(&self) -> bool {
        self.count() > 0
    }

    // ========================================================================
    // Indexing
    // ========================================================================

    /// Returns a copy bounded to `start..stop` stepping by `step`.
    ///
    /// The bounds replace any the chain already had and address positions
    /// of the filtered, ordered sequence.
    ///
    /// # Errors
    ///
    /// [`ChainError::NegativeIndex`] if any value is negative,
    /// [`ChainError::ZeroStep`] if `step` is zero.
    pub fn slice(
        &self,
        start: Option<isize>,
        stop: Option<isize>,
        step: Option<isize>,
    ) -> Result<Self> {
        Ok(self.with_bounds(Bounds::new(start, stop, step)?))
    }

    /// Returns a copy bounded to `range`.
    pub fn range(&self, range: impl RangeBounds<usize>) -> Self {
        self.with_bounds(Bounds::from_range(range))
    }

    /// Returns a copy with `bounds` replacing the current ones.
    pub fn with_bounds(&self, bounds: Bounds) -> Self {
        let mut result = self.clone();
        result.bounds = bounds;
        result
    }

    /// Returns the element at `index`.
    ///
    /// Walks the chain without transforming, then transforms only the
    /// element found.
    ///
    /// # Errors
    ///
    /// [`ChainError::NegativeIndex`] if `index` is negative,
    /// [`ChainError::IndexOutOfRange`] if the chain is shorter.
    pub fn get(&self, index: isize) -> Result<U> {
        let index = usize::try_from(index).map_err(|_| ChainError::NegativeIndex)?;
        self.raw()
            .nth(index)
            .map(|value| self.transform.apply(value))
            .ok_or(ChainError::IndexOutOfRange { index })
    }

    // ========================================================================
    // Collective operations
    // ========================================================================

    /// Returns an unchanged copy.
    pub fn all(&self) -> Self {
        self.clone()
    }

    /// Returns a copy with no sources; it never yields.
    pub fn none(&self) -> Self {
        self.copy_with(Vec::new())
    }

    /// Narrows each source that supports it to elements matching `filter`.
    ///
    /// Sources that decline keep all their elements; the chain's predicate
    /// is left as is.
    pub fn filter(&self, filter: &Filter) -> Self {
        self.pushdown("filter", |source| source.filter(filter))
    }

    /// Removes elements matching `filter` from each source that supports it.
    ///
    /// Sources that decline are kept unchanged.
    pub fn exclude(&self, filter: &Filter) -> Self {
        self.pushdown("exclude", |source| source.exclude(filter))
    }

    /// Applies `op` to every source, keeping any source that declines.
    fn pushdown(&self, op: &'static str, apply: impl Fn(&dyn Source<T>) -> Pushed<T>) -> Self {
        let sources = self
            .sources
            .iter()
            .enumerate()
            .map(|(position, source)| match apply(source.as_ref()) {
                Ok(pushed) => pushed,
                Err(reason) => {
                    debug!(
                        op,
                        position,
                        source = source.name(),
                        %reason,
                        "pushdown declined, keeping source unchanged"
                    );
                    Arc::clone(source)
                }
            })
            .collect();
        self.copy_with(sources)
    }
}

impl<T: FieldAccess + 'static, U> Chain<T, U> {
    /// Orders the chain by field specs such as `"score"` or `"-score"`.
    ///
    /// The ordering is pushed down to every source that supports it and
    /// installed as the chain's key extractor, so the result is a merge of
    /// the sources by these fields. Sources that decline the ordering must
    /// already be sorted for the merged output to be sorted.
    ///
    /// ```
    /// use standout_chain::{Chain, FieldAccess, Number, Records, Value};
    ///
    /// #[derive(Clone)]
    /// struct Entry { score: i64 }
    ///
    /// impl FieldAccess for Entry {
    ///     fn field_names() -> &'static [&'static str] { &["score"] }
    ///     fn field_value(&self, field: &str) -> Value<'_> {
    ///         match field {
    ///             "score" => Value::Number(Number::I64(self.score)),
    ///             _ => Value::None,
    ///         }
    ///     }
    /// }
    ///
    /// let chain = Chain::new().source(Records::new(vec![
    ///     Entry { score: 3 },
    ///     Entry { score: 1 },
    ///     Entry { score: 2 },
    /// ]));
    ///
    /// let scores: Vec<i64> = chain.order_by(["-score"]).iter().map(|e| e.score).collect();
    /// assert_eq!(scores, vec![3, 2, 1]);
    /// ```
    pub fn order_by<I>(&self, specs: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<OrderBy>,
    {
        let orderings: Arc<[OrderBy]> = specs.into_iter().map(Into::into).collect();
        let mut result = self.pushdown("order_by", |source| source.order_by(&orderings));
        result.key = KeyExtractor::new(move |value: &T| Key::from_orderings(value, &orderings));
        result
    }
}

impl<'c, T, U> IntoIterator for &'c Chain<T, U> {
    type Item = U;
    type IntoIter = Iter<'c, T, U>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, U> fmt::Debug for Chain<T, U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.sources.iter().map(|s| s.name()).collect();
        f.debug_struct("Chain")
            .field("sources", &names)
            .field("predicate", &self.predicate)
            .field("key", &self.key)
            .field("bounds", &self.bounds)
            .finish_non_exhaustive()
    }
}

/// Size of one source: cheap count, else length, else a full walk.
fn source_size<T>(source: &dyn Source<T>) -> usize {
    source
        .count()
        .or_else(|| source.length())
        .unwrap_or_else(|| source.elements().count())
}
