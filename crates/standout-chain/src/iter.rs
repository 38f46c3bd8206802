//! The iteration engine.
//!
//! A traversal is three layers deep:
//!
//! 1. a stream of predicate-passing elements, either concatenated
//!    ([`Concat`]) or k-way merged by key ([`Merge`]);
//! 2. [`Raw`], which applies the slice bounds to that stream;
//! 3. [`Iter`], which applies the transform.
//!
//! Everything is pull-based. A source is opened only when the stream first
//! needs it, and in merged mode each source holds at most one pending
//! candidate.

use std::slice;

use crate::bounds::Bounds;
use crate::hooks::{KeyExtractor, KeyFn, Predicate, Transform};
use crate::ordering::Key;
use crate::source::SourceRef;

type Elements<'c, T> = Box<dyn Iterator<Item = T> + 'c>;

/// Pulls from `iter` until an element passes `predicate`.
fn pull<T>(iter: &mut Elements<'_, T>, predicate: &Predicate<T>) -> Option<T> {
    iter.find(|value| predicate.test(value))
}

/// Sources in registration order, one after another.
pub(crate) struct Concat<'c, T> {
    sources: slice::Iter<'c, SourceRef<T>>,
    current: Option<Elements<'c, T>>,
    predicate: &'c Predicate<T>,
}

impl<'c, T> Concat<'c, T> {
    fn new(sources: &'c [SourceRef<T>], predicate: &'c Predicate<T>) -> Self {
        Concat {
            sources: sources.iter(),
            current: None,
            predicate,
        }
    }
}

impl<T> Iterator for Concat<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        loop {
            if let Some(current) = self.current.as_mut() {
                if let Some(value) = pull(current, self.predicate) {
                    return Some(value);
                }
            }
            self.current = Some(self.sources.next()?.elements());
        }
    }
}

struct Slot<'c, T> {
    head: Option<(Key, T)>,
    rest: Elements<'c, T>,
}

/// Lazy k-way merge by key.
///
/// Slots stay in source registration order, and the minimum is found by a
/// strict comparison, so equal keys resolve to the earliest-registered
/// source.
pub(crate) struct Merge<'c, T> {
    sources: &'c [SourceRef<T>],
    predicate: &'c Predicate<T>,
    key: &'c KeyFn<T>,
    slots: Vec<Slot<'c, T>>,
    primed: bool,
    /// Slot emitted last; refilled on the next pull.
    stale: Option<usize>,
}

impl<'c, T> Merge<'c, T> {
    fn new(sources: &'c [SourceRef<T>], predicate: &'c Predicate<T>, key: &'c KeyFn<T>) -> Self {
        Merge {
            sources,
            predicate,
            key,
            slots: Vec::with_capacity(sources.len()),
            primed: false,
            stale: None,
        }
    }

    fn prime(&mut self) {
        for source in self.sources {
            let mut rest = source.elements();
            if let Some(value) = pull(&mut rest, self.predicate) {
                self.slots.push(Slot {
                    head: Some(((self.key)(&value), value)),
                    rest,
                });
            }
        }
        self.primed = true;
    }

    /// Pulls the next candidate into slot `index`, dropping the slot when
    /// its source is exhausted.
    fn refill(&mut self, index: usize) {
        let slot = &mut self.slots[index];
        match pull(&mut slot.rest, self.predicate) {
            Some(value) => slot.head = Some(((self.key)(&value), value)),
            None => {
                self.slots.remove(index);
            }
        }
    }

    fn min_slot(&self) -> Option<usize> {
        let mut best: Option<(usize, &Key)> = None;
        for (index, slot) in self.slots.iter().enumerate() {
            if let Some((key, _)) = &slot.head {
                if best.map_or(true, |(_, min)| key < min) {
                    best = Some((index, key));
                }
            }
        }
        best.map(|(index, _)| index)
    }
}

impl<T> Iterator for Merge<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if !self.primed {
            self.prime();
        }
        if let Some(index) = self.stale.take() {
            self.refill(index);
        }
        let best = self.min_slot()?;
        let (_, value) = self.slots[best].head.take()?;
        self.stale = Some(best);
        Some(value)
    }
}

/// Predicate-passing elements in output order.
pub(crate) enum Stream<'c, T> {
    Concat(Concat<'c, T>),
    Merge(Merge<'c, T>),
}

impl<'c, T> Stream<'c, T> {
    pub(crate) fn new(
        sources: &'c [SourceRef<T>],
        predicate: &'c Predicate<T>,
        key: &'c KeyExtractor<T>,
    ) -> Self {
        match key {
            KeyExtractor::Unset => Stream::Concat(Concat::new(sources, predicate)),
            KeyExtractor::By(f) => Stream::Merge(Merge::new(sources, predicate, f)),
        }
    }
}

impl<T> Iterator for Stream<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        match self {
            Stream::Concat(inner) => inner.next(),
            Stream::Merge(inner) => inner.next(),
        }
    }
}

/// A traversal with bounds applied but no transform.
pub(crate) struct Raw<'c, T> {
    stream: Stream<'c, T>,
    bounds: Bounds,
    index: usize,
}

impl<'c, T> Raw<'c, T> {
    pub(crate) fn new(stream: Stream<'c, T>, bounds: Bounds) -> Self {
        Raw {
            stream,
            bounds,
            index: 0,
        }
    }
}

impl<T> Iterator for Raw<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        loop {
            if self.bounds.is_past_stop(self.index) {
                return None;
            }
            let value = self.stream.next()?;
            let index = self.index;
            self.index += 1;
            if self.bounds.selects(index) {
                return Some(value);
            }
        }
    }
}

/// Iterator over a [`Chain`](crate::Chain).
pub struct Iter<'c, T, U> {
    raw: Raw<'c, T>,
    transform: &'c Transform<T, U>,
}

impl<'c, T, U> Iter<'c, T, U> {
    pub(crate) fn new(raw: Raw<'c, T>, transform: &'c Transform<T, U>) -> Self {
        Iter { raw, transform }
    }
}

impl<T, U> Iterator for Iter<'_, T, U> {
    type Item = U;

    fn next(&mut self) -> Option<U> {
        self.raw.next().map(|value| self.transform.apply(value))
    }
}
