//! Slice bounds over a chain's logical sequence.

use std::ops::{Bound, RangeBounds};

use crate::error::{ChainError, Result};

/// `start`, `stop` and `step` narrowing which positions a chain yields.
///
/// Positions count elements that passed the predicate, in output order.
/// `None` means unbounded (or, for `step`, no stepping). Values are always
/// non-negative and `step` is never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bounds {
    start: Option<usize>,
    stop: Option<usize>,
    step: Option<usize>,
}

impl Bounds {
    /// Validates signed bounds as given by a caller.
    ///
    /// Any negative value fails with [`ChainError::NegativeIndex`]; a zero
    /// step fails with [`ChainError::ZeroStep`].
    pub fn new(start: Option<isize>, stop: Option<isize>, step: Option<isize>) -> Result<Self> {
        let start = non_negative(start)?;
        let stop = non_negative(stop)?;
        let step = non_negative(step)?;
        if step == Some(0) {
            return Err(ChainError::ZeroStep);
        }
        Ok(Bounds { start, stop, step })
    }

    /// Bounds covering a range of positions.
    pub fn from_range(range: impl RangeBounds<usize>) -> Self {
        let start = match range.start_bound() {
            Bound::Included(&n) => Some(n),
            Bound::Excluded(&n) => Some(n.saturating_add(1)),
            Bound::Unbounded => None,
        };
        let stop = match range.end_bound() {
            Bound::Included(&n) => Some(n.saturating_add(1)),
            Bound::Excluded(&n) => Some(n),
            Bound::Unbounded => None,
        };
        Bounds {
            start,
            stop,
            step: None,
        }
    }

    /// Returns a copy stepping by `step`. Zero fails with [`ChainError::ZeroStep`].
    pub fn step_by(self, step: usize) -> Result<Self> {
        if step == 0 {
            return Err(ChainError::ZeroStep);
        }
        Ok(Bounds {
            step: Some(step),
            ..self
        })
    }

    pub fn start(&self) -> Option<usize> {
        self.start
    }

    pub fn stop(&self) -> Option<usize> {
        self.stop
    }

    pub fn step(&self) -> Option<usize> {
        self.step
    }

    /// Returns `true` when these bounds select every position.
    pub fn is_unbounded(&self) -> bool {
        self.start.unwrap_or(0) == 0 && self.stop.is_none() && self.step.unwrap_or(1) == 1
    }

    /// Returns `true` once `index` is at or past `stop`.
    pub(crate) fn is_past_stop(&self, index: usize) -> bool {
        self.stop.is_some_and(|stop| index >= stop)
    }

    /// Returns `true` if `index` is selected, ignoring `stop`.
    pub(crate) fn selects(&self, index: usize) -> bool {
        let start = self.start.unwrap_or(0);
        if index < start {
            return false;
        }
        match self.step {
            Some(step) => (index - start) % step == 0,
            None => true,
        }
    }
}

fn non_negative(value: Option<isize>) -> Result<Option<usize>> {
    match value {
        Some(n) => usize::try_from(n)
            .map(Some)
            .map_err(|_| ChainError::NegativeIndex),
        None => Ok(None),
    }
}
