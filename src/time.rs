//! Mapping of the simulation clock onto the slices of a time-varying field.
//!
//! ```rust
//! use gridfield::time::resolve_index;
//!
//! let t = [0.0, 10.0, 20.0];
//! assert_eq!(resolve_index(&t, 15.0), 1);
//! assert_eq!(resolve_index(&t, 25.0), 2);
//! assert_eq!(resolve_index(&t, -5.0), 0);
//! ```
use std::sync::Arc;

use num_traits::Float;

use crate::error::{FieldError, Result};

/// Index `i` of the slice active at time `t`, such that `axis[i] <= t < axis[i + 1]`.
///
/// Times at or past the last entry resolve to the last slice, and times
/// before the first entry are clamped to slice 0.
/// Assumes `axis` is strictly increasing.
#[inline]
pub fn resolve_index<T: Float>(axis: &[T], t: T) -> usize {
    // Bisection search for the number of entries at or before `t`
    axis.partition_point(|x| *x <= t).saturating_sub(1)
}

/// Tracks which time slice is active, so a field is only rebuilt when the
/// clock crosses a slice boundary.
///
/// Starts on slice 0, which is the slice built at setup.
#[derive(Clone, Debug)]
pub struct TimeCursor<T> {
    axis: Arc<[T]>,

    /// Last simulation time observed
    last_time: Option<T>,

    /// Currently resolved slice
    index: usize,
}

impl<T: Float> TimeCursor<T> {
    pub fn new(axis: Arc<[T]>) -> Self {
        Self {
            axis,
            last_time: None,
            index: 0,
        }
    }

    /// Resolve `t` without moving the cursor.
    ///
    /// Returns the slice index for `t` if it differs from the current one,
    /// and `None` if the active slice is unchanged.
    ///
    /// # Errors
    /// * `DomainError` if `t` is NaN
    pub fn peek(&self, t: T) -> Result<Option<usize>> {
        if t.is_nan() {
            return Err(FieldError::domain("simulation time is NaN"));
        }
        if self.last_time == Some(t) {
            return Ok(None);
        }

        let index = resolve_index(&self.axis, t);
        Ok((index != self.index).then_some(index))
    }

    /// Record that time `t` has been reached with slice `index` active.
    pub fn commit(&mut self, t: T, index: usize) {
        self.last_time = Some(t);
        self.index = index;
    }

    /// Resolve `t` and move the cursor there.
    ///
    /// Returns the new slice index if it differs from the previous one,
    /// and `None` if the active slice is unchanged.
    ///
    /// # Errors
    /// * `DomainError` if `t` is NaN
    pub fn advance(&mut self, t: T) -> Result<Option<usize>> {
        let next = self.peek(t)?;
        self.commit(t, next.unwrap_or(self.index));
        Ok(next)
    }

    /// Currently resolved slice.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn last_time(&self) -> Option<T> {
        self.last_time
    }

    pub fn axis(&self) -> &[T] {
        &self.axis
    }
}
