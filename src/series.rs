//! Resident slice data for every component of a vector field.
use std::sync::Arc;

use num_traits::Float;

use crate::axis::AxisSet;
use crate::error::{FieldError, Result};

/// Flat data blocks for each field component at each time slice,
/// loaded once at setup and never re-read.
///
/// Indexed as `[component][slice]`, each block in C order over the spatial
/// grid and sized to match it exactly.
#[derive(Clone, Debug)]
pub struct TimeSeries<T> {
    components: Vec<Vec<Arc<[T]>>>,
}

impl<T: Float> TimeSeries<T> {
    /// Take ownership of per-component slice data and check it against the grid.
    ///
    /// Every slice of every component is checked here, so a malformed
    /// slice deep in the series is reported at setup rather than on
    /// the rebuild that first reaches it.
    ///
    /// # Errors
    /// * `SetupConfig` if a component does not have one slice per time-axis entry
    /// * `ShapeMismatch` if any slice length differs from the grid size
    pub fn new(components: Vec<Vec<Vec<T>>>, axes: &AxisSet<T>) -> Result<Self> {
        let nslices = axes.nslices();
        let expected = axes.grid_len();

        let mut shared: Vec<Vec<Arc<[T]>>> = Vec::with_capacity(components.len());
        for (component, slices) in components.into_iter().enumerate() {
            if slices.len() != nslices {
                return Err(FieldError::setup(format!(
                    "component {component} has {} slices but the time axis has {nslices} entries",
                    slices.len()
                )));
            }
            for (slice, data) in slices.iter().enumerate() {
                check_shape(component, slice, expected, data.len())?;
            }
            shared.push(slices.into_iter().map(Arc::<[T]>::from).collect());
        }

        Ok(Self { components: shared })
    }

    /// Stationary data: one slice per component.
    pub fn stationary(components: Vec<Vec<T>>, axes: &AxisSet<T>) -> Result<Self> {
        Self::new(components.into_iter().map(|c| vec![c]).collect(), axes)
    }

    pub fn ncomponents(&self) -> usize {
        self.components.len()
    }

    pub fn nslices(&self) -> usize {
        self.components.first().map_or(0, |c| c.len())
    }

    /// Shared handle to one component's data at one slice.
    pub fn get(&self, component: usize, slice: usize) -> Option<&Arc<[T]>> {
        self.components.get(component)?.get(slice)
    }
}

/// Check that a data block covers the spatial grid exactly.
pub(crate) fn check_shape(
    component: usize,
    slice: usize,
    expected: usize,
    found: usize,
) -> Result<()> {
    if expected != found {
        return Err(FieldError::ShapeMismatch {
            component,
            slice,
            expected,
            found,
        });
    }
    Ok(())
}
