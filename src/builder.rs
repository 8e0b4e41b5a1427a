//! Construction of per-component interpolators for one time slice.
//!
//! Planar and volumetric grids share one code path: a planar grid carries the
//! single-entry z axis `[0]`, which the multilinear primitive treats as a
//! dimension with no extent.
use std::sync::Arc;

use num_traits::Float;

use crate::axis::AxisSet;
use crate::error::{FieldError, Result};
use crate::multilinear::Multilinear;
use crate::series::{check_shape, TimeSeries};

/// Interpolator over one component of a field at one time slice.
pub type Interpolator<T> = Multilinear<T, 3>;

/// The interpolators for every component of a vector field at one time slice.
///
/// Never modified after construction; a new slice gets a new sample.
#[derive(Clone, Debug)]
pub struct VectorFieldSample<T: Float> {
    components: Vec<Interpolator<T>>,
    slice: usize,
}

impl<T: Float> VectorFieldSample<T> {
    /// Evaluate each component at `point`.
    ///
    /// Components beyond those held by this sample (z on a planar field) are zero.
    #[inline]
    pub fn sample(&self, point: [T; 3]) -> [T; 3] {
        let mut out = [T::zero(); 3];
        for (o, c) in out.iter_mut().zip(self.components.iter()) {
            *o = c.interp_one(point);
        }
        out
    }

    /// Index of the time slice this sample was built from.
    pub fn slice(&self) -> usize {
        self.slice
    }

    pub fn ncomponents(&self) -> usize {
        self.components.len()
    }

    pub fn components(&self) -> &[Interpolator<T>] {
        &self.components
    }
}

/// Builds [`VectorFieldSample`]s over a fixed axis set.
#[derive(Clone, Debug)]
pub struct GridInterpolatorBuilder<T: Float> {
    axes: AxisSet<T>,
}

impl<T: Float> GridInterpolatorBuilder<T> {
    pub fn new(axes: AxisSet<T>) -> Self {
        Self { axes }
    }

    pub fn axes(&self) -> &AxisSet<T> {
        &self.axes
    }

    /// Build one interpolator per component from the given data blocks,
    /// tagging the result with `slice`.
    ///
    /// # Errors
    /// * `ShapeMismatch` if a block does not match the grid size
    /// * `DomainError` if no components are given, or more than three
    pub fn build_slice(&self, slice: usize, data: &[Arc<[T]>]) -> Result<VectorFieldSample<T>> {
        if data.is_empty() || data.len() > 3 {
            return Err(FieldError::domain(format!(
                "a vector field needs 1 to 3 components, got {}",
                data.len()
            )));
        }

        let expected = self.axes.grid_len();
        let components = data
            .iter()
            .enumerate()
            .map(|(component, vals)| {
                check_shape(component, slice, expected, vals.len())?;
                Multilinear::new(self.axes.spatial().clone(), vals.clone())
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(VectorFieldSample { components, slice })
    }

    /// Build the sample for slice `slice` of a resident time series.
    ///
    /// # Errors
    /// * `DomainError` if the slice index is past the end of the series
    /// * Any error from [`Self::build_slice`]
    pub fn build(&self, series: &TimeSeries<T>, slice: usize) -> Result<VectorFieldSample<T>> {
        let data = (0..series.ncomponents())
            .map(|c| series.get(c, slice).cloned())
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| {
                FieldError::domain(format!(
                    "slice {slice} requested from a series of {} slices",
                    series.nslices()
                ))
            })?;

        self.build_slice(slice, &data)
    }
}
