//! Grid axes and cleanup of zero-padded exported columns.
//!
//! Export tools write every column of a coordinate table with the same length,
//! so short axes arrive with trailing zeros appended. [`normalize_axis`] recovers
//! the real axis from such a column, and [`AxisSet`] holds the cleaned spatial
//! and time axes as shared immutable buffers.
//!
//! ```rust
//! use gridfield::axis::normalize_axis;
//!
//! assert_eq!(normalize_axis(&[0.0, 1.0, 2.0, 3.0, 0.0, 0.0, 0.0]), vec![0.0, 1.0, 2.0, 3.0]);
//! assert_eq!(normalize_axis(&[0.0, 0.0]), vec![0.0]);
//! ```
use std::sync::Arc;

use num_traits::Float;

use crate::error::{FieldError, Result};

/// Names used when reporting problems with a given axis
const AXIS_NAMES: [&str; 3] = ["x", "y", "z"];

/// Strip trailing zero padding from a raw axis column.
///
/// The cut is made at the first zero that follows a nonzero value.
/// If the first two values are both zero, the axis is unused and collapses
/// to a single zero. Columns with fewer than two entries are returned as-is.
///
/// Interior zeros preceded by a nonzero value (for example an axis running
/// from negative to positive coordinates) cannot be told apart from padding
/// and will be cut there.
pub fn normalize_axis<T: Float>(raw: &[T]) -> Vec<T> {
    if raw.len() < 2 {
        return raw.to_vec();
    }

    if raw[0] == T::zero() && raw[1] == T::zero() {
        return vec![T::zero()];
    }

    let cut = (1..raw.len())
        .find(|&i| raw[i] == T::zero() && raw[i - 1] != T::zero())
        .unwrap_or(raw.len());

    raw[..cut].to_vec()
}

/// Check that an axis is non-empty and strictly increasing.
fn check_axis<T: Float>(name: &str, axis: &[T]) -> Result<()> {
    if axis.is_empty() {
        return Err(FieldError::domain(format!("axis `{name}` is empty")));
    }
    if let Some(i) = (1..axis.len()).find(|&i| !(axis[i] > axis[i - 1])) {
        return Err(FieldError::domain(format!(
            "axis `{name}` is not strictly increasing at index {i}"
        )));
    }
    Ok(())
}

/// Cleaned coordinate axes of a structured grid, plus the time axis
/// for time-varying data.
///
/// Cloning is cheap; the axis buffers are shared.
#[derive(Clone, Debug)]
pub struct AxisSet<T> {
    /// x, y, z coordinate axes; a planar grid has `z == [0]`
    spatial: [Arc<[T]>; 3],

    /// Time of each data slice, if the field varies in time
    time: Option<Arc<[T]>>,
}

impl<T: Float> AxisSet<T> {
    /// Assemble an axis set from already-clean axes.
    ///
    /// A missing `z` axis is replaced by the single-entry axis `[0]`,
    /// which makes a planar grid look like a 3D grid one cell thick.
    ///
    /// # Errors
    /// * `DomainError` if any axis is empty or not strictly increasing
    pub fn new(x: Vec<T>, y: Vec<T>, z: Option<Vec<T>>, time: Option<Vec<T>>) -> Result<Self> {
        let z = z.unwrap_or_else(|| vec![T::zero()]);
        let spatial = [x, y, z];
        for (name, axis) in AXIS_NAMES.iter().zip(spatial.iter()) {
            check_axis(name, axis)?;
        }
        if let Some(t) = &time {
            check_axis("time", t)?;
        }

        let [x, y, z] = spatial;
        Ok(Self {
            spatial: [x.into(), y.into(), z.into()],
            time: time.map(Arc::<[T]>::from),
        })
    }

    /// Normalize raw exported columns, then assemble them.
    ///
    /// The time column, when given, is normalized the same way as
    /// the spatial ones.
    pub fn from_raw(x: &[T], y: &[T], z: Option<&[T]>, time: Option<&[T]>) -> Result<Self> {
        Self::new(
            normalize_axis(x),
            normalize_axis(y),
            z.map(normalize_axis),
            time.map(normalize_axis),
        )
    }

    #[inline]
    pub fn x(&self) -> &[T] {
        &self.spatial[0]
    }

    #[inline]
    pub fn y(&self) -> &[T] {
        &self.spatial[1]
    }

    #[inline]
    pub fn z(&self) -> &[T] {
        &self.spatial[2]
    }

    /// Shared handles to the x, y, z axes, for building interpolators
    /// without copying coordinates.
    #[inline]
    pub fn spatial(&self) -> &[Arc<[T]>; 3] {
        &self.spatial
    }

    #[inline]
    pub fn time(&self) -> Option<&Arc<[T]>> {
        self.time.as_ref()
    }

    /// Size of each spatial dimension.
    pub fn dims(&self) -> [usize; 3] {
        [self.x().len(), self.y().len(), self.z().len()]
    }

    /// Number of grid nodes, which is the required length of each data slice.
    pub fn grid_len(&self) -> usize {
        self.dims().iter().product()
    }

    /// Number of time slices; one for stationary data.
    pub fn nslices(&self) -> usize {
        self.time.as_ref().map_or(1, |t| t.len())
    }

    /// Whether the z axis is degenerate (a single entry).
    pub fn is_planar(&self) -> bool {
        self.z().len() == 1
    }
}
