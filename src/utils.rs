//! Convenience methods for constructing grids and gridded data,
//! mostly for tests and benchmarks.
use itertools::Itertools;
use num_traits::Float;

use crate::axis::AxisSet;

/// Generates evenly spaced values from start to stop,
/// including the endpoint.
pub fn linspace<T>(start: T, stop: T, n: usize) -> Vec<T>
where
    T: Float,
{
    if n < 2 {
        return vec![start; n];
    }
    let dx: T = (stop - start) / T::from(n - 1).unwrap_or_else(T::one);
    (0..n)
        .map(|i| start + T::from(i).unwrap_or_else(T::zero) * dx)
        .collect()
}

/// Generates a meshgrid in C ordering (x0, y0, z0, x0, y0, z1, ..., x0, yn, zn)
pub fn meshgrid<T>(x: Vec<&Vec<T>>) -> Vec<Vec<T>>
where
    T: Float,
{
    x.into_iter()
        .multi_cartesian_product()
        .map(|xx| xx.iter().map(|y| **y).collect())
        .collect()
}

/// Evaluates `f` at every node of the spatial grid of `axes`,
/// in the C ordering expected for a data slice.
pub fn tabulate<T, F>(axes: &AxisSet<T>, f: F) -> Vec<T>
where
    T: Float,
    F: Fn([T; 3]) -> T,
{
    axes.x()
        .iter()
        .cartesian_product(axes.y().iter())
        .cartesian_product(axes.z().iter())
        .map(|((&x, &y), &z)| f([x, y, z]))
        .collect()
}
