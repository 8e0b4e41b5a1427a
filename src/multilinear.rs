//! Multilinear interpolation on a rectilinear grid, clamped to the grid bounds.
//!
//! Observation points outside the grid are held at the nearest face, edge, or
//! corner value rather than extrapolated, so a velocity field sampled slightly
//! outside its data never grows without bound.
//!
//! Dimensions with a single grid entry are allowed and contribute nothing to
//! the weighting; their coordinate is ignored. This lets a planar field be
//! evaluated by the same 3D machinery as a volumetric one.
//!
//! ```rust
//! use std::sync::Arc;
//! use gridfield::multilinear::Multilinear;
//!
//! let x: Arc<[f64]> = vec![0.0, 1.0].into();
//! let y: Arc<[f64]> = vec![0.0, 2.0].into();
//! let z: Arc<[f64]> = vec![0.0].into();
//!
//! // z(x0, y0), z(x0, y1), z(x1, y0), z(x1, y1)
//! let vals: Arc<[f64]> = vec![1.0, 2.0, 3.0, 4.0].into();
//!
//! let interpolator = Multilinear::new([x, y, z], vals).unwrap();
//! assert_eq!(interpolator.interp_one([1.0, 0.0, 0.0]), 3.0);
//! assert_eq!(interpolator.interp_one([0.5, 1.0, 123.0]), 2.5);
//! ```
//!
//! References
//! * https://en.wikipedia.org/wiki/Bilinear_interpolation#Weighted_mean
use std::sync::Arc;

use num_traits::Float;

use crate::error::{FieldError, Result};

/// A multilinear interpolator on a rectilinear grid in `N` dimensions.
///
/// Assumes C-style ordering of vals (z(x0, y0), z(x0, y1), ..., z(x0, yn), z(x1, y0), ...).
///
/// Operation Complexity
/// * O(2^N) for evaluation, plus a bisection search on each axis.
///
/// Memory Complexity
/// * O(N) stack usage during evaluation. Grid and value buffers are shared,
///   so constructing a new interpolator over existing data does not copy it.
#[derive(Clone, Debug)]
pub struct Multilinear<T: Float, const N: usize> {
    /// x, y, ... coordinate grids, each entry of size dims[i]
    grids: [Arc<[T]>; N],

    /// Size of each dimension
    dims: [usize; N],

    /// Cumulative products of higher dimensions, used for indexing
    dimprod: [usize; N],

    /// Values at each point, size prod(dims)
    vals: Arc<[T]>,
}

impl<T: Float, const N: usize> Multilinear<T, N> {
    /// Build a new interpolator, using O(N) calculations.
    ///
    /// # Errors
    /// * `DomainError` if any grid is empty or not strictly increasing
    /// * `DomainError` if the number of values does not match the grid size
    pub fn new(grids: [Arc<[T]>; N], vals: Arc<[T]>) -> Result<Self> {
        const {
            assert!(N > 0, "Interpolation requires at least one dimension");
        }

        let mut dims = [0_usize; N];
        (0..N).for_each(|i| dims[i] = grids[i].len());

        if dims.iter().any(|&n| n == 0) {
            return Err(FieldError::domain("All grids must have at least one entry"));
        }

        let monotonic = grids
            .iter()
            .all(|g| g.windows(2).all(|w| w[1] > w[0]));
        if !monotonic {
            return Err(FieldError::domain(
                "All grids must be strictly monotonically increasing",
            ));
        }

        let nvals: usize = dims.iter().product();
        if vals.len() != nvals {
            return Err(FieldError::domain(format!(
                "Dimension mismatch: grid has {nvals} points, got {} values",
                vals.len()
            )));
        }

        // Populate cumulative product of higher dimensions for indexing.
        //
        // Each entry is the stride between blocks relating to
        // a given index along that dimension.
        let mut dimprod = [1_usize; N];
        let mut acc = 1;
        (0..N).for_each(|i| {
            dimprod[N - i - 1] = acc;
            acc *= dims[N - i - 1];
        });

        Ok(Self {
            grids,
            dims,
            dimprod,
            vals,
        })
    }

    /// Size of each dimension.
    pub fn dims(&self) -> [usize; N] {
        self.dims
    }

    /// The values this interpolator was built over.
    pub fn vals(&self) -> &[T] {
        &self.vals
    }

    /// Interpolate on a contiguous list of observation points.
    ///
    /// # Errors
    /// * `DomainError` if the coordinate slices and output differ in length
    pub fn interp(&self, x: &[&[T]; N], out: &mut [T]) -> Result<()> {
        let n = out.len();
        if !x.iter().all(|xx| xx.len() == n) {
            return Err(FieldError::domain("Dimension mismatch"));
        }

        let mut tmp = [T::zero(); N];
        for i in 0..n {
            (0..N).for_each(|j| tmp[j] = x[j][i]);
            out[i] = self.interp_one(tmp);
        }

        Ok(())
    }

    /// Interpolate the value at a point using O(N) stack storage and no allocation.
    ///
    /// Coordinates outside the grid are clamped to its bounds.
    /// Coordinates on single-entry dimensions are ignored.
    #[inline]
    pub fn interp_one(&self, x: [T; N]) -> T {
        let mut origin = [0_usize; N]; // Lower corner of the containing cell
        let mut frac = [T::zero(); N]; // Normalized position inside the cell
        for i in 0..N {
            (origin[i], frac[i]) = self.get_loc(x[i], i);
        }

        // Visit the 2^N vertices of the cell. Bit `j` of the vertex index
        // selects the lower or upper side of the cell on dimension `j`.
        let nverts = 1_usize << N;
        let mut interped = T::zero();
        for i in 0..nverts {
            let mut k = 0;
            let mut weight = T::one();
            for j in 0..N {
                if (i >> j) & 1 == 1 {
                    weight = weight * frac[j];
                    k += self.dimprod[j] * (origin[j] + 1).min(self.dims[j] - 1);
                } else {
                    weight = weight * (T::one() - frac[j]);
                    k += self.dimprod[j] * origin[j];
                }
            }

            // Skipping zero weights keeps on-grid evaluation exact
            // and halves the work on each degenerate dimension
            if weight == T::zero() {
                continue;
            }
            interped = interped + weight * self.vals[k];
        }

        interped
    }

    /// Get the lower-corner index along this dimension for `v`, and the
    /// normalized position of `v` between that corner and the next grid entry.
    ///
    /// The location is clamped to the grid, so the normalized position is
    /// always in `[0, 1]`. Degenerate dimensions always give `(0, 0)`.
    #[inline]
    fn get_loc(&self, v: T, dim: usize) -> (usize, T) {
        let grid = &self.grids[dim];
        let n = self.dims[dim];
        if n == 1 {
            return (0, T::zero());
        }

        let v = v.max(grid[0]).min(grid[n - 1]);

        // Bisection search to find location on the grid.
        // Returns -1 at the lower bound, which is clipped to the first cell.
        let iloc = grid.partition_point(|x| *x < v) as isize - 1;
        let loc = iloc.max(0).min(n as isize - 2) as usize;

        let x0 = grid[loc];
        let x1 = grid[loc + 1];
        (loc, (v - x0) / (x1 - x0))
    }
}

#[cfg(test)]
mod test {
    use super::Multilinear;
    use crate::error::FieldError;
    use crate::testing::*;
    use crate::utils::*;
    use std::sync::Arc;

    fn shared(v: &[f64]) -> Arc<[f64]> {
        Arc::from(v)
    }

    #[test]
    fn test_corners_exact_2d() {
        let (a, b, c, d) = (1.25, -3.5, 7.0, 0.125);
        let grids = [shared(&[0.0, 1.0]), shared(&[0.0, 1.0]), shared(&[0.0])];
        let interpolator = Multilinear::new(grids, shared(&[a, b, c, d])).unwrap();

        assert_eq!(interpolator.interp_one([0.0, 0.0, 0.0]), a);
        assert_eq!(interpolator.interp_one([0.0, 1.0, 0.0]), b);
        assert_eq!(interpolator.interp_one([1.0, 0.0, 0.0]), c);
        assert_eq!(interpolator.interp_one([1.0, 1.0, 0.0]), d);
    }

    /// A function that is linear in every direction is reproduced exactly
    /// everywhere inside a noisy rectilinear grid.
    #[test]
    fn test_interp_linear_function_3d() {
        let mut rng = rng_fixed_seed();
        let (nx, ny, nz) = (4, 3, 5);

        let mut x = linspace(-1.0, 1.0, nx);
        let mut y = linspace(2.0, 4.0, ny);
        let mut z = linspace(0.0, 100.0, nz);

        // Add noise to the grid
        let dx = randn::<f64>(&mut rng, nx);
        let dy = randn::<f64>(&mut rng, ny);
        let dz = randn::<f64>(&mut rng, nz);
        (0..nx).for_each(|i| x[i] += (dx[i] - 0.5) / 100.0);
        (0..ny).for_each(|i| y[i] += (dy[i] - 0.5) / 100.0);
        (0..nz).for_each(|i| z[i] += (dz[i] - 0.5) / 10.0);

        // Make sure the grid is still monotonic
        (0..nx - 1).for_each(|i| assert!(x[i + 1] > x[i]));
        (0..ny - 1).for_each(|i| assert!(y[i + 1] > y[i]));
        (0..nz - 1).for_each(|i| assert!(z[i + 1] > z[i]));

        let f = |p: &[f64]| 2.0 * p[0] - 3.0 * p[1] + 0.01 * p[2] + 1.0;
        let vals: Vec<f64> = meshgrid(vec![&x, &y, &z]).iter().map(|p| f(p)).collect();

        let interpolator =
            Multilinear::new([shared(&x), shared(&y), shared(&z)], vals.into()).unwrap();

        let xobs = linspace(x[0], x[nx - 1], 7);
        let yobs = linspace(y[0], y[ny - 1], 6);
        let zobs = linspace(z[0], z[nz - 1], 9);
        for p in meshgrid(vec![&xobs, &yobs, &zobs]) {
            let v = interpolator.interp_one([p[0], p[1], p[2]]);
            assert!((v - f(&p)).abs() < 1e-10);
        }
    }

    /// Points outside the grid take the value at the nearest point on the boundary.
    #[test]
    fn test_clamp_outside() {
        let x = shared(&[0.0, 1.0, 2.0]);
        let vals = shared(&[0.0, 1.0, 4.0]);
        let interpolator: Multilinear<f64, 1> = Multilinear::new([x], vals).unwrap();

        assert_eq!(interpolator.interp_one([-10.0]), 0.0);
        assert_eq!(interpolator.interp_one([2.0]), 4.0);
        assert_eq!(interpolator.interp_one([50.0]), 4.0);
        assert_eq!(interpolator.interp_one([1.5]), 2.5);
    }

    /// Interpolate on a hat-shaped function to make sure that the grid cell
    /// indexing is aligned properly
    #[test]
    fn test_interp_hat_func() {
        fn hat_func(x: f64) -> f64 {
            if x <= 1.0 {
                x
            } else {
                2.0 - x
            }
        }

        let x: Vec<f64> = (0..3).map(|x| x as f64).collect();
        let y: Vec<f64> = x.iter().map(|&x| hat_func(x)).collect();
        let interpolator: Multilinear<f64, 1> =
            Multilinear::new([x.into()], y.into()).unwrap();

        for xi in linspace(0.0, 2.0, 101) {
            assert!((hat_func(xi) - interpolator.interp_one([xi])).abs() < 1e-14);
        }
    }

    #[test]
    fn test_degenerate_dimension_ignored() {
        let grids = [shared(&[0.0, 10.0]), shared(&[3.0])];
        let interpolator = Multilinear::new(grids, shared(&[1.0, 2.0])).unwrap();

        assert_eq!(interpolator.interp_one([5.0, 3.0]), 1.5);
        assert_eq!(interpolator.interp_one([5.0, -1e6]), 1.5);
        assert_eq!(interpolator.interp_one([10.0, 1e6]), 2.0);
    }

    #[test]
    fn test_interp_batch() {
        let grids = [shared(&[0.0, 1.0]), shared(&[0.0, 1.0])];
        let interpolator = Multilinear::new(grids, shared(&[0.0, 1.0, 1.0, 2.0])).unwrap();

        let xs = [0.0, 0.5, 1.0];
        let ys = [0.0, 0.5, 0.25];
        let mut out = [0.0; 3];
        interpolator.interp(&[&xs[..], &ys[..]], &mut out).unwrap();
        assert_eq!(out, [0.0, 1.0, 1.25]);

        let mut short = [0.0; 2];
        assert!(interpolator.interp(&[&xs[..], &ys[..]], &mut short).is_err());
    }

    #[test]
    fn test_new_rejects_invalid() {
        let wrong_len = Multilinear::new([shared(&[0.0, 1.0])], shared(&[0.0; 3]));
        assert!(matches!(wrong_len, Err(FieldError::DomainError(_))));

        let empty = Multilinear::new([shared(&[])], shared(&[]));
        assert!(matches!(empty, Err(FieldError::DomainError(_))));

        let decreasing = Multilinear::new([shared(&[1.0, 0.0])], shared(&[0.0; 2]));
        assert!(matches!(decreasing, Err(FieldError::DomainError(_))));
    }
}
