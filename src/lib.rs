//! Velocity and diffusivity fields for transport solvers, sampled from
//! structured 2D or 3D grids that may change over time.
//!
//! The sampler ingests gridded velocity data once at setup, then answers
//! per-point queries from inside a residual/Jacobian assembly loop.
//! Time-varying data is held as a series of slices; when the simulation clock
//! crosses into a new slice, the interpolators are rebuilt from data already
//! in memory.
//!
//! | Component                          | Role                                           |
//! |------------------------------------|------------------------------------------------|
//! | [`axis::normalize_axis`]           | strip trailing zero padding from exported axes |
//! | [`builder::GridInterpolatorBuilder`] | one interpolator per component for one slice |
//! | [`time::TimeCursor`]               | map the clock to a slice, detect changes       |
//! | [`FieldSampler`]                   | point evaluation and rebuild orchestration     |
//! | [`SamplerConfig`]                  | setup parameters and mode selection            |
//!
//! # Performance
//! Sampling a gridded field costs one bisection search per axis plus
//! 2^3 weighted values per component, with no allocation. A rebuild clones
//! shared handles to data that is already resident, so it is proportional to
//! the number of components rather than the size of the grid.
//!
//! # Example: time-varying planar field
//! ```rust
//! use gridfield::{AxisSet, Diffusivity, FieldSampler, SamplerConfig, TimeSeries};
//!
//! // Two slices, at t = 0 and t = 5, on the unit square
//! let axes = AxisSet::new(vec![0.0, 1.0], vec![0.0, 1.0], None, Some(vec![0.0, 5.0])).unwrap();
//! let u = vec![vec![1.0; 4], vec![2.0; 4]];
//! let v = vec![vec![0.0; 4], vec![-1.0; 4]];
//! let series = TimeSeries::new(vec![u, v], &axes).unwrap();
//!
//! let mut config = SamplerConfig::new(2, Diffusivity::Scalar(0.5));
//! config.time_dependent = true;
//! let mut sampler = FieldSampler::from_grid(config, axes, series).unwrap();
//!
//! // Once per assembly pass
//! let rebuilt = sampler.advance(6.0).unwrap();
//! assert!(rebuilt);
//!
//! // Once per quadrature point
//! assert_eq!(sampler.sample_velocity([0.0, 1.0, 0.0]), [2.0, -1.0, 0.0]);
//! ```
// These "needless" range loops are a significant speedup
#![allow(clippy::needless_range_loop)]

pub mod axis;
pub mod builder;
pub mod config;
pub mod error;
pub mod ingest;
pub mod multilinear;
pub mod sampler;
pub mod series;
pub mod species;
pub mod table;
pub mod time;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

pub use axis::{normalize_axis, AxisSet};
pub use builder::{GridInterpolatorBuilder, Interpolator, VectorFieldSample};
pub use config::{Diffusivity, InterpScheme, SamplerConfig, SamplerMode};
pub use error::{FieldError, Result};
pub use multilinear::Multilinear;
pub use sampler::{FieldSampler, GridField, VelocityField};
pub use series::TimeSeries;
pub use species::{MaterialSample, SpeciesProperties};
pub use table::ColumnTable;
pub use time::{resolve_index, TimeCursor};
