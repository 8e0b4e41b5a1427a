//! Per-point velocity and diffusivity evaluation for an assembly loop.
//!
//! A [`FieldSampler`] is built once at setup, then driven by the host:
//! call [`FieldSampler::advance`] once at the start of each assembly pass,
//! then sample at every quadrature point of that pass.
//!
//! ```rust
//! use gridfield::{Diffusivity, FieldSampler, SamplerConfig};
//!
//! let mut config = SamplerConfig::new(2, Diffusivity::Scalar(0.1));
//! config.const_velocity = Some(vec![3.0, -1.0]);
//!
//! let mut sampler = FieldSampler::from_config(config).unwrap();
//! assert!(!sampler.is_time_dependent());
//!
//! sampler.advance(10.0).unwrap();
//! assert_eq!(sampler.sample_velocity([5.0, 5.0, 0.0]), [3.0, -1.0, 0.0]);
//! assert_eq!(sampler.sample_diffusivity([5.0, 5.0, 0.0]).along(0), 0.1);
//! ```
use tracing::{debug, info};

use crate::axis::AxisSet;
use crate::builder::{GridInterpolatorBuilder, VectorFieldSample};
use crate::config::{Diffusivity, SamplerConfig, SamplerMode};
use crate::error::{FieldError, Result};
use crate::ingest::load_grid;
use crate::series::{check_shape, TimeSeries};
use crate::species::MaterialSample;
use crate::time::TimeCursor;

/// A gridded velocity field with all of its time slices resident in memory.
#[derive(Clone, Debug)]
pub struct GridField {
    builder: GridInterpolatorBuilder<f64>,
    series: TimeSeries<f64>,

    /// Interpolators for the current slice
    active: VectorFieldSample<f64>,

    /// Present only for time-varying data
    cursor: Option<TimeCursor<f64>>,

    rebuilds: usize,
}

impl GridField {
    /// Build the field on slice 0.
    ///
    /// # Errors
    /// * `SetupConfig` if the series does not hold one slice per time entry
    /// * `ShapeMismatch` if any slice does not cover the spatial grid
    pub fn new(axes: AxisSet<f64>, series: TimeSeries<f64>) -> Result<Self> {
        if series.nslices() != axes.nslices() {
            return Err(FieldError::setup(format!(
                "series holds {} time slices but the time axis has {} entries",
                series.nslices(),
                axes.nslices()
            )));
        }
        let expected = axes.grid_len();
        for component in 0..series.ncomponents() {
            for slice in 0..series.nslices() {
                let found = series.get(component, slice).map_or(0, |v| v.len());
                check_shape(component, slice, expected, found)?;
            }
        }

        let cursor = axes.time().cloned().map(TimeCursor::new);
        let builder = GridInterpolatorBuilder::new(axes);
        let active = builder.build(&series, 0)?;

        Ok(Self {
            builder,
            series,
            active,
            cursor,
            rebuilds: 0,
        })
    }

    /// Move to the slice active at time `t`, rebuilding the interpolators
    /// if it differs from the current one.
    ///
    /// Returns whether a rebuild happened.
    pub fn advance(&mut self, t: f64) -> Result<bool> {
        let Some(cursor) = self.cursor.as_mut() else {
            return Ok(false);
        };

        let from = cursor.index();
        let Some(to) = cursor.peek(t)? else {
            cursor.commit(t, from);
            return Ok(false);
        };

        // Build the whole set before moving the cursor or replacing anything
        let next = self.builder.build(&self.series, to)?;
        cursor.commit(t, to);
        self.active = next;
        self.rebuilds += 1;
        debug!("Rebuilt velocity field at t = {t}: slice {from} -> {to}");

        Ok(true)
    }

    #[inline]
    pub fn sample(&self, point: [f64; 3]) -> [f64; 3] {
        self.active.sample(point)
    }

    pub fn axes(&self) -> &AxisSet<f64> {
        self.builder.axes()
    }

    pub fn active(&self) -> &VectorFieldSample<f64> {
        &self.active
    }

    pub fn is_time_dependent(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn rebuild_count(&self) -> usize {
        self.rebuilds
    }
}

/// Source of the velocity field, fixed at setup.
#[derive(Clone, Debug)]
pub enum VelocityField {
    Constant([f64; 3]),
    Grid2D(GridField),
    Grid3D(GridField),
}

impl VelocityField {
    /// Velocity at `point`. The z component is zero on a planar grid.
    #[inline]
    pub fn sample(&self, point: [f64; 3]) -> [f64; 3] {
        match self {
            VelocityField::Constant(v) => *v,
            VelocityField::Grid2D(g) | VelocityField::Grid3D(g) => g.sample(point),
        }
    }

    pub fn mode(&self) -> SamplerMode {
        match self {
            VelocityField::Constant(_) => SamplerMode::Constant,
            VelocityField::Grid2D(_) => SamplerMode::Grid2D,
            VelocityField::Grid3D(_) => SamplerMode::Grid3D,
        }
    }

    pub fn grid(&self) -> Option<&GridField> {
        match self {
            VelocityField::Constant(_) => None,
            VelocityField::Grid2D(g) | VelocityField::Grid3D(g) => Some(g),
        }
    }

    fn grid_mut(&mut self) -> Option<&mut GridField> {
        match self {
            VelocityField::Constant(_) => None,
            VelocityField::Grid2D(g) | VelocityField::Grid3D(g) => Some(g),
        }
    }
}

/// Velocity and diffusivity sampler for one execution context.
///
/// Instances are independent; each thread or partition of a parallel run
/// owns its own. Cloning shares only immutable slice data.
#[derive(Clone, Debug)]
pub struct FieldSampler {
    config: SamplerConfig,
    field: VelocityField,

    /// Validated form of `config.diffusivity`
    diffusivity: Diffusivity,
}

impl FieldSampler {
    /// Validate the configuration, read any input tables, and build
    /// the interpolators for the first time slice.
    ///
    /// # Errors
    /// * Any setup error; nothing is read after this returns
    pub fn from_config(config: SamplerConfig) -> Result<Self> {
        let mode = config.select_mode()?;
        let field = match mode {
            SamplerMode::Constant => VelocityField::Constant(config.constant_velocity()?),
            _ => {
                let (axes, series) = load_grid(&config, mode)?;
                Self::grid_field(mode, axes, series)?
            }
        };

        Self::assemble(config, field)
    }

    /// Build a gridded sampler from data already in memory.
    /// File parameters of `config` are ignored.
    ///
    /// # Errors
    /// * `SetupConfig` if `config` selects constant mode, if the number of
    ///   components does not match the mode, if a planar mode gets a
    ///   volumetric grid, or if time dependence disagrees with the axes
    pub fn from_grid(
        config: SamplerConfig,
        axes: AxisSet<f64>,
        series: TimeSeries<f64>,
    ) -> Result<Self> {
        let mode = config.select_mode()?;
        if mode == SamplerMode::Constant {
            return Err(FieldError::setup(
                "const_velocity is set; gridded data would be ignored",
            ));
        }
        if config.time_dependent != axes.time().is_some() {
            return Err(FieldError::setup(format!(
                "time_dependent is {} but the axes {} a time axis",
                config.time_dependent,
                if axes.time().is_some() { "have" } else { "lack" }
            )));
        }

        let field = Self::grid_field(mode, axes, series)?;
        Self::assemble(config, field)
    }

    fn grid_field(
        mode: SamplerMode,
        axes: AxisSet<f64>,
        series: TimeSeries<f64>,
    ) -> Result<VelocityField> {
        if series.ncomponents() != mode.ncomponents() {
            return Err(FieldError::setup(format!(
                "{mode:?} needs {} velocity components, got {}",
                mode.ncomponents(),
                series.ncomponents()
            )));
        }
        if mode == SamplerMode::Grid2D && !axes.is_planar() {
            return Err(FieldError::setup(
                "a 2D problem cannot use a grid with more than one z entry",
            ));
        }

        let grid = GridField::new(axes, series)?;
        Ok(match mode {
            SamplerMode::Grid2D => VelocityField::Grid2D(grid),
            _ => VelocityField::Grid3D(grid),
        })
    }

    fn assemble(config: SamplerConfig, field: VelocityField) -> Result<Self> {
        let diffusivity = config.diffusivity.normalized(config.num_dims)?;

        match field.grid() {
            Some(g) => info!(
                "Field sampler ready: {:?} on a {:?} grid, {} time slices",
                field.mode(),
                g.axes().dims(),
                g.axes().nslices()
            ),
            None => info!("Field sampler ready: constant velocity {:?}", field.sample([0.0; 3])),
        }

        Ok(Self {
            config,
            field,
            diffusivity,
        })
    }

    /// Velocity at `point`.
    ///
    /// Points outside the grid take the value at the nearest boundary point.
    #[inline]
    pub fn sample_velocity(&self, point: [f64; 3]) -> [f64; 3] {
        self.field.sample(point)
    }

    /// Velocity at each of `points`, written to `out`.
    ///
    /// # Errors
    /// * `DomainError` if `points` and `out` differ in length
    pub fn sample_velocity_many(&self, points: &[[f64; 3]], out: &mut [[f64; 3]]) -> Result<()> {
        if points.len() != out.len() {
            return Err(FieldError::domain(format!(
                "{} points but {} output slots",
                points.len(),
                out.len()
            )));
        }
        for (o, p) in out.iter_mut().zip(points.iter()) {
            *o = self.field.sample(*p);
        }
        Ok(())
    }

    /// Diffusivity at `point`. Uniform in space and time.
    #[inline]
    pub fn sample_diffusivity(&self, _point: [f64; 3]) -> &Diffusivity {
        &self.diffusivity
    }

    /// Every field the transport terms read at `point`.
    pub fn sample_material(&self, point: [f64; 3]) -> MaterialSample<'_> {
        let species = &self.config.species;
        MaterialSample {
            velocity: self.sample_velocity(point),
            diffusivity: self.sample_diffusivity(point),
            decay_constant: species.decay_constant,
            settling_velocity: species.settling_vector(),
            wet_scavenge_constant: species.wet_scavenge_constant,
        }
    }

    /// Bring the field up to simulation time `t`. Call once per assembly
    /// pass, before any sampling in that pass.
    ///
    /// Returns whether the interpolators were rebuilt for a new time slice.
    /// Does nothing for constant or stationary fields.
    ///
    /// # Errors
    /// * `DomainError` if `t` is NaN
    pub fn advance(&mut self, t: f64) -> Result<bool> {
        match self.field.grid_mut() {
            Some(g) => g.advance(t),
            None => Ok(false),
        }
    }

    /// Whether [`Self::advance`] needs to be called at all.
    pub fn is_time_dependent(&self) -> bool {
        self.field.grid().is_some_and(GridField::is_time_dependent)
    }

    pub fn mode(&self) -> SamplerMode {
        self.field.mode()
    }

    /// Index of the active time slice; 0 for constant and stationary fields.
    pub fn slice_index(&self) -> usize {
        self.field.grid().map_or(0, |g| g.active().slice())
    }

    /// Number of rebuilds performed by [`Self::advance`] so far.
    pub fn rebuild_count(&self) -> usize {
        self.field.grid().map_or(0, GridField::rebuild_count)
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    pub fn field(&self) -> &VelocityField {
        &self.field
    }
}
