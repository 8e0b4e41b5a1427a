//! Sampler configuration and selection of the sampling mode.
//!
//! A configuration is usually deserialized from TOML:
//!
//! ```rust
//! use gridfield::config::{SamplerConfig, SamplerMode};
//!
//! let config = SamplerConfig::from_toml_str(r#"
//!     num_dims = 3
//!     interp_type = "trilinear"
//!     diffusivity = [10.0, 10.0, 0.5]
//!     dim_file = "coords.csv"
//!     u_file = "u.csv"
//!     v_file = "v.csv"
//!     w_file = "w.csv"
//!     time_dependent = true
//!
//!     [species]
//!     decay_constant = 2.9e-5
//!     settling_velocity = -0.002
//! "#).unwrap();
//!
//! assert_eq!(config.select_mode().unwrap(), SamplerMode::Grid3D);
//! ```
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::error::{FieldError, Result};
use crate::species::SpeciesProperties;

/// Interpolation scheme, which implies the number of spatial dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpScheme {
    Bilinear,
    Trilinear,
}

impl InterpScheme {
    /// Number of spatial dimensions this scheme interpolates over.
    pub fn ndims(self) -> usize {
        match self {
            InterpScheme::Bilinear => 2,
            InterpScheme::Trilinear => 3,
        }
    }
}

/// Diffusion coefficient, uniform over the domain.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Diffusivity {
    /// One coefficient for every direction
    Scalar(f64),

    /// One coefficient per spatial dimension
    Directional(Vec<f64>),
}

impl Diffusivity {
    /// Check this coefficient against the problem's dimension count,
    /// collapsing a one-entry list to a scalar.
    ///
    /// # Errors
    /// * `SetupConfig` if a list has neither one entry nor `num_dims` entries,
    ///   or any coefficient is negative or not finite
    pub fn normalized(&self, num_dims: usize) -> Result<Self> {
        let values = match self {
            Diffusivity::Scalar(d) => std::slice::from_ref(d),
            Diffusivity::Directional(v) => &v[..],
        };
        if values.iter().any(|d| !d.is_finite() || *d < 0.0) {
            return Err(FieldError::setup(
                "diffusivity must be finite and non-negative",
            ));
        }

        match values.len() {
            1 => Ok(Diffusivity::Scalar(values[0])),
            n if n == num_dims => Ok(Diffusivity::Directional(values.to_vec())),
            n => Err(FieldError::setup(format!(
                "diffusivity has {n} entries, expected 1 or {num_dims}"
            ))),
        }
    }

    /// Coefficient along spatial dimension `dim`.
    ///
    /// Directional coefficients are zero along dimensions they do not cover.
    #[inline]
    pub fn along(&self, dim: usize) -> f64 {
        match self {
            Diffusivity::Scalar(d) => *d,
            Diffusivity::Directional(v) => v.get(dim).copied().unwrap_or(0.0),
        }
    }

    pub fn is_directional(&self) -> bool {
        matches!(self, Diffusivity::Directional(_))
    }
}

/// How the velocity field is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SamplerMode {
    /// A fixed vector everywhere, at all times
    Constant,

    /// Interpolated from a planar grid with u and v components
    Grid2D,

    /// Interpolated from a volumetric grid with u, v and w components
    Grid3D,
}

impl SamplerMode {
    /// Number of velocity components read from data files.
    pub fn ncomponents(self) -> usize {
        match self {
            SamplerMode::Constant => 0,
            SamplerMode::Grid2D => 2,
            SamplerMode::Grid3D => 3,
        }
    }
}

/// Input files for a gridded velocity field.
#[derive(Clone, Debug, PartialEq)]
pub struct GridFiles {
    /// Coordinate table, one column per axis
    pub dim: PathBuf,

    /// One data table per velocity component, in component order
    pub components: Vec<PathBuf>,
}

/// Setup parameters of a [`crate::FieldSampler`]. Fixed for the life of the sampler.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SamplerConfig {
    /// Number of spatial dimensions of the problem, 2 or 3
    pub num_dims: usize,

    /// Declared interpolation scheme; must agree with `num_dims` when given
    #[serde(default)]
    pub interp_type: Option<InterpScheme>,

    pub diffusivity: Diffusivity,

    /// Fixed velocity overriding any data files, up to three components
    #[serde(default)]
    pub const_velocity: Option<Vec<f64>>,

    #[serde(default)]
    pub dim_file: Option<PathBuf>,
    #[serde(default)]
    pub u_file: Option<PathBuf>,
    #[serde(default)]
    pub v_file: Option<PathBuf>,
    #[serde(default)]
    pub w_file: Option<PathBuf>,

    /// Column delimiter of the input tables
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Whether each input table starts with a header row
    #[serde(default = "default_has_header")]
    pub has_header: bool,

    /// Whether the coordinate table carries a time column and the
    /// data tables one column per time slice
    #[serde(default)]
    pub time_dependent: bool,

    #[serde(default)]
    pub species: SpeciesProperties,
}

fn default_delimiter() -> char {
    ','
}

fn default_has_header() -> bool {
    true
}

impl SamplerConfig {
    /// A configuration with no files, no constant velocity, and defaults elsewhere.
    pub fn new(num_dims: usize, diffusivity: Diffusivity) -> Self {
        Self {
            num_dims,
            interp_type: None,
            diffusivity,
            const_velocity: None,
            dim_file: None,
            u_file: None,
            v_file: None,
            w_file: None,
            delimiter: default_delimiter(),
            has_header: default_has_header(),
            time_dependent: false,
            species: SpeciesProperties::default(),
        }
    }

    /// Parse a TOML document.
    ///
    /// Relative file paths are kept as written.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| FieldError::Config(e.to_string()))
    }

    /// Read a TOML file, resolving relative file paths against its directory.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| FieldError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&content)?;

        if let Some(base) = path.parent() {
            for file in [
                &mut config.dim_file,
                &mut config.u_file,
                &mut config.v_file,
                &mut config.w_file,
            ]
            .into_iter()
            .flatten()
            {
                if file.is_relative() {
                    *file = base.join(&*file);
                }
            }
        }

        Ok(config)
    }

    /// Validate every parameter that does not involve input files
    /// and select the sampling mode.
    ///
    /// A constant velocity selects [`SamplerMode::Constant`]; otherwise
    /// `num_dims` selects the planar or volumetric grid mode.
    ///
    /// # Errors
    /// * `SetupConfig` for an unsupported dimension count, a scheme that
    ///   disagrees with it, a bad diffusivity, invalid species coefficients,
    ///   a non-ASCII delimiter, or a malformed constant velocity
    pub fn select_mode(&self) -> Result<SamplerMode> {
        if !(2..=3).contains(&self.num_dims) {
            return Err(FieldError::setup(format!(
                "num_dims must be 2 or 3, got {}",
                self.num_dims
            )));
        }
        if let Some(scheme) = self.interp_type {
            if scheme.ndims() != self.num_dims {
                return Err(FieldError::setup(format!(
                    "{scheme:?} interpolation is {}-dimensional but num_dims is {}",
                    scheme.ndims(),
                    self.num_dims
                )));
            }
        }
        self.diffusivity.normalized(self.num_dims)?;
        self.species.validate()?;
        self.delimiter_byte()?;

        if self.const_velocity.is_some() {
            self.constant_velocity()?;
            return Ok(SamplerMode::Constant);
        }

        Ok(match self.num_dims {
            2 => SamplerMode::Grid2D,
            _ => SamplerMode::Grid3D,
        })
    }

    /// The configured constant velocity, zero-padded to three components.
    ///
    /// # Errors
    /// * `SetupConfig` if it is missing, empty, longer than three, or not finite
    pub fn constant_velocity(&self) -> Result<[f64; 3]> {
        let v = self
            .const_velocity
            .as_deref()
            .ok_or_else(|| FieldError::setup("const_velocity was not provided"))?;
        if v.is_empty() || v.len() > 3 {
            return Err(FieldError::setup(format!(
                "const_velocity must have 1 to 3 components, got {}",
                v.len()
            )));
        }
        if v.iter().any(|c| !c.is_finite()) {
            return Err(FieldError::setup("const_velocity must be finite"));
        }

        let mut out = [0.0; 3];
        out[..v.len()].copy_from_slice(v);
        Ok(out)
    }

    /// Collect the input files needed by a grid mode.
    ///
    /// # Errors
    /// * `SetupConfig` if `mode` is not a grid mode, or a required file is missing
    pub fn grid_files(&self, mode: SamplerMode) -> Result<GridFiles> {
        if mode == SamplerMode::Constant {
            return Err(FieldError::setup("constant mode reads no grid files"));
        }

        let dim = self
            .dim_file
            .clone()
            .ok_or_else(|| FieldError::setup("dim_file was not provided"))?;
        let u = self
            .u_file
            .clone()
            .ok_or_else(|| FieldError::setup("u_file was not provided"))?;
        let v = self
            .v_file
            .clone()
            .ok_or_else(|| FieldError::setup("v_file was not provided"))?;

        let mut components = vec![u, v];
        match (mode, &self.w_file) {
            (SamplerMode::Grid3D, Some(w)) => components.push(w.clone()),
            (SamplerMode::Grid3D, None) => {
                return Err(FieldError::setup(
                    "w_file was not provided; it is required for a 3D problem",
                ))
            }
            (_, Some(w)) => warn!("ignoring w_file {} for a 2D problem", w.display()),
            _ => {}
        }

        Ok(GridFiles { dim, components })
    }

    /// Delimiter as the single byte the table reader expects.
    pub(crate) fn delimiter_byte(&self) -> Result<u8> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(|b| b.is_ascii())
            .ok_or_else(|| {
                FieldError::setup(format!(
                    "delimiter must be a single ASCII character, got {:?}",
                    self.delimiter
                ))
            })
    }
}
