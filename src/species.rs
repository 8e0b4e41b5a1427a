//! Constant per-species coefficients published alongside the transport fields.
use serde::Deserialize;

use crate::config::Diffusivity;
use crate::error::{FieldError, Result};

/// Decay, settling, and wet scavenging coefficients of the transported species.
///
/// All are uniform in space and time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpeciesProperties {
    /// Decay constant, 1/s
    pub decay_constant: f64,

    /// Vertical settling speed, m/s. Zero or negative (downward).
    pub settling_velocity: f64,

    /// Scavenging coefficient for wet deposition, 1/s
    pub wet_scavenge_constant: f64,
}

impl SpeciesProperties {
    /// # Errors
    /// * `SetupConfig` if the settling velocity is positive, a rate constant
    ///   is negative, or any coefficient is not finite
    pub fn validate(&self) -> Result<()> {
        let all = [
            ("decay_constant", self.decay_constant),
            ("settling_velocity", self.settling_velocity),
            ("wet_scavenge_constant", self.wet_scavenge_constant),
        ];
        if let Some((name, _)) = all.iter().find(|(_, v)| !v.is_finite()) {
            return Err(FieldError::setup(format!("{name} must be finite")));
        }
        if self.settling_velocity > 0.0 {
            return Err(FieldError::setup(
                "settling_velocity must be zero or negative (pointing down the z axis)",
            ));
        }
        if self.decay_constant < 0.0 {
            return Err(FieldError::setup("decay_constant must not be negative"));
        }
        if self.wet_scavenge_constant < 0.0 {
            return Err(FieldError::setup("wet_scavenge_constant must not be negative"));
        }
        Ok(())
    }

    /// Settling velocity as a vector along z.
    pub fn settling_vector(&self) -> [f64; 3] {
        [0.0, 0.0, self.settling_velocity]
    }
}

/// Everything the transport terms read at one quadrature point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialSample<'a> {
    pub velocity: [f64; 3],
    pub diffusivity: &'a Diffusivity,
    pub decay_constant: f64,
    pub settling_velocity: [f64; 3],
    pub wet_scavenge_constant: f64,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let species = SpeciesProperties::default();
        species.validate().unwrap();
        assert_eq!(species.settling_vector(), [0.0; 3]);
    }

    #[test]
    fn test_settling_must_point_down() {
        let species = SpeciesProperties {
            settling_velocity: 0.01,
            ..Default::default()
        };
        assert!(matches!(species.validate(), Err(FieldError::SetupConfig(_))));

        let species = SpeciesProperties {
            settling_velocity: -0.01,
            ..Default::default()
        };
        species.validate().unwrap();
        assert_eq!(species.settling_vector(), [0.0, 0.0, -0.01]);
    }

    #[test]
    fn test_rates_must_be_finite_and_nonnegative() {
        let negative = SpeciesProperties {
            decay_constant: -1e-6,
            ..Default::default()
        };
        assert!(negative.validate().is_err());

        let infinite = SpeciesProperties {
            wet_scavenge_constant: f64::INFINITY,
            ..Default::default()
        };
        assert!(infinite.validate().is_err());
    }
}
