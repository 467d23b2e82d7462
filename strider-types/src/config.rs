//! Simulation settings shared across backends.

use nalgebra::Vector3;

use crate::error::SceneError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Gravity configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Gravity {
    /// Acceleration due to gravity (m/s²).
    pub acceleration: Vector3<f64>,
}

impl Default for Gravity {
    fn default() -> Self {
        Self::earth()
    }
}

impl Gravity {
    /// Standard Earth gravity (9.81 m/s² in -Z).
    #[must_use]
    pub fn earth() -> Self {
        Self {
            acceleration: Vector3::new(0.0, 0.0, -9.81),
        }
    }

    /// Zero gravity.
    #[must_use]
    pub fn zero() -> Self {
        Self {
            acceleration: Vector3::zeros(),
        }
    }

    /// Custom gravity vector.
    #[must_use]
    pub fn custom(acceleration: Vector3<f64>) -> Self {
        Self { acceleration }
    }

    /// Gravitational force on a body of the given mass.
    #[must_use]
    pub fn force_on(&self, mass: f64) -> Vector3<f64> {
        self.acceleration * mass
    }
}

/// Settings controlling how a simulation advances.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimulationSettings {
    /// Nominal timestep handed to `step` by the driving loop (seconds).
    pub timestep: f64,
    /// Gravity configuration.
    pub gravity: Gravity,
    /// Internal sub-stepping passes per `step` call.
    pub substeps: u32,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            timestep: 1.0 / 240.0,
            gravity: Gravity::earth(),
            substeps: 1,
        }
    }
}

impl SimulationSettings {
    /// Settings for a real-time loop (60 Hz).
    #[must_use]
    pub fn realtime() -> Self {
        Self {
            timestep: 1.0 / 60.0,
            ..Default::default()
        }
    }

    /// Set the timestep.
    #[must_use]
    pub fn with_timestep(mut self, timestep: f64) -> Self {
        self.timestep = timestep;
        self
    }

    /// Set the gravity.
    #[must_use]
    pub fn with_gravity(mut self, gravity: Gravity) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the sub-stepping count.
    #[must_use]
    pub fn with_substeps(mut self, substeps: u32) -> Self {
        self.substeps = substeps;
        self
    }

    /// Step frequency in Hz.
    #[must_use]
    pub fn frequency(&self) -> f64 {
        1.0 / self.timestep
    }

    /// Validate the settings.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidConfig`] for a non-positive or
    /// non-finite timestep, or zero substeps.
    pub fn validate(&self) -> crate::Result<()> {
        if !self.timestep.is_finite() || self.timestep <= 0.0 {
            return Err(SceneError::invalid_config(format!(
                "timestep must be positive and finite, got {}",
                self.timestep
            )));
        }
        if self.timestep > 1.0 {
            return Err(SceneError::invalid_config(
                "timestep > 1 second is likely an error",
            ));
        }
        if self.substeps == 0 {
            return Err(SceneError::invalid_config("substeps must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_settings_valid() {
        let settings = SimulationSettings::default();
        assert!(settings.validate().is_ok());
        assert_relative_eq!(settings.frequency(), 240.0, epsilon = 1e-9);
    }

    #[test]
    fn test_invalid_timestep() {
        assert!(SimulationSettings::default()
            .with_timestep(0.0)
            .validate()
            .is_err());
        assert!(SimulationSettings::default()
            .with_timestep(f64::NAN)
            .validate()
            .is_err());
        assert!(SimulationSettings::default()
            .with_timestep(2.0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_zero_substeps_rejected() {
        assert!(SimulationSettings::default()
            .with_substeps(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_gravity_force() {
        let g = Gravity::earth();
        let f = g.force_on(2.0);
        assert_relative_eq!(f.z, -19.62, epsilon = 1e-9);
    }
}
