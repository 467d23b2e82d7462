//! Sensor declarations.
//!
//! A [`SensorSpec`] is the authoring-time half of a sensor: identity plus
//! the agent it is bound to. Measurement aggregation happens in the
//! runtime layer, which recomputes values from current simulation state on
//! every query.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Kind of sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SensorKind {
    /// Proprioceptive measurements of the bound agent: joint positions and
    /// velocities, relative body positions, body linear velocities and
    /// accelerations.
    Intrinsics,
}

impl std::fmt::Display for SensorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Intrinsics => write!(f, "intrinsics"),
        }
    }
}

/// Declaration of a sensor bound to exactly one agent.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorSpec {
    name: String,
    agent: String,
    kind: SensorKind,
}

impl SensorSpec {
    /// Declare an intrinsics sensor for the named agent.
    #[must_use]
    pub fn intrinsics(name: impl Into<String>, agent: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            agent: agent.into(),
            kind: SensorKind::Intrinsics,
        }
    }

    /// Sensor name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the agent this sensor is bound to.
    #[must_use]
    pub fn agent(&self) -> &str {
        &self.agent
    }

    /// Sensor kind.
    #[must_use]
    pub fn kind(&self) -> SensorKind {
        self.kind
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_spec() {
        let spec = SensorSpec::intrinsics("sensor_0", "walker_0");
        assert_eq!(spec.name(), "sensor_0");
        assert_eq!(spec.agent(), "walker_0");
        assert_eq!(spec.kind(), SensorKind::Intrinsics);
        assert_eq!(spec.kind().to_string(), "intrinsics");
    }
}
