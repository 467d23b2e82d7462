//! Standalone rigid bodies.

use nalgebra::{Point3, UnitQuaternion};
use strider_types::{BodyData, Transform};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single rigid body placed directly in the world, outside any compound.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SingleBody {
    name: String,
    data: BodyData,
    transform: Transform,
}

impl SingleBody {
    /// Create a body at the given world transform.
    #[must_use]
    pub fn new(name: impl Into<String>, data: BodyData, transform: Transform) -> Self {
        Self {
            name: name.into(),
            data,
            transform,
        }
    }

    /// Create a body from position and rotation.
    #[must_use]
    pub fn at(
        name: impl Into<String>,
        data: BodyData,
        position: Point3<f64>,
        rotation: UnitQuaternion<f64>,
    ) -> Self {
        Self::new(name, data, Transform::from_position_rotation(position, rotation))
    }

    /// Body name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Body description.
    #[must_use]
    pub fn data(&self) -> &BodyData {
        &self.data
    }

    /// Authoring-time world transform.
    #[must_use]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Validate the body's shapes.
    ///
    /// # Errors
    ///
    /// Propagates [`strider_types::SceneError::InvalidShape`].
    pub fn validate(&self) -> strider_types::Result<()> {
        self.data.validate()
    }
}
