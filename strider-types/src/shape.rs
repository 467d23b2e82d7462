//! Collision and visual geometry descriptions.
//!
//! A [`ShapeDescriptor`] describes geometry declaratively; backends turn it
//! into whatever native representation they use. Visual shapes additionally
//! carry a [`Material`].

use nalgebra::Vector3;

use crate::error::SceneError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Kind of geometric shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ShapeKind {
    /// Rectangular box.
    Box,
    /// Sphere.
    Sphere,
    /// Cylinder with flat caps, axis along local Z.
    Cylinder,
    /// Capsule (cylinder with hemispherical caps), axis along local Z.
    Capsule,
    /// External triangle mesh, referenced by resource path.
    Mesh,
    /// Height-field sampled on a regular grid.
    Heightfield,
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Box => write!(f, "box"),
            Self::Sphere => write!(f, "sphere"),
            Self::Cylinder => write!(f, "cylinder"),
            Self::Capsule => write!(f, "capsule"),
            Self::Mesh => write!(f, "mesh"),
            Self::Heightfield => write!(f, "heightfield"),
        }
    }
}

/// Height samples for a [`ShapeKind::Heightfield`] shape.
///
/// Samples are stored row-major: `heights[row * num_width_samples + col]`,
/// normalized to `[0, 1]` and scaled by the descriptor's `size.z`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HeightfieldData {
    /// Number of samples along the width (local X).
    pub num_width_samples: usize,
    /// Number of samples along the depth (local Y).
    pub num_depth_samples: usize,
    /// Height samples, `num_width_samples * num_depth_samples` values.
    pub heights: Vec<f64>,
}

impl HeightfieldData {
    /// Create height-field data from a grid of samples.
    #[must_use]
    pub fn new(num_width_samples: usize, num_depth_samples: usize, heights: Vec<f64>) -> Self {
        Self {
            num_width_samples,
            num_depth_samples,
            heights,
        }
    }

    /// Expected number of samples for the declared grid.
    #[must_use]
    pub fn expected_len(&self) -> usize {
        self.num_width_samples * self.num_depth_samples
    }

    /// Maximum height sample, or 0 for an empty grid.
    #[must_use]
    pub fn max_height(&self) -> f64 {
        self.heights.iter().copied().fold(0.0, f64::max)
    }
}

/// Declarative description of a collision or visual shape.
///
/// # Size convention
///
/// `size` semantics depend on `kind` and are fixed as follows:
///
/// - `Box`: **full extents** (width, depth, height) — not half-extents.
/// - `Sphere`: `size.x` is the radius.
/// - `Cylinder` / `Capsule`: `size.x` is the radius, `size.y` the full
///   height of the cylindrical section.
/// - `Mesh`: per-axis scale applied to the referenced geometry.
/// - `Heightfield`: full extents of the patch; `size.z` scales the
///   normalized height samples.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ShapeDescriptor {
    /// Kind of shape.
    pub kind: ShapeKind,
    /// Dimensions, interpreted per the size convention above.
    pub size: Vector3<f64>,
    /// Resource path for `Mesh` shapes.
    pub mesh_resource: Option<String>,
    /// Samples for `Heightfield` shapes.
    pub heightfield: Option<HeightfieldData>,
}

impl ShapeDescriptor {
    /// Create a box with the given full extents.
    #[must_use]
    pub fn box_shape(extents: Vector3<f64>) -> Self {
        Self {
            kind: ShapeKind::Box,
            size: extents,
            mesh_resource: None,
            heightfield: None,
        }
    }

    /// Create a sphere with the given radius.
    #[must_use]
    pub fn sphere(radius: f64) -> Self {
        Self {
            kind: ShapeKind::Sphere,
            size: Vector3::new(radius, radius, radius),
            mesh_resource: None,
            heightfield: None,
        }
    }

    /// Create a cylinder from radius and full height.
    #[must_use]
    pub fn cylinder(radius: f64, height: f64) -> Self {
        Self {
            kind: ShapeKind::Cylinder,
            size: Vector3::new(radius, height, radius),
            mesh_resource: None,
            heightfield: None,
        }
    }

    /// Create a capsule from radius and full height of the cylindrical part.
    #[must_use]
    pub fn capsule(radius: f64, height: f64) -> Self {
        Self {
            kind: ShapeKind::Capsule,
            size: Vector3::new(radius, height, radius),
            mesh_resource: None,
            heightfield: None,
        }
    }

    /// Create a mesh shape referencing an external resource.
    #[must_use]
    pub fn mesh(resource: impl Into<String>, scale: Vector3<f64>) -> Self {
        Self {
            kind: ShapeKind::Mesh,
            size: scale,
            mesh_resource: Some(resource.into()),
            heightfield: None,
        }
    }

    /// Create a height-field patch with the given extents and samples.
    #[must_use]
    pub fn heightfield(extents: Vector3<f64>, data: HeightfieldData) -> Self {
        Self {
            kind: ShapeKind::Heightfield,
            size: extents,
            mesh_resource: None,
            heightfield: Some(data),
        }
    }

    /// Half-extents of a box shape.
    ///
    /// Only meaningful for `Box`; callers doing half-extent math on other
    /// kinds should use `size` directly.
    #[must_use]
    pub fn half_extents(&self) -> Vector3<f64> {
        self.size * 0.5
    }

    /// Validate the descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidShape`] if dimensions are non-positive
    /// or non-finite, a mesh lacks a resource path, or a height-field's
    /// sample count does not match its declared grid exactly.
    pub fn validate(&self) -> crate::Result<()> {
        if self.size.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err(SceneError::invalid_shape(format!(
                "{} has non-positive or non-finite size {:?}",
                self.kind, self.size
            )));
        }

        match self.kind {
            ShapeKind::Mesh => {
                if self.mesh_resource.as_ref().is_none_or(String::is_empty) {
                    return Err(SceneError::invalid_shape(
                        "mesh shape requires a non-empty resource path",
                    ));
                }
            }
            ShapeKind::Heightfield => {
                let Some(data) = &self.heightfield else {
                    return Err(SceneError::invalid_shape(
                        "heightfield shape requires height samples",
                    ));
                };
                if data.heights.len() != data.expected_len() {
                    return Err(SceneError::invalid_shape(format!(
                        "heightfield declares {}x{} samples but carries {}",
                        data.num_width_samples,
                        data.num_depth_samples,
                        data.heights.len()
                    )));
                }
            }
            _ => {}
        }

        Ok(())
    }
}

/// Visual material parameters (Phong-style).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Material {
    /// Ambient color (RGB, 0..1).
    pub ambient: [f64; 3],
    /// Diffuse color (RGB, 0..1).
    pub diffuse: [f64; 3],
    /// Specular color (RGB, 0..1).
    pub specular: [f64; 3],
    /// Specular exponent.
    pub shininess: f64,
    /// Optional texture name resolved by the rendering backend.
    pub texture: Option<String>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: [0.7, 0.7, 0.7],
            diffuse: [0.7, 0.7, 0.7],
            specular: [0.7, 0.7, 0.7],
            shininess: 32.0,
            texture: None,
        }
    }
}

impl Material {
    /// Create a material with the same RGB for ambient/diffuse/specular.
    #[must_use]
    pub fn from_color(color: [f64; 3]) -> Self {
        Self {
            ambient: color,
            diffuse: color,
            specular: color,
            ..Default::default()
        }
    }

    /// Set the texture name.
    #[must_use]
    pub fn with_texture(mut self, texture: impl Into<String>) -> Self {
        self.texture = Some(texture.into());
        self
    }
}

/// A shape paired with its visual material.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VisualShape {
    /// Geometry of the visual.
    pub descriptor: ShapeDescriptor,
    /// Material parameters.
    pub material: Material,
}

impl VisualShape {
    /// Create a visual shape.
    #[must_use]
    pub fn new(descriptor: ShapeDescriptor, material: Material) -> Self {
        Self {
            descriptor,
            material,
        }
    }

    /// Create a visual shape with the default material.
    #[must_use]
    pub fn plain(descriptor: ShapeDescriptor) -> Self {
        Self {
            descriptor,
            material: Material::default(),
        }
    }
}
