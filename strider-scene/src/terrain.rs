//! Terrain generators.
//!
//! A terrain generator accumulates static geometry that a backend ingests
//! alongside the scenario's bodies. Primitives are named deterministically
//! (`"<generator>/primitive_<i>"`) in creation order.

use nalgebra::{Point3, Vector3};
use strider_types::{
    HeightfieldData, Material, SceneError, ShapeDescriptor, ShapeKind, Transform,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One static terrain element.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TerrainPrimitive {
    /// Generated name, unique within the owning generator.
    pub name: String,
    /// Geometry of the element.
    pub descriptor: ShapeDescriptor,
    /// World placement.
    pub transform: Transform,
    /// Visual material.
    pub material: Material,
}

/// Generator of static terrain geometry.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TerrainGenerator {
    name: String,
    primitives: Vec<TerrainPrimitive>,
}

impl TerrainGenerator {
    /// Create an empty static terrain generator.
    #[must_use]
    pub fn static_gen(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primitives: Vec::new(),
        }
    }

    /// Generator name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a primitive terrain element.
    ///
    /// `rotation` is intrinsic roll/pitch/yaw Euler angles in radians.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidShape`] if the descriptor fails
    /// validation or `kind` is `Mesh`/`Heightfield` (use
    /// [`TerrainGenerator::create_heightfield`] for height fields; mesh
    /// terrain requires a loader this layer does not own).
    pub fn create_primitive(
        &mut self,
        kind: ShapeKind,
        size: Vector3<f64>,
        position: Point3<f64>,
        rotation: Vector3<f64>,
        color: [f64; 3],
        texture: Option<&str>,
    ) -> strider_types::Result<()> {
        let descriptor = match kind {
            ShapeKind::Box => ShapeDescriptor::box_shape(size),
            ShapeKind::Sphere => ShapeDescriptor::sphere(size.x),
            ShapeKind::Cylinder => ShapeDescriptor::cylinder(size.x, size.y),
            ShapeKind::Capsule => ShapeDescriptor::capsule(size.x, size.y),
            ShapeKind::Mesh | ShapeKind::Heightfield => {
                return Err(SceneError::invalid_shape(format!(
                    "terrain primitive cannot be a {kind}"
                )));
            }
        };
        descriptor.validate()?;

        let mut material = Material::from_color(color);
        if let Some(texture) = texture {
            material = material.with_texture(texture);
        }

        self.primitives.push(TerrainPrimitive {
            name: format!("{}/primitive_{}", self.name, self.primitives.len()),
            descriptor,
            transform: Transform::from_euler(position, rotation.x, rotation.y, rotation.z),
            material,
        });
        Ok(())
    }

    /// Add a height-field terrain patch.
    ///
    /// `size` gives the patch extents; `size.z` scales the normalized
    /// height samples.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidShape`] if the sample count does not
    /// match the declared grid exactly.
    pub fn create_heightfield(
        &mut self,
        size: Vector3<f64>,
        position: Point3<f64>,
        data: HeightfieldData,
    ) -> strider_types::Result<()> {
        let descriptor = ShapeDescriptor::heightfield(size, data);
        descriptor.validate()?;

        self.primitives.push(TerrainPrimitive {
            name: format!("{}/primitive_{}", self.name, self.primitives.len()),
            descriptor,
            transform: Transform::from_position(position),
            material: Material::default(),
        });
        Ok(())
    }

    /// Iterate primitives in creation order.
    pub fn primitives(&self) -> impl Iterator<Item = &TerrainPrimitive> {
        self.primitives.iter()
    }

    /// Number of primitives.
    #[must_use]
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    /// Whether the generator holds no primitives.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}
