//! Structural entities: the per-object state the simulation reads and
//! mutates each tick.

use nalgebra::Vector3;

use crate::color::Color;
use crate::geometry::Aabb;
use crate::material::MaterialKind;
use crate::mesh::BeamMesh;

/// Role tag controlling which structural responses apply to an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityRole {
    /// Horizontal span that sags under load and can split on overstress.
    Beam,
    /// Any other block; evaluated for compression only.
    Generic,
}

/// Mass and velocity state supplied by the host physics layer.
///
/// Entities without physics state are skipped as load contributors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicsState {
    /// Mass in kilograms.
    pub mass: f64,
    /// Linear velocity in metres per second; the vertical (Y) component is
    /// the load-relevant one.
    pub velocity: Vector3<f64>,
}

impl PhysicsState {
    /// Physics state for a stationary body.
    #[must_use]
    pub fn at_rest(mass: f64) -> Self {
        Self {
            mass,
            velocity: Vector3::zeros(),
        }
    }
}

/// One rigid block in the scene.
///
/// The scene graph owns every entity; cross-references between entities are
/// node indices held by the graph, never direct references.
#[derive(Clone, Debug)]
pub struct StructuralEntity {
    /// Host-facing label for the entity.
    pub name: String,
    /// World position of the entity centre in metres.
    pub position: Vector3<f64>,
    /// Bounding extents: width (X), height (Y), depth (Z) in metres.
    pub extents: Vector3<f64>,
    /// Mass and velocity, when the host physics layer provides them.
    pub physics: Option<PhysicsState>,
    /// Key into the material catalog.
    pub material: MaterialKind,
    /// Structural role of the entity.
    pub role: EntityRole,
    /// Current render tint, updated by the visualization mapper.
    pub tint: Color,
    /// Current procedural mesh, present once a beam has been rebaked.
    pub mesh: Option<BeamMesh>,
    /// Deflection used for the most recent rebake, metres.
    pub sag: f64,
}

impl StructuralEntity {
    /// Create an entity with the supplied role and no physics state.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        position: Vector3<f64>,
        extents: Vector3<f64>,
        material: MaterialKind,
        role: EntityRole,
    ) -> Self {
        Self {
            name: name.into(),
            position,
            extents,
            physics: None,
            material,
            role,
            tint: Color::CLEAR,
            mesh: None,
            sag: 0.0,
        }
    }

    /// Create a beam entity.
    #[must_use]
    pub fn beam(
        name: impl Into<String>,
        position: Vector3<f64>,
        extents: Vector3<f64>,
        material: MaterialKind,
    ) -> Self {
        Self::new(name, position, extents, material, EntityRole::Beam)
    }

    /// Create a generic block entity.
    #[must_use]
    pub fn block(
        name: impl Into<String>,
        position: Vector3<f64>,
        extents: Vector3<f64>,
        material: MaterialKind,
    ) -> Self {
        Self::new(name, position, extents, material, EntityRole::Generic)
    }

    /// The entity's bounding box translated to its world position.
    #[must_use]
    pub fn world_aabb(&self) -> Aabb {
        Aabb::from_extents(self.extents).translated(self.position)
    }

    /// Whether this entity participates in beam responses.
    #[must_use]
    pub fn is_beam(&self) -> bool {
        self.role == EntityRole::Beam
    }
}
