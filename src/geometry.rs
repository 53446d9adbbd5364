//! Axis-aligned bounding volumes for contact queries.

use nalgebra::Vector3;

/// Axis-aligned bounding box in world or entity-local coordinates, metres.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the box.
    pub min: Vector3<f64>,
    /// Maximum corner of the box.
    pub max: Vector3<f64>,
}

impl Aabb {
    /// Create a box from explicit corners.
    #[must_use]
    pub fn new(min: Vector3<f64>, max: Vector3<f64>) -> Self {
        Self { min, max }
    }

    /// Create a box centred on the origin with the supplied extents.
    ///
    /// Extents map width to X, height to Y and depth to Z, matching the
    /// entity bounding convention used throughout the crate.
    #[must_use]
    pub fn from_extents(extents: Vector3<f64>) -> Self {
        let half = extents / 2.0;
        Self {
            min: -half,
            max: half,
        }
    }

    /// Width (X), height (Y) and depth (Z) of the box.
    #[must_use]
    pub fn extents(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// Return the box shifted by `offset`.
    #[must_use]
    pub fn translated(&self, offset: Vector3<f64>) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Test whether two boxes overlap on all three axes.
    ///
    /// Touching faces count as an intersection, so a block resting exactly
    /// on top of another is still detected by the load probe.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Build the load probe volume: a thin slab sitting directly on the top
    /// face of this box, `epsilon` metres tall.
    ///
    /// Neighbours whose bounding boxes intersect the probe are treated as
    /// resting on the entity and contribute to its compressive load.
    #[must_use]
    pub fn load_probe(&self, epsilon: f64) -> Self {
        let mut probe = *self;
        probe.min.y = probe.max.y;
        probe.max.y += epsilon;
        probe
    }
}

/// Convenience helper for creating extent vectors.
///
/// # Examples
/// ```
/// use beambox::extents;
///
/// let beam = extents(0.5, 0.01, 0.1);
/// assert_eq!(beam.y, 0.01);
/// ```
#[must_use]
pub fn extents(width: f64, height: f64, depth: f64) -> Vector3<f64> {
    Vector3::new(width, height, depth)
}
