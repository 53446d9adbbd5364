//! Error types produced while editing scenes or evaluating entities.

use petgraph::graph::{EdgeIndex, NodeIndex};
use thiserror::Error;

use crate::material::MaterialKind;

/// Error returned when editing a [`Scene`](crate::Scene) with invalid indices.
///
/// Mutating the scene with an entity handle that is not part of the current
/// graph returns a descriptive variant so callers can decide how to recover.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SceneEditError {
    /// Returned when an entity cannot be found in the scene.
    #[error("entity {0:?} does not exist in this scene")]
    UnknownEntity(NodeIndex),
    /// Returned when a joint cannot be found in the scene.
    #[error("joint {0:?} does not exist in this scene")]
    UnknownJoint(EdgeIndex),
}

/// Error returned when a material catalog fails validation.
///
/// Mechanical properties act as divisors and load limits, so every entry
/// must be strictly positive before the catalog is used by the simulation.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum CatalogError {
    /// Returned when a catalog has no entry for a material kind.
    #[error("catalog has no entry for {0:?}")]
    MissingMaterial(MaterialKind),
    /// Returned when a mechanical property is zero or negative.
    #[error("{kind:?} {property} must be positive (received {value})")]
    NonPositiveMechanicalProperty {
        /// Material kind with the offending table.
        kind: MaterialKind,
        /// Name of the rejected property.
        property: &'static str,
        /// Rejected value in pascals.
        value: f64,
    },
    /// Returned when a material density is zero or negative.
    #[error("{kind:?} density must be positive (received {density})")]
    NonPositiveDensity {
        /// Material kind with the offending table.
        kind: MaterialKind,
        /// Rejected density in kilograms per cubic metre.
        density: f64,
    },
}

/// Error returned when procedural beam geometry cannot be constructed.
///
/// Bad geometry is never fatal to a tick; callers skip the rebake for that
/// entity and keep its previous mesh.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum MeshError {
    /// Returned when a beam dimension is zero, negative or non-finite.
    #[error("degenerate beam dimensions {width} x {height} x {depth}")]
    DegenerateDimensions {
        /// Span of the beam along X in metres.
        width: f64,
        /// Height of the cross-section in metres.
        height: f64,
        /// Depth of the cross-section in metres.
        depth: f64,
    },
    /// Returned when the curvature parameter is non-finite.
    #[error("beam curvature is not finite (received {0})")]
    NonFiniteCurvature(f64),
    /// Returned when too few cross-sections are requested to form a beam.
    #[error("at least 2 segments are required to mesh a beam (received {0})")]
    TooFewSegments(usize),
}

/// Error returned when stress evaluation meets degenerate geometry.
///
/// Entity extents come from host meshes and can collapse; the cross-section
/// and second moment of area are divisors, so evaluation refuses to divide
/// by them and lets the tick skip the entity instead.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum StressError {
    /// Returned when an entity extent is zero, negative or non-finite.
    #[error("degenerate entity extents {width} x {height} x {depth}")]
    DegenerateExtents {
        /// Entity width (X) in metres.
        width: f64,
        /// Entity height (Y) in metres.
        height: f64,
        /// Entity depth (Z) in metres.
        depth: f64,
    },
}
