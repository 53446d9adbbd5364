//! Beam-theory stress and deflection evaluation.
//!
//! Loads become three numbers per entity: a compressive stress ratio, a
//! bending stress ratio and a physical midspan sag. The formulas are the
//! classic simply-supported-beam results for a centre point load; see
//! <https://en.wikipedia.org/wiki/Deflection_(engineering)>.

use nalgebra::Vector3;

use crate::errors::StressError;
use crate::material::MechanicalProperties;

/// Outcome of evaluating one entity under an applied force.
///
/// Pure function of the inputs; nothing is cached between ticks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StressReport {
    /// Ratio of applied force to the section's compressive capacity,
    /// clamped into `[0, 1]`.
    pub compressive_coeff: f64,
    /// Ratio of extreme-fibre bending stress to the elastic modulus,
    /// clamped into `[0, 1]`.
    pub bending_coeff: f64,
    /// Midspan deflection in metres; signed like the applied force.
    pub deflection: f64,
}

/// Evaluate compressive stress, bending stress and deflection.
///
/// `extents` follow the entity convention: width along X, height along Y,
/// depth along Z. The depth doubles as the bending span. The bending ratio
/// divides by the elastic modulus, not the flexural strength, so it reads
/// as a normalized stiffness ratio rather than a strength check.
///
/// # Errors
///
/// Returns [`StressError::DegenerateExtents`] when any extent is zero,
/// negative or non-finite. The cross-sectional area and second moment of
/// area are divisors, so collapsed host geometry must not reach the
/// formulas.
pub fn evaluate(
    extents: Vector3<f64>,
    mechanical: &MechanicalProperties,
    force: f64,
) -> Result<StressReport, StressError> {
    let width = extents.x;
    let height = extents.y;
    let depth = extents.z;
    let extents_valid = [width, height, depth]
        .iter()
        .all(|d| d.is_finite() && *d > 0.0);
    if !extents_valid {
        return Err(StressError::DegenerateExtents {
            width,
            height,
            depth,
        });
    }

    // Compression across the horizontal cross-section.
    let area = depth * width;
    let max_compressive_load = mechanical.compressive_strength * area;
    let compressive_coeff = (force / max_compressive_load).abs().clamp(0.0, 1.0);

    // Second moment of area for the rectangular section.
    let second_moment = height * height * height * width / 12.0;

    // Midspan deflection under a centre point load on a simply supported span.
    let elastic_modulus = mechanical.elastic_modulus;
    let deflection =
        (force * depth * depth * depth) / (48.0 * elastic_modulus * second_moment);

    // Extreme-fibre bending stress at midspan.
    let bending_moment = force * depth / 4.0;
    let fibre_distance = height / 2.0;
    let bending_stress = (bending_moment * fibre_distance / second_moment).abs();
    let bending_coeff = (bending_stress / elastic_modulus).clamp(0.0, 1.0);

    Ok(StressReport {
        compressive_coeff,
        bending_coeff,
        deflection,
    })
}
