//! The per-tick structural evaluation pipeline.
//!
//! Once per host scene update, every entity runs through the same
//! sequence: accumulate contact loads, evaluate stress and deflection,
//! apply the structural response (beam sag remesh, or a split on bending
//! failure), and recolor. Scene mutations queue during the traversal and
//! apply at the end of the tick, so the contact queries always see a
//! consistent snapshot. A problem with one entity is logged and skipped;
//! it never aborts the remaining entities.

use log::{debug, warn};
use nalgebra::Vector3;
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

use crate::color::{load_color, Color};
use crate::entity::{PhysicsState, StructuralEntity};
use crate::errors::{MeshError, StressError};
use crate::load::compute_load;
use crate::material::{MaterialCatalog, MaterialKind};
use crate::mesh::{box_beam, curved_beam};
use crate::scene::Scene;
use crate::stress::evaluate;

/// Per-tick configuration, passed explicitly instead of shared state.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TickContext {
    /// Gravitational acceleration in metres per second squared. The host
    /// exposes this as a user-adjustable value in `0..=20`.
    pub gravity: f64,
    /// When set, entity tints show the stress gradient instead of the
    /// material color.
    pub load_visuals: bool,
    /// Height of the load probe volume above each entity, metres.
    pub probe_epsilon: f64,
    /// Cross-section count used when rebaking beam meshes.
    pub beam_segments: usize,
}

impl Default for TickContext {
    fn default() -> Self {
        Self {
            gravity: 9.81,
            load_visuals: false,
            probe_epsilon: 0.003,
            beam_segments: 30,
        }
    }
}

/// Reason an entity was left unevaluated for one tick.
#[derive(Clone, Debug, PartialEq)]
pub enum SkipReason {
    /// The material catalog has no entry for the entity's material.
    UnknownMaterial(MaterialKind),
    /// The entity's extents cannot support stress evaluation.
    DegenerateGeometry(StressError),
}

/// One observable outcome of a tick, in emission order.
///
/// Hosts mirror these onto their own scene representation: tint changes,
/// mesh replacements and entity set mutations are the only outputs of the
/// simulation.
#[derive(Clone, Debug, PartialEq)]
pub enum TickEvent {
    /// A beam's mesh was regenerated with a new sag.
    Remeshed {
        /// The rebaked beam.
        entity: NodeIndex,
        /// Midspan deflection baked into the mesh, metres.
        deflection: f64,
    },
    /// A beam's rebake failed; its previous mesh was kept.
    RemeshFailed {
        /// The beam that kept its old mesh.
        entity: NodeIndex,
        /// Why geometry generation failed.
        error: MeshError,
    },
    /// A beam exceeded its bending limit and was replaced by two halves.
    Split {
        /// The removed beam.
        removed: NodeIndex,
        /// The two half-span replacements.
        halves: [NodeIndex; 2],
    },
    /// An entity exceeded its compressive capacity.
    ///
    /// No structural response is defined for compressive overload yet; the
    /// event makes the condition observable instead of silently ignored.
    CompressiveOverload {
        /// The overloaded entity.
        entity: NodeIndex,
        /// The saturated compressive coefficient.
        coefficient: f64,
    },
    /// An entity's tint changed.
    Recolored {
        /// The recolored entity.
        entity: NodeIndex,
        /// The new tint.
        tint: Color,
    },
    /// An entity was skipped for this tick.
    Skipped {
        /// The skipped entity.
        entity: NodeIndex,
        /// Why it was skipped.
        reason: SkipReason,
    },
}

/// Advance the structural simulation by one tick.
///
/// Runs the accumulate → evaluate → respond → recolor pipeline over every
/// entity, then applies any queued beam splits. Returns the events the host
/// needs to mirror; the order within the returned vector follows entity
/// index order, with split applications last.
pub fn run_tick(scene: &mut Scene, catalog: &MaterialCatalog, ctx: &TickContext) -> Vec<TickEvent> {
    let mut events = Vec::new();
    let mut pending_splits: Vec<NodeIndex> = Vec::new();

    let indices: Vec<NodeIndex> = scene.entity_indices().collect();
    for index in indices {
        let Some(entity) = scene.entity(index) else {
            continue;
        };
        let kind = entity.material;
        let extents = entity.extents;
        let is_beam = entity.is_beam();

        let Some(properties) = catalog.get(kind) else {
            warn!("entity {index:?} uses {kind:?} which is missing from the catalog");
            events.push(TickEvent::Skipped {
                entity: index,
                reason: SkipReason::UnknownMaterial(kind),
            });
            continue;
        };
        let material_tint = properties.tint;

        let force = match compute_load(scene, index, ctx) {
            Ok(force) => force,
            // The index came from this scene moments ago; a miss here means
            // it was removed concurrently, which the tick does not allow.
            Err(error) => {
                warn!("load accumulation failed for {index:?}: {error}");
                continue;
            }
        };

        let report = match evaluate(extents, &properties.mechanical, force) {
            Ok(report) => report,
            Err(error) => {
                warn!("skipping {index:?} for this tick: {error}");
                events.push(TickEvent::Skipped {
                    entity: index,
                    reason: SkipReason::DegenerateGeometry(error),
                });
                continue;
            }
        };
        debug!(
            "entity {index:?}: force {force:.3} N, compressive {:.4}, bending {:.6}, deflection {:.6} m",
            report.compressive_coeff, report.bending_coeff, report.deflection
        );

        if is_beam {
            match curved_beam(
                extents.x,
                extents.y,
                extents.z,
                report.deflection,
                ctx.beam_segments,
            ) {
                Ok(mesh) => {
                    if let Some(entity) = scene.entity_mut(index) {
                        entity.mesh = Some(mesh);
                        entity.sag = report.deflection;
                    }
                    events.push(TickEvent::Remeshed {
                        entity: index,
                        deflection: report.deflection,
                    });
                }
                Err(error) => {
                    warn!("beam rebake failed for {index:?}, keeping previous mesh: {error}");
                    events.push(TickEvent::RemeshFailed {
                        entity: index,
                        error,
                    });
                }
            }
        }

        if report.bending_coeff >= 1.0 && is_beam {
            pending_splits.push(index);
        } else if report.compressive_coeff >= 1.0 {
            warn!(
                "entity {index:?} exceeds compressive capacity (coefficient {:.3})",
                report.compressive_coeff
            );
            events.push(TickEvent::CompressiveOverload {
                entity: index,
                coefficient: report.compressive_coeff,
            });
        }

        // Beams indicate bending stress, everything else compression.
        let coefficient = if is_beam {
            report.bending_coeff
        } else {
            report.compressive_coeff
        };
        let tint = if ctx.load_visuals {
            load_color(coefficient)
        } else {
            material_tint
        };
        if let Some(entity) = scene.entity_mut(index) {
            if entity.tint != tint {
                entity.tint = tint;
                events.push(TickEvent::Recolored {
                    entity: index,
                    tint,
                });
            }
        }
    }

    for index in pending_splits {
        if let Some(event) = apply_split(scene, catalog, index) {
            events.push(event);
        }
    }

    events
}

/// Replace an overstressed beam with two half-span entities.
///
/// The halves share the original's material, take half its span and half
/// its mass, and sit at `±width/4` from the original centre along the span
/// axis so their combined footprint equals the original's.
fn apply_split(
    scene: &mut Scene,
    catalog: &MaterialCatalog,
    index: NodeIndex,
) -> Option<TickEvent> {
    let beam = match scene.remove_entity(index) {
        Ok(beam) => beam,
        Err(error) => {
            warn!("split of {index:?} abandoned: {error}");
            return None;
        }
    };
    warn!(
        "beam {:?} ({}) failed in bending; splitting",
        index, beam.name
    );

    let half_extents = Vector3::new(beam.extents.x / 2.0, beam.extents.y, beam.extents.z);
    let offset = Vector3::new(beam.extents.x / 4.0, 0.0, 0.0);
    let half_mass = beam.physics.map(|physics| physics.mass / 2.0);
    let tint = catalog
        .get(beam.material)
        .map_or(Color::CLEAR, |properties| properties.tint);

    let mut halves = Vec::with_capacity(2);
    for (suffix, position) in [("a", beam.position - offset), ("b", beam.position + offset)] {
        let mut half = StructuralEntity::block(
            format!("{}.{}", beam.name, suffix),
            position,
            half_extents,
            beam.material,
        );
        // Fresh bodies start at rest; the host physics layer takes over.
        half.physics = half_mass.map(PhysicsState::at_rest);
        half.tint = tint;
        match box_beam(half_extents.x, half_extents.y, half_extents.z) {
            Ok(mesh) => half.mesh = Some(mesh),
            Err(error) => warn!("split half mesh generation failed: {error}"),
        }
        halves.push(scene.add_entity(half));
    }

    Some(TickEvent::Split {
        removed: index,
        halves: [halves[0], halves[1]],
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    use super::*;
    use crate::entity::EntityRole;
    use crate::geometry::extents;

    fn wood_beam(position: Vector3<f64>, mass: f64) -> StructuralEntity {
        let mut beam = StructuralEntity::beam(
            "beam",
            position,
            extents(0.5, 0.01, 0.1),
            MaterialKind::Wood,
        );
        beam.physics = Some(PhysicsState::at_rest(mass));
        beam
    }

    fn stone_block(position: Vector3<f64>, mass: f64) -> StructuralEntity {
        let mut block = StructuralEntity::block(
            "crate",
            position,
            extents(0.1, 0.1, 0.1),
            MaterialKind::Stone,
        );
        block.physics = Some(PhysicsState::at_rest(mass));
        block
    }

    #[test]
    fn unloaded_beam_is_remeshed_flat() {
        let catalog = MaterialCatalog::builtin();
        let mut scene = Scene::new();
        let beam = scene.add_entity(wood_beam(Vector3::zeros(), 0.3));

        let events = run_tick(&mut scene, &catalog, &TickContext::default());

        assert!(events.contains(&TickEvent::Remeshed {
            entity: beam,
            deflection: 0.0,
        }));
        let entity = scene.entity(beam).expect("beam still present");
        assert_eq!(entity.sag, 0.0);
        assert_eq!(entity.mesh.as_ref().expect("mesh baked").vertex_count(), 120);
    }

    #[test]
    fn loaded_beam_sags() {
        let catalog = MaterialCatalog::builtin();
        let mut scene = Scene::new();
        let beam = scene.add_entity(wood_beam(Vector3::new(0.0, 1.0, 0.0), 0.3));
        scene.add_entity(stone_block(Vector3::new(0.0, 1.055, 0.0), 2.0));

        let ctx = TickContext::default();
        run_tick(&mut scene, &catalog, &ctx);

        let entity = scene.entity(beam).expect("beam still present");
        // Downward force, so the signed deflection is negative.
        assert!(entity.sag < 0.0);
    }

    #[test]
    fn load_visuals_toggle_controls_tint() {
        let catalog = MaterialCatalog::builtin();
        let mut scene = Scene::new();
        let block = scene.add_entity(stone_block(Vector3::zeros(), 2.0));

        let mut ctx = TickContext::default();
        run_tick(&mut scene, &catalog, &ctx);
        let material_tint = catalog
            .get(MaterialKind::Stone)
            .expect("stone present")
            .tint;
        assert_eq!(scene.entity(block).expect("present").tint, material_tint);

        ctx.load_visuals = true;
        run_tick(&mut scene, &catalog, &ctx);
        // Unloaded block sits at the relaxed end of the gradient.
        assert_eq!(scene.entity(block).expect("present").tint, Color::GREEN);
    }

    #[test]
    fn overloaded_beam_splits_into_halves() {
        let catalog = MaterialCatalog::builtin();
        let mut scene = Scene::new();
        let beam = scene.add_entity(wood_beam(Vector3::new(0.0, 1.0, 0.0), 0.3));
        // A slab heavy enough to push the bending coefficient past 1.
        let mut slab = stone_block(Vector3::new(0.0, 1.055, 0.0), 2.0);
        slab.physics = Some(PhysicsState::at_rest(5.0e6));
        scene.add_entity(slab);

        let events = run_tick(&mut scene, &catalog, &TickContext::default());

        let split = events
            .iter()
            .find_map(|event| match event {
                TickEvent::Split { removed, halves } if *removed == beam => Some(*halves),
                _ => None,
            })
            .expect("beam split");
        assert!(scene.entity(beam).is_none());

        let [a, b] = split;
        let half_a = scene.entity(a).expect("first half present");
        let half_b = scene.entity(b).expect("second half present");
        assert_relative_eq!(half_a.extents.x + half_b.extents.x, 0.5);
        assert_relative_eq!(half_a.position.x, -0.125);
        assert_relative_eq!(half_b.position.x, 0.125);
        assert_eq!(half_a.position.y, 1.0);
        assert_eq!(half_a.material, MaterialKind::Wood);
        assert_eq!(half_a.role, EntityRole::Generic);
        assert_relative_eq!(half_a.physics.expect("physics carried").mass, 0.15);
    }

    #[test]
    fn compressive_overload_is_reported_not_destroyed() {
        let catalog = MaterialCatalog::builtin();
        let mut scene = Scene::new();
        // Debug material has unit compressive strength, so any real load
        // saturates the coefficient.
        let mut weak = StructuralEntity::block(
            "weak",
            Vector3::zeros(),
            extents(0.1, 0.1, 0.1),
            MaterialKind::Debug,
        );
        weak.physics = Some(PhysicsState::at_rest(1.0));
        let weak = scene.add_entity(weak);
        scene.add_entity(stone_block(Vector3::new(0.0, 0.1, 0.0), 50.0));

        let events = run_tick(&mut scene, &catalog, &TickContext::default());

        assert!(events.iter().any(|event| matches!(
            event,
            TickEvent::CompressiveOverload { entity, coefficient }
                if *entity == weak && *coefficient >= 1.0
        )));
        assert!(scene.entity(weak).is_some());
    }

    #[test]
    fn degenerate_entity_is_skipped_without_aborting_the_tick() {
        let catalog = MaterialCatalog::builtin();
        let mut scene = Scene::new();
        let mut flat = stone_block(Vector3::new(5.0, 0.0, 0.0), 1.0);
        flat.extents = extents(0.1, 0.0, 0.1);
        let flat = scene.add_entity(flat);
        let healthy = scene.add_entity(wood_beam(Vector3::zeros(), 0.3));

        let events = run_tick(&mut scene, &catalog, &TickContext::default());

        assert!(events.iter().any(|event| matches!(
            event,
            TickEvent::Skipped {
                entity,
                reason: SkipReason::DegenerateGeometry(_),
            } if *entity == flat
        )));
        // The healthy beam still ran its full pipeline.
        assert!(events
            .iter()
            .any(|event| matches!(event, TickEvent::Remeshed { entity, .. } if *entity == healthy)));
    }

    #[test]
    fn recolor_events_fire_only_on_change() {
        let catalog = MaterialCatalog::builtin();
        let mut scene = Scene::new();
        let block = scene.add_entity(stone_block(Vector3::zeros(), 2.0));

        let ctx = TickContext::default();
        let first = run_tick(&mut scene, &catalog, &ctx);
        assert!(first
            .iter()
            .any(|event| matches!(event, TickEvent::Recolored { entity, .. } if *entity == block)));

        let second = run_tick(&mut scene, &catalog, &ctx);
        assert!(!second
            .iter()
            .any(|event| matches!(event, TickEvent::Recolored { .. })));
    }
}
