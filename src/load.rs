//! Contact-driven load accumulation.
//!
//! A thin probe volume above each entity detects the neighbours resting on
//! it; every neighbour with physics state contributes its static weight and
//! a kinetic impact term. The query is pure: it reads current-frame state
//! and mutates nothing.

use std::collections::HashSet;

use log::trace;
use petgraph::graph::NodeIndex;

use crate::errors::SceneEditError;
use crate::scene::Scene;
use crate::sim::TickContext;

/// Weight-plus-impact contribution of a single resting body in newtons.
///
/// `mass * (-gravity)` is the static term; `velocity_y^2 * mass / 2` adds
/// impact pressure from a body arriving with vertical speed.
#[must_use]
fn contribution(mass: f64, vertical_velocity: f64, gravity: f64) -> f64 {
    mass * (-gravity) + vertical_velocity * vertical_velocity * mass / 2.0
}

/// Sum the loads pressing down on an entity from direct contact.
///
/// Constructs the entity's load probe (a slab `ctx.probe_epsilon` metres
/// tall above its top face) and accumulates the contribution of every other
/// entity whose world bounding box intersects it. Neighbours without
/// physics state are skipped silently; with no neighbours the load is 0.
///
/// # Errors
///
/// Returns [`SceneEditError::UnknownEntity`] when `entity` is not part of
/// the scene.
pub fn compute_load(
    scene: &Scene,
    entity: NodeIndex,
    ctx: &TickContext,
) -> Result<f64, SceneEditError> {
    let mut visited = HashSet::new();
    accumulate(scene, entity, ctx, false, &mut visited)
}

/// Sum loads as [`compute_load`] does, but recurse through contributors.
///
/// Each neighbour that contributes load is itself probed, so a stack of
/// blocks propagates its full weight down to the base. A visited set keeps
/// mutually resting bodies from being counted twice or looping forever.
/// This is the optional propagation extension point; the tick pipeline uses
/// the non-recursive form.
///
/// # Errors
///
/// Returns [`SceneEditError::UnknownEntity`] when `entity` is not part of
/// the scene.
pub fn compute_load_recursive(
    scene: &Scene,
    entity: NodeIndex,
    ctx: &TickContext,
) -> Result<f64, SceneEditError> {
    let mut visited = HashSet::new();
    accumulate(scene, entity, ctx, true, &mut visited)
}

/// Shared accumulation walk over the probe contacts of `entity`.
fn accumulate(
    scene: &Scene,
    entity: NodeIndex,
    ctx: &TickContext,
    recursive: bool,
    visited: &mut HashSet<NodeIndex>,
) -> Result<f64, SceneEditError> {
    let target = scene
        .entity(entity)
        .ok_or(SceneEditError::UnknownEntity(entity))?;
    visited.insert(entity);

    let probe = target.world_aabb().load_probe(ctx.probe_epsilon);
    let mut total = 0.0;
    for (index, neighbour) in scene.entities() {
        if index == entity || visited.contains(&index) {
            continue;
        }
        if !neighbour.world_aabb().intersects(&probe) {
            continue;
        }
        let Some(physics) = neighbour.physics else {
            // Missing physics data is not fatal; the body just carries no load.
            trace!("skipping load contribution from {:?}: no physics state", index);
            continue;
        };
        total += contribution(physics.mass, physics.velocity.y, ctx.gravity);
        if recursive {
            total += accumulate(scene, index, ctx, true, visited)?;
        }
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    use super::*;
    use crate::entity::{PhysicsState, StructuralEntity};
    use crate::geometry::extents;
    use crate::material::MaterialKind;

    fn block_at(y: f64, mass: f64, vertical_velocity: f64) -> StructuralEntity {
        let mut entity = StructuralEntity::block(
            "crate",
            Vector3::new(0.0, y, 0.0),
            extents(0.2, 0.2, 0.2),
            MaterialKind::Stone,
        );
        entity.physics = Some(PhysicsState {
            mass,
            velocity: Vector3::new(0.0, vertical_velocity, 0.0),
        });
        entity
    }

    fn test_ctx() -> TickContext {
        TickContext {
            gravity: 9.81,
            ..TickContext::default()
        }
    }

    #[test]
    fn no_neighbours_means_no_load() {
        let mut scene = Scene::new();
        let lone = scene.add_entity(block_at(0.0, 3.0, 0.0));
        let load = compute_load(&scene, lone, &test_ctx()).expect("load computed");
        assert_eq!(load, 0.0);
    }

    #[test]
    fn resting_neighbour_contributes_weight_and_impact() {
        let mut scene = Scene::new();
        let base = scene.add_entity(block_at(0.0, 3.0, 0.0));
        scene.add_entity(block_at(0.2, 2.0, -0.4));

        let load = compute_load(&scene, base, &test_ctx()).expect("load computed");
        let expected = 2.0 * (-9.81) + 0.4 * 0.4 * 2.0 / 2.0;
        assert_relative_eq!(load, expected, epsilon = 1.0e-12);
    }

    #[test]
    fn non_overlapping_neighbour_contributes_nothing() {
        let mut scene = Scene::new();
        let base = scene.add_entity(block_at(0.0, 3.0, 0.0));
        scene.add_entity(block_at(5.0, 2.0, 0.0));

        let load = compute_load(&scene, base, &test_ctx()).expect("load computed");
        assert_eq!(load, 0.0);
    }

    #[test]
    fn neighbour_without_physics_is_skipped() {
        let mut scene = Scene::new();
        let base = scene.add_entity(block_at(0.0, 3.0, 0.0));
        let mut ghost = block_at(0.2, 2.0, 0.0);
        ghost.physics = None;
        scene.add_entity(ghost);

        let load = compute_load(&scene, base, &test_ctx()).expect("load computed");
        assert_eq!(load, 0.0);
    }

    #[test]
    fn recursion_propagates_through_a_stack() {
        let mut scene = Scene::new();
        let base = scene.add_entity(block_at(0.0, 3.0, 0.0));
        scene.add_entity(block_at(0.2, 2.0, 0.0));
        scene.add_entity(block_at(0.4, 1.0, 0.0));

        let ctx = test_ctx();
        let direct = compute_load(&scene, base, &ctx).expect("load computed");
        assert_relative_eq!(direct, 2.0 * -9.81, epsilon = 1.0e-12);

        let propagated = compute_load_recursive(&scene, base, &ctx).expect("load computed");
        assert_relative_eq!(propagated, 3.0 * -9.81, epsilon = 1.0e-12);
    }

    #[test]
    fn unknown_entity_is_rejected() {
        let scene = Scene::new();
        let error =
            compute_load(&scene, NodeIndex::new(3), &test_ctx()).expect_err("unknown rejected");
        assert_eq!(error, SceneEditError::UnknownEntity(NodeIndex::new(3)));
    }
}
