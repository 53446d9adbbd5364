use std::error::Error;
use std::fmt::Write;

use beambox::{
    extents, run_tick, MaterialCatalog, MaterialKind, PhysicsState, Scene, StructuralEntity,
    TickContext, TickEvent,
};
use nalgebra::Vector3;

/// Demo scenario: a wood beam spans two stone pillars, and an increasingly
/// heavy slab rests on the beam until it fails in bending.
fn build_scene(scene: &mut Scene) -> petgraph::graph::NodeIndex {
    for (name, x) in [("pillar.left", -0.2), ("pillar.right", 0.2)] {
        let mut pillar = StructuralEntity::block(
            name,
            Vector3::new(x, 0.5, 0.0),
            extents(0.1, 1.0, 0.1),
            MaterialKind::Stone,
        );
        pillar.physics = Some(PhysicsState::at_rest(24.0));
        scene.add_entity(pillar);
    }

    let mut beam = StructuralEntity::beam(
        "beam",
        Vector3::new(0.0, 1.005, 0.0),
        extents(0.5, 0.01, 0.1),
        MaterialKind::Wood,
    );
    beam.physics = Some(PhysicsState::at_rest(0.3));
    scene.add_entity(beam);

    let mut slab = StructuralEntity::block(
        "slab",
        Vector3::new(0.0, 1.06, 0.0),
        extents(0.3, 0.1, 0.1),
        MaterialKind::Steel,
    );
    slab.physics = Some(PhysicsState::at_rest(10.0));
    scene.add_entity(slab)
}

/// Render one tick's events as a human-readable block.
fn render_events(tick: usize, events: &[TickEvent]) -> String {
    let mut output = String::new();
    writeln!(&mut output, "tick {tick}:").expect("writing to string cannot fail");
    for event in events {
        let line = match event {
            TickEvent::Remeshed { entity, deflection } => {
                format!("  beam {entity:?} rebaked, sag {deflection:+.3e} m")
            }
            TickEvent::RemeshFailed { entity, error } => {
                format!("  beam {entity:?} kept its mesh: {error}")
            }
            TickEvent::Split { removed, halves } => {
                format!("  beam {removed:?} split into {:?} and {:?}", halves[0], halves[1])
            }
            TickEvent::CompressiveOverload { entity, coefficient } => {
                format!("  entity {entity:?} compressive overload ({coefficient:.2})")
            }
            TickEvent::Recolored { entity, tint } => {
                format!(
                    "  entity {entity:?} tinted ({:.2}, {:.2}, {:.2})",
                    tint.r, tint.g, tint.b
                )
            }
            TickEvent::Skipped { entity, reason } => {
                format!("  entity {entity:?} skipped: {reason:?}")
            }
        };
        output.push_str(&line);
        output.push('\n');
    }
    output
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let catalog = MaterialCatalog::builtin();
    catalog.validate()?;

    let mut scene = Scene::new();
    let slab = build_scene(&mut scene);

    let ctx = TickContext {
        load_visuals: true,
        ..TickContext::default()
    };

    // Pile more mass onto the slab each tick until the beam gives way.
    for tick in 0..200 {
        if let Some(entity) = scene.entity_mut(slab) {
            if let Some(physics) = entity.physics.as_mut() {
                physics.mass *= 1.6;
            }
        }

        let events = run_tick(&mut scene, &catalog, &ctx);
        print!("{}", render_events(tick, &events));

        if events
            .iter()
            .any(|event| matches!(event, TickEvent::Split { .. }))
        {
            println!("structure failed after {} ticks", tick + 1);
            break;
        }
    }

    Ok(())
}
