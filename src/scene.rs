//! Scene graph ownership and joint attachments.

use std::collections::HashSet;

use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::stable_graph::StableGraph;

use crate::entity::StructuralEntity;
use crate::errors::SceneEditError;

/// Marker weight for a directed attachment between two entities.
///
/// A joint edge from `a` to `b` records that `a` is physically attached to
/// `b`, forming the load-bearing chains walked by
/// [`Scene::attached_mass`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Joint;

/// Container owning every structural entity in the simulation.
///
/// Entities are graph nodes; joint attachments are directed edges. All
/// cross-entity references are [`NodeIndex`] handles. Storage is a stable
/// graph so that removing an entity (a beam split, for example) never
/// renumbers the handles of the entities that remain — the failure engine
/// defers removals to the end of the tick and applies them in a batch.
#[derive(Debug, Default)]
pub struct Scene {
    /// Underlying graph storage for entities and joints.
    graph: StableGraph<StructuralEntity, Joint>,
}

impl Scene {
    /// Create an empty scene.
    ///
    /// # Examples
    /// ```
    /// use beambox::Scene;
    ///
    /// let scene = Scene::new();
    /// assert_eq!(scene.entity_count(), 0);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: StableGraph::new(),
        }
    }

    /// Return the number of entities in the scene.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of joint attachments in the scene.
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Add a new entity to the scene, returning its handle.
    pub fn add_entity(&mut self, entity: StructuralEntity) -> NodeIndex {
        self.graph.add_node(entity)
    }

    /// Remove an entity and all of its joints, returning the entity.
    ///
    /// # Errors
    ///
    /// Returns [`SceneEditError::UnknownEntity`] when `entity` is not part
    /// of this scene.
    pub fn remove_entity(
        &mut self,
        entity: NodeIndex,
    ) -> Result<StructuralEntity, SceneEditError> {
        self.graph
            .remove_node(entity)
            .ok_or(SceneEditError::UnknownEntity(entity))
    }

    /// Attach one entity to another with a directed joint.
    ///
    /// # Errors
    ///
    /// Returns [`SceneEditError::UnknownEntity`] when either endpoint is
    /// not part of this scene.
    pub fn attach(
        &mut self,
        from: NodeIndex,
        to: NodeIndex,
    ) -> Result<EdgeIndex, SceneEditError> {
        for endpoint in [from, to] {
            if self.graph.node_weight(endpoint).is_none() {
                return Err(SceneEditError::UnknownEntity(endpoint));
            }
        }
        Ok(self.graph.add_edge(from, to, Joint))
    }

    /// Remove a joint attachment.
    ///
    /// # Errors
    ///
    /// Returns [`SceneEditError::UnknownJoint`] when `joint` is not part of
    /// this scene.
    pub fn detach(&mut self, joint: EdgeIndex) -> Result<(), SceneEditError> {
        self.graph
            .remove_edge(joint)
            .map(|_| ())
            .ok_or(SceneEditError::UnknownJoint(joint))
    }

    /// Borrow an entity by handle.
    #[must_use]
    pub fn entity(&self, entity: NodeIndex) -> Option<&StructuralEntity> {
        self.graph.node_weight(entity)
    }

    /// Mutably borrow an entity by handle.
    pub fn entity_mut(&mut self, entity: NodeIndex) -> Option<&mut StructuralEntity> {
        self.graph.node_weight_mut(entity)
    }

    /// Iterate over entity handles in stable index order.
    pub fn entity_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// Iterate over entities with their handles in stable index order.
    pub fn entities(&self) -> impl Iterator<Item = (NodeIndex, &StructuralEntity)> {
        self.graph
            .node_indices()
            .filter_map(|index| self.graph.node_weight(index).map(|entity| (index, entity)))
    }

    /// Total mass attached to an entity through its joint chain.
    ///
    /// Walks outgoing joints depth-first, summing the mass of every
    /// reachable body (excluding the starting entity and any body without
    /// physics state). A visited set guards against attachment cycles, which
    /// hosts can create freely.
    ///
    /// # Errors
    ///
    /// Returns [`SceneEditError::UnknownEntity`] when `entity` is not part
    /// of this scene.
    pub fn attached_mass(&self, entity: NodeIndex) -> Result<f64, SceneEditError> {
        if self.graph.node_weight(entity).is_none() {
            return Err(SceneEditError::UnknownEntity(entity));
        }
        let mut visited: HashSet<NodeIndex> = HashSet::new();
        visited.insert(entity);
        let mut stack: Vec<NodeIndex> = self.graph.neighbors(entity).collect();
        let mut total = 0.0;
        while let Some(next) = stack.pop() {
            if !visited.insert(next) {
                continue;
            }
            if let Some(body) = self.graph.node_weight(next) {
                if let Some(physics) = body.physics {
                    total += physics.mass;
                }
                stack.extend(self.graph.neighbors(next));
            }
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::Vector3;

    use super::*;
    use crate::entity::PhysicsState;
    use crate::geometry::extents;
    use crate::material::MaterialKind;

    fn block(name: &str, mass: f64) -> StructuralEntity {
        let mut entity = StructuralEntity::block(
            name,
            Vector3::zeros(),
            extents(0.1, 0.1, 0.1),
            MaterialKind::Wood,
        );
        entity.physics = Some(PhysicsState::at_rest(mass));
        entity
    }

    #[test]
    fn edit_operations_reject_unknown_indices() {
        let mut scene = Scene::new();
        let stale = scene.add_entity(block("a", 1.0));
        scene.remove_entity(stale).expect("initial removal succeeds");

        let error = scene.remove_entity(stale).expect_err("stale entity rejected");
        assert_eq!(error, SceneEditError::UnknownEntity(stale));

        let error = scene.attached_mass(stale).expect_err("stale entity rejected");
        assert_eq!(error, SceneEditError::UnknownEntity(stale));

        let kept = scene.add_entity(block("b", 1.0));
        let foreign = NodeIndex::new(42);
        let error = scene
            .attach(kept, foreign)
            .expect_err("unknown endpoint rejected");
        assert_eq!(error, SceneEditError::UnknownEntity(foreign));

        let error = scene
            .detach(EdgeIndex::new(7))
            .expect_err("unknown joint rejected");
        assert_eq!(error, SceneEditError::UnknownJoint(EdgeIndex::new(7)));
    }

    #[test]
    fn attached_mass_sums_the_chain() {
        let mut scene = Scene::new();
        let anchor = scene.add_entity(block("anchor", 5.0));
        let middle = scene.add_entity(block("middle", 2.0));
        let end = scene.add_entity(block("end", 1.5));
        scene.attach(anchor, middle).expect("attach succeeds");
        scene.attach(middle, end).expect("attach succeeds");

        let mass = scene.attached_mass(anchor).expect("walk succeeds");
        assert!((mass - 3.5).abs() < f64::EPSILON);

        // The walk follows joint direction, so the end link carries nothing.
        let mass = scene.attached_mass(end).expect("walk succeeds");
        assert_eq!(mass, 0.0);
    }

    #[test]
    fn attached_mass_skips_bodies_without_physics() {
        let mut scene = Scene::new();
        let anchor = scene.add_entity(block("anchor", 5.0));
        let ghost = scene.add_entity(StructuralEntity::block(
            "ghost",
            Vector3::zeros(),
            extents(0.1, 0.1, 0.1),
            MaterialKind::Debug,
        ));
        let end = scene.add_entity(block("end", 2.0));
        scene.attach(anchor, ghost).expect("attach succeeds");
        scene.attach(ghost, end).expect("attach succeeds");

        let mass = scene.attached_mass(anchor).expect("walk succeeds");
        assert!((mass - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn attached_mass_terminates_on_cycles() {
        let mut scene = Scene::new();
        let a = scene.add_entity(block("a", 1.0));
        let b = scene.add_entity(block("b", 2.0));
        scene.attach(a, b).expect("attach succeeds");
        scene.attach(b, a).expect("attach succeeds");

        let mass = scene.attached_mass(a).expect("cycle walk terminates");
        assert!((mass - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn removing_an_entity_drops_its_joints() {
        let mut scene = Scene::new();
        let a = scene.add_entity(block("a", 1.0));
        let b = scene.add_entity(block("b", 2.0));
        scene.attach(a, b).expect("attach succeeds");
        assert_eq!(scene.joint_count(), 1);

        scene.remove_entity(b).expect("removal succeeds");
        assert_eq!(scene.joint_count(), 0);
    }
}
