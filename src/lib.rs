#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]
#![doc = include_str!("../README.md")]

mod color;
mod entity;
mod errors;
mod geometry;
mod load;
mod material;
mod mesh;
mod scene;
mod sim;
mod stress;

pub use color::{load_color, multi_lerp, Color, LOAD_GRADIENT};
pub use entity::{EntityRole, PhysicsState, StructuralEntity};
pub use errors::{CatalogError, MeshError, SceneEditError, StressError};
pub use geometry::{extents, Aabb};
pub use load::{compute_load, compute_load_recursive};
pub use material::{
    MaterialCatalog, MaterialCost, MaterialKind, MaterialProperties, MechanicalProperties,
    ThermalProperties,
};
pub use mesh::{box_beam, curved_beam, BeamMesh};
pub use scene::{Joint, Scene};
pub use sim::{run_tick, SkipReason, TickContext, TickEvent};
pub use stress::{evaluate, StressReport};
