//! Scene substrate
//!
//! Minimal node tree, bounding boxes and camera used by the simulation.
//! Drawing is left to whatever `RenderBackend` the host plugs in.

pub mod bounds;
pub mod camera;
pub mod node;

pub use bounds::Aabb;
pub use camera::Camera;
pub use node::{NodeId, NodeIds, NodeKind, NodePath, SceneNode, Transform};
