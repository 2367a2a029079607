//! Scene nodes
//!
//! Just enough of a scene graph for the game core: typed nodes with a local
//! transform, optional local-space bounds and owned children. Nodes get a
//! fresh `NodeId` whenever a prototype is instantiated, so ids stay unique
//! within a session and can be used as back-references.

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::bounds::Aabb;
use crate::renderer::shapes::MeshData;

/// Stable identity of a node within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// Hands out node ids
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeIds {
    next: u32,
}

impl Default for NodeIds {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeIds {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }
}

/// Position of a node relative to some root, as child indices
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodePath(pub Vec<usize>);

/// Local transform (translation, rotation, scale)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub const fn identity() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::identity()
        }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    /// Rotate about the local Y axis
    pub fn rotate_y(&mut self, angle: f32) {
        self.rotate_on_axis(Vec3::Y, angle);
    }

    /// Rotate about a local axis (post-multiplied onto the current rotation)
    pub fn rotate_on_axis(&mut self, axis: Vec3, angle: f32) {
        self.rotation = (self.rotation * Quat::from_axis_angle(axis, angle)).normalize();
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// What a node draws (or doesn't)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Pure container
    Group,
    /// Imported mesh; its extents live in `SceneNode::bounds`
    Mesh,
    /// Flat rectangle in the local XY plane
    Plane { width: f32, height: f32, color: u32 },
    /// Point light
    PointLight { color: u32, intensity: f32, range: f32 },
    /// Geometry generated at runtime
    Geometry(MeshData),
}

/// A node in the scene tree. Children are owned exclusively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    pub transform: Transform,
    /// Local-space extents of this node's own geometry (children excluded)
    pub bounds: Option<Aabb>,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn new(id: NodeId, name: impl Into<String>, kind: NodeKind) -> Self {
        let bounds = match &kind {
            NodeKind::Plane { width, height, .. } => Some(Aabb::new(
                Vec3::new(-width / 2.0, -height / 2.0, 0.0),
                Vec3::new(width / 2.0, height / 2.0, 0.0),
            )),
            NodeKind::Geometry(mesh) => Some(mesh.bounds()),
            _ => None,
        };
        Self {
            id,
            name: name.into(),
            kind,
            transform: Transform::identity(),
            bounds,
            children: Vec::new(),
        }
    }

    /// Empty container node
    pub fn group(ids: &mut NodeIds, name: impl Into<String>) -> Self {
        Self::new(ids.next_id(), name, NodeKind::Group)
    }

    /// Mesh node with the given local extents
    pub fn mesh(ids: &mut NodeIds, name: impl Into<String>, bounds: Aabb) -> Self {
        let mut node = Self::new(ids.next_id(), name, NodeKind::Mesh);
        node.bounds = Some(bounds);
        node
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn is_mesh(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Mesh | NodeKind::Plane { .. } | NodeKind::Geometry(_)
        )
    }

    /// Deep copy with fresh ids for every node in the subtree
    pub fn instantiate(&self, ids: &mut NodeIds) -> SceneNode {
        SceneNode {
            id: ids.next_id(),
            name: self.name.clone(),
            kind: self.kind.clone(),
            transform: self.transform,
            bounds: self.bounds,
            children: self.children.iter().map(|c| c.instantiate(ids)).collect(),
        }
    }

    /// Append a child, returning its id
    pub fn add(&mut self, child: SceneNode) -> NodeId {
        let id = child.id;
        self.children.push(child);
        id
    }

    /// Detach a direct child by id
    pub fn remove(&mut self, id: NodeId) -> Option<SceneNode> {
        let index = self.children.iter().position(|c| c.id == id)?;
        Some(self.children.remove(index))
    }

    /// Direct child by id
    pub fn child(&self, id: NodeId) -> Option<&SceneNode> {
        self.children.iter().find(|c| c.id == id)
    }

    /// Depth-first pre-order walk of the subtree (self included)
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a SceneNode)) {
        f(self);
        for child in &self.children {
            child.visit(f);
        }
    }

    /// Number of nodes in the subtree (self included)
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(SceneNode::count).sum::<usize>()
    }

    /// Path to the first node (pre-order) with the given name
    pub fn find_by_name(&self, name: &str) -> Option<NodePath> {
        fn search(node: &SceneNode, name: &str, path: &mut Vec<usize>) -> bool {
            if node.name == name {
                return true;
            }
            for (i, child) in node.children.iter().enumerate() {
                path.push(i);
                if search(child, name, path) {
                    return true;
                }
                path.pop();
            }
            false
        }

        let mut path = Vec::new();
        search(self, name, &mut path).then_some(NodePath(path))
    }

    /// Path to the last mesh (pre-order) inside the subtree at `root`
    pub fn last_mesh_under(&self, root: &NodePath) -> Option<NodePath> {
        fn search(node: &SceneNode, path: &mut Vec<usize>, found: &mut Option<Vec<usize>>) {
            if node.is_mesh() {
                *found = Some(path.clone());
            }
            for (i, child) in node.children.iter().enumerate() {
                path.push(i);
                search(child, path, found);
                path.pop();
            }
        }

        let start = self.node_at(root)?;
        let mut path = root.0.clone();
        let mut found = None;
        search(start, &mut path, &mut found);
        found.map(NodePath)
    }

    pub fn node_at(&self, path: &NodePath) -> Option<&SceneNode> {
        path.0
            .iter()
            .try_fold(self, |node, &i| node.children.get(i))
    }

    pub fn node_at_mut(&mut self, path: &NodePath) -> Option<&mut SceneNode> {
        path.0
            .iter()
            .try_fold(self, |node, &i| node.children.get_mut(i))
    }

    /// Bounds of the whole subtree in the space `parent` maps into
    pub fn world_bounds(&self, parent: &Mat4) -> Aabb {
        let world = *parent * self.transform.matrix();
        let own = self
            .bounds
            .map(|b| b.transformed(&world))
            .unwrap_or(Aabb::EMPTY);
        self.children
            .iter()
            .fold(own, |acc, child| acc.union(&child.world_bounds(&world)))
    }

    /// Subtree bounds in this node's own local space (own transform ignored)
    pub fn local_bounds(&self) -> Aabb {
        let own = self.bounds.unwrap_or(Aabb::EMPTY);
        self.children.iter().fold(own, |acc, child| {
            acc.union(&child.world_bounds(&Mat4::IDENTITY))
        })
    }
}
