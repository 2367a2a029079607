//! Perspective camera with attached backdrop nodes

use glam::{Mat4, Vec3};

use super::node::SceneNode;

/// Perspective camera.
///
/// Orientation is kept as a forward direction; `look_at` re-aims it, and
/// leaving it alone keeps the current heading (the chase camera relies on that).
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub forward: Vec3,
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Nodes that move with the camera (positions are camera-relative)
    pub attachments: Vec<SceneNode>,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    /// Camera at the game's start pose: behind and above the origin, looking at it
    pub fn new() -> Self {
        let mut camera = Self {
            position: Vec3::new(0.0, 2.0, 5.5),
            forward: Vec3::NEG_Z,
            fov_y: 75f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
            attachments: Vec::new(),
        };
        camera.look_at(Vec3::ZERO);
        camera
    }

    /// Aim the camera at a world-space point
    pub fn look_at(&mut self, target: Vec3) {
        let dir = (target - self.position).normalize_or_zero();
        if dir != Vec3::ZERO {
            self.forward = dir;
        }
    }

    /// Attach a node that should follow the camera
    pub fn attach(&mut self, node: SceneNode) {
        self.attachments.push(node);
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World transform for camera-attached nodes
    pub fn world_matrix(&self) -> Mat4 {
        self.view_matrix().inverse()
    }
}
