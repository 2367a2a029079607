//! Rendering seam
//!
//! The simulation never draws. Each frame the session hands a `Frame` view to
//! a `RenderBackend`; hosts plug in a GPU backend, tests and the native demo
//! use `HeadlessBackend`.

pub mod shapes;
pub mod vertex;

pub use shapes::{MeshData, uv_sphere};
pub use vertex::MeshVertex;

use crate::hud::Hud;
use crate::scene::{Camera, SceneNode};

/// Everything a backend needs to draw one frame
pub struct Frame<'a> {
    /// Road segment groups (each a self-contained subtree)
    pub segments: &'a [SceneNode],
    /// The rider, already synced to the bike's transform
    pub rider: &'a SceneNode,
    pub camera: &'a Camera,
    pub hud: &'a Hud,
    /// Clear color (0xRRGGBB)
    pub background: u32,
}

impl Frame<'_> {
    /// Total node count submitted this frame
    pub fn node_count(&self) -> usize {
        self.segments.iter().map(SceneNode::count).sum::<usize>()
            + self.rider.count()
            + self
                .camera
                .attachments
                .iter()
                .map(SceneNode::count)
                .sum::<usize>()
    }
}

/// Something that can present a frame
pub trait RenderBackend {
    fn render(&mut self, frame: &Frame<'_>);
}

/// Backend that draws nothing and keeps statistics
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    pub frames: u64,
    pub last_node_count: usize,
    pub last_status: String,
}

impl RenderBackend for HeadlessBackend {
    fn render(&mut self, frame: &Frame<'_>) {
        self.frames += 1;
        self.last_node_count = frame.node_count();
        if self.last_status != frame.hud.status {
            self.last_status.clone_from(&frame.hud.status);
        }
        log::trace!(
            "frame {}: {} nodes, camera z {:.2}, '{}'",
            self.frames,
            self.last_node_count,
            frame.camera.position.z,
            frame.hud.status
        );
    }
}
