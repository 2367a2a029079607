//! Vertex types for generated geometry

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Lit 3D vertex with position and normal
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl MeshVertex {
    pub const fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Colors for scene elements (0xRRGGBB)
pub mod colors {
    pub const SKY: u32 = 0x87ceeb;
    pub const GRASS: u32 = 0x228b22;
    pub const HAZARD_LIGHT: u32 = 0xff0000;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_matches_struct() {
        let layout = MeshVertex::desc();
        assert_eq!(layout.array_stride, 24);
        assert_eq!(layout.attributes[1].offset, 12);
    }
}
