//! Shape generation for runtime geometry

use std::f32::consts::PI;

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::vertex::MeshVertex;
use crate::scene::Aabb;

/// Indexed triangle mesh
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn bounds(&self) -> Aabb {
        let mut b = Aabb::EMPTY;
        for v in &self.vertices {
            b.expand_point(Vec3::from_array(v.position));
        }
        b
    }

    /// Raw vertex bytes for upload
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Shift every vertex by `(u + bias) * amplitude` on all three axes,
    /// with one uniform draw `u` in [0, 1) per vertex. Normals are stale
    /// afterwards; call `compute_vertex_normals`.
    pub fn perturb<R: Rng + ?Sized>(&mut self, rng: &mut R, amplitude: f32, bias: f32) {
        for v in &mut self.vertices {
            let noise = (rng.random::<f32>() + bias) * amplitude;
            for c in &mut v.position {
                *c += noise;
            }
        }
    }

    /// Smooth normals: area-weighted face normals accumulated per vertex
    pub fn compute_vertex_normals(&mut self) {
        let mut acc = vec![Vec3::ZERO; self.vertices.len()];
        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let pa = Vec3::from_array(self.vertices[a].position);
            let pb = Vec3::from_array(self.vertices[b].position);
            let pc = Vec3::from_array(self.vertices[c].position);
            let face = (pc - pb).cross(pa - pb);
            acc[a] += face;
            acc[b] += face;
            acc[c] += face;
        }
        for (v, n) in self.vertices.iter_mut().zip(acc) {
            v.normal = n.normalize_or_zero().to_array();
        }
    }
}

/// Generate a UV sphere centered on the origin
pub fn uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let ws = width_segments.max(3);
    let hs = height_segments.max(2);
    let row = ws + 1;

    let mut vertices = Vec::with_capacity((row * (hs + 1)) as usize);
    for iy in 0..=hs {
        let v = iy as f32 / hs as f32;
        for ix in 0..=ws {
            let u = ix as f32 / ws as f32;
            let p = Vec3::new(
                -radius * (u * 2.0 * PI).cos() * (v * PI).sin(),
                radius * (v * PI).cos(),
                radius * (u * 2.0 * PI).sin() * (v * PI).sin(),
            );
            vertices.push(MeshVertex::new(p.to_array(), p.normalize_or_zero().to_array()));
        }
    }

    let mut indices = Vec::with_capacity((ws * hs * 6) as usize);
    for iy in 0..hs {
        for ix in 0..ws {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;

            // Pole rows collapse to single triangles
            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != hs - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    MeshData { vertices, indices }
}
