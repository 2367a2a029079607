//! Obstacle spawning
//!
//! Road blocks are rolled per segment: most segments stay clear, the rest get
//! one block somewhere across the lanes with a red hazard light and a lumpy
//! warning bulb on top.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use crate::assets::{AssetId, ModelLibrary};
use crate::consts::OBSTACLE_CHANCE;
use crate::renderer::shapes::uv_sphere;
use crate::renderer::vertex::colors;
use crate::scene::{NodeId, NodeIds, NodeKind, SceneNode};

/// Height the block sits at
pub const OBSTACLE_Y: f32 = 0.5;
/// Uniform scale applied to the block model
pub const OBSTACLE_SCALE: f32 = 1.5;
/// How far below the block's top the hazard light hangs
pub const LIGHT_DROP: f32 = 0.3;
pub const LIGHT_INTENSITY: f32 = 100.0;
pub const LIGHT_RANGE: f32 = 30.0;
pub const BULB_RADIUS: f32 = 0.12;
pub const BULB_SEGMENTS: u32 = 16;
pub const BULB_NOISE_AMPLITUDE: f32 = 0.05;
pub const BULB_NOISE_BIAS: f32 = -0.3;

/// Name given to spawned obstacle nodes
pub const OBSTACLE_NAME: &str = "obstacle";

/// Maybe put a road block into `parent` at longitudinal offset `z`.
///
/// Returns the new node's id, or `None` when the roll fails or the block
/// model isn't loaded. On the `None` path `parent` is untouched.
pub fn spawn_obstacle<R: Rng + ?Sized>(
    z: f32,
    lane_width: f32,
    parent: &mut SceneNode,
    library: &ModelLibrary,
    ids: &mut NodeIds,
    rng: &mut R,
) -> Option<NodeId> {
    if !rng.random_bool(OBSTACLE_CHANCE) {
        return None;
    }

    let Some(model) = library.get(AssetId::RoadBlock) else {
        log::warn!("{} not found in model library, skipping obstacle", AssetId::RoadBlock);
        return None;
    };

    let mut obstacle = model.instantiate(ids);
    obstacle.name = OBSTACLE_NAME.to_string();

    let max_x = lane_width / 3.0;
    let x = if max_x > 0.0 {
        rng.random_range(-max_x..=max_x)
    } else {
        0.0
    };
    obstacle.transform.translation = Vec3::new(x, OBSTACLE_Y, z);
    obstacle.transform.scale = Vec3::splat(OBSTACLE_SCALE);

    // Light sits just under the top of the block's own geometry
    let top = obstacle.local_bounds();
    let light_y = if top.is_empty() { 0.0 } else { top.max.y - LIGHT_DROP };

    let mut light = SceneNode::new(
        ids.next_id(),
        "hazard_light",
        NodeKind::PointLight {
            color: colors::HAZARD_LIGHT,
            intensity: LIGHT_INTENSITY,
            range: LIGHT_RANGE,
        },
    );
    light.transform.translation = Vec3::new(0.0, light_y, 0.0);

    let mut bulb_mesh = uv_sphere(BULB_RADIUS, BULB_SEGMENTS, BULB_SEGMENTS);
    bulb_mesh.perturb(rng, BULB_NOISE_AMPLITUDE, BULB_NOISE_BIAS);
    bulb_mesh.compute_vertex_normals();
    let mut bulb = SceneNode::new(ids.next_id(), "warning_bulb", NodeKind::Geometry(bulb_mesh));
    bulb.transform.translation = Vec3::new(0.0, light_y, 0.0);

    obstacle.add(light);
    obstacle.add(bulb);

    obstacle.transform.rotate_y(rng.random::<f32>() * TAU);

    Some(parent.add(obstacle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn setup() -> (ModelLibrary, NodeIds, SceneNode) {
        let mut ids = NodeIds::new();
        let lib = ModelLibrary::placeholder(&mut ids);
        let parent = SceneNode::group(&mut ids, "segment");
        (lib, ids, parent)
    }

    #[test]
    fn test_spawn_rate_is_about_thirty_percent() {
        let (lib, mut ids, mut parent) = setup();
        let mut rng = Pcg32::seed_from_u64(2024);
        let trials = 10_000;
        let mut spawned = 0;
        for _ in 0..trials {
            if let Some(id) = spawn_obstacle(0.0, 12.0, &mut parent, &lib, &mut ids, &mut rng) {
                spawned += 1;
                parent.remove(id);
            }
        }
        let rate = spawned as f64 / trials as f64;
        assert!((rate - 0.3).abs() < 0.03, "spawn rate {rate}");
        assert!(parent.children.is_empty());
    }

    #[test]
    fn test_spawned_obstacle_layout() {
        let (lib, mut ids, mut parent) = setup();
        let mut rng = Pcg32::seed_from_u64(5);
        let id = (0..100)
            .find_map(|_| spawn_obstacle(-3.0, 12.0, &mut parent, &lib, &mut ids, &mut rng))
            .expect("should spawn within 100 tries");

        let obstacle = parent.child(id).unwrap();
        let t = obstacle.transform.translation;
        assert!(t.x.abs() <= 4.0);
        assert_eq!(t.y, OBSTACLE_Y);
        assert_eq!(t.z, -3.0);
        assert_eq!(obstacle.transform.scale, Vec3::splat(OBSTACLE_SCALE));

        let light = obstacle
            .children
            .iter()
            .find(|c| matches!(c.kind, NodeKind::PointLight { .. }))
            .unwrap();
        // Placeholder block is 0.8 tall, resting on y = 0
        assert!((light.transform.translation.y - 0.5).abs() < 1e-5);

        let bulb = obstacle
            .children
            .iter()
            .find(|c| matches!(c.kind, NodeKind::Geometry(_)))
            .unwrap();
        if let NodeKind::Geometry(mesh) = &bulb.kind {
            assert!(!mesh.vertices.is_empty());
            assert!(mesh.vertices.iter().all(|v| {
                let n = Vec3::from_array(v.normal);
                n == Vec3::ZERO || (n.length() - 1.0).abs() < 1e-4
            }));
        }
    }

    #[test]
    fn test_missing_model_returns_none() {
        let mut ids = NodeIds::new();
        let lib = ModelLibrary::new();
        let mut parent = SceneNode::group(&mut ids, "segment");
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..200 {
            assert!(spawn_obstacle(0.0, 12.0, &mut parent, &lib, &mut ids, &mut rng).is_none());
        }
        assert!(parent.children.is_empty());
    }

    #[test]
    fn test_same_seed_same_obstacles() {
        let (lib, _, _) = setup();
        let run = |seed| {
            let mut ids = NodeIds::new();
            let mut parent = SceneNode::group(&mut ids, "segment");
            let mut rng = Pcg32::seed_from_u64(seed);
            for i in 0..20 {
                spawn_obstacle(i as f32, 12.0, &mut parent, &lib, &mut ids, &mut rng);
            }
            parent
        };
        assert_eq!(run(99), run(99));
    }
}
