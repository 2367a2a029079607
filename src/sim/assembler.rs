//! Scene assembly
//!
//! Builds the initial world once per session: the pool of road segments with
//! their roadside dressing, the rider's bike and the sky backdrop.

use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Vec3};
use rand::Rng;
use rand_pcg::Pcg32;

use super::pool::SegmentPool;
use super::spawner::spawn_obstacle;
use super::state::Bike;
use crate::assets::{AssetError, AssetId, ModelLibrary, FRONT_WHEEL_NODE, REAR_WHEEL_NODE};
use crate::renderer::vertex::colors;
use crate::scene::{Aabb, Camera, NodeIds, NodeKind, NodePath, SceneNode, Transform};
use crate::settings::Settings;

/// Where the first segment's front edge sits relative to the camera
pub const VISIBLE_FRONT_OFFSET: f32 = 9.2;
/// Road surface lift above the group origin
pub const ROAD_Y: f32 = 0.01;
/// Width of each grass strip beside the road
pub const PLANE_WIDTH: f32 = 200.0;
pub const PLANE_Y: f32 = -0.5;
/// Grass strips sit this many road widths off center
pub const PLANE_OFFSET: f32 = 1.5;
/// Lights and fences sit at road_width / this
pub const ROADSIDE_DIVISOR: f32 = 2.2;
pub const ROADSIDE_Y: f32 = 0.25;
pub const STREET_LIGHT_SCALE: f32 = 0.7;
/// Chance a fence slot gets a pair of fences
pub const FENCE_CHANCE: f64 = 0.8;
/// Chance of an extra half-fence gap after a slot
pub const FENCE_GAP_CHANCE: f64 = 0.15;
pub const SKY_SCALE: f32 = 10.0;
pub const SKY_DISTANCE: f32 = 50.0;

/// The rider's scene node and handles to its tyres
#[derive(Debug, Clone)]
pub struct Rider {
    pub node: SceneNode,
    pub front_tyre: Option<NodePath>,
    pub rear_tyre: Option<NodePath>,
}

impl Rider {
    fn new(node: SceneNode) -> Self {
        let front_tyre = node
            .find_by_name(FRONT_WHEEL_NODE)
            .and_then(|wheel| node.last_mesh_under(&wheel));
        let rear_tyre = node
            .find_by_name(REAR_WHEEL_NODE)
            .and_then(|wheel| node.last_mesh_under(&wheel));

        if front_tyre.is_none() {
            log::debug!("no front tyre under {FRONT_WHEEL_NODE}, front wheel won't spin");
        }
        if rear_tyre.is_none() {
            log::debug!("no rear tyre under {REAR_WHEEL_NODE}, rear wheel won't spin");
        }

        Self {
            node,
            front_tyre,
            rear_tyre,
        }
    }

    /// Copy the bike's pose onto the scene node
    pub fn sync(&mut self, bike: &Bike) {
        self.node.transform = bike.transform();
    }

    /// Turn both tyres by `-angle` about their local X axis
    pub fn spin_wheels(&mut self, angle: f32) {
        for path in [&self.front_tyre, &self.rear_tyre].into_iter().flatten() {
            if let Some(tyre) = self.node.node_at_mut(path) {
                tyre.transform.rotate_on_axis(Vec3::X, -angle);
            }
        }
    }

    pub fn world_bounds(&self) -> Aabb {
        self.node.world_bounds(&Mat4::IDENTITY)
    }
}

/// Everything in the scene besides the camera
#[derive(Debug, Clone)]
pub struct World {
    pub pool: SegmentPool,
    pub rider: Rider,
    pub library: ModelLibrary,
    pub ids: NodeIds,
    /// World-generation RNG (fences, obstacles)
    pub rng: Pcg32,
}

impl World {
    /// Recycle segments that fell behind `camera_z`
    pub fn recycle(&mut self, camera_z: f32) -> usize {
        self.pool
            .recycle(camera_z, &self.library, &mut self.ids, &mut self.rng)
    }
}

/// Build the initial world around `camera`.
///
/// Fails when a required model is missing or has unusable extents.
pub fn assemble(
    library: ModelLibrary,
    camera: &mut Camera,
    settings: &Settings,
    mut rng: Pcg32,
) -> Result<World, AssetError> {
    let mut ids = NodeIds::new();
    let road_width = settings.road_width;

    let road = normalized_road(library.require(AssetId::Road)?, road_width, &mut ids)?;
    let segment_length = road.world_bounds(&Mat4::IDENTITY).size().z;
    let street_light = library.require(AssetId::StreetLight)?;
    let fence = library.require(AssetId::RoadFence)?;
    let bike = library.require(AssetId::Bike)?;
    let sky = library.require(AssetId::Sky)?;

    let fence_length = fence.world_bounds(&Mat4::IDENTITY).size().x;
    if !(fence_length.is_finite() && fence_length > 0.0) {
        return Err(AssetError::Degenerate {
            id: AssetId::RoadFence,
            reason: format!("fence length is {fence_length}"),
        });
    }
    if !library.contains(AssetId::RoadBlock) {
        log::warn!("{} not loaded, the road will stay clear", AssetId::RoadBlock);
    }

    let start_z = camera.position.z - VISIBLE_FRONT_OFFSET + segment_length / 2.0;
    let side_x = road_width / ROADSIDE_DIVISOR;

    let mut groups = Vec::with_capacity(settings.segment_count);
    let mut obstacles = Vec::with_capacity(settings.segment_count);
    for i in 0..settings.segment_count {
        let z = start_z - i as f32 * segment_length;
        let mut group = SceneNode::group(&mut ids, format!("segment_{i}"))
            .with_transform(Transform::from_translation(Vec3::new(0.0, 0.0, z)));

        let mut tile = road.instantiate(&mut ids);
        tile.transform.translation.y += ROAD_Y;
        group.add(tile);

        for side in [-1.0, 1.0] {
            let mut plane = SceneNode::new(
                ids.next_id(),
                "grass",
                NodeKind::Plane {
                    width: PLANE_WIDTH,
                    height: segment_length,
                    color: colors::GRASS,
                },
            );
            plane.transform.translation = Vec3::new(side * PLANE_OFFSET * road_width, PLANE_Y, 0.0);
            plane.transform.rotate_on_axis(Vec3::X, -FRAC_PI_2);
            group.add(plane);
        }

        for side in [-1.0, 1.0] {
            let mut light = street_light.instantiate(&mut ids);
            light.transform.translation = Vec3::new(side * side_x, ROADSIDE_Y, 0.0);
            light.transform.scale = Vec3::splat(STREET_LIGHT_SCALE);
            light.transform.rotate_y(-side * FRAC_PI_2);
            group.add(light);
        }

        add_fences(&mut group, fence, fence_length, segment_length, side_x, &mut ids, &mut rng);

        obstacles.push(spawn_obstacle(0.0, road_width, &mut group, &library, &mut ids, &mut rng));
        groups.push(group);
    }

    let mut rider_node = bike.instantiate(&mut ids);
    rider_node.transform = Bike::new().transform();
    let rider = Rider::new(rider_node);

    let mut backdrop = sky.instantiate(&mut ids);
    backdrop.transform = Transform::from_translation(Vec3::new(0.0, 0.0, -SKY_DISTANCE)).with_scale(SKY_SCALE);
    camera.attach(backdrop);

    let recycle_distance = settings.recycle_distance_segments * segment_length;
    let pool = SegmentPool::new(groups, obstacles, segment_length, road_width, recycle_distance);

    log::info!(
        "Assembled {} segments (length {:.2}, recycle distance {:.2}, {} obstacles)",
        pool.len(),
        segment_length,
        recycle_distance,
        pool.obstacles().count()
    );

    Ok(World {
        pool,
        rider,
        library,
        ids,
        rng,
    })
}

/// Road prototype recentered on the origin and scaled to `road_width`
fn normalized_road(model: &SceneNode, road_width: f32, ids: &mut NodeIds) -> Result<SceneNode, AssetError> {
    let mut road = model.instantiate(ids);
    let bounds = road.world_bounds(&Mat4::IDENTITY);
    let size = bounds.size();
    if !(size.x > 0.0 && size.z > 0.0 && size.is_finite()) {
        return Err(AssetError::Degenerate {
            id: AssetId::Road,
            reason: format!("road extents are {size}"),
        });
    }
    road.transform.translation -= bounds.center();

    Ok(SceneNode::group(ids, "road")
        .with_transform(Transform::identity().with_scale(road_width / size.x))
        .with_child(road))
}

/// Lay fence pairs along both road edges, with occasional gaps
fn add_fences<R: Rng + ?Sized>(
    group: &mut SceneNode,
    fence: &SceneNode,
    fence_length: f32,
    segment_length: f32,
    side_x: f32,
    ids: &mut NodeIds,
    rng: &mut R,
) {
    let mut z = -segment_length / 2.0;
    while z < segment_length / 2.0 {
        if rng.random_bool(FENCE_CHANCE) {
            for side in [-1.0, 1.0] {
                let mut post = fence.instantiate(ids);
                post.transform.translation = Vec3::new(side * side_x, ROADSIDE_Y, z);
                post.transform.rotate_y(-side * FRAC_PI_2);
                group.add(post);
            }
        }
        let gap = if rng.random_bool(FENCE_GAP_CHANCE) {
            fence_length * 0.5
        } else {
            0.0
        };
        z += fence_length + gap;
    }
}
