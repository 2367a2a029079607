//! Collision detection and response
//!
//! The bike's world box is tested against every live obstacle's world box
//! each frame. Boxes are recomputed from the scene every time since bikes
//! tumble and obstacles get recycled; there are at most a handful of them.

use glam::Vec3;
use rand::Rng;

use super::pool::SegmentPool;
use crate::consts::CRASH_KMH;
use crate::scene::{Aabb, NodeId};

/// Launch velocity of a crashing bike, before lateral jitter
pub const CRASH_LAUNCH: Vec3 = Vec3::new(0.0, 0.5, -0.6);
/// Lateral jitter range on the launch velocity
pub const CRASH_LATERAL_JITTER: f32 = 0.1;
/// Forward flip rate of a crashing bike
pub const CRASH_FLIP: f32 = -0.3;
/// Jitter ranges on yaw and roll spin
pub const CRASH_YAW_JITTER: f32 = 0.06;
pub const CRASH_ROLL_JITTER: f32 = 0.12;

/// An obstacle the bike ran into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleHit {
    pub obstacle: NodeId,
    /// Obstacle's world box at the time of the hit
    pub bounds: Aabb,
}

/// What a hit does to the bike
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Impact {
    /// Too slow to crash: the bike just stops
    SoftBump,
    /// Bike goes flying with the given launch and spin
    Crash {
        velocity: Vec3,
        angular_velocity: Vec3,
    },
}

/// First live obstacle (in pool order) whose box overlaps the bike's
pub fn first_obstacle_hit(bike: &Aabb, pool: &SegmentPool) -> Option<ObstacleHit> {
    if bike.is_empty() {
        return None;
    }
    pool.obstacle_bounds()
        .find(|(_, bounds)| bike.intersects(bounds))
        .map(|(obstacle, bounds)| ObstacleHit { obstacle, bounds })
}

/// Decide how a hit at `kmh` plays out. Only crashes draw from `rng`.
pub fn impact_response<R: Rng + ?Sized>(kmh: f32, rng: &mut R) -> Impact {
    if kmh <= CRASH_KMH {
        return Impact::SoftBump;
    }

    let jitter = |rng: &mut R, range: f32| (rng.random::<f32>() - 0.5) * range;
    let velocity = CRASH_LAUNCH + Vec3::X * jitter(rng, CRASH_LATERAL_JITTER);
    let angular_velocity = Vec3::new(
        CRASH_FLIP,
        jitter(rng, CRASH_YAW_JITTER),
        jitter(rng, CRASH_ROLL_JITTER),
    );
    Impact::Crash {
        velocity,
        angular_velocity,
    }
}
