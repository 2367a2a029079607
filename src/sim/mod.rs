//! Ride simulation
//!
//! All gameplay logic lives here. Given the same seed, settings and control
//! sequence a ride plays out identically:
//! - One step per display frame, scaled by the slow-motion factor
//! - Seeded RNG streams only
//! - Stable iteration order (pool order)
//! - No rendering or platform dependencies

pub mod assembler;
pub mod collision;
pub mod pool;
pub mod spawner;
pub mod state;
pub mod tick;

pub use assembler::{Rider, World, assemble};
pub use collision::{Impact, ObstacleHit, first_obstacle_hit, impact_response};
pub use pool::SegmentPool;
pub use spawner::spawn_obstacle;
pub use state::{
    BIKE_SCALE, BIKE_START, Bike, CameraMode, GameEvent, GamePhase, GameState, Gear, RngState,
};
pub use tick::tick;
