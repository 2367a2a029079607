//! Game state and core simulation types
//!
//! Everything the per-frame step mutates lives here, so a frame is just
//! `tick(&mut GameState, &mut World, &ControlState, now)`.

use std::f32::consts::PI;
use std::fmt;

use glam::{EulerRot, Quat, Vec3};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::scene::{Camera, Transform};
use crate::settings::ReverseMode;
use crate::speed_to_kmh;

/// Where the rider starts
pub const BIKE_START: Vec3 = Vec3::new(0.0, GROUND_Y, 2.9);
/// Uniform scale applied to the bike model
pub const BIKE_SCALE: f32 = 1.2;

/// Current phase of the ride
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Normal riding
    Driving,
    /// Airborne after a high-speed hit
    Colliding,
    /// Bike has landed; the run is over until a reload
    Wasted,
}

/// Camera behaviour, selected by the phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CameraMode {
    /// Rigid chase offset
    Follow,
    /// Slow orbit around the crashing bike
    Cinematic,
    /// Ease to an overhead shot and hold
    Wasted,
}

impl From<GamePhase> for CameraMode {
    fn from(phase: GamePhase) -> Self {
        match phase {
            GamePhase::Driving => CameraMode::Follow,
            GamePhase::Colliding => CameraMode::Cinematic,
            GamePhase::Wasted => CameraMode::Wasted,
        }
    }
}

/// Things that happened during a tick, for the HUD and logs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Hit an obstacle too slowly to crash; the bike just stopped
    SoftBump { kmh: f32 },
    /// Hit an obstacle fast enough to go flying
    Crashed { kmh: f32 },
    /// Bike came to rest after a crash
    Wasted,
}

/// Displayed gear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gear {
    Neutral,
    Forward(u8),
    Reverse,
}

impl Gear {
    /// Gear for a forward speed.
    ///
    /// The highest threshold at or below `kmh` picks the gear (1-based);
    /// the launch band under the first non-zero threshold reads as neutral.
    pub fn from_kmh(kmh: f32) -> Self {
        match GEAR_THRESHOLDS.iter().rposition(|&t| kmh >= t) {
            Some(i) if i > 0 => Gear::Forward(i as u8 + 1),
            _ => Gear::Neutral,
        }
    }

    /// Gear index as a number (0 = neutral, reverse has none)
    pub fn number(&self) -> Option<u8> {
        match self {
            Gear::Neutral => Some(0),
            Gear::Forward(g) => Some(*g),
            Gear::Reverse => None,
        }
    }
}

impl fmt::Display for Gear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gear::Neutral => f.write_str("N"),
            Gear::Forward(g) => write!(f, "{g}"),
            Gear::Reverse => f.write_str("R"),
        }
    }
}

/// The rider's motion state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bike {
    /// x lateral, y up, z forward-negative
    pub position: Vec3,
    /// Euler angles: x wheelie pitch, y heading, z lean
    pub rotation: Vec3,
    /// Forward speed, always within [0, MAX_SPEED]
    pub speed: f32,
    /// Smoothed lean
    pub tilt: f32,
    /// Smoothed wheelie pitch
    pub wheelie_tilt: f32,
    /// Crash velocity (only meaningful while colliding)
    pub velocity: Vec3,
    /// Crash spin (only meaningful while colliding)
    pub angular_velocity: Vec3,
}

impl Default for Bike {
    fn default() -> Self {
        Self::new()
    }
}

impl Bike {
    /// Bike at the start line, facing down the road
    pub fn new() -> Self {
        Self {
            position: BIKE_START,
            rotation: Vec3::new(0.0, PI, 0.0),
            speed: 0.0,
            tilt: 0.0,
            wheelie_tilt: 0.0,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
        }
    }

    #[inline]
    pub fn kmh(&self) -> f32 {
        speed_to_kmh(self.speed)
    }

    /// Transform for the bike's scene node
    pub fn transform(&self) -> Transform {
        Transform {
            translation: self.position,
            rotation: Quat::from_euler(
                EulerRot::XYZ,
                self.rotation.x,
                self.rotation.y,
                self.rotation.z,
            ),
            scale: Vec3::splat(BIKE_SCALE),
        }
    }
}

/// RNG seed/stream pair
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    /// Stream for world generation (segments, fences, obstacles)
    pub const WORLD_STREAM: u64 = 0;
    /// Stream for crash impulses
    pub const CRASH_STREAM: u64 = 1;

    pub fn new(seed: u64, stream: u64) -> Self {
        Self { seed, stream }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::new(self.seed, self.stream)
    }
}

/// Complete per-session simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Crash impulse RNG
    pub rng: Pcg32,
    /// Frames simulated so far
    pub frame: u64,
    pub phase: GamePhase,
    /// Time scale: 1.0 normally, `SLOW_MOTION` once crashed
    pub slow_motion: f32,
    pub bike: Bike,
    pub camera: Camera,
    /// Camera offset from the bike, captured once at startup
    pub follow_offset: Vec3,
    pub reverse_mode: ReverseMode,
    /// HUD status line for the current frame
    pub status: String,
    /// Events raised during the last tick
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new ride. The chase offset is taken from where `camera` is now.
    pub fn new(seed: u64, camera: Camera, reverse_mode: ReverseMode) -> Self {
        let bike = Bike::new();
        let follow_offset = camera.position - bike.position;
        Self {
            seed,
            rng: RngState::new(seed, RngState::CRASH_STREAM).to_rng(),
            frame: 0,
            phase: GamePhase::Driving,
            slow_motion: 1.0,
            bike,
            camera,
            follow_offset,
            reverse_mode,
            status: String::from("Speed: 0 km/h | Gear: N"),
            events: Vec::new(),
        }
    }

    #[inline]
    pub fn camera_mode(&self) -> CameraMode {
        self.phase.into()
    }

    #[inline]
    pub fn is_crashed(&self) -> bool {
        self.phase != GamePhase::Driving
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gear_from_kmh() {
        assert_eq!(Gear::from_kmh(75.0), Gear::Forward(3));
        assert_eq!(Gear::from_kmh(75.0).number(), Some(3));
        assert_eq!(Gear::from_kmh(10.0), Gear::Neutral);
        assert_eq!(Gear::from_kmh(10.0).number(), Some(0));
        assert_eq!(Gear::from_kmh(0.0), Gear::Neutral);
        assert_eq!(Gear::from_kmh(40.0), Gear::Forward(2));
        assert_eq!(Gear::from_kmh(180.0), Gear::Forward(5));
        assert_eq!(Gear::Reverse.to_string(), "R");
        assert_eq!(Gear::Neutral.to_string(), "N");
    }

    #[test]
    fn test_new_state_captures_follow_offset() {
        let camera = Camera::new();
        let state = GameState::new(1, camera.clone(), ReverseMode::default());
        assert_eq!(state.phase, GamePhase::Driving);
        assert_eq!(state.camera_mode(), CameraMode::Follow);
        assert_eq!(state.bike.position + state.follow_offset, camera.position);
    }

    #[test]
    fn test_bike_faces_down_the_road() {
        let bike = Bike::new();
        let nose = bike.transform().rotation * Vec3::Z;
        assert!((nose - Vec3::NEG_Z).length() < 1e-5);
    }
}
