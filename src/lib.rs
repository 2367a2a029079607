//! Rider Rush - An endless 3D motorcycle runner
//!
//! Core modules:
//! - `sim`: Per-frame simulation (bike kinematics, recycling, collisions, crash physics)
//! - `scene`: Thin scene substrate (nodes, transforms, bounding boxes, camera)
//! - `assets`: Typed model registry
//! - `hud`: Status text and the wasted/restart choreography
//! - `session`: Frame driver tying simulation, HUD and rendering together
//! - `renderer`: Render seam and generated geometry

pub mod assets;
pub mod error;
pub mod hud;
pub mod input;
pub mod renderer;
pub mod scene;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::GameError;
pub use input::{Action, ControlState};
pub use session::{FrameOutcome, Session};
pub use settings::{ReverseMode, Settings};

/// Game configuration constants
pub mod consts {
    /// Top speed in simulation units per frame
    pub const MAX_SPEED: f32 = 1.0;
    /// km/h shown on the HUD at top speed
    pub const BASE_KMH: f32 = 180.0;
    /// Acceleration at standstill (per frame)
    pub const MIN_ACCELERATION: f32 = 0.0005;
    /// Acceleration near top speed (per frame)
    pub const MAX_ACCELERATION: f32 = 0.0025;
    /// Coasting decay above 80% of top speed
    pub const HIGH_SPEED_DECAY: f32 = 0.995;
    /// Coasting decay below 80% of top speed
    pub const LOW_SPEED_DECAY: f32 = 0.97;
    /// Fraction of top speed where the gentler decay kicks in
    pub const HIGH_SPEED_FRACTION: f32 = 0.8;
    /// Braking factor applied per frame while reverse is held
    pub const REVERSE_BRAKE: f32 = 0.97;
    /// Speeds below this snap to zero
    pub const STOP_EPSILON: f32 = 0.001;
    /// Backward creep per frame once stopped with reverse held
    pub const REVERSE_CREEP: f32 = 0.01;

    /// Gear shift points in km/h
    pub const GEAR_THRESHOLDS: [f32; 5] = [0.0, 40.0, 70.0, 100.0, 130.0];

    /// Lateral rate at standstill / top speed (units per frame)
    pub const MIN_LATERAL_RATE: f32 = 0.03;
    pub const MAX_LATERAL_RATE: f32 = 0.07;
    /// Lateral rate while reversing
    pub const REVERSE_LATERAL_RATE: f32 = 0.02;
    /// Drivable half-width is road width divided by this
    pub const LATERAL_LIMIT_DIVISOR: f32 = 2.5;

    /// Lean angle at full steer (radians)
    pub const MAX_TILT: f32 = 0.5;
    /// Lean blend factor per frame
    pub const TILT_BLEND: f32 = 0.05;
    /// Wheelie pitch (radians)
    pub const MAX_WHEELIE_TILT: f32 = 0.5;
    /// Wheelie blend factor per frame
    pub const WHEELIE_BLEND: f32 = 0.1;

    /// Tyre radius used for spin animation
    pub const WHEEL_RADIUS: f32 = 0.35;

    /// Crashes happen above this speed; below it the bike just stops
    pub const CRASH_KMH: f32 = 60.0;
    /// Crash gravity (per frame²)
    pub const GRAVITY: f32 = -0.01;
    /// Height the crashed bike comes to rest at
    pub const GROUND_Y: f32 = 0.05;
    /// Time scale while crashed
    pub const SLOW_MOTION: f32 = 0.3;

    /// Cinematic orbit radius / height / angular rate (radians per ms)
    pub const ORBIT_RADIUS: f32 = 8.0;
    pub const ORBIT_HEIGHT: f32 = 4.0;
    pub const ORBIT_RATE: f64 = 0.0003;
    /// Height of the post-crash overhead vantage
    pub const WASTED_CAMERA_HEIGHT: f32 = 6.0;
    /// Blend factor per frame toward the overhead vantage
    pub const WASTED_CAMERA_BLEND: f32 = 0.05;

    /// Chance a segment gets an obstacle
    pub const OBSTACLE_CHANCE: f64 = 0.3;

    /// How long the WASTED banner holds before the restart prompt (ms)
    pub const WASTED_HOLD_MS: f64 = 3000.0;
    /// Prompt fade before reload (ms)
    pub const RELOAD_FADE_MS: f64 = 150.0;
}

/// Linear interpolation from `a` to `b` by `t`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Convert a simulation speed to HUD km/h
#[inline]
pub fn speed_to_kmh(speed: f32) -> f32 {
    speed / consts::MAX_SPEED * consts::BASE_KMH
}

/// Convert HUD km/h back to a simulation speed
#[inline]
pub fn kmh_to_speed(kmh: f32) -> f32 {
    kmh / consts::BASE_KMH * consts::MAX_SPEED
}
