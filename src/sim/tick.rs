//! Per-frame simulation step
//!
//! One call advances the ride by one display frame. Within a frame the order
//! is fixed: movement, camera, recycling, tyre spin, HUD text, crash physics,
//! collision detection. Rendering happens afterwards in the session.

use std::f32::consts::TAU;

use glam::Vec3;

use super::assembler::World;
use super::collision::{Impact, first_obstacle_hit, impact_response};
use super::state::{CameraMode, GameEvent, GamePhase, GameState};
use crate::consts::*;
use crate::hud::status_line;
use crate::input::ControlState;
use crate::settings::ReverseMode;
use crate::{lerp, speed_to_kmh};

/// Advance the ride by one frame
pub fn tick(state: &mut GameState, world: &mut World, controls: &ControlState, now_ms: f64) {
    state.frame += 1;
    state.events.clear();
    let delta = state.slow_motion;

    // Movement
    if state.phase == GamePhase::Driving {
        update_speed(state, controls, delta);
        update_position(state, controls, delta);
        update_steering(state, controls, delta, world.pool.lane_width());
    }

    update_camera(state, now_ms);

    // Endless road
    world.recycle(state.camera.position.z);

    // Tyre spin
    if state.phase == GamePhase::Driving {
        let distance = state.bike.speed * delta;
        let direction = if controls.reversing { -1.0 } else { 1.0 };
        let angle = distance / (TAU * WHEEL_RADIUS) * TAU * direction;
        world.rider.spin_wheels(angle);
    }

    state.status = status_line(state.phase, state.bike.kmh(), controls.reversing);

    if state.phase == GamePhase::Colliding {
        update_crash(state, delta);
    }

    world.rider.sync(&state.bike);

    if state.phase == GamePhase::Driving {
        check_obstacles(state, world);
    }
}

/// Throttle and coasting
fn update_speed(state: &mut GameState, controls: &ControlState, delta: f32) {
    let bike = &mut state.bike;
    let max_kmh = speed_to_kmh(MAX_SPEED);

    if controls.accelerating {
        let acceleration = lerp(MIN_ACCELERATION, MAX_ACCELERATION, bike.kmh() / max_kmh) * delta;
        bike.speed = (bike.speed + acceleration).min(MAX_SPEED);
    } else if !controls.reversing {
        if bike.speed > MAX_SPEED * HIGH_SPEED_FRACTION {
            bike.speed *= HIGH_SPEED_DECAY;
        } else {
            bike.speed *= LOW_SPEED_DECAY;
        }
        if bike.speed < STOP_EPSILON {
            bike.speed = 0.0;
        }
    }
}

/// Longitudinal motion, including reverse
fn update_position(state: &mut GameState, controls: &ControlState, delta: f32) {
    let bike = &mut state.bike;

    if !controls.reversing {
        bike.position.z -= bike.speed * delta;
        return;
    }

    match state.reverse_mode {
        ReverseMode::DecelerateThenCreep => {
            if !controls.accelerating {
                bike.speed *= REVERSE_BRAKE;
                if bike.speed < STOP_EPSILON {
                    bike.speed = 0.0;
                }
            }
            if bike.speed > STOP_EPSILON {
                bike.position.z -= bike.speed * delta;
            } else {
                bike.position.z += REVERSE_CREEP * delta;
            }
        }
        ReverseMode::Direct => {
            if bike.speed > STOP_EPSILON {
                bike.position.z += bike.speed * delta;
            } else {
                bike.position.z += REVERSE_CREEP * delta;
            }
        }
    }
}

/// Lateral movement, lean and wheelie. Only while moving or reversing.
fn update_steering(state: &mut GameState, controls: &ControlState, delta: f32, road_width: f32) {
    let bike = &mut state.bike;
    if bike.speed == 0.0 && !controls.reversing {
        return;
    }

    let rate = if controls.reversing {
        REVERSE_LATERAL_RATE * delta
    } else {
        lerp(MIN_LATERAL_RATE, MAX_LATERAL_RATE, bike.speed / MAX_SPEED) * delta
    };
    if controls.move_left {
        bike.position.x -= rate;
    }
    if controls.move_right {
        bike.position.x += rate;
    }
    let max_x = road_width / LATERAL_LIMIT_DIVISOR;
    bike.position.x = bike.position.x.clamp(-max_x, max_x);

    let wheelie_target = if controls.doing_wheelie { MAX_WHEELIE_TILT } else { 0.0 };
    bike.wheelie_tilt = lerp(bike.wheelie_tilt, wheelie_target, WHEELIE_BLEND);
    bike.rotation.x = bike.wheelie_tilt;

    let lean_target = if controls.move_left {
        -MAX_TILT
    } else if controls.move_right {
        MAX_TILT
    } else {
        0.0
    };
    bike.tilt = lerp(bike.tilt, lean_target, TILT_BLEND);
    bike.rotation.z = bike.tilt;
}

fn update_camera(state: &mut GameState, now_ms: f64) {
    let target = state.bike.position;
    let mode = state.camera_mode();
    let camera = &mut state.camera;

    match mode {
        CameraMode::Wasted => {
            let vantage = target + Vec3::Y * WASTED_CAMERA_HEIGHT;
            camera.position = camera.position.lerp(vantage, WASTED_CAMERA_BLEND);
            camera.look_at(target);
        }
        CameraMode::Follow => {
            camera.position = target + state.follow_offset;
        }
        CameraMode::Cinematic => {
            let angle = (now_ms * ORBIT_RATE) as f32;
            camera.position = target
                + Vec3::new(
                    ORBIT_RADIUS * angle.cos(),
                    ORBIT_HEIGHT,
                    ORBIT_RADIUS * angle.sin(),
                );
            camera.look_at(target);
        }
    }
}

/// Ballistic tumble until the bike lands
fn update_crash(state: &mut GameState, delta: f32) {
    let bike = &mut state.bike;
    bike.velocity.y += GRAVITY * delta;
    bike.position += bike.velocity * delta;
    bike.rotation += bike.angular_velocity * delta;

    if bike.position.y <= GROUND_Y {
        bike.position.y = GROUND_Y;
        bike.velocity = Vec3::ZERO;
        bike.angular_velocity = Vec3::ZERO;
        state.phase = GamePhase::Wasted;
        state.events.push(GameEvent::Wasted);
        log::info!(
            "Bike landed at ({:.2}, {:.2}) after {} frames",
            bike.position.x,
            bike.position.z,
            state.frame
        );
    }
}

fn check_obstacles(state: &mut GameState, world: &World) {
    let bounds = world.rider.world_bounds();
    let Some(hit) = first_obstacle_hit(&bounds, &world.pool) else {
        return;
    };

    let kmh = state.bike.kmh();
    state.bike.speed = 0.0;
    match impact_response(kmh, &mut state.rng) {
        Impact::SoftBump => {
            log::debug!("Bumped obstacle {:?} at {:.0} km/h", hit.obstacle, kmh);
            state.events.push(GameEvent::SoftBump { kmh });
        }
        Impact::Crash {
            velocity,
            angular_velocity,
        } => {
            state.bike.velocity = velocity;
            state.bike.angular_velocity = angular_velocity;
            state.phase = GamePhase::Colliding;
            state.slow_motion = SLOW_MOTION;
            state.events.push(GameEvent::Crashed { kmh });
            log::info!("Crashed into obstacle {:?} at {:.0} km/h", hit.obstacle, kmh);
        }
    }
}
