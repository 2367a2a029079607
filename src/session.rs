//! Ride session
//!
//! Owns everything one run of the game needs and is driven by the host once
//! per display refresh via [`Session::frame`]. A session never restarts in
//! place: once the player asks for a restart the host gets
//! [`FrameOutcome::ReloadRequested`] and builds a fresh one.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::assets::ModelLibrary;
use crate::error::GameError;
use crate::hud::Hud;
use crate::input::ControlState;
use crate::renderer::vertex::colors;
use crate::renderer::{Frame, HeadlessBackend, RenderBackend};
use crate::scene::Camera;
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, RngState, World, assemble, tick};

/// What the host should do after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    /// Tear the session down and start over
    ReloadRequested,
}

/// One run of the game
pub struct Session<B: RenderBackend = HeadlessBackend> {
    state: GameState,
    world: World,
    hud: Hud,
    controls: ControlState,
    backend: B,
}

impl<B: RenderBackend> Session<B> {
    /// Build the world and get ready to ride.
    ///
    /// Fails if the settings are invalid or a required model is missing.
    pub fn new(settings: &Settings, library: ModelLibrary, backend: B) -> Result<Self, GameError> {
        settings.validate()?;
        let seed = settings.seed.unwrap_or_else(clock_seed);
        log::info!(
            "Starting ride (seed {}, {} segments, reverse {})",
            seed,
            settings.segment_count,
            settings.reverse_mode.as_str()
        );

        let missing = library.missing();
        if !missing.is_empty() {
            log::debug!("Models not loaded: {missing:?}");
        }

        let mut camera = Camera::new();
        let world = assemble(
            library,
            &mut camera,
            settings,
            RngState::new(seed, RngState::WORLD_STREAM).to_rng(),
        )?;
        let state = GameState::new(seed, camera, settings.reverse_mode);

        Ok(Self {
            state,
            world,
            hud: Hud::new(),
            controls: ControlState::default(),
            backend,
        })
    }

    /// Run one frame: simulate, update the overlay, render.
    pub fn frame(&mut self, now_ms: f64) -> FrameOutcome {
        tick(&mut self.state, &mut self.world, &self.controls, now_ms);

        for event in self.state.events.drain(..) {
            match event {
                GameEvent::Wasted => {
                    log::info!("WASTED");
                    self.hud.trigger_wasted(now_ms);
                }
                GameEvent::Crashed { .. } | GameEvent::SoftBump { .. } => {}
            }
        }

        self.hud.status.clone_from(&self.state.status);
        self.hud.update(now_ms);

        self.backend.render(&Frame {
            segments: self.world.pool.groups(),
            rider: &self.world.rider.node,
            camera: &self.state.camera,
            hud: &self.hud,
            background: colors::SKY,
        });

        if self.hud.reload_requested() {
            FrameOutcome::ReloadRequested
        } else {
            FrameOutcome::Continue
        }
    }

    /// Restart button. Returns false while the prompt isn't accepting presses.
    pub fn press_restart(&mut self, now_ms: f64) -> bool {
        let accepted = self.hud.press_restart(now_ms);
        if accepted {
            log::info!("Restart pressed");
        }
        accepted
    }

    /// Feed a key edge into the controls. Returns false for unbound keys.
    pub fn key_event(&mut self, key: &str, pressed: bool) -> bool {
        self.controls.key_event(key, pressed)
    }

    pub fn controls_mut(&mut self) -> &mut ControlState {
        &mut self.controls
    }

    pub fn controls(&self) -> &ControlState {
        &self.controls
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn hud(&self) -> &Hud {
        &self.hud
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

/// Seed for rides that don't pin one
fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetError, AssetId};
    use crate::scene::NodeIds;
    use crate::settings::SettingsError;
    use crate::sim::{BIKE_START, GamePhase};
    use glam::Vec3;

    const FRAME_MS: f64 = 1000.0 / 60.0;

    fn settings() -> Settings {
        Settings {
            seed: Some(9),
            ..Default::default()
        }
    }

    fn session() -> Session {
        let mut ids = NodeIds::new();
        let lib = ModelLibrary::placeholder(&mut ids);
        Session::new(&settings(), lib, HeadlessBackend::default()).unwrap()
    }

    /// Session with a single road block far enough ahead that a rider on
    /// full throttle reaches it above crash speed
    fn blocked_session() -> Session {
        let mut s = session();
        let world = &mut s.world;
        for i in 0..world.pool.len() {
            world.pool.clear_obstacle(i);
        }
        let group = 8;
        let group_z = world.pool.positions()[group];
        let mut block = world
            .library
            .get(AssetId::RoadBlock)
            .unwrap()
            .instantiate(&mut world.ids);
        block.transform.translation = Vec3::new(BIKE_START.x, 0.0, -70.0 - group_z);
        world.pool.set_obstacle(group, block);
        s
    }

    #[test]
    fn test_frame_renders_and_continues() {
        let mut s = session();
        assert_eq!(s.frame(0.0), FrameOutcome::Continue);
        assert_eq!(s.backend().frames, 1);
        assert!(s.backend().last_node_count > 20);
        assert_eq!(s.backend().last_status, "Speed: 0 km/h | Gear: N");
    }

    #[test]
    fn test_keys_drive_the_bike() {
        let mut s = session();
        assert!(s.key_event("ArrowUp", true));
        assert!(!s.key_event("q", true));
        for i in 0..60 {
            s.frame(i as f64 * FRAME_MS);
        }
        assert!(s.state().bike.speed > 0.0);
        assert!(s.hud().status.starts_with("Speed: "));

        s.key_event("ArrowUp", false);
        s.key_event("s", true);
        s.frame(1000.0);
        assert!(s.hud().status.ends_with("Gear: R"));
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let mut ids = NodeIds::new();
        let lib = ModelLibrary::placeholder(&mut ids);
        let bad = Settings {
            segment_count: 0,
            ..settings()
        };
        let err = Session::new(&bad, lib, HeadlessBackend::default()).err().unwrap();
        assert!(matches!(err, GameError::Settings(SettingsError::Invalid(_))));
    }

    #[test]
    fn test_missing_bike_fails_to_start() {
        let mut ids = NodeIds::new();
        let full = ModelLibrary::placeholder(&mut ids);
        let mut lib = ModelLibrary::new();
        for id in [AssetId::Road, AssetId::Sky, AssetId::StreetLight, AssetId::RoadFence] {
            lib.insert(id, full.get(id).unwrap().clone());
        }
        let err = Session::new(&settings(), lib, HeadlessBackend::default()).err().unwrap();
        assert!(matches!(err, GameError::Asset(AssetError::Missing(AssetId::Bike))));
        assert!(err.to_string().contains("bike.glb"));
    }

    #[test]
    fn test_crash_to_reload() {
        let mut s = blocked_session();
        s.controls_mut().accelerating = true;

        let mut now = 0.0;
        let mut frames = 0;
        loop {
            s.frame(now);
            if s.state().phase == GamePhase::Wasted || frames > 5000 {
                break;
            }
            now += FRAME_MS;
            frames += 1;
        }
        assert_eq!(s.state().phase, GamePhase::Wasted);
        assert!(s.hud().banner.visible);
        assert_eq!(s.hud().status, "CRASHED!");
        let wasted_at = now;

        // Restart is ignored until the prompt appears
        assert!(!s.press_restart(wasted_at));
        assert_eq!(s.frame(wasted_at + 2999.0), FrameOutcome::Continue);
        assert!(s.hud().banner.visible);
        assert!(!s.hud().prompt.visible);

        assert_eq!(s.frame(wasted_at + 3000.0), FrameOutcome::Continue);
        assert!(!s.hud().banner.visible);
        assert!(s.hud().prompt.interactive);

        let pressed_at = wasted_at + 3000.0;
        assert!(s.press_restart(pressed_at));
        assert!(!s.hud().prompt.visible);
        assert_eq!(s.frame(pressed_at + 149.0), FrameOutcome::Continue);
        assert_eq!(s.frame(pressed_at + 150.0), FrameOutcome::ReloadRequested);
    }
}
