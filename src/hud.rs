//! HUD text and the wasted/restart overlay
//!
//! The overlay is driven by a tiny timeline of scheduled UI events that the
//! session polls every frame, so the banner choreography runs on wall-clock
//! time independently of the simulation's slow motion.

use serde::{Deserialize, Serialize};

use crate::consts::{RELOAD_FADE_MS, WASTED_HOLD_MS};
use crate::sim::{GamePhase, Gear};

/// Status line shown in the HUD corner
pub fn status_line(phase: GamePhase, kmh: f32, reversing: bool) -> String {
    if phase != GamePhase::Driving {
        return String::from("CRASHED!");
    }
    let shown = kmh.round() as i32;
    let gear = if reversing { Gear::Reverse } else { Gear::from_kmh(kmh) };
    format!("Speed: {shown} km/h | Gear: {gear}")
}

/// The big WASTED banner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BannerState {
    pub visible: bool,
    pub scale: f32,
    pub opacity: f32,
}

impl Default for BannerState {
    fn default() -> Self {
        Self {
            visible: false,
            scale: 0.5,
            opacity: 0.0,
        }
    }
}

/// The restart prompt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptState {
    pub visible: bool,
    /// Whether the restart button accepts presses
    pub interactive: bool,
}

/// Scheduled overlay changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UiEvent {
    /// Hide the banner and offer a restart
    ShowRestartPrompt,
    /// Ask the host to reload the game
    Reload,
}

/// Pending UI events ordered by due time
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    pending: Vec<(f64, UiEvent)>,
}

impl Timeline {
    pub fn schedule(&mut self, due_ms: f64, event: UiEvent) {
        let at = self.pending.partition_point(|(due, _)| *due <= due_ms);
        self.pending.insert(at, (due_ms, event));
    }

    /// Remove and return every event due at or before `now_ms`, oldest first
    pub fn poll(&mut self, now_ms: f64) -> Vec<UiEvent> {
        let due = self.pending.partition_point(|(at, _)| *at <= now_ms);
        self.pending.drain(..due).map(|(_, event)| event).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}

/// Everything drawn on top of the 3D view
#[derive(Debug, Clone, Default)]
pub struct Hud {
    pub status: String,
    pub banner: BannerState,
    pub prompt: PromptState,
    timeline: Timeline,
    reload_requested: bool,
}

impl Hud {
    pub fn new() -> Self {
        Self {
            status: status_line(GamePhase::Driving, 0.0, false),
            ..Default::default()
        }
    }

    /// Reveal the banner and queue the restart prompt
    pub fn trigger_wasted(&mut self, now_ms: f64) {
        if self.banner.visible {
            return;
        }
        self.banner = BannerState {
            visible: true,
            scale: 1.0,
            opacity: 1.0,
        };
        self.timeline
            .schedule(now_ms + WASTED_HOLD_MS, UiEvent::ShowRestartPrompt);
    }

    /// Restart button press. Ignored unless the prompt is interactive.
    pub fn press_restart(&mut self, now_ms: f64) -> bool {
        if !self.prompt.interactive {
            return false;
        }
        self.prompt = PromptState::default();
        self.timeline.schedule(now_ms + RELOAD_FADE_MS, UiEvent::Reload);
        true
    }

    /// Apply due UI events
    pub fn update(&mut self, now_ms: f64) {
        for event in self.timeline.poll(now_ms) {
            match event {
                UiEvent::ShowRestartPrompt => {
                    self.banner.opacity = 0.0;
                    self.banner.visible = false;
                    self.prompt = PromptState {
                        visible: true,
                        interactive: true,
                    };
                    log::info!("Restart prompt shown");
                }
                UiEvent::Reload => {
                    self.reload_requested = true;
                    log::info!("Reload requested");
                }
            }
        }
    }

    pub fn reload_requested(&self) -> bool {
        self.reload_requested
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }
}
