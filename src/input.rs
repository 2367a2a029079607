//! Driving controls
//!
//! `ControlState` is a snapshot of which actions are held. Whoever owns the
//! window feeds key edges into it between frames; the simulation only reads it.

use serde::{Deserialize, Serialize};

/// A bindable driving action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Accelerate,
    Reverse,
    Left,
    Right,
    Wheelie,
}

impl Action {
    /// Map a key name (DOM `KeyboardEvent.key` / `code` style) to an action
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => return Some(Action::Accelerate),
            "ArrowDown" => return Some(Action::Reverse),
            "ArrowLeft" => return Some(Action::Left),
            "ArrowRight" => return Some(Action::Right),
            " " | "Space" => return Some(Action::Wheelie),
            _ => {}
        }
        match key.to_lowercase().as_str() {
            "w" => Some(Action::Accelerate),
            "s" => Some(Action::Reverse),
            "a" => Some(Action::Left),
            "d" => Some(Action::Right),
            _ => None,
        }
    }
}

/// Which driving actions are currently held down.
///
/// Flags are independent; nothing stops accelerate and reverse being held
/// together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlState {
    pub accelerating: bool,
    pub reversing: bool,
    pub move_left: bool,
    pub move_right: bool,
    pub doing_wheelie: bool,
}

impl ControlState {
    /// Set the flag for `action` (last writer wins)
    pub fn apply(&mut self, action: Action, pressed: bool) {
        match action {
            Action::Accelerate => self.accelerating = pressed,
            Action::Reverse => self.reversing = pressed,
            Action::Left => self.move_left = pressed,
            Action::Right => self.move_right = pressed,
            Action::Wheelie => self.doing_wheelie = pressed,
        }
    }

    /// Feed a key-down (`pressed = true`) or key-up edge.
    /// Returns false for keys with no binding.
    pub fn key_event(&mut self, key: &str, pressed: bool) -> bool {
        match Action::from_key(key) {
            Some(action) => {
                self.apply(action, pressed);
                true
            }
            None => false,
        }
    }

    /// True if either steering key is held
    pub fn steering(&self) -> bool {
        self.move_left || self.move_right
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_bindings() {
        assert_eq!(Action::from_key("ArrowUp"), Some(Action::Accelerate));
        assert_eq!(Action::from_key("W"), Some(Action::Accelerate));
        assert_eq!(Action::from_key("s"), Some(Action::Reverse));
        assert_eq!(Action::from_key("A"), Some(Action::Left));
        assert_eq!(Action::from_key("ArrowRight"), Some(Action::Right));
        assert_eq!(Action::from_key(" "), Some(Action::Wheelie));
        assert_eq!(Action::from_key("Space"), Some(Action::Wheelie));
        assert_eq!(Action::from_key("q"), None);
    }

    #[test]
    fn test_key_edges_last_writer_wins() {
        let mut controls = ControlState::default();
        assert!(controls.key_event("w", true));
        assert!(controls.key_event("ArrowDown", true));
        assert!(controls.accelerating && controls.reversing);

        assert!(controls.key_event("ArrowUp", false));
        assert!(!controls.accelerating);
        assert!(controls.reversing);

        assert!(!controls.key_event("Escape", true));
        assert_eq!(
            controls,
            ControlState {
                reversing: true,
                ..Default::default()
            }
        );
    }
}
