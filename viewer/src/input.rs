//! Keyboard state and key bindings.

use std::collections::HashSet;

use winit::event::ElementState;
use winit::keyboard::KeyCode;

/// Actions fired on key press (edge-triggered). Held movement keys are
/// queried separately each frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Quit,
    ToggleWireframe,
    SelectTechnique(usize),
}

/// Binding for a key press, if any. Digits 1-9 select a shadow technique by
/// registry position, 0-based.
pub fn action_for(key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::Escape => Some(Action::Quit),
        KeyCode::KeyL => Some(Action::ToggleWireframe),
        KeyCode::Digit1 => Some(Action::SelectTechnique(0)),
        KeyCode::Digit2 => Some(Action::SelectTechnique(1)),
        KeyCode::Digit3 => Some(Action::SelectTechnique(2)),
        KeyCode::Digit4 => Some(Action::SelectTechnique(3)),
        KeyCode::Digit5 => Some(Action::SelectTechnique(4)),
        KeyCode::Digit6 => Some(Action::SelectTechnique(5)),
        KeyCode::Digit7 => Some(Action::SelectTechnique(6)),
        KeyCode::Digit8 => Some(Action::SelectTechnique(7)),
        KeyCode::Digit9 => Some(Action::SelectTechnique(8)),
        _ => None,
    }
}

/// Tracks which keys are currently held, and reports press edges.
#[derive(Default)]
pub struct InputState {
    held: HashSet<KeyCode>,
}

impl InputState {
    /// Record a key event. Returns true if this is a fresh press (not a
    /// repeat), which is when edge-triggered actions should fire.
    pub fn record(&mut self, key: KeyCode, state: ElementState) -> bool {
        match state {
            ElementState::Pressed => self.held.insert(key),
            ElementState::Released => {
                self.held.remove(&key);
                false
            }
        }
    }

    pub fn is_held(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    /// Forward/strafe axes from the held WASD keys, each in {-1, 0, 1}.
    pub fn movement_axes(&self) -> (f32, f32) {
        let mut forward = 0.0;
        let mut strafe = 0.0;
        if self.is_held(KeyCode::KeyW) {
            forward += 1.0;
        }
        if self.is_held(KeyCode::KeyS) {
            forward -= 1.0;
        }
        if self.is_held(KeyCode::KeyD) {
            strafe += 1.0;
        }
        if self.is_held(KeyCode::KeyA) {
            strafe -= 1.0;
        }
        (forward, strafe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_map_to_zero_based_indices() {
        assert_eq!(action_for(KeyCode::Digit1), Some(Action::SelectTechnique(0)));
        assert_eq!(action_for(KeyCode::Digit3), Some(Action::SelectTechnique(2)));
        assert_eq!(action_for(KeyCode::Digit9), Some(Action::SelectTechnique(8)));
        assert_eq!(action_for(KeyCode::Digit0), None);
    }

    #[test]
    fn record_reports_press_edges_only() {
        let mut input = InputState::default();
        assert!(input.record(KeyCode::KeyL, ElementState::Pressed));
        // OS key repeat shows up as another Pressed without a Released.
        assert!(!input.record(KeyCode::KeyL, ElementState::Pressed));
        assert!(!input.record(KeyCode::KeyL, ElementState::Released));
        assert!(input.record(KeyCode::KeyL, ElementState::Pressed));
    }

    #[test]
    fn opposing_movement_keys_cancel() {
        let mut input = InputState::default();
        input.record(KeyCode::KeyW, ElementState::Pressed);
        input.record(KeyCode::KeyS, ElementState::Pressed);
        input.record(KeyCode::KeyD, ElementState::Pressed);
        assert_eq!(input.movement_axes(), (0.0, 1.0));
        input.record(KeyCode::KeyS, ElementState::Released);
        assert_eq!(input.movement_axes(), (1.0, 1.0));
    }
}
