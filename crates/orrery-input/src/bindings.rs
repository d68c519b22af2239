//! The application's key bindings, resolved once per frame into a
//! [`FrameInput`] so the rest of the app never touches key codes.
//!
//! Discrete actions fire on the press transition; held keys produce
//! continuous axes the frame loop scales by elapsed time.

use glam::Vec3;
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::keyboard::KeyboardState;

/// Everything the frame loop wants to know about this frame's input.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// Space: pause/resume the simulation.
    pub toggle_animation: bool,
    /// N: fly the camera to the next body.
    pub focus_next_body: bool,
    /// R: snap the camera back to the home vantage point.
    pub return_to_start: bool,
    /// Escape: quit.
    pub quit: bool,
    /// Numpad 4/6, 3/9, 8/2: move the point light, unit axis values.
    pub light_move: Vec3,
    /// Home/End: raise/lower point light intensity, in `{-1, 0, 1}`.
    pub light_intensity: f32,
    /// V/B: grow/shrink the point light radius, in `{-1, 0, 1}`.
    pub light_radius: f32,
    /// PageUp/PageDown: raise/lower ambient intensity, in `{-1, 0, 1}`.
    pub ambient: f32,
}

fn axis(keyboard: &KeyboardState, positive: KeyCode, negative: KeyCode) -> f32 {
    let mut value = 0.0;
    if keyboard.is_held(PhysicalKey::Code(positive)) {
        value += 1.0;
    }
    if keyboard.is_held(PhysicalKey::Code(negative)) {
        value -= 1.0;
    }
    value
}

impl FrameInput {
    /// Resolve the binding table against the current keyboard state.
    pub fn read(keyboard: &KeyboardState) -> Self {
        Self {
            toggle_animation: keyboard.just_pressed(PhysicalKey::Code(KeyCode::Space)),
            focus_next_body: keyboard.just_pressed(PhysicalKey::Code(KeyCode::KeyN)),
            return_to_start: keyboard.just_pressed(PhysicalKey::Code(KeyCode::KeyR)),
            quit: keyboard.just_pressed(PhysicalKey::Code(KeyCode::Escape)),
            light_move: Vec3::new(
                axis(keyboard, KeyCode::Numpad6, KeyCode::Numpad4),
                axis(keyboard, KeyCode::Numpad9, KeyCode::Numpad3),
                axis(keyboard, KeyCode::Numpad2, KeyCode::Numpad8),
            ),
            light_intensity: axis(keyboard, KeyCode::Home, KeyCode::End),
            light_radius: axis(keyboard, KeyCode::KeyV, KeyCode::KeyB),
            ambient: axis(keyboard, KeyCode::PageUp, KeyCode::PageDown),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::event::ElementState;

    fn press(kb: &mut KeyboardState, code: KeyCode) {
        kb.process(PhysicalKey::Code(code), ElementState::Pressed);
    }

    #[test]
    fn test_idle_keyboard_produces_default_input() {
        let kb = KeyboardState::new();
        assert_eq!(FrameInput::read(&kb), FrameInput::default());
    }

    #[test]
    fn test_discrete_actions_fire_on_press_only() {
        let mut kb = KeyboardState::new();
        press(&mut kb, KeyCode::Space);
        press(&mut kb, KeyCode::KeyN);
        let input = FrameInput::read(&kb);
        assert!(input.toggle_animation);
        assert!(input.focus_next_body);

        kb.end_frame();
        let next = FrameInput::read(&kb);
        assert!(!next.toggle_animation);
        assert!(!next.focus_next_body);
    }

    #[test]
    fn test_light_movement_axes() {
        let mut kb = KeyboardState::new();
        press(&mut kb, KeyCode::Numpad6);
        press(&mut kb, KeyCode::Numpad9);
        press(&mut kb, KeyCode::Numpad8);
        let input = FrameInput::read(&kb);
        assert_eq!(input.light_move, Vec3::new(1.0, 1.0, -1.0));
    }

    #[test]
    fn test_opposing_keys_cancel() {
        let mut kb = KeyboardState::new();
        press(&mut kb, KeyCode::Numpad4);
        press(&mut kb, KeyCode::Numpad6);
        let input = FrameInput::read(&kb);
        assert_eq!(input.light_move.x, 0.0);
    }

    #[test]
    fn test_held_axes_persist_across_frames() {
        let mut kb = KeyboardState::new();
        press(&mut kb, KeyCode::KeyV);
        kb.end_frame();
        kb.end_frame();
        assert_eq!(FrameInput::read(&kb).light_radius, 1.0);
    }
}
