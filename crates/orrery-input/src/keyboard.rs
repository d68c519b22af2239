//! Frame-coherent keyboard state.
//!
//! Accumulates winit key events during a frame and answers two questions per
//! physical key: is it held, and did it transition to pressed this frame.
//! Physical key codes are used so the bindings are layout-independent.

use std::collections::HashSet;
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::PhysicalKey;

/// Per-frame keyboard state.
///
/// Forward every [`KeyEvent`] to [`process_event`](Self::process_event),
/// query during the frame, then call [`end_frame`](Self::end_frame).
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HashSet<PhysicalKey>,
    pressed_this_frame: HashSet<PhysicalKey>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a winit [`KeyEvent`]. Repeat events are ignored so a held key
    /// registers as pressed exactly once.
    pub fn process_event(&mut self, event: &KeyEvent) {
        if event.repeat {
            return;
        }
        self.process(event.physical_key, event.state);
    }

    /// Process a key transition (platform-independent, test-friendly).
    pub fn process(&mut self, key: PhysicalKey, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.held.insert(key) {
                    self.pressed_this_frame.insert(key);
                }
            }
            ElementState::Released => {
                self.held.remove(&key);
            }
        }
    }

    /// True while the key is held down.
    pub fn is_held(&self, key: PhysicalKey) -> bool {
        self.held.contains(&key)
    }

    /// True only during the frame the key transitioned to pressed.
    pub fn just_pressed(&self, key: PhysicalKey) -> bool {
        self.pressed_this_frame.contains(&key)
    }

    /// Clear the per-frame transition set. Call at end of frame.
    pub fn end_frame(&mut self) {
        self.pressed_this_frame.clear();
    }
}
