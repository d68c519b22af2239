//! Keyboard input: frame-coherent key state and the orrery's binding table.

pub mod bindings;
pub mod keyboard;

pub use bindings::FrameInput;
pub use keyboard::KeyboardState;
