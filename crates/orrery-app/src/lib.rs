//! Application shell: window, event loop, frame clock, and camera rig.

pub mod camera_rig;
pub mod frame_clock;
pub mod window;

pub use camera_rig::{CameraRig, HOME_POSITION, HOME_TARGET};
pub use frame_clock::{FrameClock, MAX_FRAME_TIME};
pub use window::{OrreryApp, run, window_attributes_from_config};
