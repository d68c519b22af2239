//! Orbit camera rig: fly-to-body navigation and the fixed home vantage.
//!
//! The rig owns a current and a desired pose. Each frame the current pose is
//! eased toward the desired one with exponential smoothing, which gives a
//! frame-rate independent fly-to without a scripted path.

use glam::Vec3;
use orrery_render::Camera;

/// The authored starting vantage: high over the ecliptic, whole inner system
/// in frame. A constant, never derived from body state.
pub const HOME_POSITION: Vec3 = Vec3::new(0.0, 250.0, 1200.0);

/// What the home vantage looks at.
pub const HOME_TARGET: Vec3 = Vec3::ZERO;

/// Smoothing rate in 1/seconds. Higher converges faster.
const FLY_RATE: f32 = 2.5;

/// Minimum stand-off from a focused body, in scene units.
const MIN_STANDOFF: f32 = 12.0;

/// Eased orbit camera aimed at a focus point.
pub struct CameraRig {
    position: Vec3,
    target: Vec3,
    desired_position: Vec3,
    desired_target: Vec3,
}

impl CameraRig {
    /// Start at the home vantage.
    pub fn home() -> Self {
        Self {
            position: HOME_POSITION,
            target: HOME_TARGET,
            desired_position: HOME_POSITION,
            desired_target: HOME_TARGET,
        }
    }

    /// Begin flying toward a body. The stand-off distance scales with the
    /// body so small moons fill the frame about as much as gas giants.
    pub fn fly_to(&mut self, body_position: Vec3, body_scale: f32) {
        let standoff = (body_scale * 8.0).max(MIN_STANDOFF);
        self.desired_target = body_position;
        self.desired_position = body_position + Vec3::new(0.0, standoff * 0.35, standoff);
    }

    /// Snap back to the home vantage immediately.
    pub fn return_home(&mut self) {
        self.position = HOME_POSITION;
        self.target = HOME_TARGET;
        self.desired_position = HOME_POSITION;
        self.desired_target = HOME_TARGET;
    }

    /// Ease the current pose toward the desired one.
    pub fn update(&mut self, dt: f32) {
        // 1 - e^(-rate*dt) is the per-frame blend that makes the easing
        // independent of frame rate.
        let blend = 1.0 - (-FLY_RATE * dt).exp();
        self.position = self.position.lerp(self.desired_position, blend);
        self.target = self.target.lerp(self.desired_target, blend);
    }

    /// Write the rig pose into the render camera.
    pub fn apply_to(&self, camera: &mut Camera) {
        camera.position = self.position;
        camera.look_at(self.target);
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }
}
