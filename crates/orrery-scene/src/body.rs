//! A single celestial body: spin and revolution state plus the derived
//! world transform.
//!
//! Bodies are pure kinematics. Each frame [`CelestialBody::advance`] adds
//! `rate * dt` to both accumulated angles and rebuilds the world matrix from
//! scratch; nothing else mutates. A body with a parent orbits the parent's
//! *current* world position, so a moon sweeps around a moving planet which
//! itself sweeps around the origin.

use glam::{Mat4, Quat, Vec3};

use crate::system::BodyId;

/// Construction parameters for one body. All fields are immutable after the
/// body is built; only the two accumulated angles change at runtime.
#[derive(Debug, Clone)]
pub struct BodyParams {
    /// Display name ("Earth", "Moon", ...).
    pub name: String,
    /// Path-like texture identifier, resolved by the render layer at startup.
    pub texture: String,
    /// Spin rate about the body's own axis, radians per second.
    pub rotation_rate: f32,
    /// Orbit sweep rate around the parent (or origin), radians per second.
    pub revolution_rate: f32,
    /// Fixed inclination of the spin axis, radians about local Z.
    pub axial_tilt: f32,
    /// Radius of the circular orbit.
    pub orbital_distance: f32,
    /// Uniform size factor.
    pub scale: f32,
    /// Body the orbit is centered on; `None` orbits the origin.
    pub parent: Option<BodyId>,
    /// Whether external shading lights this body. False only for the sun,
    /// which emits rather than receives light.
    pub lit: bool,
}

/// One sun, planet, or moon.
///
/// Owned by a [`SolarSystem`](crate::system::SolarSystem) arena; the parent
/// link is an index into that arena, never a pointer.
#[derive(Debug, Clone)]
pub struct CelestialBody {
    name: String,
    texture: String,
    rotation_rate: f32,
    revolution_rate: f32,
    axial_tilt: f32,
    orbital_distance: f32,
    scale: f32,
    parent: Option<BodyId>,
    lit: bool,
    rotation_angle: f32,
    revolution_angle: f32,
    world_matrix: Mat4,
}

impl CelestialBody {
    /// Creates a body at angle zero. The world matrix is immediately derived
    /// from the given parent position so it is valid before the first update.
    pub fn new(params: BodyParams, parent_position: Option<Vec3>) -> Self {
        let mut body = Self {
            name: params.name,
            texture: params.texture,
            rotation_rate: params.rotation_rate,
            revolution_rate: params.revolution_rate,
            axial_tilt: params.axial_tilt,
            orbital_distance: params.orbital_distance,
            scale: params.scale,
            parent: params.parent,
            lit: params.lit,
            rotation_angle: 0.0,
            revolution_angle: 0.0,
            world_matrix: Mat4::IDENTITY,
        };
        body.recompute(parent_position);
        body
    }

    /// Advances both angles by `rate * dt` and rebuilds the world matrix.
    ///
    /// `parent_position` must be the parent's world translation *after* the
    /// parent's own advance this frame; the owning system guarantees that by
    /// updating bodies in arena order.
    pub fn advance(&mut self, dt: f32, parent_position: Option<Vec3>) {
        self.rotation_angle += self.rotation_rate * dt;
        self.revolution_angle += self.revolution_rate * dt;
        self.recompute(parent_position);
    }

    /// Re-derives the world matrix from the current angles and the given
    /// parent position. Pure: calling this any number of times without an
    /// intervening [`advance`](Self::advance) yields the same matrix.
    ///
    /// Composition, applied right-to-left to model-space points:
    /// scale, spin about local Y, fixed tilt about local Z, translation out
    /// to the orbit radius, revolution sweep about Y, and finally the
    /// parent's world translation (identity for root bodies, which orbit
    /// the origin).
    pub fn recompute(&mut self, parent_position: Option<Vec3>) {
        let center = parent_position.unwrap_or(Vec3::ZERO);
        self.world_matrix = Mat4::from_translation(center)
            * Mat4::from_rotation_y(self.revolution_angle)
            * Mat4::from_translation(Vec3::new(self.orbital_distance, 0.0, 0.0))
            * Mat4::from_rotation_z(self.axial_tilt)
            * Mat4::from_rotation_y(self.rotation_angle)
            * Mat4::from_scale(Vec3::splat(self.scale));
    }

    /// The orbit-only offset from the orbit center at the current revolution
    /// angle. For any body, `world_position == center + orbit_offset`.
    pub fn orbit_offset(&self) -> Vec3 {
        Vec3::new(
            self.orbital_distance * self.revolution_angle.cos(),
            0.0,
            -self.orbital_distance * self.revolution_angle.sin(),
        )
    }

    /// The world transform for this frame.
    pub fn world_matrix(&self) -> Mat4 {
        self.world_matrix
    }

    /// Translation component of the world matrix.
    pub fn world_position(&self) -> Vec3 {
        self.world_matrix.w_axis.truncate()
    }

    /// Spin, tilt and scale expressed without the orbit placement; used by
    /// the renderer for normal transforms.
    pub fn spin_rotation(&self) -> Quat {
        Quat::from_rotation_z(self.axial_tilt) * Quat::from_rotation_y(self.rotation_angle)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn texture(&self) -> &str {
        &self.texture
    }

    pub fn parent(&self) -> Option<BodyId> {
        self.parent
    }

    pub fn lit(&self) -> bool {
        self.lit
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn rotation_angle(&self) -> f32 {
        self.rotation_angle
    }

    pub fn revolution_angle(&self) -> f32 {
        self.revolution_angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(orbital_distance: f32, revolution_rate: f32) -> BodyParams {
        BodyParams {
            name: "test".to_string(),
            texture: "test.png".to_string(),
            rotation_rate: 0.0,
            revolution_rate,
            axial_tilt: 0.0,
            orbital_distance,
            scale: 1.0,
            parent: None,
            lit: true,
        }
    }

    #[test]
    fn test_parentless_orbit_centered_at_origin() {
        // revolution_rate 1.0 and dt = theta gives revolution_angle = theta.
        let theta = 0.7_f32;
        let d = 200.0_f32;
        let mut body = CelestialBody::new(params(d, 1.0), None);
        body.advance(theta, None);

        let pos = body.world_position();
        assert!((pos.x - d * theta.cos()).abs() < 1e-3, "x = {}", pos.x);
        assert!(pos.y.abs() < 1e-3, "y = {}", pos.y);
        assert!((pos.z + d * theta.sin()).abs() < 1e-3, "z = {}", pos.z);
    }

    #[test]
    fn test_world_position_matches_orbit_offset() {
        let mut body = CelestialBody::new(params(50.0, 2.0), None);
        body.advance(0.33, None);
        let diff = (body.world_position() - body.orbit_offset()).length();
        assert!(diff < 1e-4, "diff = {diff}");
    }

    #[test]
    fn test_child_position_is_parent_plus_offset() {
        let parent_pos = Vec3::new(120.0, 0.0, -40.0);
        let mut child = CelestialBody::new(params(10.0, 3.0), Some(parent_pos));
        child.advance(0.5, Some(parent_pos));

        let expected = parent_pos + child.orbit_offset();
        let diff = (child.world_position() - expected).length();
        assert!(diff < 1e-4, "diff = {diff}");
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let mut body = CelestialBody::new(
            BodyParams {
                rotation_rate: 5.0,
                axial_tilt: 0.41,
                ..params(200.0, 0.4)
            },
            None,
        );
        body.advance(1.25, None);
        let first = body.world_matrix();
        body.recompute(None);
        body.recompute(None);
        assert_eq!(first, body.world_matrix());
    }

    #[test]
    fn test_angle_accumulation_linear_in_time() {
        let mut twice = CelestialBody::new(params(1.0, 0.9), None);
        twice.advance(0.25, None);
        twice.advance(0.25, None);

        let mut once = CelestialBody::new(params(1.0, 0.9), None);
        once.advance(0.5, None);

        assert!((twice.revolution_angle() - once.revolution_angle()).abs() < 1e-6);
        assert!((twice.rotation_angle() - once.rotation_angle()).abs() < 1e-6);
    }

    #[test]
    fn test_tilt_and_spin_do_not_move_position() {
        let plain = {
            let mut b = CelestialBody::new(params(80.0, 1.1), None);
            b.advance(0.6, None);
            b.world_position()
        };
        let tilted = {
            let mut b = CelestialBody::new(
                BodyParams {
                    rotation_rate: 7.0,
                    axial_tilt: 1.2,
                    ..params(80.0, 1.1)
                },
                None,
            );
            b.advance(0.6, None);
            b.world_position()
        };
        assert!((plain - tilted).length() < 1e-4);
    }

    #[test]
    fn test_scale_applies_in_body_frame_only() {
        let mut body = CelestialBody::new(
            BodyParams {
                scale: 11.19,
                ..params(100.0, 0.5)
            },
            None,
        );
        body.advance(1.0, None);
        // The basis vectors carry the scale; the translation does not.
        let m = body.world_matrix();
        assert!((m.x_axis.truncate().length() - 11.19).abs() < 1e-3);
        assert!((body.world_position().length() - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_angles_accumulate_beyond_tau() {
        let mut body = CelestialBody::new(params(1.0, 10.0), None);
        body.advance(10.0, None);
        // Angles are unbounded accumulators, not wrapped mod 2π.
        assert!(body.revolution_angle() > std::f32::consts::TAU);
    }
}
