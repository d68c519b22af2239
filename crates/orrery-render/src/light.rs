//! The scene's movable point light and its GPU uniform.
//!
//! The scene has exactly one light, sitting at the sun and steered by the
//! keyboard, so there is no culling or light list here, just one CPU struct,
//! one uniform.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// CPU-side point light.
#[derive(Clone, Debug)]
pub struct PointLight {
    /// Position in world space.
    pub position: Vec3,
    /// Linear RGB color, each channel in `[0, 1]`.
    pub color: Vec3,
    /// Maximum radius of effect; contribution reaches zero there.
    pub radius: f32,
}

impl PointLight {
    /// White light of the given radius at a position.
    pub fn new(position: Vec3, radius: f32) -> Self {
        Self {
            position,
            color: Vec3::ONE,
            radius,
        }
    }

    /// Move the light by a world-space delta.
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }

    /// Add `delta` to all color channels, clamped to `[0, 1]`.
    pub fn adjust_intensity(&mut self, delta: f32) {
        let level = (self.color.x + delta).clamp(0.0, 1.0);
        self.color = Vec3::splat(level);
    }

    /// Grow or shrink the radius, never below zero.
    pub fn adjust_radius(&mut self, delta: f32) {
        self.radius = (self.radius + delta).max(0.0);
    }

    /// Pack light plus the scene's ambient level into the GPU uniform.
    pub fn to_uniform(&self, ambient: f32) -> LightUniform {
        LightUniform {
            position_radius: [self.position.x, self.position.y, self.position.z, self.radius],
            color_ambient: [self.color.x, self.color.y, self.color.z, ambient],
        }
    }
}

/// Per-frame light data, 32 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct LightUniform {
    /// xyz = world position, w = radius.
    pub position_radius: [f32; 4],
    /// xyz = linear RGB color, w = ambient intensity.
    pub color_ambient: [f32; 4],
}

/// Attenuation at a given distance from the light.
///
/// Inverse-square falloff with a smooth window that reaches exactly zero at
/// the cutoff radius. Returns a value in `[0, 1]`. Mirrors the WGSL in the
/// body shader so tests can pin the curve.
pub fn attenuation(distance: f32, radius: f32) -> f32 {
    if distance >= radius || radius <= 0.0 {
        return 0.0;
    }
    let inv_sq = 1.0 / (distance * distance + 1.0);
    let ratio = distance / radius;
    let t = (1.0 - ratio * ratio).max(0.0);
    inv_sq * t * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_intensity_at_source() {
        assert!((attenuation(0.0, 100.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_at_and_beyond_radius() {
        assert_eq!(attenuation(10.0, 10.0), 0.0);
        assert_eq!(attenuation(25.0, 10.0), 0.0);
    }

    #[test]
    fn test_zero_radius_light_is_dark() {
        assert_eq!(attenuation(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_roughly_inverse_square() {
        let a1 = attenuation(5.0, 1000.0);
        let a2 = attenuation(10.0, 1000.0);
        let ratio = a1 / a2;
        assert!(ratio > 3.0 && ratio < 5.0, "ratio = {ratio}");
    }

    #[test]
    fn test_intensity_clamped_to_unit_range() {
        let mut light = PointLight::new(Vec3::ZERO, 100.0);
        light.adjust_intensity(2.0);
        assert_eq!(light.color, Vec3::ONE);
        light.adjust_intensity(-5.0);
        assert_eq!(light.color, Vec3::ZERO);
    }

    #[test]
    fn test_radius_never_negative() {
        let mut light = PointLight::new(Vec3::ZERO, 5.0);
        light.adjust_radius(-20.0);
        assert_eq!(light.radius, 0.0);
    }

    #[test]
    fn test_uniform_layout() {
        assert_eq!(std::mem::size_of::<LightUniform>(), 32);
        let light = PointLight::new(Vec3::new(1.0, 2.0, 3.0), 40.0);
        let uniform = light.to_uniform(0.25);
        assert_eq!(uniform.position_radius, [1.0, 2.0, 3.0, 40.0]);
        assert_eq!(uniform.color_ambient[3], 0.25);
    }
}
