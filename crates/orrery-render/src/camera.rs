//! Camera: view and projection matrix generation plus the GPU uniform.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};

/// A perspective camera.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Position in world space.
    pub position: Vec3,
    /// Orientation as a unit quaternion.
    pub rotation: Quat,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Width / height.
    pub aspect_ratio: f32,
    /// Near clip plane distance (positive).
    pub near: f32,
    /// Far clip plane distance (positive, > near).
    pub far: f32,
}

/// Camera data uploaded once per frame: view-projection plus the camera
/// position for lighting.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
}

impl Camera {
    /// Compute the view matrix (inverse of the camera's world transform).
    pub fn view_matrix(&self) -> Mat4 {
        let rotation = Mat4::from_quat(self.rotation);
        let translation = Mat4::from_translation(self.position);
        (translation * rotation).inverse()
    }

    /// Compute the perspective projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio, self.near, self.far)
    }

    /// Combined view-projection matrix.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// The forward direction vector (-Z in camera space).
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// The up direction vector (+Y in camera space).
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// The right direction vector (+X in camera space).
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Point the camera at a target position, keeping +Y as up.
    pub fn look_at(&mut self, target: Vec3) {
        let view = Mat4::look_at_rh(self.position, target, Vec3::Y);
        self.rotation = Quat::from_mat4(&view.inverse());
    }

    /// Update the aspect ratio after a window resize.
    pub fn set_aspect_ratio(&mut self, width: f32, height: f32) {
        self.aspect_ratio = width / height.max(1.0);
    }

    /// Convert to a uniform suitable for GPU upload.
    pub fn to_uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_projection_matrix().to_cols_array_2d(),
            camera_pos: [self.position.x, self.position.y, self.position.z, 0.0],
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            fov_y: std::f32::consts::FRAC_PI_4,
            aspect_ratio: 16.0 / 9.0,
            near: 0.5,
            far: 50_000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_camera_looks_down_neg_z() {
        let camera = Camera::default();
        let forward = camera.forward();
        assert!(forward.x.abs() < 1e-6);
        assert!(forward.y.abs() < 1e-6);
        assert!((forward.z + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_view_matrix_inverse_is_camera_transform() {
        let camera = Camera {
            position: Vec3::new(10.0, 20.0, 30.0),
            rotation: Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
            ..Camera::default()
        };
        let inv_view = camera.view_matrix().inverse();
        let reconstructed = inv_view.col(3).truncate();
        assert!((reconstructed - camera.position).length() < 1e-4);
    }

    #[test]
    fn test_look_at_faces_target() {
        let mut camera = Camera {
            position: Vec3::new(0.0, 100.0, 300.0),
            ..Camera::default()
        };
        let target = Vec3::new(200.0, 0.0, 0.0);
        camera.look_at(target);
        let to_target = (target - camera.position).normalize();
        assert!(camera.forward().dot(to_target) > 0.999);
    }

    #[test]
    fn test_basis_vectors_orthonormal() {
        let mut camera = Camera {
            position: Vec3::new(5.0, 2.0, -7.0),
            ..Camera::default()
        };
        camera.look_at(Vec3::ZERO);
        let (f, u, r) = (camera.forward(), camera.up(), camera.right());
        assert!((f.length() - 1.0).abs() < 1e-5);
        assert!((u.length() - 1.0).abs() < 1e-5);
        assert!((r.length() - 1.0).abs() < 1e-5);
        assert!(f.dot(u).abs() < 1e-5);
        assert!(f.dot(r).abs() < 1e-5);
        assert!(u.dot(r).abs() < 1e-5);
    }

    #[test]
    fn test_uniform_carries_camera_position() {
        let camera = Camera {
            position: Vec3::new(1.0, 2.0, 3.0),
            ..Camera::default()
        };
        let uniform = camera.to_uniform();
        assert_eq!(uniform.camera_pos[0], 1.0);
        assert_eq!(uniform.camera_pos[1], 2.0);
        assert_eq!(uniform.camera_pos[2], 3.0);
    }

    #[test]
    fn test_uniform_size_matches_binding() {
        // The pipeline declares an 80-byte min binding size for this uniform.
        assert_eq!(std::mem::size_of::<CameraUniform>(), 80);
    }

    #[test]
    fn test_aspect_ratio_guard_against_zero_height() {
        let mut camera = Camera::default();
        camera.set_aspect_ratio(1280.0, 0.0);
        assert!(camera.aspect_ratio.is_finite());
    }
}
