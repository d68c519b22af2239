//! UV sphere mesh generation.
//!
//! Every body (and the light proxy) is drawn as the same unit sphere,
//! scaled per object by its model matrix. A lat/long parameterization is
//! used because equirectangular planet textures map onto it directly.

use crate::buffer::VertexPositionNormalUv;

/// CPU-side sphere mesh.
pub struct SphereMesh {
    pub vertices: Vec<VertexPositionNormalUv>,
    pub indices: Vec<u32>,
}

/// Generate a unit-radius UV sphere.
///
/// `stacks` is the number of latitude bands (>= 3), `slices` the number of
/// longitude segments (>= 3). The seam column is duplicated so texture
/// coordinates wrap cleanly.
pub fn generate_uv_sphere(stacks: u32, slices: u32) -> SphereMesh {
    let stacks = stacks.max(3);
    let slices = slices.max(3);

    let mut vertices =
        Vec::with_capacity(((stacks + 1) * (slices + 1)) as usize);
    for stack in 0..=stacks {
        // phi: 0 at the north pole, pi at the south pole.
        let v = stack as f32 / stacks as f32;
        let phi = v * std::f32::consts::PI;
        for slice in 0..=slices {
            let u = slice as f32 / slices as f32;
            let theta = u * std::f32::consts::TAU;

            let position = [
                phi.sin() * theta.cos(),
                phi.cos(),
                phi.sin() * theta.sin(),
            ];
            vertices.push(VertexPositionNormalUv {
                position,
                // Unit sphere: the normal is the position itself.
                normal: position,
                uv: [u, v],
            });
        }
    }

    let mut indices = Vec::with_capacity((stacks * slices * 6) as usize);
    let row = slices + 1;
    for stack in 0..stacks {
        for slice in 0..slices {
            let a = stack * row + slice;
            let b = a + row;
            // Two triangles per quad; the pole rows produce degenerate
            // triangles with zero area, which rasterize to nothing.
            indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }

    SphereMesh { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_vertex_and_index_counts() {
        let mesh = generate_uv_sphere(16, 32);
        assert_eq!(mesh.vertices.len(), 17 * 33);
        assert_eq!(mesh.indices.len(), (16 * 32 * 6) as usize);
        assert_eq!(mesh.indices.len() % 3, 0);
    }

    #[test]
    fn test_positions_are_unit_length() {
        let mesh = generate_uv_sphere(12, 24);
        for v in &mesh.vertices {
            let len = Vec3::from_array(v.position).length();
            assert!((len - 1.0).abs() < 1e-5, "len = {len}");
        }
    }

    #[test]
    fn test_normals_equal_positions() {
        let mesh = generate_uv_sphere(8, 16);
        for v in &mesh.vertices {
            assert_eq!(v.position, v.normal);
        }
    }

    #[test]
    fn test_indices_in_bounds() {
        let mesh = generate_uv_sphere(10, 20);
        let n = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < n));
    }

    #[test]
    fn test_uv_covers_full_range() {
        let mesh = generate_uv_sphere(8, 16);
        let us: Vec<f32> = mesh.vertices.iter().map(|v| v.uv[0]).collect();
        let vs: Vec<f32> = mesh.vertices.iter().map(|v| v.uv[1]).collect();
        assert!(us.iter().any(|&u| u == 0.0) && us.iter().any(|&u| u == 1.0));
        assert!(vs.iter().any(|&v| v == 0.0) && vs.iter().any(|&v| v == 1.0));
    }

    #[test]
    fn test_minimum_tessellation_is_enforced() {
        let mesh = generate_uv_sphere(0, 0);
        assert_eq!(mesh.vertices.len(), 4 * 4);
    }
}
