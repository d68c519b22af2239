//! Star skybox: a deterministic procedural star cubemap drawn behind the
//! scene with a fullscreen triangle.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Width/height of each generated cubemap face.
pub const FACE_SIZE: u32 = 512;

/// A baked star cubemap: six RGBA8 faces.
pub struct StarCubemap {
    pub face_size: u32,
    pub faces: [Vec<u8>; 6],
}

impl StarCubemap {
    /// Generate a star cubemap. Deterministic for a given seed.
    ///
    /// Stars are uniformly distributed over the sphere with a power-law
    /// brightness (many dim, few bright) and a slight warm/cool tint.
    pub fn generate(seed: u64, star_count: u32, face_size: u32) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let pixel_bytes = (face_size * face_size * 4) as usize;
        let mut faces: [Vec<u8>; 6] = std::array::from_fn(|_| {
            let mut face = vec![0u8; pixel_bytes];
            // Opaque black background.
            for px in face.chunks_exact_mut(4) {
                px[3] = 255;
            }
            face
        });

        for _ in 0..star_count {
            // Uniform direction on the sphere.
            let theta = rng.random::<f32>() * std::f32::consts::TAU;
            let phi = (1.0 - 2.0 * rng.random::<f32>()).acos();
            let dir = Vec3::new(
                phi.sin() * theta.cos(),
                phi.cos(),
                phi.sin() * theta.sin(),
            );

            let brightness = rng.random::<f32>().powf(3.0);
            // Tint: cool blue-white for bright stars, dull red for dim ones.
            let warm = 1.0 - brightness * 0.4;
            let value = 60.0 + brightness * 195.0;
            let rgb = [
                (value * warm) as u8,
                (value * (0.85 + 0.15 * brightness)) as u8,
                (value * (0.7 + 0.3 * brightness)) as u8,
            ];

            let (face, u, v) = direction_to_face_uv(dir);
            let x = ((u * face_size as f32) as u32).min(face_size - 1);
            let y = ((v * face_size as f32) as u32).min(face_size - 1);
            let idx = ((y * face_size + x) * 4) as usize;
            let px = &mut faces[face][idx..idx + 3];
            px[0] = px[0].saturating_add(rgb[0]);
            px[1] = px[1].saturating_add(rgb[1]);
            px[2] = px[2].saturating_add(rgb[2]);
        }

        Self { face_size, faces }
    }
}

/// Map a unit direction to a cube face index (0=+X .. 5=-Z) and face UVs
/// in `[0, 1]`, matching wgpu's cube array layer order.
fn direction_to_face_uv(dir: Vec3) -> (usize, f32, f32) {
    let abs = dir.abs();
    let (face, u, v) = if abs.x >= abs.y && abs.x >= abs.z {
        if dir.x > 0.0 {
            (0, -dir.z / abs.x, -dir.y / abs.x)
        } else {
            (1, dir.z / abs.x, -dir.y / abs.x)
        }
    } else if abs.y >= abs.x && abs.y >= abs.z {
        if dir.y > 0.0 {
            (2, dir.x / abs.y, dir.z / abs.y)
        } else {
            (3, dir.x / abs.y, -dir.z / abs.y)
        }
    } else if dir.z > 0.0 {
        (4, dir.x / abs.z, -dir.y / abs.z)
    } else {
        (5, -dir.x / abs.z, -dir.y / abs.z)
    };
    (face, u * 0.5 + 0.5, v * 0.5 + 0.5)
}

/// Skybox uniform: inverse view-projection for direction reconstruction.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct SkyboxUniform {
    pub inv_view_proj: [[f32; 4]; 4],
}

/// WGSL for the skybox pass: fullscreen triangle, cubemap sampled along the
/// reconstructed view direction.
pub const SKYBOX_SHADER_SOURCE: &str = r#"
struct SkyboxUniform {
    inv_view_proj: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> skybox: SkyboxUniform;

@group(1) @binding(0)
var skybox_texture: texture_cube<f32>;
@group(1) @binding(1)
var skybox_sampler: sampler;

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) view_dir: vec3<f32>,
};

@vertex
fn vs_skybox(@builtin(vertex_index) idx: u32) -> VertexOutput {
    let uv = vec2<f32>(f32((idx << 1u) & 2u), f32(idx & 2u));
    let ndc = uv * 2.0 - 1.0;

    let clip_far = vec4<f32>(ndc.x, ndc.y, 1.0, 1.0);
    let world = skybox.inv_view_proj * clip_far;
    let view_dir = normalize(world.xyz / world.w);

    var out: VertexOutput;
    out.position = vec4<f32>(ndc.x, ndc.y, 1.0, 1.0);
    out.view_dir = view_dir;
    return out;
}

@fragment
fn fs_skybox(in: VertexOutput) -> @location(0) vec4<f32> {
    return textureSample(skybox_texture, skybox_sampler, in.view_dir);
}
"#;

/// GPU skybox renderer.
pub struct SkyboxRenderer {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    cubemap_bind_group: wgpu::BindGroup,
}

impl SkyboxRenderer {
    /// Create the skybox pipeline and upload the cubemap.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        cubemap: &StarCubemap,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("skybox-shader"),
            source: wgpu::ShaderSource::Wgsl(SKYBOX_SHADER_SOURCE.into()),
        });

        let uniform_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("skybox-uniform-bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: std::num::NonZeroU64::new(64),
                },
                count: None,
            }],
        });

        let cubemap_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("skybox-cubemap-bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::Cube,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("skybox-pipeline-layout"),
            bind_group_layouts: &[&uniform_bgl, &cubemap_bgl],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("skybox-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_skybox"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            // Drawn into the same pass as the bodies: test at the far plane
            // but never write, so bodies always occlude the stars.
            depth_stencil: Some(wgpu::DepthStencilState {
                format: crate::depth::DepthBuffer::FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_skybox"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("star-cubemap"),
            size: wgpu::Extent3d {
                width: cubemap.face_size,
                height: cubemap.face_size,
                depth_or_array_layers: 6,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (i, face) in cubemap.faces.iter().enumerate() {
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d {
                        x: 0,
                        y: 0,
                        z: i as u32,
                    },
                    aspect: wgpu::TextureAspect::All,
                },
                face,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(cubemap.face_size * 4),
                    rows_per_image: Some(cubemap.face_size),
                },
                wgpu::Extent3d {
                    width: cubemap.face_size,
                    height: cubemap.face_size,
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            dimension: Some(wgpu::TextureViewDimension::Cube),
            ..Default::default()
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("skybox-sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let cubemap_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("skybox-cubemap-bg"),
            layout: &cubemap_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        use wgpu::util::DeviceExt;
        let uniform = SkyboxUniform {
            inv_view_proj: Mat4::IDENTITY.to_cols_array_2d(),
        };
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("skybox-uniform"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("skybox-uniform-bg"),
            layout: &uniform_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Self {
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            cubemap_bind_group,
        }
    }

    /// Upload this frame's inverse view-projection. Translation is stripped
    /// so the sky stays at infinity.
    pub fn update(&self, queue: &wgpu::Queue, view_proj_rotation_only: Mat4) {
        let uniform = SkyboxUniform {
            inv_view_proj: view_proj_rotation_only.inverse().to_cols_array_2d(),
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    /// Draw the skybox as the first thing in a pass.
    pub fn draw<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        render_pass.set_bind_group(1, &self.cubemap_bind_group, &[]);
        render_pass.draw(0..3, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_is_deterministic() {
        let a = StarCubemap::generate(7, 2000, 64);
        let b = StarCubemap::generate(7, 2000, 64);
        for (fa, fb) in a.faces.iter().zip(&b.faces) {
            assert_eq!(fa, fb);
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = StarCubemap::generate(1, 2000, 64);
        let b = StarCubemap::generate(2, 2000, 64);
        assert!(a.faces.iter().zip(&b.faces).any(|(fa, fb)| fa != fb));
    }

    #[test]
    fn test_faces_sized_for_rgba8_upload() {
        let cubemap = StarCubemap::generate(0, 100, 32);
        for face in &cubemap.faces {
            assert_eq!(face.len(), 32 * 32 * 4);
        }
    }

    #[test]
    fn test_background_is_opaque() {
        let cubemap = StarCubemap::generate(3, 10, 16);
        for face in &cubemap.faces {
            assert!(face.chunks_exact(4).all(|px| px[3] == 255));
        }
    }

    #[test]
    fn test_axis_directions_map_to_matching_faces() {
        assert_eq!(direction_to_face_uv(Vec3::X).0, 0);
        assert_eq!(direction_to_face_uv(Vec3::NEG_X).0, 1);
        assert_eq!(direction_to_face_uv(Vec3::Y).0, 2);
        assert_eq!(direction_to_face_uv(Vec3::NEG_Y).0, 3);
        assert_eq!(direction_to_face_uv(Vec3::Z).0, 4);
        assert_eq!(direction_to_face_uv(Vec3::NEG_Z).0, 5);
    }

    #[test]
    fn test_face_uv_centered_on_axis() {
        let (_, u, v) = direction_to_face_uv(Vec3::X);
        assert!((u - 0.5).abs() < 1e-6);
        assert!((v - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_some_stars_are_lit() {
        let cubemap = StarCubemap::generate(42, 5000, 64);
        let lit: usize = cubemap
            .faces
            .iter()
            .flat_map(|f| f.chunks_exact(4))
            .filter(|px| px[0] > 0 || px[1] > 0 || px[2] > 0)
            .count();
        assert!(lit > 1000, "only {lit} lit pixels");
    }
}
