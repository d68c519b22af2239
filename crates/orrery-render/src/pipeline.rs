//! The body render pipeline: textured spheres, lit by the point light or
//! drawn unlit for the emissive sun.
//!
//! One pipeline serves every body. The per-object uniform carries the model
//! matrix and a lit flag; the fragment shader branches on the flag rather
//! than maintaining two near-identical pipelines.

use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::buffer::{MeshBuffer, VertexPositionNormalUv};
use crate::depth::DepthBuffer;

/// Per-object data: world transform plus shading flags.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct ModelUniform {
    pub model: [[f32; 4]; 4],
    /// x > 0.5 selects the lit path; yzw unused.
    pub flags: [f32; 4],
}

impl ModelUniform {
    pub fn new(model: Mat4, lit: bool) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            flags: [if lit { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0],
        }
    }
}

/// Body pipeline: camera at group 0, light at group 1, texture at group 2,
/// per-object model at group 3.
pub struct BodyPipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub camera_bind_group_layout: wgpu::BindGroupLayout,
    pub light_bind_group_layout: wgpu::BindGroupLayout,
    pub model_bind_group_layout: wgpu::BindGroupLayout,
}

impl BodyPipeline {
    /// Create the pipeline. `texture_bind_group_layout` is the layout owned
    /// by the texture manager (group 2).
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        texture_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("body-shader"),
            source: wgpu::ShaderSource::Wgsl(BODY_SHADER_SOURCE.into()),
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("body-camera-bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: NonZeroU64::new(80), // CameraUniform: mat4x4 + vec4
                    },
                    count: None,
                }],
            });

        let light_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("body-light-bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: NonZeroU64::new(32), // LightUniform: two vec4s
                    },
                    count: None,
                }],
            });

        let model_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("body-model-bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: NonZeroU64::new(80), // ModelUniform: mat4x4 + vec4
                    },
                    count: None,
                }],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("body-pipeline-layout"),
            bind_group_layouts: &[
                &camera_bind_group_layout,
                &light_bind_group_layout,
                texture_bind_group_layout,
                &model_bind_group_layout,
            ],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("body-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[VertexPositionNormalUv::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DepthBuffer::FORMAT,
                depth_write_enabled: true,
                depth_compare: DepthBuffer::COMPARE_FUNCTION,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
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

        Self {
            pipeline,
            camera_bind_group_layout,
            light_bind_group_layout,
            model_bind_group_layout,
        }
    }
}

/// Draw one body.
pub fn draw_body<'a>(
    render_pass: &mut wgpu::RenderPass<'a>,
    pipeline: &BodyPipeline,
    camera_bind_group: &'a wgpu::BindGroup,
    light_bind_group: &'a wgpu::BindGroup,
    texture_bind_group: &'a wgpu::BindGroup,
    model_bind_group: &'a wgpu::BindGroup,
    mesh: &'a MeshBuffer,
) {
    render_pass.set_pipeline(&pipeline.pipeline);
    render_pass.set_bind_group(0, camera_bind_group, &[]);
    render_pass.set_bind_group(1, light_bind_group, &[]);
    render_pass.set_bind_group(2, texture_bind_group, &[]);
    render_pass.set_bind_group(3, model_bind_group, &[]);
    mesh.bind(render_pass);
    mesh.draw(render_pass);
}

/// WGSL for the body pass. The attenuation curve matches
/// [`crate::light::attenuation`].
pub const BODY_SHADER_SOURCE: &str = r#"
struct CameraUniform {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
};

struct LightUniform {
    position_radius: vec4<f32>,
    color_ambient: vec4<f32>,
};

struct ModelUniform {
    model: mat4x4<f32>,
    flags: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> camera: CameraUniform;
@group(1) @binding(0)
var<uniform> light: LightUniform;
@group(2) @binding(0)
var t_diffuse: texture_2d<f32>;
@group(2) @binding(1)
var s_diffuse: sampler;
@group(3) @binding(0)
var<uniform> object: ModelUniform;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    let world = object.model * vec4<f32>(in.position, 1.0);
    var out: VertexOutput;
    out.clip_position = camera.view_proj * world;
    out.world_pos = world.xyz;
    // Uniform scale plus rotations only, so the model matrix transforms
    // normals directly (renormalized after interpolation anyway).
    out.world_normal = normalize((object.model * vec4<f32>(in.normal, 0.0)).xyz);
    out.uv = in.uv;
    return out;
}

fn attenuation(distance: f32, radius: f32) -> f32 {
    if (distance >= radius || radius <= 0.0) {
        return 0.0;
    }
    let inv_sq = 1.0 / (distance * distance + 1.0);
    let ratio = distance / radius;
    let t = max(1.0 - ratio * ratio, 0.0);
    return inv_sq * t * t;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let base = textureSample(t_diffuse, s_diffuse, in.uv);
    if (object.flags.x < 0.5) {
        // Unlit: the sun emits, it does not receive.
        return base;
    }

    let to_light = light.position_radius.xyz - in.world_pos;
    let distance = length(to_light);
    let n = normalize(in.world_normal);
    let l = to_light / max(distance, 1e-4);
    let n_dot_l = max(dot(n, l), 0.0);
    let atten = attenuation(distance, light.position_radius.w);

    let ambient = light.color_ambient.w;
    let diffuse = light.color_ambient.xyz * n_dot_l * atten;
    let shaded = base.rgb * (diffuse + vec3<f32>(ambient));
    return vec4<f32>(shaded, base.a);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_uniform_layout() {
        // Bind group layout declares 80 bytes.
        assert_eq!(std::mem::size_of::<ModelUniform>(), 80);
    }

    #[test]
    fn test_lit_flag_encoding() {
        let lit = ModelUniform::new(Mat4::IDENTITY, true);
        let unlit = ModelUniform::new(Mat4::IDENTITY, false);
        assert_eq!(lit.flags[0], 1.0);
        assert_eq!(unlit.flags[0], 0.0);
    }

    #[test]
    fn test_model_matrix_round_trips() {
        let m = Mat4::from_translation(glam::Vec3::new(1.0, 2.0, 3.0));
        let uniform = ModelUniform::new(m, true);
        assert_eq!(Mat4::from_cols_array_2d(&uniform.model), m);
    }

    #[test]
    fn test_shader_declares_expected_entry_points() {
        assert!(BODY_SHADER_SOURCE.contains("fn vs_main"));
        assert!(BODY_SHADER_SOURCE.contains("fn fs_main"));
    }
}
