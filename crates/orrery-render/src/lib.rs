//! wgpu rendering for the orrery: GPU context, camera, sphere mesh, the
//! body pipeline, texture loading, the point light, and the star skybox.

pub mod buffer;
pub mod camera;
pub mod depth;
pub mod gpu;
pub mod light;
pub mod pipeline;
pub mod skybox;
pub mod sphere;
pub mod texture;

pub use buffer::{BufferAllocator, MeshBuffer, VertexPositionNormalUv};
pub use camera::{Camera, CameraUniform};
pub use depth::DepthBuffer;
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use light::{LightUniform, PointLight, attenuation};
pub use pipeline::{BODY_SHADER_SOURCE, BodyPipeline, ModelUniform, draw_body};
pub use skybox::{FACE_SIZE, SkyboxRenderer, StarCubemap};
pub use sphere::{SphereMesh, generate_uv_sphere};
pub use texture::{ManagedTexture, TextureError, TextureManager, solid_rgba8};
