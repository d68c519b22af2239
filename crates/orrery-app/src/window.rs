//! Window creation, the winit event loop, and the per-frame driver that ties
//! the scene, input, and renderer together.

use std::sync::Arc;

use glam::{Mat4, Vec3};
use orrery_config::Config;
use orrery_input::{FrameInput, KeyboardState};
use orrery_render::{
    BodyPipeline, BufferAllocator, Camera, DepthBuffer, FACE_SIZE, ManagedTexture, MeshBuffer,
    ModelUniform, PointLight, RenderContext, SkyboxRenderer, StarCubemap, SurfaceError,
    TextureError, TextureManager, draw_body, generate_uv_sphere, init_render_context_blocking,
    solid_rgba8,
};
use orrery_scene::{SceneBuildError, SolarSystem, build_solar_system};
use tracing::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

use crate::camera_rig::CameraRig;
use crate::frame_clock::FrameClock;

/// Sphere tessellation shared by every body and the light proxy.
const SPHERE_STACKS: u32 = 32;
const SPHERE_SLICES: u32 = 48;

/// Visual scale of the light proxy sphere.
const LIGHT_PROXY_SCALE: f32 = 0.5;

/// Clear color behind the skybox; only visible for the first frames before
/// the cubemap upload completes.
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.01,
    a: 1.0,
};

/// Returns [`WindowAttributes`] based on the given configuration.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    let mut attrs = WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ));
    if config.window.fullscreen {
        attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
    }
    attrs
}

/// Per-body GPU state: the model uniform plus the body's texture bind group.
struct BodyDraw {
    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
    texture: Arc<ManagedTexture>,
    lit: bool,
}

/// Everything created once the GPU is up.
struct SceneResources {
    depth_buffer: DepthBuffer,
    pipeline: BodyPipeline,
    sphere: MeshBuffer,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    light_buffer: wgpu::Buffer,
    light_bind_group: wgpu::BindGroup,
    bodies: Vec<BodyDraw>,
    light_proxy: BodyDraw,
    skybox: SkyboxRenderer,
}

/// Application state driving the window, the scene, and the renderer.
pub struct OrreryApp {
    window: Option<Arc<Window>>,
    gpu: Option<RenderContext>,
    resources: Option<SceneResources>,
    config: Config,
    clock: FrameClock,
    system: SolarSystem,
    rig: CameraRig,
    camera: Camera,
    keyboard: KeyboardState,
    light: PointLight,
    ambient: f32,
}

impl OrreryApp {
    pub fn new(config: Config) -> Result<Self, SceneBuildError> {
        let mut system = build_solar_system()?;
        system.set_animation_enabled(config.sim.animation_on_start);

        let light = PointLight::new(Vec3::ZERO, config.light.radius);
        let ambient = config.light.ambient;
        let clock = FrameClock::new(config.sim.time_scale);

        let rig = CameraRig::home();
        let mut camera = Camera::default();
        rig.apply_to(&mut camera);
        camera.set_aspect_ratio(config.window.width as f32, config.window.height as f32);

        Ok(Self {
            window: None,
            gpu: None,
            resources: None,
            config,
            clock,
            system,
            rig,
            camera,
            keyboard: KeyboardState::new(),
            light,
            ambient,
        })
    }

    /// Build every GPU resource the scene needs. Fail-fast: a missing texture
    /// aborts startup rather than rendering a partial system.
    fn init_scene(&self, gpu: &RenderContext) -> Result<SceneResources, TextureError> {
        let depth_buffer = DepthBuffer::new(
            &gpu.device,
            gpu.surface_config.width,
            gpu.surface_config.height,
        );

        let mut texture_manager = TextureManager::new(&gpu.device);
        let pipeline = BodyPipeline::new(
            &gpu.device,
            gpu.surface_format,
            texture_manager.bind_group_layout(),
        );

        let allocator = BufferAllocator::new(&gpu.device);
        let sphere_mesh = generate_uv_sphere(SPHERE_STACKS, SPHERE_SLICES);
        let sphere = allocator.create_mesh("body-sphere", &sphere_mesh.vertices, &sphere_mesh.indices);

        let camera_buffer = allocator.create_uniform("camera-uniform", &self.camera.to_uniform());
        let camera_bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera-bind-group"),
            layout: &pipeline.camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let light_buffer =
            allocator.create_uniform("light-uniform", &self.light.to_uniform(self.ambient));
        let light_bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("light-bind-group"),
            layout: &pipeline.light_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: light_buffer.as_entire_binding(),
            }],
        });

        let mut bodies = Vec::with_capacity(self.system.len());
        for body in self.system.bodies() {
            let path = self.config.assets.texture_dir.join(body.texture());
            let texture =
                texture_manager.load_file(&gpu.device, &gpu.queue, body.texture(), &path)?;

            let model = ModelUniform::new(body.world_matrix(), body.lit());
            let label = format!("model-{}", body.name());
            let model_buffer = allocator.create_uniform(&label, &model);
            let model_bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&label),
                layout: &pipeline.model_bind_group_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: model_buffer.as_entire_binding(),
                }],
            });

            bodies.push(BodyDraw {
                model_buffer,
                model_bind_group,
                texture,
                lit: body.lit(),
            });
        }
        info!(bodies = bodies.len(), "scene resources created");

        // The light proxy is a small unlit white sphere marking the light
        // position.
        let proxy_pixels = solid_rgba8([255, 255, 255, 255], 1, 1);
        let proxy_texture = texture_manager.create_from_rgba8(
            &gpu.device,
            &gpu.queue,
            "light-proxy",
            &proxy_pixels,
            1,
            1,
        )?;
        let proxy_model = ModelUniform::new(light_proxy_matrix(self.light.position), false);
        let proxy_buffer = allocator.create_uniform("model-light-proxy", &proxy_model);
        let proxy_bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("model-light-proxy"),
            layout: &pipeline.model_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: proxy_buffer.as_entire_binding(),
            }],
        });
        let light_proxy = BodyDraw {
            model_buffer: proxy_buffer,
            model_bind_group: proxy_bind_group,
            texture: proxy_texture,
            lit: false,
        };

        let cubemap = StarCubemap::generate(
            self.config.sim.star_seed,
            self.config.sim.star_count,
            FACE_SIZE,
        );
        let skybox = SkyboxRenderer::new(&gpu.device, &gpu.queue, gpu.surface_format, &cubemap);

        Ok(SceneResources {
            depth_buffer,
            pipeline,
            sphere,
            camera_buffer,
            camera_bind_group,
            light_buffer,
            light_bind_group,
            bodies,
            light_proxy,
            skybox,
        })
    }

    /// Show the focused body in the window title; the base title alone means
    /// the camera is at the home vantage.
    fn refresh_title(&self, focused: Option<String>) {
        if let Some(window) = &self.window {
            window.set_title(&window_title(&self.config.window.title, focused.as_deref()));
        }
    }

    fn handle_resize(&mut self, width: u32, height: u32) {
        self.camera.set_aspect_ratio(width as f32, height as f32);
        if let Some(gpu) = &mut self.gpu {
            gpu.resize(width, height);
        }
        if let (Some(resources), Some(gpu)) = (&mut self.resources, &self.gpu) {
            resources.depth_buffer.resize(&gpu.device, width, height);
        }
        info!("Window resized to {}x{}", width, height);
    }

    /// Resolve input, advance the simulation, and apply the frame's edits to
    /// the light and camera.
    fn update(&mut self, dt: f32, input: &FrameInput) {
        if input.toggle_animation {
            self.system.toggle_animation();
            info!(
                enabled = self.system.animation_enabled(),
                "animation toggled"
            );
        }

        self.system.update(dt);

        if input.focus_next_body {
            let target = self.system.focus_next();
            let scale = self.system.focused().map(|b| b.scale()).unwrap_or(1.0);
            if let Some(body) = self.system.focused() {
                info!(body = body.name(), "flying to body");
            }
            self.rig.fly_to(target, scale);
            self.refresh_title(self.system.focused().map(|b| b.name().to_string()));
        }
        if input.return_to_start {
            info!("returning to start vantage");
            self.rig.return_home();
            self.refresh_title(None);
        }

        if input.light_move != Vec3::ZERO {
            self.light
                .translate(input.light_move * self.config.light.movement_rate * dt);
        }
        if input.light_intensity != 0.0 {
            self.light.adjust_intensity(input.light_intensity * dt);
        }
        if input.light_radius != 0.0 {
            self.light
                .adjust_radius(input.light_radius * self.config.light.modulation_rate * dt);
        }
        if input.ambient != 0.0 {
            self.ambient = (self.ambient + input.ambient * dt).clamp(0.0, 1.0);
        }

        self.rig.update(dt);
        self.rig.apply_to(&mut self.camera);
    }

    /// Upload the frame's uniforms and record the single render pass.
    fn render(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(gpu), Some(resources)) = (&self.gpu, &self.resources) else {
            return;
        };

        gpu.queue.write_buffer(
            &resources.camera_buffer,
            0,
            bytemuck::cast_slice(&[self.camera.to_uniform()]),
        );
        gpu.queue.write_buffer(
            &resources.light_buffer,
            0,
            bytemuck::cast_slice(&[self.light.to_uniform(self.ambient)]),
        );
        for (body, draw) in self.system.bodies().iter().zip(&resources.bodies) {
            let model = ModelUniform::new(body.world_matrix(), draw.lit);
            gpu.queue
                .write_buffer(&draw.model_buffer, 0, bytemuck::cast_slice(&[model]));
        }
        let proxy_model = ModelUniform::new(light_proxy_matrix(self.light.position), false);
        gpu.queue.write_buffer(
            &resources.light_proxy.model_buffer,
            0,
            bytemuck::cast_slice(&[proxy_model]),
        );

        // The skybox only rotates with the camera; translation is dropped so
        // the stars stay at infinity.
        let rotation_only_view = Mat4::from_quat(self.camera.rotation.inverse());
        resources.skybox.update(
            &gpu.queue,
            self.camera.projection_matrix() * rotation_only_view,
        );

        let surface_texture = match gpu.acquire_frame() {
            Ok(texture) => texture,
            Err(SurfaceError::Lost) => {
                warn!("surface lost, skipping frame");
                return;
            }
            Err(SurfaceError::OutOfMemory) => {
                error!("GPU out of memory");
                event_loop.exit();
                return;
            }
            Err(SurfaceError::Timeout) => {
                warn!("surface timeout, skipping frame");
                return;
            }
        };

        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("body-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &resources.depth_buffer.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(DepthBuffer::CLEAR_VALUE),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            resources.skybox.draw(&mut pass);

            for draw in resources.bodies.iter().chain([&resources.light_proxy]) {
                draw_body(
                    &mut pass,
                    &resources.pipeline,
                    &resources.camera_bind_group,
                    &resources.light_bind_group,
                    &draw.texture.bind_group,
                    &draw.model_bind_group,
                    &resources.sphere,
                );
            }
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
    }
}

/// Compose the window title, appending the focused body's name when the
/// camera is tracking one.
fn window_title(base: &str, focused: Option<&str>) -> String {
    match focused {
        Some(name) => format!("{base} - {name}"),
        None => base.to_string(),
    }
}

/// World transform of the light proxy sphere.
fn light_proxy_matrix(light_position: Vec3) -> Mat4 {
    Mat4::from_translation(light_position) * Mat4::from_scale(Vec3::splat(LIGHT_PROXY_SCALE))
}

impl ApplicationHandler for OrreryApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = window_attributes_from_config(&self.config);
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let inner_size = window.inner_size();
        self.camera
            .set_aspect_ratio(inner_size.width as f32, inner_size.height as f32);

        match init_render_context_blocking(window.clone()) {
            Ok(ctx) => {
                match self.init_scene(&ctx) {
                    Ok(resources) => self.resources = Some(resources),
                    Err(e) => {
                        error!("Scene initialization failed: {e}");
                        event_loop.exit();
                        return;
                    }
                }
                self.gpu = Some(ctx);
            }
            Err(e) => {
                error!("GPU initialization failed: {e}");
                event_loop.exit();
                return;
            }
        }

        self.window = Some(window);
        info!("window and GPU initialized");
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                self.handle_resize(new_size.width, new_size.height);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.keyboard.process_event(&event);
            }
            WindowEvent::RedrawRequested => {
                let dt = self.clock.tick();
                let input = FrameInput::read(&self.keyboard);
                if input.quit {
                    info!("Quit requested");
                    event_loop.exit();
                    return;
                }

                self.update(dt, &input);
                self.render(event_loop);

                self.keyboard.end_frame();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// Create the event loop and run the application. Blocks until the window
/// closes.
pub fn run(config: Config) -> Result<(), winit::error::EventLoopError> {
    let event_loop = EventLoop::new()?;
    let mut app = match OrreryApp::new(config) {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to build the solar system: {e}");
            return Ok(());
        }
    };
    event_loop.run_app(&mut app)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_attributes_reflect_config() {
        let mut config = Config::default();
        config.window.title = "test orrery".to_string();
        config.window.width = 640;
        config.window.height = 480;
        let attrs = window_attributes_from_config(&config);
        assert_eq!(attrs.title, "test orrery");
    }

    #[test]
    fn test_window_title_tracks_focused_body() {
        assert_eq!(window_title("Orrery", None), "Orrery");
        assert_eq!(window_title("Orrery", Some("Earth")), "Orrery - Earth");
    }

    #[test]
    fn test_focus_change_updates_reported_body() {
        let mut app = OrreryApp::new(Config::default()).unwrap();
        let next = FrameInput {
            focus_next_body: true,
            ..Default::default()
        };
        app.update(0.016, &next);
        let focused = app.system.focused().map(|b| b.name().to_string());
        assert_eq!(focused.as_deref(), Some("Mercury"));
        assert_eq!(
            window_title(&app.config.window.title, focused.as_deref()),
            "Orrery - Mercury"
        );
    }

    #[test]
    fn test_light_proxy_matrix_places_sphere_at_light() {
        let position = Vec3::new(10.0, -4.0, 2.5);
        let matrix = light_proxy_matrix(position);
        let origin = matrix.transform_point3(Vec3::ZERO);
        assert!((origin - position).length() < 1e-6);
        // Uniform scale shrinks the unit sphere.
        let rim = matrix.transform_point3(Vec3::X);
        assert!(((rim - position).length() - LIGHT_PROXY_SCALE).abs() < 1e-6);
    }

    #[test]
    fn test_app_state_honors_animation_config() {
        let mut config = Config::default();
        config.sim.animation_on_start = false;
        let app = OrreryApp::new(config).unwrap();
        assert!(!app.system.animation_enabled());
    }

    #[test]
    fn test_simulation_advances_through_update() {
        let config = Config::default();
        let mut app = OrreryApp::new(config).unwrap();
        let before = app.system.bodies()[3].revolution_angle();
        app.update(0.016, &FrameInput::default());
        let after = app.system.bodies()[3].revolution_angle();
        assert!(after > before);
    }

    #[test]
    fn test_light_responds_to_held_axes() {
        let config = Config::default();
        let rate = config.light.movement_rate;
        let mut app = OrreryApp::new(config).unwrap();
        let input = FrameInput {
            light_move: Vec3::new(1.0, 0.0, 0.0),
            ..Default::default()
        };
        app.update(1.0, &input);
        assert!((app.light.position.x - rate).abs() < 1e-4);
    }

    #[test]
    fn test_toggle_pauses_simulation() {
        let config = Config::default();
        let mut app = OrreryApp::new(config).unwrap();
        let toggle = FrameInput {
            toggle_animation: true,
            ..Default::default()
        };
        app.update(0.016, &toggle);
        assert!(!app.system.animation_enabled());

        let before = app.system.bodies()[1].rotation_angle();
        app.update(0.016, &FrameInput::default());
        assert_eq!(app.system.bodies()[1].rotation_angle(), before);
    }
}
