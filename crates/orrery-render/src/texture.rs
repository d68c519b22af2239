//! Body texture loading: image decode at startup, GPU upload, bind groups.
//!
//! The scene catalog names textures by path-like identifiers; this module
//! resolves them under the configured asset directory. A missing or
//! undecodable file is a startup error, never a per-frame concern.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

/// Errors raised while loading a texture.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    /// Failed to read or decode the image file.
    #[error("failed to load texture {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Width or height is zero.
    #[error("texture dimensions must be non-zero, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },

    /// Pixel data length doesn't match the dimensions.
    #[error("texture data size ({actual}) does not match expected ({expected}) for {width}x{height}")]
    DataSizeMismatch {
        actual: usize,
        expected: usize,
        width: u32,
        height: u32,
    },
}

/// A GPU texture with its view and a ready-to-bind bind group.
pub struct ManagedTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub bind_group: wgpu::BindGroup,
    pub dimensions: (u32, u32),
}

/// Loads, caches, and owns every texture plus the shared sampler and
/// bind group layout.
pub struct TextureManager {
    textures: HashMap<String, Arc<ManagedTexture>>,
    sampler: wgpu::Sampler,
    bind_group_layout: wgpu::BindGroupLayout,
}

impl TextureManager {
    pub fn new(device: &wgpu::Device) -> Self {
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("orrery-sampler-linear"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("orrery-texture-bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
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

        Self {
            textures: HashMap::new(),
            sampler,
            bind_group_layout,
        }
    }

    /// Layout for group 2 of the body pipeline.
    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    /// Load an image file, decode it to RGBA8, and upload it. Cached by the
    /// identifier, so bodies sharing a texture share the GPU resource.
    pub fn load_file(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        name: &str,
        path: &Path,
    ) -> Result<Arc<ManagedTexture>, TextureError> {
        if let Some(existing) = self.textures.get(name) {
            return Ok(Arc::clone(existing));
        }

        let image = image::open(path)
            .map_err(|source| TextureError::Decode {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        let (width, height) = image.dimensions();
        info!(name, width, height, "loaded texture");
        self.create_from_rgba8(device, queue, name, image.as_raw(), width, height)
    }

    /// Upload raw RGBA8 pixels as an sRGB texture.
    pub fn create_from_rgba8(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        name: &str,
        data: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Arc<ManagedTexture>, TextureError> {
        validate_rgba8(data, width, height)?;

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(name),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: None,
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{name}-bg")),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        let managed = Arc::new(ManagedTexture {
            texture,
            view,
            bind_group,
            dimensions: (width, height),
        });
        self.textures.insert(name.to_string(), Arc::clone(&managed));
        Ok(managed)
    }

    /// A texture previously loaded under this identifier, if any.
    pub fn get(&self, name: &str) -> Option<Arc<ManagedTexture>> {
        self.textures.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

fn validate_rgba8(data: &[u8], width: u32, height: u32) -> Result<(), TextureError> {
    if width == 0 || height == 0 {
        return Err(TextureError::ZeroDimensions { width, height });
    }
    let expected = (width as usize) * (height as usize) * 4;
    if data.len() != expected {
        return Err(TextureError::DataSizeMismatch {
            actual: data.len(),
            expected,
            width,
            height,
        });
    }
    Ok(())
}

/// A flat-color RGBA8 pixel block, used as the light proxy's texture.
pub fn solid_rgba8(color: [u8; 4], width: u32, height: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for _ in 0..(width * height) {
        data.extend_from_slice(&color);
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_zero_dimensions() {
        let err = validate_rgba8(&[], 0, 4).unwrap_err();
        assert!(matches!(err, TextureError::ZeroDimensions { .. }));
    }

    #[test]
    fn test_validate_rejects_short_data() {
        let data = vec![0u8; 4 * 4 * 3]; // RGB-sized, not RGBA
        let err = validate_rgba8(&data, 4, 4).unwrap_err();
        assert!(matches!(
            err,
            TextureError::DataSizeMismatch {
                actual: 48,
                expected: 64,
                ..
            }
        ));
    }

    #[test]
    fn test_validate_accepts_exact_size() {
        let data = vec![0u8; 8 * 2 * 4];
        assert!(validate_rgba8(&data, 8, 2).is_ok());
    }

    #[test]
    fn test_solid_color_block() {
        let data = solid_rgba8([255, 255, 0, 255], 2, 2);
        assert_eq!(data.len(), 16);
        assert!(validate_rgba8(&data, 2, 2).is_ok());
        assert_eq!(&data[0..4], &[255, 255, 0, 255]);
    }

    #[test]
    fn test_decode_error_carries_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.png");
        let result = image::open(&missing).map_err(|source| TextureError::Decode {
            path: missing.clone(),
            source,
        });
        let err = result.unwrap_err();
        assert!(err.to_string().contains("nope.png"));
    }
}
