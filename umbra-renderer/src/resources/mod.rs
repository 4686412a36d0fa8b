//! Frame resources: shadow map target and window-sized depth buffer.

use wgpu::TextureView;

use crate::error::RenderError;

/// The shadow map: a square depth texture rendered by the depth pass and
/// sampled by the lit pass. Created once at the configured resolution and
/// never resized; window resizes do not touch it.
pub struct ShadowTarget {
    texture: wgpu::Texture,
    resolution: u32,
}

impl ShadowTarget {
    pub fn new(device: &wgpu::Device, resolution: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("shadow_map"),
            size: wgpu::Extent3d {
                width: resolution,
                height: resolution,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        Self {
            texture,
            resolution,
        }
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn view(&self) -> TextureView {
        self.texture.create_view(&Default::default())
    }
}

/// Window-sized resources for the lit pass: the depth buffer matching the
/// surface. Recreated only when the window size actually changes.
pub struct FrameResources {
    depth: wgpu::Texture,
    width: u32,
    height: u32,
}

impl FrameResources {
    pub fn ensure_size(
        device: &wgpu::Device,
        existing: Option<Self>,
        width: u32,
        height: u32,
    ) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyTarget { width, height });
        }
        if let Some(r) = existing {
            if r.width == width && r.height == height {
                return Ok(r);
            }
        }
        let depth = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("lit_depth"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        Ok(Self {
            depth,
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn depth_view(&self) -> TextureView {
        self.depth.create_view(&Default::default())
    }
}
