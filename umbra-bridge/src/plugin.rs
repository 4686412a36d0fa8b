//! Umbra plugin: implements RenderBackend for the host.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use glam::Mat3;
use scene_api::{BackendError, ExtractedScene, FrameState, RenderBackend};
use umbra_renderer::{FrameParams, ObjectDraw, RenderError, Renderer, Scene, UmbraConfig};

/// Pad a column-major 3x3 to the mat4x4 layout the object uniform expects.
fn mat3_to_mat4_cols(m: Mat3) -> [f32; 16] {
    let c = m.to_cols_array();
    [
        c[0], c[1], c[2], 0.0, //
        c[3], c[4], c[5], 0.0, //
        c[6], c[7], c[8], 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ]
}

/// Cached GPU buffers for one mesh.
struct CachedMesh {
    vertex_buf: Arc<wgpu::Buffer>,
    index_buf: Arc<wgpu::Buffer>,
    index_count: u32,
    vertex_len: usize,
    index_len: usize,
}

/// Cached GPU texture for one diffuse map.
struct CachedTexture {
    texture: wgpu::Texture,
    width: u32,
    height: u32,
}

/// Umbra plugin: owns the wgpu device/queue, the renderer, and the fixed
/// scene; implements RenderBackend. Meshes and textures are cached by the
/// host's resource id and updated in prepare().
pub struct UmbraPlugin {
    renderer: Renderer,
    scene: Scene,
    mesh_cache: HashMap<u64, CachedMesh>,
    texture_cache: HashMap<u64, CachedTexture>,
}

impl UmbraPlugin {
    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> Result<Self, BackendError> {
        Self::new_with_config(device, queue, UmbraConfig::default())
    }

    pub fn new_with_config(
        device: wgpu::Device,
        queue: wgpu::Queue,
        config: UmbraConfig,
    ) -> Result<Self, BackendError> {
        let renderer = Renderer::new_with_config(device, queue, config)
            .map_err(|e| BackendError::Render(e.to_string()))?;
        let scene = Scene::park()
            .map_err(RenderError::from)
            .map_err(|e| BackendError::Render(e.to_string()))?;
        Ok(Self {
            renderer,
            scene,
            mesh_cache: HashMap::new(),
            texture_cache: HashMap::new(),
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        self.renderer.device()
    }

    pub fn queue(&self) -> &wgpu::Queue {
        self.renderer.queue()
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    fn upload_texture(&mut self, tex: &scene_api::ExtractedTexture) {
        let device = self.renderer.device();
        let queue = self.renderer.queue();
        let size = wgpu::Extent3d {
            width: tex.width,
            height: tex.height,
            depth_or_array_layers: 1,
        };
        let recreate = match self.texture_cache.get(&tex.id) {
            Some(cached) => cached.width != tex.width || cached.height != tex.height,
            None => true,
        };
        if recreate {
            let texture = device.create_texture(&wgpu::TextureDescriptor {
                label: Some("umbra_diffuse"),
                size,
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8Unorm,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            });
            self.texture_cache.insert(
                tex.id,
                CachedTexture {
                    texture,
                    width: tex.width,
                    height: tex.height,
                },
            );
        }
        let cached = &self.texture_cache[&tex.id];
        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &cached.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &tex.pixels,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * tex.width),
                rows_per_image: Some(tex.height),
            },
            size,
        );
    }

    /// Resolve scene objects against the caches into draw calls.
    fn build_draws(&self, frame: &FrameState) -> Result<Vec<ObjectDraw>, BackendError> {
        let transforms = self
            .scene
            .transforms(frame.view.view, frame.spin_angle_deg);
        let mut draws = Vec::with_capacity(transforms.len());
        for t in transforms {
            let mesh = self
                .mesh_cache
                .get(&t.mesh)
                .ok_or(RenderError::UnknownResource(t.mesh))
                .map_err(|e| BackendError::Render(e.to_string()))?;
            let tex = self
                .texture_cache
                .get(&t.texture)
                .ok_or(RenderError::UnknownResource(t.texture))
                .map_err(|e| BackendError::Render(e.to_string()))?;
            draws.push(ObjectDraw {
                vertex_buf: Arc::clone(&mesh.vertex_buf),
                index_buf: Arc::clone(&mesh.index_buf),
                index_count: mesh.index_count,
                model: t.model.to_cols_array(),
                normal: mat3_to_mat4_cols(t.normal),
                uv_repeat: t.uv_repeat,
                diffuse_view: tex.texture.create_view(&Default::default()),
            });
        }
        Ok(draws)
    }

    pub(crate) fn render_frame_to_view(
        &mut self,
        frame: &FrameState,
        output_view: &wgpu::TextureView,
    ) -> Result<(), BackendError> {
        let draws = self.build_draws(frame)?;
        let (width, height) = frame.view.viewport_size;
        let params = FrameParams {
            projection: frame.view.projection.to_cols_array(),
            view: frame.view.view.to_cols_array(),
            wireframe: frame.wireframe,
        };
        let cmd = self
            .renderer
            .render_frame(output_view, width, height, &params, &draws)
            .map_err(|e| BackendError::Render(e.to_string()))?;
        self.renderer.submit([cmd]);
        Ok(())
    }
}

impl RenderBackend for UmbraPlugin {
    fn prepare(&mut self, scene: &ExtractedScene) -> Result<(), BackendError> {
        let mesh_ids: HashSet<u64> = scene.meshes.keys().copied().collect();
        let texture_ids: HashSet<u64> = scene.textures.keys().copied().collect();
        self.mesh_cache.retain(|k, _| mesh_ids.contains(k));
        self.texture_cache.retain(|k, _| texture_ids.contains(k));
        for (&id, mesh) in &scene.meshes {
            if mesh.vertex_data.is_empty() || mesh.index_data.is_empty() {
                log::warn!("skipping empty mesh {id}");
                continue;
            }
            let device = self.renderer.device();
            let queue = self.renderer.queue();
            let vertex_len = mesh.vertex_data.len();
            let index_len = mesh.index_data.len();
            let index_count = (index_len / 4) as u32;
            if let Some(cached) = self.mesh_cache.get(&id) {
                if cached.vertex_len == vertex_len && cached.index_len == index_len {
                    queue.write_buffer(&cached.vertex_buf, 0, &mesh.vertex_data);
                    queue.write_buffer(&cached.index_buf, 0, &mesh.index_data);
                    continue;
                }
            }
            let vertex_buf = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("umbra_mesh_vertex"),
                size: vertex_len as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            queue.write_buffer(&vertex_buf, 0, &mesh.vertex_data);
            let index_buf = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("umbra_mesh_index"),
                size: index_len as u64,
                usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            queue.write_buffer(&index_buf, 0, &mesh.index_data);
            self.mesh_cache.insert(
                id,
                CachedMesh {
                    vertex_buf: Arc::new(vertex_buf),
                    index_buf: Arc::new(index_buf),
                    index_count,
                    vertex_len,
                    index_len,
                },
            );
        }
        for tex in scene.textures.values() {
            self.upload_texture(tex);
        }
        Ok(())
    }

    fn select_technique(&mut self, index: usize) {
        self.renderer.select_technique(index);
    }

    fn technique_names(&self) -> Vec<String> {
        self.renderer.registry().names()
    }

    fn render_frame(&mut self, frame: &FrameState) -> Result<(), BackendError> {
        // Off-screen path: render into a throwaway target at viewport size.
        let (width, height) = frame.view.viewport_size;
        let target = self.renderer.device().create_texture(&wgpu::TextureDescriptor {
            label: Some("umbra_offscreen_target"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: self.renderer.config().swapchain_format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = target.create_view(&Default::default());
        self.render_frame_to_view(frame, &view)
    }
}
