//! Umbra renderer: wgpu shadow-mapped forward pipeline.
//!
//! Two passes per frame: a depth-only pass from the directional light's
//! point of view into the shadow map, then a lit pass that shades with GGX
//! and resolves the shadow term through the selected technique.

pub mod config;
pub mod depth_pass;
pub mod error;
pub mod light;
pub mod lit_pass;
pub mod resources;
pub mod sampling;
pub mod scene;
pub mod variants;

use std::sync::Arc;

pub use config::{required_features, UmbraConfig};
pub use depth_pass::DepthPass;
pub use error::RenderError;
pub use light::DirectionalLight;
pub use lit_pass::{FrameUniform, LitPass};
pub use resources::{FrameResources, ShadowTarget};
pub use scene::{ObjectTransform, Scene, SceneError, SceneObject};
pub use variants::{ShadowTechnique, TechniqueRegistry};

const LIT_SHADER: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/lit.wgsl"));

/// One object, ready to draw: GPU geometry plus resolved transforms. Buffers
/// are shared with the host's mesh cache.
pub struct ObjectDraw {
    pub vertex_buf: Arc<wgpu::Buffer>,
    pub index_buf: Arc<wgpu::Buffer>,
    pub index_count: u32,
    /// Column-major model matrix.
    pub model: [f32; 16],
    /// Inverse-transpose of the 3x3 of view * model, padded to a mat4.
    pub normal: [f32; 16],
    pub uv_repeat: f32,
    pub diffuse_view: wgpu::TextureView,
}

/// Per-frame camera and toggle state the host resolves before encoding.
#[derive(Clone, Copy, Debug)]
pub struct FrameParams {
    pub projection: [f32; 16],
    pub view: [f32; 16],
    pub wireframe: bool,
}

pub struct Renderer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: UmbraConfig,
    light: DirectionalLight,
    registry: TechniqueRegistry,
    depth_pass: DepthPass,
    lit_pass: LitPass,
    shadow_target: ShadowTarget,
    frame_resources: Option<FrameResources>,
}

impl Renderer {
    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> Result<Self, RenderError> {
        Self::new_with_config(device, queue, UmbraConfig::default())
    }

    pub fn new_with_config(
        device: wgpu::Device,
        queue: wgpu::Queue,
        config: UmbraConfig,
    ) -> Result<Self, RenderError> {
        let registry = TechniqueRegistry::discover(LIT_SHADER)?;
        let depth_pass = DepthPass::new(&device)?;
        let lit_pass = LitPass::new(&device, config.swapchain_format)?;
        let shadow_target = ShadowTarget::new(&device, config.shadow_resolution);
        let light = DirectionalLight::from_config(&config);
        Ok(Self {
            device,
            queue,
            config,
            light,
            registry,
            depth_pass,
            lit_pass,
            shadow_target,
            frame_resources: None,
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn config(&self) -> &UmbraConfig {
        &self.config
    }

    pub fn light(&self) -> &DirectionalLight {
        &self.light
    }

    pub fn registry(&self) -> &TechniqueRegistry {
        &self.registry
    }

    pub fn select_technique(&mut self, index: usize) {
        self.registry.select(index);
    }

    pub fn ensure_frame_resources(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        let existing = self.frame_resources.take();
        let new_res = FrameResources::ensure_size(&self.device, existing, width, height)?;
        self.frame_resources = Some(new_res);
        Ok(())
    }

    /// Encode both passes into the given encoder, ending in `output_view`.
    /// The shadow map is redrawn every frame since the scene animates.
    pub fn encode_frame(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        output_view: &wgpu::TextureView,
        width: u32,
        height: u32,
        params: &FrameParams,
        draws: &[ObjectDraw],
    ) -> Result<(), RenderError> {
        self.ensure_frame_resources(width, height)?;
        let frame_resources = self.frame_resources.as_ref().unwrap();
        let light_space = self.light.space_matrix(&self.config).to_cols_array();
        self.depth_pass.encode(
            encoder,
            &self.device,
            &self.queue,
            &self.shadow_target,
            draws,
            &light_space,
        )?;
        let frame = FrameUniform {
            projection: params.projection,
            view: params.view,
            light_space,
            light_dir: self.light.direction.to_array(),
            technique: self.registry.token(),
            kd: self.config.kd,
            alpha: self.config.alpha,
            f0: self.config.f0,
            _pad: 0.0,
        };
        self.lit_pass.encode(
            encoder,
            &self.device,
            &self.queue,
            output_view,
            frame_resources,
            &self.shadow_target,
            draws,
            &frame,
            self.config.clear_color,
            params.wireframe,
        )?;
        Ok(())
    }

    pub fn render_frame(
        &mut self,
        output_view: &wgpu::TextureView,
        width: u32,
        height: u32,
        params: &FrameParams,
        draws: &[ObjectDraw],
    ) -> Result<wgpu::CommandBuffer, RenderError> {
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("umbra_frame"),
            });
        self.encode_frame(&mut encoder, output_view, width, height, params, draws)?;
        Ok(encoder.finish())
    }

    pub fn submit(&self, command_buffers: impl IntoIterator<Item = wgpu::CommandBuffer>) {
        self.queue.submit(command_buffers);
    }
}
