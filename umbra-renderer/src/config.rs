//! Umbra configuration: shadow map, light frustum, reflectance, swapchain.

use glam::Vec3;

/// Renderer and bridge configuration. All values are fixed for the life of
/// the renderer; the light transform is recomputed from them every frame.
#[derive(Clone, Copy, Debug)]
pub struct UmbraConfig {
    /// Shadow map resolution (square). Created once, never resized.
    pub shadow_resolution: u32,
    /// Direction of incoming light; normalized at use.
    pub light_direction: Vec3,
    /// Half-size of the light's orthographic frustum, world units.
    pub frustum_half_size: f32,
    /// Near plane of the light frustum.
    pub light_near: f32,
    /// Far plane of the light frustum.
    pub light_far: f32,
    /// Weight of the diffuse reflectance term.
    pub kd: f32,
    /// GGX roughness.
    pub alpha: f32,
    /// Fresnel reflectance at normal incidence (Schlick).
    pub f0: f32,
    /// Clear color for the lit pass.
    pub clear_color: wgpu::Color,
    /// Swapchain texture format for presentation.
    pub swapchain_format: wgpu::TextureFormat,
}

impl Default for UmbraConfig {
    fn default() -> Self {
        Self {
            shadow_resolution: 1024,
            light_direction: Vec3::new(1.0, 1.0, 1.0),
            frustum_half_size: 5.0,
            light_near: -10.0,
            light_far: 10.0,
            kd: 3.0,
            alpha: 0.2,
            f0: 0.9,
            clear_color: wgpu::Color {
                r: 0.26,
                g: 0.46,
                b: 0.98,
                a: 1.0,
            },
            swapchain_format: wgpu::TextureFormat::Rgba8Unorm,
        }
    }
}

/// Device features the renderer needs beyond the wgpu defaults: a white
/// shadow-map border (out-of-frustum lookups read "fully lit") and line
/// polygon mode for the wireframe toggle.
pub fn required_features() -> wgpu::Features {
    wgpu::Features::ADDRESS_MODE_CLAMP_TO_BORDER | wgpu::Features::POLYGON_MODE_LINE
}
