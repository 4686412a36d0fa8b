//! Window-capable backend: created from a window, implements RenderBackendWindow.

use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use scene_api::{BackendError, ExtractedScene, FrameState, RenderBackend, RenderBackendWindow};
use wgpu::SurfaceTargetUnsafe;

use crate::plugin::UmbraPlugin;
use umbra_renderer::{required_features, UmbraConfig};

/// Backend that owns the wgpu Instance and UmbraPlugin; can present to a
/// window. Created via `UmbraWindowBackend::from_window(window)`; each frame
/// use `render_frame_to_window(frame, raw_window_handle, raw_display_handle)`.
/// The surface is recreated each frame (wgpu::Surface lifetime is tied to the
/// window; recreation avoids transmute and platform staleness when the window
/// is dragged or resized).
pub struct UmbraWindowBackend {
    instance: wgpu::Instance,
    plugin: UmbraPlugin,
}

impl UmbraWindowBackend {
    /// Create a window-capable backend from a window (e.g. winit). The window
    /// is only used for raw handles and an initial surface for adapter
    /// selection; the host must keep it alive and pass its handles each frame.
    pub fn from_window(
        window: &(impl HasWindowHandle + HasDisplayHandle),
    ) -> Result<Box<dyn RenderBackendWindow>, BackendError> {
        let (raw_window, raw_display) = {
            let wh = window
                .window_handle()
                .map_err(|e| BackendError::Surface(e.to_string()))?;
            let dh = window
                .display_handle()
                .map_err(|e| BackendError::Surface(e.to_string()))?;
            (wh.as_raw(), dh.as_raw())
        };
        let backend = pollster::block_on(Self::from_raw_handles_async(raw_window, raw_display))?;
        Ok(Box::new(backend))
    }

    async fn from_raw_handles_async(
        raw_window_handle: raw_window_handle::RawWindowHandle,
        raw_display_handle: raw_window_handle::RawDisplayHandle,
    ) -> Result<Self, BackendError> {
        let instance = wgpu::Instance::default();
        let target = SurfaceTargetUnsafe::RawHandle {
            raw_window_handle,
            raw_display_handle,
        };
        let surface = unsafe {
            instance
                .create_surface_unsafe(target)
                .map_err(|e| BackendError::Surface(e.to_string()))?
        };
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| BackendError::Render("no adapter".to_string()))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("umbra_device"),
                    required_features: required_features(),
                    ..Default::default()
                },
                None,
            )
            .await
            .map_err(|e| BackendError::Render(e.to_string()))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .first()
            .copied()
            .unwrap_or(wgpu::TextureFormat::Rgba8Unorm);
        let config = UmbraConfig {
            swapchain_format: format,
            ..UmbraConfig::default()
        };
        let plugin = UmbraPlugin::new_with_config(device, queue, config)?;
        drop(surface);
        Ok(Self { instance, plugin })
    }

    fn surface_config(
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> wgpu::SurfaceConfiguration {
        wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: wgpu::CompositeAlphaMode::Opaque,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        }
    }
}

impl RenderBackend for UmbraWindowBackend {
    fn prepare(&mut self, scene: &ExtractedScene) -> Result<(), BackendError> {
        self.plugin.prepare(scene)
    }

    fn select_technique(&mut self, index: usize) {
        self.plugin.select_technique(index);
    }

    fn technique_names(&self) -> Vec<String> {
        self.plugin.technique_names()
    }

    fn render_frame(&mut self, frame: &FrameState) -> Result<(), BackendError> {
        self.plugin.render_frame(frame)
    }
}

impl RenderBackendWindow for UmbraWindowBackend {
    fn render_frame_to_window(
        &mut self,
        frame: &FrameState,
        raw_window_handle: raw_window_handle::RawWindowHandle,
        raw_display_handle: raw_window_handle::RawDisplayHandle,
    ) -> Result<(), BackendError> {
        let target = SurfaceTargetUnsafe::RawHandle {
            raw_window_handle,
            raw_display_handle,
        };
        let surface = unsafe {
            self.instance
                .create_surface_unsafe(target)
                .map_err(|e| BackendError::Surface(e.to_string()))?
        };
        let (width, height) = frame.view.viewport_size;
        let config = Self::surface_config(
            self.plugin.renderer().config().swapchain_format,
            width.max(1),
            height.max(1),
        );
        surface.configure(self.plugin.device(), &config);

        let surface_frame = match surface.get_current_texture() {
            Ok(f) => f,
            Err(wgpu::SurfaceError::Outdated) | Err(wgpu::SurfaceError::Lost) => {
                surface.configure(self.plugin.device(), &config);
                surface
                    .get_current_texture()
                    .map_err(|e| BackendError::Surface(e.to_string()))?
            }
            Err(wgpu::SurfaceError::Timeout) => {
                return Err(BackendError::Surface(
                    "surface get_current_texture timeout".to_string(),
                ))
            }
            Err(e) => return Err(BackendError::Surface(e.to_string())),
        };
        let view = surface_frame.texture.create_view(&Default::default());
        self.plugin.render_frame_to_view(frame, &view)?;
        surface_frame.present();
        Ok(())
    }
}
