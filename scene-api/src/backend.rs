//! Traits the host uses to drive a render backend without knowing its internals.

use raw_window_handle::{RawDisplayHandle, RawWindowHandle};
use thiserror::Error;

use crate::{ExtractedScene, FrameState};

/// Errors surfaced across the backend boundary.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("render error: {0}")]
    Render(String),
    #[error("surface error: {0}")]
    Surface(String),
}

/// Render backend the host drives each frame.
pub trait RenderBackend: Send {
    /// Upload extracted meshes and textures to the GPU. Stale resources
    /// (ids absent from `scene`) are dropped.
    fn prepare(&mut self, scene: &ExtractedScene) -> Result<(), BackendError>;

    /// Request a shadow technique by registry position. Out-of-range
    /// indices are silently ignored.
    fn select_technique(&mut self, index: usize);

    /// Technique names in registry order, for diagnostics and key-binding help.
    fn technique_names(&self) -> Vec<String>;

    /// Render one frame off-screen. Submits work internally.
    fn render_frame(&mut self, frame: &FrameState) -> Result<(), BackendError>;
}

/// Extension for backends that can present to a window. The host passes raw
/// handles (e.g. from winit); the backend owns surface configuration and
/// performs get_current_texture + present internally.
pub trait RenderBackendWindow: RenderBackend + Send {
    fn render_frame_to_window(
        &mut self,
        frame: &FrameState,
        raw_window_handle: RawWindowHandle,
        raw_display_handle: RawDisplayHandle,
    ) -> Result<(), BackendError>;
}
