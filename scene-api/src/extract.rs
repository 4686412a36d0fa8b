//! Data types for extraction from the host into the render world.
//! The host fills `ExtractedScene` once at startup (the scene is fixed) and
//! a fresh `FrameState` every frame.

use std::collections::HashMap;

use glam::Mat4;

/// One mesh uploaded by the host.
#[derive(Clone, Debug)]
pub struct ExtractedMesh {
    /// Host-defined resource id; scene objects refer to meshes by this id.
    pub id: u64,
    /// Interleaved vertex data: position (3xf32) + normal (3xf32) + uv (2xf32), stride 32.
    pub vertex_data: Vec<u8>,
    /// Index data (u32 indices).
    pub index_data: Vec<u8>,
}

/// One diffuse texture uploaded by the host (RGBA8).
#[derive(Clone, Debug)]
pub struct ExtractedTexture {
    pub id: u64,
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// All GPU-resident resources the fixed scene needs.
#[derive(Default, Debug)]
pub struct ExtractedScene {
    pub meshes: HashMap<u64, ExtractedMesh>,
    pub textures: HashMap<u64, ExtractedTexture>,
}

/// View/camera data for the current frame.
#[derive(Clone, Copy, Debug)]
pub struct ExtractedView {
    pub projection: Mat4,
    pub view: Mat4,
    pub viewport_size: (u32, u32),
}

impl Default for ExtractedView {
    fn default() -> Self {
        Self {
            projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            viewport_size: (800, 600),
        }
    }
}

/// Per-frame render state. Explicit and passed by value each frame; the
/// renderer keeps no mutable frame state of its own besides the technique
/// selection held by its registry.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameState {
    pub view: ExtractedView,
    /// Accumulated spin angle for the animated objects, in degrees.
    pub spin_angle_deg: f32,
    pub wireframe: bool,
}
