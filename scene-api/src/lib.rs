//! Scene API: data the host extracts for the renderer, and the backend traits.

pub mod backend;
pub mod extract;

pub use backend::{BackendError, RenderBackend, RenderBackendWindow};
pub use extract::{
    ExtractedMesh, ExtractedScene, ExtractedTexture, ExtractedView, FrameState,
};
