//! Renderer error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    /// The lit shader exposes no shadow technique implementations. Fatal at
    /// startup: the lit pass cannot select a technique.
    #[error("no shadow techniques discovered in the lit shader")]
    NoTechniques,

    /// A scene object carries a transform the pipeline cannot use.
    #[error("scene error: {0}")]
    Scene(#[from] crate::scene::SceneError),

    /// A draw referenced a mesh or texture id the host never uploaded.
    #[error("unknown resource id {0}")]
    UnknownResource(u64),

    #[error("frame target must be at least 1x1, got {width}x{height}")]
    EmptyTarget { width: u32, height: u32 },
}
