//! Umbra bridge: implements scene_api::RenderBackend using umbra-renderer.

mod plugin;
mod window_backend;

pub use plugin::UmbraPlugin;
pub use window_backend::UmbraWindowBackend;
