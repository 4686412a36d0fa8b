//! Directional light and its shadow-space transform.

use glam::{Mat4, Vec3};

use crate::config::UmbraConfig;

/// The single directional light. Holds nothing but the incoming direction;
/// view and projection are derived from constants each frame.
#[derive(Clone, Copy, Debug)]
pub struct DirectionalLight {
    pub direction: Vec3,
}

impl DirectionalLight {
    pub fn new(direction: Vec3) -> Self {
        Self { direction }
    }

    pub fn from_config(config: &UmbraConfig) -> Self {
        Self::new(config.light_direction)
    }

    /// Orthographic projection over the fixed light frustum. Maps depth to
    /// [0, 1], which the shadow comparison downstream relies on.
    pub fn projection(&self, config: &UmbraConfig) -> Mat4 {
        let s = config.frustum_half_size;
        Mat4::orthographic_rh(-s, s, -s, s, config.light_near, config.light_far)
    }

    /// View matrix: the light has no position, so look from a point on the
    /// direction vector toward the origin, up +Y.
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.direction.normalize(), Vec3::ZERO, Vec3::Y)
    }

    /// Light-space transform for both passes: projection * view.
    pub fn space_matrix(&self, config: &UmbraConfig) -> Mat4 {
        self.projection(config) * self.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn config() -> UmbraConfig {
        UmbraConfig::default()
    }

    #[test]
    fn space_matrix_is_projection_times_view() {
        let light = DirectionalLight::new(Vec3::new(1.0, 1.0, 1.0));
        let m = light.space_matrix(&config());
        let expected = light.projection(&config()) * light.view();
        for (a, b) in m.to_cols_array().iter().zip(expected.to_cols_array()) {
            assert_relative_eq!(*a, b);
        }
    }

    #[test]
    fn origin_projects_to_frustum_center() {
        let light = DirectionalLight::new(Vec3::new(1.0, 1.0, 1.0));
        let p = light.space_matrix(&config()) * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-5);
        // Eye sits one unit along the direction; ortho_rh maps the eye plane
        // z = -near and the origin lands one unit behind it.
        assert!(p.z > 0.0 && p.z < 1.0);
    }

    #[test]
    fn depth_stays_in_unit_range_inside_frustum(){
        let light = DirectionalLight::new(Vec3::new(1.0, 1.0, 1.0));
        let m = light.space_matrix(&config());
        for &point in &[
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(3.0, 0.0, -3.0),
            Vec3::new(-2.0, 2.0, 1.0),
        ] {
            let p = m * point.extend(1.0);
            assert!(p.z >= 0.0 && p.z <= 1.0, "depth {} out of range", p.z);
        }
    }
}
