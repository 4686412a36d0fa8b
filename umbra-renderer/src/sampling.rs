//! CPU mirror of the shadow sampling in `shaders/lit.wgsl`.
//!
//! Used by tests to check technique behavior (self-shadowing acne, bias,
//! PCF softening, border policy) without a GPU. Kept next to the shader so
//! changes to one are visible from the other.

use glam::{Mat4, Vec2, Vec3};

/// A depth image with the same lookup semantics as the shadow map binding:
/// nearest filtering, clamp-to-border addressing with a white (1.0) border.
pub struct DepthImage {
    width: u32,
    height: u32,
    texels: Vec<f32>,
}

impl DepthImage {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            texels: vec![1.0; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn put(&mut self, x: u32, y: u32, depth: f32) {
        let i = (y * self.width + x) as usize;
        // Depth test LESS: keep the closest surface.
        if depth < self.texels[i] {
            self.texels[i] = depth;
        }
    }

    /// Nearest-neighbor lookup; anything outside [0,1]^2 reads the border
    /// value 1.0, so out-of-frustum fragments compare as lit.
    pub fn sample(&self, uv: Vec2) -> f32 {
        if uv.x < 0.0 || uv.x > 1.0 || uv.y < 0.0 || uv.y > 1.0 {
            return 1.0;
        }
        let x = ((uv.x * self.width as f32) as i64).clamp(0, self.width as i64 - 1) as u32;
        let y = ((uv.y * self.height as f32) as i64).clamp(0, self.height as i64 - 1) as u32;
        self.texels[(y * self.width + x) as usize]
    }

    /// Render a horizontal quad at world height `y`, spanning `half` units
    /// around the origin, into the depth image through the light transform.
    /// Subsampled well past the texel rate so every covered texel is written.
    pub fn rasterize_plane(&mut self, light_space: Mat4, y: f32, half: f32) {
        let steps = self.width * 4;
        for iz in 0..=steps {
            for ix in 0..=steps {
                let world = Vec3::new(
                    -half + 2.0 * half * ix as f32 / steps as f32,
                    y,
                    -half + 2.0 * half * iz as f32 / steps as f32,
                );
                let c = project(light_space, world);
                if c.x < 0.0 || c.x > 1.0 || c.y < 0.0 || c.y > 1.0 {
                    continue;
                }
                if c.z < 0.0 || c.z > 1.0 {
                    continue;
                }
                let x = ((c.x * self.width as f32) as u32).min(self.width - 1);
                let ty = ((c.y * self.height as f32) as u32).min(self.height - 1);
                self.put(x, ty, c.z);
            }
        }
    }
}

/// Shadow-map coordinates of a world point: uv in texture space (v down),
/// z the light-space depth.
pub fn project(light_space: Mat4, world: Vec3) -> Vec3 {
    let clip = light_space * world.extend(1.0);
    let ndc = clip.truncate() / clip.w;
    Vec3::new(ndc.x * 0.5 + 0.5, 0.5 - ndc.y * 0.5, ndc.z)
}

pub fn slope_scaled_bias(n: Vec3, l: Vec3) -> f32 {
    (0.05 * (1.0 - n.dot(l))).max(0.005)
}

fn occluded(map: &DepthImage, coords: Vec3, bias: f32) -> f32 {
    if coords.z > 1.0 {
        return 0.0;
    }
    let closest = map.sample(Vec2::new(coords.x, coords.y));
    if coords.z - bias > closest {
        1.0
    } else {
        0.0
    }
}

/// Zero-tolerance comparison. 1.0 = lit, 0.0 = shadowed.
pub fn shadow_naive(map: &DepthImage, coords: Vec3) -> f32 {
    1.0 - occluded(map, coords, 0.0)
}

pub fn shadow_adaptive_bias(map: &DepthImage, coords: Vec3, n: Vec3, l: Vec3) -> f32 {
    1.0 - occluded(map, coords, slope_scaled_bias(n, l))
}

/// 3x3 biased comparisons averaged; returns fractional light at shadow edges.
pub fn shadow_pcf(map: &DepthImage, coords: Vec3, n: Vec3, l: Vec3) -> f32 {
    let bias = slope_scaled_bias(n, l);
    let texel = Vec2::new(1.0 / map.width() as f32, 1.0 / map.height() as f32);
    let mut hits = 0.0;
    for dy in -1i32..=1 {
        for dx in -1i32..=1 {
            let offset = Vec2::new(dx as f32, dy as f32) * texel;
            let tap = Vec3::new(coords.x + offset.x, coords.y + offset.y, coords.z);
            hits += occluded(map, tap, bias);
        }
    }
    1.0 - hits / 9.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn border_reads_white() {
        let map = DepthImage::new(8, 8);
        assert_eq!(map.sample(Vec2::new(-0.5, 0.5)), 1.0);
        assert_eq!(map.sample(Vec2::new(0.5, 1.5)), 1.0);
    }

    #[test]
    fn depth_test_keeps_closest() {
        let mut map = DepthImage::new(4, 4);
        map.put(1, 1, 0.7);
        map.put(1, 1, 0.9);
        map.put(1, 1, 0.3);
        assert_eq!(map.sample(Vec2::new(0.375, 0.375)), 0.3);
    }

    #[test]
    fn beyond_far_plane_is_lit() {
        let mut map = DepthImage::new(4, 4);
        for y in 0..4 {
            for x in 0..4 {
                map.put(x, y, 0.0);
            }
        }
        let coords = Vec3::new(0.5, 0.5, 1.5);
        assert_eq!(shadow_naive(&map, coords), 1.0);
    }

    #[test]
    fn occluder_casts_shadow_under_every_technique() {
        let mut map = DepthImage::new(8, 8);
        for y in 0..8 {
            for x in 0..8 {
                map.put(x, y, 0.2);
            }
        }
        let coords = Vec3::new(0.5, 0.5, 0.8);
        let n = Vec3::Y;
        let l = Vec3::new(1.0, 1.0, 1.0).normalize();
        assert_eq!(shadow_naive(&map, coords), 0.0);
        assert_eq!(shadow_adaptive_bias(&map, coords, n, l), 0.0);
        assert_eq!(shadow_pcf(&map, coords, n, l), 0.0);
    }

    #[test]
    fn bias_grows_toward_grazing_incidence() {
        let n = Vec3::Y;
        let aligned = slope_scaled_bias(n, Vec3::Y);
        let grazing = slope_scaled_bias(n, Vec3::new(1.0, 0.05, 0.0).normalize());
        assert!(grazing > aligned);
        assert!(aligned >= 0.005);
    }
}
