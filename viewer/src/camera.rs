//! Free-look camera anchored to the ground plane.

use glam::{Mat4, Vec3};

const SENSITIVITY: f32 = 0.1;
const SPEED: f32 = 2.5;
const PITCH_LIMIT: f32 = 89.0;

/// Yaw/pitch camera with WASD movement. The Y coordinate is locked, so
/// walking always follows the ground regardless of where the camera looks.
pub struct Camera {
    pub position: Vec3,
    yaw: f32,
    pitch: f32,
    first_mouse: bool,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 7.0),
            // Facing -Z.
            yaw: -90.0,
            pitch: 0.0,
            first_mouse: true,
        }
    }
}

impl Camera {
    /// Apply a relative mouse movement. The very first event is swallowed:
    /// its delta reflects wherever the cursor happened to start, not a real
    /// movement, and would snap the view.
    pub fn apply_mouse(&mut self, dx: f32, dy: f32) {
        if self.first_mouse {
            self.first_mouse = false;
            return;
        }
        self.yaw += dx * SENSITIVITY;
        self.pitch = (self.pitch - dy * SENSITIVITY).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    fn front(&self) -> Vec3 {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize()
    }

    /// Walk on the ground plane: forward/strafe directions are the look
    /// direction flattened to Y = 0.
    pub fn walk(&mut self, forward: f32, strafe: f32, dt: f32) {
        let flat_front = {
            let f = self.front();
            Vec3::new(f.x, 0.0, f.z).normalize_or_zero()
        };
        let right = flat_front.cross(Vec3::Y).normalize_or_zero();
        let step = (flat_front * forward + right * strafe) * SPEED * dt;
        self.position += step;
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front(), Vec3::Y)
    }

    pub fn projection(&self, width: u32, height: u32) -> Mat4 {
        let aspect = if height > 0 {
            width as f32 / height as f32
        } else {
            1.0
        };
        Mat4::perspective_rh(45f32.to_radians(), aspect, 0.1, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn first_mouse_event_does_not_rotate() {
        let mut cam = Camera::default();
        let before = cam.view();
        cam.apply_mouse(500.0, -300.0);
        assert_eq!(cam.view(), before);
        cam.apply_mouse(10.0, 0.0);
        assert_ne!(cam.view(), before);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut cam = Camera::default();
        cam.apply_mouse(0.0, 0.0);
        for _ in 0..100 {
            cam.apply_mouse(0.0, -100.0);
        }
        let f = cam.front();
        // Looking almost straight up, but never past the pole.
        assert!(f.y < 1.0 && f.y > 0.99);
    }

    #[test]
    fn walking_stays_on_the_ground() {
        let mut cam = Camera::default();
        cam.apply_mouse(0.0, 0.0);
        cam.apply_mouse(37.0, -250.0);
        let y = cam.position.y;
        cam.walk(1.0, 0.0, 0.5);
        cam.walk(0.0, -1.0, 0.25);
        assert_relative_eq!(cam.position.y, y);
        assert!(cam.position.distance(Vec3::new(0.0, y, 7.0)) > 0.1);
    }

    #[test]
    fn default_camera_faces_negative_z() {
        let cam = Camera::default();
        let f = cam.front();
        assert_relative_eq!(f.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(f.z, -1.0, epsilon = 1e-6);
    }
}
