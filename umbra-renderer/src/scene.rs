//! Fixed scene: the four park objects and their per-frame transforms.

use glam::{Mat3, Mat4, Vec3};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SceneError {
    /// A zero or near-zero scale axis would make the normal matrix
    /// (inverse-transpose of view * model) singular. Rejected when the
    /// object is configured, not at draw time.
    #[error("degenerate scale {0:?} for scene object")]
    DegenerateScale(Vec3),
}

const MIN_SCALE: f32 = 1e-6;

/// One object of the fixed scene: a mesh, a diffuse texture, a static local
/// transform, and a UV tiling factor. Objects are created at startup and
/// never destroyed; the only per-frame variation is the shared spin angle.
#[derive(Clone, Copy, Debug)]
pub struct SceneObject {
    pub mesh: u64,
    pub texture: u64,
    pub translation: Vec3,
    pub scale: Vec3,
    pub uv_repeat: f32,
    /// Whether the object follows the animated rotation about Y.
    pub spins: bool,
}

impl SceneObject {
    pub fn new(
        mesh: u64,
        texture: u64,
        translation: Vec3,
        scale: Vec3,
        uv_repeat: f32,
        spins: bool,
    ) -> Result<Self, SceneError> {
        if scale.x.abs() < MIN_SCALE || scale.y.abs() < MIN_SCALE || scale.z.abs() < MIN_SCALE {
            return Err(SceneError::DegenerateScale(scale));
        }
        Ok(Self {
            mesh,
            texture,
            translation,
            scale,
            uv_repeat,
            spins,
        })
    }

    /// World transform: translate, spin about Y (when animated), scale.
    /// The last factor is applied first.
    pub fn model_matrix(&self, spin_angle_deg: f32) -> Mat4 {
        let angle = if self.spins {
            spin_angle_deg.to_radians()
        } else {
            0.0
        };
        Mat4::from_translation(self.translation)
            * Mat4::from_rotation_y(angle)
            * Mat4::from_scale(self.scale)
    }

    /// Normal matrix: inverse-transpose of the 3x3 linear part of
    /// view * model. Invertible because degenerate scales are rejected at
    /// construction.
    pub fn normal_matrix(view: Mat4, model: Mat4) -> Mat3 {
        Mat3::from_mat4(view * model).inverse().transpose()
    }
}

/// Transform pair the lit pass consumes per object.
#[derive(Clone, Copy, Debug)]
pub struct ObjectTransform {
    pub mesh: u64,
    pub texture: u64,
    pub model: Mat4,
    pub normal: Mat3,
    pub uv_repeat: f32,
}

/// The fixed object list. Draw order is fixed (ground plane, lamp, bench,
/// tree); it only affects overdraw, not correctness, since depth testing is
/// on in both passes.
pub struct Scene {
    objects: Vec<SceneObject>,
}

/// Resource ids the park scene binds. The host uploads meshes/textures
/// under these ids.
pub mod park_ids {
    pub const MESH_PLANE: u64 = 1;
    pub const MESH_LAMP: u64 = 2;
    pub const MESH_BENCH: u64 = 3;
    pub const MESH_TREE: u64 = 4;

    pub const TEX_GRID: u64 = 1;
    pub const TEX_SOIL: u64 = 2;
    pub const TEX_BARK: u64 = 3;
}

impl Scene {
    pub fn from_objects(objects: Vec<SceneObject>) -> Self {
        Self { objects }
    }

    /// The park: ground plane, lamp, bench, tree, with the fixed transforms
    /// and tiling factors of the demo.
    pub fn park() -> Result<Self, SceneError> {
        use park_ids::*;
        let objects = vec![
            SceneObject::new(
                MESH_PLANE,
                TEX_SOIL,
                Vec3::new(0.0, -1.0, 0.0),
                Vec3::new(10.0, 1.0, 10.0),
                80.0,
                false,
            )?,
            SceneObject::new(
                MESH_LAMP,
                TEX_GRID,
                Vec3::new(-3.0, -1.0, 3.0),
                Vec3::splat(0.25),
                1.0,
                true,
            )?,
            SceneObject::new(
                MESH_BENCH,
                TEX_GRID,
                Vec3::new(0.0, -1.0, 0.0),
                Vec3::splat(0.01),
                1.0,
                true,
            )?,
            SceneObject::new(
                MESH_TREE,
                TEX_BARK,
                Vec3::new(5.0, -1.0, 5.0),
                Vec3::splat(1.5),
                1.0,
                true,
            )?,
        ];
        Ok(Self::from_objects(objects))
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    /// Per-frame transforms for every object, in draw order.
    pub fn transforms(&self, view: Mat4, spin_angle_deg: f32) -> Vec<ObjectTransform> {
        self.objects
            .iter()
            .map(|obj| {
                let model = obj.model_matrix(spin_angle_deg);
                ObjectTransform {
                    mesh: obj.mesh,
                    texture: obj.texture,
                    model,
                    normal: SceneObject::normal_matrix(view, model),
                    uv_repeat: obj.uv_repeat,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn park_draw_order_is_plane_lamp_bench_tree() {
        let scene = Scene::park().unwrap();
        let meshes: Vec<u64> = scene.objects().iter().map(|o| o.mesh).collect();
        assert_eq!(
            meshes,
            vec![
                park_ids::MESH_PLANE,
                park_ids::MESH_LAMP,
                park_ids::MESH_BENCH,
                park_ids::MESH_TREE
            ]
        );
    }

    #[test]
    fn plane_does_not_spin() {
        let scene = Scene::park().unwrap();
        let plane = scene.objects()[0];
        let a = plane.model_matrix(0.0);
        let b = plane.model_matrix(123.0);
        assert_eq!(a, b);
        let lamp = scene.objects()[1];
        assert_ne!(lamp.model_matrix(0.0), lamp.model_matrix(123.0));
    }

    #[test]
    fn zero_scale_is_rejected() {
        let err = SceneObject::new(1, 1, Vec3::ZERO, Vec3::new(1.0, 0.0, 1.0), 1.0, false);
        assert!(matches!(err, Err(SceneError::DegenerateScale(_))));
    }

    #[test]
    fn model_matrix_applies_scale_then_rotation_then_translation() {
        let obj = SceneObject::new(
            1,
            1,
            Vec3::new(5.0, -1.0, 5.0),
            Vec3::splat(2.0),
            1.0,
            true,
        )
        .unwrap();
        // 90 degrees about Y maps +X to -Z before translating.
        let m = obj.model_matrix(90.0);
        let p = m * glam::Vec4::new(1.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(p.x, 5.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, -1.0, epsilon = 1e-5);
        assert_relative_eq!(p.z, 5.0 - 2.0, epsilon = 1e-5);
    }

    #[test]
    fn normal_matrix_is_inverse_transpose_of_view_model() {
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 7.0), Vec3::ZERO, Vec3::Y);
        let obj = SceneObject::new(1, 1, Vec3::ONE, Vec3::new(2.0, 3.0, 4.0), 1.0, false).unwrap();
        let model = obj.model_matrix(0.0);
        let n = SceneObject::normal_matrix(view, model);
        let expected = Mat3::from_mat4(view * model).inverse().transpose();
        for (a, b) in n.to_cols_array().iter().zip(expected.to_cols_array()) {
            assert_relative_eq!(*a, b);
        }
        // Non-uniform scale: transformed normals stay perpendicular.
        let surface_dir = Mat3::from_mat4(view * model) * Vec3::X;
        let normal = n * Vec3::Y;
        assert_relative_eq!(surface_dir.dot(normal), 0.0, epsilon = 1e-4);
    }
}
