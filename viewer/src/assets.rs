//! Scene asset loading: OBJ meshes and diffuse textures, with procedural
//! fallbacks so the viewer always starts even when asset files are missing.

use std::path::Path;

use scene_api::{ExtractedMesh, ExtractedScene, ExtractedTexture};
use umbra_renderer::scene::park_ids;

/// Interleave tobj output into the stride-32 vertex layout (position,
/// normal, uv). Faces are de-indexed so per-face normal/uv indices never
/// disagree with position indices.
fn interleave_obj(mesh: &tobj::Mesh) -> (Vec<u8>, Vec<u8>) {
    let positions = &mesh.positions;
    let n_pos = positions.len() / 3;
    let n_norm = mesh.normals.len() / 3;
    let n_tex = mesh.texcoords.len() / 2;

    let mut vertex_data = Vec::with_capacity(mesh.indices.len() * 32);
    for (i, &idx) in mesh.indices.iter().enumerate() {
        let pi = (idx as usize).min(n_pos.saturating_sub(1)) * 3;
        let ni = if mesh.normal_indices.is_empty() {
            (idx as usize).min(n_norm.saturating_sub(1)) * 3
        } else {
            (mesh.normal_indices.get(i).copied().unwrap_or(0) as usize)
                .min(n_norm.saturating_sub(1))
                * 3
        };
        let ti = if mesh.texcoord_indices.is_empty() {
            (idx as usize).min(n_tex.saturating_sub(1)) * 2
        } else {
            (mesh.texcoord_indices.get(i).copied().unwrap_or(0) as usize)
                .min(n_tex.saturating_sub(1))
                * 2
        };
        let normal = if n_norm == 0 {
            [0.0, 1.0, 0.0]
        } else {
            [mesh.normals[ni], mesh.normals[ni + 1], mesh.normals[ni + 2]]
        };
        let uv = if n_tex == 0 {
            [0.0, 0.0]
        } else {
            [mesh.texcoords[ti], mesh.texcoords[ti + 1]]
        };
        vertex_data.extend_from_slice(bytemuck::cast_slice(&[
            positions[pi],
            positions[pi + 1],
            positions[pi + 2],
            normal[0],
            normal[1],
            normal[2],
            uv[0],
            uv[1],
        ]));
    }
    let indices: Vec<u32> = (0..mesh.indices.len() as u32).collect();
    (vertex_data, bytemuck::cast_slice(&indices).to_vec())
}

fn load_obj(path: &Path) -> Result<(Vec<u8>, Vec<u8>), String> {
    let (models, _) =
        tobj::load_obj(path, &tobj::GPU_LOAD_OPTIONS).map_err(|e| format!("load_obj: {e:?}"))?;
    let mut vertex_data = Vec::new();
    let mut index_data = Vec::new();
    for model in &models {
        let base = (vertex_data.len() / 32) as u32;
        let (v, i) = interleave_obj(&model.mesh);
        vertex_data.extend_from_slice(&v);
        let shifted: Vec<u32> = bytemuck::cast_slice::<u8, u32>(&i)
            .iter()
            .map(|&x| x + base)
            .collect();
        index_data.extend_from_slice(bytemuck::cast_slice(&shifted));
    }
    if vertex_data.is_empty() {
        return Err("no geometry in OBJ".to_string());
    }
    Ok((vertex_data, index_data))
}

fn vertex(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> [f32; 8] {
    [
        position[0],
        position[1],
        position[2],
        normal[0],
        normal[1],
        normal[2],
        uv[0],
        uv[1],
    ]
}

/// Unit ground quad in the XZ plane, facing +Y, spanning [-1, 1].
fn plane_mesh() -> (Vec<u8>, Vec<u8>) {
    let up = [0.0, 1.0, 0.0];
    let vertices = [
        vertex([-1.0, 0.0, -1.0], up, [0.0, 0.0]),
        vertex([1.0, 0.0, -1.0], up, [1.0, 0.0]),
        vertex([1.0, 0.0, 1.0], up, [1.0, 1.0]),
        vertex([-1.0, 0.0, 1.0], up, [0.0, 1.0]),
    ];
    let indices: [u32; 6] = [0, 2, 1, 0, 3, 2];
    (
        bytemuck::cast_slice(&vertices).to_vec(),
        bytemuck::cast_slice(&indices).to_vec(),
    )
}

/// Unit cube, stand-in for a missing OBJ. Flat normals per face.
fn box_mesh() -> (Vec<u8>, Vec<u8>) {
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        // normal, tangent u, tangent v
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ];
    let mut vertices = Vec::new();
    let mut indices: Vec<u32> = Vec::new();
    for (n, u, v) in faces {
        let base = vertices.len() as u32 / 8;
        let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];
        for (k, (a, b)) in corners.iter().enumerate() {
            let p = [
                n[0] + u[0] * a + v[0] * b,
                n[1] + u[1] * a + v[1] * b,
                n[2] + u[2] * a + v[2] * b,
            ];
            let uv = [k as f32 % 2.0, (k / 2) as f32];
            vertices.extend_from_slice(&vertex(p, n, uv));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    (
        bytemuck::cast_slice(&vertices).to_vec(),
        bytemuck::cast_slice(&indices).to_vec(),
    )
}

fn mesh_or_fallback(id: u64, path: &Path, fallback: fn() -> (Vec<u8>, Vec<u8>)) -> ExtractedMesh {
    let (vertex_data, index_data) = match load_obj(path) {
        Ok(data) => data,
        Err(e) => {
            log::warn!("mesh {}: {e}; using procedural stand-in", path.display());
            fallback()
        }
    };
    ExtractedMesh {
        id,
        vertex_data,
        index_data,
    }
}

/// Load a diffuse texture, falling back to a 1x1 white pixel. A missing
/// texture then renders as plain lit geometry instead of aborting.
fn texture_or_white(id: u64, path: &Path) -> ExtractedTexture {
    match image::open(path) {
        Ok(img) => {
            let rgba = img.to_rgba8();
            let (width, height) = rgba.dimensions();
            ExtractedTexture {
                id,
                pixels: rgba.into_raw(),
                width,
                height,
            }
        }
        Err(e) => {
            log::warn!("texture {}: {e}; using white", path.display());
            ExtractedTexture {
                id,
                pixels: vec![255; 4],
                width: 1,
                height: 1,
            }
        }
    }
}

/// Assemble the park scene's GPU payload from an asset directory.
pub fn load_scene(asset_dir: &Path) -> ExtractedScene {
    let mut scene = ExtractedScene::default();
    let plane = {
        let (vertex_data, index_data) = plane_mesh();
        ExtractedMesh {
            id: park_ids::MESH_PLANE,
            vertex_data,
            index_data,
        }
    };
    scene.meshes.insert(plane.id, plane);
    for (id, file) in [
        (park_ids::MESH_LAMP, "lamp.obj"),
        (park_ids::MESH_BENCH, "bench.obj"),
        (park_ids::MESH_TREE, "tree.obj"),
    ] {
        let mesh = mesh_or_fallback(id, &asset_dir.join(file), box_mesh);
        scene.meshes.insert(id, mesh);
    }
    for (id, file) in [
        (park_ids::TEX_GRID, "grid.png"),
        (park_ids::TEX_SOIL, "soil.png"),
        (park_ids::TEX_BARK, "bark.png"),
    ] {
        let tex = texture_or_white(id, &asset_dir.join(file));
        scene.textures.insert(id, tex);
    }
    scene
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn procedural_meshes_have_stride_32() {
        let (v, i) = plane_mesh();
        assert_eq!(v.len() % 32, 0);
        assert_eq!(i.len() % 4, 0);
        let (v, i) = box_mesh();
        assert_eq!(v.len() / 32, 24);
        assert_eq!(i.len() / 4, 36);
    }

    #[test]
    fn missing_assets_still_produce_a_complete_scene() {
        let scene = load_scene(Path::new("/nonexistent"));
        for id in [
            park_ids::MESH_PLANE,
            park_ids::MESH_LAMP,
            park_ids::MESH_BENCH,
            park_ids::MESH_TREE,
        ] {
            assert!(scene.meshes.contains_key(&id));
        }
        for id in [park_ids::TEX_GRID, park_ids::TEX_SOIL, park_ids::TEX_BARK] {
            let tex = &scene.textures[&id];
            assert_eq!((tex.width, tex.height), (1, 1));
            assert_eq!(tex.pixels, vec![255; 4]);
        }
    }

    #[test]
    fn box_indices_stay_in_range() {
        let (v, i) = box_mesh();
        let vertex_count = (v.len() / 32) as u32;
        for idx in bytemuck::cast_slice::<u8, u32>(&i) {
            assert!(*idx < vertex_count);
        }
    }
}
