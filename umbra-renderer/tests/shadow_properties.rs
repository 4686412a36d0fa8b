//! Behavioral checks of the three shadow techniques against a software
//! depth map built from the real light transform and ground plane.

use glam::{Vec2, Vec3};
use umbra_renderer::config::UmbraConfig;
use umbra_renderer::light::DirectionalLight;
use umbra_renderer::sampling::{
    project, shadow_adaptive_bias, shadow_naive, shadow_pcf, DepthImage,
};

const PLANE_Y: f32 = -1.0;
const PLANE_HALF: f32 = 10.0;

fn plane_depth_map(config: &UmbraConfig) -> (DepthImage, glam::Mat4) {
    let light = DirectionalLight::from_config(config);
    let light_space = light.space_matrix(config);
    let mut map = DepthImage::new(config.shadow_resolution, config.shadow_resolution);
    map.rasterize_plane(light_space, PLANE_Y, PLANE_HALF);
    (map, light_space)
}

/// Plane sample points inside the light frustum, off the texel centers.
fn plane_samples() -> Vec<Vec3> {
    let mut points = Vec::new();
    let n = 64;
    for iz in 0..n {
        for ix in 0..n {
            let x = -4.5 + 9.0 * (ix as f32 + 0.37) / n as f32;
            let z = -4.5 + 9.0 * (iz as f32 + 0.71) / n as f32;
            points.push(Vec3::new(x, PLANE_Y, z));
        }
    }
    points
}

#[test]
fn naive_technique_shows_acne_on_the_unoccluded_plane() {
    let config = UmbraConfig::default();
    let (map, light_space) = plane_depth_map(&config);
    let samples = plane_samples();
    let shadowed = samples
        .iter()
        .filter(|&&p| shadow_naive(&map, project(light_space, p)) < 0.5)
        .count();
    // Nothing occludes the plane, so every shadowed sample is acne. The
    // zero-tolerance comparison misclassifies a visible share of them.
    let ratio = shadowed as f32 / samples.len() as f32;
    assert!(
        ratio > 0.01,
        "expected self-shadowing acne, got ratio {ratio}"
    );
}

#[test]
fn adaptive_bias_removes_acne_on_the_unoccluded_plane() {
    let config = UmbraConfig::default();
    let (map, light_space) = plane_depth_map(&config);
    let n = Vec3::Y;
    let l = config.light_direction.normalize();
    let samples = plane_samples();
    let shadowed = samples
        .iter()
        .filter(|&&p| shadow_adaptive_bias(&map, project(light_space, p), n, l) < 0.5)
        .count();
    assert_eq!(shadowed, 0, "slope-scaled bias left {shadowed} acne samples");
}

#[test]
fn pcf_removes_acne_on_the_unoccluded_plane() {
    let config = UmbraConfig::default();
    let (map, light_space) = plane_depth_map(&config);
    let n = Vec3::Y;
    let l = config.light_direction.normalize();
    for p in plane_samples() {
        let s = shadow_pcf(&map, project(light_space, p), n, l);
        assert!(s > 0.99, "pcf darkened unoccluded plane point {p:?}: {s}");
    }
}

#[test]
fn pcf_is_fractional_at_an_occluder_edge() {
    // Synthetic map: occluder at depth 0.2 over the left half, empty right.
    let mut map = DepthImage::new(64, 64);
    for y in 0..64 {
        for x in 0..32 {
            map.put(x, y, 0.2);
        }
    }
    let n = Vec3::Y;
    let l = Vec3::new(1.0, 1.0, 1.0).normalize();
    // Receiver straddling the boundary at u = 0.5: part of the 3x3 kernel
    // reads the occluder, part reads background.
    let coords = Vec3::new(0.5, 0.5, 0.8);
    let soft = shadow_pcf(&map, coords, n, l);
    assert!(soft > 0.0 && soft < 1.0, "expected penumbra, got {soft}");
    // The single-tap techniques stay binary at the same point.
    let hard = shadow_naive(&map, coords);
    assert!(hard == 0.0 || hard == 1.0);
    let biased = shadow_adaptive_bias(&map, coords, n, l);
    assert!(biased == 0.0 || biased == 1.0);
}

#[test]
fn points_outside_the_light_frustum_are_lit() {
    let config = UmbraConfig::default();
    let (map, light_space) = plane_depth_map(&config);
    let n = Vec3::Y;
    let l = config.light_direction.normalize();
    // Far out on the plane, well past the ortho frustum's 5-unit half size.
    let p = Vec3::new(40.0, PLANE_Y, -40.0);
    let coords = project(light_space, p);
    assert!(
        coords.x < 0.0 || coords.x > 1.0 || coords.y < 0.0 || coords.y > 1.0,
        "test point must fall outside the shadow map, got {coords:?}"
    );
    assert_eq!(shadow_naive(&map, coords), 1.0);
    assert_eq!(shadow_adaptive_bias(&map, coords, n, l), 1.0);
    assert_eq!(shadow_pcf(&map, coords, n, l), 1.0);
}

#[test]
fn occluded_receiver_is_shadowed_by_every_technique() {
    let config = UmbraConfig::default();
    let light = DirectionalLight::from_config(&config);
    let light_space = light.space_matrix(&config);
    let mut map = DepthImage::new(config.shadow_resolution, config.shadow_resolution);
    // Occluder: a small elevated quad above the plane, between it and the
    // light. The depth test keeps the closer surface where they overlap.
    map.rasterize_plane(light_space, 1.5, 1.0);
    map.rasterize_plane(light_space, PLANE_Y, PLANE_HALF);

    let n = Vec3::Y;
    let l = config.light_direction.normalize();
    // Sliding the occluder center along -l until it hits the plane gives a
    // point inside the cast shadow.
    let drop = 1.5 - PLANE_Y;
    let shadow_point = Vec3::new(0.0, 1.5, 0.0) - l * (drop / l.y);
    let coords = project(light_space, shadow_point);
    assert!(shadow_naive(&map, coords) < 0.5);
    assert!(shadow_adaptive_bias(&map, coords, n, l) < 0.5);
    assert!(shadow_pcf(&map, coords, n, l) < 0.5);
}

#[test]
fn border_lookup_reads_fully_lit() {
    let map = DepthImage::new(16, 16);
    assert_eq!(map.sample(Vec2::new(1.2, 0.5)), 1.0);
    assert_eq!(map.sample(Vec2::new(0.5, -0.2)), 1.0);
}
