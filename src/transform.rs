//! World → view → screen transforms.
//!
//! Each stage is a pure function over vertex positions indexed by vertex
//! handle, so the mesh itself is never modified by rendering.
//!
//! # Screen space
//!
//! Projected coordinates are centred on the viewport and Y is flipped:
//!
//! ```text
//! screen_x = x + width / 2
//! screen_y = height / 2 - y
//! ```
//!
//! The Z component of a screen-space point carries the depth used by the
//! depth buffer, larger = nearer. That is view-space z, negated when a
//! negative projection distance puts the eye on the -z side.

use approx::abs_diff_eq;

use crate::camera::Camera;
use crate::math::vec3::Vec3;
use crate::mesh::Mesh;

/// Distance from the projection plane under which a vertex is dropped.
pub const PLANE_EPSILON: f32 = 1e-5;

/// Transforms every vertex position of `mesh` into view space.
pub fn to_view_space(mesh: &Mesh, camera: &Camera) -> Vec<Vec3> {
    let view = camera.view_matrix();
    mesh.vertices().iter().map(|v| view * v.position).collect()
}

/// Projects one view-space point and maps it onto a `width x height` screen.
///
/// The eye sits at `(0, 0, d)` and looks back toward the origin, so with a
/// negative `d` it looks along +z.
///
/// Returns `None` when a perspective divide is impossible: the point lies on
/// the projection plane (`z == d`) or behind the eye (`d / (d - z) <= 0`).
pub fn project_point(point: Vec3, camera: &Camera, width: usize, height: usize) -> Option<Vec3> {
    let (x, y, depth) = if camera.is_perspective() {
        let d = camera.center_of_projection();
        if abs_diff_eq!(d, point.z, epsilon = PLANE_EPSILON) {
            return None;
        }
        let factor = d / (d - point.z);
        if factor <= 0.0 {
            return None;
        }
        (point.x * factor, point.y * factor, point.z * d.signum())
    } else {
        (point.x, point.y, point.z)
    };

    let zoom = camera.zoom();
    Some(Vec3::new(
        x * zoom + width as f32 / 2.0,
        height as f32 / 2.0 - y * zoom,
        depth,
    ))
}

/// Projects all view-space points; dropped vertices come back as `None`.
pub fn project(view: &[Vec3], camera: &Camera, width: usize, height: usize) -> Vec<Option<Vec3>> {
    let projected: Vec<_> = view
        .iter()
        .map(|&p| project_point(p, camera, width, height))
        .collect();

    let dropped = projected.iter().filter(|p| p.is_none()).count();
    if dropped > 0 {
        log::trace!("{dropped} vertices skipped by the perspective divide");
    }
    projected
}
